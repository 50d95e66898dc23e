//! End-to-end session runs against scripted listeners.
//!
//! These tests verify that:
//! - Status changes only follow the lifecycle table
//! - A silent session stops before the turn ceiling with closing remarks
//! - Interjections are integrated at every pause, and exits end the session
//! - Full prompts appear every third completed exchange
//! - The summary agrees with the history it is built from

use std::time::Duration;

use podcaster_conversation::testing::{EchoAgent, ScriptStep, ScriptedInput};
use podcaster_conversation::{
    Cast, InputGate, PromptKind, QuickPauseMode, SessionController, SessionSettings,
};
use podcaster_core::{ConversationState, ConversationStatus, Cue, Speaker};

type Controller = SessionController<EchoAgent, ScriptedInput, Vec<u8>>;

const QUICK: QuickPauseMode = QuickPauseMode::Timed(Duration::from_millis(1));

fn settings() -> SessionSettings {
    SessionSettings::default().with_pacing(Duration::ZERO)
}

fn build(
    agent: EchoAgent,
    input: ScriptedInput,
    quick: QuickPauseMode,
    settings: SessionSettings,
) -> Controller {
    SessionController::new(
        "The future of open source",
        Cast::new("Alex Rivera", "Dr. Maya Chen", "Jordan Blake"),
        agent,
        InputGate::new(input, quick),
        Vec::new(),
        settings,
    )
}

fn controller_with(agent: EchoAgent, input: ScriptedInput, quick: QuickPauseMode) -> Controller {
    build(agent, input, quick, settings())
}

fn controller(input: ScriptedInput) -> Controller {
    controller_with(EchoAgent::new(), input, QUICK)
}

/// Number of pauses a fully silent default session opens.
const SILENT_PAUSES: usize = 36;

/// Stay silent for the first `pauses` pauses (answering full prompts with a
/// blank line), then play `step`, then listen idly.
fn silent_then(pauses: usize, step: ScriptStep) -> ScriptedInput {
    let steps = (0..pauses)
        .map(|i| {
            if (i + 1) % 10 == 0 {
                ScriptStep::line("")
            } else {
                ScriptStep::Silence
            }
        })
        .chain(std::iter::once(step));
    ScriptedInput::new(steps.collect::<Vec<_>>()).then_idle()
}

fn assert_lifecycle(state: &ConversationState) {
    let log = state.status_log();
    assert_eq!(log.first().map(|c| c.from), Some(ConversationStatus::Initializing));
    assert_eq!(log.last().map(|c| c.to), Some(ConversationStatus::Completed));
    for change in log {
        assert!(
            change.from.can_transition_to(change.to),
            "unexpected transition {:?} -> {:?}",
            change.from,
            change.to
        );
    }
    for pair in log.windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }
}

fn assert_turns_are_consecutive(state: &ConversationState) {
    for (i, message) in state.history().iter().enumerate() {
        assert_eq!(message.turn_number, i + 1);
    }
    assert_eq!(state.current_turn(), state.history().len());
    assert!(state.current_turn() <= state.max_turns());
}

#[tokio::test]
async fn test_silent_session_stops_before_turn_limit() {
    let input = ScriptedInput::idle_listener();
    let prompts = input.prompt_log();
    let mut session = controller(input);

    assert!(session.start_conversation_until(std::future::pending()).await);

    let state = session.state();
    assert_eq!(state.status(), ConversationStatus::Completed);
    // 11 exchanges; a 12th could not absorb an interjection at its last pause.
    assert_eq!(state.current_turn(), 1 + 11 * 4 + 1);
    assert_turns_are_consecutive(state);
    assert_lifecycle(state);

    let last = state.history().last().unwrap();
    assert_eq!((last.speaker, last.cue), (Speaker::Host, Cue::Closing));
    assert!(state.history().iter().all(|m| m.speaker != Speaker::User));

    // Three quick pauses per exchange, a full prompt after every third.
    let prompts = prompts.lock().unwrap();
    let full = prompts.iter().filter(|k| **k == PromptKind::Full).count();
    let quick = prompts.iter().filter(|k| **k == PromptKind::Quick).count();
    assert_eq!(full, 3);
    assert_eq!(quick, 33);
    assert_eq!(prompts.len(), SILENT_PAUSES);
    for (i, kind) in prompts.iter().enumerate() {
        let expected = if (i + 1) % 10 == 0 {
            PromptKind::Full
        } else {
            PromptKind::Quick
        };
        assert_eq!(*kind, expected, "prompt {i}");
    }
}

#[tokio::test]
async fn test_interjection_then_exit() {
    let mut session = controller(ScriptedInput::new([
        ScriptStep::Silence,
        ScriptStep::Silence,
        ScriptStep::line("tell me more"),
        ScriptStep::Silence,
        ScriptStep::line("exit"),
    ]));

    assert!(session.start_conversation_until(std::future::pending()).await);

    let state = session.state();
    let turns: Vec<_> = state.history().iter().map(|m| (m.speaker, m.cue)).collect();
    assert_eq!(
        turns,
        [
            (Speaker::Host, Cue::Introduction),
            (Speaker::Host, Cue::Question),
            (Speaker::GuestA, Cue::Answer),
            (Speaker::GuestB, Cue::Answer),
            (Speaker::User, Cue::Interjection),
            (Speaker::Host, Cue::Acknowledgement),
            (Speaker::GuestA, Cue::Reaction),
            (Speaker::GuestB, Cue::Reaction),
            (Speaker::Host, Cue::Closing),
        ]
    );
    assert_eq!(state.history()[4].text, "tell me more");
    assert_eq!(state.status(), ConversationStatus::Completed);
    assert_lifecycle(state);

    let summary = session.get_summary().unwrap();
    assert_eq!(summary.user_injections, 1);
    assert!(summary.user_participated);
    assert_eq!(summary.total_exchanges, 0);
}

#[tokio::test]
async fn test_exit_words_end_session_in_any_case() {
    for word in ["STOP", "Quit", "bye", "End"] {
        let mut session = controller(ScriptedInput::new([ScriptStep::line(word)]));
        assert!(session.start_conversation_until(std::future::pending()).await);

        let state = session.state();
        assert_eq!(state.current_turn(), 3, "exit word {word}");
        assert!(state.history().iter().all(|m| m.speaker != Speaker::User));
    }

    let mut session = controller(ScriptedInput::new([ScriptStep::line("stopping")]).then_idle());
    assert!(session.start_conversation_until(std::future::pending()).await);
    assert_eq!(session.get_summary().unwrap().user_injections, 1);
}

#[tokio::test]
async fn test_full_prompt_accepts_interjection() {
    let mut steps = vec![ScriptStep::Silence; 9];
    steps.push(ScriptStep::line("What about licensing?"));
    steps.push(ScriptStep::Silence);
    steps.push(ScriptStep::line("quit"));
    let input = ScriptedInput::new(steps);
    let prompts = input.prompt_log();
    let mut session = controller(input);

    assert!(session.start_conversation_until(std::future::pending()).await);

    let state = session.state();
    // intro + 3 exchanges, then user + host + two guests, then closing
    assert_eq!(state.current_turn(), 1 + 12 + 4 + 1);
    assert_eq!(state.history()[13].speaker, Speaker::User);
    assert_eq!(prompts.lock().unwrap()[9], PromptKind::Full);
    assert_eq!(state.exchanges_since_prompt(), 0);
    assert_lifecycle(state);
}

#[tokio::test]
async fn test_summary_matches_history() {
    let mut session = controller(
        ScriptedInput::new([ScriptStep::Silence, ScriptStep::line("Is this safe?")]).then_idle(),
    );
    assert!(session.get_summary().is_none());

    assert!(session.start_conversation_until(std::future::pending()).await);

    let summary = session.get_summary().unwrap();
    let history = session.state().history();
    for speaker in [Speaker::Host, Speaker::GuestA, Speaker::GuestB, Speaker::User] {
        let tally = history.iter().filter(|m| m.speaker == speaker).count();
        assert_eq!(summary.speaker_counts.get(speaker), tally, "{speaker}");
    }
    let exchanges = history.iter().filter(|m| m.cue == Cue::FollowUp).count();
    assert_eq!(summary.total_exchanges, exchanges);
    assert_eq!(summary.total_turns, history.len());
    assert_eq!(summary.final_status, ConversationStatus::Completed);
    assert!(!summary.interrupted);
}

#[tokio::test]
async fn test_interrupt_goes_straight_to_closing() {
    let mut session = controller_with(
        EchoAgent::new(),
        ScriptedInput::new([ScriptStep::Silence]),
        QuickPauseMode::Blocking,
    );

    let completed = session
        .start_conversation_until(tokio::time::sleep(Duration::from_millis(20)))
        .await;

    assert!(!completed);
    let state = session.state();
    assert_eq!(state.status(), ConversationStatus::Completed);
    assert!(state.is_interrupted());
    let cues: Vec<_> = state.history().iter().map(|m| m.cue).collect();
    assert_eq!(cues, [Cue::Introduction, Cue::Question, Cue::Closing]);
    assert_lifecycle(state);

    let transcript = String::from_utf8(session.into_output()).unwrap();
    assert!(transcript.contains("Podcast interrupted"));
    assert!(transcript.contains("THANK YOU FOR LISTENING"));
}

#[tokio::test]
async fn test_agent_failure_is_reported_not_fatal() {
    let mut session = controller_with(
        EchoAgent::failing_for(Speaker::GuestB),
        ScriptedInput::new([ScriptStep::Silence, ScriptStep::Silence, ScriptStep::line("bye")]),
        QUICK,
    );

    assert!(session.start_conversation_until(std::future::pending()).await);

    let state = session.state();
    let guest_b = state
        .history()
        .iter()
        .find(|m| m.speaker == Speaker::GuestB)
        .unwrap();
    assert!(guest_b.text.contains("Jordan Blake could not respond"));
    assert_eq!(state.status(), ConversationStatus::Completed);
}

#[tokio::test]
async fn test_input_failure_ends_session() {
    let mut session = controller(ScriptedInput::new([ScriptStep::Silence, ScriptStep::Fail]));

    assert!(session.start_conversation_until(std::future::pending()).await);

    let state = session.state();
    assert_eq!(state.current_turn(), 4);
    assert_eq!(state.history().last().unwrap().cue, Cue::Closing);
}

#[tokio::test]
async fn test_agents_see_bounded_context() {
    let agent = EchoAgent::new();
    let requests = agent.request_log();
    let mut session = controller_with(agent, ScriptedInput::idle_listener(), QUICK);

    assert!(session.start_conversation_until(std::future::pending()).await);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 46);
    assert_eq!(requests[0].context_len, 0);
    assert!(requests.iter().all(|r| r.context_len <= 5));
    assert!(requests.iter().enumerate().all(|(i, r)| r.turn == i + 1));
}

#[tokio::test]
async fn test_session_runs_once() {
    let mut session = controller(ScriptedInput::new([ScriptStep::line("stop")]));
    assert!(session.start_conversation_until(std::future::pending()).await);
    let turns = session.state().current_turn();

    assert!(!session.start_conversation_until(std::future::pending()).await);
    assert_eq!(session.state().current_turn(), turns);
}

#[tokio::test]
async fn test_interjection_at_last_pause_is_integrated() {
    // Exchanges 1-10 stay silent; the listener speaks after the second guest
    // of the final exchange.
    let input = silent_then(SILENT_PAUSES - 1, ScriptStep::line("what about licensing?"));
    let mut session = controller(input);

    assert!(session.start_conversation_until(std::future::pending()).await);

    let state = session.state();
    let tail: Vec<_> = state.history()[43..]
        .iter()
        .map(|m| (m.speaker, m.cue))
        .collect();
    assert_eq!(
        tail,
        [
            (Speaker::GuestB, Cue::Answer),
            (Speaker::User, Cue::Interjection),
            (Speaker::Host, Cue::Acknowledgement),
            (Speaker::GuestA, Cue::Reaction),
            (Speaker::GuestB, Cue::Reaction),
            (Speaker::Host, Cue::Closing),
        ]
    );
    assert_eq!(state.history()[44].text, "what about licensing?");
    assert_eq!(state.current_turn(), 49);
    assert_turns_are_consecutive(state);
    assert_lifecycle(state);
}

#[tokio::test]
async fn test_interjection_at_any_pause_is_integrated() {
    for pause in 0..SILENT_PAUSES {
        let mut session = controller(silent_then(pause, ScriptStep::line("a question?")));
        assert!(session.start_conversation_until(std::future::pending()).await);

        let state = session.state();
        let position = state
            .history()
            .iter()
            .position(|m| m.speaker == Speaker::User);
        let Some(position) = position else {
            panic!("interjection at pause {pause} was not integrated");
        };
        assert_eq!(
            state.history()[position + 1].cue,
            Cue::Acknowledgement,
            "pause {pause}"
        );
        assert_eq!(session.get_summary().unwrap().user_injections, 1);
        assert!(state.current_turn() <= state.max_turns());
        assert_eq!(state.status(), ConversationStatus::Completed);
    }
}

#[tokio::test]
async fn test_interrupt_during_introduction() {
    let mut session = controller_with(
        EchoAgent::stalling_on(Cue::Introduction),
        ScriptedInput::idle_listener(),
        QUICK,
    );

    let completed = session
        .start_conversation_until(tokio::time::sleep(Duration::from_millis(10)))
        .await;

    assert!(!completed);
    let state = session.state();
    assert!(state.is_interrupted());
    assert_eq!(state.status(), ConversationStatus::Completed);
    assert!(state.status_log().iter().any(|c| {
        c.from == ConversationStatus::Introduction && c.to == ConversationStatus::Closing
    }));
    let cues: Vec<_> = state.history().iter().map(|m| m.cue).collect();
    assert_eq!(cues, [Cue::Closing]);
    assert_lifecycle(state);
}

#[tokio::test]
async fn test_stalled_agent_times_out() {
    let mut session = build(
        EchoAgent::stalling_on(Cue::Question),
        ScriptedInput::new([ScriptStep::line("bye")]),
        QUICK,
        settings().with_response_timeout(Duration::from_millis(20)),
    );

    assert!(session.start_conversation_until(std::future::pending()).await);

    let state = session.state();
    let question = &state.history()[1];
    assert_eq!((question.speaker, question.cue), (Speaker::Host, Cue::Question));
    assert!(question.text.contains("Alex Rivera could not respond"));
    assert!(question.text.contains("no response within"));
    assert_eq!(state.history().last().unwrap().cue, Cue::Closing);
    assert_eq!(state.status(), ConversationStatus::Completed);
}

#[tokio::test]
async fn test_stalled_closing_still_completes() {
    let mut session = build(
        EchoAgent::stalling_on(Cue::Closing),
        ScriptedInput::new([ScriptStep::line("quit")]),
        QUICK,
        settings().with_response_timeout(Duration::from_millis(20)),
    );

    assert!(session.start_conversation_until(std::future::pending()).await);

    let state = session.state();
    assert_eq!(state.status(), ConversationStatus::Completed);
    let closing = state.history().last().unwrap();
    assert_eq!(closing.cue, Cue::Closing);
    assert!(closing.text.contains("could not respond"));
}
