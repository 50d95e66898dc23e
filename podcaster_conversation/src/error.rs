use podcaster_core::LedgerError;
use thiserror::Error;

/// Errors that abort the exchange loop and send the session to closing.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
