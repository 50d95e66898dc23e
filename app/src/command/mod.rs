//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`.

use podcaster_config::{Config, PersonaLibrary};
use tracing::info;

mod info;
mod init;
mod personas;
mod run;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use personas::PersonasStrategy;
pub use run::{RunInput, RunStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         // Command logic here
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Built-in persona sets plus any found in the configured persona directory
/// (`~/podcaster/personas` unless `personas_dir` is set).
fn load_library(config: &Config) -> anyhow::Result<PersonaLibrary> {
    let mut library = PersonaLibrary::builtin()?;

    let dir = match &config.personas_dir {
        Some(dir) => dir.clone(),
        None => Config::config_dir()?.join("personas"),
    };
    let loaded = library.load_dir(&dir)?;
    info!(
        "Loaded {loaded} persona set(s) from {}, {} available",
        dir.display(),
        library.len()
    );

    Ok(library)
}
