use podcaster_config::Config;

use super::load_library;

/// Strategy for listing every persona set a session can use.
#[derive(Debug, Clone, Copy)]
pub struct PersonasStrategy;

impl super::CommandStrategy for PersonasStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let library = load_library(&config)?;

        println!("=== Persona Sets ({}) ===\n", library.len());
        for set in library.iter() {
            println!("{} ({})", set.set_name, set.set_id);
            if !set.description.is_empty() {
                println!("  {}", set.description);
            }
            println!("  Host: {}", set.host.name);
            println!("  Guests: {}", set.guest_names().join(", "));
            if !set.domains.is_empty() {
                println!("  Domains: {}", set.domains.join(", "));
            }
            println!();
        }

        Ok(())
    }
}
