use clap::Parser;
use credvault::cli::{Cli, Commands};

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => credvault::cli::commands::init::execute(&cli),
        Commands::Unlock => credvault::cli::commands::unlock::execute(&cli),
        Commands::Set {
            ref agent,
            ref platform,
            ref username,
        } => credvault::cli::commands::set::execute(&cli, agent, platform, username),
        Commands::Get {
            ref agent,
            ref platform,
        } => credvault::cli::commands::get::execute(&cli, agent, platform),
        Commands::List { ref agent } => {
            credvault::cli::commands::list::execute(&cli, agent.as_deref())
        }
        Commands::Remove {
            ref agent,
            ref platform,
            force,
        } => credvault::cli::commands::remove::execute(&cli, agent, platform.as_deref(), force),
        Commands::GeneratePassword { length } => {
            credvault::cli::commands::generate::execute(&cli, length)
        }
        Commands::CheckPassword => credvault::cli::commands::check::execute(&cli),
    };

    if let Err(e) = result {
        credvault::cli::output::report(&e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the default of warnings only.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("credvault=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
