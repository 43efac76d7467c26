use clap::Parser;
use secretary::cli::{commands, output, Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout stays clean for passwords.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Generate {
            ref service,
            ref account,
            ref revision,
            length,
            strength,
        } => commands::generate::execute(&cli, service, account, revision, length, strength),
        Commands::Rotate => commands::rotate::execute(&cli),
        Commands::Verify => commands::verify::execute(&cli),
        Commands::Export => commands::export::execute(&cli),
        Commands::Import {
            ref envelope,
            force,
        } => commands::import_cmd::execute(&cli, envelope, force),
        Commands::Version => commands::version::execute(),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
