use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env early; ignore if missing.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GA_AUDIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = ga_audit::Cli::parse();
    if let Err(err) = ga_audit::run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
