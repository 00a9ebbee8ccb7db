use clap::Parser;
use jot::cli::commands::Cli;
use jot::cli::handlers;

fn main() {
    if std::env::var("JOT_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("jot=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
