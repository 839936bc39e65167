use clap::Parser;
use tophn::cli::Cli;
use tophn::config::Config;
use tophn::hn::HnClient;
use tophn::logging::Logging;
use tophn::poll::Poller;
use tracing::info;

fn main() {
    let cli = Cli::parse();

    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("error: {}", e.chain());
        std::process::exit(1);
    });

    let _logging = Logging::init(&config.logging).unwrap_or_else(|e| {
        eprintln!("error: {}", e.chain());
        std::process::exit(1);
    });
    info!(config = %cli.config.display(), "logging configured");

    let poller = HnClient::new(&config.hn)
        .and_then(|client| Poller::new(&config, client))
        .unwrap_or_else(|e| {
            tracing::error!(error = %e.chain(), "startup failed");
            eprintln!("error: {}", e.chain());
            std::process::exit(1);
        });

    poller.run()
}
