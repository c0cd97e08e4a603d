mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use latency_dashboard::client::ApiClient;
use latency_dashboard::config::init_app_config;
use latency_dashboard::logging::{init_logging, LogTarget};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;
    let client = ApiClient::new(config.api_url.clone());

    // Check if we're running in a terminal
    if args.headless || !is_terminal() {
        init_logging(LogTarget::Stderr)?;
        return event::run_headless(&client, args.json, args.traceroute.as_deref()).await;
    }

    init_logging(LogTarget::File(&config.log_file))?;
    tracing::info!(api = %config.api_url, interval = ?config.poll_interval, "starting dashboard");

    // Setup terminal
    terminal::install_panic_hook();
    let mut terminal = terminal::setup()?;

    let mut app = App::new(config.api_url.as_str());
    let result = event::run(&mut terminal, &mut app, client, config.poll_interval).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
