use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "latency-dashboard", version, about = "Region latency dashboard")]
pub struct CliArgs {
    /// Fetch one cycle, print the latency table and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// In headless mode, print the traceroute to this region instead
    #[arg(long, value_name = "CODE")]
    pub traceroute: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the latency backend base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the polling interval
    #[arg(long = "interval-ms", value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Override the log file used while the dashboard is on screen
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("LATENCY_API_URL", url);
        }
        if let Some(ms) = self.interval_ms {
            std::env::set_var("POLL_INTERVAL_MS", ms.to_string());
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("LOG_FILE", path);
        }
        if self.debug && std::env::var_os("RUST_LOG").is_none() {
            std::env::set_var("RUST_LOG", "debug");
        }
    }
}
