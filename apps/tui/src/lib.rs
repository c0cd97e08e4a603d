// Export the non-UI modules for use in the binary and tests
pub mod client;
pub mod config;
pub mod logging;
