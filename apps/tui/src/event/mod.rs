mod headless;
mod loop_handler;
mod tasks;

pub use headless::run_headless;
pub use loop_handler::run;
