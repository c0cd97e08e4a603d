// App module for the latency dashboard
// Holds dashboard state and maps user input onto dashboard commands

pub mod input;
pub mod state;

pub use input::{handle_key, handle_mouse};
pub use state::App;
