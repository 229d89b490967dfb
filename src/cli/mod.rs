pub mod commands;
pub mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{handle_init, handle_serve, handle_show, handle_wards};
