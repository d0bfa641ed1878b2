// Presentation layer - Command-line surface
pub mod app_state;
pub mod cli;
pub mod handlers;
