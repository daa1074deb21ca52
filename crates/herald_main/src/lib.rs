mod app;
mod cli;

pub use app::*;
pub use cli::*;
