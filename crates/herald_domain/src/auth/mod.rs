mod client_config;
mod credential;
mod identifiers;

pub use client_config::*;
pub use credential::*;
pub use identifiers::*;
