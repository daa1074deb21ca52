mod auth;
mod conversation;
mod date_window;
mod document;
mod env;
mod error;
mod message;
mod repo;
mod services;
mod stage;

pub use auth::*;
pub use conversation::*;
pub use date_window::*;
pub use document::*;
pub use env::*;
pub use error::*;
pub use message::*;
pub use repo::*;
pub use services::*;
pub use stage::*;
