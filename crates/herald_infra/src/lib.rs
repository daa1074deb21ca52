mod anthropic;
mod auth;
mod credential_file;
mod env;
mod gmail;
mod goals;
mod logging;
mod secrets;

pub use anthropic::*;
pub use auth::*;
pub use credential_file::*;
pub use env::*;
pub use gmail::*;
pub use goals::*;
pub use logging::*;
pub use secrets::*;
