mod callback;
mod installed_app;

pub use callback::*;
pub use installed_app::*;
