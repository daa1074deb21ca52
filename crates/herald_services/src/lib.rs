mod credential_store;
mod dispatcher;
mod generator;
mod jobs;
mod markdown;
mod mime;
mod pipeline;
mod renderer;
mod template;

pub use credential_store::*;
pub use dispatcher::*;
pub use generator::*;
pub use jobs::*;
pub use pipeline::*;
pub use renderer::*;
pub use template::*;
