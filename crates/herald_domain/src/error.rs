use std::path::PathBuf;

/// Failures that abort a run. Each variant maps onto one class of the
/// taxonomy: configuration, authorization, generation and transport.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error(
        "OAuth client configuration not found at {}. Create an OAuth client ID of type \
         'Desktop app' in the Google Cloud console (APIs & Services > Credentials), download \
         its JSON and save it at that path, then run `herald auth`.",
        .0.display()
    )]
    MissingClientConfig(PathBuf),

    #[error("Invalid OAuth client configuration: {0}")]
    InvalidClientConfig(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Authorization was denied: {0}")]
    AuthorizationDenied(String),

    #[error("Conversation is malformed: {0}")]
    MalformedConversation(String),

    #[error("No text content returned by the model")]
    EmptyGeneration,

    #[error("Tool-use loop did not finish within {limit} rounds")]
    LoopExceeded { limit: usize },

    #[error("Generation API error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Mail transport rejected the message ({status}): {body}")]
    Transport { status: u16, body: String },
}
