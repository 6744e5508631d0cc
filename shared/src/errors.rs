use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Logging already initialized: {0}")]
    LoggingInit(String),

    #[error("Failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}
