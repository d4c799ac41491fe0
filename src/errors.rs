use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Response carried no data")]
    MissingData,

    #[error("{kind} not found: {id}")]
    MissingEntity { kind: &'static str, id: String },

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
