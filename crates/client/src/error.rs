/// Errors returned by the client gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid API base URL '{0}': must be an absolute http(s) URL")]
    InvalidBaseUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("unreadable response (status {status}): {detail}")]
    Decode { status: u16, detail: String },
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
