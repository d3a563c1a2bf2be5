use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("invalid server url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: &'static str },

    #[error("connect to {url} failed: {source}")]
    Connect {
        url:    String,
        #[source]
        source: std::io::Error,
    },

    #[error("stream failure: {0}")]
    Stream(#[from] std::io::Error),

    #[error("malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("connect called before a server url was set")]
    NoUrl,
}

pub type ChannelResult<T> = Result<T, ChannelError>;
