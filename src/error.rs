use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing credentials, identifiers or unparseable settings.
    #[error("{0}")]
    Config(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    Generation(String),

    /// The model answered, but not with the JSON we asked for.
    #[error("API response was not valid JSON format.\nReceived response:\n{raw}")]
    MalformedResponse { raw: String },

    #[error("{0}")]
    BusinessRule(String),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            Error::Http { .. } | Error::Timeout(_) | Error::Transport(_) => 3,
            Error::Generation(_) | Error::MalformedResponse { .. } => 4,
            Error::BusinessRule(_) => 5,
            Error::Io { .. } | Error::Json(_) => 1,
        }
    }

    /// Configuration and business-rule failures are expected operator errors;
    /// everything else is reported as unexpected.
    pub fn is_expected(&self) -> bool {
        matches!(self, Error::Config(_) | Error::BusinessRule(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        let url = e
            .url()
            .map(|u| format!("{}{}", u.origin().ascii_serialization(), u.path()))
            .unwrap_or_default();
        if e.is_timeout() {
            Error::Timeout(url)
        } else if let Some(status) = e.status() {
            Error::Http {
                status: status.as_u16(),
                url,
            }
        } else {
            Error::Transport(e.without_url().to_string())
        }
    }
}
