use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Region '{culture_code}' does not support the netinfo feed")]
    UnsupportedRegion { culture_code: String },

    #[error("Remote error: {0}")]
    RemoteError(#[from] ResponseError),

    #[error("Malformed feed: {0}")]
    MalformedFeed(#[from] DataError),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    pub fn unsupported_region(culture_code: impl Into<String>) -> Self {
        Self::UnsupportedRegion {
            culture_code: culture_code.into(),
        }
    }

    pub fn is_unsupported_region(&self) -> bool {
        matches!(self, Self::UnsupportedRegion { .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteError(_))
    }

    pub fn is_malformed_feed(&self) -> bool {
        matches!(self, Self::MalformedFeed(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteError(ResponseError::Request(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedFeed(DataError::Json(err))
    }
}

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
}

impl ResponseError {
    pub fn http_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Request(err) => err.status(),
            Self::HttpStatus { status, .. } => Some(*status),
        }
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown {entity}: '{value}'")]
    UnknownValue { entity: &'static str, value: String },

    #[error("Invalid date in field '{field}': {source}")]
    InvalidDate {
        field: &'static str,
        #[source]
        source: DateTimeError,
    },
}

impl DataError {
    pub fn unknown_value(entity: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            entity,
            value: value.into(),
        }
    }

    pub fn invalid_date(field: &'static str, source: DateTimeError) -> Self {
        Self::InvalidDate { field, source }
    }
}

#[derive(Debug, Error)]
pub enum DateTimeError {
    #[error("Failed to parse date '{input}': {reason}")]
    ParseError { input: String, reason: String },

    #[error("Local time '{input}' does not exist in {timezone}")]
    NonexistentLocalTime { input: String, timezone: String },
}

impl DateTimeError {
    pub fn parse_error(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
