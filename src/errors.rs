use axum::{http::StatusCode, Json};
use serde::Serialize;
use std::fmt;

/// Why a backend call failed.
#[derive(Debug)]
pub enum GatewayError {
    /// The request never completed.
    Network {
        operation: &'static str,
        source: reqwest::Error,
    },
    /// The backend answered with a non-2xx status.
    Server {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
    /// The response body did not have the expected shape.
    DataShape {
        operation: &'static str,
        source: serde_json::Error,
    },
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Network { .. } => "network_failure",
            GatewayError::Server { .. } => "server_error",
            GatewayError::DataShape { .. } => "data_shape",
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Network { operation, source } => {
                write!(f, "{operation}: backend unreachable ({source})")
            }
            GatewayError::Server { operation, status, body } if body.is_empty() => {
                write!(f, "{operation}: backend returned {status}")
            }
            GatewayError::Server { operation, status, body } => {
                write!(f, "{operation}: backend returned {status}: {body}")
            }
            GatewayError::DataShape { operation, source } => {
                write!(f, "{operation}: unexpected response ({source})")
            }
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Network { source, .. } => Some(source),
            GatewayError::Server { .. } => None,
            GatewayError::DataShape { source, .. } => Some(source),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    message: &'a str,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "bad_request",
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            kind: "not_found",
            message: message.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            kind: self.kind,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_map_to_bad_gateway() {
        let err = AppError::from(GatewayError::Server {
            operation: "list stories",
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        });
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.kind, "server_error");
        assert_eq!(err.message, "list stories: backend returned 500 Internal Server Error: boom");
    }

    #[test]
    fn data_shape_errors_keep_their_kind() {
        let source = serde_json::from_str::<u64>("\"x\"").unwrap_err();
        let err = AppError::from(GatewayError::DataShape {
            operation: "create story",
            source,
        });
        assert_eq!(err.kind, "data_shape");
        assert!(err.message.starts_with("create story: unexpected response"));
    }
}
