use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use parley_core::Error;

/// Maps core errors onto HTTP responses.
///
/// Validation failures are the client's fault (400); a failing endpoint is a
/// bad gateway (502); a cancelled call gets the nonstandard 499 the reverse
/// proxies use for "client closed request".
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Inference { .. } => StatusCode::BAD_GATEWAY,
            Error::Cancelled => {
                StatusCode::from_u16(499).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        };

        match &self.0 {
            Error::Validation(_) => warn!(error = %self.0, "rejecting request"),
            _ => error!(error = %self.0, "request failed"),
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_distinguish_the_error_classes() {
        let cases = [
            (Error::validation("empty"), 400),
            (Error::config("missing model name"), 500),
            (
                Error::Inference {
                    status: Some(503),
                    message: "unavailable".to_string(),
                },
                502,
            ),
            (Error::Cancelled, 499),
        ];

        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status().as_u16(), expected);
        }
    }
}
