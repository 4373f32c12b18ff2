use http::StatusCode;
use user_token::{PoolError, StoreError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Map store failures to status codes
///
/// Timeouts and a closed pool are transient from the client's point of view;
/// everything else is a server fault.
impl<T> IntoResponseError<T> for Result<T, StoreError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                StoreError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Pool(PoolError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::error!(error = %e, status = %status, "Request failed on a store error");
            (status, e.to_string())
        })
    }
}
