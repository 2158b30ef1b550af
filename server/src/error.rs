use log::error;
use ntex::http::StatusCode;
use ntex::web::{HttpRequest, HttpResponse, WebResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed request fields
    #[error("{0}")]
    BadRequest(String),

    /// Query or connectivity failure. `context` is the message sent to the client.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl AppError {
    /// Error mapper for storage calls, `db.with_conn(..).map_err(AppError::storage(MSG))`
    pub fn storage(context: &'static str) -> impl FnOnce(rusqlite::Error) -> AppError {
        move |source| AppError::Storage { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg) => msg,
            AppError::Storage { context, .. } => context,
        }
    }
}

impl WebResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self, _: &HttpRequest) -> HttpResponse {
        if let AppError::Storage { .. } = self {
            error!("{}", self);
        }
        HttpResponse::build(self.status())
            .json(&serde_json::json!({ "message": self.message() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_keeps_context() {
        let err = AppError::storage("Erro ao salvar tempo")(rusqlite::Error::InvalidQuery);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Erro ao salvar tempo");
        assert!(err.to_string().starts_with("Erro ao salvar tempo: "));
    }
}
