use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::svix::SignatureError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing svix headers")]
    MissingHeaders,
    #[error("signature verification failed: {0}")]
    Signature(#[from] SignatureError),
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    #[error("{action} failed: {source}")]
    Persistence {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl AppError {
    pub fn persistence(action: &'static str, source: sqlx::Error) -> Self {
        AppError::Persistence { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingHeaders | AppError::Signature(_) | AppError::MalformedEvent(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::MissingHeaders => "Error occured -- no svix headers".to_string(),
            AppError::Signature(_) => "Error occured".to_string(),
            AppError::MalformedEvent(_) => "Error occured -- malformed event".to_string(),
            AppError::Persistence { action, .. } => format!("Error {action}"),
        };

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn client_errors_map_to_bad_request() {
        assert_eq!(
            render(AppError::MissingHeaders).await,
            (StatusCode::BAD_REQUEST, "Error occured -- no svix headers".into())
        );
        assert_eq!(
            render(SignatureError::NoMatchingSignature.into()).await,
            (StatusCode::BAD_REQUEST, "Error occured".into())
        );
        assert_eq!(
            render(AppError::MalformedEvent("no id".into())).await.0,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn persistence_errors_name_the_action() {
        let err = AppError::persistence("creating user", sqlx::Error::PoolClosed);
        assert_eq!(
            render(err).await,
            (StatusCode::INTERNAL_SERVER_ERROR, "Error creating user".into())
        );
    }
}
