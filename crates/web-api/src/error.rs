use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.body.code
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::ApplicationError as AppErr;
        use domain::DomainError;

        match error {
            // 连接流程的业务失败统一 400，和线上既有客户端的约定保持一致
            AppErr::Domain(err @ DomainError::SelfRequest) => {
                ApiError::new(StatusCode::BAD_REQUEST, "SELF_REQUEST", err.to_string())
            }
            AppErr::Domain(err @ DomainError::AlreadyConnected) => {
                ApiError::new(StatusCode::BAD_REQUEST, "ALREADY_CONNECTED", err.to_string())
            }
            AppErr::Domain(err @ DomainError::DuplicateRequest) => {
                ApiError::new(StatusCode::BAD_REQUEST, "DUPLICATE_REQUEST", err.to_string())
            }
            AppErr::Domain(err @ DomainError::RequestNotFound) => {
                ApiError::new(StatusCode::BAD_REQUEST, "REQUEST_NOT_FOUND", err.to_string())
            }
            AppErr::Domain(err @ DomainError::AlreadyProcessed) => {
                ApiError::new(StatusCode::BAD_REQUEST, "ALREADY_PROCESSED", err.to_string())
            }
            AppErr::Domain(err @ DomainError::NotReceiver) => {
                ApiError::new(StatusCode::FORBIDDEN, "UNAUTHORIZED_ACTION", err.to_string())
            }
            AppErr::Domain(err @ DomainError::PostNotFound) => {
                ApiError::new(StatusCode::NOT_FOUND, "POST_NOT_FOUND", err.to_string())
            }
            AppErr::Domain(err @ DomainError::UserNotFound) => {
                ApiError::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND", err.to_string())
            }
            AppErr::Domain(DomainError::Validation { field, message }) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT",
                format!("{}: {}", field, message),
            ),
            AppErr::Repository(repo_err) => match repo_err {
                domain::RepositoryError::NotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "requested resource not found",
                ),
                domain::RepositoryError::Conflict => {
                    ApiError::new(StatusCode::CONFLICT, "CONFLICT", "resource already exists")
                }
                domain::RepositoryError::Storage { message } => ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    format!("database error: {}", message),
                ),
            },
            AppErr::Media(message) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "MEDIA_ERROR",
                format!("media error: {}", message),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{DomainError, RepositoryError};

    #[test]
    fn connection_flow_failures_map_to_400() {
        for err in [
            DomainError::SelfRequest,
            DomainError::AlreadyConnected,
            DomainError::DuplicateRequest,
            DomainError::RequestNotFound,
            DomainError::AlreadyProcessed,
        ] {
            let api = ApiError::from(ApplicationError::Domain(err));
            assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn not_receiver_maps_to_403() {
        let api = ApiError::from(ApplicationError::Domain(DomainError::NotReceiver));
        assert_eq!(api.status(), StatusCode::FORBIDDEN);
        assert_eq!(api.code(), "UNAUTHORIZED_ACTION");
    }

    #[test]
    fn post_not_found_maps_to_404() {
        let api = ApiError::from(ApplicationError::Domain(DomainError::PostNotFound));
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let api = ApiError::from(ApplicationError::Repository(RepositoryError::storage(
            "connection refused",
        )));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code(), "DATABASE_ERROR");
    }
}
