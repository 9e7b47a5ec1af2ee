use crate::context;
use crate::i18n::LocaleStrings;
use crate::resources::FieldErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `{ message, errors? }`, plus `debug` in non-production configurations.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ctx = context::current();
        let strings = LocaleStrings::for_locale(ctx.locale);
        let status = self.status();

        let body = match self {
            ApiError::BadRequest(detail) => ErrorBody {
                message: strings.bad_request.to_string(),
                errors: Some(FieldErrors::from([("body".to_string(), vec![detail])])),
                debug: None,
            },
            ApiError::Unauthorized => message_only(strings.unauthorized),
            ApiError::Forbidden => message_only(strings.forbidden),
            ApiError::NotFound(_) => message_only(strings.not_found),
            ApiError::Validation(errors) => ErrorBody {
                message: strings.validation_failed.to_string(),
                errors: Some(errors),
                debug: None,
            },
            ApiError::Unexpected(err) => {
                error!("Unexpected error: {:#}", err);
                ErrorBody {
                    message: strings.server_error.to_string(),
                    errors: None,
                    debug: ctx.debug.then(|| format!("{:#}", err)),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

fn message_only(message: &str) -> ErrorBody {
    ErrorBody {
        message: message.to_string(),
        errors: None,
        debug: None,
    }
}
