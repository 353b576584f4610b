//! Service error taxonomy and its HTTP mapping.

use std::collections::BTreeMap;

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::functional::validation_rules::ValidationError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Diagnostic context attached to an error. Logged, never sent to clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub tags: Vec<String>,
    pub detail: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl ErrorContext {
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more field rules failed; nothing reached storage.
    #[error("request failed validation with {} violation(s)", .errors.len())]
    Validation { errors: Vec<ValidationError> },

    /// The caller's origin is not allowed on this route.
    #[error("{message}")]
    Forbidden {
        message: String,
        context: ErrorContext,
    },

    /// A derived constraint failed, e.g. an effective end date before the start date.
    #[error("{message}")]
    BadRequest {
        message: String,
        context: ErrorContext,
    },

    /// No route for the method and path.
    #[error("{message}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// The storage collaborator failed.
    #[error("{message}")]
    InternalServerError {
        message: String,
        context: ErrorContext,
    },
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    errors: &'a [ValidationError],
}

impl ServiceError {
    pub fn validation(errors: Vec<ValidationError>) -> Self {
        ServiceError::Validation { errors }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ServiceError::InternalServerError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ServiceError::Validation { .. } => None,
            ServiceError::Forbidden { context, .. }
            | ServiceError::BadRequest { context, .. }
            | ServiceError::NotFound { context, .. }
            | ServiceError::InternalServerError { context, .. } => Some(context),
        }
    }

    /// Rewrites the diagnostic context. Validation errors carry none and pass through.
    pub fn with_context<F>(self, f: F) -> Self
    where
        F: FnOnce(ErrorContext) -> ErrorContext,
    {
        match self {
            ServiceError::Validation { errors } => ServiceError::Validation { errors },
            ServiceError::Forbidden { message, context } => ServiceError::Forbidden {
                message,
                context: f(context),
            },
            ServiceError::BadRequest { message, context } => ServiceError::BadRequest {
                message,
                context: f(context),
            },
            ServiceError::NotFound { message, context } => ServiceError::NotFound {
                message,
                context: f(context),
            },
            ServiceError::InternalServerError { message, context } => {
                ServiceError::InternalServerError {
                    message,
                    context: f(context),
                }
            }
        }
    }

    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.with_context(|ctx| ctx.with_tag(tag))
    }

    pub fn with_detail(self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.with_context(|ctx| ctx.with_detail(detail))
    }

    pub fn violations(&self) -> Option<&[ValidationError]> {
        match self {
            ServiceError::Validation { errors } => Some(errors),
            _ => None,
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } | ServiceError::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            ServiceError::Validation { errors } => builder.json(ValidationBody { errors }),
            _ => builder
                .insert_header(ContentType::plaintext())
                .body(self.to_string()),
        }
    }
}

/// Logging pass-through for service results.
pub trait FunctionalErrorHandling<T> {
    fn log_error(self, operation: &str) -> ServiceResult<T>;
}

impl<T> FunctionalErrorHandling<T> for ServiceResult<T> {
    fn log_error(self, operation: &str) -> ServiceResult<T> {
        if let Err(error) = &self {
            match error.context() {
                Some(context) => log::error!(
                    "{} failed: {} (tags: {:?}, detail: {:?}, metadata: {:?})",
                    operation,
                    error,
                    context.tags,
                    context.detail,
                    context.metadata
                ),
                None => log::error!("{} failed: {}", operation, error),
            }
        }
        self
    }
}
