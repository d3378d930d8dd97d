use super::DomainError;
use thiserror::Error;

/// Application-level errors (includes infrastructure), classified
/// into the API-boundary taxonomy from the scheduling kernel spec:
/// `not_found`, `conflict`, `invalid_input`, `auth_failed`,
/// `provider_error`, `transient`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External provider error: {0}")]
    ProviderError(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Domain(e) => match e {
                DomainError::TenantNotFound(_)
                | DomainError::HostNotFound(_)
                | DomainError::TemplateNotFound(_)
                | DomainError::BookingNotFound(_)
                | DomainError::CalendarConnectionNotFound(_)
                | DomainError::ConferencingConnectionNotFound(_) => 404,

                DomainError::SlugAlreadyExists(_)
                | DomainError::EmailAlreadyExists
                | DomainError::PoolFull
                | DomainError::BookingNotPending
                | DomainError::BookingAlreadyCancelled => 409,

                DomainError::HostNotInTenant
                | DomainError::OwnerRemovalForbidden
                | DomainError::BookingNotReschedulable
                | DomainError::InvalidBookingTime(_)
                | DomainError::TemplateInactive
                | DomainError::InvalidSelectionToken
                | DomainError::UnsupportedProvider => 422,

                DomainError::InvalidSession
                | DomainError::CalendarAuthFailed
                | DomainError::ConferencingAuthFailed => 401,

                DomainError::CalendarProviderError(_)
                | DomainError::ConferencingProviderError(_) => 502,
            },
            AppError::Database(_) | AppError::Internal(_) => 500,
            AppError::ProviderError(_) => 502,
            AppError::Unauthorized => 401,
            AppError::NotFound(_) => 404,
            AppError::InvalidInput(_) => 422,
        }
    }

    /// Machine-readable error kind for the API error-response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Domain(e) => match e {
                DomainError::TenantNotFound(_)
                | DomainError::HostNotFound(_)
                | DomainError::TemplateNotFound(_)
                | DomainError::BookingNotFound(_)
                | DomainError::CalendarConnectionNotFound(_)
                | DomainError::ConferencingConnectionNotFound(_) => "not_found",

                DomainError::SlugAlreadyExists(_)
                | DomainError::EmailAlreadyExists
                | DomainError::PoolFull
                | DomainError::BookingNotPending
                | DomainError::BookingAlreadyCancelled => "conflict",

                DomainError::HostNotInTenant
                | DomainError::OwnerRemovalForbidden
                | DomainError::BookingNotReschedulable
                | DomainError::InvalidBookingTime(_)
                | DomainError::TemplateInactive
                | DomainError::InvalidSelectionToken
                | DomainError::UnsupportedProvider => "invalid_input",

                DomainError::InvalidSession
                | DomainError::CalendarAuthFailed
                | DomainError::ConferencingAuthFailed => "auth_failed",

                DomainError::CalendarProviderError(_)
                | DomainError::ConferencingProviderError(_) => "provider_error",
            },
            AppError::Database(_) => "transient",
            AppError::ProviderError(_) => "provider_error",
            AppError::Unauthorized => "auth_failed",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Internal(_) => "transient",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
