use thiserror::Error;

/// Errors surfaced by calendar/conferencing provider adapters.
/// Callers map `Auth` onto the sync-status `failed` state and the
/// `auth_failed` API error kind; `Provider`/`Http`/`Parse` map onto
/// `provider_error`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed. Please reconnect your calendar.")]
    Auth,

    #[error("provider request failed: {0}")]
    Provider(String),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("unsupported provider")]
    Unsupported,
}

pub type ProviderResult<T> = Result<T, ProviderError>;
