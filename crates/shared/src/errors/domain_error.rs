use thiserror::Error;

/// Domain-level errors representing scheduling-kernel business rule
/// violations. Each variant is pre-classified into the API-boundary
/// taxonomy (`not_found`, `conflict`, `invalid_input`, `auth_failed`,
/// `provider_error`, `transient`) by `AppError::status_code`/`error_code`.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Meeting template not found: {0}")]
    TemplateNotFound(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Calendar connection not found: {0}")]
    CalendarConnectionNotFound(String),

    #[error("Conferencing connection not found: {0}")]
    ConferencingConnectionNotFound(String),

    #[error("Tenant slug already exists: {0}")]
    SlugAlreadyExists(String),

    #[error("Host email already registered in this tenant")]
    EmailAlreadyExists,

    #[error("Host is not a member of this tenant")]
    HostNotInTenant,

    #[error("Template host pool is full (maximum 5)")]
    PoolFull,

    #[error("Cannot remove the owner from a template's host pool")]
    OwnerRemovalForbidden,

    #[error("Booking is not in pending status")]
    BookingNotPending,

    #[error("Booking is already cancelled")]
    BookingAlreadyCancelled,

    #[error("Booking cannot be rescheduled in its current state")]
    BookingNotReschedulable,

    #[error("Invalid booking time: {0}")]
    InvalidBookingTime(String),

    #[error("Meeting template is not active")]
    TemplateInactive,

    #[error("Invalid or expired selection token")]
    InvalidSelectionToken,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Calendar authentication failed; reconnect your calendar")]
    CalendarAuthFailed,

    #[error("Conferencing authentication failed; reconnect your account")]
    ConferencingAuthFailed,

    #[error("Calendar provider request failed: {0}")]
    CalendarProviderError(String),

    #[error("Conferencing provider request failed: {0}")]
    ConferencingProviderError(String),

    #[error("Unsupported calendar provider")]
    UnsupportedProvider,
}
