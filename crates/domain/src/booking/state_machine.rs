use chrono::{DateTime, Duration, Utc};
use shared::types::BookingStatus;
use thiserror::Error;

/// Pure booking lifecycle errors (spec §4.3). The caller maps these
/// onto `DomainError`/`AppError` at the persistence/API boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingStateError {
    #[error("booking is not pending")]
    NotPending,
    #[error("booking is already cancelled")]
    AlreadyCancelled,
    #[error("booking cannot be rescheduled in its current state")]
    NotReschedulable,
    #[error("start time is before the minimum notice period")]
    InsufficientNotice,
}

/// Status a freshly created booking starts in.
pub fn create_status(requires_approval: bool) -> BookingStatus {
    if requires_approval {
        BookingStatus::Pending
    } else {
        BookingStatus::Confirmed
    }
}

/// `start ≥ now + min_notice` at create/reschedule time.
pub fn validate_create_time(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    min_notice_minutes: i32,
) -> Result<(), BookingStateError> {
    if start >= now + Duration::minutes(min_notice_minutes as i64) {
        Ok(())
    } else {
        Err(BookingStateError::InsufficientNotice)
    }
}

/// Approve requires `status = pending`; transitions to `confirmed`.
pub fn validate_approve(current: BookingStatus) -> Result<BookingStatus, BookingStateError> {
    match current {
        BookingStatus::Pending => Ok(BookingStatus::Confirmed),
        _ => Err(BookingStateError::NotPending),
    }
}

/// Reject requires `status = pending`; transitions to `rejected`.
pub fn validate_reject(current: BookingStatus) -> Result<BookingStatus, BookingStateError> {
    match current {
        BookingStatus::Pending => Ok(BookingStatus::Rejected),
        _ => Err(BookingStateError::NotPending),
    }
}

/// Cancel is allowed from `pending` or `confirmed`; idempotent-guarded
/// against an already-`cancelled` or `rejected` booking.
pub fn validate_cancel(current: BookingStatus) -> Result<BookingStatus, BookingStateError> {
    match current {
        BookingStatus::Pending | BookingStatus::Confirmed => Ok(BookingStatus::Cancelled),
        BookingStatus::Cancelled => Err(BookingStateError::AlreadyCancelled),
        BookingStatus::Rejected => Err(BookingStateError::AlreadyCancelled),
    }
}

/// Reschedule is permitted only from `pending` or `confirmed`, and
/// stays in the same state.
pub fn validate_reschedule(current: BookingStatus) -> Result<BookingStatus, BookingStateError> {
    match current {
        BookingStatus::Pending | BookingStatus::Confirmed => Ok(current),
        _ => Err(BookingStateError::NotReschedulable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn create_status_honors_requires_approval() {
        assert_eq!(create_status(true), BookingStatus::Pending);
        assert_eq!(create_status(false), BookingStatus::Confirmed);
    }

    #[test]
    fn approve_only_from_pending() {
        assert_eq!(validate_approve(BookingStatus::Pending), Ok(BookingStatus::Confirmed));
        assert_eq!(
            validate_approve(BookingStatus::Confirmed),
            Err(BookingStateError::NotPending)
        );
    }

    #[test]
    fn reject_only_from_pending() {
        assert_eq!(validate_reject(BookingStatus::Pending), Ok(BookingStatus::Rejected));
        assert!(validate_reject(BookingStatus::Cancelled).is_err());
    }

    #[test]
    fn cancel_from_pending_or_confirmed() {
        assert_eq!(validate_cancel(BookingStatus::Pending), Ok(BookingStatus::Cancelled));
        assert_eq!(validate_cancel(BookingStatus::Confirmed), Ok(BookingStatus::Cancelled));
    }

    #[test]
    fn double_cancel_is_idempotent_guarded() {
        assert_eq!(
            validate_cancel(BookingStatus::Cancelled),
            Err(BookingStateError::AlreadyCancelled)
        );
    }

    #[test]
    fn reschedule_forbidden_when_terminal() {
        assert!(validate_reschedule(BookingStatus::Rejected).is_err());
        assert!(validate_reschedule(BookingStatus::Cancelled).is_err());
        assert_eq!(
            validate_reschedule(BookingStatus::Confirmed),
            Ok(BookingStatus::Confirmed)
        );
    }

    #[test]
    fn create_time_respects_min_notice() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert!(validate_create_time(now + Duration::hours(2), now, 60).is_ok());
        assert!(validate_create_time(now + Duration::minutes(30), now, 60).is_err());
    }
}
