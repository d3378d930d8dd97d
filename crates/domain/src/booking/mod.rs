mod materialization;
mod state_machine;

pub use materialization::{compose_description, is_valid_guest_email};
pub use state_machine::{
    create_status, validate_approve, validate_cancel, validate_create_time, validate_reject,
    validate_reschedule, BookingStateError,
};
