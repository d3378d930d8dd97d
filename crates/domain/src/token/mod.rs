mod booking_token;
mod selection;

pub use booking_token::generate_booking_token;
pub use selection::{issue_selection_token, verify_selection_token, SelectionTokenError};
