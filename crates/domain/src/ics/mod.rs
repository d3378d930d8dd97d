mod decode;
mod encode;

pub use decode::{decode_ics, IcsEvent};
pub use encode::{encode_booking_ics, IcsBookingEvent};
