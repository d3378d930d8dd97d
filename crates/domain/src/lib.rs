pub mod availability;
pub mod booking;
pub mod ics;
pub mod token;

pub use availability::*;
pub use booking::*;
pub use ics::*;
pub use token::*;
