pub mod calendar;
pub mod conferencing;
pub mod email;
pub mod error;

pub use calendar::CalendarAdapter;
pub use email::{EmailPort, LoggingEmailSink};
pub use error::{ProviderError, ProviderResult};
