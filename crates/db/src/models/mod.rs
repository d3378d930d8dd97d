mod audit_log;
mod booking;
mod calendar_connection;
mod conferencing_connection;
mod host;
mod meeting_template;
mod session;
mod signup_conversion;
mod template_host;
mod tenant;
mod working_hours;

pub use audit_log::*;
pub use booking::*;
pub use calendar_connection::*;
pub use conferencing_connection::*;
pub use host::*;
pub use meeting_template::*;
pub use session::*;
pub use signup_conversion::*;
pub use template_host::*;
pub use tenant::*;
pub use working_hours::*;
