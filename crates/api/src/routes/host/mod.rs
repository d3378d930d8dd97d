pub mod bookings;
pub mod calendar_connections;
pub mod conferencing_connections;
pub mod sessions;
pub mod templates;
pub mod working_hours;
