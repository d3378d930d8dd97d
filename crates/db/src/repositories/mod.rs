mod audit_log_repo;
mod booking_repo;
mod calendar_connection_repo;
mod conferencing_connection_repo;
mod host_repo;
mod meeting_template_repo;
mod session_repo;
mod signup_conversion_repo;
mod template_host_repo;
mod tenant_repo;
mod working_hours_repo;

pub use audit_log_repo::AuditLogRepository;
pub use booking_repo::BookingRepository;
pub use calendar_connection_repo::CalendarConnectionRepository;
pub use conferencing_connection_repo::ConferencingConnectionRepository;
pub use host_repo::HostRepository;
pub use meeting_template_repo::MeetingTemplateRepository;
pub use session_repo::SessionRepository;
pub use signup_conversion_repo::SignupConversionRepository;
pub use template_host_repo::TemplateHostRepository;
pub use tenant_repo::TenantRepository;
pub use working_hours_repo::WorkingHoursRepository;
