use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{CalendarConnectionId, HostId, LocationType, TemplateId};
use sqlx::FromRow;

/// A bookable meeting type, owned by a host (spec §3). `durations_minutes`
/// lists the invitee-selectable lengths; `availability_rules` is the raw
/// JSON parsed by `domain::availability::AvailabilityRules::parse`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MeetingTemplate {
    pub id: TemplateId,
    pub host_id: HostId,
    pub slug: String,
    pub durations_minutes: Vec<i32>,
    pub location_type: LocationType,
    pub custom_location: Option<String>,
    pub calendar_id: Option<CalendarConnectionId>,
    pub requires_approval: bool,
    pub min_notice_minutes: i32,
    pub max_schedule_days: i32,
    pub pre_buffer_minutes: i32,
    pub post_buffer_minutes: i32,
    pub availability_rules: Option<serde_json::Value>,
    pub is_active: bool,
    pub is_private: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeetingTemplate {
    pub host_id: HostId,
    pub slug: String,
    pub durations_minutes: Vec<i32>,
    pub location_type: LocationType,
    pub custom_location: Option<String>,
    pub calendar_id: Option<CalendarConnectionId>,
    pub requires_approval: bool,
    pub min_notice_minutes: i32,
    pub max_schedule_days: i32,
    pub pre_buffer_minutes: i32,
    pub post_buffer_minutes: i32,
    pub availability_rules: Option<serde_json::Value>,
    pub is_private: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateMeetingTemplate {
    pub durations_minutes: Option<Vec<i32>>,
    pub location_type: Option<LocationType>,
    pub custom_location: Option<String>,
    pub calendar_id: Option<CalendarConnectionId>,
    pub requires_approval: Option<bool>,
    pub min_notice_minutes: Option<i32>,
    pub max_schedule_days: Option<i32>,
    pub pre_buffer_minutes: Option<i32>,
    pub post_buffer_minutes: Option<i32>,
    pub availability_rules: Option<serde_json::Value>,
    pub is_active: Option<bool>,
    pub is_private: Option<bool>,
    pub description: Option<String>,
}
