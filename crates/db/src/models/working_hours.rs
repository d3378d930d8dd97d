use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use shared::types::{HostId, WorkingHoursId};
use sqlx::FromRow;

/// A host's recurring weekly availability window (spec §3).
/// `day_of_week` is `0 = Sunday`..`6 = Saturday`, matching
/// `AvailabilityRules`'s day-key convention.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WorkingHours {
    pub id: WorkingHoursId,
    pub host_id: HostId,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkingHours {
    pub host_id: HostId,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateWorkingHours {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub enabled: Option<bool>,
}
