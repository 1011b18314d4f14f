use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub patient_id: Uuid,
    /// Seconds are always zero.
    pub scheduled_at: NaiveDateTime,
    pub reason: String,
    pub status: AppointmentStatus,
}
