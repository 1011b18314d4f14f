use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One prescribed medication line. Stored as JSON inside the consultation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationLine {
    pub name: String,
    #[serde(default)]
    pub dose: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Vec<MedicationLine>,
    pub notes: Option<String>,
    pub next_visit: Option<NaiveDate>,
}
