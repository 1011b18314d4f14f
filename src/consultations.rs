//! Consultation records: the clinical note a prescription is printed from.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::{Consultation, MedicationLine};

const MAX_MEDICATIONS: usize = 30;

/// Consultation form payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub patient_id: String,
    pub date: String, // YYYY-MM-DD
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub medications: Vec<MedicationLine>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub next_visit: Option<String>, // YYYY-MM-DD
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid {field} format. Use YYYY-MM-DD"))
}

/// Validates the form into an unsaved record for `user_id`.
pub fn consultation_from_request(
    user_id: &Uuid,
    request: &ConsultationRequest,
) -> Result<Consultation, String> {
    let patient_id = Uuid::parse_str(&request.patient_id)
        .map_err(|_| format!("Invalid patient id: {}", request.patient_id))?;
    let date = parse_date(&request.date, "date")?;

    let next_visit = match clean(&request.next_visit) {
        Some(raw) => {
            let next = parse_date(&raw, "next visit")?;
            if next < date {
                return Err("Next visit cannot be before the consultation date".into());
            }
            Some(next)
        }
        None => None,
    };

    if request.medications.len() > MAX_MEDICATIONS {
        return Err(format!("Too many medications (max {MAX_MEDICATIONS})"));
    }
    let medications = request
        .medications
        .iter()
        .filter(|m| !m.name.trim().is_empty())
        .map(|m| MedicationLine {
            name: m.name.trim().to_string(),
            dose: m.dose.trim().to_string(),
            frequency: m.frequency.trim().to_string(),
            duration: m.duration.trim().to_string(),
        })
        .collect();

    Ok(Consultation {
        id: Uuid::new_v4(),
        user_id: *user_id,
        patient_id,
        date,
        reason: request.reason.trim().to_string(),
        diagnosis: clean(&request.diagnosis),
        treatment: clean(&request.treatment),
        medications,
        notes: clean(&request.notes),
        next_visit,
    })
}

/// Stores a consultation after checking the patient belongs to its doctor.
pub fn create_consultation(
    conn: &Connection,
    consultation: &Consultation,
) -> Result<(), DatabaseError> {
    match db::get_patient(conn, &consultation.patient_id)? {
        Some(p) if p.user_id == consultation.user_id => {}
        _ => return Err(DatabaseError::not_found("Patient", consultation.patient_id)),
    }
    db::insert_consultation(conn, consultation)?;
    tracing::info!(
        consultation_id = %consultation.id,
        medications = consultation.medications.len(),
        "Consultation recorded"
    );
    Ok(())
}

pub fn list_consultations(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Consultation>, DatabaseError> {
    db::list_consultations_for_patient(conn, patient_id)
}

pub fn delete_consultation(conn: &Connection, consultation_id: &Uuid) -> Result<(), DatabaseError> {
    db::delete_consultation(conn, consultation_id)?;
    tracing::info!(%consultation_id, "Consultation deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;
    use crate::db::sqlite::open_memory_database;

    fn med(name: &str) -> MedicationLine {
        MedicationLine {
            name: name.into(),
            dose: " 500 mg ".into(),
            frequency: "cada 8 h".into(),
            duration: "5 días".into(),
        }
    }

    fn request(patient_id: Uuid) -> ConsultationRequest {
        ConsultationRequest {
            patient_id: patient_id.to_string(),
            date: "2024-03-20".into(),
            reason: " Fiebre ".into(),
            diagnosis: Some("Faringitis".into()),
            medications: vec![med("Amoxicilina"), med("   ")],
            next_visit: Some("2024-03-27".into()),
            ..Default::default()
        }
    }

    #[test]
    fn request_is_normalised() {
        let user_id = Uuid::new_v4();
        let c = consultation_from_request(&user_id, &request(Uuid::new_v4())).unwrap();
        assert_eq!(c.reason, "Fiebre");
        assert_eq!(c.medications.len(), 1);
        assert_eq!(c.medications[0].dose, "500 mg");
        assert_eq!(c.next_visit, NaiveDate::from_ymd_opt(2024, 3, 27));
        assert_eq!(c.treatment, None);
    }

    #[test]
    fn request_rejects_bad_dates() {
        let user_id = Uuid::new_v4();
        let mut r = request(Uuid::new_v4());
        r.date = "20/03/2024".into();
        assert!(consultation_from_request(&user_id, &r).is_err());

        let mut r = request(Uuid::new_v4());
        r.next_visit = Some("2024-03-01".into());
        assert!(consultation_from_request(&user_id, &r)
            .unwrap_err()
            .contains("Next visit"));

        let mut r = request(Uuid::new_v4());
        r.patient_id = "abc".into();
        assert!(consultation_from_request(&user_id, &r).is_err());
    }

    #[test]
    fn create_checks_patient_owner() {
        let conn = open_memory_database().unwrap();
        let doctor = fixtures::seeded_doctor(&conn);
        let patient = fixtures::seeded_patient(&conn, doctor.id, "Ana");

        let c = consultation_from_request(&doctor.id, &request(patient.id)).unwrap();
        create_consultation(&conn, &c).unwrap();
        assert_eq!(list_consultations(&conn, &patient.id).unwrap(), vec![c.clone()]);

        let stranger = consultation_from_request(&Uuid::new_v4(), &request(patient.id)).unwrap();
        assert!(create_consultation(&conn, &stranger).is_err());

        delete_consultation(&conn, &c.id).unwrap();
        assert!(list_consultations(&conn, &patient.id).unwrap().is_empty());
    }
}
