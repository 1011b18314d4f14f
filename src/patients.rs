//! Patient registry: form payloads, validation and list projection.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::age;
use crate::db::{self, DatabaseError};
use crate::models::Patient;

/// Form payload for creating or editing a patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientRequest {
    pub name: String,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>, // YYYY-MM-DD
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub insurance: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Patient row for the registry list, with the age already computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientListItem {
    pub id: String,
    pub name: String,
    pub document_id: Option<String>,
    pub birth_date: Option<String>,
    pub age_years: Option<u32>,
    pub insurance: Option<String>,
    pub phone: Option<String>,
}

/// Validated, normalised patient fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientFields {
    pub name: String,
    pub document_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub insurance: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Checks a patient form. Blank optional fields become `None`.
pub fn validate_request(request: &PatientRequest, today: NaiveDate) -> Result<PatientFields, String> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err("Patient name is required".into());
    }
    if name.len() > 200 {
        return Err("Patient name too long (max 200 chars)".into());
    }

    let birth_date = match clean(&request.birth_date) {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| "Invalid birth date format. Use YYYY-MM-DD")?;
            if date > today {
                return Err("Birth date cannot be in the future".into());
            }
            Some(date)
        }
        None => None,
    };

    let email = clean(&request.email);
    if let Some(ref e) = email {
        if !e.contains('@') {
            return Err(format!("Invalid email: {e}"));
        }
    }

    let notes = clean(&request.notes);
    if notes.as_ref().is_some_and(|n| n.len() > 2000) {
        return Err("Notes must be 2000 characters or fewer".into());
    }

    Ok(PatientFields {
        name: name.to_string(),
        document_id: clean(&request.document_id),
        birth_date,
        gender: clean(&request.gender),
        phone: clean(&request.phone),
        email,
        insurance: clean(&request.insurance),
        address: clean(&request.address),
        notes,
    })
}

pub fn create_patient(
    conn: &Connection,
    user_id: &Uuid,
    fields: PatientFields,
) -> Result<Patient, DatabaseError> {
    if db::get_user(conn, user_id)?.is_none() {
        return Err(DatabaseError::not_found("User", user_id));
    }

    let patient = Patient {
        id: Uuid::new_v4(),
        user_id: *user_id,
        name: fields.name,
        document_id: fields.document_id,
        birth_date: fields.birth_date,
        gender: fields.gender,
        phone: fields.phone,
        email: fields.email,
        insurance: fields.insurance,
        address: fields.address,
        notes: fields.notes,
        created_at: db::now_seconds(),
    };
    db::insert_patient(conn, &patient)?;
    tracing::info!(patient_id = %patient.id, "Patient created");
    Ok(patient)
}

pub fn update_patient(
    conn: &Connection,
    patient_id: &Uuid,
    fields: PatientFields,
) -> Result<Patient, DatabaseError> {
    let stored = db::get_patient(conn, patient_id)?
        .ok_or_else(|| DatabaseError::not_found("Patient", patient_id))?;

    let patient = Patient {
        name: fields.name,
        document_id: fields.document_id,
        birth_date: fields.birth_date,
        gender: fields.gender,
        phone: fields.phone,
        email: fields.email,
        insurance: fields.insurance,
        address: fields.address,
        notes: fields.notes,
        ..stored
    };
    db::update_patient(conn, &patient)?;
    tracing::info!(%patient_id, "Patient updated");
    Ok(patient)
}

pub fn delete_patient(conn: &Connection, patient_id: &Uuid) -> Result<(), DatabaseError> {
    db::delete_patient(conn, patient_id)?;
    tracing::info!(%patient_id, "Patient deleted");
    Ok(())
}

/// Registry list for one doctor, ordered by name.
pub fn list_patients(
    conn: &Connection,
    user_id: &Uuid,
    today: NaiveDate,
) -> Result<Vec<PatientListItem>, DatabaseError> {
    let patients = db::list_patients_for_user(conn, user_id)?;
    Ok(patients
        .into_iter()
        .map(|p| PatientListItem {
            id: p.id.to_string(),
            age_years: age::displayable_years(age::compute_age(p.birth_date, today)),
            birth_date: p.birth_date.as_ref().map(db::format_date),
            name: p.name,
            document_id: p.document_id,
            insurance: p.insurance,
            phone: p.phone,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;
    use crate::db::sqlite::open_memory_database;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn request(name: &str) -> PatientRequest {
        PatientRequest {
            name: name.into(),
            birth_date: Some("1990-05-10".into()),
            insurance: Some("  ".into()),
            email: Some("ana@example.com".into()),
            ..Default::default()
        }
    }

    #[test]
    fn validation_trims_and_blanks() {
        let fields = validate_request(&request("  Ana Gómez "), today()).unwrap();
        assert_eq!(fields.name, "Ana Gómez");
        assert_eq!(fields.insurance, None);
        assert_eq!(fields.birth_date, NaiveDate::from_ymd_opt(1990, 5, 10));
    }

    #[test]
    fn validation_rejects_bad_input() {
        assert!(validate_request(&request("   "), today()).is_err());

        let mut bad_date = request("Ana");
        bad_date.birth_date = Some("10/05/1990".into());
        assert!(validate_request(&bad_date, today())
            .unwrap_err()
            .contains("YYYY-MM-DD"));

        let mut future = request("Ana");
        future.birth_date = Some("2030-01-01".into());
        assert!(validate_request(&future, today()).is_err());

        let mut bad_email = request("Ana");
        bad_email.email = Some("ana.example.com".into());
        assert!(validate_request(&bad_email, today()).is_err());
    }

    #[test]
    fn create_requires_existing_doctor() {
        let conn = open_memory_database().unwrap();
        let fields = validate_request(&request("Ana"), today()).unwrap();
        let err = create_patient(&conn, &Uuid::new_v4(), fields).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn create_update_list_delete() {
        let conn = open_memory_database().unwrap();
        let doctor = fixtures::seeded_doctor(&conn);

        let fields = validate_request(&request("Ana"), today()).unwrap();
        let created = create_patient(&conn, &doctor.id, fields).unwrap();
        assert_eq!(db::get_patient(&conn, &created.id).unwrap(), Some(created.clone()));
        fixtures::seeded_patient(&conn, doctor.id, "Bruno");

        let mut edit = request("Ana María");
        edit.insurance = Some("Swiss Medical".into());
        let fields = validate_request(&edit, today()).unwrap();
        let updated = update_patient(&conn, &created.id, fields).unwrap();
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.insurance.as_deref(), Some("Swiss Medical"));

        let list = list_patients(&conn, &doctor.id, today()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Ana María");
        assert_eq!(list[0].age_years, Some(33));
        assert_eq!(list[0].birth_date.as_deref(), Some("1990-05-10"));
        assert_eq!(list[1].name, "Bruno");

        delete_patient(&conn, &created.id).unwrap();
        assert_eq!(list_patients(&conn, &doctor.id, today()).unwrap().len(), 1);
    }

    #[test]
    fn infants_list_without_whole_years() {
        let conn = open_memory_database().unwrap();
        let doctor = fixtures::seeded_doctor(&conn);
        let mut baby = request("Bebé");
        baby.birth_date = Some("2023-12-01".into());
        let fields = validate_request(&baby, today()).unwrap();
        create_patient(&conn, &doctor.id, fields).unwrap();

        let list = list_patients(&conn, &doctor.id, today()).unwrap();
        assert_eq!(list[0].age_years, None);
    }

    #[test]
    fn update_missing_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        let fields = validate_request(&request("Ana"), today()).unwrap();
        assert!(update_patient(&conn, &Uuid::new_v4(), fields).is_err());
    }
}
