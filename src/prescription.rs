//! Printable prescription: view assembly, HTML rendering and file export.
//!
//! The document is a single self-contained HTML page (inline `<style>`, no
//! external assets besides optional logo URLs). Rendering is a pure function
//! of the view; the only clock input is the date used to compute the age,
//! fixed when the view is built.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::age;
use crate::db::{self, DatabaseError};
use crate::models::{Consultation, MedicationLine, Patient, User};

/// Shown where a patient field was never recorded.
pub const NOT_RECORDED: &str = "Sin registrar";
/// Shown where doctor data could not be resolved.
pub const PLACEHOLDER: &str = "...";

const DISPLAY_DATE: &str = "%d/%m/%Y";

// ─── Types ────────────────────────────────────────────────────────────────────

/// A linked record: either only its id, or the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Reference<T> {
    Id(Uuid),
    Expanded(T),
}

impl<T> Reference<T> {
    pub fn expanded(&self) -> Option<&T> {
        match self {
            Reference::Expanded(record) => Some(record),
            Reference::Id(_) => None,
        }
    }
}

/// Everything needed to print one consultation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionSource {
    pub consultation: Consultation,
    pub patient: Reference<Patient>,
    pub doctor: Reference<User>,
}

/// Read-only projection rendered into the document. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionView {
    pub patient_name: String,
    pub patient_insurance: String,
    pub patient_document: String,
    /// `None` when the birth date is unrecorded.
    pub patient_age: Option<f64>,
    pub doctor_title: String,
    pub doctor_name: String,
    pub doctor_speciality: String,
    pub doctor_license: String,
    pub doctor_phone: String,
    pub doctor_email: String,
    pub doctor_address: String,
    pub date: String,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Vec<MedicationLine>,
    pub notes: Option<String>,
    pub next_visit: Option<String>,
}

/// Title printed before the doctor's name.
pub fn doctor_title(gender: Option<&str>) -> &'static str {
    match gender {
        None => "",
        Some("male") => "Dr.",
        Some("female") => "Dra.",
        Some(_) => "Dr/a.",
    }
}

impl PrescriptionView {
    pub fn build(
        consultation: &Consultation,
        patient: &Reference<Patient>,
        doctor: &Reference<User>,
        today: NaiveDate,
    ) -> Self {
        let patient = patient.expanded();
        let doctor = doctor.expanded();

        Self {
            patient_name: patient.map_or_else(|| NOT_RECORDED.to_string(), |p| p.name.clone()),
            patient_insurance: or_not_recorded(patient.and_then(|p| p.insurance.as_deref())),
            patient_document: or_not_recorded(patient.and_then(|p| p.document_id.as_deref())),
            patient_age: age::compute_age(patient.and_then(|p| p.birth_date), today),
            doctor_title: doctor_title(doctor.and_then(|d| d.gender.as_deref())).to_string(),
            doctor_name: doctor.map_or_else(|| PLACEHOLDER.to_string(), |d| d.name.clone()),
            doctor_speciality: or_placeholder(doctor.and_then(|d| d.speciality.as_deref())),
            doctor_license: or_placeholder(doctor.and_then(|d| d.license_number.as_deref())),
            doctor_phone: or_placeholder(doctor.and_then(|d| d.phone.as_deref())),
            doctor_email: or_placeholder(doctor.map(|d| d.email.as_str())),
            doctor_address: or_placeholder(doctor.and_then(|d| d.address.as_deref())),
            date: consultation.date.format(DISPLAY_DATE).to_string(),
            reason: consultation.reason.clone(),
            diagnosis: non_blank(consultation.diagnosis.as_deref()),
            treatment: non_blank(consultation.treatment.as_deref()),
            medications: consultation
                .medications
                .iter()
                .filter(|m| !m.name.trim().is_empty())
                .cloned()
                .collect(),
            notes: non_blank(consultation.notes.as_deref()),
            next_visit: consultation
                .next_visit
                .map(|d| d.format(DISPLAY_DATE).to_string()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn or_not_recorded(value: Option<&str>) -> String {
    non_blank(value).unwrap_or_else(|| NOT_RECORDED.to_string())
}

fn or_placeholder(value: Option<&str>) -> String {
    non_blank(value).unwrap_or_else(|| PLACEHOLDER.to_string())
}

// ─── Loading ──────────────────────────────────────────────────────────────────

/// Loads a consultation with its patient and doctor. Linked records that no
/// longer exist stay as bare ids.
pub fn load_prescription_source(
    conn: &Connection,
    consultation_id: &Uuid,
) -> Result<PrescriptionSource, DatabaseError> {
    let consultation = db::get_consultation(conn, consultation_id)?
        .ok_or_else(|| DatabaseError::not_found("Consultation", consultation_id))?;

    let patient = match db::get_patient(conn, &consultation.patient_id)? {
        Some(p) => Reference::Expanded(p),
        None => Reference::Id(consultation.patient_id),
    };
    let doctor = match db::get_user(conn, &consultation.user_id)? {
        Some(u) => Reference::Expanded(u),
        None => Reference::Id(consultation.user_id),
    };

    Ok(PrescriptionSource {
        consultation,
        patient,
        doctor,
    })
}

/// Loads, projects and renders one consultation. The doctor's stored logo is
/// used when present.
pub fn render_for_consultation(
    conn: &Connection,
    consultation_id: &Uuid,
    today: NaiveDate,
    site_logo: Option<&str>,
) -> Result<String, DatabaseError> {
    let source = load_prescription_source(conn, consultation_id)?;
    let view = PrescriptionView::build(&source.consultation, &source.patient, &source.doctor, today);
    let doctor_logo = source.doctor.expanded().and_then(|d| d.logo_url.as_deref());
    Ok(render_prescription(&view, doctor_logo, site_logo))
}

// ─── Rendering ────────────────────────────────────────────────────────────────

const STYLE: &str = "
  @page { size: A5; margin: 12mm; }
  * { box-sizing: border-box; }
  body { font-family: 'Helvetica Neue', Arial, sans-serif; color: #1f2933; font-size: 12px; margin: 0; }
  .rx { max-width: 148mm; margin: 0 auto; }
  .rx-header { display: flex; justify-content: space-between; align-items: center; border-bottom: 2px solid #1e6ea0; padding-bottom: 8px; }
  .rx-header img { max-height: 56px; max-width: 120px; }
  .rx-doctor h1 { font-size: 16px; margin: 0; color: #1e6ea0; }
  .rx-doctor p { margin: 2px 0; }
  .rx-section { margin-top: 12px; }
  .rx-section h2 { font-size: 12px; text-transform: uppercase; letter-spacing: 0.05em; color: #52606d; margin: 0 0 4px; }
  .rx-patient td { padding: 2px 8px 2px 0; }
  .rx-meds li { margin-bottom: 4px; }
  .rx-footer { margin-top: 32px; display: flex; justify-content: space-between; align-items: flex-end; font-size: 10px; color: #52606d; }
  .rx-signature { border-top: 1px solid #1f2933; width: 50mm; text-align: center; padding-top: 4px; }
";

/// Renders the printable document. Same view and logos give byte-identical output.
pub fn render_prescription(
    view: &PrescriptionView,
    doctor_logo: Option<&str>,
    site_logo: Option<&str>,
) -> String {
    let mut html = String::with_capacity(4096);
    let doctor_line = format!("{} {}", view.doctor_title, view.doctor_name);
    let doctor_line = doctor_line.trim();

    html.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>Receta — {}</title>", escape(&view.patient_name));
    let _ = writeln!(html, "<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"rx\">");

    // Header
    html.push_str("<header class=\"rx-header\">\n");
    if let Some(src) = non_blank(doctor_logo) {
        let _ = writeln!(html, "<img class=\"rx-logo\" src=\"{}\" alt=\"\">", escape(&src));
    }
    html.push_str("<div class=\"rx-doctor\">\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape(doctor_line));
    let _ = writeln!(html, "<p>{}</p>", escape(&view.doctor_speciality));
    let _ = writeln!(html, "<p>Matrícula: {}</p>", escape(&view.doctor_license));
    html.push_str("</div>\n</header>\n");

    // Patient
    html.push_str("<section class=\"rx-section rx-patient\">\n<h2>Paciente</h2>\n<table>\n");
    table_row(&mut html, "Nombre", &view.patient_name);
    table_row(&mut html, "Documento", &view.patient_document);
    table_row(&mut html, "Obra social", &view.patient_insurance);
    match (view.patient_age, age::displayable_years(view.patient_age)) {
        (None, _) => table_row(&mut html, "Edad", NOT_RECORDED),
        (Some(_), Some(years)) => table_row(&mut html, "Edad", &format!("{years} años")),
        // Under one year: not printed
        (Some(_), None) => {}
    }
    table_row(&mut html, "Fecha", &view.date);
    html.push_str("</table>\n</section>\n");

    if !view.reason.trim().is_empty() {
        text_section(&mut html, "Motivo de consulta", &view.reason);
    }
    if let Some(diagnosis) = &view.diagnosis {
        text_section(&mut html, "Diagnóstico", diagnosis);
    }

    // Rx
    if !view.medications.is_empty() {
        html.push_str("<section class=\"rx-section rx-meds\">\n<h2>Rp/</h2>\n<ol>\n");
        for med in &view.medications {
            let details: Vec<&str> = [med.dose.as_str(), med.frequency.as_str(), med.duration.as_str()]
                .into_iter()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if details.is_empty() {
                let _ = writeln!(html, "<li><strong>{}</strong></li>", escape(&med.name));
            } else {
                let _ = writeln!(
                    html,
                    "<li><strong>{}</strong> — {}</li>",
                    escape(&med.name),
                    escape(&details.join(", "))
                );
            }
        }
        html.push_str("</ol>\n</section>\n");
    }

    if let Some(treatment) = &view.treatment {
        text_section(&mut html, "Indicaciones", treatment);
    }
    if let Some(notes) = &view.notes {
        text_section(&mut html, "Observaciones", notes);
    }
    if let Some(next) = &view.next_visit {
        text_section(&mut html, "Próximo control", next);
    }

    // Footer
    html.push_str("<footer class=\"rx-footer\">\n<div>\n");
    let _ = writeln!(html, "<p>Tel: {}</p>", escape(&view.doctor_phone));
    let _ = writeln!(html, "<p>Email: {}</p>", escape(&view.doctor_email));
    let _ = writeln!(html, "<p>{}</p>", escape(&view.doctor_address));
    if let Some(src) = non_blank(site_logo) {
        let _ = writeln!(html, "<img class=\"rx-site-logo\" src=\"{}\" alt=\"\" height=\"20\">", escape(&src));
    }
    html.push_str("</div>\n");
    let _ = writeln!(html, "<div class=\"rx-signature\">{}</div>", escape(doctor_line));
    html.push_str("</footer>\n</div>\n</body>\n</html>\n");

    html
}

fn table_row(html: &mut String, label: &str, value: &str) {
    let _ = writeln!(html, "<tr><th scope=\"row\">{label}</th><td>{}</td></tr>", escape(value));
}

fn text_section(html: &mut String, heading: &str, text: &str) {
    let _ = writeln!(html, "<section class=\"rx-section\">\n<h2>{heading}</h2>");
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let _ = writeln!(html, "<p>{}</p>", escape(line));
    }
    html.push_str("</section>\n");
}

/// Escapes text for element content and double-quoted attributes.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// File name for an exported prescription: `receta-<patient>-<date>.html`.
pub fn export_filename(patient_name: &str, date: NaiveDate) -> String {
    let safe: String = patient_name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let safe = safe.trim_matches('-');
    let safe = if safe.is_empty() { "paciente" } else { safe };
    format!("receta-{}-{}.html", safe, date.format("%Y-%m-%d"))
}

/// Writes the document into `exports_dir`, creating it if needed.
pub fn export_document(
    html: &str,
    filename: &str,
    exports_dir: &Path,
) -> Result<PathBuf, DatabaseError> {
    let name = Path::new(filename)
        .file_name()
        .ok_or_else(|| DatabaseError::ConstraintViolation(format!("Invalid file name: {filename}")))?;

    std::fs::create_dir_all(exports_dir)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Cannot create exports dir: {e}")))?;

    let path = exports_dir.join(name);
    std::fs::write(&path, html)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Cannot write document: {e}")))?;

    tracing::info!(path = %path.display(), "Prescription exported");
    Ok(path)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
