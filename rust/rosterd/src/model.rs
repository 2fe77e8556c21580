use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RosterError;

/// One student row. Field names on the wire and in storage follow the
/// roster value the UI has always persisted (`roll`, `cgpa`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    #[serde(rename = "roll")]
    pub roll_number: i64,
    pub course: String,
    pub year: i64,
    #[serde(rename = "cgpa")]
    pub gpa: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl From<FieldError> for RosterError {
    fn from(e: FieldError) -> Self {
        RosterError::InvalidField {
            field: e.field,
            reason: e.reason,
        }
    }
}

fn required_text(field: &'static str, raw: &str) -> Result<String, FieldError> {
    let t = raw.trim();
    if t.is_empty() {
        return Err(FieldError {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    if t.contains(|c: char| c == '\n' || c == '\r') {
        return Err(FieldError {
            field,
            reason: "must not contain line breaks".to_string(),
        });
    }
    Ok(t.to_string())
}

fn parse_int(field: &'static str, raw: &str) -> Result<i64, FieldError> {
    raw.trim().parse::<i64>().map_err(|_| FieldError {
        field,
        reason: format!("{:?} is not an integer", raw.trim()),
    })
}

fn parse_float(field: &'static str, raw: &str) -> Result<f64, FieldError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FieldError {
            field,
            reason: format!("{:?} is not a number", raw.trim()),
        }),
    }
}

/// Turns five raw text fields into a typed record, or names the first field
/// that is unusable. Used by manual entry and by CSV decode alike.
pub fn validate_fields(
    name: &str,
    roll_number: &str,
    course: &str,
    year: &str,
    gpa: &str,
) -> Result<StudentRecord, FieldError> {
    Ok(StudentRecord {
        name: required_text("name", name)?,
        roll_number: parse_int("rollNumber", roll_number)?,
        course: required_text("course", course)?,
        year: parse_int("year", year)?,
        gpa: parse_float("cgpa", gpa)?,
    })
}

/// Re-checks a record that arrived already typed (a restored roster value).
pub fn check_record(r: &StudentRecord) -> Result<(), FieldError> {
    required_text("name", &r.name)?;
    required_text("course", &r.course)?;
    if !r.gpa.is_finite() {
        return Err(FieldError {
            field: "cgpa",
            reason: "is not a number".to_string(),
        });
    }
    Ok(())
}

pub fn display_gpa(gpa: f64) -> String {
    format!("{:.2}", gpa)
}

pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 Student".to_string()
    } else {
        format!("{} Students", n)
    }
}

impl StudentRecord {
    /// Row shape handed to the UI shell.
    pub fn to_row_json(&self) -> Value {
        json!({
            "name": self.name,
            "roll": self.roll_number,
            "course": self.course,
            "year": self.year,
            "cgpa": self.gpa,
            "cgpaDisplay": display_gpa(self.gpa),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_and_types_fields() {
        let r = validate_fields(" Ana ", " 1", "CS ", "2", " 3.5 ").expect("valid");
        assert_eq!(
            r,
            StudentRecord {
                name: "Ana".into(),
                roll_number: 1,
                course: "CS".into(),
                year: 2,
                gpa: 3.5,
            }
        );
    }

    #[test]
    fn validate_names_the_first_bad_field() {
        let e = validate_fields("X", "notanumber", "Y", "1", "3.0").unwrap_err();
        assert_eq!(e.field, "rollNumber");

        let e = validate_fields("  ", "1", "Y", "1", "3.0").unwrap_err();
        assert_eq!(e.field, "name");

        let e = validate_fields("X", "1", "", "1", "3.0").unwrap_err();
        assert_eq!(e.field, "course");

        let e = validate_fields("X", "1", "Y", "2.5", "3.0").unwrap_err();
        assert_eq!(e.field, "year");

        let e = validate_fields("X", "1", "Y", "1", "NaN").unwrap_err();
        assert_eq!(e.field, "cgpa");
    }

    #[test]
    fn line_breaks_in_text_fields_are_rejected() {
        let e = validate_fields("Ana\nMaria", "1", "CS", "2", "3.5").unwrap_err();
        assert_eq!(e.field, "name");
        let e = validate_fields("Ana", "1", "CS\r\nAI", "2", "3.5").unwrap_err();
        assert_eq!(e.field, "course");
        // Trailing line endings are trimmed, not rejected.
        assert!(validate_fields("Ana\r\n", "1", "CS", "2", "3.5").is_ok());
    }

    #[test]
    fn check_record_applies_text_rules_to_typed_rows() {
        let mut r = validate_fields("Ana", "1", "CS", "2", "3.5").expect("valid");
        assert!(check_record(&r).is_ok());
        r.name = " ".into();
        assert_eq!(check_record(&r).unwrap_err().field, "name");
        r.name = "Ana".into();
        r.course = "A\nB".into();
        assert_eq!(check_record(&r).unwrap_err().field, "course");
    }

    #[test]
    fn gpa_display_rounds_but_storage_keeps_precision() {
        let r = validate_fields("A", "1", "B", "1", "3.14159").expect("valid");
        assert_eq!(r.gpa, 3.14159);
        assert_eq!(display_gpa(r.gpa), "3.14");
        assert_eq!(display_gpa(4.0), "4.00");
    }

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(count_label(0), "0 Students");
        assert_eq!(count_label(1), "1 Student");
        assert_eq!(count_label(7), "7 Students");
    }

    #[test]
    fn serializes_with_persisted_attribute_names() {
        let r = validate_fields("Bob", "2", "Math", "3", "3.8").expect("valid");
        let v = serde_json::to_value(&r).expect("to json");
        assert_eq!(
            v,
            json!({ "name": "Bob", "roll": 2, "course": "Math", "year": 3, "cgpa": 3.8 })
        );
    }
}
