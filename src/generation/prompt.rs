//! Case-data validation and prompt construction.
//!
//! Validation walks the template's required fields in declaration order and
//! fails on the first offending field, naming it. Prompt construction is pure.

use time::{format_description::FormatItem, macros::format_description, Date};

use crate::error::ApiError;
use crate::generation::templates::PetitionCategory;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Validated inputs for one petition generation request.
#[derive(Debug, Clone)]
pub struct CaseData {
    pub full_name: String,
    pub id_number: String,
    pub incident_date: String,
    pub incident_details: String,
}

impl CaseData {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "full_name" => Some(&self.full_name),
            "id_number" => Some(&self.id_number),
            "incident_date" => Some(&self.incident_date),
            "incident_details" => Some(&self.incident_details),
            _ => None,
        }
    }
}

/// Check required fields in declaration order; the first failure wins.
pub fn validate_case_data(data: &CaseData, required_fields: &[&str]) -> Result<(), ApiError> {
    for &field in required_fields {
        let value = data
            .field(field)
            .ok_or_else(|| ApiError::Validation(format!("Missing required field: {field}")))?;

        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!(
                "Empty value for field: {field}"
            )));
        }

        match field {
            "id_number" => {
                if value.len() != 11 || !value.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ApiError::Validation(format!(
                        "Invalid value for field: {field}"
                    )));
                }
            }
            "incident_date" => {
                if Date::parse(value, DATE_FORMAT).is_err() {
                    return Err(ApiError::Validation(format!(
                        "Invalid value for field: {field}"
                    )));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Substitute validated case data into the fixed Turkish prompt skeleton.
pub fn build_prompt(category: PetitionCategory, data: &CaseData) -> String {
    format!(
        "Lütfen aşağıdaki bilgilere göre bir {} hazırla:\n\n\
         Ad Soyad: {}\n\
         TC Kimlik No: {}\n\
         Olay Tarihi: {}\n\
         Olay Detayı: {}\n\n\
         Dilekçeyi resmi formatta ve tüm gerekli bölümleriyle hazırla.",
        category.description(),
        data.full_name,
        data.id_number,
        data.incident_date,
        data.incident_details,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::templates::REQUIRED_CASE_FIELDS;

    fn valid_case() -> CaseData {
        CaseData {
            full_name: "Ali Veli".into(),
            id_number: "12345678901".into(),
            incident_date: "2024-01-15".into(),
            incident_details: "Hız cezası".into(),
        }
    }

    fn validation_message(case: &CaseData) -> String {
        match validate_case_data(case, REQUIRED_CASE_FIELDS) {
            Err(ApiError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_case_passes() {
        assert!(validate_case_data(&valid_case(), REQUIRED_CASE_FIELDS).is_ok());
    }

    #[test]
    fn each_empty_field_is_named() {
        for field in REQUIRED_CASE_FIELDS {
            let mut case = valid_case();
            match *field {
                "full_name" => case.full_name.clear(),
                "id_number" => case.id_number.clear(),
                "incident_date" => case.incident_date.clear(),
                "incident_details" => case.incident_details.clear(),
                other => panic!("unexpected field {other}"),
            }
            assert_eq!(validation_message(&case), format!("Empty value for field: {field}"));
        }
    }

    #[test]
    fn first_failure_wins_in_declaration_order() {
        let mut case = valid_case();
        case.full_name = "  ".into();
        case.id_number = "abc".into();
        assert_eq!(validation_message(&case), "Empty value for field: full_name");
    }

    #[test]
    fn id_number_must_be_eleven_digits() {
        let mut case = valid_case();
        case.id_number = "1234567890".into();
        assert_eq!(validation_message(&case), "Invalid value for field: id_number");

        case.id_number = "1234567890a".into();
        assert_eq!(validation_message(&case), "Invalid value for field: id_number");
    }

    #[test]
    fn incident_date_must_be_iso() {
        let mut case = valid_case();
        case.incident_date = "15/01/2024".into();
        assert_eq!(
            validation_message(&case),
            "Invalid value for field: incident_date"
        );

        case.incident_date = "2024-13-40".into();
        assert_eq!(
            validation_message(&case),
            "Invalid value for field: incident_date"
        );
    }

    #[test]
    fn unknown_required_field_is_reported_missing() {
        match validate_case_data(&valid_case(), &["court_name"]) {
            Err(ApiError::Validation(msg)) => {
                assert_eq!(msg, "Missing required field: court_name")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn prompt_contains_description_and_data() {
        let case = valid_case();
        let prompt = build_prompt(PetitionCategory::Traffic, &case);
        assert!(prompt.contains("Trafik Cezası İtiraz Dilekçesi"));
        assert!(prompt.contains("Ad Soyad: Ali Veli"));
        assert!(prompt.contains("TC Kimlik No: 12345678901"));
        assert!(prompt.contains("Olay Tarihi: 2024-01-15"));
        assert!(prompt.contains("Olay Detayı: Hız cezası"));
    }
}
