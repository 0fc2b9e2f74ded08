//! Canonical patient record and the search specification.
//!
//! Responsibilities:
//! - Define the one patient shape returned regardless of originating source
//! - Define the sparse set of optional search predicates a caller may supply
//! - Normalise blank/whitespace query values to "absent"
//!
//! Notes:
//! - Nullable store columns surface as empty strings on the record, never null
//! - Every record carries exactly one owning-hospital identifier

use chrono::{DateTime, NaiveDate, Utc};
use hmw_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// The normalised patient shape returned regardless of originating source.
///
/// Name fields are carried in two scripts: the partner hospitals record both a
/// Latin-script (`_en`) and a Thai-script (`_th`) variant of each name part.
/// `patient_hn` is the hospital-issued business identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub first_name_th: String,
    pub middle_name_th: String,
    pub last_name_th: String,
    pub first_name_en: String,
    pub middle_name_en: String,
    pub last_name_en: String,
    pub date_of_birth: NaiveDate,
    pub patient_hn: String,
    pub national_id: String,
    pub passport_id: String,
    pub phone_number: String,
    pub email: String,
    pub gender: String,
    /// Identifier of the hospital that produced this record.
    pub hospital: String,
    /// Absent on records sourced from a partner system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Sparse set of optional search predicates supplied by a caller.
///
/// Every field is independently optional; blank or whitespace-only values are
/// treated as absent. The accessors return the normalised view and are the
/// only way the core reads the fields.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct PatientSearchQuery {
    national_id: Option<String>,
    passport_id: Option<String>,
    first_name: Option<String>,
    middle_name: Option<String>,
    last_name: Option<String>,
    date_of_birth: Option<String>,
    phone_number: Option<String>,
    email: Option<String>,
}

impl PatientSearchQuery {
    pub fn national_id(&self) -> Option<&str> {
        normalised(&self.national_id)
    }

    pub fn passport_id(&self) -> Option<&str> {
        normalised(&self.passport_id)
    }

    pub fn first_name(&self) -> Option<&str> {
        normalised(&self.first_name)
    }

    pub fn middle_name(&self) -> Option<&str> {
        normalised(&self.middle_name)
    }

    pub fn last_name(&self) -> Option<&str> {
        normalised(&self.last_name)
    }

    pub fn date_of_birth(&self) -> Option<&str> {
        normalised(&self.date_of_birth)
    }

    pub fn phone_number(&self) -> Option<&str> {
        normalised(&self.phone_number)
    }

    pub fn email(&self) -> Option<&str> {
        normalised(&self.email)
    }

    /// Whether no usable predicate was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.national_id().is_none()
            && self.passport_id().is_none()
            && self.first_name().is_none()
            && self.middle_name().is_none()
            && self.last_name().is_none()
            && self.date_of_birth().is_none()
            && self.phone_number().is_none()
            && self.email().is_none()
    }

    /// The single key a partner-system lookup would use.
    ///
    /// National ID is preferred over passport ID when both are present.
    pub fn identifier(&self) -> Option<NonEmptyText> {
        self.national_id()
            .or_else(|| self.passport_id())
            .and_then(|key| NonEmptyText::new(key).ok())
    }
}

fn normalised(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn query(fields: &[(&str, &str)]) -> PatientSearchQuery {
        let mut q = PatientSearchQuery::default();
        for (name, value) in fields {
            let value = Some(value.to_string());
            match *name {
                "national_id" => q.national_id = value,
                "passport_id" => q.passport_id = value,
                "first_name" => q.first_name = value,
                "middle_name" => q.middle_name = value,
                "last_name" => q.last_name = value,
                "date_of_birth" => q.date_of_birth = value,
                "phone_number" => q.phone_number = value,
                "email" => q.email = value,
                other => panic!("unknown query field {other}"),
            }
        }
        q
    }

    #[test]
    fn blank_and_whitespace_fields_are_absent() {
        let q = query(&[("first_name", "   "), ("email", "")]);
        assert!(q.first_name().is_none());
        assert!(q.email().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn values_are_trimmed() {
        let q = query(&[("last_name", " Last ")]);
        assert_eq!(q.last_name(), Some("Last"));
        assert!(!q.is_empty());
    }

    #[test]
    fn identifier_prefers_national_id() {
        let q = query(&[("national_id", "1234567890123"), ("passport_id", "X1")]);
        assert_eq!(q.identifier().expect("has key").as_str(), "1234567890123");
    }

    #[test]
    fn identifier_falls_back_to_passport_id() {
        let q = query(&[("passport_id", "X1"), ("last_name", "Last")]);
        assert_eq!(q.identifier().expect("has key").as_str(), "X1");
    }

    #[test]
    fn identifier_is_absent_without_id_fields() {
        let q = query(&[("first_name", "Test")]);
        assert!(q.identifier().is_none());
    }
}
