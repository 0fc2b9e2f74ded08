//! Partner-hospital search source.
//!
//! A capability-typed HTTP client that fetches exactly one patient record from
//! a partner system by a single identifying key and maps the partner's JSON
//! shape into the canonical record.

use crate::constants::REMOTE_LOOKUP_TIMEOUT_SECS;
use crate::patient::{Patient, PatientSearchQuery};
use crate::source::{PatientSource, SourceKind};
use crate::staff::StaffContext;
use crate::{SearchError, SearchResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmw_types::NonEmptyText;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

/// Failure of a single partner lookup.
///
/// The router does not distinguish "not found" from "partner down": every
/// variant triggers the same fallback to the next source.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("no identifying key supplied")]
    MissingKey,
    #[error("invalid partner endpoint: {0}")]
    Endpoint(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(StatusCode),
}

/// Wire shape returned by the partner API.
#[derive(Debug, Deserialize)]
struct PartnerPatient {
    #[serde(default)]
    first_name_th: String,
    #[serde(default)]
    middle_name_th: String,
    #[serde(default)]
    last_name_th: String,
    #[serde(default)]
    first_name_en: String,
    #[serde(default)]
    middle_name_en: String,
    #[serde(default)]
    last_name_en: String,
    date_of_birth: DateTime<Utc>,
    #[serde(default)]
    patient_hn: String,
    #[serde(default)]
    national_id: String,
    #[serde(default)]
    passport_id: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    gender: String,
}

/// Client for one partner hospital's patient-lookup endpoint.
pub struct RemoteHospitalSource {
    hospital: String,
    base_url: Url,
    bearer_token: String,
    client: reqwest::Client,
}

impl RemoteHospitalSource {
    /// Build a client for the partner identified by `hospital`.
    ///
    /// # Errors
    /// Fails when the base URL does not parse or the HTTP client cannot be
    /// constructed.
    pub fn new(
        hospital: impl Into<String>,
        base_url: &str,
        bearer_token: impl Into<String>,
    ) -> SearchResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| SearchError::InvalidConfig(format!("partner URL: {err}")))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REMOTE_LOOKUP_TIMEOUT_SECS))
            .build()
            .map_err(|err| SearchError::InvalidConfig(format!("http client: {err}")))?;

        Ok(Self {
            hospital: hospital.into(),
            base_url,
            bearer_token: bearer_token.into(),
            client,
        })
    }

    /// The lookup URL for one key; the key is percent-escaped as a single
    /// path segment.
    fn patient_url(&self, key: &NonEmptyText) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::Endpoint("partner URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["api", "v1", "patients", key.as_str()]);
        Ok(url)
    }

    /// Fetch exactly one patient record by its identifying key.
    pub async fn fetch_by_key(&self, key: &NonEmptyText) -> Result<Patient, RemoteError> {
        let url = self.patient_url(key)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }

        let wire: PartnerPatient = response.json().await?;
        Ok(self.canonicalise(wire))
    }

    /// Map the partner's wire shape into the canonical record, with the
    /// owning hospital fixed to this partner.
    fn canonicalise(&self, wire: PartnerPatient) -> Patient {
        Patient {
            first_name_th: wire.first_name_th,
            middle_name_th: wire.middle_name_th,
            last_name_th: wire.last_name_th,
            first_name_en: wire.first_name_en,
            middle_name_en: wire.middle_name_en,
            last_name_en: wire.last_name_en,
            date_of_birth: wire.date_of_birth.date_naive(),
            patient_hn: wire.patient_hn,
            national_id: wire.national_id,
            passport_id: wire.passport_id,
            phone_number: wire.phone_number,
            email: wire.email,
            gender: wire.gender,
            hospital: self.hospital.clone(),
            created_at: None,
            updated_at: None,
        }
    }
}

#[async_trait]
impl PatientSource for RemoteHospitalSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }

    /// Single-key lookup: national ID preferred, else passport ID.
    async fn search(
        &self,
        _staff: &StaffContext,
        query: &PatientSearchQuery,
    ) -> SearchResult<Vec<Patient>> {
        let key = query.identifier().ok_or(RemoteError::MissingKey)?;
        let patient = self.fetch_by_key(&key).await?;
        Ok(vec![patient])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> RemoteHospitalSource {
        RemoteHospitalSource::new("Hospital A", "https://hospital-a.api.co.th", "secret")
            .expect("valid endpoint")
    }

    #[test]
    fn lookup_url_appends_versioned_path() {
        let url = source()
            .patient_url(&NonEmptyText::new("1234567890123").unwrap())
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://hospital-a.api.co.th/api/v1/patients/1234567890123"
        );
    }

    #[test]
    fn lookup_key_is_escaped_as_one_segment() {
        let url = source()
            .patient_url(&NonEmptyText::new("AB/12 3").unwrap())
            .expect("url");
        assert!(url.as_str().ends_with("/api/v1/patients/AB%2F12%203"));
    }

    #[test]
    fn trailing_slash_on_base_url_is_harmless() {
        let with_slash =
            RemoteHospitalSource::new("Hospital A", "https://hospital-a.api.co.th/", "secret")
                .expect("valid endpoint");
        let url = with_slash
            .patient_url(&NonEmptyText::new("X1").unwrap())
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://hospital-a.api.co.th/api/v1/patients/X1"
        );
    }

    #[test]
    fn partner_payload_maps_to_canonical_record() {
        let wire: PartnerPatient = serde_json::from_str(
            r#"{
                "first_name_th": "ทดสอบ",
                "last_name_th": "สุดท้าย",
                "first_name_en": "Test",
                "last_name_en": "Last",
                "date_of_birth": "1992-03-20T00:00:00Z",
                "patient_hn": "HN123456",
                "national_id": "1234567890123",
                "phone_number": "0123456789",
                "email": "test@email.com",
                "gender": "M"
            }"#,
        )
        .expect("decodes");

        let patient = source().canonicalise(wire);
        assert_eq!(patient.hospital, "Hospital A");
        assert_eq!(patient.first_name_en, "Test");
        assert_eq!(patient.date_of_birth.to_string(), "1992-03-20");
        // Fields the partner omitted surface as empty strings, not nulls.
        assert_eq!(patient.middle_name_en, "");
        assert_eq!(patient.passport_id, "");
        assert!(patient.created_at.is_none());
        assert!(patient.updated_at.is_none());
    }
}
