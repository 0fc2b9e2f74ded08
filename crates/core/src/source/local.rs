//! Relational search source.

use crate::patient::{Patient, PatientSearchQuery};
use crate::predicate::compile_search;
use crate::source::{PatientSource, SourceKind};
use crate::staff::StaffContext;
use crate::{SearchError, SearchResult};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// Executes compiled predicate sets against the relational store and maps each
/// row into a canonical patient record.
#[derive(Clone)]
pub struct LocalPatientSource {
    pool: PgPool,
}

impl LocalPatientSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientSource for LocalPatientSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Local
    }

    /// Compile the query scoped to the caller's hospital and execute it.
    ///
    /// # Errors
    /// - [`SearchError::QueryExecution`] when the store cannot run the query.
    /// - [`SearchError::RowDecode`] when any single row fails to map; the call
    ///   fails as a whole, no partial results are returned.
    async fn search(
        &self,
        staff: &StaffContext,
        query: &PatientSearchQuery,
    ) -> SearchResult<Vec<Patient>> {
        let compiled = compile_search(&staff.hospital, query)?;
        tracing::debug!(
            hospital = %staff.hospital,
            clauses = compiled.params.len(),
            "executing local patient search"
        );

        let mut executable = sqlx::query(&compiled.sql);
        for value in &compiled.params {
            executable = executable.bind(value.as_str());
        }

        let rows = executable
            .fetch_all(&self.pool)
            .await
            .map_err(SearchError::QueryExecution)?;

        rows.iter().map(patient_from_row).collect()
    }
}

/// Map one patient row into the canonical record.
///
/// Nullable columns (middle names in either script, national ID, passport ID)
/// surface as empty strings.
fn patient_from_row(row: &PgRow) -> SearchResult<Patient> {
    fn get<'r, T>(row: &'r PgRow, column: &str) -> SearchResult<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        row.try_get(column).map_err(SearchError::RowDecode)
    }

    let middle_name_th: Option<String> = get(row, "middle_name_th")?;
    let middle_name_en: Option<String> = get(row, "middle_name_en")?;
    let national_id: Option<String> = get(row, "national_id")?;
    let passport_id: Option<String> = get(row, "passport_id")?;

    Ok(Patient {
        first_name_th: get(row, "first_name_th")?,
        middle_name_th: middle_name_th.unwrap_or_default(),
        last_name_th: get(row, "last_name_th")?,
        first_name_en: get(row, "first_name_en")?,
        middle_name_en: middle_name_en.unwrap_or_default(),
        last_name_en: get(row, "last_name_en")?,
        date_of_birth: get(row, "date_of_birth")?,
        patient_hn: get(row, "patient_hn")?,
        national_id: national_id.unwrap_or_default(),
        passport_id: passport_id.unwrap_or_default(),
        phone_number: get(row, "phone_number")?,
        email: get(row, "email")?,
        gender: get(row, "gender")?,
        hospital: get(row, "hospital")?,
        created_at: Some(get(row, "created_at")?),
        updated_at: Some(get(row, "updated_at")?),
    })
}
