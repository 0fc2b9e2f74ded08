//! Search routing across per-hospital source lists.
//!
//! The router owns a route table mapping each supported hospital to an ordered
//! list of source capabilities. A search walks that list: remote sources are
//! attempted only when the query carries an identifying key and their failures
//! fall through silently; a local source failure aborts the call.

use crate::config::CoreConfig;
use crate::constants::{HOSPITAL_A, HOSPITAL_B};
use crate::patient::{Patient, PatientSearchQuery};
use crate::source::{LocalPatientSource, PatientSource, RemoteHospitalSource, SourceKind};
use crate::staff::StaffContext;
use crate::{SearchError, SearchResult};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

/// Orchestrates a patient search across the sources configured for the
/// caller's hospital.
pub struct SearchRouter {
    routes: HashMap<String, Vec<Arc<dyn PatientSource>>>,
}

impl SearchRouter {
    /// An empty route table; hospitals are added with [`SearchRouter::route`].
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Register the ordered source list for one hospital.
    pub fn route(
        mut self,
        hospital: impl Into<String>,
        sources: Vec<Arc<dyn PatientSource>>,
    ) -> Self {
        self.routes.insert(hospital.into(), sources);
        self
    }

    /// The route table used in production: Hospital A consults its partner
    /// system first and falls back to the relational store; Hospital B is
    /// backed by the relational store alone.
    pub fn with_default_routes(cfg: &CoreConfig, pool: PgPool) -> SearchResult<Self> {
        let local: Arc<dyn PatientSource> = Arc::new(LocalPatientSource::new(pool));
        let remote: Arc<dyn PatientSource> = Arc::new(RemoteHospitalSource::new(
            HOSPITAL_A,
            cfg.hospital_a_url(),
            cfg.jwt_secret(),
        )?);

        Ok(Self::new()
            .route(HOSPITAL_A, vec![remote, Arc::clone(&local)])
            .route(HOSPITAL_B, vec![local]))
    }

    /// Search for patients on behalf of `staff`.
    ///
    /// # Errors
    /// - [`SearchError::EmptyQuery`] when no search field is supplied; no
    ///   source is contacted.
    /// - [`SearchError::UnsupportedHospital`] when the staff member's hospital
    ///   has no route table entry; no source is contacted.
    /// - [`SearchError::NotFound`] when every applicable source was consulted
    ///   without a hit.
    /// - [`SearchError::QueryExecution`] / [`SearchError::RowDecode`] when the
    ///   local source fails; this aborts the call immediately.
    pub async fn search(
        &self,
        staff: &StaffContext,
        query: &PatientSearchQuery,
    ) -> SearchResult<Vec<Patient>> {
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let sources = self
            .routes
            .get(&staff.hospital)
            .ok_or_else(|| SearchError::UnsupportedHospital(staff.hospital.clone()))?;

        for source in sources {
            match source.kind() {
                SourceKind::Remote => {
                    // Keyed lookup only; a query without an ID goes straight
                    // to the next source.
                    if query.identifier().is_none() {
                        continue;
                    }
                    match source.search(staff, query).await {
                        Ok(records) if !records.is_empty() => return Ok(records),
                        Ok(_) => {
                            tracing::debug!(
                                hospital = %staff.hospital,
                                "remote source returned nothing, falling back"
                            );
                        }
                        Err(err) => {
                            tracing::debug!(
                                hospital = %staff.hospital,
                                error = %err,
                                "remote lookup failed, falling back"
                            );
                        }
                    }
                }
                SourceKind::Local => {
                    let records = source.search(staff, query).await?;
                    if !records.is_empty() {
                        return Ok(records);
                    }
                }
            }
        }

        Err(SearchError::NotFound)
    }
}

impl Default for SearchRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::tests::query;
    use crate::source::remote::RemoteError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_patient(hospital: &str) -> Patient {
        Patient {
            first_name_th: "ทดสอบ".into(),
            middle_name_th: String::new(),
            last_name_th: "สุดท้าย".into(),
            first_name_en: "Test".into(),
            middle_name_en: String::new(),
            last_name_en: "Last".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1992, 3, 20).unwrap(),
            patient_hn: "HN123456".into(),
            national_id: "1234567890123".into(),
            passport_id: String::new(),
            phone_number: "0123456789".into(),
            email: "test@email.com".into(),
            gender: "M".into(),
            hospital: hospital.into(),
            created_at: None,
            updated_at: None,
        }
    }

    fn staff(hospital: &str) -> StaffContext {
        StaffContext {
            hospital: hospital.into(),
            staff_id: 1,
            username: "staff1".into(),
        }
    }

    enum Outcome {
        Hit(&'static str),
        Miss,
        Fail,
    }

    struct StubSource {
        kind: SourceKind,
        outcome: Outcome,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(kind: SourceKind, outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                kind,
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PatientSource for StubSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn search(
            &self,
            _staff: &StaffContext,
            _query: &PatientSearchQuery,
        ) -> SearchResult<Vec<Patient>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Outcome::Hit(hospital) => Ok(vec![sample_patient(hospital)]),
                Outcome::Miss => Ok(Vec::new()),
                Outcome::Fail => match self.kind {
                    SourceKind::Remote => {
                        Err(RemoteError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).into())
                    }
                    SourceKind::Local => Err(SearchError::QueryExecution(sqlx::Error::PoolClosed)),
                },
            }
        }
    }

    fn router_for(
        hospital: &str,
        sources: Vec<Arc<StubSource>>,
    ) -> SearchRouter {
        SearchRouter::new().route(
            hospital,
            sources
                .into_iter()
                .map(|s| s as Arc<dyn PatientSource>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn local_only_route_returns_local_records() {
        let local = StubSource::new(SourceKind::Local, Outcome::Hit("Hospital B"));
        let router = router_for("Hospital B", vec![Arc::clone(&local)]);

        let records = router
            .search(&staff("Hospital B"), &query(&[("national_id", "1234567890123")]))
            .await
            .expect("one record");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hospital, "Hospital B");
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test]
    async fn local_miss_reports_not_found() {
        let local = StubSource::new(SourceKind::Local, Outcome::Miss);
        let router = router_for("Hospital B", vec![local]);

        let err = router
            .search(&staff("Hospital B"), &query(&[("national_id", "000")]))
            .await
            .expect_err("nothing stored");
        assert!(matches!(err, SearchError::NotFound));
    }

    #[tokio::test]
    async fn remote_hit_short_circuits_local() {
        let remote = StubSource::new(SourceKind::Remote, Outcome::Hit("Hospital A"));
        let local = StubSource::new(SourceKind::Local, Outcome::Hit("Hospital A"));
        let router = router_for("Hospital A", vec![Arc::clone(&remote), Arc::clone(&local)]);

        let records = router
            .search(&staff("Hospital A"), &query(&[("passport_id", "X1")]))
            .await
            .expect("remote record");

        assert_eq!(records[0].hospital, "Hospital A");
        assert_eq!(remote.calls(), 1);
        assert_eq!(local.calls(), 0);
    }

    #[tokio::test]
    async fn remote_failure_falls_through_to_local() {
        let remote = StubSource::new(SourceKind::Remote, Outcome::Fail);
        let local = StubSource::new(SourceKind::Local, Outcome::Hit("Hospital A"));
        let router = router_for("Hospital A", vec![Arc::clone(&remote), Arc::clone(&local)]);

        let records = router
            .search(&staff("Hospital A"), &query(&[("passport_id", "X1")]))
            .await
            .expect("local fallback");

        assert_eq!(remote.calls(), 1);
        assert_eq!(local.calls(), 1);
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn remote_failure_then_local_miss_is_not_found() {
        let remote = StubSource::new(SourceKind::Remote, Outcome::Fail);
        let local = StubSource::new(SourceKind::Local, Outcome::Miss);
        let router = router_for("Hospital A", vec![remote, Arc::clone(&local)]);

        let err = router
            .search(&staff("Hospital A"), &query(&[("passport_id", "X1")]))
            .await
            .expect_err("no hit anywhere");
        assert!(matches!(err, SearchError::NotFound));
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test]
    async fn remote_is_skipped_without_an_identifying_key() {
        let remote = StubSource::new(SourceKind::Remote, Outcome::Hit("Hospital A"));
        let local = StubSource::new(SourceKind::Local, Outcome::Hit("Hospital A"));
        let router = router_for("Hospital A", vec![Arc::clone(&remote), Arc::clone(&local)]);

        router
            .search(&staff("Hospital A"), &query(&[("first_name", "Test")]))
            .await
            .expect("local record");

        assert_eq!(remote.calls(), 0);
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test]
    async fn local_failure_aborts_the_search() {
        let local = StubSource::new(SourceKind::Local, Outcome::Fail);
        let router = router_for("Hospital B", vec![local]);

        let err = router
            .search(&staff("Hospital B"), &query(&[("email", "test@email.com")]))
            .await
            .expect_err("store down");
        assert!(matches!(err, SearchError::QueryExecution(_)));
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_source() {
        let remote = StubSource::new(SourceKind::Remote, Outcome::Hit("Hospital A"));
        let local = StubSource::new(SourceKind::Local, Outcome::Hit("Hospital A"));
        let router = router_for("Hospital A", vec![Arc::clone(&remote), Arc::clone(&local)]);

        let err = router
            .search(&staff("Hospital A"), &query(&[("first_name", "   ")]))
            .await
            .expect_err("blank query");

        assert!(matches!(err, SearchError::EmptyQuery));
        assert_eq!(remote.calls(), 0);
        assert_eq!(local.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_hospital_is_unsupported() {
        let local = StubSource::new(SourceKind::Local, Outcome::Hit("Hospital B"));
        let router = router_for("Hospital B", vec![Arc::clone(&local)]);

        let err = router
            .search(&staff("Hospital C"), &query(&[("national_id", "1")]))
            .await
            .expect_err("no route entry");

        match err {
            SearchError::UnsupportedHospital(hospital) => assert_eq!(hospital, "Hospital C"),
            other => panic!("expected UnsupportedHospital, got {other:?}"),
        }
        assert_eq!(local.calls(), 0);
    }
}
