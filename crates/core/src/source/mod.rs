//! Patient-search source capabilities.
//!
//! A source is anything that, given the caller's identity and a query
//! specification, can produce zero or more canonical patient records or fail.
//! The router holds an ordered list of these per hospital; adding a third
//! hospital backed by yet another system means implementing this trait once
//! and registering it.

use crate::patient::{Patient, PatientSearchQuery};
use crate::staff::StaffContext;
use crate::SearchResult;
use async_trait::async_trait;

pub mod local;
pub mod remote;

pub use local::LocalPatientSource;
pub use remote::RemoteHospitalSource;

/// What kind of system backs a source.
///
/// The router treats the kinds differently: remote failures are absorbed into
/// the fallback flow, local failures abort the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Partner-system client, keyed lookup only.
    Remote,
    /// Relational store backing this process.
    Local,
}

/// A search capability over one backing system.
#[async_trait]
pub trait PatientSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Search the backing system, returning canonical records.
    async fn search(
        &self,
        staff: &StaffContext,
        query: &PatientSearchQuery,
    ) -> SearchResult<Vec<Patient>>;
}
