//! # HMW Core
//!
//! Core business logic for the hospital middleware: patient-search routing and
//! query construction.
//!
//! This crate contains the pieces with real branching logic:
//! - Predicate compilation from a sparse query specification into a
//!   parameterized relational query, always scoped by hospital
//! - The source capability trait with its relational and partner-system
//!   implementations
//! - The per-hospital search router with its remote-first fallback policy
//!
//! **No API concerns**: token verification, HTTP endpoints and response
//! envelopes belong in `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod patient;
pub mod predicate;
pub mod router;
pub mod source;
pub mod staff;

pub use config::{CoreConfig, DbConfig};
pub use db::PgPool;
pub use error::{SearchError, SearchResult};
pub use patient::{Patient, PatientSearchQuery};
pub use predicate::{compile_search, CompiledQuery, PredicateBuilder};
pub use router::SearchRouter;
pub use source::{LocalPatientSource, PatientSource, RemoteHospitalSource, SourceKind};
pub use staff::{StaffContext, StaffCredentials, StaffStore};
