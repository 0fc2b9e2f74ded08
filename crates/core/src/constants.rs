//! Process-wide constants for the patient-search core.

/// Hospital backed by the partner API first, with the relational store as fallback.
pub const HOSPITAL_A: &str = "Hospital A";

/// Hospital backed by the relational store only.
pub const HOSPITAL_B: &str = "Hospital B";

/// Upper bound on a single partner-system lookup.
pub const REMOTE_LOOKUP_TIMEOUT_SECS: u64 = 10;
