//! Staff identity and persistence.

use crate::{SearchError, SearchResult};
use sqlx::{PgPool, Row};

/// The authenticated caller of a search.
///
/// Constructed once per inbound call by the authentication layer, passed
/// explicitly into the search operation and discarded at the end of the call;
/// the core never persists it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaffContext {
    /// Identifier of the single hospital this staff member belongs to.
    pub hospital: String,
    pub staff_id: i32,
    pub username: String,
}

/// Stored credentials for a staff member, as needed by login.
#[derive(Clone, Debug)]
pub struct StaffCredentials {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

/// Staff table access.
#[derive(Clone)]
pub struct StaffStore {
    pool: PgPool,
}

impl StaffStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new staff member and return the generated id.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        hospital: &str,
    ) -> SearchResult<i32> {
        let row = sqlx::query(
            "INSERT INTO staff (username, password, hospital) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .bind(hospital)
        .fetch_one(&self.pool)
        .await
        .map_err(SearchError::StaffPersistence)?;

        row.try_get("id").map_err(SearchError::StaffPersistence)
    }

    /// Look up the stored credentials for a username within one hospital.
    ///
    /// Returns `None` when no such staff member exists; the caller reports
    /// that the same way as a failed password check.
    pub async fn find_for_login(
        &self,
        username: &str,
        hospital: &str,
    ) -> SearchResult<Option<StaffCredentials>> {
        let row = sqlx::query(
            "SELECT id, username, password FROM staff WHERE username = $1 AND hospital = $2",
        )
        .bind(username)
        .bind(hospital)
        .fetch_optional(&self.pool)
        .await
        .map_err(SearchError::StaffPersistence)?;

        row.map(|row| {
            Ok(StaffCredentials {
                id: row.try_get("id").map_err(SearchError::StaffPersistence)?,
                username: row
                    .try_get("username")
                    .map_err(SearchError::StaffPersistence)?,
                password_hash: row
                    .try_get("password")
                    .map_err(SearchError::StaffPersistence)?,
            })
        })
        .transpose()
    }
}
