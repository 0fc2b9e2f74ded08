//! Predicate compilation for the relational patient search.
//!
//! The builder accumulates typed conjunctive clauses and a parallel ordered
//! parameter list. Placeholders (`$N`) are derived from the parameter list
//! length; user-supplied values are only ever bound, never interpolated into
//! the query text.

use crate::patient::PatientSearchQuery;
use crate::{SearchError, SearchResult};

/// Columns selected for every patient search, in scan order.
const PATIENT_COLUMNS: &str = "first_name_th, middle_name_th, last_name_th, \
     first_name_en, middle_name_en, last_name_en, date_of_birth, patient_hn, \
     national_id, passport_id, phone_number, email, gender, hospital, \
     created_at, updated_at";

/// A compiled, parameterized query: SQL text plus the values to bind, in
/// placeholder order.
#[derive(Clone, Debug)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Accumulates conjunctive predicate clauses and their bound values.
#[derive(Debug, Default)]
pub struct PredicateBuilder {
    clauses: Vec<String>,
    params: Vec<String>,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clauses accumulated so far.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn bind(&mut self, value: String) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// Exact equality against one column.
    pub fn equals(&mut self, column: &str, value: &str) {
        let n = self.bind(value.to_owned());
        self.clauses.push(format!("{column} = ${n}"));
    }

    /// Case-insensitive containment against one column.
    pub fn contains(&mut self, column: &str, value: &str) {
        let n = self.bind(wildcarded(value));
        self.clauses.push(format!("{column} ILIKE ${n}"));
    }

    /// Case-insensitive containment against either script variant of a name
    /// column, the same wildcarded value bound once per variant.
    ///
    /// The group is parenthesized so the inner OR can never swallow adjacent
    /// conjunctive clauses.
    pub fn contains_either(&mut self, en_column: &str, th_column: &str, value: &str) {
        let en = self.bind(wildcarded(value));
        let th = self.bind(wildcarded(value));
        self.clauses
            .push(format!("({en_column} ILIKE ${en} OR {th_column} ILIKE ${th})"));
    }

    /// Textual containment against a date column, supporting partial dates
    /// such as a bare year.
    pub fn date_contains(&mut self, column: &str, value: &str) {
        let n = self.bind(wildcarded(value));
        self.clauses.push(format!("{column}::text LIKE ${n}"));
    }

    /// Assemble the final query from a SELECT head and an optional tail.
    pub fn build(self, select: &str, tail: &str) -> CompiledQuery {
        let mut sql = format!("{select} WHERE {}", self.clauses.join(" AND "));
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(tail);
        }
        CompiledQuery {
            sql,
            params: self.params,
        }
    }
}

fn wildcarded(value: &str) -> String {
    format!("%{value}%")
}

/// Compile a patient search for one hospital.
///
/// The hospital scope is always the first clause and the first bound
/// parameter. Supplied fields are combined with AND; name fields expand to a
/// parenthesized OR group over their two script variants.
///
/// # Errors
/// Returns [`SearchError::EmptyQuery`] when the specification carries no
/// usable field beyond the mandatory hospital scope; a match-all query is
/// never compiled.
pub fn compile_search(hospital: &str, query: &PatientSearchQuery) -> SearchResult<CompiledQuery> {
    let mut builder = PredicateBuilder::new();
    builder.equals("hospital", hospital);

    if let Some(value) = query.national_id() {
        builder.equals("national_id", value);
    }
    if let Some(value) = query.passport_id() {
        builder.equals("passport_id", value);
    }
    if let Some(value) = query.first_name() {
        builder.contains_either("first_name_en", "first_name_th", value);
    }
    if let Some(value) = query.middle_name() {
        builder.contains_either("middle_name_en", "middle_name_th", value);
    }
    if let Some(value) = query.last_name() {
        builder.contains_either("last_name_en", "last_name_th", value);
    }
    if let Some(value) = query.date_of_birth() {
        builder.date_contains("date_of_birth", value);
    }
    if let Some(value) = query.phone_number() {
        builder.contains("phone_number", value);
    }
    if let Some(value) = query.email() {
        builder.contains("email", value);
    }

    // Only the mandatory hospital scope: refuse to match every patient.
    if builder.len() == 1 {
        return Err(SearchError::EmptyQuery);
    }

    Ok(builder.build(
        &format!("SELECT {PATIENT_COLUMNS} FROM patient"),
        "ORDER BY patient_hn",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::tests::query;

    #[test]
    fn hospital_scope_is_always_the_first_parameter() {
        let compiled = compile_search("Hospital A", &query(&[("national_id", "1234567890123")]))
            .expect("compiles");
        assert!(compiled.sql.contains("WHERE hospital = $1 AND national_id = $2"));
        assert_eq!(compiled.params[0], "Hospital A");
        assert_eq!(compiled.params[1], "1234567890123");
    }

    #[test]
    fn rejects_a_query_with_no_fields() {
        let err = compile_search("Hospital A", &query(&[])).expect_err("must not compile");
        assert!(matches!(err, SearchError::EmptyQuery));
    }

    #[test]
    fn name_fragment_checks_both_script_variants() {
        let compiled =
            compile_search("Hospital A", &query(&[("first_name", "Test")])).expect("compiles");
        assert!(compiled
            .sql
            .contains("(first_name_en ILIKE $2 OR first_name_th ILIKE $3)"));
        assert_eq!(compiled.params, vec!["Hospital A", "%Test%", "%Test%"]);
    }

    // The OR group stays parenthesized even when surrounded by further AND
    // clauses; this is the chosen precedence policy, not an accident of
    // concatenation order.
    #[test]
    fn or_groups_keep_their_parentheses_between_and_clauses() {
        let compiled = compile_search(
            "Hospital A",
            &query(&[("first_name", "Test"), ("last_name", "Last")]),
        )
        .expect("compiles");
        assert!(compiled.sql.contains(
            "(first_name_en ILIKE $2 OR first_name_th ILIKE $3) \
             AND (last_name_en ILIKE $4 OR last_name_th ILIKE $5)"
        ));
    }

    #[test]
    fn placeholders_number_across_mixed_fields() {
        let compiled = compile_search(
            "Hospital A",
            &query(&[
                ("passport_id", "X1"),
                ("middle_name", "Middle"),
                ("date_of_birth", "1992"),
                ("email", "test@email.com"),
            ]),
        )
        .expect("compiles");

        assert!(compiled.sql.contains("passport_id = $2"));
        assert!(compiled
            .sql
            .contains("(middle_name_en ILIKE $3 OR middle_name_th ILIKE $4)"));
        assert!(compiled.sql.contains("date_of_birth::text LIKE $5"));
        assert!(compiled.sql.contains("email ILIKE $6"));
        assert_eq!(
            compiled.params,
            vec![
                "Hospital A",
                "X1",
                "%Middle%",
                "%Middle%",
                "%1992%",
                "%test@email.com%",
            ]
        );
    }

    #[test]
    fn partial_dates_are_matched_textually() {
        let compiled = compile_search("Hospital B", &query(&[("date_of_birth", "1992-03")]))
            .expect("compiles");
        assert!(compiled.sql.contains("date_of_birth::text LIKE $2"));
        assert_eq!(compiled.params[1], "%1992-03%");
    }

    #[test]
    fn results_are_deterministically_ordered() {
        let compiled =
            compile_search("Hospital B", &query(&[("phone_number", "0123")])).expect("compiles");
        assert!(compiled.sql.ends_with("ORDER BY patient_hn"));
    }
}
