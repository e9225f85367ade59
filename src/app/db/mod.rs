pub mod companies;
pub mod departments;
pub mod employees;
pub mod invites;
pub mod job_positions;
pub mod memberships;
pub mod scoped;
pub mod sessions;
pub mod users;

/// Typed unique-violation detection. Returns the subset of `fields` named by
/// the violated constraint (SQLite reports "UNIQUE constraint failed:
/// table.column"), or None when the error is not a unique violation.
/// Replaces fragile matching on full error prose: the error kind is checked
/// structurally and only the constraint text is scanned for column names.
pub fn unique_violation<'a>(
    err: &sqlx::Error,
    fields: &[&'a str],
) -> Option<Vec<&'a str>> {
    let db_err = match err {
        sqlx::Error::Database(db_err) => db_err,
        _ => return None,
    };
    if !db_err.is_unique_violation() {
        return None;
    }
    let message = db_err.message();
    let named: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| message.contains(field))
        .collect();
    if named.is_empty() {
        // Unique violation on a column the caller did not map; let the
        // caller surface a generic conflict rather than a 500.
        Some(Vec::new())
    } else {
        Some(named)
    }
}
