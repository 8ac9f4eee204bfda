/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Sentinel the admin UI sends for "no entity selected".
pub const UNASSIGNED_ID_SENTINEL: &str = "-1";

/// Parse an identifier that may carry the `"-1"` sentinel.
///
/// Empty strings and the sentinel map to `None`; anything else must be a
/// positive integer.
pub fn parse_optional_id(raw: &str) -> Result<Option<DbId>, crate::error::CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == UNASSIGNED_ID_SENTINEL {
        return Ok(None);
    }
    match trimmed.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(Some(id)),
        _ => Err(crate::error::CoreError::Validation(format!(
            "Invalid identifier '{trimmed}'"
        ))),
    }
}
