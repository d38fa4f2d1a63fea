//! Row decoding helpers shared by the query modules.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Row, types::Type};

/// Reads a text column and parses it, reporting a conversion failure for
/// values the model types do not accept.
pub(crate) fn parse_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("Invalid value '{raw}': {e}").into(),
        )
    })
}

/// Reads a non-negative integer identifier column.
pub(crate) fn id_column(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)? as u64)
}

/// Builds `?, ?, ?` for an `IN (...)` clause.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;
    use crate::models::Status;

    #[test]
    fn test_parse_column_reports_bad_values() {
        let conn = Connection::open_in_memory().unwrap();
        let ok: Status = conn
            .query_row("SELECT 'in-progress'", [], |row| parse_column(row, 0))
            .unwrap();
        assert_eq!(ok, Status::InProgress);

        let err = conn
            .query_row("SELECT 'sideways'", [], |row| parse_column::<Status>(row, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _)
        ));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
