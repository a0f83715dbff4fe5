//! Identifier quoting for table-name driven queries.
//!
//! Table names reach the gateway as plain strings. They are only ever placed
//! into SQL as quoted identifiers, never as string literals. A dotted name is
//! split and each part quoted on its own, so `db.table` addresses a table in
//! another schema.

use super::DatabaseBackend;

/// Quotes a (possibly dotted) identifier for the given backend.
///
/// Embedded quote characters are doubled, so the result always parses as
/// identifiers and never terminates the quoting early.
pub fn quote_identifier(backend: DatabaseBackend, name: &str) -> String {
    let quote = match backend {
        DatabaseBackend::MySql => '`',
        DatabaseBackend::Postgres | DatabaseBackend::Sqlite => '"',
    };

    name.split('.')
        .map(|part| quote_part(part, quote))
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_part(part: &str, quote: char) -> String {
    let mut quoted = String::with_capacity(part.len() + 2);
    quoted.push(quote);
    for c in part.chars() {
        if c == quote {
            quoted.push(quote);
        }
        quoted.push(c);
    }
    quoted.push(quote);
    quoted
}
