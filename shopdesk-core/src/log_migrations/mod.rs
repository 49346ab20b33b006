//! Log database migrations - embedded SQL files
//!
//! Each migration is a (name, sql) pair compiled in with include_str! and
//! applied once, in order, by the logging service.

/// All log migrations in application order.
///
/// To add one, create `NNN_description.sql` next to this file and append
/// an entry here.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
