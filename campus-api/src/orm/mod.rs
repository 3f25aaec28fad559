use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

pub mod academic_year;
mod db;
pub mod department;
pub mod internship;
pub mod lecturer;
pub mod menu;
pub mod pagination;
pub mod partner;
pub mod permission;
pub mod role;
pub mod selection;
pub mod semester;
pub mod soft_delete;
pub mod student;
pub mod testing;
pub mod thesis;
pub mod user;

pub use db::*;

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    last_insert_rowid: i64,
}

/// Reads back the row id of the most recent insert on this connection.
pub(crate) fn last_insert_rowid(
    conn: &mut SqliteConnection,
) -> Result<i32, diesel::result::Error> {
    diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)
        .map(|row| row.last_insert_rowid as i32)
}

/// True when `err` is a unique-constraint violation. Used by callers that
/// insert first and sort out duplicates afterwards.
pub fn is_unique_violation(err: &diesel::result::Error) -> bool {
    matches!(
        err,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )
    )
}
