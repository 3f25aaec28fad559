//! The uniform soft-delete contract shared by every top-level entity table.
//!
//! All of those tables carry an `id` primary key and a nullable `deleted_at`
//! timestamp, so the whole soft-delete / restore / permanent-delete family
//! (single and bulk) can be generated per table by [`soft_delete_ops!`]
//! instead of being hand-copied into each resource module.

/// Outcome of a single-row soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDeleteOutcome {
    Deleted,
    AlreadyDeleted,
    NotFound,
}

/// Outcome of a single-row restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    NotDeleted,
    NotFound,
}

/// Generates the soft-delete family over one table's `id` and `deleted_at`
/// columns:
///
/// - `soft_delete(conn, id)`: flags a live row, reporting already-deleted
///   and missing rows distinctly
/// - `restore(conn, id)`: clears the flag on a deleted row
/// - `permanent_delete(conn, id)`: physically removes the row regardless of
///   its soft-delete state, returning whether it existed
/// - `bulk_soft_delete` / `bulk_restore` / `bulk_permanent_delete`: apply
///   the operation to every eligible id and return the affected row count,
///   silently skipping ids that are missing or in the wrong state
macro_rules! soft_delete_ops {
    ($table:ident) => {
        pub fn soft_delete(
            conn: &mut diesel::SqliteConnection,
            entity_id: i32,
        ) -> Result<crate::orm::soft_delete::SoftDeleteOutcome, diesel::result::Error> {
            use crate::orm::soft_delete::SoftDeleteOutcome;
            use crate::schema::$table::dsl::*;
            use diesel::prelude::*;

            let flag = $table
                .filter(id.eq(entity_id))
                .select(deleted_at)
                .first::<Option<chrono::NaiveDateTime>>(conn)
                .optional()?;
            match flag {
                None => Ok(SoftDeleteOutcome::NotFound),
                Some(Some(_)) => Ok(SoftDeleteOutcome::AlreadyDeleted),
                Some(None) => {
                    diesel::update($table.filter(id.eq(entity_id)))
                        .set(deleted_at.eq(Some(chrono::Utc::now().naive_utc())))
                        .execute(conn)?;
                    Ok(SoftDeleteOutcome::Deleted)
                }
            }
        }

        pub fn restore(
            conn: &mut diesel::SqliteConnection,
            entity_id: i32,
        ) -> Result<crate::orm::soft_delete::RestoreOutcome, diesel::result::Error> {
            use crate::orm::soft_delete::RestoreOutcome;
            use crate::schema::$table::dsl::*;
            use diesel::prelude::*;

            let flag = $table
                .filter(id.eq(entity_id))
                .select(deleted_at)
                .first::<Option<chrono::NaiveDateTime>>(conn)
                .optional()?;
            match flag {
                None => Ok(RestoreOutcome::NotFound),
                Some(None) => Ok(RestoreOutcome::NotDeleted),
                Some(Some(_)) => {
                    diesel::update($table.filter(id.eq(entity_id)))
                        .set(deleted_at.eq(None::<chrono::NaiveDateTime>))
                        .execute(conn)?;
                    Ok(RestoreOutcome::Restored)
                }
            }
        }

        pub fn permanent_delete(
            conn: &mut diesel::SqliteConnection,
            entity_id: i32,
        ) -> Result<bool, diesel::result::Error> {
            use crate::schema::$table::dsl::*;
            use diesel::prelude::*;

            let rows = diesel::delete($table.filter(id.eq(entity_id))).execute(conn)?;
            Ok(rows > 0)
        }

        pub fn bulk_soft_delete(
            conn: &mut diesel::SqliteConnection,
            ids: &[i32],
        ) -> Result<usize, diesel::result::Error> {
            use crate::schema::$table::dsl::*;
            use diesel::prelude::*;

            diesel::update(
                $table
                    .filter(id.eq_any(ids.iter().copied()))
                    .filter(deleted_at.is_null()),
            )
            .set(deleted_at.eq(Some(chrono::Utc::now().naive_utc())))
            .execute(conn)
        }

        pub fn bulk_restore(
            conn: &mut diesel::SqliteConnection,
            ids: &[i32],
        ) -> Result<usize, diesel::result::Error> {
            use crate::schema::$table::dsl::*;
            use diesel::prelude::*;

            diesel::update(
                $table
                    .filter(id.eq_any(ids.iter().copied()))
                    .filter(deleted_at.is_not_null()),
            )
            .set(deleted_at.eq(None::<chrono::NaiveDateTime>))
            .execute(conn)
        }

        pub fn bulk_permanent_delete(
            conn: &mut diesel::SqliteConnection,
            ids: &[i32],
        ) -> Result<usize, diesel::result::Error> {
            use crate::schema::$table::dsl::*;
            use diesel::prelude::*;

            diesel::delete($table.filter(id.eq_any(ids.iter().copied()))).execute(conn)
        }
    };
}

pub(crate) use soft_delete_ops;
