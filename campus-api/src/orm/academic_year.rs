use chrono::Utc;
use diesel::prelude::*;

use crate::models::{AcademicYear, AcademicYearChanges, AcademicYearInput, NewAcademicYear};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(academic_years);

/// Returns the live academic years, searchable by name, ordered by name.
pub fn list_academic_years(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<AcademicYear>, diesel::result::Error> {
    use crate::schema::academic_years::dsl::*;

    let mut count_query = academic_years.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = academic_years.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()));
        page_query = page_query.filter(name.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(name.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<AcademicYear>(conn)?;
    Ok(Page::new(data, total, params))
}

/// Mirror of the listing over soft-deleted rows, most recently deleted first.
pub fn list_deleted_academic_years(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<AcademicYear>, diesel::result::Error> {
    use crate::schema::academic_years::dsl::*;

    let mut count_query = academic_years.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = academic_years.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()));
        page_query = page_query.filter(name.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<AcademicYear>(conn)?;
    Ok(Page::new(data, total, params))
}

/// Try to find a live academic year by id.
/// Returns Ok(Some) if found and not soft-deleted, Ok(None) otherwise.
pub fn get_academic_year_by_id(
    conn: &mut SqliteConnection,
    year_id: i32,
) -> Result<Option<AcademicYear>, diesel::result::Error> {
    use crate::schema::academic_years::dsl::*;
    academic_years
        .filter(id.eq(year_id))
        .filter(deleted_at.is_null())
        .first::<AcademicYear>(conn)
        .optional()
}

/// Checks whether a year with this name already exists, optionally excluding
/// one id (the row being updated).
pub fn academic_year_name_exists(
    conn: &mut SqliteConnection,
    year_name: &str,
    exclude_id: Option<i32>,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::academic_years::dsl::*;

    let mut query = academic_years.filter(name.eq(year_name)).into_boxed();
    if let Some(excluded) = exclude_id {
        query = query.filter(id.ne(excluded));
    }
    query
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

pub fn insert_academic_year(
    conn: &mut SqliteConnection,
    input: &AcademicYearInput,
) -> Result<AcademicYear, diesel::result::Error> {
    use crate::schema::academic_years::dsl::*;

    let now = Utc::now().naive_utc();
    let new_year = NewAcademicYear {
        name: input.name.clone(),
        start_date: input.start_date,
        end_date: input.end_date,
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(academic_years)
        .values(&new_year)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    academic_years.filter(id.eq(last_id)).first::<AcademicYear>(conn)
}

/// Applies a full-field replace and bumps `updated_at`. The caller is
/// expected to have checked existence; a vanished row surfaces as NotFound.
pub fn update_academic_year(
    conn: &mut SqliteConnection,
    year_id: i32,
    input: &AcademicYearInput,
) -> Result<AcademicYear, diesel::result::Error> {
    use crate::schema::academic_years::dsl::*;

    diesel::update(academic_years.filter(id.eq(year_id)))
        .set(&AcademicYearChanges {
            name: input.name.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            updated_at: Utc::now().naive_utc(),
        })
        .execute(conn)?;

    academic_years.filter(id.eq(year_id)).first::<AcademicYear>(conn)
}
