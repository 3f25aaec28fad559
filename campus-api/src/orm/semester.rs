use diesel::prelude::*;

use crate::models::{NewSemester, Semester, SemesterChanges, SemesterInput};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(semesters);

pub fn list_semesters(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Semester>, diesel::result::Error> {
    use crate::schema::semesters::dsl::*;

    let mut count_query = semesters.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = semesters.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()));
        page_query = page_query.filter(name.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(name.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Semester>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn list_deleted_semesters(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Semester>, diesel::result::Error> {
    use crate::schema::semesters::dsl::*;

    let mut count_query = semesters.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = semesters.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()));
        page_query = page_query.filter(name.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Semester>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_semester_by_id(
    conn: &mut SqliteConnection,
    semester_id: i32,
) -> Result<Option<Semester>, diesel::result::Error> {
    use crate::schema::semesters::dsl::*;
    semesters
        .filter(id.eq(semester_id))
        .filter(deleted_at.is_null())
        .first::<Semester>(conn)
        .optional()
}

/// Checks the per-year name rule: a semester name must be unique among the
/// non-deleted semesters of its academic year.
pub fn semester_name_exists_in_year(
    conn: &mut SqliteConnection,
    semester_name: &str,
    year_id: i32,
    exclude_id: Option<i32>,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::semesters::dsl::*;

    let mut query = semesters
        .filter(name.eq(semester_name))
        .filter(academic_year_id.eq(year_id))
        .filter(deleted_at.is_null())
        .into_boxed();
    if let Some(excluded) = exclude_id {
        query = query.filter(id.ne(excluded));
    }
    query
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

pub fn insert_semester(
    conn: &mut SqliteConnection,
    input: &SemesterInput,
) -> Result<Semester, diesel::result::Error> {
    use crate::schema::semesters::dsl::*;

    let new_semester = NewSemester {
        name: input.name.clone(),
        academic_year_id: input.academic_year_id,
        start_date: input.start_date,
        end_date: input.end_date,
    };

    diesel::insert_into(semesters)
        .values(&new_semester)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    semesters.filter(id.eq(last_id)).first::<Semester>(conn)
}

pub fn update_semester(
    conn: &mut SqliteConnection,
    semester_id: i32,
    input: &SemesterInput,
) -> Result<Semester, diesel::result::Error> {
    use crate::schema::semesters::dsl::*;

    diesel::update(semesters.filter(id.eq(semester_id)))
        .set(&SemesterChanges {
            name: input.name.clone(),
            academic_year_id: input.academic_year_id,
            start_date: input.start_date,
            end_date: input.end_date,
        })
        .execute(conn)?;

    semesters.filter(id.eq(semester_id)).first::<Semester>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AcademicYearInput;
    use crate::orm::academic_year::insert_academic_year;
    use crate::orm::testing::setup_test_db;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn seed_year(conn: &mut SqliteConnection) -> i32 {
        insert_academic_year(
            conn,
            &AcademicYearInput {
                name: "2025-2026".to_string(),
                start_date: ts(2025, 9, 1),
                end_date: ts(2026, 8, 31),
            },
        )
        .unwrap()
        .id
    }

    fn semester_input(name: &str, year_id: i32) -> SemesterInput {
        SemesterInput {
            name: name.to_string(),
            academic_year_id: year_id,
            start_date: ts(2025, 9, 1),
            end_date: ts(2026, 1, 15),
        }
    }

    #[test]
    fn test_insert_and_search() {
        let mut conn = setup_test_db();
        let year_id = seed_year(&mut conn);
        insert_semester(&mut conn, &semester_input("HK1", year_id)).unwrap();
        insert_semester(&mut conn, &semester_input("HK2", year_id)).unwrap();

        let hits = list_semesters(
            &mut conn,
            &ListParams::new(None, None, Some("HK1".to_string())),
        )
        .unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.data[0].academic_year_id, year_id);
    }

    #[test]
    fn test_name_rule_scoped_to_year() {
        let mut conn = setup_test_db();
        let year_id = seed_year(&mut conn);
        let other_year = insert_academic_year(
            &mut conn,
            &AcademicYearInput {
                name: "2026-2027".to_string(),
                start_date: ts(2026, 9, 1),
                end_date: ts(2027, 8, 31),
            },
        )
        .unwrap()
        .id;
        let hk1 = insert_semester(&mut conn, &semester_input("HK1", year_id)).unwrap();

        assert!(semester_name_exists_in_year(&mut conn, "HK1", year_id, None).unwrap());
        // Same name in a different year is fine.
        assert!(!semester_name_exists_in_year(&mut conn, "HK1", other_year, None).unwrap());
        // Self-exclusion for updates.
        assert!(!semester_name_exists_in_year(&mut conn, "HK1", year_id, Some(hk1.id)).unwrap());

        // A soft-deleted semester frees its name.
        soft_delete(&mut conn, hk1.id).unwrap();
        assert!(!semester_name_exists_in_year(&mut conn, "HK1", year_id, None).unwrap());
    }

    #[test]
    fn test_semester_survives_parent_soft_delete() {
        // Soft-deleting an academic year does not cascade to its semesters.
        let mut conn = setup_test_db();
        let year_id = seed_year(&mut conn);
        let hk1 = insert_semester(&mut conn, &semester_input("HK1", year_id)).unwrap();

        crate::orm::academic_year::soft_delete(&mut conn, year_id).unwrap();
        let still_there = get_semester_by_id(&mut conn, hk1.id).unwrap();
        assert!(still_there.is_some());
    }
}
