use diesel::prelude::*;

use crate::models::{Internship, InternshipChanges, InternshipDetail, InternshipInput, NewInternship};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(internships);

pub fn list_internships(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Internship>, diesel::result::Error> {
    use crate::schema::internships::dsl::*;

    let mut count_query = internships.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = internships.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(report_url.like(pattern.clone()));
        page_query = page_query.filter(report_url.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(id.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Internship>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn list_deleted_internships(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Internship>, diesel::result::Error> {
    use crate::schema::internships::dsl::*;

    let mut count_query = internships.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = internships.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(report_url.like(pattern.clone()));
        page_query = page_query.filter(report_url.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Internship>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_internship_by_id(
    conn: &mut SqliteConnection,
    internship_id: i32,
) -> Result<Option<Internship>, diesel::result::Error> {
    use crate::schema::internships::dsl::*;
    internships
        .filter(id.eq(internship_id))
        .filter(deleted_at.is_null())
        .first::<Internship>(conn)
        .optional()
}

/// Loads the internship with its related rows attached. The related rows are
/// fetched without the soft-delete filter so an internship stays readable
/// even after, say, its partner was soft-deleted.
pub fn get_internship_detail(
    conn: &mut SqliteConnection,
    internship_id: i32,
) -> Result<Option<InternshipDetail>, diesel::result::Error> {
    let internship = match get_internship_by_id(conn, internship_id)? {
        Some(row) => row,
        None => return Ok(None),
    };
    load_detail(conn, internship).map(Some)
}

fn load_detail(
    conn: &mut SqliteConnection,
    internship: Internship,
) -> Result<InternshipDetail, diesel::result::Error> {
    let student = {
        use crate::schema::students::dsl::*;
        students
            .filter(id.eq(internship.student_id))
            .first::<crate::models::Student>(conn)?
    };
    let partner = {
        use crate::schema::partners::dsl::*;
        partners
            .filter(id.eq(internship.partner_id))
            .first::<crate::models::Partner>(conn)?
    };
    let academic_year = {
        use crate::schema::academic_years::dsl::*;
        academic_years
            .filter(id.eq(internship.academic_year_id))
            .first::<crate::models::AcademicYear>(conn)?
    };
    let semester = {
        use crate::schema::semesters::dsl::*;
        semesters
            .filter(id.eq(internship.semester_id))
            .first::<crate::models::Semester>(conn)?
    };

    Ok(InternshipDetail {
        internship,
        student,
        partner,
        academic_year,
        semester,
    })
}

/// One non-deleted internship per (student, academic year, semester).
/// Soft-deleting a row frees the slot.
pub fn internship_exists_for(
    conn: &mut SqliteConnection,
    for_student: i32,
    for_year: i32,
    for_semester: i32,
    exclude_id: Option<i32>,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::internships::dsl::*;

    let mut query = internships
        .filter(student_id.eq(for_student))
        .filter(academic_year_id.eq(for_year))
        .filter(semester_id.eq(for_semester))
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

pub fn insert_internship(
    conn: &mut SqliteConnection,
    input: &InternshipInput,
) -> Result<InternshipDetail, diesel::result::Error> {
    use crate::schema::internships::dsl::*;

    let new_internship = NewInternship {
        student_id: input.student_id,
        partner_id: input.partner_id,
        academic_year_id: input.academic_year_id,
        semester_id: input.semester_id,
        report_url: input.report_url.clone(),
        grade: input.grade,
    };

    diesel::insert_into(internships)
        .values(&new_internship)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    let row = internships.filter(id.eq(last_id)).first::<Internship>(conn)?;
    load_detail(conn, row)
}

pub fn update_internship(
    conn: &mut SqliteConnection,
    internship_id: i32,
    input: &InternshipInput,
) -> Result<Internship, diesel::result::Error> {
    use crate::schema::internships::dsl::*;

    diesel::update(internships.filter(id.eq(internship_id)))
        .set(&InternshipChanges {
            student_id: input.student_id,
            partner_id: input.partner_id,
            academic_year_id: input.academic_year_id,
            semester_id: input.semester_id,
            report_url: input.report_url.clone(),
            grade: input.grade,
        })
        .execute(conn)?;

    internships.filter(id.eq(internship_id)).first::<Internship>(conn)
}
