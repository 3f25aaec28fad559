use chrono::Utc;
use diesel::prelude::*;

use crate::models::{NewThesis, Thesis, ThesisChanges, ThesisInput};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(theses);

pub fn list_theses(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Thesis>, diesel::result::Error> {
    use crate::schema::theses::dsl::*;

    let mut count_query = theses.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = theses.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(title.like(pattern.clone()));
        page_query = page_query.filter(title.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(title.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Thesis>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn list_deleted_theses(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Thesis>, diesel::result::Error> {
    use crate::schema::theses::dsl::*;

    let mut count_query = theses.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = theses.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(title.like(pattern.clone()));
        page_query = page_query.filter(title.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Thesis>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_thesis_by_id(
    conn: &mut SqliteConnection,
    thesis_id: i32,
) -> Result<Option<Thesis>, diesel::result::Error> {
    use crate::schema::theses::dsl::*;
    theses
        .filter(id.eq(thesis_id))
        .filter(deleted_at.is_null())
        .first::<Thesis>(conn)
        .optional()
}

pub fn insert_thesis(
    conn: &mut SqliteConnection,
    input: &ThesisInput,
) -> Result<Thesis, diesel::result::Error> {
    use crate::schema::theses::dsl::*;

    let now = Utc::now().naive_utc();
    let new_thesis = NewThesis {
        title: input.title.clone(),
        description: input.description.clone(),
        student_id: input.student_id,
        supervisor_id: input.supervisor_id,
        examiner_id: input.examiner_id,
        academic_year_id: input.academic_year_id,
        semester_id: input.semester_id,
        submission_date: input.submission_date,
        status: input.status.clone(),
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(theses)
        .values(&new_thesis)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    theses.filter(id.eq(last_id)).first::<Thesis>(conn)
}

pub fn update_thesis(
    conn: &mut SqliteConnection,
    thesis_id: i32,
    input: &ThesisInput,
) -> Result<Thesis, diesel::result::Error> {
    use crate::schema::theses::dsl::*;

    diesel::update(theses.filter(id.eq(thesis_id)))
        .set(&ThesisChanges {
            title: input.title.clone(),
            description: input.description.clone(),
            student_id: input.student_id,
            supervisor_id: input.supervisor_id,
            examiner_id: input.examiner_id,
            academic_year_id: input.academic_year_id,
            semester_id: input.semester_id,
            submission_date: input.submission_date,
            status: input.status.clone(),
            updated_at: Utc::now().naive_utc(),
        })
        .execute(conn)?;

    theses.filter(id.eq(thesis_id)).first::<Thesis>(conn)
}
