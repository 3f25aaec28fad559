use chrono::Utc;
use diesel::prelude::*;

use crate::models::{Lecturer, LecturerChanges, LecturerInput, NewLecturer};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(lecturers);

pub fn list_lecturers(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Lecturer>, diesel::result::Error> {
    use crate::schema::lecturers::dsl::*;

    let mut count_query = lecturers.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = lecturers.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(email.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(email.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(name.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Lecturer>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn list_deleted_lecturers(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Lecturer>, diesel::result::Error> {
    use crate::schema::lecturers::dsl::*;

    let mut count_query = lecturers.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = lecturers.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(email.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(email.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Lecturer>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_lecturer_by_id(
    conn: &mut SqliteConnection,
    lecturer_id: i32,
) -> Result<Option<Lecturer>, diesel::result::Error> {
    use crate::schema::lecturers::dsl::*;
    lecturers
        .filter(id.eq(lecturer_id))
        .filter(deleted_at.is_null())
        .first::<Lecturer>(conn)
        .optional()
}

/// The email column carries a UNIQUE constraint over all rows, so this check
/// does not exclude soft-deleted lecturers.
pub fn lecturer_email_exists(
    conn: &mut SqliteConnection,
    lecturer_email: &str,
    exclude_id: Option<i32>,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::lecturers::dsl::*;

    let mut query = lecturers.filter(email.eq(lecturer_email)).into_boxed();
    if let Some(excluded) = exclude_id {
        query = query.filter(id.ne(excluded));
    }
    query
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

pub fn insert_lecturer(
    conn: &mut SqliteConnection,
    input: &LecturerInput,
) -> Result<Lecturer, diesel::result::Error> {
    use crate::schema::lecturers::dsl::*;

    let new_lecturer = NewLecturer {
        name: input.name.clone(),
        email: input.email.clone(),
        phone_number: input.phone_number.clone(),
        department_id: input.department_id,
        academic_rank: input.academic_rank.clone(),
        degree: input.degree.clone(),
        specialization: input.specialization.clone(),
        avatar_url: input.avatar_url.clone(),
        is_active: input.is_active.unwrap_or(true),
        created_at: Utc::now().naive_utc(),
    };

    diesel::insert_into(lecturers)
        .values(&new_lecturer)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    lecturers.filter(id.eq(last_id)).first::<Lecturer>(conn)
}

pub fn update_lecturer(
    conn: &mut SqliteConnection,
    lecturer_id: i32,
    input: &LecturerInput,
) -> Result<Lecturer, diesel::result::Error> {
    use crate::schema::lecturers::dsl::*;

    diesel::update(lecturers.filter(id.eq(lecturer_id)))
        .set(&LecturerChanges {
            name: input.name.clone(),
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
            department_id: input.department_id,
            academic_rank: input.academic_rank.clone(),
            degree: input.degree.clone(),
            specialization: input.specialization.clone(),
            avatar_url: input.avatar_url.clone(),
            is_active: input.is_active.unwrap_or(true),
            updated_at: Some(Utc::now().naive_utc()),
        })
        .execute(conn)?;

    lecturers.filter(id.eq(lecturer_id)).first::<Lecturer>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;

    fn lecturer_input(name: &str, email: &str) -> LecturerInput {
        LecturerInput {
            name: name.to_string(),
            email: email.to_string(),
            phone_number: None,
            department_id: None,
            academic_rank: None,
            degree: None,
            specialization: None,
            avatar_url: None,
            is_active: None,
        }
    }

    #[test]
    fn test_insert_defaults_active() {
        let mut conn = setup_test_db();
        let lecturer =
            insert_lecturer(&mut conn, &lecturer_input("Dr. Chi Pham", "chi@example.edu")).unwrap();
        assert!(lecturer.is_active);
        assert!(lecturer.updated_at.is_none());
    }

    #[test]
    fn test_update_sets_updated_at() {
        let mut conn = setup_test_db();
        let lecturer =
            insert_lecturer(&mut conn, &lecturer_input("Dr. Chi Pham", "chi@example.edu")).unwrap();

        let mut input = lecturer_input("Dr. Chi Pham", "chi@example.edu");
        input.academic_rank = Some("Associate Professor".to_string());
        input.is_active = Some(false);
        let updated = update_lecturer(&mut conn, lecturer.id, &input).unwrap();
        assert_eq!(updated.academic_rank.as_deref(), Some("Associate Professor"));
        assert!(!updated.is_active);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_email_exists_includes_soft_deleted() {
        let mut conn = setup_test_db();
        let lecturer =
            insert_lecturer(&mut conn, &lecturer_input("Dr. Chi Pham", "chi@example.edu")).unwrap();

        assert!(lecturer_email_exists(&mut conn, "chi@example.edu", None).unwrap());
        assert!(!lecturer_email_exists(&mut conn, "chi@example.edu", Some(lecturer.id)).unwrap());

        // The UNIQUE column still holds the address after a soft delete.
        soft_delete(&mut conn, lecturer.id).unwrap();
        assert!(lecturer_email_exists(&mut conn, "chi@example.edu", None).unwrap());
    }
}
