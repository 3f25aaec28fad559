use diesel::prelude::*;

use crate::models::{NewStudent, Student, StudentChanges, StudentInput};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(students);

/// Live students, searchable over full name, student code and email,
/// ordered by full name.
pub fn list_students(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Student>, diesel::result::Error> {
    use crate::schema::students::dsl::*;

    let mut count_query = students.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = students.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(
            full_name
                .like(pattern.clone())
                .or(student_code.like(pattern.clone()))
                .or(email.like(pattern.clone())),
        );
        page_query = page_query.filter(
            full_name
                .like(pattern.clone())
                .or(student_code.like(pattern.clone()))
                .or(email.like(pattern)),
        );
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(full_name.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Student>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn list_deleted_students(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Student>, diesel::result::Error> {
    use crate::schema::students::dsl::*;

    let mut count_query = students.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = students.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(
            full_name
                .like(pattern.clone())
                .or(student_code.like(pattern.clone()))
                .or(email.like(pattern.clone())),
        );
        page_query = page_query.filter(
            full_name
                .like(pattern.clone())
                .or(student_code.like(pattern.clone()))
                .or(email.like(pattern)),
        );
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Student>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_student_by_id(
    conn: &mut SqliteConnection,
    student_id: i32,
) -> Result<Option<Student>, diesel::result::Error> {
    use crate::schema::students::dsl::*;
    students
        .filter(id.eq(student_id))
        .filter(deleted_at.is_null())
        .first::<Student>(conn)
        .optional()
}

pub fn insert_student(
    conn: &mut SqliteConnection,
    input: &StudentInput,
) -> Result<Student, diesel::result::Error> {
    use crate::schema::students::dsl::*;

    let new_student = NewStudent {
        student_code: input.student_code.clone(),
        full_name: input.full_name.clone(),
        date_of_birth: input.date_of_birth,
        email: input.email.clone(),
        phone_number: input.phone_number.clone(),
        department_id: input.department_id,
    };

    diesel::insert_into(students)
        .values(&new_student)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    students.filter(id.eq(last_id)).first::<Student>(conn)
}

pub fn update_student(
    conn: &mut SqliteConnection,
    student_id: i32,
    input: &StudentInput,
) -> Result<Student, diesel::result::Error> {
    use crate::schema::students::dsl::*;

    diesel::update(students.filter(id.eq(student_id)))
        .set(&StudentChanges {
            student_code: input.student_code.clone(),
            full_name: input.full_name.clone(),
            date_of_birth: input.date_of_birth,
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
            department_id: input.department_id,
        })
        .execute(conn)?;

    students.filter(id.eq(student_id)).first::<Student>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;
    use chrono::NaiveDate;

    pub(crate) fn student_input(code: &str, full_name: &str) -> StudentInput {
        StudentInput {
            student_code: code.to_string(),
            full_name: full_name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2003, 5, 14)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            email: format!("{}@student.example.edu", code.to_lowercase()),
            phone_number: None,
            department_id: None,
        }
    }

    #[test]
    fn test_create_get_round_trip() {
        let mut conn = setup_test_db();
        let created = insert_student(&mut conn, &student_input("SV001", "An Nguyen")).unwrap();
        let fetched = get_student_by_id(&mut conn, created.id).unwrap().unwrap();
        assert_eq!(fetched.student_code, "SV001");
        assert_eq!(fetched.full_name, "An Nguyen");
        assert_eq!(fetched.email, "sv001@student.example.edu");
        assert!(fetched.deleted_at.is_none());
    }

    #[test]
    fn test_update_replaces_nullable_fields() {
        let mut conn = setup_test_db();
        let mut input = student_input("SV001", "An Nguyen");
        input.phone_number = Some("0123456789".to_string());
        let created = insert_student(&mut conn, &input).unwrap();

        // Full replace: dropping the phone number writes NULL.
        input.phone_number = None;
        input.full_name = "An Tran".to_string();
        let updated = update_student(&mut conn, created.id, &input).unwrap();
        assert_eq!(updated.full_name, "An Tran");
        assert!(updated.phone_number.is_none());
    }

    #[test]
    fn test_search_matches_code_and_email() {
        let mut conn = setup_test_db();
        insert_student(&mut conn, &student_input("SV001", "An Nguyen")).unwrap();
        insert_student(&mut conn, &student_input("SV002", "Binh Le")).unwrap();

        let by_code = list_students(
            &mut conn,
            &ListParams::new(None, None, Some("SV002".to_string())),
        )
        .unwrap();
        assert_eq!(by_code.total, 1);
        assert_eq!(by_code.data[0].full_name, "Binh Le");

        let by_email = list_students(
            &mut conn,
            &ListParams::new(None, None, Some("sv001@student".to_string())),
        )
        .unwrap();
        assert_eq!(by_email.total, 1);
    }
}
