use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Thesis status is free text by design; the conventional values are
/// "Draft", "Submitted", "Approved" and "Rejected".
#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::theses)]
#[ts(export)]
pub struct Thesis {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub student_id: i32,
    pub supervisor_id: i32,
    pub examiner_id: Option<i32>,
    pub academic_year_id: i32,
    pub semester_id: i32,
    pub submission_date: NaiveDateTime,
    pub status: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::theses)]
pub struct NewThesis {
    pub title: String,
    pub description: Option<String>,
    pub student_id: i32,
    pub supervisor_id: i32,
    pub examiner_id: Option<i32>,
    pub academic_year_id: i32,
    pub semester_id: i32,
    pub submission_date: NaiveDateTime,
    pub status: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ThesisInput {
    pub title: String,
    pub description: Option<String>,
    pub student_id: i32,
    pub supervisor_id: i32,
    pub examiner_id: Option<i32>,
    pub academic_year_id: i32,
    pub semester_id: i32,
    pub submission_date: NaiveDateTime,
    pub status: Option<String>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::theses)]
#[diesel(treat_none_as_null = true)]
pub struct ThesisChanges {
    pub title: String,
    pub description: Option<String>,
    pub student_id: i32,
    pub supervisor_id: i32,
    pub examiner_id: Option<i32>,
    pub academic_year_id: i32,
    pub semester_id: i32,
    pub submission_date: NaiveDateTime,
    pub status: Option<String>,
    pub updated_at: NaiveDateTime,
}
