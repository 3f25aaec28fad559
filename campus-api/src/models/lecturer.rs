use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::lecturers)]
#[ts(export)]
pub struct Lecturer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: Option<i32>,
    pub academic_rank: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::lecturers)]
pub struct NewLecturer {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: Option<i32>,
    pub academic_rank: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct LecturerInput {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: Option<i32>,
    pub academic_rank: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub avatar_url: Option<String>,
    /// Defaults to true when omitted.
    pub is_active: Option<bool>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::lecturers)]
#[diesel(treat_none_as_null = true)]
pub struct LecturerChanges {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: Option<i32>,
    pub academic_rank: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub updated_at: Option<NaiveDateTime>,
}
