use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::students)]
#[ts(export)]
pub struct Student {
    pub id: i32,
    pub student_code: String,
    pub full_name: String,
    pub date_of_birth: NaiveDateTime,
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: Option<i32>,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::students)]
pub struct NewStudent {
    pub student_code: String,
    pub full_name: String,
    pub date_of_birth: NaiveDateTime,
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct StudentInput {
    pub student_code: String,
    pub full_name: String,
    pub date_of_birth: NaiveDateTime,
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: Option<i32>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::students)]
#[diesel(treat_none_as_null = true)]
pub struct StudentChanges {
    pub student_code: String,
    pub full_name: String,
    pub date_of_birth: NaiveDateTime,
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: Option<i32>,
}
