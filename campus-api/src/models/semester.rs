use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::semesters)]
#[ts(export)]
pub struct Semester {
    pub id: i32,
    pub name: String,
    pub academic_year_id: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::semesters)]
pub struct NewSemester {
    pub name: String,
    pub academic_year_id: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SemesterInput {
    pub name: String,
    pub academic_year_id: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::semesters)]
pub struct SemesterChanges {
    pub name: String,
    pub academic_year_id: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}
