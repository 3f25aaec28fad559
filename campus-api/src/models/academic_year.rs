use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::academic_years)]
#[ts(export)]
pub struct AcademicYear {
    pub id: i32,
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::academic_years)]
pub struct NewAcademicYear {
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct AcademicYearInput {
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

/// Full-replace changeset; `updated_at` is bumped by the ORM layer.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::academic_years)]
pub struct AcademicYearChanges {
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
