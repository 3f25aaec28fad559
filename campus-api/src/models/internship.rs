use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{AcademicYear, Partner, Semester, Student};

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::internships)]
#[ts(export)]
pub struct Internship {
    pub id: i32,
    pub student_id: i32,
    pub partner_id: i32,
    pub academic_year_id: i32,
    pub semester_id: i32,
    pub report_url: Option<String>,
    pub grade: Option<f64>,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::internships)]
pub struct NewInternship {
    pub student_id: i32,
    pub partner_id: i32,
    pub academic_year_id: i32,
    pub semester_id: i32,
    pub report_url: Option<String>,
    pub grade: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct InternshipInput {
    pub student_id: i32,
    pub partner_id: i32,
    pub academic_year_id: i32,
    pub semester_id: i32,
    pub report_url: Option<String>,
    pub grade: Option<f64>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::internships)]
#[diesel(treat_none_as_null = true)]
pub struct InternshipChanges {
    pub student_id: i32,
    pub partner_id: i32,
    pub academic_year_id: i32,
    pub semester_id: i32,
    pub report_url: Option<String>,
    pub grade: Option<f64>,
}

/// Response shape with the related rows eagerly attached, mirroring what the
/// get-by-id and create endpoints return.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct InternshipDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub internship: Internship,
    pub student: Student,
    pub partner: Partner,
    pub academic_year: AcademicYear,
    pub semester: Semester,
}
