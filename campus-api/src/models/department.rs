use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::departments)]
#[ts(export)]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub parent_department_id: Option<i32>,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::departments)]
pub struct NewDepartment {
    pub name: String,
    pub code: String,
    pub parent_department_id: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct DepartmentInput {
    pub name: String,
    pub code: String,
    pub parent_department_id: Option<i32>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::departments)]
#[diesel(treat_none_as_null = true)]
pub struct DepartmentChanges {
    pub name: String,
    pub code: String,
    pub parent_department_id: Option<i32>,
}

/// Listing shape for the hierarchy endpoints: a root department with one
/// level of children eagerly attached.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct DepartmentNode {
    #[serde(flatten)]
    #[ts(flatten)]
    pub department: Department,
    pub children: Vec<Department>,
}

/// Get-by-id shape: the department together with its parent and children.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct DepartmentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub department: Department,
    pub parent: Option<Department>,
    pub children: Vec<Department>,
}
