use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A named capability within a module, e.g. name "users:create" in module
/// "UserManagement".
#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::permissions)]
#[ts(export)]
pub struct Permission {
    pub id: i32,
    pub name: String,
    pub module: String,
    pub description: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::permissions)]
pub struct NewPermission {
    pub name: String,
    pub module: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PermissionInput {
    pub name: String,
    pub module: String,
    pub description: Option<String>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::permissions)]
#[diesel(treat_none_as_null = true)]
pub struct PermissionChanges {
    pub name: String,
    pub module: String,
    pub description: Option<String>,
}
