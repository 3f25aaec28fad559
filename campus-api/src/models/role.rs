use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{Menu, Permission};

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::roles)]
#[ts(export)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::roles)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct RoleInput {
    pub name: String,
    pub description: Option<String>,
    /// When present, replaces the role's permission links.
    pub permission_ids: Option<Vec<i32>>,
    /// When present, replaces the role's menu links.
    pub menu_ids: Option<Vec<i32>>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::roles)]
#[diesel(treat_none_as_null = true)]
pub struct RoleChanges {
    pub name: String,
    pub description: Option<String>,
}

/// Response shape with the role's permission and menu links attached.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct RoleDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub menus: Vec<Menu>,
}
