use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::Role;

/// A local user row. Users are normally provisioned just-in-time the first
/// time the identity provider presents an unseen `subject_id`; the manual
/// create endpoint exists for pre-registering accounts.
#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::users)]
#[ts(export)]
pub struct User {
    pub id: i32,
    pub subject_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub subject_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UserInput {
    pub subject_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_active: Option<bool>,
    /// Initial role assignments, linked in the same transaction as the user
    /// row. On update, when present, replaces the existing assignments.
    pub role_ids: Option<Vec<i32>>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(treat_none_as_null = true)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

/// Response shape with the user's roles attached.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct UserWithRoles {
    #[serde(flatten)]
    #[ts(flatten)]
    pub user: User,
    pub roles: Vec<Role>,
}
