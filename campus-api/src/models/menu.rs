use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::menus)]
#[ts(export)]
pub struct Menu {
    pub id: i32,
    pub name: String,
    pub path: String,
    pub icon: Option<String>,
    pub display_order: i32,
    pub parent_id: Option<i32>,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::menus)]
pub struct NewMenu {
    pub name: String,
    pub path: String,
    pub icon: Option<String>,
    pub display_order: i32,
    pub parent_id: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MenuInput {
    pub name: String,
    pub path: String,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub parent_id: Option<i32>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::menus)]
#[diesel(treat_none_as_null = true)]
pub struct MenuChanges {
    pub name: String,
    pub path: String,
    pub icon: Option<String>,
    pub display_order: i32,
    pub parent_id: Option<i32>,
}

/// A root menu with one level of children, ordered for display.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct MenuNode {
    #[serde(flatten)]
    #[ts(flatten)]
    pub menu: Menu,
    pub children: Vec<Menu>,
}
