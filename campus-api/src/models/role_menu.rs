use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Queryable, Insertable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = crate::schema::role_menus)]
#[ts(export)]
pub struct RoleMenu {
    pub role_id: i32,
    pub menu_id: i32,
}
