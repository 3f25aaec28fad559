use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Queryable, Insertable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = crate::schema::role_permissions)]
#[ts(export)]
pub struct RolePermission {
    pub role_id: i32,
    pub permission_id: i32,
}
