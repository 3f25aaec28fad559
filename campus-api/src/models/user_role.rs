use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Queryable, Insertable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = crate::schema::user_roles)]
#[ts(export)]
pub struct UserRole {
    pub user_id: i32,
    pub role_id: i32,
}
