use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::partners)]
#[ts(export)]
pub struct Partner {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub website: Option<String>,
    pub phone_number: String,
    pub contact_person: Option<String>,
    pub email: String,
    pub is_active: bool,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::partners)]
pub struct NewPartner {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub website: Option<String>,
    pub phone_number: String,
    pub contact_person: Option<String>,
    pub email: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PartnerInput {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub website: Option<String>,
    pub phone_number: String,
    pub contact_person: Option<String>,
    pub email: String,
    pub is_active: Option<bool>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::partners)]
#[diesel(treat_none_as_null = true)]
pub struct PartnerChanges {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub website: Option<String>,
    pub phone_number: String,
    pub contact_person: Option<String>,
    pub email: String,
    pub is_active: bool,
}
