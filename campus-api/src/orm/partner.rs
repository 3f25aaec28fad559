use diesel::prelude::*;

use crate::models::{NewPartner, Partner, PartnerChanges, PartnerInput};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(partners);

pub fn list_partners(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Partner>, diesel::result::Error> {
    use crate::schema::partners::dsl::*;

    let mut count_query = partners.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = partners.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(email.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(email.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(name.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Partner>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn list_deleted_partners(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Partner>, diesel::result::Error> {
    use crate::schema::partners::dsl::*;

    let mut count_query = partners.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = partners.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(email.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(email.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Partner>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_partner_by_id(
    conn: &mut SqliteConnection,
    partner_id: i32,
) -> Result<Option<Partner>, diesel::result::Error> {
    use crate::schema::partners::dsl::*;
    partners
        .filter(id.eq(partner_id))
        .filter(deleted_at.is_null())
        .first::<Partner>(conn)
        .optional()
}

pub fn insert_partner(
    conn: &mut SqliteConnection,
    input: &PartnerInput,
) -> Result<Partner, diesel::result::Error> {
    use crate::schema::partners::dsl::*;

    let new_partner = NewPartner {
        name: input.name.clone(),
        description: input.description.clone(),
        address: input.address.clone(),
        website: input.website.clone(),
        phone_number: input.phone_number.clone(),
        contact_person: input.contact_person.clone(),
        email: input.email.clone(),
        is_active: input.is_active.unwrap_or(true),
    };

    diesel::insert_into(partners)
        .values(&new_partner)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    partners.filter(id.eq(last_id)).first::<Partner>(conn)
}

pub fn update_partner(
    conn: &mut SqliteConnection,
    partner_id: i32,
    input: &PartnerInput,
) -> Result<Partner, diesel::result::Error> {
    use crate::schema::partners::dsl::*;

    diesel::update(partners.filter(id.eq(partner_id)))
        .set(&PartnerChanges {
            name: input.name.clone(),
            description: input.description.clone(),
            address: input.address.clone(),
            website: input.website.clone(),
            phone_number: input.phone_number.clone(),
            contact_person: input.contact_person.clone(),
            email: input.email.clone(),
            is_active: input.is_active.unwrap_or(true),
        })
        .execute(conn)?;

    partners.filter(id.eq(partner_id)).first::<Partner>(conn)
}
