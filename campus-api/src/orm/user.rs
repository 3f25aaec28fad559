use chrono::Utc;
use diesel::prelude::*;

use crate::models::{NewUser, Role, User, UserChanges, UserInput, UserRole, UserWithRoles};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(users);

pub fn list_users(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<UserWithRoles>, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let mut count_query = users.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = users.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(email.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(email.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let rows = page_query
        .order(name.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<User>(conn)?;

    let mut data = Vec::with_capacity(rows.len());
    for user in rows {
        let roles = roles_for_user(conn, user.id)?;
        data.push(UserWithRoles { user, roles });
    }
    Ok(Page::new(data, total, params))
}

pub fn list_deleted_users(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let mut count_query = users.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = users.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(email.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(email.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<User>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users
        .filter(id.eq(user_id))
        .filter(deleted_at.is_null())
        .first::<User>(conn)
        .optional()
}

pub fn get_user_with_roles(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<UserWithRoles>, diesel::result::Error> {
    let user = match get_user_by_id(conn, user_id)? {
        Some(row) => row,
        None => return Ok(None),
    };
    let roles = roles_for_user(conn, user.id)?;
    Ok(Some(UserWithRoles { user, roles }))
}

/// Lookup by the identity provider's stable subject claim. Soft-deleted rows
/// are returned too so the auth layer can reject them explicitly.
pub fn get_user_by_subject_id(
    conn: &mut SqliteConnection,
    subject: &str,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users
        .filter(subject_id.eq(subject))
        .first::<User>(conn)
        .optional()
}

pub fn roles_for_user(
    conn: &mut SqliteConnection,
    for_user: i32,
) -> Result<Vec<Role>, diesel::result::Error> {
    use crate::schema::roles;
    use crate::schema::user_roles;

    user_roles::table
        .inner_join(roles::table)
        .filter(user_roles::user_id.eq(for_user))
        .filter(roles::deleted_at.is_null())
        .select((roles::id, roles::name, roles::description, roles::deleted_at))
        .order(roles::name.asc())
        .load::<Role>(conn)
}

/// The subject_id column carries a UNIQUE constraint over all rows, so this
/// check does not exclude soft-deleted users.
pub fn user_subject_exists(
    conn: &mut SqliteConnection,
    subject: &str,
    exclude_id: Option<i32>,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let mut query = users.filter(subject_id.eq(subject)).into_boxed();
    if let Some(excluded) = exclude_id {
        query = query.filter(id.ne(excluded));
    }
    query
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

pub fn user_email_exists(
    conn: &mut SqliteConnection,
    user_email: &str,
    exclude_id: Option<i32>,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let mut query = users.filter(email.eq(user_email)).into_boxed();
    if let Some(excluded) = exclude_id {
        query = query.filter(id.ne(excluded));
    }
    query
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

/// Inserts the user row and its initial role links in one transaction. The
/// caller has already validated that every role id refers to a live role.
pub fn insert_user(
    conn: &mut SqliteConnection,
    input: &UserInput,
) -> Result<UserWithRoles, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::users::dsl::*;

        let now = Utc::now().naive_utc();
        let new_user = NewUser {
            subject_id: input.subject_id.clone(),
            name: input.name.clone(),
            email: input.email.clone(),
            avatar_url: input.avatar_url.clone(),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(users).values(&new_user).execute(conn)?;
        let last_id = last_insert_rowid(conn)?;

        if let Some(role_ids) = &input.role_ids {
            link_roles(conn, last_id, role_ids)?;
        }

        let user = users.filter(id.eq(last_id)).first::<User>(conn)?;
        let roles = roles_for_user(conn, user.id)?;
        Ok(UserWithRoles { user, roles })
    })
}

/// Bare row insert used by just-in-time provisioning; no role links.
pub fn insert_provisioned_user(
    conn: &mut SqliteConnection,
    subject: &str,
    user_name: &str,
    user_email: &str,
) -> Result<(), diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let now = Utc::now().naive_utc();
    diesel::insert_into(users)
        .values(&NewUser {
            subject_id: subject.to_string(),
            name: user_name.to_string(),
            email: user_email.to_string(),
            avatar_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .execute(conn)?;
    Ok(())
}

/// Full-field replace; when `role_ids` is present the role links are synced
/// (delete then insert) in the same transaction. `subject_id` is immutable.
pub fn update_user(
    conn: &mut SqliteConnection,
    user_id: i32,
    input: &UserInput,
) -> Result<UserWithRoles, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set(&UserChanges {
                name: input.name.clone(),
                email: input.email.clone(),
                avatar_url: input.avatar_url.clone(),
                is_active: input.is_active.unwrap_or(true),
                updated_at: Utc::now().naive_utc(),
            })
            .execute(conn)?;

        if let Some(role_ids) = &input.role_ids {
            use crate::schema::user_roles;
            diesel::delete(user_roles::table.filter(user_roles::user_id.eq(user_id)))
                .execute(conn)?;
            link_roles(conn, user_id, role_ids)?;
        }

        let user = users.filter(id.eq(user_id)).first::<User>(conn)?;
        let roles = roles_for_user(conn, user.id)?;
        Ok(UserWithRoles { user, roles })
    })
}

fn link_roles(
    conn: &mut SqliteConnection,
    for_user: i32,
    role_ids: &[i32],
) -> Result<(), diesel::result::Error> {
    use crate::schema::user_roles;

    let links: Vec<UserRole> = role_ids
        .iter()
        .map(|&role_id| UserRole {
            user_id: for_user,
            role_id,
        })
        .collect();
    diesel::insert_into(user_roles::table)
        .values(&links)
        .execute(conn)?;
    Ok(())
}
