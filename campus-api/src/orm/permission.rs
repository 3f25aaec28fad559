use diesel::prelude::*;

use crate::models::{NewPermission, Permission, PermissionChanges, PermissionInput};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(permissions);

pub fn list_permissions(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Permission>, diesel::result::Error> {
    use crate::schema::permissions::dsl::*;

    let mut count_query = permissions.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = permissions.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query =
            count_query.filter(name.like(pattern.clone()).or(module.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(module.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order((module.asc(), name.asc()))
        .offset(params.offset())
        .limit(params.limit)
        .load::<Permission>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn list_deleted_permissions(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Permission>, diesel::result::Error> {
    use crate::schema::permissions::dsl::*;

    let mut count_query = permissions.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = permissions.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query =
            count_query.filter(name.like(pattern.clone()).or(module.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(module.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Permission>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_permission_by_id(
    conn: &mut SqliteConnection,
    permission_id: i32,
) -> Result<Option<Permission>, diesel::result::Error> {
    use crate::schema::permissions::dsl::*;
    permissions
        .filter(id.eq(permission_id))
        .filter(deleted_at.is_null())
        .first::<Permission>(conn)
        .optional()
}

/// True while any role still links the permission; permanent deletion is
/// rejected in that case.
pub fn permission_is_referenced(
    conn: &mut SqliteConnection,
    for_permission: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::role_permissions::dsl::*;
    role_permissions
        .filter(permission_id.eq(for_permission))
        .select(role_id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

pub fn insert_permission(
    conn: &mut SqliteConnection,
    input: &PermissionInput,
) -> Result<Permission, diesel::result::Error> {
    use crate::schema::permissions::dsl::*;

    diesel::insert_into(permissions)
        .values(&NewPermission {
            name: input.name.clone(),
            module: input.module.clone(),
            description: input.description.clone(),
        })
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    permissions.filter(id.eq(last_id)).first::<Permission>(conn)
}

pub fn update_permission(
    conn: &mut SqliteConnection,
    permission_id: i32,
    input: &PermissionInput,
) -> Result<Permission, diesel::result::Error> {
    use crate::schema::permissions::dsl::*;

    diesel::update(permissions.filter(id.eq(permission_id)))
        .set(&PermissionChanges {
            name: input.name.clone(),
            module: input.module.clone(),
            description: input.description.clone(),
        })
        .execute(conn)?;

    permissions
        .filter(id.eq(permission_id))
        .first::<Permission>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleInput;
    use crate::orm::testing::setup_test_db;

    fn permission_input(name: &str, module: &str) -> PermissionInput {
        PermissionInput {
            name: name.to_string(),
            module: module.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_listing_orders_by_module_then_name() {
        let mut conn = setup_test_db();
        insert_permission(&mut conn, &permission_input("users:delete", "UserManagement")).unwrap();
        insert_permission(&mut conn, &permission_input("menus:create", "Navigation")).unwrap();
        insert_permission(&mut conn, &permission_input("users:create", "UserManagement")).unwrap();

        let page = list_permissions(&mut conn, &ListParams::new(None, None, None)).unwrap();
        let names: Vec<&str> = page.data.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["menus:create", "users:create", "users:delete"]);
    }

    #[test]
    fn test_reference_check_follows_role_links() {
        let mut conn = setup_test_db();
        let perm =
            insert_permission(&mut conn, &permission_input("users:create", "UserManagement"))
                .unwrap();
        assert!(!permission_is_referenced(&mut conn, perm.id).unwrap());

        crate::orm::role::insert_role(
            &mut conn,
            &RoleInput {
                name: "Admin".to_string(),
                description: None,
                permission_ids: Some(vec![perm.id]),
                menu_ids: None,
            },
        )
        .unwrap();
        assert!(permission_is_referenced(&mut conn, perm.id).unwrap());
    }
}
