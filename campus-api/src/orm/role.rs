use diesel::prelude::*;

use crate::models::{Menu, NewRole, Permission, Role, RoleChanges, RoleDetail, RoleInput, RoleMenu,
    RolePermission};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(roles);

pub fn list_roles(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<RoleDetail>, diesel::result::Error> {
    use crate::schema::roles::dsl::*;

    let mut count_query = roles.filter(deleted_at.is_null()).into_boxed();
    let mut page_query = roles.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()));
        page_query = page_query.filter(name.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let rows = page_query
        .order(name.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Role>(conn)?;

    let mut data = Vec::with_capacity(rows.len());
    for role in rows {
        data.push(load_detail(conn, role)?);
    }
    Ok(Page::new(data, total, params))
}

pub fn list_deleted_roles(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Role>, diesel::result::Error> {
    use crate::schema::roles::dsl::*;

    let mut count_query = roles.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = roles.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()));
        page_query = page_query.filter(name.like(pattern));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Role>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_role_by_id(
    conn: &mut SqliteConnection,
    role_id: i32,
) -> Result<Option<Role>, diesel::result::Error> {
    use crate::schema::roles::dsl::*;
    roles
        .filter(id.eq(role_id))
        .filter(deleted_at.is_null())
        .first::<Role>(conn)
        .optional()
}

pub fn get_role_detail(
    conn: &mut SqliteConnection,
    role_id: i32,
) -> Result<Option<RoleDetail>, diesel::result::Error> {
    let role = match get_role_by_id(conn, role_id)? {
        Some(row) => row,
        None => return Ok(None),
    };
    load_detail(conn, role).map(Some)
}

fn load_detail(
    conn: &mut SqliteConnection,
    role: Role,
) -> Result<RoleDetail, diesel::result::Error> {
    let permissions = permissions_for_role(conn, role.id)?;
    let menus = menus_for_role(conn, role.id)?;
    Ok(RoleDetail {
        role,
        permissions,
        menus,
    })
}

pub fn permissions_for_role(
    conn: &mut SqliteConnection,
    for_role: i32,
) -> Result<Vec<Permission>, diesel::result::Error> {
    use crate::schema::permissions;
    use crate::schema::role_permissions;

    role_permissions::table
        .inner_join(permissions::table)
        .filter(role_permissions::role_id.eq(for_role))
        .filter(permissions::deleted_at.is_null())
        .select((
            permissions::id,
            permissions::name,
            permissions::module,
            permissions::description,
            permissions::deleted_at,
        ))
        .order((permissions::module.asc(), permissions::name.asc()))
        .load::<Permission>(conn)
}

pub fn menus_for_role(
    conn: &mut SqliteConnection,
    for_role: i32,
) -> Result<Vec<Menu>, diesel::result::Error> {
    use crate::schema::menus;
    use crate::schema::role_menus;

    role_menus::table
        .inner_join(menus::table)
        .filter(role_menus::role_id.eq(for_role))
        .filter(menus::deleted_at.is_null())
        .select((
            menus::id,
            menus::name,
            menus::path,
            menus::icon,
            menus::display_order,
            menus::parent_id,
            menus::deleted_at,
        ))
        .order((menus::display_order.asc(), menus::name.asc()))
        .load::<Menu>(conn)
}

/// Role names are unique among non-deleted roles; soft-deleting a role frees
/// its name.
pub fn role_name_exists(
    conn: &mut SqliteConnection,
    role_name: &str,
    exclude_id: Option<i32>,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::roles::dsl::*;

    let mut query = roles
        .filter(name.eq(role_name))
        .filter(deleted_at.is_null())
        .into_boxed();
    if let Some(excluded) = exclude_id {
        query = query.filter(id.ne(excluded));
    }
    query
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

/// True while any user still holds the role; permanent deletion is rejected
/// in that case.
pub fn role_is_assigned(
    conn: &mut SqliteConnection,
    for_role: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::user_roles::dsl::*;
    user_roles
        .filter(role_id.eq(for_role))
        .select(user_id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

/// Inserts the role and its permission/menu links in one transaction. The
/// caller has already validated the linked ids.
pub fn insert_role(
    conn: &mut SqliteConnection,
    input: &RoleInput,
) -> Result<RoleDetail, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::roles::dsl::*;

        diesel::insert_into(roles)
            .values(&NewRole {
                name: input.name.clone(),
                description: input.description.clone(),
            })
            .execute(conn)?;
        let last_id = last_insert_rowid(conn)?;

        if let Some(permission_ids) = &input.permission_ids {
            link_permissions(conn, last_id, permission_ids)?;
        }
        if let Some(menu_ids) = &input.menu_ids {
            link_menus(conn, last_id, menu_ids)?;
        }

        let role = roles.filter(id.eq(last_id)).first::<Role>(conn)?;
        load_detail(conn, role)
    })
}

/// Full-field replace; present `permission_ids` / `menu_ids` are synced by
/// delete-then-insert in the same transaction.
pub fn update_role(
    conn: &mut SqliteConnection,
    role_id: i32,
    input: &RoleInput,
) -> Result<RoleDetail, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::roles::dsl::*;

        diesel::update(roles.filter(id.eq(role_id)))
            .set(&RoleChanges {
                name: input.name.clone(),
                description: input.description.clone(),
            })
            .execute(conn)?;

        if let Some(permission_ids) = &input.permission_ids {
            use crate::schema::role_permissions;
            diesel::delete(
                role_permissions::table.filter(role_permissions::role_id.eq(role_id)),
            )
            .execute(conn)?;
            link_permissions(conn, role_id, permission_ids)?;
        }
        if let Some(menu_ids) = &input.menu_ids {
            use crate::schema::role_menus;
            diesel::delete(role_menus::table.filter(role_menus::role_id.eq(role_id)))
                .execute(conn)?;
            link_menus(conn, role_id, menu_ids)?;
        }

        let role = roles.filter(id.eq(role_id)).first::<Role>(conn)?;
        load_detail(conn, role)
    })
}

fn link_permissions(
    conn: &mut SqliteConnection,
    for_role: i32,
    permission_ids: &[i32],
) -> Result<(), diesel::result::Error> {
    use crate::schema::role_permissions;

    let links: Vec<RolePermission> = permission_ids
        .iter()
        .map(|&permission_id| RolePermission {
            role_id: for_role,
            permission_id,
        })
        .collect();
    diesel::insert_into(role_permissions::table)
        .values(&links)
        .execute(conn)?;
    Ok(())
}

fn link_menus(
    conn: &mut SqliteConnection,
    for_role: i32,
    menu_ids: &[i32],
) -> Result<(), diesel::result::Error> {
    use crate::schema::role_menus;

    let links: Vec<RoleMenu> = menu_ids
        .iter()
        .map(|&menu_id| RoleMenu {
            role_id: for_role,
            menu_id,
        })
        .collect();
    diesel::insert_into(role_menus::table)
        .values(&links)
        .execute(conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MenuInput, PermissionInput, UserInput};
    use crate::orm::testing::setup_test_db;

    fn role_input(name: &str) -> RoleInput {
        RoleInput {
            name: name.to_string(),
            description: None,
            permission_ids: None,
            menu_ids: None,
        }
    }

    #[test]
    fn test_create_with_links_and_detail() {
        let mut conn = setup_test_db();
        let perm = crate::orm::permission::insert_permission(
            &mut conn,
            &PermissionInput {
                name: "users:create".to_string(),
                module: "UserManagement".to_string(),
                description: None,
            },
        )
        .unwrap();
        let menu = crate::orm::menu::insert_menu(
            &mut conn,
            &MenuInput {
                name: "Users".to_string(),
                path: "/users".to_string(),
                icon: None,
                display_order: Some(1),
                parent_id: None,
            },
        )
        .unwrap();

        let mut input = role_input("Admin");
        input.permission_ids = Some(vec![perm.id]);
        input.menu_ids = Some(vec![menu.id]);
        let created = insert_role(&mut conn, &input).unwrap();
        assert_eq!(created.permissions.len(), 1);
        assert_eq!(created.menus.len(), 1);

        let detail = get_role_detail(&mut conn, created.role.id).unwrap().unwrap();
        assert_eq!(detail.permissions[0].name, "users:create");
        assert_eq!(detail.menus[0].path, "/users");
    }

    #[test]
    fn test_name_freed_by_soft_delete() {
        let mut conn = setup_test_db();
        let admin = insert_role(&mut conn, &role_input("Admin")).unwrap();

        assert!(role_name_exists(&mut conn, "Admin", None).unwrap());
        assert!(!role_name_exists(&mut conn, "Admin", Some(admin.role.id)).unwrap());

        soft_delete(&mut conn, admin.role.id).unwrap();
        assert!(!role_name_exists(&mut conn, "Admin", None).unwrap());
    }

    #[test]
    fn test_update_sync_replaces_links() {
        let mut conn = setup_test_db();
        let first = crate::orm::permission::insert_permission(
            &mut conn,
            &PermissionInput {
                name: "users:create".to_string(),
                module: "UserManagement".to_string(),
                description: None,
            },
        )
        .unwrap();
        let second = crate::orm::permission::insert_permission(
            &mut conn,
            &PermissionInput {
                name: "users:delete".to_string(),
                module: "UserManagement".to_string(),
                description: None,
            },
        )
        .unwrap();

        let mut input = role_input("Admin");
        input.permission_ids = Some(vec![first.id]);
        let created = insert_role(&mut conn, &input).unwrap();

        input.permission_ids = Some(vec![second.id]);
        let updated = update_role(&mut conn, created.role.id, &input).unwrap();
        assert_eq!(updated.permissions.len(), 1);
        assert_eq!(updated.permissions[0].name, "users:delete");

        // Absent permission_ids leaves the links untouched.
        input.permission_ids = None;
        let untouched = update_role(&mut conn, created.role.id, &input).unwrap();
        assert_eq!(untouched.permissions.len(), 1);
    }

    #[test]
    fn test_assignment_blocks_detection() {
        let mut conn = setup_test_db();
        let admin = insert_role(&mut conn, &role_input("Admin")).unwrap();
        assert!(!role_is_assigned(&mut conn, admin.role.id).unwrap());

        crate::orm::user::insert_user(
            &mut conn,
            &UserInput {
                subject_id: "sub-1".to_string(),
                name: "An Nguyen".to_string(),
                email: "an@example.edu".to_string(),
                avatar_url: None,
                is_active: None,
                role_ids: Some(vec![admin.role.id]),
            },
        )
        .unwrap();
        assert!(role_is_assigned(&mut conn, admin.role.id).unwrap());
    }
}
