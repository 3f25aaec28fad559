use diesel::prelude::*;

use crate::models::{Menu, MenuChanges, MenuInput, MenuNode, NewMenu};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(menus);

/// Lists live root menus in display order, each with one level of live
/// children attached.
pub fn list_menu_tree(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<MenuNode>, diesel::result::Error> {
    use crate::schema::menus::dsl::*;

    let mut count_query = menus
        .filter(deleted_at.is_null())
        .filter(parent_id.is_null())
        .into_boxed();
    let mut page_query = menus
        .filter(deleted_at.is_null())
        .filter(parent_id.is_null())
        .into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(path.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(path.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let roots = page_query
        .order((display_order.asc(), name.asc()))
        .offset(params.offset())
        .limit(params.limit)
        .load::<Menu>(conn)?;

    let mut nodes = Vec::with_capacity(roots.len());
    for root in roots {
        let children = get_live_children(conn, root.id)?;
        nodes.push(MenuNode {
            menu: root,
            children,
        });
    }
    Ok(Page::new(nodes, total, params))
}

pub fn list_deleted_menus(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Menu>, diesel::result::Error> {
    use crate::schema::menus::dsl::*;

    let mut count_query = menus.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = menus.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(path.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(path.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Menu>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_menu_by_id(
    conn: &mut SqliteConnection,
    menu_id: i32,
) -> Result<Option<Menu>, diesel::result::Error> {
    use crate::schema::menus::dsl::*;
    menus
        .filter(id.eq(menu_id))
        .filter(deleted_at.is_null())
        .first::<Menu>(conn)
        .optional()
}

fn get_live_children(
    conn: &mut SqliteConnection,
    menu_id: i32,
) -> Result<Vec<Menu>, diesel::result::Error> {
    use crate::schema::menus::dsl::*;
    menus
        .filter(parent_id.eq(menu_id))
        .filter(deleted_at.is_null())
        .order((display_order.asc(), name.asc()))
        .load::<Menu>(conn)
}

/// True when the menu still has non-deleted children. Deletion is rejected
/// while this holds.
pub fn has_live_children(
    conn: &mut SqliteConnection,
    menu_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::menus::dsl::*;
    menus
        .filter(parent_id.eq(menu_id))
        .filter(deleted_at.is_null())
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

/// True when any child row exists at all, soft-deleted or not.
pub fn has_any_children(
    conn: &mut SqliteConnection,
    menu_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::menus::dsl::*;
    menus
        .filter(parent_id.eq(menu_id))
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

pub fn insert_menu(
    conn: &mut SqliteConnection,
    input: &MenuInput,
) -> Result<Menu, diesel::result::Error> {
    use crate::schema::menus::dsl::*;

    diesel::insert_into(menus)
        .values(&NewMenu {
            name: input.name.clone(),
            path: input.path.clone(),
            icon: input.icon.clone(),
            display_order: input.display_order.unwrap_or(0),
            parent_id: input.parent_id,
        })
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    menus.filter(id.eq(last_id)).first::<Menu>(conn)
}

pub fn update_menu(
    conn: &mut SqliteConnection,
    menu_id: i32,
    input: &MenuInput,
) -> Result<Menu, diesel::result::Error> {
    use crate::schema::menus::dsl::*;

    diesel::update(menus.filter(id.eq(menu_id)))
        .set(&MenuChanges {
            name: input.name.clone(),
            path: input.path.clone(),
            icon: input.icon.clone(),
            display_order: input.display_order.unwrap_or(0),
            parent_id: input.parent_id,
        })
        .execute(conn)?;

    menus.filter(id.eq(menu_id)).first::<Menu>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;

    fn menu_input(name: &str, path: &str, order: i32, parent: Option<i32>) -> MenuInput {
        MenuInput {
            name: name.to_string(),
            path: path.to_string(),
            icon: None,
            display_order: Some(order),
            parent_id: parent,
        }
    }

    #[test]
    fn test_tree_ordered_by_display_order() {
        let mut conn = setup_test_db();
        insert_menu(&mut conn, &menu_input("Reports", "/reports", 2, None)).unwrap();
        let dashboard = insert_menu(&mut conn, &menu_input("Dashboard", "/", 1, None)).unwrap();
        insert_menu(
            &mut conn,
            &menu_input("Overview", "/overview", 1, Some(dashboard.id)),
        )
        .unwrap();

        let page = list_menu_tree(&mut conn, &ListParams::new(None, None, None)).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.data[0].menu.name, "Dashboard");
        assert_eq!(page.data[0].children.len(), 1);
        assert_eq!(page.data[1].menu.name, "Reports");
    }

    #[test]
    fn test_children_block_deletion() {
        let mut conn = setup_test_db();
        let dashboard = insert_menu(&mut conn, &menu_input("Dashboard", "/", 1, None)).unwrap();
        let child = insert_menu(
            &mut conn,
            &menu_input("Overview", "/overview", 1, Some(dashboard.id)),
        )
        .unwrap();

        assert!(has_live_children(&mut conn, dashboard.id).unwrap());
        soft_delete(&mut conn, child.id).unwrap();
        assert!(!has_live_children(&mut conn, dashboard.id).unwrap());
        assert!(has_any_children(&mut conn, dashboard.id).unwrap());
    }
}
