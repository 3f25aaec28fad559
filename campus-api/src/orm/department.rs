use diesel::prelude::*;

use crate::models::{
    Department, DepartmentChanges, DepartmentDetail, DepartmentInput, DepartmentNode,
    NewDepartment,
};
use crate::orm::last_insert_rowid;
use crate::orm::pagination::{ListParams, Page};

crate::orm::soft_delete::soft_delete_ops!(departments);

/// Lists live root departments (no parent), each with one level of live
/// children attached. The hierarchy is not descended recursively.
pub fn list_department_tree(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<DepartmentNode>, diesel::result::Error> {
    use crate::schema::departments::dsl::*;

    let mut count_query = departments
        .filter(deleted_at.is_null())
        .filter(parent_department_id.is_null())
        .into_boxed();
    let mut page_query = departments
        .filter(deleted_at.is_null())
        .filter(parent_department_id.is_null())
        .into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(code.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(code.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let roots = page_query
        .order(name.asc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Department>(conn)?;

    let mut nodes = Vec::with_capacity(roots.len());
    for root in roots {
        let children = get_live_children(conn, root.id)?;
        nodes.push(DepartmentNode {
            department: root,
            children,
        });
    }
    Ok(Page::new(nodes, total, params))
}

pub fn list_deleted_departments(
    conn: &mut SqliteConnection,
    params: &ListParams,
) -> Result<Page<Department>, diesel::result::Error> {
    use crate::schema::departments::dsl::*;

    let mut count_query = departments.filter(deleted_at.is_not_null()).into_boxed();
    let mut page_query = departments.filter(deleted_at.is_not_null()).into_boxed();
    if let Some(pattern) = params.like_pattern() {
        count_query = count_query.filter(name.like(pattern.clone()).or(code.like(pattern.clone())));
        page_query = page_query.filter(name.like(pattern.clone()).or(code.like(pattern)));
    }

    let total = count_query.count().get_result::<i64>(conn)?;
    let data = page_query
        .order(deleted_at.desc())
        .offset(params.offset())
        .limit(params.limit)
        .load::<Department>(conn)?;
    Ok(Page::new(data, total, params))
}

pub fn get_department_by_id(
    conn: &mut SqliteConnection,
    department_id: i32,
) -> Result<Option<Department>, diesel::result::Error> {
    use crate::schema::departments::dsl::*;
    departments
        .filter(id.eq(department_id))
        .filter(deleted_at.is_null())
        .first::<Department>(conn)
        .optional()
}

/// Get-by-id shape with the parent and one level of children attached.
pub fn get_department_detail(
    conn: &mut SqliteConnection,
    department_id: i32,
) -> Result<Option<DepartmentDetail>, diesel::result::Error> {
    let department = match get_department_by_id(conn, department_id)? {
        Some(dept) => dept,
        None => return Ok(None),
    };

    let parent = match department.parent_department_id {
        Some(parent_id) => get_department_by_id(conn, parent_id)?,
        None => None,
    };
    let children = get_live_children(conn, department.id)?;

    Ok(Some(DepartmentDetail {
        department,
        parent,
        children,
    }))
}

fn get_live_children(
    conn: &mut SqliteConnection,
    department_id: i32,
) -> Result<Vec<Department>, diesel::result::Error> {
    use crate::schema::departments::dsl::*;
    departments
        .filter(parent_department_id.eq(department_id))
        .filter(deleted_at.is_null())
        .order(name.asc())
        .load::<Department>(conn)
}

/// True when the department still has non-deleted children. Deletion is
/// rejected while this holds.
pub fn has_live_children(
    conn: &mut SqliteConnection,
    department_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::departments::dsl::*;
    departments
        .filter(parent_department_id.eq(department_id))
        .filter(deleted_at.is_null())
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

/// True when any child row exists at all, soft-deleted or not. Permanent
/// deletion is rejected while this holds (the FK would dangle).
pub fn has_any_children(
    conn: &mut SqliteConnection,
    department_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::departments::dsl::*;
    departments
        .filter(parent_department_id.eq(department_id))
        .select(id)
        .first::<i32>(conn)
        .optional()
        .map(|found| found.is_some())
}

pub fn insert_department(
    conn: &mut SqliteConnection,
    input: &DepartmentInput,
) -> Result<Department, diesel::result::Error> {
    use crate::schema::departments::dsl::*;

    let new_department = NewDepartment {
        name: input.name.clone(),
        code: input.code.clone(),
        parent_department_id: input.parent_department_id,
    };

    diesel::insert_into(departments)
        .values(&new_department)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    departments.filter(id.eq(last_id)).first::<Department>(conn)
}

pub fn update_department(
    conn: &mut SqliteConnection,
    department_id: i32,
    input: &DepartmentInput,
) -> Result<Department, diesel::result::Error> {
    use crate::schema::departments::dsl::*;

    diesel::update(departments.filter(id.eq(department_id)))
        .set(&DepartmentChanges {
            name: input.name.clone(),
            code: input.code.clone(),
            parent_department_id: input.parent_department_id,
        })
        .execute(conn)?;

    departments.filter(id.eq(department_id)).first::<Department>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;

    fn dept(name: &str, code: &str, parent: Option<i32>) -> DepartmentInput {
        DepartmentInput {
            name: name.to_string(),
            code: code.to_string(),
            parent_department_id: parent,
        }
    }

    #[test]
    fn test_tree_listing_attaches_children() {
        let mut conn = setup_test_db();
        let cs = insert_department(&mut conn, &dept("Computer Science", "CS", None)).unwrap();
        insert_department(&mut conn, &dept("Software Engineering", "SE", Some(cs.id))).unwrap();
        insert_department(&mut conn, &dept("Mathematics", "MATH", None)).unwrap();

        let page = list_department_tree(&mut conn, &ListParams::new(None, None, None)).unwrap();
        // Only roots are listed.
        assert_eq!(page.total, 2);
        let cs_node = page
            .data
            .iter()
            .find(|node| node.department.id == cs.id)
            .expect("CS root present");
        assert_eq!(cs_node.children.len(), 1);
        assert_eq!(cs_node.children[0].code, "SE");
    }

    #[test]
    fn test_children_block_deletion() {
        let mut conn = setup_test_db();
        let cs = insert_department(&mut conn, &dept("Computer Science", "CS", None)).unwrap();
        let se = insert_department(&mut conn, &dept("Software Engineering", "SE", Some(cs.id))).unwrap();

        assert!(has_live_children(&mut conn, cs.id).unwrap());
        assert!(!has_live_children(&mut conn, se.id).unwrap());

        // Soft-deleting the child clears the live-children guard but the
        // physical row still blocks permanent deletion of the parent.
        soft_delete(&mut conn, se.id).unwrap();
        assert!(!has_live_children(&mut conn, cs.id).unwrap());
        assert!(has_any_children(&mut conn, cs.id).unwrap());
    }

    #[test]
    fn test_detail_includes_parent() {
        let mut conn = setup_test_db();
        let cs = insert_department(&mut conn, &dept("Computer Science", "CS", None)).unwrap();
        let se = insert_department(&mut conn, &dept("Software Engineering", "SE", Some(cs.id))).unwrap();

        let detail = get_department_detail(&mut conn, se.id)
            .unwrap()
            .expect("detail should exist");
        assert_eq!(detail.parent.as_ref().map(|p| p.id), Some(cs.id));
        assert!(detail.children.is_empty());
    }
}
