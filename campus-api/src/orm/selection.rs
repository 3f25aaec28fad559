//! Read-only `{id, name}` projections backing dropdowns and pickers.
//!
//! Every query excludes soft-deleted rows and caps the result at
//! [`SELECTION_CAP`] rows; responses are flat arrays without the paging
//! envelope.

use diesel::prelude::*;
use serde::Serialize;
use ts_rs::TS;

use crate::orm::pagination::like_term;

pub const SELECTION_CAP: i64 = 100;

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SelectionItem {
    pub id: i32,
    pub name: String,
}

/// One permission inside a module group. The description field carries the
/// `module.name` display string.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PermissionOption {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PermissionGroup {
    pub module: String,
    pub permissions: Vec<PermissionOption>,
}

pub fn academic_year_options(
    conn: &mut SqliteConnection,
    search: &str,
) -> Result<Vec<SelectionItem>, diesel::result::Error> {
    use crate::schema::academic_years::dsl::*;

    let mut query = academic_years.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = like_term(search) {
        query = query.filter(name.like(pattern));
    }
    let rows = query
        .select((id, name))
        .order(name.asc())
        .limit(SELECTION_CAP)
        .load::<(i32, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(item_id, item_name)| SelectionItem {
            id: item_id,
            name: item_name,
        })
        .collect())
}

pub fn semester_options(
    conn: &mut SqliteConnection,
    search: &str,
) -> Result<Vec<SelectionItem>, diesel::result::Error> {
    use crate::schema::semesters::dsl::*;

    let mut query = semesters.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = like_term(search) {
        query = query.filter(name.like(pattern));
    }
    let rows = query
        .select((id, name))
        .order(name.asc())
        .limit(SELECTION_CAP)
        .load::<(i32, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(item_id, item_name)| SelectionItem {
            id: item_id,
            name: item_name,
        })
        .collect())
}

pub fn student_options(
    conn: &mut SqliteConnection,
    search: &str,
) -> Result<Vec<SelectionItem>, diesel::result::Error> {
    use crate::schema::students::dsl::*;

    let mut query = students.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = like_term(search) {
        query = query.filter(full_name.like(pattern.clone()).or(student_code.like(pattern)));
    }
    let rows = query
        .select((id, full_name))
        .order(full_name.asc())
        .limit(SELECTION_CAP)
        .load::<(i32, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(item_id, item_name)| SelectionItem {
            id: item_id,
            name: item_name,
        })
        .collect())
}

pub fn lecturer_options(
    conn: &mut SqliteConnection,
    search: &str,
) -> Result<Vec<SelectionItem>, diesel::result::Error> {
    use crate::schema::lecturers::dsl::*;

    let mut query = lecturers.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = like_term(search) {
        query = query.filter(name.like(pattern.clone()).or(email.like(pattern)));
    }
    let rows = query
        .select((id, name))
        .order(name.asc())
        .limit(SELECTION_CAP)
        .load::<(i32, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(item_id, item_name)| SelectionItem {
            id: item_id,
            name: item_name,
        })
        .collect())
}

/// Departments are labelled `"Name (Code)"`.
pub fn department_options(
    conn: &mut SqliteConnection,
    search: &str,
) -> Result<Vec<SelectionItem>, diesel::result::Error> {
    use crate::schema::departments::dsl::*;

    let mut query = departments.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = like_term(search) {
        query = query.filter(name.like(pattern.clone()).or(code.like(pattern)));
    }
    let rows = query
        .select((id, name, code))
        .order(name.asc())
        .limit(SELECTION_CAP)
        .load::<(i32, String, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(item_id, item_name, item_code)| SelectionItem {
            id: item_id,
            name: format!("{} ({})", item_name, item_code),
        })
        .collect())
}

pub fn partner_options(
    conn: &mut SqliteConnection,
    search: &str,
) -> Result<Vec<SelectionItem>, diesel::result::Error> {
    use crate::schema::partners::dsl::*;

    let mut query = partners.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = like_term(search) {
        query = query.filter(name.like(pattern));
    }
    let rows = query
        .select((id, name))
        .order(name.asc())
        .limit(SELECTION_CAP)
        .load::<(i32, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(item_id, item_name)| SelectionItem {
            id: item_id,
            name: item_name,
        })
        .collect())
}

pub fn menu_options(
    conn: &mut SqliteConnection,
    search: &str,
) -> Result<Vec<SelectionItem>, diesel::result::Error> {
    use crate::schema::menus::dsl::*;

    let mut query = menus.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = like_term(search) {
        query = query.filter(name.like(pattern));
    }
    let rows = query
        .select((id, name))
        .order(name.asc())
        .limit(SELECTION_CAP)
        .load::<(i32, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(item_id, item_name)| SelectionItem {
            id: item_id,
            name: item_name,
        })
        .collect())
}

pub fn role_options(
    conn: &mut SqliteConnection,
    search: &str,
) -> Result<Vec<SelectionItem>, diesel::result::Error> {
    use crate::schema::roles::dsl::*;

    let mut query = roles.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = like_term(search) {
        query = query.filter(name.like(pattern));
    }
    let rows = query
        .select((id, name))
        .order(name.asc())
        .limit(SELECTION_CAP)
        .load::<(i32, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(item_id, item_name)| SelectionItem {
            id: item_id,
            name: item_name,
        })
        .collect())
}

/// Permissions are grouped by module, groups ordered by module name. The cap
/// applies to the underlying permission rows, not the groups.
pub fn permission_options(
    conn: &mut SqliteConnection,
    search: &str,
) -> Result<Vec<PermissionGroup>, diesel::result::Error> {
    use crate::schema::permissions::dsl::*;

    let mut query = permissions.filter(deleted_at.is_null()).into_boxed();
    if let Some(pattern) = like_term(search) {
        query = query.filter(name.like(pattern.clone()).or(module.like(pattern)));
    }
    let rows = query
        .select((id, name, module))
        .order((module.asc(), name.asc()))
        .limit(SELECTION_CAP)
        .load::<(i32, String, String)>(conn)?;

    let mut groups: Vec<PermissionGroup> = Vec::new();
    for (item_id, item_name, item_module) in rows {
        let option = PermissionOption {
            id: item_id,
            name: item_name.clone(),
            description: format!("{}.{}", item_module, item_name),
        };
        match groups.last_mut() {
            Some(group) if group.module == item_module => group.permissions.push(option),
            _ => groups.push(PermissionGroup {
                module: item_module,
                permissions: vec![option],
            }),
        }
    }
    Ok(groups)
}
