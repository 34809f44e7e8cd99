mod connection;
mod entities;
mod error;
pub mod extract;
pub mod params;
mod schema;
mod transaction;

use std::path::PathBuf;

use rusqlite::{Connection, Statement};

use crate::models::*;

pub use connection::{ConnectionProvider, SqliteConnector};
pub use error::DbError;
pub use extract::{extract, Column, Entity};
pub use params::{normalize_scale, parse_decimal, parse_integer, set_parameter, SemanticType};

/// Project repository.
///
/// Every public operation opens its own connection and runs as exactly one
/// transaction (see [`Database::transaction`]).
pub struct Database<P = SqliteConnector> {
    provider: P,
}

impl Database {
    /// Use the SQLite file at `path`, creating its directory if needed.
    pub fn open(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DbError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let connector = SqliteConnector::new(path);
        let conn = connector.connect()?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!(path = %connector.path().display(), "Opened database");

        Ok(Self::with_provider(connector))
    }
}

impl<P: ConnectionProvider> Database<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn migrate(&self) -> Result<(), DbError> {
        let conn = self.provider.connect()?;
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Project operations
    // ============================================================

    pub fn create_project(&self, input: &ProjectInput) -> Result<Project, DbError> {
        self.transaction("insert project", |tx| {
            let mut stmt = tx.prepare(
                "INSERT INTO project (project_name, estimated_hours, actual_hours, difficulty, notes)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            bind_project_fields(&mut stmt, input)?;
            stmt.raw_execute()?;

            let project_id = tx.last_insert_rowid();
            tracing::debug!(project_id, "Inserted project");

            Ok(Project {
                project_id,
                project_name: input.project_name.clone(),
                estimated_hours: input.estimated_hours.as_ref().map(normalize_scale),
                actual_hours: input.actual_hours.as_ref().map(normalize_scale),
                difficulty: input.difficulty,
                notes: input.notes.clone(),
            })
        })
    }

    /// Every project's scalar fields, ordered by name using the column's
    /// collation. Child collections are not loaded.
    pub fn get_all_projects(&self) -> Result<Vec<Project>, DbError> {
        self.transaction("fetch all projects", |tx| {
            let mut stmt = tx.prepare("SELECT * FROM project ORDER BY project_name")?;
            query_all(&mut stmt)
        })
    }

    /// The project with all of its materials, steps and categories, read in
    /// one transaction. `None` if no project has this ID.
    pub fn get_project(&self, project_id: i64) -> Result<Option<ProjectDetails>, DbError> {
        self.transaction("fetch project", |tx| {
            let mut stmt = tx.prepare("SELECT * FROM project WHERE project_id = ?")?;
            set_parameter(&mut stmt, 1, &project_id)?;

            let Some(project) = query_optional::<Project>(&mut stmt)? else {
                return Ok(None);
            };

            let materials = fetch_materials_for_project(tx, project_id)?;
            let steps = fetch_steps_for_project(tx, project_id)?;
            let categories = fetch_categories_for_project(tx, project_id)?;
            tracing::debug!(
                project_id,
                materials = materials.len(),
                steps = steps.len(),
                categories = categories.len(),
                "Fetched project"
            );

            Ok(Some(ProjectDetails {
                project,
                materials,
                steps,
                categories,
            }))
        })
    }

    /// Overwrite all five scalar fields of a project. Returns whether exactly
    /// one row was changed; an unknown ID yields `false`.
    pub fn update_project(&self, project_id: i64, input: &ProjectInput) -> Result<bool, DbError> {
        self.transaction("update project", |tx| {
            let mut stmt = tx.prepare(
                "UPDATE project SET
                    project_name = ?,
                    estimated_hours = ?,
                    actual_hours = ?,
                    difficulty = ?,
                    notes = ?
                 WHERE project_id = ?",
            )?;
            bind_project_fields(&mut stmt, input)?;
            set_parameter(&mut stmt, 6, &project_id)?;

            let rows = stmt.raw_execute()?;
            tracing::debug!(project_id, rows, "Updated project");
            Ok(rows == 1)
        })
    }

    pub fn delete_project(&self, project_id: i64) -> Result<bool, DbError> {
        self.transaction("delete project", |tx| {
            let mut stmt = tx.prepare("DELETE FROM project WHERE project_id = ?")?;
            set_parameter(&mut stmt, 1, &project_id)?;

            let rows = stmt.raw_execute()?;
            tracing::debug!(project_id, rows, "Deleted project");
            Ok(rows == 1)
        })
    }
}

// ============================================================
// Aggregate children
// ============================================================

fn fetch_materials_for_project(conn: &Connection, project_id: i64) -> Result<Vec<Material>, DbError> {
    let mut stmt = conn.prepare("SELECT * FROM material WHERE project_id = ? ORDER BY material_id")?;
    set_parameter(&mut stmt, 1, &project_id)?;
    query_all(&mut stmt)
}

fn fetch_steps_for_project(conn: &Connection, project_id: i64) -> Result<Vec<Step>, DbError> {
    let mut stmt = conn.prepare("SELECT * FROM step WHERE project_id = ? ORDER BY step_order")?;
    set_parameter(&mut stmt, 1, &project_id)?;
    query_all(&mut stmt)
}

fn fetch_categories_for_project(
    conn: &Connection,
    project_id: i64,
) -> Result<Vec<Category>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT c.* FROM category c
         JOIN project_category pc USING (category_id)
         WHERE pc.project_id = ?
         ORDER BY c.category_name",
    )?;
    set_parameter(&mut stmt, 1, &project_id)?;
    query_all(&mut stmt)
}

// ============================================================
// Statement helpers
// ============================================================

fn bind_project_fields(stmt: &mut Statement<'_>, input: &ProjectInput) -> Result<(), DbError> {
    set_parameter(stmt, 1, &input.project_name)?;
    set_parameter(stmt, 2, &input.estimated_hours)?;
    set_parameter(stmt, 3, &input.actual_hours)?;
    set_parameter(stmt, 4, &input.difficulty)?;
    set_parameter(stmt, 5, &input.notes)?;
    Ok(())
}

fn query_optional<T: Entity>(stmt: &mut Statement<'_>) -> Result<Option<T>, DbError> {
    let mut rows = stmt.raw_query();
    let record = match rows.next()? {
        Some(row) => Some(extract(row)?),
        None => None,
    };
    Ok(record)
}

fn query_all<T: Entity>(stmt: &mut Statement<'_>) -> Result<Vec<T>, DbError> {
    let mut rows = stmt.raw_query();
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(extract(row)?);
    }
    Ok(records)
}
