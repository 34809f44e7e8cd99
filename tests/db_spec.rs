use std::cell::Cell;
use std::path::Path;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use projects::db::{ConnectionProvider, Database, DbError, SqliteConnector};
use projects::models::*;
use rusqlite::Connection;
use speculate2::speculate;

fn decimal(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).expect("Invalid decimal literal")
}

fn input(name: &str) -> ProjectInput {
    ProjectInput {
        project_name: name.to_string(),
        ..Default::default()
    }
}

fn create_test_project(db: &Database) -> Project {
    db.create_project(&ProjectInput {
        project_name: "Hang a door".to_string(),
        estimated_hours: Some(decimal("4")),
        actual_hours: Some(decimal("3.5")),
        difficulty: Some(3),
        notes: Some("Use the door hangers from Home Depot".to_string()),
    })
    .expect("Failed to create project")
}

/// Write rows the repository itself never creates.
fn seed(path: &Path, sql: &str) {
    let conn = Connection::open(path).expect("Failed to open seed connection");
    conn.execute_batch(sql).expect("Failed to seed database");
}

fn count_rows(path: &Path, table: &str) -> i64 {
    let conn = Connection::open(path).expect("Failed to open count connection");
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .expect("Count failed")
}

struct CountingConnector {
    inner: SqliteConnector,
    opened: Cell<usize>,
}

impl ConnectionProvider for CountingConnector {
    fn connect(&self) -> Result<Connection, DbError> {
        self.opened.set(self.opened.get() + 1);
        self.inner.connect()
    }
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("projects.db");
        let db = Database::open(path.clone()).expect("Failed to open database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "create_project" {
        it "assigns an id and returns normalized decimals" {
            let project = create_test_project(&db);

            assert!(project.project_id > 0);
            assert_eq!(project.estimated_hours.unwrap().to_string(), "4.00");
            assert_eq!(project.actual_hours.unwrap().to_string(), "3.50");
        }

        it "assigns increasing ids" {
            let first = db.create_project(&input("First")).expect("Failed to create");
            let second = db.create_project(&input("Second")).expect("Failed to create");
            assert!(second.project_id > first.project_id);
        }

        it "round-trips every scalar field" {
            let created = db.create_project(&ProjectInput {
                project_name: "Build a bench".to_string(),
                estimated_hours: Some(decimal("12.5")),
                actual_hours: Some(decimal("0.75")),
                difficulty: Some(2),
                notes: Some("Cedar boards".to_string()),
            }).expect("Failed to create");

            let details = db.get_project(created.project_id)
                .expect("Query failed")
                .expect("Project missing");
            let project = details.project;

            assert_eq!(project.project_id, created.project_id);
            assert_eq!(project.project_name, "Build a bench");
            assert_eq!(project.estimated_hours.unwrap().to_string(), "12.50");
            assert_eq!(project.actual_hours.unwrap().to_string(), "0.75");
            assert_eq!(project.difficulty, Some(2));
            assert_eq!(project.notes.as_deref(), Some("Cedar boards"));
        }

        it "keeps absent values absent" {
            let created = db.create_project(&input("Bare")).expect("Failed to create");

            let project = db.get_project(created.project_id)
                .expect("Query failed")
                .expect("Project missing")
                .project;

            assert_eq!(project.notes, None);
            assert_eq!(project.estimated_hours, None);
            assert_eq!(project.actual_hours, None);
            assert_eq!(project.difficulty, None);
        }

        it "stores an empty string as an empty string" {
            let created = db.create_project(&ProjectInput {
                notes: Some(String::new()),
                ..input("Empty notes")
            }).expect("Failed to create");

            let project = db.get_project(created.project_id)
                .expect("Query failed")
                .expect("Project missing")
                .project;
            assert_eq!(project.notes, Some(String::new()));
        }

        it "round-trips the largest value the column holds" {
            let created = db.create_project(&ProjectInput {
                estimated_hours: Some(decimal("99999.99")),
                ..input("Barn")
            }).expect("Failed to create");

            let project = db.get_project(created.project_id)
                .expect("Query failed")
                .expect("Project missing")
                .project;
            assert_eq!(project.estimated_hours, created.estimated_hours);
            assert_eq!(project.estimated_hours.unwrap().to_string(), "99999.99");
        }

        it "refuses decimals wider than the column without storing anything" {
            let err = db.create_project(&ProjectInput {
                estimated_hours: Some(decimal("12345678901234567.89")),
                ..input("Cathedral")
            }).unwrap_err();

            assert!(matches!(err, DbError::Storage { operation: "insert project", .. }));
            assert!(matches!(err.root_cause(), DbError::Binding { field: "decimal number", .. }));
            assert!(err.is_validation());
            assert!(db.get_all_projects().expect("Query failed").is_empty());
        }
    }

    describe "get_all_projects" {
        it "returns an empty list when no projects exist" {
            let projects = db.get_all_projects().expect("Query failed");
            assert!(projects.is_empty());
        }

        it "orders by name ignoring case" {
            for name in ["Banana", "apple", "Cherry"] {
                db.create_project(&input(name)).expect("Failed to create");
            }

            let names: Vec<String> = db.get_all_projects()
                .expect("Query failed")
                .into_iter()
                .map(|p| p.project_name)
                .collect();
            assert_eq!(names, vec!["apple", "Banana", "Cherry"]);
        }
    }

    describe "get_project" {
        it "returns None for an unknown id" {
            let result = db.get_project(9999).expect("Query failed");
            assert!(result.is_none());
        }

        it "returns a project with no children as empty collections" {
            let project = create_test_project(&db);

            let details = db.get_project(project.project_id)
                .expect("Query failed")
                .expect("Project missing");
            assert!(details.materials.is_empty());
            assert!(details.steps.is_empty());
            assert!(details.categories.is_empty());
        }

        it "loads every material step and category of the project" {
            let project = create_test_project(&db);
            let other = db.create_project(&input("Other")).expect("Failed to create");
            let id = project.project_id;
            let other_id = other.project_id;

            seed(&path, &format!("
                INSERT INTO material (project_id, material_name, num_required, cost) VALUES
                    ({id}, '2-inch screws', 20, 1.09),
                    ({id}, 'Door hangers', 4, NULL),
                    ({other_id}, 'Glue', 1, 3);
                INSERT INTO step (project_id, step_text, step_order) VALUES
                    ({id}, 'Screw hangers on door', 2),
                    ({id}, 'Align hangers on frame', 1),
                    ({id}, 'Hang the door', 3),
                    ({other_id}, 'Unrelated', 1);
                INSERT INTO category (category_id, category_name) VALUES
                    (1, 'Doors and Windows'), (2, 'Repairs'), (3, 'Gardening');
                INSERT INTO project_category (project_id, category_id) VALUES
                    ({id}, 1), ({id}, 2), ({other_id}, 3);
            "));

            let details = db.get_project(id)
                .expect("Query failed")
                .expect("Project missing");

            assert_eq!(details.materials.len(), 2);
            assert_eq!(details.steps.len(), 3);
            assert_eq!(details.categories.len(), 2);

            assert!(details.materials.iter().all(|m| m.project_id == id));
            assert_eq!(details.materials[0].cost.as_ref().unwrap().to_string(), "1.09");
            assert_eq!(details.materials[1].cost, None);

            let orders: Vec<i32> = details.steps.iter().map(|s| s.step_order).collect();
            assert_eq!(orders, vec![1, 2, 3]);

            let names: Vec<&str> = details.categories
                .iter()
                .map(|c| c.category_name.as_str())
                .collect();
            assert_eq!(names, vec!["Doors and Windows", "Repairs"]);
        }

        it "uses a single connection for the whole aggregate" {
            let project = create_test_project(&db);
            let counting = Database::with_provider(CountingConnector {
                inner: SqliteConnector::new(&path),
                opened: Cell::new(0),
            });

            let details = counting.get_project(project.project_id).expect("Query failed");
            assert!(details.is_some());
            assert_eq!(counting.provider().opened.get(), 1);

            counting.get_all_projects().expect("Query failed");
            assert_eq!(counting.provider().opened.get(), 2);
        }
    }

    describe "update_project" {
        it "overwrites every field including clearing notes" {
            let project = create_test_project(&db);

            let updated = db.update_project(project.project_id, &ProjectInput {
                project_name: "X".to_string(),
                estimated_hours: Some(decimal("10")),
                actual_hours: Some(decimal("5")),
                difficulty: Some(3),
                notes: None,
            }).expect("Update failed");
            assert!(updated);

            let stored = db.get_project(project.project_id)
                .expect("Query failed")
                .expect("Project missing")
                .project;
            assert_eq!(stored.project_id, project.project_id);
            assert_eq!(stored.project_name, "X");
            assert_eq!(stored.estimated_hours.unwrap().to_string(), "10.00");
            assert_eq!(stored.actual_hours.unwrap().to_string(), "5.00");
            assert_eq!(stored.difficulty, Some(3));
            assert_eq!(stored.notes, None);
        }

        it "returns false for an unknown id" {
            let updated = db.update_project(9999, &input("Nobody")).expect("Update failed");
            assert!(!updated);
        }

        it "leaves other projects untouched" {
            let first = create_test_project(&db);
            let second = db.create_project(&input("Second")).expect("Failed to create");

            db.update_project(first.project_id, &input("Renamed")).expect("Update failed");

            let untouched = db.get_project(second.project_id)
                .expect("Query failed")
                .expect("Project missing");
            assert_eq!(untouched.project.project_name, "Second");
        }
    }

    describe "delete_project" {
        it "deletes the project so it can no longer be fetched" {
            let project = create_test_project(&db);

            assert!(db.delete_project(project.project_id).expect("Delete failed"));
            assert!(db.get_project(project.project_id).expect("Query failed").is_none());
        }

        it "returns false for an unknown id" {
            assert!(!db.delete_project(9999).expect("Delete failed"));
        }

        it "cascades to materials and steps" {
            let project = create_test_project(&db);
            let id = project.project_id;
            seed(&path, &format!("
                INSERT INTO material (project_id, material_name) VALUES ({id}, 'Nails');
                INSERT INTO step (project_id, step_text, step_order) VALUES ({id}, 'Hammer', 1);
            "));

            db.delete_project(id).expect("Delete failed");

            assert_eq!(count_rows(&path, "material"), 0);
            assert_eq!(count_rows(&path, "step"), 0);
        }
    }

    describe "transaction" {
        it "rolls back every statement when the unit fails" {
            let result: Result<(), DbError> = db.transaction("seed then fail", |tx| {
                tx.execute("INSERT INTO project (project_name) VALUES ('Ghost')", [])?;
                Err(DbError::Binding {
                    field: "number",
                    value: "x".to_string(),
                    reason: "injected".to_string(),
                })
            });

            let err = result.unwrap_err();
            assert!(matches!(err, DbError::Storage { operation: "seed then fail", .. }));
            assert!(err.is_validation());
            assert!(db.get_all_projects().expect("Query failed").is_empty());
        }

        it "rolls back when a later statement is rejected" {
            let result = db.transaction("insert with orphan material", |tx| {
                tx.execute("INSERT INTO project (project_name) VALUES ('Half done')", [])?;
                tx.execute(
                    "INSERT INTO material (project_id, material_name) VALUES (424242, 'Orphan')",
                    [],
                )?;
                Ok(())
            });

            let err = result.unwrap_err();
            assert!(matches!(err.root_cause(), DbError::Statement(_)));
            assert_eq!(count_rows(&path, "project"), 0);
            assert_eq!(count_rows(&path, "material"), 0);
        }

        it "commits when the unit succeeds" {
            let id = db.transaction("raw insert", |tx| {
                tx.execute("INSERT INTO project (project_name) VALUES ('Kept')", [])?;
                Ok(tx.last_insert_rowid())
            }).expect("Transaction failed");

            let details = db.get_project(id).expect("Query failed");
            assert_eq!(details.unwrap().project.project_name, "Kept");
        }
    }

    describe "errors" {
        it "reports a data directory that cannot be created" {
            let blocker = dir.path().join("blocker");
            std::fs::write(&blocker, "not a directory").expect("Failed to write file");

            let Err(err) = Database::open(blocker.join("nested").join("projects.db")) else {
                panic!("Opened a database below a regular file");
            };
            assert!(matches!(err, DbError::DataDir { .. }));
            assert!(err.to_string().starts_with("Cannot create database directory"));
        }

        it "reports connection failures without wrapping them" {
            let missing = Database::with_provider(
                SqliteConnector::new(dir.path().join("missing").join("x.db")),
            );

            let err = missing.get_all_projects().unwrap_err();
            assert!(matches!(err, DbError::Connection { .. }));
        }

        it "reports a missing column as an extraction failure after rollback" {
            let legacy_path = dir.path().join("legacy.db");
            seed(&legacy_path, "
                CREATE TABLE project (
                    project_id INTEGER PRIMARY KEY,
                    project_name TEXT NOT NULL,
                    estimated_hours DECIMAL(7,2),
                    actual_hours DECIMAL(7,2),
                    difficulty INT
                );
                INSERT INTO project (project_name) VALUES ('Old');
            ");
            let legacy = Database::with_provider(SqliteConnector::new(&legacy_path));

            let err = legacy.get_all_projects().unwrap_err();
            assert!(matches!(err, DbError::Storage { operation: "fetch all projects", .. }));
            assert!(matches!(
                err.root_cause(),
                DbError::Extraction { entity: "project", column: "notes", .. }
            ));
        }

        it "wraps constraint violations as storage errors" {
            seed(&path, "CREATE TRIGGER no_bad_names BEFORE INSERT ON project
                WHEN NEW.project_name = 'bad'
                BEGIN SELECT RAISE(ABORT, 'bad name'); END;");

            let err = db.create_project(&input("bad")).unwrap_err();
            assert!(matches!(err, DbError::Storage { operation: "insert project", .. }));
            assert!(err.to_string().contains("bad name"));
            assert!(db.get_all_projects().expect("Query failed").is_empty());
        }
    }
}
