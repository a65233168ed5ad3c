// Database CRUD operations
//
// Every insert treats an id of 0 as "let SQLite pick one" and returns the
// stored id. Updates and deletes return the number of rows touched, so a
// missing id shows up as 0 rather than an error. Parent ids are not checked
// here unless the connection enforces foreign keys.
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use super::counter::Counter;
use super::dates::{date_to_epoch_day, epoch_day_to_date, optional_date_to_epoch_day};
use super::db::{DbConnection, DbResult};
use super::models::{CounterType, Part, Project, ProjectType, ValidationError};

fn id_for_insert(id: i64) -> Option<i64> {
    (id != 0).then_some(id)
}

fn invalid_column(idx: usize, err: ValidationError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn date_column(row: &Row, idx: usize) -> rusqlite::Result<chrono::NaiveDate> {
    let days: i64 = row.get(idx)?;
    epoch_day_to_date(days).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, days))
}

fn optional_date_column(row: &Row, idx: usize) -> rusqlite::Result<Option<chrono::NaiveDate>> {
    match row.get::<_, Option<i64>>(idx)? {
        Some(days) => epoch_day_to_date(days)
            .map(Some)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, days)),
        None => Ok(None),
    }
}

// ==================== PROJECT QUERIES ====================

const PROJECT_COLUMNS: &str =
    "id, name, description, date_created, time_taken, date_completed, is_complete, type";

fn project_from_row(row: &Row) -> rusqlite::Result<Project> {
    let time_taken: i64 = row.get(4)?;
    let project = Project::new(row.get::<_, String>(1)?)
        .map_err(|e| invalid_column(1, e))?
        .with_id(row.get(0)?)
        .with_description(row.get::<_, String>(2)?)
        .with_date_created(date_column(row, 3)?)
        .with_time_taken(
            u64::try_from(time_taken)
                .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(4, time_taken))?,
        )
        .with_date_completed(optional_date_column(row, 5)?)
        .with_complete(row.get(6)?)
        .with_type(ProjectType::from_string(&row.get::<_, String>(7)?));
    Ok(project)
}

/// SQLite integers are signed; larger values are rejected rather than truncated
fn time_taken_for_sql(project: &Project) -> rusqlite::Result<i64> {
    i64::try_from(project.time_taken())
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Insert a project and return its id
pub fn insert_project(db: &DbConnection, project: &Project) -> DbResult<i64> {
    let time_taken = time_taken_for_sql(project)?;
    let conn = db.lock();
    conn.execute(
        "INSERT INTO projects (id, name, description, date_created, time_taken, date_completed, is_complete, type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id_for_insert(project.id()),
            project.name(),
            project.description(),
            date_to_epoch_day(project.date_created()),
            time_taken,
            optional_date_to_epoch_day(project.date_completed()),
            project.is_complete(),
            project.project_type().as_str(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    log::debug!("Inserted project {} ({})", id, project.name());
    Ok(id)
}

/// Overwrite the stored project with the same id. `date_created` is never changed.
pub fn update_project(db: &DbConnection, project: &Project) -> DbResult<usize> {
    let time_taken = time_taken_for_sql(project)?;
    let conn = db.lock();
    let rows = conn.execute(
        "UPDATE projects
         SET name = ?2, description = ?3, time_taken = ?4, date_completed = ?5, is_complete = ?6, type = ?7
         WHERE id = ?1",
        params![
            project.id(),
            project.name(),
            project.description(),
            time_taken,
            optional_date_to_epoch_day(project.date_completed()),
            project.is_complete(),
            project.project_type().as_str(),
        ],
    )?;
    log::debug!("Updated project {} ({} rows)", project.id(), rows);
    Ok(rows)
}

pub fn delete_project(db: &DbConnection, id: i64) -> DbResult<usize> {
    let conn = db.lock();
    let rows = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    log::debug!("Deleted project {} ({} rows)", id, rows);
    Ok(rows)
}

pub fn project_exists(db: &DbConnection, id: i64) -> DbResult<bool> {
    let conn = db.lock();
    let exists = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM projects WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Get a project by ID
pub fn get_project(db: &DbConnection, id: i64) -> DbResult<Option<Project>> {
    let conn = db.lock();
    let project = conn
        .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
            params![id],
            project_from_row,
        )
        .optional()?;
    Ok(project)
}

/// List all projects in id order
pub fn list_projects(db: &DbConnection) -> DbResult<Vec<Project>> {
    let conn = db.lock();
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id"
    ))?;

    let projects = stmt
        .query_map([], project_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(projects)
}

// ==================== PART QUERIES ====================

const PART_COLUMNS: &str = "id, name, description, owning_project_id, is_current, is_complete";

fn part_from_row(row: &Row) -> rusqlite::Result<Part> {
    let part = Part::new(row.get::<_, String>(1)?, row.get(3)?)
        .map_err(|e| invalid_column(1, e))?
        .with_id(row.get(0)?)
        .with_description(row.get::<_, String>(2)?)
        .with_current(row.get(4)?)
        .with_complete(row.get(5)?);
    Ok(part)
}

/// Insert a part and return its id
pub fn insert_part(db: &DbConnection, part: &Part) -> DbResult<i64> {
    let conn = db.lock();
    conn.execute(
        "INSERT INTO parts (id, name, description, owning_project_id, is_current, is_complete)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id_for_insert(part.id()),
            part.name(),
            part.description(),
            part.owning_project_id(),
            part.is_current(),
            part.is_complete(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    log::debug!(
        "Inserted part {} ({}) for project {}",
        id,
        part.name(),
        part.owning_project_id()
    );
    Ok(id)
}

pub fn update_part(db: &DbConnection, part: &Part) -> DbResult<usize> {
    let conn = db.lock();
    let rows = conn.execute(
        "UPDATE parts
         SET name = ?2, description = ?3, owning_project_id = ?4, is_current = ?5, is_complete = ?6
         WHERE id = ?1",
        params![
            part.id(),
            part.name(),
            part.description(),
            part.owning_project_id(),
            part.is_current(),
            part.is_complete(),
        ],
    )?;
    log::debug!("Updated part {} ({} rows)", part.id(), rows);
    Ok(rows)
}

pub fn delete_part(db: &DbConnection, id: i64) -> DbResult<usize> {
    let conn = db.lock();
    let rows = conn.execute("DELETE FROM parts WHERE id = ?1", params![id])?;
    log::debug!("Deleted part {} ({} rows)", id, rows);
    Ok(rows)
}

pub fn part_exists(db: &DbConnection, id: i64) -> DbResult<bool> {
    let conn = db.lock();
    let exists = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM parts WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn get_part(db: &DbConnection, id: i64) -> DbResult<Option<Part>> {
    let conn = db.lock();
    let part = conn
        .query_row(
            &format!("SELECT {PART_COLUMNS} FROM parts WHERE id = ?1"),
            params![id],
            part_from_row,
        )
        .optional()?;
    Ok(part)
}

pub fn list_parts(db: &DbConnection) -> DbResult<Vec<Part>> {
    let conn = db.lock();
    let mut stmt = conn.prepare(&format!("SELECT {PART_COLUMNS} FROM parts ORDER BY id"))?;

    let parts = stmt
        .query_map([], part_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(parts)
}

/// List all parts of a project
pub fn list_parts_for_project(db: &DbConnection, project_id: i64) -> DbResult<Vec<Part>> {
    let conn = db.lock();
    let mut stmt = conn.prepare(&format!(
        "SELECT {PART_COLUMNS} FROM parts WHERE owning_project_id = ?1 ORDER BY id"
    ))?;

    let parts = stmt
        .query_map(params![project_id], part_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(parts)
}

/// The part flagged as currently worked on, lowest id first if several are
pub fn get_current_part(db: &DbConnection, project_id: i64) -> DbResult<Option<Part>> {
    let conn = db.lock();
    let part = conn
        .query_row(
            &format!(
                "SELECT {PART_COLUMNS} FROM parts
                 WHERE owning_project_id = ?1 AND is_current = 1
                 ORDER BY id LIMIT 1"
            ),
            params![project_id],
            part_from_row,
        )
        .optional()?;
    Ok(part)
}

// ==================== COUNTER QUERIES ====================

const COUNTER_COLUMNS: &str = "id, name, description, current_value, can_go_negative, increment_by, type, \
     is_globally_linked, reset_row, max_resets, current_resets, owning_part_id";

fn counter_from_row(row: &Row) -> rusqlite::Result<Counter> {
    let counter = Counter::new(row.get::<_, String>(1)?, row.get(11)?)
        .map_err(|e| invalid_column(1, e))?
        .with_id(row.get(0)?)
        .with_description(row.get::<_, String>(2)?)
        .with_current_value(row.get(3)?)
        .with_can_go_negative(row.get(4)?)
        .with_increment_by(row.get(5)?)
        .with_type(CounterType::from_string(&row.get::<_, String>(6)?))
        .with_globally_linked(row.get(7)?)
        .with_reset_row(row.get(8)?)
        .with_max_resets(row.get(9)?)
        .with_current_resets(row.get(10)?);
    Ok(counter)
}

/// Insert a counter and return its id.
///
/// Fails with a constraint violation when the part already has a counter of
/// the same singleton type (global or stitch).
pub fn insert_counter(db: &DbConnection, counter: &Counter) -> DbResult<i64> {
    let conn = db.lock();
    conn.execute(
        "INSERT INTO counters (id, name, description, current_value, can_go_negative, increment_by, type,
                               is_globally_linked, reset_row, max_resets, current_resets, owning_part_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            id_for_insert(counter.id()),
            counter.name(),
            counter.description(),
            counter.current_value(),
            counter.can_go_negative(),
            counter.increment_by(),
            counter.counter_type().as_str(),
            counter.is_globally_linked(),
            counter.reset_row(),
            counter.max_resets(),
            counter.current_resets(),
            counter.owning_part_id(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    log::debug!(
        "Inserted {} counter {} ({}) for part {}",
        counter.counter_type().as_str(),
        id,
        counter.name(),
        counter.owning_part_id()
    );
    Ok(id)
}

/// Persist a counter's configuration and current count
pub fn update_counter(db: &DbConnection, counter: &Counter) -> DbResult<usize> {
    let conn = db.lock();
    let rows = conn.execute(
        "UPDATE counters
         SET name = ?2, description = ?3, current_value = ?4, can_go_negative = ?5, increment_by = ?6,
             type = ?7, is_globally_linked = ?8, reset_row = ?9, max_resets = ?10,
             current_resets = ?11, owning_part_id = ?12
         WHERE id = ?1",
        params![
            counter.id(),
            counter.name(),
            counter.description(),
            counter.current_value(),
            counter.can_go_negative(),
            counter.increment_by(),
            counter.counter_type().as_str(),
            counter.is_globally_linked(),
            counter.reset_row(),
            counter.max_resets(),
            counter.current_resets(),
            counter.owning_part_id(),
        ],
    )?;
    log::debug!("Updated counter {} ({} rows)", counter.id(), rows);
    Ok(rows)
}

pub fn delete_counter(db: &DbConnection, id: i64) -> DbResult<usize> {
    let conn = db.lock();
    let rows = conn.execute("DELETE FROM counters WHERE id = ?1", params![id])?;
    log::debug!("Deleted counter {} ({} rows)", id, rows);
    Ok(rows)
}

pub fn counter_exists(db: &DbConnection, id: i64) -> DbResult<bool> {
    let conn = db.lock();
    let exists = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM counters WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn get_counter(db: &DbConnection, id: i64) -> DbResult<Option<Counter>> {
    let conn = db.lock();
    let counter = conn
        .query_row(
            &format!("SELECT {COUNTER_COLUMNS} FROM counters WHERE id = ?1"),
            params![id],
            counter_from_row,
        )
        .optional()?;
    Ok(counter)
}

pub fn list_counters(db: &DbConnection) -> DbResult<Vec<Counter>> {
    let conn = db.lock();
    let mut stmt = conn.prepare(&format!(
        "SELECT {COUNTER_COLUMNS} FROM counters ORDER BY id"
    ))?;

    let counters = stmt
        .query_map([], counter_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(counters)
}

/// List all counters of a part
pub fn list_counters_for_part(db: &DbConnection, part_id: i64) -> DbResult<Vec<Counter>> {
    let conn = db.lock();
    let mut stmt = conn.prepare(&format!(
        "SELECT {COUNTER_COLUMNS} FROM counters WHERE owning_part_id = ?1 ORDER BY id"
    ))?;

    let counters = stmt
        .query_map(params![part_id], counter_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(counters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::config::StoreConfig;
    use crate::state::db::{open_in_memory, DbError};
    use chrono::NaiveDate;

    fn db() -> DbConnection {
        open_in_memory(&StoreConfig::default()).unwrap()
    }

    fn project(name: &str) -> Project {
        Project::new(name).unwrap()
    }

    // ---------- projects ----------

    #[test]
    fn test_list_projects_empty() {
        assert!(list_projects(&db()).unwrap().is_empty());
    }

    #[test]
    fn test_insert_project_without_id_round_trips() {
        let db = db();
        let original = project("Test Project")
            .with_description("Aran jumper")
            .with_date_created(NaiveDate::from_ymd_opt(2023, 12, 20).unwrap())
            .with_time_taken(1000)
            .with_date_completed(NaiveDate::from_ymd_opt(2024, 1, 2))
            .with_complete(true)
            .with_type(ProjectType::Crochet);

        let id = insert_project(&db, &original).unwrap();
        let stored = get_project(&db, id).unwrap().unwrap();

        assert_eq!(id, 1);
        assert_eq!(stored, original.with_id(id));
    }

    #[test]
    fn test_time_taken_beyond_sqlite_range_is_rejected() {
        let db = db();
        let largest = project("Big").with_time_taken(i64::MAX as u64);
        let id = insert_project(&db, &largest).unwrap();
        assert_eq!(get_project(&db, id).unwrap(), Some(largest.clone().with_id(id)));

        let too_big = project("Bigger").with_time_taken(u64::MAX);
        let err = insert_project(&db, &too_big).unwrap_err();
        assert!(matches!(
            err,
            DbError::Sqlite(rusqlite::Error::ToSqlConversionFailure(_))
        ));
        assert_eq!(list_projects(&db).unwrap().len(), 1);

        // Updates refuse the value too and leave the stored row alone
        let overflowing = largest.with_id(id).with_time_taken(i64::MAX as u64 + 1);
        assert!(update_project(&db, &overflowing).is_err());
        assert_eq!(
            get_project(&db, id).unwrap().unwrap().time_taken(),
            i64::MAX as u64
        );
    }

    #[test]
    fn test_insert_projects_assigns_increasing_ids() {
        let db = db();
        let id1 = insert_project(&db, &project("Test Project 1")).unwrap();
        let id2 = insert_project(&db, &project("Test Project 2")).unwrap();
        assert!(id2 > id1);
    }

    #[test]
    fn test_insert_project_keeps_explicit_id() {
        let db = db();
        let id = insert_project(&db, &project("Hat").with_id(42)).unwrap();
        assert_eq!(id, 42);
        assert!(project_exists(&db, 42).unwrap());
    }

    #[test]
    fn test_insert_project_duplicate_id_fails() {
        let db = db();
        insert_project(&db, &project("Test Project 1").with_id(1)).unwrap();

        let err = insert_project(&db, &project("Test Project 2").with_id(1)).unwrap_err();

        assert!(err.is_constraint_violation());
        assert_eq!(get_project(&db, 1).unwrap().unwrap().name(), "Test Project 1");
    }

    #[test]
    fn test_list_projects_in_insertion_order() {
        let db = db();
        for i in 0..50 {
            insert_project(&db, &project(&format!("Project {i}"))).unwrap();
        }

        let projects = list_projects(&db).unwrap();

        assert_eq!(projects.len(), 50);
        assert_eq!(projects[0].name(), "Project 0");
        assert_eq!(projects[49].name(), "Project 49");
    }

    #[test]
    fn test_special_character_names_survive() {
        let db = db();
        let id = insert_project(&db, &project("Project @#$%^&*()_+ 'quoted'")).unwrap();
        assert_eq!(
            get_project(&db, id).unwrap().unwrap().name(),
            "Project @#$%^&*()_+ 'quoted'"
        );
    }

    #[test]
    fn test_get_project_missing_ids() {
        let db = db();
        insert_project(&db, &project("Test Project")).unwrap();

        assert!(get_project(&db, 2).unwrap().is_none());
        assert!(get_project(&db, 0).unwrap().is_none());
        assert!(get_project(&db, -1).unwrap().is_none());
        assert!(get_project(&db, i64::MAX).unwrap().is_none());
    }

    #[test]
    fn test_update_project() {
        let db = db();
        let id = insert_project(&db, &project("Test Project")).unwrap();

        let mut stored = get_project(&db, id).unwrap().unwrap();
        stored.set_name("Updated Project Name").unwrap();
        stored.mark_complete(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        assert_eq!(update_project(&db, &stored).unwrap(), 1);
        assert_eq!(get_project(&db, id).unwrap().unwrap(), stored);
    }

    #[test]
    fn test_update_project_with_identical_data_counts_row() {
        let db = db();
        let id = insert_project(&db, &project("Same Project")).unwrap();
        let stored = get_project(&db, id).unwrap().unwrap();

        assert_eq!(update_project(&db, &stored).unwrap(), 1);
        assert_eq!(get_project(&db, id).unwrap().unwrap().name(), "Same Project");
    }

    #[test]
    fn test_update_missing_project_changes_nothing() {
        let db = db();
        let id = insert_project(&db, &project("Test Project")).unwrap();

        let ghost = project("Updated Project").with_id(id + 5);

        assert_eq!(update_project(&db, &ghost).unwrap(), 0);
        assert_eq!(get_project(&db, id).unwrap().unwrap().name(), "Test Project");
        assert_eq!(list_projects(&db).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_project() {
        let db = db();
        let id1 = insert_project(&db, &project("Test Project 1")).unwrap();
        let id2 = insert_project(&db, &project("Test Project 2")).unwrap();

        assert_eq!(delete_project(&db, id1).unwrap(), 1);
        assert!(!project_exists(&db, id1).unwrap());
        assert!(project_exists(&db, id2).unwrap());

        // Second delete is a no-op
        assert_eq!(delete_project(&db, id1).unwrap(), 0);
        assert_eq!(delete_project(&db, 999).unwrap(), 0);

        let remaining = list_projects(&db).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name(), "Test Project 2");
    }

    #[test]
    fn test_project_exists_on_empty_database() {
        assert!(!project_exists(&db(), 1).unwrap());
    }

    // ---------- parts ----------

    #[test]
    fn test_parts_for_project() {
        let db = db();
        let part1 = Part::new("Part 1", 1).unwrap().with_id(1);
        let part2 = Part::new("Part 2", 1).unwrap().with_id(2);
        let other = Part::new("Part 3", 2).unwrap().with_id(3);

        insert_part(&db, &part1).unwrap();
        insert_part(&db, &part2).unwrap();
        insert_part(&db, &other).unwrap();

        assert_eq!(list_parts_for_project(&db, 1).unwrap(), vec![part1, part2]);
        assert_eq!(list_parts_for_project(&db, 2).unwrap(), vec![other]);
        assert!(list_parts_for_project(&db, 9).unwrap().is_empty());
        assert_eq!(list_parts(&db).unwrap().len(), 3);
    }

    #[test]
    fn test_insert_part_round_trips() {
        let db = db();
        let original = Part::new("Sleeve", 7)
            .unwrap()
            .with_description("Left sleeve")
            .with_current(true);

        let id = insert_part(&db, &original).unwrap();

        assert_eq!(get_part(&db, id).unwrap(), Some(original.with_id(id)));
    }

    #[test]
    fn test_insert_part_duplicate_id_fails() {
        let db = db();
        insert_part(&db, &Part::new("Test Part 1", 1).unwrap().with_id(1)).unwrap();

        let err = insert_part(&db, &Part::new("Test Part 2", 1).unwrap().with_id(1)).unwrap_err();

        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_update_and_delete_part() {
        let db = db();
        let id = insert_part(&db, &Part::new("Test Part", 1).unwrap()).unwrap();

        let mut part = get_part(&db, id).unwrap().unwrap();
        part.set_name("Updated Part").unwrap();
        part.set_complete(true);
        assert_eq!(update_part(&db, &part).unwrap(), 1);
        assert_eq!(get_part(&db, id).unwrap(), Some(part.clone()));

        let ghost = part.clone().with_id(id + 2);
        assert_eq!(update_part(&db, &ghost).unwrap(), 0);

        assert_eq!(delete_part(&db, id).unwrap(), 1);
        assert!(!part_exists(&db, id).unwrap());
        assert_eq!(delete_part(&db, id).unwrap(), 0);
    }

    #[test]
    fn test_get_current_part() {
        let db = db();
        insert_part(&db, &Part::new("Back", 1).unwrap()).unwrap();
        let front = insert_part(&db, &Part::new("Front", 1).unwrap().with_current(true)).unwrap();

        let current = get_current_part(&db, 1).unwrap().unwrap();

        assert_eq!(current.id(), front);
        assert!(get_current_part(&db, 2).unwrap().is_none());
    }

    #[test]
    fn test_orphan_part_rejected_when_foreign_keys_enforced() {
        let db = open_in_memory(&StoreConfig {
            enforce_foreign_keys: true,
            ..StoreConfig::default()
        })
        .unwrap();

        let err = insert_part(&db, &Part::new("Orphan", 99).unwrap()).unwrap_err();
        assert!(err.is_constraint_violation());

        let project_id = insert_project(&db, &project("Blanket")).unwrap();
        let part_id = insert_part(&db, &Part::new("Square", project_id).unwrap()).unwrap();
        insert_counter(&db, &Counter::new("Rows", part_id).unwrap()).unwrap();

        // Deleting the project cascades to its parts and counters
        delete_project(&db, project_id).unwrap();
        assert!(!part_exists(&db, part_id).unwrap());
        assert!(list_counters_for_part(&db, part_id).unwrap().is_empty());
    }

    // ---------- counters ----------

    #[test]
    fn test_insert_counter_round_trips() {
        let db = db();
        let original = Counter::new("Pattern repeat", 3)
            .unwrap()
            .with_description("Cable")
            .with_current_value(4)
            .with_can_go_negative(true)
            .with_increment_by(2)
            .with_globally_linked(true)
            .with_reset_row(8)
            .with_max_resets(6)
            .with_current_resets(1);

        let id = insert_counter(&db, &original).unwrap();

        assert_eq!(get_counter(&db, id).unwrap(), Some(original.with_id(id)));
    }

    #[test]
    fn test_counter_state_persists_after_increment() {
        let db = db();
        let id = insert_counter(
            &db,
            &Counter::new("Rows", 1)
                .unwrap()
                .with_reset_row(5)
                .with_max_resets(10)
                .with_current_value(5),
        )
        .unwrap();

        let mut counter = get_counter(&db, id).unwrap().unwrap();
        counter.increment();
        assert_eq!(update_counter(&db, &counter).unwrap(), 1);

        let stored = get_counter(&db, id).unwrap().unwrap();
        assert_eq!(stored.current_value(), 0);
        assert_eq!(stored.current_resets(), 1);
    }

    #[test]
    fn test_one_global_and_one_stitch_counter_per_part() {
        let db = db();
        let global = Counter::new("Rows", 1).unwrap().with_type(CounterType::Global);
        let stitch = Counter::new("Stitches", 1)
            .unwrap()
            .with_type(CounterType::Stitch);

        insert_counter(&db, &global).unwrap();
        insert_counter(&db, &stitch).unwrap();
        insert_counter(&db, &Counter::new("Extra", 1).unwrap()).unwrap();
        insert_counter(&db, &Counter::new("Extra 2", 1).unwrap()).unwrap();

        assert!(insert_counter(&db, &global).unwrap_err().is_constraint_violation());
        assert!(insert_counter(&db, &stitch).unwrap_err().is_constraint_violation());

        // Another part may have its own
        insert_counter(&db, &Counter::new("Rows", 2).unwrap().with_type(CounterType::Global))
            .unwrap();

        assert_eq!(list_counters_for_part(&db, 1).unwrap().len(), 4);
        assert_eq!(list_counters(&db).unwrap().len(), 5);
    }

    #[test]
    fn test_insert_counter_duplicate_id_fails() {
        let db = db();
        insert_counter(&db, &Counter::new("Rows", 1).unwrap().with_id(4)).unwrap();

        let err = insert_counter(&db, &Counter::new("Repeats", 1).unwrap().with_id(4)).unwrap_err();

        assert!(err.is_constraint_violation());
        assert_eq!(get_counter(&db, 4).unwrap().unwrap().name(), "Rows");
        assert_eq!(list_counters(&db).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_counter() {
        let db = db();
        let id = insert_counter(&db, &Counter::new("Rows", 1).unwrap()).unwrap();

        assert!(counter_exists(&db, id).unwrap());
        assert_eq!(delete_counter(&db, id).unwrap(), 1);
        assert!(!counter_exists(&db, id).unwrap());
        assert_eq!(delete_counter(&db, id).unwrap(), 0);
    }

    #[test]
    fn test_update_missing_counter() {
        let db = db();
        let counter = Counter::new("Rows", 1).unwrap().with_id(12);
        assert_eq!(update_counter(&db, &counter).unwrap(), 0);
        assert!(get_counter(&db, 12).unwrap().is_none());
    }

    #[test]
    fn test_blank_stored_name_is_reported() {
        let db = db();
        db.lock()
            .execute(
                "INSERT INTO parts (id, name, owning_project_id) VALUES (1, '', 1)",
                [],
            )
            .unwrap();

        assert!(get_part(&db, 1).is_err());
    }
}
