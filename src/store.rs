// Async persistence surface over the SQLite state layer
use crate::state::{
    self, config_path_in, get_app_data_dir, Counter, DbConnection, DbError, DbResult, Part,
    Project, StoreConfig,
};

/// Owned handle to the row counter database.
///
/// Construct one per database and pass it to whatever needs persistence.
/// Clones share the same connection. Every call runs the blocking SQLite work
/// on tokio's blocking pool, so calls made from one task are applied in order.
#[derive(Clone)]
pub struct Store {
    db: DbConnection,
}

impl Store {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        let db = state::init_db(config)?;
        log::info!("Row counter store ready");
        Ok(Self::new(db))
    }

    /// Open using `config.json` from the app data directory, if present
    pub fn open_default() -> DbResult<Self> {
        let config = StoreConfig::load(&config_path_in(&get_app_data_dir()?))?;
        Self::open(&config)
    }

    pub fn open_in_memory(config: &StoreConfig) -> DbResult<Self> {
        Ok(Self::new(state::open_in_memory(config)?))
    }

    pub fn connection(&self) -> &DbConnection {
        &self.db
    }

    async fn run<T, F>(&self, op: F) -> DbResult<T>
    where
        F: FnOnce(&DbConnection) -> DbResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| DbError::TaskFailed(format!("spawn_blocking join: {e}")))?
    }

    // ==================== PROJECTS ====================

    pub async fn insert_project(&self, project: &Project) -> DbResult<i64> {
        let project = project.clone();
        self.run(move |db| state::insert_project(db, &project)).await
    }

    pub async fn update_project(&self, project: &Project) -> DbResult<usize> {
        let project = project.clone();
        self.run(move |db| state::update_project(db, &project)).await
    }

    pub async fn delete_project(&self, id: i64) -> DbResult<usize> {
        self.run(move |db| state::delete_project(db, id)).await
    }

    pub async fn project_exists(&self, id: i64) -> DbResult<bool> {
        self.run(move |db| state::project_exists(db, id)).await
    }

    pub async fn get_project(&self, id: i64) -> DbResult<Option<Project>> {
        self.run(move |db| state::get_project(db, id)).await
    }

    pub async fn list_projects(&self) -> DbResult<Vec<Project>> {
        self.run(state::list_projects).await
    }

    // ==================== PARTS ====================

    pub async fn insert_part(&self, part: &Part) -> DbResult<i64> {
        let part = part.clone();
        self.run(move |db| state::insert_part(db, &part)).await
    }

    pub async fn update_part(&self, part: &Part) -> DbResult<usize> {
        let part = part.clone();
        self.run(move |db| state::update_part(db, &part)).await
    }

    pub async fn delete_part(&self, id: i64) -> DbResult<usize> {
        self.run(move |db| state::delete_part(db, id)).await
    }

    pub async fn part_exists(&self, id: i64) -> DbResult<bool> {
        self.run(move |db| state::part_exists(db, id)).await
    }

    pub async fn get_part(&self, id: i64) -> DbResult<Option<Part>> {
        self.run(move |db| state::get_part(db, id)).await
    }

    pub async fn list_parts(&self) -> DbResult<Vec<Part>> {
        self.run(state::list_parts).await
    }

    pub async fn list_parts_for_project(&self, project_id: i64) -> DbResult<Vec<Part>> {
        self.run(move |db| state::list_parts_for_project(db, project_id))
            .await
    }

    pub async fn get_current_part(&self, project_id: i64) -> DbResult<Option<Part>> {
        self.run(move |db| state::get_current_part(db, project_id))
            .await
    }

    // ==================== COUNTERS ====================

    pub async fn insert_counter(&self, counter: &Counter) -> DbResult<i64> {
        let counter = counter.clone();
        self.run(move |db| state::insert_counter(db, &counter)).await
    }

    pub async fn update_counter(&self, counter: &Counter) -> DbResult<usize> {
        let counter = counter.clone();
        self.run(move |db| state::update_counter(db, &counter)).await
    }

    pub async fn delete_counter(&self, id: i64) -> DbResult<usize> {
        self.run(move |db| state::delete_counter(db, id)).await
    }

    pub async fn counter_exists(&self, id: i64) -> DbResult<bool> {
        self.run(move |db| state::counter_exists(db, id)).await
    }

    pub async fn get_counter(&self, id: i64) -> DbResult<Option<Counter>> {
        self.run(move |db| state::get_counter(db, id)).await
    }

    pub async fn list_counters(&self) -> DbResult<Vec<Counter>> {
        self.run(state::list_counters).await
    }

    pub async fn list_counters_for_part(&self, part_id: i64) -> DbResult<Vec<Counter>> {
        self.run(move |db| state::list_counters_for_part(db, part_id))
            .await
    }
}
