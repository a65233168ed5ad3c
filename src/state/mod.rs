// State management module
// Handles SQLite persistence and the project, part and counter models

pub mod config;
pub mod counter;
pub mod dates;
pub mod db;
pub mod models;
pub mod queries;
pub mod storage;

pub use config::{ConfigError, StoreConfig};
pub use counter::{mirror_global_increment, Counter};
pub use db::{init_db, open_in_memory, DbConnection, DbError, DbResult};
pub use models::{
    validate_name, CounterType, Part, Project, ProjectType, ValidationError, NAME_MAX_LENGTH,
};
pub use queries::{
    counter_exists, delete_counter, delete_part, delete_project, get_counter, get_current_part,
    get_part, get_project, insert_counter, insert_part, insert_project, list_counters,
    list_counters_for_part, list_parts, list_parts_for_project, list_projects, part_exists,
    project_exists, update_counter, update_part, update_project,
};
pub use storage::{config_path_in, get_app_data_dir, resolve_db_path, StorageError};
