// Row counter persistence for knitting and crochet projects
// Module declarations

pub mod state;
pub mod store;

pub use state::{
    Counter, CounterType, DbConnection, DbError, DbResult, Part, Project, ProjectType,
    StoreConfig, ValidationError,
};
pub use store::Store;
