//! Persistence core for theaters, seating, films, seances and users.
//! Repositories, query specifications and compound graph operations over SQLite.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::PersistenceConfig;
pub use db::{open_db, open_db_in_memory, open_db_with_config, DbError, SqliteStorage};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::graph::TheaterGraph;
pub use query::compiler::{QueryCompiler, SqlCompiler};
pub use query::factory::SpecificationFactory;
pub use query::specification::Specification;
pub use repo::existence::{ExistenceOracle, SqlExistenceOracle};
pub use repo::repository::{IntegrityPolicy, RepoError, RepoResult, Repository};
pub use repo::sql_repository::{SqlContext, SqlRepository};
pub use service::data_manager::{DataManager, ManagerError, ManagerResult, ReconcileReport};
pub use storage::{StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
