//! SQLite Persistence - SQLite 数据库持久化实现

mod chapter_repo;
mod comment_repo;
mod database;
mod paragraph_repo;
mod rows;
mod user_repo;

#[cfg(test)]
pub(crate) mod testing;

pub use chapter_repo::*;
pub use comment_repo::*;
pub use database::{create_pool, run_migrations, DatabaseConfig, DbPool};
pub use paragraph_repo::*;
pub use user_repo::*;
