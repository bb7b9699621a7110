//! # Study Infrastructure
//! 
//! Database, in-memory, object storage, and notification adapters.

pub mod database;
pub mod memory;
pub mod storage;
pub mod notify;

pub use database::{create_pool, PgForgotPasswordRepository, PgRefreshTokenRepository, PgUserRepository};
pub use memory::{MemoryForgotPasswordRepository, MemoryRefreshTokenRepository, MemoryUserRepository};
pub use storage::LocalObjectStorage;
pub use notify::LogResetNotifier;
