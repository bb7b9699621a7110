//! # Study API
//! 
//! HTTP handlers, extractors, DTOs, and error mapping.

pub mod handlers;
pub mod dto;
pub mod extract;
pub mod cookies;
pub mod error;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::{AppState, Repositories};
