//! # Study Core
//! 
//! Domain entities, services, repository traits, and capability ports for the StudyApp backend.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod ports;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, ErrorKind};
