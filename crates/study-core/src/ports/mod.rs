//! Capability ports injected into the services

pub mod storage;
pub mod password;
pub mod notifier;

pub use storage::{ImageUpload, ObjectStorage, StoredObject};
pub use password::{Argon2PasswordEncoder, PasswordEncoder};
pub use notifier::PasswordResetNotifier;

#[cfg(test)]
pub use storage::MockObjectStorage;
#[cfg(test)]
pub use notifier::MockPasswordResetNotifier;
