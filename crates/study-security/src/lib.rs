//! # Study Security
//! 
//! Security utilities: JWT session tokens, password hashing, opaque tokens and one-time codes.

pub mod jwt;
pub mod password;
pub mod token;

pub use jwt::{Claims, JwtService};
pub use password::PasswordService;
