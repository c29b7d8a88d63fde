pub mod basic;
pub mod password;

pub use basic::Credentials;
pub use password::{hash_password, verify_dummy, verify_password, PasswordError};
