//! Well-known role name constants.
//!
//! These must match the values accepted by the `users.role` column and the
//! bootstrap seed in `limacentro-db`.

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MEMBER: &str = "MEMBER";
