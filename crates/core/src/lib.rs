//! LimaCentro domain core.
//!
//! Pure domain logic shared by the database and API crates: the error
//! taxonomy, the fixed district/category/rating catalog, the listing
//! visibility policy, the moderation state machine, text-search helpers,
//! and the presence tracker. Nothing in this crate performs I/O.

pub mod catalog;
pub mod error;
pub mod identity;
pub mod moderation;
pub mod presence;
pub mod roles;
pub mod search;
pub mod types;
pub mod visibility;
