pub mod business_repo;
pub mod user_repo;

pub use business_repo::{BusinessRepo, ListingFilter};
pub use user_repo::UserRepo;
