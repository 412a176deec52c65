pub mod business;
pub mod user;

pub use business::{Business, CreateBusiness, UpdateBusinessFields};
pub use user::{CreateUser, User};
