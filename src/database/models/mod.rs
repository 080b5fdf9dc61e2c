pub mod recipe;
pub mod user;

pub use recipe::Recipe;
pub use user::User;
