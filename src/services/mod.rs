pub mod login_service;
pub mod recipe_service;
pub mod user_service;
pub mod validate;
