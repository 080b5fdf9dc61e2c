pub mod images;
pub mod login;
pub mod recipes;
pub mod users;
