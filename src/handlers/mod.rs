pub mod admin;
pub mod auth;
pub mod client;
pub mod driver;
pub mod fare;
