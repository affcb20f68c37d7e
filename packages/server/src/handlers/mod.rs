pub mod auth;
pub mod generate;
pub mod image;
pub mod script;
