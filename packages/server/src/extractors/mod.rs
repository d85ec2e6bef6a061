pub mod auth;
pub mod donation;
pub mod json;
pub mod path;
