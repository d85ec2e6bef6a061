pub mod admin;
pub mod article;
pub mod auth;
pub mod donation;
pub mod final_donation;
pub mod payment;
