pub mod article;
pub mod donation;
pub mod final_donation;
pub mod payment;
pub mod user;
