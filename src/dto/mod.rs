pub mod auth;
pub mod cart;
pub mod catalog;
pub mod medicines;
pub mod orders;
pub mod reports;
