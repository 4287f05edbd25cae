pub mod analytics;
pub mod detection;
pub mod health;
pub mod reports;
