pub mod integrity;
pub mod loader;
pub mod reports;
pub mod tables;
