pub mod admin_repo;
pub mod app_config;
mod associations;
pub mod database;
mod decode;
pub mod error;
pub mod member_repo;
pub mod mentor_repo;
pub mod opportunity_repo;
pub mod project_repo;
pub mod reference_repo;
pub mod service_repo;
pub mod training_repo;

#[cfg(test)]
mod testing;

pub use database::Database;
pub use error::StoreError;
