// Infrastructure layer modules
pub mod config;
pub mod item_repository;
pub mod logging;

// Re-exports
pub use config::{DynamoDbConfig, DynamoDbConfigError};
pub use item_repository::{DynamoItemRepository, ItemRepository, ItemRepositoryError};
pub use logging::init_logging;
