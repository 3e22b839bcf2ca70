// Domain layer modules
pub mod item;
pub mod route;

// Re-exports
pub use item::Item;
pub use route::Route;
