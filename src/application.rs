// アプリケーション層モジュール
pub mod item_crud_handler;

// 再エクスポート
pub use item_crud_handler::{HandlerError, ItemCrudHandler};
