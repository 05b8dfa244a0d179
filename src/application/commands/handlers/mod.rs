//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod catalog_handlers;
mod comment_handlers;
mod paragraph_handlers;
mod reorder_handlers;

pub use catalog_handlers::*;
pub use comment_handlers::*;
pub use paragraph_handlers::*;
pub use reorder_handlers::*;
