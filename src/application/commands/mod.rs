//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod catalog_commands;
mod comment_commands;
mod paragraph_commands;

pub mod handlers;

pub use catalog_commands::*;
pub use comment_commands::*;
pub use paragraph_commands::*;
