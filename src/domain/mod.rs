//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Book Context: 章节、段落、评论
//!
//! 以及共享的段落重排规划（纯函数，不接触存储）

pub mod book;

mod reorder;

pub use reorder::{is_strictly_increasing, plan_move, MovePlan, OrderSlot};
