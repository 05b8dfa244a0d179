//! Events - 章节变更事件

mod publisher;

pub use publisher::{ChapterEvent, EventPublisher};
