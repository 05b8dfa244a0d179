//! HTTP Handlers

mod chapter;
mod comment;
mod paragraph;
mod ping;
mod websocket;

pub use chapter::*;
pub use comment::*;
pub use paragraph::*;
pub use ping::*;
pub use websocket::*;
