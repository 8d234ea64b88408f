// Issue construction, context tracking, and reporting

mod codes;
mod context;
mod format;
mod handler;
mod issue;
mod messages;

// Re-export all public symbols
pub use codes::*;
pub use context::*;
pub use format::*;
pub use handler::*;
pub use issue::*;
pub use messages::{render_message, Entry, Registry, Shape};
