// The vocabulary HED strings are resolved against

mod classes;
mod group;
mod loader;
mod reserved;
mod types;

pub use classes::*;
pub use group::*;
pub use loader::*;
pub use reserved::*;
pub use types::*;
