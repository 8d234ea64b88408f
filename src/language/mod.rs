// Types representing parsed HED strings and the definitions they use

mod composite;
mod definitions;
mod error;
mod hedstring;
mod types;

// Re-export all public symbols
pub use composite::*;
pub use definitions::*;
pub use error::*;
pub use hedstring::*;
pub use types::*;
