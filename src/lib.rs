//! Parsing and validation of HED (Hierarchical Event Descriptor)
//! annotation strings.

#[macro_use]
mod regex;

pub mod language;
pub mod parsing;
pub mod problem;
pub mod rendering;
pub mod schema;
pub mod validation;
