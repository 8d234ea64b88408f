//! Colourizing issue reports for the terminal

use owo_colors::OwoColorize;

use super::{Render, Syntax};

/// Embellish fragments with ANSI escapes to highlight issue reports in
/// terminal output.
pub struct Terminal;

impl Render for Terminal {
    fn style(&self, syntax: Syntax, content: &str) -> String {
        match syntax {
            Syntax::Neutral => content.to_string(),
            Syntax::Heading => content
                .bright_white()
                .bold()
                .to_string(),
            Syntax::Context => content
                .bright_blue()
                .to_string(),
            Syntax::ErrorCode => content
                .bright_red()
                .bold()
                .to_string(),
            Syntax::WarningCode => content
                .color(owo_colors::Rgb(0xf5, 0x79, 0x00))
                .bold()
                .to_string(),
            Syntax::Message => content.to_string(),
        }
    }
}
