//! Several per-column strings joined into one row string.

use super::types::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub name: String,
    /// Where the piece landed in the joined text.
    pub span: Span,
}

/// The joined text along with a table mapping offsets in it back to the
/// piece (and offset within that piece) they came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Composite {
    pub text: String,
    pub pieces: Vec<Piece>,
}

fn is_blank(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text.eq_ignore_ascii_case("n/a")
}

impl Composite {
    /// Join named pieces with ", ". Blank and "n/a" pieces are left out.
    pub fn join<S: AsRef<str>>(pieces: &[(S, S)]) -> Composite {
        let mut composite = Composite::default();
        for (name, text) in pieces {
            let text = text.as_ref();
            if is_blank(text) {
                continue;
            }
            if !composite
                .text
                .is_empty()
            {
                composite
                    .text
                    .push_str(", ");
            }
            let start = composite
                .text
                .len();
            composite
                .text
                .push_str(text);
            composite
                .pieces
                .push(Piece {
                    name: name
                        .as_ref()
                        .to_string(),
                    span: Span::new(start, start + text.len()),
                });
        }
        composite
    }

    /// Which piece an offset in the joined text falls in, and where within
    /// it. Offsets in the inserted separators belong to no piece.
    pub fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        self.pieces
            .iter()
            .position(|piece| {
                piece
                    .span
                    .contains(offset)
                    || (piece
                        .span
                        .is_empty()
                        && piece.span.start == offset)
            })
            .map(|i| (i, offset - self.pieces[i].span.start))
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn joining_columns() {
        let composite = Composite::join(&[
            ("onset", "n/a"),
            ("type", "Sensory-event"),
            ("extra", "  "),
            ("value", "(Item, Label/Blue)"),
        ]);
        assert_eq!(composite.text, "Sensory-event, (Item, Label/Blue)");
        assert_eq!(composite.pieces.len(), 2);
        assert_eq!(composite.pieces[1].name, "value");
        assert_eq!(composite.pieces[1].span, Span::new(15, 33));
    }

    #[test]
    fn locating_offsets() {
        let composite = Composite::join(&[("a", "Event"), ("b", "Item")]);
        assert_eq!(composite.locate(2), Some((0, 2)));
        assert_eq!(composite.locate(5), None);
        assert_eq!(composite.locate(8), Some((1, 1)));
    }
}
