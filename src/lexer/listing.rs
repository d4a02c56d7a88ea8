use std::io::BufRead;

use thiserror::Error;

use super::{Token, TokenKind};

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("unable to read token listing: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected `<category> <lexeme>`, got {text:?}")]
    Malformed { line: usize, text: String },
}

/// Reads a lexical-analysis listing: `header_lines` lines are skipped, then
/// each non-blank line holds a category name and a lexeme separated by
/// whitespace.
pub fn read_listing(reader: impl BufRead, header_lines: usize) -> Result<Vec<Token>, ListingError> {
    let mut tokens = vec![];

    for (i, line) in reader.lines().enumerate().skip(header_lines) {
        let line = line?;
        let mut fields = line.split_whitespace();
        let Some(category) = fields.next() else {
            continue;
        };
        let Some(lexeme) = fields.next() else {
            return Err(ListingError::Malformed {
                line: i + 1,
                text: line,
            });
        };
        tokens.push(Token::new(TokenKind::from_listing_name(category), lexeme));
    }

    Ok(tokens)
}
