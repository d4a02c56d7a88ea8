use super::Token;

/// Cursor over a fully materialized token sequence.
///
/// Reads past the end yield [`Token::end_of_stream`] and still advance the
/// cursor, so every `next` can be matched by one `unread`.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
    eof: Token,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            eof: Token::end_of_stream(),
        }
    }

    pub fn next(&mut self) -> Token {
        let t = self.peek().clone();
        self.index += 1;
        t
    }

    pub fn peek(&self) -> &Token {
        self.tokens.get(self.index).unwrap_or(&self.eof)
    }

    /// Pushes the most recently read token back.
    pub fn unread(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn is_eof(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}
