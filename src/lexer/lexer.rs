use super::{Token, TokenKind, KEYWORDS, ONE_SYMBOL_TOKENS, TWO_SYMBOLS_TOKENS};

/// Classifying scanner for Rat25S source text.
///
/// Never fails: characters that start no known token come out as
/// [`TokenKind::Unknown`] and are left for the parser to reject.
#[derive(Debug)]
pub struct Lexer {
    tokens: Vec<Token>,
    index: usize,
}

impl Lexer {
    fn new() -> Self {
        Self {
            tokens: vec![],
            index: 0,
        }
    }

    fn new_token(&mut self, kind: TokenKind, s: &str) {
        self.tokens.push(Token::new(kind, s));
        self.index += s.chars().count();
    }

    fn parse_number(&mut self, chars: &[char]) {
        let mut s: String = chars.iter().take_while(|c| c.is_ascii_digit()).collect();
        let rest = &chars[s.len()..];

        if rest.len() >= 2 && rest[0] == '.' && rest[1].is_ascii_digit() {
            s.push('.');
            s.extend(rest[1..].iter().take_while(|c| c.is_ascii_digit()));
            self.new_token(TokenKind::Real, &s);
        } else {
            self.new_token(TokenKind::Integer, &s);
        }
    }

    fn parse_identifier(&mut self, chars: &[char]) {
        let s: String = chars
            .iter()
            .take_while(|&&c| c.is_ascii_alphanumeric() || c == '_')
            .collect();

        if KEYWORDS.contains(s.as_str()) {
            self.new_token(TokenKind::Keyword, &s);
        } else {
            self.new_token(TokenKind::Identifier, &s);
        }
    }

    /// Skips a `[* ... *]` comment. An unterminated comment runs to the end.
    fn skip_comment(&mut self, chars: &[char]) {
        let mut i = 2;
        while i < chars.len() {
            if chars[i] == '*' && chars.get(i + 1) == Some(&']') {
                self.index += i + 2;
                return;
            }
            i += 1;
        }
        self.index += chars.len();
    }

    fn _tokenize(&mut self, s: &str) {
        let chars: Vec<_> = s.chars().collect();

        while self.index < chars.len() {
            let c = chars[self.index];
            let c2 = chars[self.index..].iter().take(2).collect::<String>();

            if c.is_whitespace() {
                self.index += 1;
            } else if c2 == "[*" {
                self.skip_comment(&chars[self.index..]);
            } else if c.is_ascii_digit() {
                self.parse_number(&chars[self.index..]);
            } else if c.is_ascii_alphabetic() {
                self.parse_identifier(&chars[self.index..]);
            } else if let Some(kind) = TWO_SYMBOLS_TOKENS.get(c2.as_str()) {
                self.new_token(*kind, &c2);
            } else if let Some(kind) = ONE_SYMBOL_TOKENS.get(&c) {
                self.new_token(*kind, &c.to_string());
            } else {
                self.new_token(TokenKind::Unknown, &c.to_string());
            }
        }
    }

    pub fn tokenize(s: &str) -> Vec<Token> {
        let mut lexer = Lexer::new();
        lexer._tokenize(s);

        lexer.tokens
    }
}
