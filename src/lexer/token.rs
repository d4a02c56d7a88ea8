use std::fmt;

use phf::{phf_map, phf_set};

pub static KEYWORDS: phf::Set<&str> = phf_set! {
    "function",
    "integer",
    "boolean",
    "real",
    "if",
    "else",
    "endif",
    "return",
    "print",
    "scan",
    "while",
    "endwhile",
    "true",
    "false",
};

pub static TWO_SYMBOLS_TOKENS: phf::Map<&str, TokenKind> = phf_map! {
    "==" => TokenKind::Operator,
    "!=" => TokenKind::Operator,
    "<=" => TokenKind::Operator,
    ">=" => TokenKind::Operator,
    "=>" => TokenKind::Operator,
    "$$" => TokenKind::Separator,
};

pub static ONE_SYMBOL_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '=' => TokenKind::Operator,
    '+' => TokenKind::Operator,
    '-' => TokenKind::Operator,
    '*' => TokenKind::Operator,
    '/' => TokenKind::Operator,
    '>' => TokenKind::Operator,
    '<' => TokenKind::Operator,
    '(' => TokenKind::Separator,
    ')' => TokenKind::Separator,
    '{' => TokenKind::Separator,
    '}' => TokenKind::Separator,
    '[' => TokenKind::Separator,
    ']' => TokenKind::Separator,
    ';' => TokenKind::Separator,
    ',' => TokenKind::Separator,
};

/// Lexical category of a token. The lexeme itself is kept on [`Token`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Integer,
    Real,
    Operator,
    Separator,
    Unknown,
    EndOfStream,
}

impl TokenKind {
    /// Maps the category column of a lexical-analysis listing.
    pub fn from_listing_name(name: &str) -> Self {
        match name {
            "keyword" => TokenKind::Keyword,
            "identifier" => TokenKind::Identifier,
            "integer" => TokenKind::Integer,
            "real" => TokenKind::Real,
            "operator" => TokenKind::Operator,
            "separator" => TokenKind::Separator,
            _ => TokenKind::Unknown,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::EndOfStream => "EOF",
        };
        f.pad(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
        }
    }

    pub fn end_of_stream() -> Self {
        Self::new(TokenKind::EndOfStream, "")
    }

    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    pub fn is_keyword(&self, lexeme: &str) -> bool {
        self.is(TokenKind::Keyword, lexeme)
    }

    pub fn is_operator(&self, lexeme: &str) -> bool {
        self.is(TokenKind::Operator, lexeme)
    }

    pub fn is_separator(&self, lexeme: &str) -> bool {
        self.is(TokenKind::Separator, lexeme)
    }

    /// The `$$` section marker.
    pub fn is_section_marker(&self) -> bool {
        self.is_separator("$$")
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfStream
    }

    pub fn is_qualifier(&self) -> bool {
        self.kind == TokenKind::Keyword
            && matches!(self.lexeme.as_str(), "integer" | "boolean" | "real")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            write!(f, "end of input")
        } else {
            write!(f, "{} '{}'", self.kind, self.lexeme)
        }
    }
}
