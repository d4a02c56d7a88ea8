use crate::{
    codegen::{ArithOp, RelOp},
    error::Expected,
    lexer::TokenKind,
};

use super::{parser::ParseResult, Parser, Role};

impl Parser {
    fn peek_arith_op(&self) -> Option<ArithOp> {
        let t = self.peek();
        if t.kind != TokenKind::Operator {
            return None;
        }
        ArithOp::from_lexeme(&t.lexeme)
    }

    /// condition = expression relop expression
    ///
    /// Leaves both operands on the stack and returns the operator; the
    /// caller emits the test once the condition's closing `)` is matched.
    pub(super) fn parse_condition(&mut self) -> ParseResult<Option<RelOp>> {
        self.produce("<Condition> -> <Expression> <Relop> <Expression>");
        self.parse_expression()?;
        let Some(op) = self.parse_relop() else {
            self.lower(|cg| {
                cg.discard(1);
                Ok(())
            })?;
            return Ok(None);
        };
        self.parse_expression()?;
        Ok(Some(op))
    }

    /// relop = "==" | "!=" | ">" | "<" | "<=" | "=>"
    fn parse_relop(&mut self) -> Option<RelOp> {
        let t = self.peek();
        let op = match t.kind {
            TokenKind::Operator => RelOp::from_lexeme(&t.lexeme),
            _ => None,
        };
        let Some(op) = op else {
            let found = self.peek().clone();
            self.syntax_error(
                "<Relop>",
                Expected::Class("relational operator (==, !=, >, <, <=, =>)"),
                found,
            );
            return None;
        };

        self.next_token();
        self.produce(match op {
            RelOp::Equal => "<Relop> -> ==",
            RelOp::NotEqual => "<Relop> -> !=",
            RelOp::Greater => "<Relop> -> >",
            RelOp::Less => "<Relop> -> <",
            RelOp::LessEqual => "<Relop> -> <=",
            RelOp::GreaterEqual => "<Relop> -> =>",
        });
        Some(op)
    }

    /// expression = term ("+" term | "-" term)*
    pub(super) fn parse_expression(&mut self) -> ParseResult {
        self.produce("<Expression> -> <Term> <E>");
        self.parse_term()?;

        loop {
            let op = match self.peek_arith_op() {
                Some(op @ (ArithOp::Add | ArithOp::Sub)) => op,
                _ => {
                    self.produce("<E> -> ε");
                    return Ok(());
                }
            };
            self.next_token();
            self.produce(match op {
                ArithOp::Add => "<E> -> + <Term> <E>",
                _ => "<E> -> - <Term> <E>",
            });
            self.parse_term()?;
            self.lower(|cg| cg.arithmetic(op))?;
        }
    }

    /// term = factor ("*" factor | "/" factor)*
    fn parse_term(&mut self) -> ParseResult {
        self.produce("<Term> -> <Factor> <T>");
        self.parse_factor()?;

        loop {
            let op = match self.peek_arith_op() {
                Some(op @ (ArithOp::Mul | ArithOp::Div)) => op,
                _ => {
                    self.produce("<T> -> ε");
                    return Ok(());
                }
            };
            self.next_token();
            self.produce(match op {
                ArithOp::Mul => "<T> -> * <Factor> <T>",
                _ => "<T> -> / <Factor> <T>",
            });
            self.parse_factor()?;
            self.lower(|cg| cg.arithmetic(op))?;
        }
    }

    /// factor = "-" primary | primary
    ///
    /// A negated integer literal is folded; anything else becomes `0 - x`.
    fn parse_factor(&mut self) -> ParseResult {
        if !self.peek().is_operator("-") {
            self.produce("<Factor> -> <Primary>");
            return self.parse_primary(false);
        }

        self.next_token();
        self.produce("<Factor> -> - <Primary>");
        if self.peek().kind == TokenKind::Integer {
            return self.parse_primary(true);
        }
        self.lower(|cg| {
            cg.push_literal(0);
            Ok(())
        })?;
        self.parse_primary(false)?;
        self.lower(|cg| cg.subtract())?;
        Ok(())
    }

    /// primary = identifier | integer | identifier "(" ids ")" | "(" expression ")"
    ///         | real | "true" | "false"
    fn parse_primary(&mut self, negate: bool) -> ParseResult {
        let token = self.peek().clone();

        match (token.kind, token.lexeme.as_str()) {
            (TokenKind::Integer, lexeme) => {
                self.next_token();
                self.produce("<Primary> -> <Integer>");
                match lexeme.parse::<i64>() {
                    Ok(n) => {
                        let n = if negate { -n } else { n };
                        self.lower(|cg| {
                            cg.push_literal(n);
                            Ok(())
                        })?;
                    }
                    Err(_) => {
                        self.unsupported("<Primary>", format!("integer literal {}", lexeme));
                        self.push_unlowered()?;
                    }
                }
            }
            (TokenKind::Identifier, name) => {
                self.next_token();
                if self.peek().is_separator("(") {
                    self.next_token();
                    self.produce("<Primary> -> <Identifier> ( <IDs> )");
                    self.parse_ids(Role::Reference)?;
                    self.expect_separator(")", "<Primary>");
                    // Calls are recognized but not lowered.
                    self.push_unlowered()?;
                } else {
                    self.produce("<Primary> -> <Identifier>");
                    self.lower(|cg| cg.push_variable(name))?;
                }
            }
            (TokenKind::Real, lexeme) => {
                self.next_token();
                self.produce("<Primary> -> <Real>");
                self.unsupported("<Primary>", format!("real literal {}", lexeme));
                self.push_unlowered()?;
            }
            (TokenKind::Keyword, "true" | "false") => {
                self.next_token();
                let value = token.lexeme == "true";
                self.produce(if value {
                    "<Primary> -> true"
                } else {
                    "<Primary> -> false"
                });
                self.lower(|cg| {
                    cg.push_boolean(value);
                    Ok(())
                })?;
            }
            (TokenKind::Separator, "(") => {
                self.next_token();
                self.produce("<Primary> -> ( <Expression> )");
                self.parse_expression()?;
                self.expect_separator(")", "<Primary>");
            }
            _ => {
                self.syntax_error(
                    "<Primary>",
                    Expected::Class("integer, real, identifier, true, false or '('"),
                    token.clone(),
                );
                // Keeps the shadow stack aligned for the enclosing operators.
                self.push_unlowered()?;
            }
        }
        Ok(())
    }

    fn push_unlowered(&mut self) -> ParseResult {
        self.lower(|cg| {
            cg.push_unlowered();
            Ok(())
        })?;
        Ok(())
    }
}
