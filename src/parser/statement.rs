use crate::{error::Expected, lexer::TokenKind};

use super::{parser::ParseResult, Parser, Role};

impl Parser {
    fn at_statement_list_end(&self) -> bool {
        let t = self.peek();
        t.is_separator("}") || t.is_section_marker() || t.is_eof()
    }

    /// statement_list = statement (ε | statement_list)
    pub(super) fn parse_statement_list(&mut self) -> ParseResult {
        loop {
            self.produce("<Statement List> -> <Statement> <S>");
            self.parse_statement()?;

            if self.at_statement_list_end() {
                self.produce("<S> -> ε");
                return Ok(());
            }
            self.produce("<S> -> <Statement List>");
        }
    }

    /// statement = compound | assign | if | return | print | scan | while
    ///
    /// Always consumes the token it dispatches on, so a statement list makes
    /// progress even over garbage.
    fn parse_statement(&mut self) -> ParseResult {
        let token = self.next_token();

        match (token.kind, token.lexeme.as_str()) {
            (TokenKind::Separator, "{") => {
                self.produce("<Statement> -> <Compound>");
                self.parse_compound()
            }
            (TokenKind::Identifier, name) => {
                self.produce("<Statement> -> <Assign>");
                self.parse_assign(name)
            }
            (TokenKind::Keyword, "if") => {
                self.produce("<Statement> -> <If>");
                self.parse_if()
            }
            (TokenKind::Keyword, "return") => {
                self.produce("<Statement> -> <Return>");
                self.parse_return()
            }
            (TokenKind::Keyword, "print") => {
                self.produce("<Statement> -> <Print>");
                self.parse_print()
            }
            (TokenKind::Keyword, "scan") => {
                self.produce("<Statement> -> <Scan>");
                self.parse_scan()
            }
            (TokenKind::Keyword, "while") => {
                self.produce("<Statement> -> <While>");
                self.parse_while()
            }
            _ => {
                self.syntax_error(
                    "<Statement>",
                    Expected::Class("compound, assign, if, return, print, scan or while"),
                    token.clone(),
                );
                Ok(())
            }
        }
    }

    /// compound = "{" statement_list "}"
    fn parse_compound(&mut self) -> ParseResult {
        self.produce("<Compound> -> { <Statement List> }");
        self.parse_statement_list()?;
        self.expect_separator("}", "<Compound>");
        Ok(())
    }

    /// assign = identifier "=" expression ";"
    fn parse_assign(&mut self, name: &str) -> ParseResult {
        self.produce("<Assign> -> <Identifier> = <Expression> ;");
        if !self.expect_operator("=", "<Assign>") {
            return Ok(());
        }
        self.parse_expression()?;
        self.lower(|cg| cg.pop_to(name))?;
        self.expect_separator(";", "<Assign>");
        Ok(())
    }

    /// if = "if" "(" condition ")" statement if_tail
    fn parse_if(&mut self) -> ParseResult {
        self.produce("<If> -> if ( <Condition> ) <Statement> <if>");
        if !self.parse_guard("<If>")? {
            return Ok(());
        }
        self.parse_statement()?;
        self.parse_if_tail()
    }

    /// if_tail = "endif" | "else" statement "endif"
    fn parse_if_tail(&mut self) -> ParseResult {
        if self.peek().is_keyword("endif") {
            self.next_token();
            self.produce("<if> -> endif");
            return self.close_guard();
        }

        if !self.peek().is_keyword("else") {
            let found = self.peek().clone();
            self.syntax_error("<if>", Expected::Class("'endif' or 'else'"), found);
            return self.close_guard();
        }

        self.next_token();
        self.produce("<if> -> else <Statement> endif");
        // The then-branch jumps over the else-branch; the guard's JMP0 lands
        // on the else label.
        let skip = self.lower(|cg| {
            let skip = cg.forward_jump();
            let target = cg.next_address();
            cg.backpatch(target);
            cg.label();
            Ok(skip)
        })?;
        self.parse_statement()?;
        self.expect_keyword("endif", "<if>");
        self.lower(|cg| {
            let target = cg.next_address();
            if let Some(skip) = skip {
                cg.resolve_jump(skip, target);
            }
            cg.label();
            Ok(())
        })?;
        Ok(())
    }

    /// "(" condition ")" followed by the test and its skip jump.
    ///
    /// Returns `false` when the guard is malformed; no test or jump is
    /// emitted for it then.
    fn parse_guard(&mut self, rule: &'static str) -> ParseResult<bool> {
        if !self.expect_separator("(", rule) {
            return Ok(false);
        }
        let Some(op) = self.parse_condition()? else {
            return Ok(false);
        };
        if !self.expect_separator(")", rule) {
            self.lower(|cg| {
                cg.discard(2);
                Ok(())
            })?;
            return Ok(false);
        }
        self.lower(|cg| cg.relational(op))?;
        Ok(true)
    }

    /// Points the innermost pending JMP0 at the label emitted here.
    fn close_guard(&mut self) -> ParseResult {
        self.lower(|cg| {
            let target = cg.next_address();
            cg.backpatch(target);
            cg.label();
            Ok(())
        })?;
        Ok(())
    }

    /// while = "while" "(" condition ")" statement "endwhile"
    fn parse_while(&mut self) -> ParseResult {
        self.produce("<While> -> while ( <Condition> ) <Statement> endwhile");
        let entry = self.lower(|cg| Ok(cg.label()))?;
        if !self.parse_guard("<While>")? {
            return Ok(());
        }
        self.parse_statement()?;
        self.lower(|cg| {
            if let Some(entry) = entry {
                cg.jump(entry);
            }
            let target = cg.next_address();
            cg.backpatch(target);
            cg.label();
            Ok(())
        })?;
        self.expect_keyword("endwhile", "<While>");
        Ok(())
    }

    /// return = "return" (";" | expression ";")
    fn parse_return(&mut self) -> ParseResult {
        self.produce("<Return> -> return <r>");
        if self.peek().is_separator(";") {
            self.next_token();
            self.produce("<r> -> ;");
            return Ok(());
        }

        self.produce("<r> -> <Expression> ;");
        self.parse_expression()?;
        // No return opcode exists; the value is dropped.
        self.lower(|cg| {
            cg.discard(1);
            Ok(())
        })?;
        self.expect_separator(";", "<Return>");
        Ok(())
    }

    /// print = "print" "(" expression ")" ";"
    fn parse_print(&mut self) -> ParseResult {
        self.produce("<Print> -> print ( <Expression> ) ;");
        if !self.expect_separator("(", "<Print>") {
            return Ok(());
        }
        self.parse_expression()?;
        self.lower(|cg| cg.output())?;
        if self.expect_separator(")", "<Print>") {
            self.expect_separator(";", "<Print>");
        }
        Ok(())
    }

    /// scan = "scan" "(" ids ")" ";"
    fn parse_scan(&mut self) -> ParseResult {
        self.produce("<Scan> -> scan ( <IDs> ) ;");
        if !self.expect_separator("(", "<Scan>") {
            return Ok(());
        }
        self.parse_ids(Role::Input)?;
        if self.expect_separator(")", "<Scan>") {
            self.expect_separator(";", "<Scan>");
        }
        Ok(())
    }
}
