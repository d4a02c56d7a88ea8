use crate::{
    analyzer::Type,
    codegen::{Codegen, Program},
    error::{CompileError, Expected, SemanticError, SyntaxError},
    lexer::{Token, TokenKind, TokenStream},
};

use super::{Trace, TraceEntry};

pub(super) type ParseResult<T = ()> = Result<T, SemanticError>;

/// What a shared identifier procedure does with each name it recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Register the name with the type of the preceding qualifier.
    Declare(Type),
    /// `scan` target: read a value of the declared type into it.
    Input,
    /// Call argument: must be declared, nothing is emitted.
    Reference,
    /// Function names and parameters. No semantic action.
    Name,
}

/// Result of compiling one token stream.
#[derive(Debug)]
pub struct Compilation {
    pub program: Program,
    pub trace: Trace,
    pub errors: Vec<SyntaxError>,
}

impl Compilation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Program, CompileError> {
        let count = self.errors.len();
        match self.errors.into_iter().next() {
            None => Ok(self.program),
            Some(first) => Err(CompileError::Syntax { count, first }),
        }
    }
}

/// Predictive parser that lowers each production to stack-machine code as
/// soon as it is recognized.
#[derive(Debug)]
pub struct Parser {
    tokens: TokenStream,
    codegen: Codegen,
    trace: Trace,
    errors: Vec<SyntaxError>,
    lowering: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: TokenStream::new(tokens),
            codegen: Codegen::new(),
            trace: Trace::new(),
            errors: vec![],
            lowering: true,
        }
    }

    /// Runs the whole compile. Syntax errors are collected in the returned
    /// [`Compilation`]; a semantic error abandons the unit.
    pub fn parse(mut self) -> Result<Compilation, SemanticError> {
        self.parse_rat25s()?;
        Ok(self.finish())
    }

    fn finish(mut self) -> Compilation {
        if !self.tokens.is_eof() {
            let found = self.peek().clone();
            self.syntax_error("<Rat25S>", Expected::Class("end of input"), found);
        }

        let operands = self.codegen.operand_stack().len();
        let fixups = self.codegen.pending_fixups();
        if operands > 0 || fixups > 0 {
            log::warn!(
                "{} operand(s) and {} jump(s) pending at end of input",
                operands,
                fixups
            );
            self.record(SyntaxError::Unbalanced { operands, fixups });
        }

        self.trace.push(TraceEntry::Finished {
            errors: self.errors.len(),
        });
        Compilation {
            program: self.codegen.finish(),
            trace: self.trace,
            errors: self.errors,
        }
    }

    pub(super) fn next_token(&mut self) -> Token {
        let token = self.tokens.next();
        self.trace.push(TraceEntry::Token(token.clone()));
        token
    }

    pub(super) fn peek(&self) -> &Token {
        self.tokens.peek()
    }

    pub(super) fn produce(&mut self, production: &'static str) {
        log::trace!("{}", production);
        self.trace.push(TraceEntry::Production(production));
    }

    fn record(&mut self, error: SyntaxError) {
        log::debug!("{}", error);
        self.trace.push(TraceEntry::Error(error.clone()));
        self.errors.push(error);
    }

    pub(super) fn syntax_error(&mut self, rule: &'static str, expected: Expected, found: Token) {
        self.record(SyntaxError::Unexpected {
            rule,
            expected,
            found,
        });
    }

    pub(super) fn unsupported(&mut self, rule: &'static str, construct: String) {
        log::warn!("{}: {} is not supported", rule, construct);
        self.record(SyntaxError::Unsupported { rule, construct });
    }

    /// Consumes the next token if it is `lexeme` of class `kind`. Otherwise
    /// reports it and leaves it for the caller's successor.
    fn expect(&mut self, kind: TokenKind, lexeme: &'static str, rule: &'static str) -> bool {
        if self.peek().is(kind, lexeme) {
            self.next_token();
            return true;
        }
        let found = self.peek().clone();
        self.syntax_error(rule, Expected::Lexeme(lexeme), found);
        false
    }

    pub(super) fn expect_separator(&mut self, lexeme: &'static str, rule: &'static str) -> bool {
        self.expect(TokenKind::Separator, lexeme, rule)
    }

    pub(super) fn expect_operator(&mut self, lexeme: &'static str, rule: &'static str) -> bool {
        self.expect(TokenKind::Operator, lexeme, rule)
    }

    pub(super) fn expect_keyword(&mut self, lexeme: &'static str, rule: &'static str) -> bool {
        self.expect(TokenKind::Keyword, lexeme, rule)
    }

    /// Runs a semantic action, unless the parser is inside a section that is
    /// only recognized.
    pub(super) fn lower<T>(
        &mut self,
        action: impl FnOnce(&mut Codegen) -> ParseResult<T>,
    ) -> ParseResult<Option<T>> {
        if !self.lowering {
            return Ok(None);
        }
        action(&mut self.codegen).map(Some)
    }

    fn at_section_end(&self) -> bool {
        let t = self.peek();
        t.is_section_marker() || t.is_eof()
    }

    /// Rat25S = "$$" opt_function_definitions "$$" opt_declaration_list "$$" statement_list "$$"
    fn parse_rat25s(&mut self) -> ParseResult {
        self.produce(
            "<Rat25S> -> $$ <Opt Function Definitions> $$ <Opt Declaration List> $$ <Statement List> $$",
        );
        self.expect_separator("$$", "<Rat25S>");

        self.lowering = false;
        self.parse_opt_function_definitions()?;
        self.lowering = true;

        self.expect_separator("$$", "<Rat25S>");
        self.parse_opt_declaration_list()?;
        self.expect_separator("$$", "<Rat25S>");
        self.parse_statement_list()?;
        self.expect_separator("$$", "<Rat25S>");
        Ok(())
    }

    /// opt_function_definitions = function_definitions | empty
    fn parse_opt_function_definitions(&mut self) -> ParseResult {
        if self.at_section_end() {
            self.produce("<Opt Function Definitions> -> <Empty>");
            return Ok(());
        }
        self.produce("<Opt Function Definitions> -> <Function Definitions>");
        self.parse_function_definitions()
    }

    /// function_definitions = function (ε | function_definitions)
    fn parse_function_definitions(&mut self) -> ParseResult {
        loop {
            self.produce("<Function Definitions> -> <Function> <FD>");
            self.parse_function()?;
            if self.at_section_end() {
                self.produce("<FD> -> ε");
                return Ok(());
            }
            self.produce("<FD> -> <Function Definitions>");
        }
    }

    /// function = "function" identifier "(" opt_parameter_list ")" opt_declaration_list body
    fn parse_function(&mut self) -> ParseResult {
        let token = self.next_token();
        if !token.is_keyword("function") {
            self.syntax_error("<Function>", Expected::Lexeme("function"), token);
            return Ok(());
        }
        self.produce(
            "<Function> -> function <Identifier> ( <Opt Parameter List> ) <Opt Declaration List> <Body>",
        );
        self.parse_identifier(Role::Name)?;
        if !self.expect_separator("(", "<Function>") {
            return Ok(());
        }
        self.parse_opt_parameter_list()?;
        if !self.expect_separator(")", "<Function>") {
            return Ok(());
        }
        self.parse_opt_declaration_list()?;
        self.parse_body()
    }

    /// opt_parameter_list = parameter_list | empty
    fn parse_opt_parameter_list(&mut self) -> ParseResult {
        if self.peek().kind != TokenKind::Identifier {
            self.produce("<Opt Parameter List> -> <Empty>");
            return Ok(());
        }
        self.produce("<Opt Parameter List> -> <Parameter List>");
        loop {
            self.produce("<Parameter List> -> <Parameter> <P>");
            self.produce("<Parameter> -> <IDs> <Qualifier>");
            self.parse_ids(Role::Name)?;
            self.parse_qualifier();

            if !self.peek().is_separator(",") {
                self.produce("<P> -> ε");
                return Ok(());
            }
            self.next_token();
            self.produce("<P> -> , <Parameter List>");
        }
    }

    /// qualifier = "integer" | "boolean" | "real"
    fn parse_qualifier(&mut self) -> Option<Type> {
        let token = self.peek();
        let production = match token.lexeme.as_str() {
            _ if !token.is_qualifier() => None,
            "integer" => Some("<Qualifier> -> integer"),
            "boolean" => Some("<Qualifier> -> boolean"),
            _ => Some("<Qualifier> -> real"),
        };
        let Some(production) = production else {
            let found = self.peek().clone();
            self.syntax_error(
                "<Qualifier>",
                Expected::Class("integer, boolean or real"),
                found,
            );
            return None;
        };

        let token = self.next_token();
        self.produce(production);
        if token.lexeme == "real" {
            log::warn!("real variables are tracked with an undefined type");
        }
        Type::from_qualifier(&token.lexeme)
    }

    /// body = "{" statement_list "}"
    fn parse_body(&mut self) -> ParseResult {
        if !self.expect_separator("{", "<Body>") {
            return Ok(());
        }
        self.produce("<Body> -> { <Statement List> }");
        self.parse_statement_list()?;
        self.expect_separator("}", "<Body>");
        Ok(())
    }

    /// opt_declaration_list = declaration_list | empty
    fn parse_opt_declaration_list(&mut self) -> ParseResult {
        if !self.peek().is_qualifier() {
            self.produce("<Opt Declaration List> -> <Empty>");
            return Ok(());
        }
        self.produce("<Opt Declaration List> -> <Declaration List>");
        loop {
            self.produce("<Declaration List> -> <Declaration> ; <D>");
            self.parse_declaration()?;
            self.expect_separator(";", "<Declaration List>");

            if !self.peek().is_qualifier() {
                self.produce("<D> -> ε");
                return Ok(());
            }
            self.produce("<D> -> <Declaration List>");
        }
    }

    /// declaration = qualifier ids
    fn parse_declaration(&mut self) -> ParseResult {
        self.produce("<Declaration> -> <Qualifier> <IDs>");
        let ty = self.parse_qualifier().unwrap_or(Type::Undefined);
        self.parse_ids(Role::Declare(ty))
    }

    /// ids = identifier ("," ids)?
    pub(super) fn parse_ids(&mut self, role: Role) -> ParseResult {
        loop {
            self.produce("<IDs> -> <Identifier> <id>");
            self.parse_identifier(role)?;

            if !self.peek().is_separator(",") {
                self.produce("<id> -> ε");
                return Ok(());
            }
            self.next_token();
            self.produce("<id> -> , <IDs>");
        }
    }

    fn parse_identifier(&mut self, role: Role) -> ParseResult {
        if self.peek().kind != TokenKind::Identifier {
            let found = self.peek().clone();
            self.syntax_error("<Identifier>", Expected::Class("identifier"), found);
            return Ok(());
        }
        let token = self.next_token();
        self.produce("<Identifier> -> Identifier");

        let name = token.lexeme.as_str();
        match role {
            Role::Declare(ty) => {
                self.lower(|cg| Ok(cg.declare(name, ty)))?;
            }
            Role::Input => {
                self.lower(|cg| cg.input(name))?;
            }
            Role::Reference => {
                self.lower(|cg| cg.address_of(name))?;
            }
            Role::Name => {}
        }
        Ok(())
    }
}
