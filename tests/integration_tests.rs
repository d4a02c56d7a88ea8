use ratc::analyzer::{Type, BASE_ADDRESS};
use ratc::codegen::{Instruction, Opcode, Operand};
use ratc::error::{Expected, SemanticError, SyntaxError};
use ratc::lexer::{read_listing, Lexer, TokenKind};
use ratc::parser::{Compilation, TraceEntry};
use ratc::{compile, CompileError};

fn wrap_in_main(declarations: &str, statements: &str) -> String {
    format!("$$ $$ {} $$ {} $$", declarations, statements)
}

fn compile_clean(input: &str) -> Compilation {
    let compilation = compile(input).expect("semantic error");
    assert!(
        compilation.errors.is_empty(),
        "unexpected errors: {:?}",
        compilation.errors
    );
    compilation
}

fn ops(instructions: &[Instruction]) -> Vec<(Opcode, Option<Operand>)> {
    instructions.iter().map(|i| (i.opcode, i.operand)).collect()
}

fn lit(n: i64) -> Option<Operand> {
    Some(Operand::Literal(n))
}

fn addr(a: usize) -> Option<Operand> {
    Some(Operand::Address(a))
}

fn target(t: usize) -> Option<Operand> {
    Some(Operand::Target(t))
}

#[test]
fn assign_and_print() {
    let c = compile_clean(&wrap_in_main("integer a;", "a = 2 + 3; print(a);"));
    let a = BASE_ADDRESS;

    assert_eq!(
        ops(c.program.instructions()),
        vec![
            (Opcode::PushInteger, lit(2)),
            (Opcode::PushInteger, lit(3)),
            (Opcode::Add, None),
            (Opcode::PopMemory, addr(a)),
            (Opcode::PushMemory, addr(a)),
            (Opcode::Output, None),
        ]
    );

    let symbols: Vec<_> = c.program.symbols().iter().collect();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "a");
    assert_eq!(symbols[0].address, 10000);
    assert_eq!(symbols[0].ty, Type::Integer);
}

#[test]
fn addresses_are_one_based_and_increasing() {
    let c = compile_clean(&wrap_in_main("integer a, b;", "a = 1; b = a * 2; print(b);"));
    for (i, instruction) in c.program.instructions().iter().enumerate() {
        assert_eq!(instruction.address, i + 1);
    }
}

#[test]
fn while_loop() {
    let c = compile_clean(&wrap_in_main(
        "integer x;",
        "x = 5; while (x > 0) { x = x - 1; } endwhile print(x);",
    ));
    let x = BASE_ADDRESS;

    assert_eq!(
        ops(c.program.instructions()),
        vec![
            (Opcode::PushInteger, lit(5)),
            (Opcode::PopMemory, addr(x)),
            (Opcode::Label, None),
            (Opcode::PushMemory, addr(x)),
            (Opcode::PushInteger, lit(0)),
            (Opcode::Greater, None),
            (Opcode::JumpIfZero, target(13)),
            (Opcode::PushMemory, addr(x)),
            (Opcode::PushInteger, lit(1)),
            (Opcode::Sub, None),
            (Opcode::PopMemory, addr(x)),
            (Opcode::Jump, target(3)),
            (Opcode::Label, None),
            (Opcode::PushMemory, addr(x)),
            (Opcode::Output, None),
        ]
    );
}

#[test]
fn while_jumps_round_trip() {
    let c = compile_clean(&wrap_in_main(
        "integer i, n;",
        "i = 0; n = 3; while (i < n) { print(i); i = i + 1; } endwhile",
    ));
    let program = &c.program;

    let entry = program
        .instructions()
        .iter()
        .find(|i| i.opcode == Opcode::Label)
        .unwrap()
        .address;
    let back = program
        .instructions()
        .iter()
        .find(|i| i.opcode == Opcode::Jump)
        .unwrap();
    let test = program
        .instructions()
        .iter()
        .find(|i| i.opcode == Opcode::JumpIfZero)
        .unwrap();

    assert_eq!(back.target(), Some(entry));
    assert_eq!(test.target(), Some(back.address + 1));
    assert_eq!(
        program.instruction(back.address + 1).unwrap().opcode,
        Opcode::Label
    );
}

#[test]
fn if_without_else() {
    let c = compile_clean(&wrap_in_main(
        "integer a;",
        "a = 1; if (a == 1) print(a); endif print(2);",
    ));
    let a = BASE_ADDRESS;

    assert_eq!(
        ops(c.program.instructions()),
        vec![
            (Opcode::PushInteger, lit(1)),
            (Opcode::PopMemory, addr(a)),
            (Opcode::PushMemory, addr(a)),
            (Opcode::PushInteger, lit(1)),
            (Opcode::Equal, None),
            (Opcode::JumpIfZero, target(9)),
            (Opcode::PushMemory, addr(a)),
            (Opcode::Output, None),
            (Opcode::Label, None),
            (Opcode::PushInteger, lit(2)),
            (Opcode::Output, None),
        ]
    );
}

#[test]
fn if_with_else_skips_else_branch() {
    let c = compile_clean(&wrap_in_main(
        "integer a, b;",
        "a = 1; b = 2; if (a < b) print(a); else print(b); endif",
    ));
    let (a, b) = (BASE_ADDRESS, BASE_ADDRESS + 1);

    assert_eq!(
        ops(c.program.instructions()),
        vec![
            (Opcode::PushInteger, lit(1)),
            (Opcode::PopMemory, addr(a)),
            (Opcode::PushInteger, lit(2)),
            (Opcode::PopMemory, addr(b)),
            (Opcode::PushMemory, addr(a)),
            (Opcode::PushMemory, addr(b)),
            (Opcode::Less, None),
            (Opcode::JumpIfZero, target(12)),
            (Opcode::PushMemory, addr(a)),
            (Opcode::Output, None),
            (Opcode::Jump, target(15)),
            (Opcode::Label, None),
            (Opcode::PushMemory, addr(b)),
            (Opcode::Output, None),
            (Opcode::Label, None),
        ]
    );
}

#[test]
fn one_conditional_jump_per_test() {
    let c = compile_clean(&wrap_in_main(
        "integer a, b;",
        "a = 1; b = 2;
         if (a < b) { if (b != 0) print(b); endif print(a); } endif
         if (a => b) print(a); endif",
    ));
    let instructions = c.program.instructions();
    let tests = instructions
        .iter()
        .filter(|i| {
            matches!(
                i.opcode,
                Opcode::Less
                    | Opcode::NotEqual
                    | Opcode::GreaterEqual
                    | Opcode::Greater
                    | Opcode::Equal
                    | Opcode::LessEqual
            )
        })
        .count();
    let jumps: Vec<_> = instructions
        .iter()
        .filter(|i| i.opcode == Opcode::JumpIfZero)
        .collect();

    assert_eq!(tests, 3);
    assert_eq!(jumps.len(), 3);
    for jump in jumps {
        let landing = c.program.instruction(jump.target().unwrap()).unwrap();
        assert_eq!(landing.opcode, Opcode::Label);
    }
    assert_eq!(c.program.pending_fixups(), 0);
}

#[test]
fn nested_if_patches_innermost_first() {
    let c = compile_clean(&wrap_in_main(
        "integer a;",
        "a = 1; if (a > 0) { if (a > 1) print(a); endif } endif",
    ));
    let jumps: Vec<_> = c
        .program
        .instructions()
        .iter()
        .filter(|i| i.opcode == Opcode::JumpIfZero)
        .collect();

    let outer = jumps[0].target().unwrap();
    let inner = jumps[1].target().unwrap();
    assert!(inner < outer);
    assert_eq!(outer, c.program.instructions().len());
}

#[test]
fn missing_close_paren_in_if() {
    let c = compile(&wrap_in_main(
        "integer x;",
        "x = 1; if (x > 0 print(x); endif",
    ))
    .unwrap();

    let first = c.errors.first().expect("no error reported");
    assert_eq!(first.expected(), Some(&Expected::Lexeme(")")));
    assert!(c
        .program
        .instructions()
        .iter()
        .all(|i| i.opcode != Opcode::JumpIfZero && i.opcode != Opcode::Greater));
    assert_eq!(c.program.pending_operands(), 0);
    assert_eq!(c.program.pending_fixups(), 0);
}

#[test]
fn syntax_errors_do_not_stop_the_compile() {
    let c = compile(&wrap_in_main("integer a;", "a = 1 print(a); a = 2;")).unwrap();

    assert_eq!(c.errors.len(), 1);
    assert!(matches!(
        &c.errors[0],
        SyntaxError::Unexpected {
            rule: "<Assign>",
            expected: Expected::Lexeme(";"),
            ..
        }
    ));
    let opcodes: Vec<_> = c.program.instructions().iter().map(|i| i.opcode).collect();
    assert_eq!(
        opcodes,
        vec![
            Opcode::PushInteger,
            Opcode::PopMemory,
            Opcode::PushMemory,
            Opcode::Output,
            Opcode::PushInteger,
            Opcode::PopMemory,
        ]
    );
}

#[test]
fn into_result_reports_syntax_errors() {
    let c = compile(&wrap_in_main("integer a;", "a = ;")).unwrap();
    let err = c.into_result().unwrap_err();
    assert!(matches!(err, CompileError::Syntax { count: 1, .. }));

    let c = compile_clean(&wrap_in_main("integer a;", "a = 1;"));
    assert!(c.into_result().is_ok());
}

#[test]
fn undeclared_variable_in_expression() {
    let err = compile(&wrap_in_main("integer a;", "a = b + 1;")).unwrap_err();
    assert_eq!(err, SemanticError::UndeclaredVariable("b".to_string()));
}

#[test]
fn undeclared_assignment_target() {
    let err = compile(&wrap_in_main("", "c = 1;")).unwrap_err();
    assert_eq!(err, SemanticError::UndeclaredVariable("c".to_string()));
}

#[test]
fn redeclaration_keeps_address() {
    let c = compile_clean(&wrap_in_main(
        "integer a; boolean a; integer b;",
        "b = 1;",
    ));
    let symbols = c.program.symbols();

    assert_eq!(symbols.len(), 2);
    let a = symbols.get("a").unwrap();
    assert_eq!(a.address, BASE_ADDRESS);
    assert_eq!(a.ty, Type::Boolean);
    assert_eq!(symbols.get("b").unwrap().address, BASE_ADDRESS + 1);
}

#[test]
fn stack_balance() {
    let c = compile_clean(&wrap_in_main(
        "integer a, b; boolean f;",
        "scan(a, b);
         f = true;
         while (a < b) { a = a + 2 * (b - a) / 3; print(a); } endwhile
         if (f == false) print(b); else { b = -a; print(-b); } endif
         return a;",
    ));
    let stats = c.program.stats();

    assert!(stats.pushes > 0);
    assert_eq!(stats.pushes, stats.pops);
    assert_eq!(c.program.pending_operands(), 0);
    assert_eq!(c.program.pending_fixups(), 0);
}

#[test]
fn scan_reads_into_each_variable() {
    let c = compile_clean(&wrap_in_main("integer a, b;", "scan(a, b);"));
    assert_eq!(
        ops(c.program.instructions()),
        vec![
            (Opcode::Input, None),
            (Opcode::PopMemory, addr(BASE_ADDRESS)),
            (Opcode::Input, None),
            (Opcode::PopMemory, addr(BASE_ADDRESS + 1)),
        ]
    );
}

#[test]
fn negation() {
    let c = compile_clean(&wrap_in_main("integer a, b;", "a = -5; b = -a;"));
    let (a, b) = (BASE_ADDRESS, BASE_ADDRESS + 1);
    assert_eq!(
        ops(c.program.instructions()),
        vec![
            (Opcode::PushInteger, lit(-5)),
            (Opcode::PopMemory, addr(a)),
            (Opcode::PushInteger, lit(0)),
            (Opcode::PushMemory, addr(a)),
            (Opcode::Sub, None),
            (Opcode::PopMemory, addr(b)),
        ]
    );
}

#[test]
fn subtraction_keeps_operand_order() {
    let c = compile_clean(&wrap_in_main("integer a;", "a = 10 - 4 - 3;"));
    assert_eq!(
        ops(c.program.instructions()),
        vec![
            (Opcode::PushInteger, lit(10)),
            (Opcode::PushInteger, lit(4)),
            (Opcode::Sub, None),
            (Opcode::PushInteger, lit(3)),
            (Opcode::Sub, None),
            (Opcode::PopMemory, addr(BASE_ADDRESS)),
        ]
    );
}

#[test]
fn booleans_and_division_types() {
    let c = compile_clean(&wrap_in_main(
        "boolean f; integer a, b, q;",
        "f = true; a = 8 / 2; b = 1; q = a / b;",
    ));
    let symbols = c.program.symbols();

    assert_eq!(c.program.instructions()[0].opcode, Opcode::PushBoolean);
    assert_eq!(c.program.instructions()[0].operand, lit(1));
    assert_eq!(symbols.get("f").unwrap().ty, Type::Boolean);
    assert_eq!(symbols.get("a").unwrap().ty, Type::Integer);
    assert_eq!(symbols.get("q").unwrap().ty, Type::Undefined);
}

#[test]
fn function_definitions_are_not_lowered() {
    let c = compile_clean(
        "$$
         function square (n integer) integer r; { r = n * n; return r; }
         $$
         integer a;
         $$
         a = 1;
         $$",
    );

    assert_eq!(c.program.symbols().len(), 1);
    assert!(c.program.symbols().get("n").is_none());
    assert_eq!(
        ops(c.program.instructions()),
        vec![
            (Opcode::PushInteger, lit(1)),
            (Opcode::PopMemory, addr(BASE_ADDRESS)),
        ]
    );
    assert!(c
        .trace
        .productions()
        .any(|p| p.starts_with("<Function> -> function")));
}

#[test]
fn calls_are_parsed_but_not_lowered() {
    let c = compile(&wrap_in_main("integer a, b;", "a = 1; b = f(a) + 1;")).unwrap();

    assert!(c.errors.is_empty());
    let opcodes: Vec<_> = c.program.instructions().iter().map(|i| i.opcode).collect();
    assert_eq!(
        opcodes,
        vec![
            Opcode::PushInteger,
            Opcode::PopMemory,
            Opcode::PushInteger,
            Opcode::Add,
            Opcode::PopMemory,
        ]
    );
    assert_eq!(c.program.symbols().get("b").unwrap().ty, Type::Undefined);
}

#[test]
fn real_literals_are_reported() {
    let c = compile(&wrap_in_main("real r;", "r = 1.5;")).unwrap();
    assert!(matches!(
        c.errors.as_slice(),
        [SyntaxError::Unsupported { .. }]
    ));
    assert_eq!(c.program.symbols().get("r").unwrap().ty, Type::Undefined);
}

#[test]
fn trailing_tokens_are_reported() {
    let c = compile(&format!("{} print", wrap_in_main("integer a;", "a = 1;"))).unwrap();
    assert!(matches!(
        c.errors.as_slice(),
        [SyntaxError::Unexpected {
            expected: Expected::Class("end of input"),
            ..
        }]
    ));
}

#[test]
fn derivation_trace() {
    let c = compile_clean(&wrap_in_main("integer a;", "a = 2 + 3; print(a);"));
    let productions: Vec<_> = c.trace.productions().take(14).collect();

    assert_eq!(
        productions,
        vec![
            "<Rat25S> -> $$ <Opt Function Definitions> $$ <Opt Declaration List> $$ <Statement List> $$",
            "<Opt Function Definitions> -> <Empty>",
            "<Opt Declaration List> -> <Declaration List>",
            "<Declaration List> -> <Declaration> ; <D>",
            "<Declaration> -> <Qualifier> <IDs>",
            "<Qualifier> -> integer",
            "<IDs> -> <Identifier> <id>",
            "<Identifier> -> Identifier",
            "<id> -> ε",
            "<D> -> ε",
            "<Statement List> -> <Statement> <S>",
            "<Statement> -> <Assign>",
            "<Assign> -> <Identifier> = <Expression> ;",
            "<Expression> -> <Term> <E>",
        ]
    );
    assert_eq!(
        c.trace.entries().last(),
        Some(&TraceEntry::Finished { errors: 0 })
    );

    let rendered = c.trace.to_string();
    assert!(rendered.contains("<E> -> + <Term> <E>"));
    assert!(rendered.ends_with("Parse complete: correct syntax\n"));
}

#[test]
fn reports() {
    let c = compile_clean(&wrap_in_main("integer a;", "a = 7; print(a);"));
    let instructions = c.program.instruction_table().to_string();
    let lines: Vec<_> = instructions.lines().collect();

    assert!(lines[0].starts_with("ADDR"));
    assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), ["1", "PUSHI", "7"]);
    assert_eq!(lines[5].split_whitespace().collect::<Vec<_>>(), ["4", "SOUT", "nil"]);

    let symbols = c.program.symbols().to_string();
    let row: Vec<_> = symbols.lines().nth(2).unwrap().split_whitespace().collect();
    assert_eq!(row, ["a", "10000", "integer"]);
}

#[test]
fn token_listing_input() {
    let listing = "\nOutput:\n   token   lexeme\n-----------\n\
        separator $$\nseparator $$\nkeyword integer\nidentifier a\nseparator ;\n\
        separator $$\nidentifier a\noperator =\ninteger 4\nseparator ;\nseparator $$\n";
    let tokens = read_listing(listing.as_bytes(), 4).unwrap();

    assert_eq!(tokens.len(), 11);
    assert_eq!(tokens[2].kind, TokenKind::Keyword);
    assert_eq!(tokens[8].kind, TokenKind::Integer);

    let c = ratc::compile_tokens(tokens).unwrap();
    assert!(c.is_ok());
    assert_eq!(c.program.instructions().len(), 2);
}

#[test]
fn lexer_classifies_tokens() {
    let tokens = Lexer::tokenize("[* comment *] while (x1 => 10) endwhile 2.5 $$ @");
    let kinds: Vec<_> = tokens.iter().map(|t| (t.kind, t.lexeme.as_str())).collect();

    assert_eq!(
        kinds,
        vec![
            (TokenKind::Keyword, "while"),
            (TokenKind::Separator, "("),
            (TokenKind::Identifier, "x1"),
            (TokenKind::Operator, "=>"),
            (TokenKind::Integer, "10"),
            (TokenKind::Separator, ")"),
            (TokenKind::Keyword, "endwhile"),
            (TokenKind::Real, "2.5"),
            (TokenKind::Separator, "$$"),
            (TokenKind::Unknown, "@"),
        ]
    );
}
