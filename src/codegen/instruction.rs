use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    PushInteger,
    PushBoolean,
    PushMemory,
    PopMemory,
    Add,
    Sub,
    Mul,
    Div,
    Greater,
    Less,
    Equal,
    NotEqual,
    GreaterEqual,
    LessEqual,
    JumpIfZero,
    Jump,
    Label,
    Input,
    Output,
}

impl Opcode {
    /// Mnemonic used in the instruction table.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::PushInteger => "PUSHI",
            Opcode::PushBoolean => "PUSHB",
            Opcode::PushMemory => "PUSHM",
            Opcode::PopMemory => "POPM",
            Opcode::Add => "A",
            Opcode::Sub => "S",
            Opcode::Mul => "M",
            Opcode::Div => "D",
            Opcode::Greater => "GRT",
            Opcode::Less => "LES",
            Opcode::Equal => "EQU",
            Opcode::NotEqual => "NEQ",
            Opcode::GreaterEqual => "GEQ",
            Opcode::LessEqual => "LEQ",
            Opcode::JumpIfZero => "JMP0",
            Opcode::Jump => "JMP",
            Opcode::Label => "LABEL",
            Opcode::Input => "SIN",
            Opcode::Output => "SOUT",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_lexeme(s: &str) -> Option<Self> {
        match s {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            ArithOp::Add => Opcode::Add,
            ArithOp::Sub => Opcode::Sub,
            ArithOp::Mul => Opcode::Mul,
            ArithOp::Div => Opcode::Div,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelOp {
    Greater,
    Less,
    Equal,
    NotEqual,
    GreaterEqual,
    LessEqual,
}

impl RelOp {
    /// `=>` is the grammar's spelling of greater-or-equal; `>=` is accepted too.
    pub fn from_lexeme(s: &str) -> Option<Self> {
        match s {
            ">" => Some(RelOp::Greater),
            "<" => Some(RelOp::Less),
            "==" => Some(RelOp::Equal),
            "!=" => Some(RelOp::NotEqual),
            "=>" | ">=" => Some(RelOp::GreaterEqual),
            "<=" => Some(RelOp::LessEqual),
            _ => None,
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            RelOp::Greater => Opcode::Greater,
            RelOp::Less => Opcode::Less,
            RelOp::Equal => Opcode::Equal,
            RelOp::NotEqual => Opcode::NotEqual,
            RelOp::GreaterEqual => Opcode::GreaterEqual,
            RelOp::LessEqual => Opcode::LessEqual,
        }
    }

    pub fn test<T: PartialOrd>(&self, left: T, right: T) -> bool {
        match self {
            RelOp::Greater => left > right,
            RelOp::Less => left < right,
            RelOp::Equal => left == right,
            RelOp::NotEqual => left != right,
            RelOp::GreaterEqual => left >= right,
            RelOp::LessEqual => left <= right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Literal(i64),
    Address(usize),
    Target(usize),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(n) => write!(f, "{}", n),
            Operand::Address(a) | Operand::Target(a) => write!(f, "{}", a),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// 1-based position in the instruction table.
    pub address: usize,
    pub opcode: Opcode,
    pub operand: Option<Operand>,
}

impl Instruction {
    pub fn is_conditional_jump(&self) -> bool {
        self.opcode == Opcode::JumpIfZero
    }

    pub fn target(&self) -> Option<usize> {
        match self.operand {
            Some(Operand::Target(t)) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8}{:<12}", self.address, self.opcode)?;
        match &self.operand {
            Some(operand) => write!(f, "{}", operand),
            None => write!(f, "nil"),
        }
    }
}

/// Instruction table report: header plus one row per instruction.
pub struct InstructionTable<'a>(pub &'a [Instruction]);

impl fmt::Display for InstructionTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8}{:<12}{}", "ADDR", "OPERATOR", "OPERAND")?;
        writeln!(f, "{}", "-".repeat(28))?;
        for instruction in self.0 {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}
