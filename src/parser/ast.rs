// AST (Abstract Syntax Tree) definitions for the C front end

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binary operators, lowest precedence group first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Logical
    Or,
    And,
    // Bitwise
    BitOr,
    BitXor,
    BitAnd,
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    // Shift
    Shl,
    Shr,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "||" => BinOp::Or,
            "&&" => BinOp::And,
            "|" => BinOp::BitOr,
            "^" => BinOp::BitXor,
            "&" => BinOp::BitAnd,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            "<" => BinOp::Lt,
            ">" => BinOp::Gt,
            "<=" => BinOp::Le,
            ">=" => BinOp::Ge,
            "<<" => BinOp::Shl,
            ">>" => BinOp::Shr,
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Mod,
            _ => return None,
        };
        Some(op)
    }

    /// The operator as written in source
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

/// Unary operators. Whether an increment or decrement is prefix or postfix
/// is recorded on the [`Expr::Unary`] node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,      // +x
    Neg,       // -x
    Not,       // !x
    BitNot,    // ~x
    Increment, // ++
    Decrement, // --
    AddrOf,    // &x
    Deref,     // *x
}

impl UnOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => UnOp::Plus,
            "-" => UnOp::Neg,
            "!" => UnOp::Not,
            "~" => UnOp::BitNot,
            "++" => UnOp::Increment,
            "--" => UnOp::Decrement,
            "&" => UnOp::AddrOf,
            "*" => UnOp::Deref,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Plus => "+",
            UnOp::Neg => "-",
            UnOp::Not => "!",
            UnOp::BitNot => "~",
            UnOp::Increment => "++",
            UnOp::Decrement => "--",
            UnOp::AddrOf => "&",
            UnOp::Deref => "*",
        }
    }
}

/// Plain and compound assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,    // =
    AddAssign, // +=
    SubAssign, // -=
    MulAssign, // *=
    DivAssign, // /=
    ModAssign, // %=
    AndAssign, // &=
    OrAssign,  // |=
    XorAssign, // ^=
    ShlAssign, // <<=
    ShrAssign, // >>=
}

impl AssignOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "=" => AssignOp::Assign,
            "+=" => AssignOp::AddAssign,
            "-=" => AssignOp::SubAssign,
            "*=" => AssignOp::MulAssign,
            "/=" => AssignOp::DivAssign,
            "%=" => AssignOp::ModAssign,
            "&=" => AssignOp::AndAssign,
            "|=" => AssignOp::OrAssign,
            "^=" => AssignOp::XorAssign,
            "<<=" => AssignOp::ShlAssign,
            ">>=" => AssignOp::ShrAssign,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::AndAssign => "&=",
            AssignOp::OrAssign => "|=",
            AssignOp::XorAssign => "^=",
            AssignOp::ShlAssign => "<<=",
            AssignOp::ShrAssign => ">>=",
        }
    }

    /// The binary operator a compound assignment applies, `None` for `=`
    pub fn binary_op(&self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::AddAssign => Some(BinOp::Add),
            AssignOp::SubAssign => Some(BinOp::Sub),
            AssignOp::MulAssign => Some(BinOp::Mul),
            AssignOp::DivAssign => Some(BinOp::Div),
            AssignOp::ModAssign => Some(BinOp::Mod),
            AssignOp::AndAssign => Some(BinOp::BitAnd),
            AssignOp::OrAssign => Some(BinOp::BitOr),
            AssignOp::XorAssign => Some(BinOp::BitXor),
            AssignOp::ShlAssign => Some(BinOp::Shl),
            AssignOp::ShrAssign => Some(BinOp::Shr),
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Raw numeric text, not yet resolved to a type
    Number(String, SourceLocation),
    StringLiteral(String, SourceLocation),
    CharLiteral(char, SourceLocation),
    Identifier(String, SourceLocation),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        prefix: bool,
        location: SourceLocation,
    },
    Assign {
        op: AssignOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },
    Member {
        target: Box<Expr>,
        member: String,
        /// `->` rather than `.`
        arrow: bool,
        location: SourceLocation,
    },
    Ternary {
        condition: Box<Expr>,
        true_expr: Box<Expr>,
        false_expr: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Number(_, loc)
            | Expr::StringLiteral(_, loc)
            | Expr::CharLiteral(_, loc)
            | Expr::Identifier(_, loc) => *loc,
            Expr::Binary { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Assign { location, .. }
            | Expr::Call { location, .. }
            | Expr::Index { location, .. }
            | Expr::Member { location, .. }
            | Expr::Ternary { location, .. } => *location,
        }
    }
}

/// A brace-delimited statement sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    /// `expr;`, or the empty statement `;` when `expr` is `None`
    Expression {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    /// One or more declarators sharing a leading type
    VarDecl {
        decls: Vec<VarDecl>,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
        location: SourceLocation,
    },
    For {
        init: Box<Stmt>,
        condition: Option<Expr>,
        increment: Option<Expr>,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Block(block) => block.location,
            Stmt::Expression { location, .. }
            | Stmt::VarDecl { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::DoWhile { location, .. }
            | Stmt::For { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location } => *location,
        }
    }
}

/// Variable declarator: `type name[[size]] [= init]`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub type_name: String,
    pub name: String,
    pub array_size: Option<usize>,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

impl VarDecl {
    pub fn is_array(&self) -> bool {
        self.array_size.is_some()
    }
}

/// Function parameter; prototypes may leave it unnamed
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub type_name: String,
    pub name: Option<String>,
    pub location: SourceLocation,
}

/// Function definition or prototype
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub return_type: String,
    pub name: String,
    pub params: Vec<Param>,
    /// `None` for a prototype
    pub body: Option<Block>,
    pub location: SourceLocation,
}

impl FunctionDecl {
    pub fn is_prototype(&self) -> bool {
        self.body.is_none()
    }
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Function(FunctionDecl),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Var(var) => &var.name,
            Decl::Function(func) => &func.name,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Decl::Var(var) => var.location,
            Decl::Function(func) => func.location,
        }
    }
}

/// Top-level program structure, partitioned around `main`.
///
/// A program without `main` is still returned so callers can inspect what did
/// parse; the missing anchor is reported through the parser's error list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub pre_main: Vec<Decl>,
    pub main: Option<FunctionDecl>,
    pub post_main: Vec<Decl>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Number of top-level declarations, `main` included
    pub fn declaration_count(&self) -> usize {
        self.pre_main.len() + usize::from(self.main.is_some()) + self.post_main.len()
    }

    /// Functions in source order, `main` included
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> + '_ {
        fn as_function(decl: &Decl) -> Option<&FunctionDecl> {
            match decl {
                Decl::Function(func) => Some(func),
                Decl::Var(_) => None,
            }
        }

        self.pre_main
            .iter()
            .filter_map(as_function)
            .chain(self.main.iter())
            .chain(self.post_main.iter().filter_map(as_function))
    }

    /// Find a top-level function by name
    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions().find(|func| func.name == name)
    }
}
