//! Operator symbols and their numeric semantics

use std::fmt;

/// Binary operators understood by the converter and the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
    /// Exponentiation (^)
    Power,
    /// Logical and (and)
    And,
    /// Logical or (or)
    Or,
    /// Logical negation (not), applied to the right operand only
    Not,
    /// Less than (<)
    Less,
    /// Less than or equal (<=)
    LessEqual,
    /// Greater than (>)
    Greater,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Equal (=)
    Equal,
    /// Not equal (=!)
    NotEqual,
}

impl Operator {
    /// Every operator, in descending default precedence
    pub const ALL: [Operator; 14] = [
        Operator::Power,
        Operator::Multiply,
        Operator::Divide,
        Operator::Add,
        Operator::Subtract,
        Operator::And,
        Operator::Or,
        Operator::Not,
        Operator::Less,
        Operator::LessEqual,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Equal,
        Operator::NotEqual,
    ];

    /// Number of operators
    pub const COUNT: usize = Self::ALL.len();

    /// Position of the variant in declaration order, below `COUNT`
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up an operator by its lowercase symbol
    #[inline]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => Operator::Add,
            "-" => Operator::Subtract,
            "*" => Operator::Multiply,
            "/" => Operator::Divide,
            "^" => Operator::Power,
            "and" => Operator::And,
            "or" => Operator::Or,
            "not" => Operator::Not,
            "<" => Operator::Less,
            "<=" => Operator::LessEqual,
            ">" => Operator::Greater,
            ">=" => Operator::GreaterEqual,
            "=" => Operator::Equal,
            "=!" => Operator::NotEqual,
            _ => return None,
        };
        Some(op)
    }

    /// Lowercase spelling, as written to postfix output
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "^",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Equal => "=",
            Operator::NotEqual => "=!",
        }
    }

    /// Built-in precedence rank; higher binds tighter
    pub fn default_precedence(self) -> u8 {
        match self {
            Operator::Power => 4,
            Operator::Multiply | Operator::Divide => 3,
            Operator::Add | Operator::Subtract => 2,
            _ => 1,
        }
    }

    /// Apply the operator to two operands.
    ///
    /// Booleans are the numbers `1.0` and `0.0`; any non-zero operand counts as
    /// true. Division follows IEEE-754, so dividing by zero yields infinity or
    /// NaN rather than an error.
    #[inline]
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::Power => left.powf(right),
            Operator::And => truth(left != 0.0 && right != 0.0),
            Operator::Or => truth(left != 0.0 || right != 0.0),
            Operator::Not => truth(right == 0.0),
            Operator::Less => truth(left < right),
            Operator::LessEqual => truth(left <= right),
            Operator::Greater => truth(left > right),
            Operator::GreaterEqual => truth(left >= right),
            Operator::Equal => truth(left == right),
            Operator::NotEqual => truth(left != right),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[inline]
fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
