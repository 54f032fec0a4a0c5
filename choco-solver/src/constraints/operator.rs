use std::ffi::CStr;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::error::ChocoError;
use crate::variables::BoolVar;
use crate::variables::IntVar;

/// The operators accepted by the arithmetic constraint factories.
///
/// They parse from the usual textual notation:
/// ```
/// # use choco_solver::constraints::Operator;
/// assert_eq!("<=".parse::<Operator>().unwrap(), Operator::Le);
/// assert!("=<".parse::<Operator>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Plus,
    Minus,
    Times,
    Div,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Times => "*",
            Operator::Div => "/",
        }
    }

    /// The operator as a NUL-terminated string, as the native factories expect it.
    pub fn as_c_str(self) -> &'static CStr {
        match self {
            Operator::Eq => c"=",
            Operator::Ne => c"!=",
            Operator::Lt => c"<",
            Operator::Gt => c">",
            Operator::Le => c"<=",
            Operator::Ge => c">=",
            Operator::Plus => c"+",
            Operator::Minus => c"-",
            Operator::Times => c"*",
            Operator::Div => c"/",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Lt | Operator::Gt | Operator::Le | Operator::Ge
        )
    }

    pub fn is_arithmetic(self) -> bool {
        !self.is_comparison()
    }

    /// Evaluates `lhs self rhs` for a comparison; arithmetic operators never hold.
    pub fn compare(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Operator::Eq => lhs == rhs,
            Operator::Ne => lhs != rhs,
            Operator::Lt => lhs < rhs,
            Operator::Gt => lhs > rhs,
            Operator::Le => lhs <= rhs,
            Operator::Ge => lhs >= rhs,
            Operator::Plus | Operator::Minus | Operator::Times | Operator::Div => false,
        }
    }

    /// Evaluates `lhs self rhs` for an arithmetic operator. Division rounds towards zero and is
    /// undefined for a zero divisor, as is any comparison.
    pub fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Operator::Plus => lhs.checked_add(rhs),
            Operator::Minus => lhs.checked_sub(rhs),
            Operator::Times => lhs.checked_mul(rhs),
            Operator::Div => lhs.checked_div(rhs),
            _ => None,
        }
    }

    pub(crate) fn expect_comparison(self, context: &str) -> Result<Operator, ChocoError> {
        if self.is_comparison() {
            Ok(self)
        } else {
            Err(ChocoError::InvalidOperatorCombination(format!(
                "{context} requires a comparison, got '{self}'"
            )))
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ChocoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Le),
            ">=" => Ok(Operator::Ge),
            "+" => Ok(Operator::Plus),
            "-" => Ok(Operator::Minus),
            "*" => Ok(Operator::Times),
            "/" => Ok(Operator::Div),
            other => Err(ChocoError::InvalidOperator(other.to_owned())),
        }
    }
}

/// The right-hand side of an arithmetic constraint: a constant or a variable.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    Const(i32),
    Var(&'a IntVar),
}

impl From<i32> for Operand<'_> {
    fn from(value: i32) -> Self {
        Operand::Const(value)
    }
}

impl<'a> From<&'a IntVar> for Operand<'a> {
    fn from(value: &'a IntVar) -> Self {
        Operand::Var(value)
    }
}

impl<'a> From<&'a BoolVar> for Operand<'a> {
    fn from(value: &'a BoolVar) -> Self {
        Operand::Var(value.as_int_var())
    }
}

#[cfg(test)]
mod tests {
    use super::Operator;
    use crate::error::ChocoError;

    #[test]
    fn parses_every_operator_back_from_its_text() {
        for op in [
            Operator::Eq,
            Operator::Ne,
            Operator::Lt,
            Operator::Gt,
            Operator::Le,
            Operator::Ge,
            Operator::Plus,
            Operator::Minus,
            Operator::Times,
            Operator::Div,
        ] {
            assert_eq!(op.as_str().parse::<Operator>().ok(), Some(op));
            assert_eq!(op.as_c_str().to_str().ok(), Some(op.as_str()));
        }
    }

    #[test]
    fn unknown_operator_is_rejected() {
        assert!(matches!(
            "==".parse::<Operator>(),
            Err(ChocoError::InvalidOperator(op)) if op == "=="
        ));
    }

    #[test]
    fn division_by_zero_is_undefined() {
        assert_eq!(Operator::Div.apply(7, 2), Some(3));
        assert_eq!(Operator::Div.apply(-7, 2), Some(-3));
        assert_eq!(Operator::Div.apply(7, 0), None);
        assert_eq!(Operator::Le.apply(1, 2), None);
        assert!(Operator::Le.compare(1, 2));
        assert!(!Operator::Plus.compare(1, 2));
    }
}
