//! Coordinate formulas of the segment table.
//!
//! The grammar (`formula.lalrpop`, generated at build time) is the
//! arithmetic subset the legacy listing uses: numbers, symbol names,
//! `+ - * /`, unary minus and parentheses.

use std::fmt;
use std::str::FromStr;

use lalrpop_util::ParseError;
use serde::{Deserialize, Serialize};

use crate::derive::{DerivedQuantities, Symbol};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// A coordinate: a literal or a formula over [`DerivedQuantities`].
///
/// Serialized as its formula text, so a JSON table stays readable and diffable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Expr {
    Const(f64),
    Var(Symbol),
    Neg(Box<Expr>),
    Bin(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn eval(&self, q: &DerivedQuantities) -> f64 {
        match self {
            Expr::Const(v) => *v,
            Expr::Var(sym) => q.get(*sym),
            Expr::Neg(e) => -e.eval(q),
            Expr::Bin(op, a, b) => {
                let (a, b) = (a.eval(q), b.eval(q));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                }
            }
        }
    }

    /// Parse formula text with the grammar in `formula.lalrpop`.
    pub fn parse(src: &str) -> Result<Expr, String> {
        formula::FormulaParser::new()
            .parse(src)
            .map_err(|e| match e {
                ParseError::User { error } => error,
                other => format!("{other} in `{src}`"),
            })
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, parent: u8, right: bool) -> fmt::Result {
        match self {
            Expr::Const(v) => write!(f, "{v}"),
            Expr::Var(sym) => write!(f, "{sym}"),
            Expr::Neg(e) => {
                f.write_str("-")?;
                e.write(f, 3, false)
            }
            Expr::Bin(op, a, b) => {
                let prec = op.precedence();
                // a - (b + c) and a / (b * c) need the parentheses kept
                let wrap = prec < parent || (right && prec == parent);
                if wrap {
                    f.write_str("(")?;
                }
                a.write(f, prec, false)?;
                write!(f, " {} ", op.symbol())?;
                b.write(f, prec, matches!(op, BinOp::Sub | BinOp::Div))?;
                if wrap {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0, false)
    }
}

impl FromStr for Expr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expr::parse(s)
    }
}

impl TryFrom<String> for Expr {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Expr::parse(&s)
    }
}

impl From<Expr> for String {
    fn from(e: Expr) -> String {
        e.to_string()
    }
}

mod formula {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/formula.rs"));
}
