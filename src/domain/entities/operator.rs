//! # Operator Value Object
//!
//! 四則演算の演算子

use std::fmt;
use std::str::FromStr;

use crate::domain::errors::CalcError;

/// 四則演算の演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// サポートする全演算子
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// 演算子の記号を返す
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    /// 2つのオペランドに演算子を適用する
    ///
    /// 除算の場合、ゼロ除算チェックは除算の前に行う。
    /// `-0.0` も `0.0` と等しいためゼロとして扱われる。
    ///
    /// # Errors
    ///
    /// 除数が `0.0` の場合に [`CalcError::DivisionByZero`] を返す
    pub fn apply(&self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        match self {
            Operator::Add => Ok(lhs + rhs),
            Operator::Subtract => Ok(lhs - rhs),
            Operator::Multiply => Ok(lhs * rhs),
            Operator::Divide => {
                if rhs == 0.0 {
                    return Err(CalcError::DivisionByZero { dividend: lhs });
                }
                Ok(lhs / rhs)
            }
        }
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    /// 1文字の記号そのものだけを受け付ける（空白は除去しない）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| CalcError::InvalidOperator {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
