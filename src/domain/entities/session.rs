//! # Session Entity
//!
//! 1回の計算セッションの結果

use super::operator::Operator;
use crate::domain::errors::CalcError;

/// オペランドをパースする
///
/// 前後の空白（改行を含む）は無視する
///
/// # Errors
///
/// 64ビット浮動小数点数として解釈できない場合に [`CalcError::InvalidNumber`] を返す
pub fn parse_operand(raw: &str) -> Result<f64, CalcError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CalcError::InvalidNumber {
            input: raw.to_string(),
        })
}

/// 計算が完了したセッション
///
/// `compute` を通してのみ作成されるため、`result` は常に
/// 検証済みのオペランドと演算子から計算された値になる
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    operand1: f64,
    operator: Operator,
    operand2: f64,
    result: f64,
}

impl Session {
    /// 計算を実行してセッションを作成
    ///
    /// # Errors
    ///
    /// 除算で第2オペランドが `0.0` の場合に [`CalcError::DivisionByZero`] を返す
    pub fn compute(operand1: f64, operator: Operator, operand2: f64) -> Result<Self, CalcError> {
        let result = operator.apply(operand1, operand2)?;
        Ok(Self {
            operand1,
            operator,
            operand2,
            result,
        })
    }

    pub fn operand1(&self) -> f64 {
        self.operand1
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand2(&self) -> f64 {
        self.operand2
    }

    pub fn result(&self) -> f64 {
        self.result
    }
}
