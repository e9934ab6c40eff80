//! Integer operator evaluation.
//!
//! All arithmetic is checked: a constant that would wrap is an error, not a
//! silently different number in the output.

use grf_ir::{BinaryOp, UnaryOp};

use crate::EvalErrorKind;

/// Evaluate a binary operator on two resolved integers.
pub fn evaluate_binary(op: BinaryOp, left: i64, right: i64) -> Result<i64, EvalErrorKind> {
    let overflow = || EvalErrorKind::overflow(op);
    match op {
        BinaryOp::Add => left.checked_add(right).ok_or_else(overflow),
        BinaryOp::Sub => left.checked_sub(right).ok_or_else(overflow),
        BinaryOp::Mul => left.checked_mul(right).ok_or_else(overflow),
        BinaryOp::Div => {
            if right == 0 {
                return Err(EvalErrorKind::DivisionByZero);
            }
            left.checked_div(right).ok_or_else(overflow)
        }
        BinaryOp::Mod => {
            if right == 0 {
                return Err(EvalErrorKind::ModuloByZero);
            }
            left.checked_rem(right).ok_or_else(overflow)
        }
        BinaryOp::Eq => Ok(i64::from(left == right)),
        BinaryOp::NotEq => Ok(i64::from(left != right)),
        BinaryOp::Lt => Ok(i64::from(left < right)),
        BinaryOp::LtEq => Ok(i64::from(left <= right)),
        BinaryOp::Gt => Ok(i64::from(left > right)),
        BinaryOp::GtEq => Ok(i64::from(left >= right)),
        BinaryOp::And => Ok(i64::from(left != 0 && right != 0)),
        BinaryOp::Or => Ok(i64::from(left != 0 || right != 0)),
        BinaryOp::BitAnd => Ok(left & right),
        BinaryOp::BitOr => Ok(left | right),
        BinaryOp::BitXor => Ok(left ^ right),
        BinaryOp::Shl => left.checked_shl(shift_amount(right)?).ok_or_else(overflow),
        BinaryOp::Shr => left.checked_shr(shift_amount(right)?).ok_or_else(overflow),
    }
}

/// Evaluate a unary operator on a resolved integer.
pub fn evaluate_unary(op: UnaryOp, operand: i64) -> Result<i64, EvalErrorKind> {
    match op {
        UnaryOp::Neg => operand
            .checked_neg()
            .ok_or_else(|| EvalErrorKind::unary_overflow(op)),
        UnaryOp::Not => Ok(i64::from(operand == 0)),
        UnaryOp::BitNot => Ok(!operand),
    }
}

fn shift_amount(amount: i64) -> Result<u32, EvalErrorKind> {
    u32::try_from(amount)
        .ok()
        .filter(|bits| *bits < 64)
        .ok_or(EvalErrorKind::InvalidShift { amount })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_checked() {
        assert_eq!(evaluate_binary(BinaryOp::Mul, 20, 2), Ok(40));
        assert_eq!(
            evaluate_binary(BinaryOp::Add, i64::MAX, 1),
            Err(EvalErrorKind::IntegerOverflow { operation: "+" })
        );
        assert_eq!(
            evaluate_binary(BinaryOp::Div, 1, 0),
            Err(EvalErrorKind::DivisionByZero)
        );
        assert_eq!(
            evaluate_binary(BinaryOp::Mod, 1, 0),
            Err(EvalErrorKind::ModuloByZero)
        );
        assert_eq!(
            evaluate_unary(UnaryOp::Neg, i64::MIN),
            Err(EvalErrorKind::IntegerOverflow { operation: "-" })
        );
    }

    #[test]
    fn comparisons_and_logic_yield_zero_or_one() {
        assert_eq!(evaluate_binary(BinaryOp::Lt, 1, 2), Ok(1));
        assert_eq!(evaluate_binary(BinaryOp::GtEq, 1, 2), Ok(0));
        assert_eq!(evaluate_binary(BinaryOp::And, 5, 0), Ok(0));
        assert_eq!(evaluate_binary(BinaryOp::Or, 5, 0), Ok(1));
        assert_eq!(evaluate_unary(UnaryOp::Not, 0), Ok(1));
        assert_eq!(evaluate_unary(UnaryOp::BitNot, 0), Ok(-1));
    }

    #[test]
    fn shifts_reject_out_of_range_amounts() {
        assert_eq!(evaluate_binary(BinaryOp::Shl, 1, 8), Ok(256));
        assert_eq!(evaluate_binary(BinaryOp::Shr, 256, 4), Ok(16));
        assert_eq!(
            evaluate_binary(BinaryOp::Shl, 1, 64),
            Err(EvalErrorKind::InvalidShift { amount: 64 })
        );
        assert_eq!(
            evaluate_binary(BinaryOp::Shr, 1, -1),
            Err(EvalErrorKind::InvalidShift { amount: -1 })
        );
    }
}
