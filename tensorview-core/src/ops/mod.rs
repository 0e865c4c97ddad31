//! Operators built on the elementwise dispatch functions.
//!
//! Binary operators broadcast like the functions in [`crate::funcs`] and
//! return an error when the operand shapes cannot be aligned.

mod arith;
mod compare;
mod math;

pub use arith::*;
pub use compare::*;
pub use math::*;

use crate::{Kind, Tensor};

/// Which access path an operator reads its operands through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Path {
    Float,
    Int,
    String,
}

fn is_integral(kind: Kind) -> bool {
    !kind.is_float() && !kind.is_string()
}

fn operand_path(a: &dyn Tensor, b: &dyn Tensor) -> Path {
    let (ak, bk) = (a.kind(), b.kind());
    if ak.is_string() && bk.is_string() {
        Path::String
    } else if is_integral(ak) && is_integral(bk) {
        Path::Int
    } else {
        Path::Float
    }
}
