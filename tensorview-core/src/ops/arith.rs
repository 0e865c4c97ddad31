use super::{is_integral, operand_path, Path};
use crate::{
    funcs::{
        float_assign_func, float_binary_func, float_binary_func_out, int_assign_func,
        int_binary_func, int_binary_func_out, string_assign_func, string_binary_func,
        string_binary_func_out,
    },
    tensor::{AnyValues, Values},
    DType, Result, Tensor,
};

struct ArithOp {
    float: fn(f64, f64) -> f64,
    int: fn(i64, i64) -> i64,
    string: Option<fn(&str, &str) -> String>,
}

const ADD: ArithOp = ArithOp {
    float: |x, y| x + y,
    int: i64::wrapping_add,
    string: Some(|x, y| format!("{x}{y}")),
};

const SUB: ArithOp = ArithOp {
    float: |x, y| x - y,
    int: i64::wrapping_sub,
    string: None,
};

const MUL: ArithOp = ArithOp {
    float: |x, y| x * y,
    int: i64::wrapping_mul,
    string: None,
};

// Integer division and remainder by zero give 0.
const DIV: ArithOp = ArithOp {
    float: |x, y| x / y,
    int: |x, y| x.checked_div(y).unwrap_or(0),
    string: None,
};

const REM: ArithOp = ArithOp {
    float: |x, y| x % y,
    int: |x, y| x.checked_rem(y).unwrap_or(0),
    string: None,
};

impl ArithOp {
    /// Strings (when supported) produce strings, two integral operands
    /// produce `i64`, anything else `f64`.
    fn apply(&self, a: &dyn Tensor, b: &dyn Tensor) -> Result<AnyValues> {
        Ok(match (operand_path(a, b), self.string) {
            (Path::String, Some(s)) => string_binary_func(s, a, b)?.into(),
            (Path::Int, _) => int_binary_func(self.int, a, b)?.into(),
            _ => float_binary_func(self.float, a, b)?.into(),
        })
    }

    fn apply_out<T: DType>(&self, a: &dyn Tensor, b: &dyn Tensor, out: &mut Values<T>) -> Result<()> {
        match (operand_path(a, b), self.string) {
            (Path::String, Some(s)) => string_binary_func_out(s, a, b, out),
            (Path::Int, _) if is_integral(T::KIND) => int_binary_func_out(self.int, a, b, out),
            _ => float_binary_func_out(self.float, a, b, out),
        }
    }

    fn apply_assign<T: DType>(&self, a: &mut Values<T>, b: &dyn Tensor) -> Result<()> {
        let bk = b.kind();
        match self.string {
            Some(s) if T::KIND.is_string() && bk.is_string() => string_assign_func(s, a, b),
            _ if is_integral(T::KIND) && is_integral(bk) => int_assign_func(self.int, a, b),
            _ => float_assign_func(self.float, a, b),
        }
    }
}

macro_rules! arith_ops {
    ($($(#[$doc:meta])* $op:ident => $name:ident, $out:ident, $assign:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(a: &dyn Tensor, b: &dyn Tensor) -> Result<AnyValues> {
                $op.apply(a, b)
            }

            #[doc = concat!("[`", stringify!($name), "`] into `out`, converted to its element type.")]
            pub fn $out<T: DType>(a: &dyn Tensor, b: &dyn Tensor, out: &mut Values<T>) -> Result<()> {
                $op.apply_out(a, b, out)
            }

            #[doc = concat!("[`", stringify!($name), "`] in place. Only `b` may broadcast.")]
            pub fn $assign<T: DType>(a: &mut Values<T>, b: &dyn Tensor) -> Result<()> {
                $op.apply_assign(a, b)
            }
        )*
    };
}

arith_ops! {
    /// `a + b`. Two string operands are concatenated.
    ADD => add, add_out, add_assign;
    /// `a - b`.
    SUB => sub, sub_out, sub_assign;
    /// `a * b`.
    MUL => mul, mul_out, mul_assign;
    /// `a / b`.
    DIV => div, div_out, div_assign;
    /// `a % b`.
    REM => rem, rem_out, rem_assign;
}
