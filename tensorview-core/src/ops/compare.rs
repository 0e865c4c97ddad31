use super::{operand_path, Path};
use crate::{
    funcs::{bool_floats_func_out, bool_strings_func_out},
    tensor::Values,
    Result, Tensor,
};

struct CompareOp {
    float: fn(f64, f64) -> bool,
    string: fn(&str, &str) -> bool,
}

impl CompareOp {
    fn apply_out(&self, a: &dyn Tensor, b: &dyn Tensor, out: &mut Values<bool>) -> Result<()> {
        match operand_path(a, b) {
            Path::String => bool_strings_func_out(self.string, a, b, out),
            Path::Int | Path::Float => bool_floats_func_out(self.float, a, b, out),
        }
    }

    fn apply(&self, a: &dyn Tensor, b: &dyn Tensor) -> Result<Values<bool>> {
        let mut out = Values::new(&[]);
        self.apply_out(a, b, &mut out)?;
        Ok(out)
    }
}

macro_rules! compare_ops {
    ($($(#[$doc:meta])* $name:ident, $out:ident => $float:expr, $string:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(a: &dyn Tensor, b: &dyn Tensor) -> Result<Values<bool>> {
                CompareOp { float: $float, string: $string }.apply(a, b)
            }

            pub fn $out(a: &dyn Tensor, b: &dyn Tensor, out: &mut Values<bool>) -> Result<()> {
                CompareOp { float: $float, string: $string }.apply_out(a, b, out)
            }
        )*
    };
}

compare_ops! {
    /// Elementwise `a == b`. Two string operands compare as strings, anything
    /// else as floats.
    equal, equal_out => |x, y| x == y, |x, y| x == y;
    not_equal, not_equal_out => |x, y| x != y, |x, y| x != y;
    less, less_out => |x, y| x < y, |x, y| x < y;
    less_equal, less_equal_out => |x, y| x <= y, |x, y| x <= y;
    greater, greater_out => |x, y| x > y, |x, y| x > y;
    greater_equal, greater_equal_out => |x, y| x >= y, |x, y| x >= y;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_numbers_across_kinds() {
        let a = Values::from_slice(&[1i64, 2, 3]);
        let b = Values::from_slice(&[2.0]);
        assert_eq!(less(&a, &b).unwrap().data(), &[true, false, false]);
        assert_eq!(greater_equal(&a, &b).unwrap().data(), &[false, true, true]);
        assert_eq!(not_equal(&a, &b).unwrap().data(), &[true, false, true]);
    }

    #[test]
    fn compares_strings_lexically() {
        let a = Values::from_slice(&["10".to_string(), "9".to_string()]);
        let b = Values::from_slice(&["2".to_string()]);
        // "10" < "2" as strings, although 10 > 2 as numbers
        assert_eq!(less(&a, &b).unwrap().data(), &[true, false]);
    }

    #[test]
    fn shape_errors_propagate() {
        let a = Values::<f64>::new(&[3]);
        let b = Values::<f64>::new(&[2]);
        let mut out = Values::from_slice(&[true]);
        assert!(equal_out(&a, &b, &mut out).is_err());
        assert_eq!(out.data(), &[true]);
    }
}
