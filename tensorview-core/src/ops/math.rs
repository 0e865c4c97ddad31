use crate::{
    funcs::{float_binary_func, float_binary_func_out, float_func, float_func_out},
    tensor::Values,
    DType, Result, Tensor,
};

macro_rules! unary_ops {
    ($($name:ident, $out:ident => $f:expr;)*) => {
        $(
            #[doc = concat!("Elementwise `", stringify!($name), "` through the float path.")]
            pub fn $name(a: &dyn Tensor) -> Values<f64> {
                float_func($f, a)
            }

            pub fn $out<T: DType>(a: &dyn Tensor, out: &mut Values<T>) {
                float_func_out($f, a, out)
            }
        )*
    };
}

unary_ops! {
    abs, abs_out => f64::abs;
    sqrt, sqrt_out => f64::sqrt;
    exp, exp_out => f64::exp;
    ln, ln_out => f64::ln;
    log2, log2_out => f64::log2;
    log10, log10_out => f64::log10;
    sin, sin_out => f64::sin;
    cos, cos_out => f64::cos;
    tan, tan_out => f64::tan;
    tanh, tanh_out => f64::tanh;
    floor, floor_out => f64::floor;
    ceil, ceil_out => f64::ceil;
    round, round_out => f64::round;
    trunc, trunc_out => f64::trunc;
    neg, neg_out => |x: f64| -x;
}

macro_rules! binary_ops {
    ($($name:ident, $out:ident => $f:expr;)*) => {
        $(
            #[doc = concat!("Elementwise `", stringify!($name), "` of two broadcast operands.")]
            pub fn $name(a: &dyn Tensor, b: &dyn Tensor) -> Result<Values<f64>> {
                float_binary_func($f, a, b)
            }

            pub fn $out<T: DType>(a: &dyn Tensor, b: &dyn Tensor, out: &mut Values<T>) -> Result<()> {
                float_binary_func_out($f, a, b, out)
            }
        )*
    };
}

binary_ops! {
    pow, pow_out => f64::powf;
    atan2, atan2_out => f64::atan2;
    hypot, hypot_out => f64::hypot;
    max, max_out => f64::max;
    min, min_out => f64::min;
}
