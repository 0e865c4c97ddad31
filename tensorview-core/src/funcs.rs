//! Elementwise dispatch over broadcast-aligned tensors.
//!
//! Every binary function aligns its operands first (see [`AlignedShapes`]),
//! resizes the output to the aligned output shape and then fills it through
//! [`Vectorize`], reading each operand at its wrapped flat index. Alignment
//! errors are returned before anything is written.
//!
//! Operands are any [`Tensor`], dense or sliced. Outputs are concrete
//! [`Values`] so the output buffer can be split across workers; elements are
//! converted into the output type through the [`DType`] conversions.
//!
//! The plain functions run on [`Vectorize::global`]; the `_with` forms take
//! an explicit harness.

use crate::{
    align::AlignedShapes, tensor::Values, DType, Result, Tensor, TensorMut, Vectorize,
};

fn fill_binary<T, F>(vz: &Vectorize, al: &AlignedShapes, out: &mut Values<T>, f: F)
where
    T: DType,
    F: Fn(usize, usize) -> T + Sync + Send,
{
    out.set_shape(al.output.sizes());
    let nd = al.output.num_dims();
    vz.run_init(
        out.data_mut(),
        || vec![0; nd],
        |coords, i, x| {
            let (ai, bi) = al.operand_indexes(i, coords);
            *x = f(ai, bi);
        },
    );
}

fn assign_binary<T, F>(vz: &Vectorize, al: &AlignedShapes, a: &mut Values<T>, f: F)
where
    T: DType,
    F: Fn(&T, usize) -> T + Sync + Send,
{
    let nd = al.output.num_dims();
    vz.run_init(
        a.data_mut(),
        || vec![0; nd],
        |coords, i, x| {
            let (_, bi) = al.operand_indexes(i, coords);
            *x = f(x, bi);
        },
    );
}

/// `out = f(a, b)` through the float path.
pub fn float_binary_func_out<T, F>(
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<T>,
) -> Result<()>
where
    T: DType,
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    float_binary_func_out_with(Vectorize::global(), f, a, b, out)
}

pub fn float_binary_func_out_with<T, F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<T>,
) -> Result<()>
where
    T: DType,
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    let al = AlignedShapes::new(&a.shape_sizes(), &b.shape_sizes())?;
    fill_binary(vz, &al, out, |ai, bi| {
        T::from_f64(f(a.float_1d(ai), b.float_1d(bi)))
    });
    Ok(())
}

/// New `f64` tensor holding `f(a, b)`.
pub fn float_binary_func<F>(f: F, a: &dyn Tensor, b: &dyn Tensor) -> Result<Values<f64>>
where
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    float_binary_func_with(Vectorize::global(), f, a, b)
}

pub fn float_binary_func_with<F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
) -> Result<Values<f64>>
where
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    let mut out = Values::new(&[]);
    float_binary_func_out_with(vz, f, a, b, &mut out)?;
    Ok(out)
}

/// `a = f(a, b)` in place. Only `b` may broadcast.
pub fn float_assign_func<T, F>(f: F, a: &mut Values<T>, b: &dyn Tensor) -> Result<()>
where
    T: DType,
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    float_assign_func_with(Vectorize::global(), f, a, b)
}

pub fn float_assign_func_with<T, F>(
    vz: &Vectorize,
    f: F,
    a: &mut Values<T>,
    b: &dyn Tensor,
) -> Result<()>
where
    T: DType,
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    let al = AlignedShapes::for_assign(&a.shape_sizes(), &b.shape_sizes())?;
    assign_binary(vz, &al, a, |x, bi| {
        T::from_f64(f(x.to_f64(), b.float_1d(bi)))
    });
    Ok(())
}

/// `out = f(a, b)` through the integer path.
pub fn int_binary_func_out<T, F>(
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<T>,
) -> Result<()>
where
    T: DType,
    F: Fn(i64, i64) -> i64 + Sync + Send,
{
    int_binary_func_out_with(Vectorize::global(), f, a, b, out)
}

pub fn int_binary_func_out_with<T, F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<T>,
) -> Result<()>
where
    T: DType,
    F: Fn(i64, i64) -> i64 + Sync + Send,
{
    let al = AlignedShapes::new(&a.shape_sizes(), &b.shape_sizes())?;
    fill_binary(vz, &al, out, |ai, bi| T::from_int(f(a.int_1d(ai), b.int_1d(bi))));
    Ok(())
}

pub fn int_binary_func<F>(f: F, a: &dyn Tensor, b: &dyn Tensor) -> Result<Values<i64>>
where
    F: Fn(i64, i64) -> i64 + Sync + Send,
{
    int_binary_func_with(Vectorize::global(), f, a, b)
}

pub fn int_binary_func_with<F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
) -> Result<Values<i64>>
where
    F: Fn(i64, i64) -> i64 + Sync + Send,
{
    let mut out = Values::new(&[]);
    int_binary_func_out_with(vz, f, a, b, &mut out)?;
    Ok(out)
}

pub fn int_assign_func<T, F>(f: F, a: &mut Values<T>, b: &dyn Tensor) -> Result<()>
where
    T: DType,
    F: Fn(i64, i64) -> i64 + Sync + Send,
{
    int_assign_func_with(Vectorize::global(), f, a, b)
}

pub fn int_assign_func_with<T, F>(
    vz: &Vectorize,
    f: F,
    a: &mut Values<T>,
    b: &dyn Tensor,
) -> Result<()>
where
    T: DType,
    F: Fn(i64, i64) -> i64 + Sync + Send,
{
    let al = AlignedShapes::for_assign(&a.shape_sizes(), &b.shape_sizes())?;
    assign_binary(vz, &al, a, |x, bi| T::from_int(f(x.to_int(), b.int_1d(bi))));
    Ok(())
}

/// `out = f(a, b)` through the string path.
pub fn string_binary_func_out<T, F>(
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<T>,
) -> Result<()>
where
    T: DType,
    F: Fn(&str, &str) -> String + Sync + Send,
{
    string_binary_func_out_with(Vectorize::global(), f, a, b, out)
}

pub fn string_binary_func_out_with<T, F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<T>,
) -> Result<()>
where
    T: DType,
    F: Fn(&str, &str) -> String + Sync + Send,
{
    let al = AlignedShapes::new(&a.shape_sizes(), &b.shape_sizes())?;
    fill_binary(vz, &al, out, |ai, bi| {
        T::from_string_value(&f(&a.string_1d(ai), &b.string_1d(bi)))
    });
    Ok(())
}

pub fn string_binary_func<F>(f: F, a: &dyn Tensor, b: &dyn Tensor) -> Result<Values<String>>
where
    F: Fn(&str, &str) -> String + Sync + Send,
{
    string_binary_func_with(Vectorize::global(), f, a, b)
}

pub fn string_binary_func_with<F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
) -> Result<Values<String>>
where
    F: Fn(&str, &str) -> String + Sync + Send,
{
    let mut out = Values::new(&[]);
    string_binary_func_out_with(vz, f, a, b, &mut out)?;
    Ok(out)
}

pub fn string_assign_func<T, F>(f: F, a: &mut Values<T>, b: &dyn Tensor) -> Result<()>
where
    T: DType,
    F: Fn(&str, &str) -> String + Sync + Send,
{
    string_assign_func_with(Vectorize::global(), f, a, b)
}

pub fn string_assign_func_with<T, F>(
    vz: &Vectorize,
    f: F,
    a: &mut Values<T>,
    b: &dyn Tensor,
) -> Result<()>
where
    T: DType,
    F: Fn(&str, &str) -> String + Sync + Send,
{
    let al = AlignedShapes::for_assign(&a.shape_sizes(), &b.shape_sizes())?;
    assign_binary(vz, &al, a, |x, bi| {
        T::from_string_value(&f(&x.to_string_value(), &b.string_1d(bi)))
    });
    Ok(())
}

/// `out = f(a, b)` for a predicate on floats.
pub fn bool_floats_func_out<F>(
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<bool>,
) -> Result<()>
where
    F: Fn(f64, f64) -> bool + Sync + Send,
{
    bool_floats_func_out_with(Vectorize::global(), f, a, b, out)
}

pub fn bool_floats_func_out_with<F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<bool>,
) -> Result<()>
where
    F: Fn(f64, f64) -> bool + Sync + Send,
{
    let al = AlignedShapes::new(&a.shape_sizes(), &b.shape_sizes())?;
    fill_binary(vz, &al, out, |ai, bi| f(a.float_1d(ai), b.float_1d(bi)));
    Ok(())
}

pub fn bool_floats_func<F>(f: F, a: &dyn Tensor, b: &dyn Tensor) -> Result<Values<bool>>
where
    F: Fn(f64, f64) -> bool + Sync + Send,
{
    bool_floats_func_with(Vectorize::global(), f, a, b)
}

pub fn bool_floats_func_with<F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
) -> Result<Values<bool>>
where
    F: Fn(f64, f64) -> bool + Sync + Send,
{
    let mut out = Values::new(&[]);
    bool_floats_func_out_with(vz, f, a, b, &mut out)?;
    Ok(out)
}

/// `out = f(a, b)` for a predicate on strings.
pub fn bool_strings_func_out<F>(
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<bool>,
) -> Result<()>
where
    F: Fn(&str, &str) -> bool + Sync + Send,
{
    bool_strings_func_out_with(Vectorize::global(), f, a, b, out)
}

pub fn bool_strings_func_out_with<F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
    out: &mut Values<bool>,
) -> Result<()>
where
    F: Fn(&str, &str) -> bool + Sync + Send,
{
    let al = AlignedShapes::new(&a.shape_sizes(), &b.shape_sizes())?;
    fill_binary(vz, &al, out, |ai, bi| f(&a.string_1d(ai), &b.string_1d(bi)));
    Ok(())
}

pub fn bool_strings_func<F>(f: F, a: &dyn Tensor, b: &dyn Tensor) -> Result<Values<bool>>
where
    F: Fn(&str, &str) -> bool + Sync + Send,
{
    bool_strings_func_with(Vectorize::global(), f, a, b)
}

pub fn bool_strings_func_with<F>(
    vz: &Vectorize,
    f: F,
    a: &dyn Tensor,
    b: &dyn Tensor,
) -> Result<Values<bool>>
where
    F: Fn(&str, &str) -> bool + Sync + Send,
{
    let mut out = Values::new(&[]);
    bool_strings_func_out_with(vz, f, a, b, &mut out)?;
    Ok(out)
}

/// `out = f(a)` elementwise. `out` takes the shape of `a`.
pub fn float_func_out<T, F>(f: F, a: &dyn Tensor, out: &mut Values<T>)
where
    T: DType,
    F: Fn(f64) -> f64 + Sync + Send,
{
    float_func_out_with(Vectorize::global(), f, a, out)
}

pub fn float_func_out_with<T, F>(vz: &Vectorize, f: F, a: &dyn Tensor, out: &mut Values<T>)
where
    T: DType,
    F: Fn(f64) -> f64 + Sync + Send,
{
    out.set_shape(&a.shape_sizes());
    vz.run(out.data_mut(), |i, x| *x = T::from_f64(f(a.float_1d(i))));
}

pub fn float_func<F>(f: F, a: &dyn Tensor) -> Values<f64>
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    float_func_with(Vectorize::global(), f, a)
}

pub fn float_func_with<F>(vz: &Vectorize, f: F, a: &dyn Tensor) -> Values<f64>
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    let mut out = Values::new(&[]);
    float_func_out_with(vz, f, a, &mut out);
    out
}
