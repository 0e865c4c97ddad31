pub mod sliced;
pub mod values;

pub use sliced::{compare_ascending, DimIndexes, FilterOptions, Slice, Sliced};
pub use values::{AnyValues, Values};

use std::{fmt, sync::Arc};

use crate::{Kind, Shape};

/// Read access to an n-dimensional tensor.
///
/// Indexes are row-major, ordered from outer to inner left-to-right. Every
/// element can be read through the float, int and string paths regardless of
/// the underlying [`Kind`]. Coordinates are not bounds checked beyond what the
/// backing storage does.
pub trait Tensor: Send + Sync {
    fn kind(&self) -> Kind;

    /// Effective size of every dimension.
    fn shape_sizes(&self) -> Vec<usize>;

    fn shape(&self) -> Shape {
        Shape::new(&self.shape_sizes())
    }

    fn num_dims(&self) -> usize;

    fn dim_size(&self, dim: usize) -> usize;

    /// Number of elements, the product of all dimension sizes.
    fn len(&self) -> usize {
        self.shape_sizes().iter().product()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_string(&self) -> bool {
        self.kind().is_string()
    }

    fn float(&self, coords: &[usize]) -> f64;

    fn float_1d(&self, i: usize) -> f64;

    /// `string` would read oddly next to [`ToString`], hence the suffix.
    fn string_value(&self, coords: &[usize]) -> String;

    fn string_1d(&self, i: usize) -> String;

    fn int(&self, coords: &[usize]) -> i64;

    fn int_1d(&self, i: usize) -> i64;

    /// Owned copy of the innermost contiguous sub-space at the given offsets
    /// into the outermost dimensions, or `None` where that is not supported.
    fn sub_space(&self, offs: &[usize]) -> Option<AnyValues>;

    /// Sub-space at the given position of the outermost dimension.
    fn row_tensor(&self, row: usize) -> Option<AnyValues> {
        self.sub_space(&[row])
    }

    /// Dense copy of every element, laid out in the effective shape.
    fn as_values(&self) -> AnyValues {
        let kind = self.kind();
        let mut out = AnyValues::new(kind, &self.shape_sizes());
        let n = out.len();
        match kind {
            Kind::String => (0..n).for_each(|i| out.set_string_1d(&self.string_1d(i), i)),
            k if k.is_float() => (0..n).for_each(|i| out.set_float_1d(self.float_1d(i), i)),
            _ => (0..n).for_each(|i| out.set_int_1d(self.int_1d(i), i)),
        }
        out
    }
}

/// Write access to an n-dimensional tensor.
pub trait TensorMut: Tensor {
    /// Resize to the given dimension sizes, keeping the values that still fit
    /// in flat order.
    fn set_shape(&mut self, sizes: &[usize]);

    fn set_float(&mut self, val: f64, coords: &[usize]);

    fn set_float_1d(&mut self, val: f64, i: usize);

    fn set_string(&mut self, val: &str, coords: &[usize]);

    fn set_string_1d(&mut self, val: &str, i: usize);

    fn set_int(&mut self, val: i64, coords: &[usize]);

    fn set_int_1d(&mut self, val: i64, i: usize);
}

macro_rules! forward_tensor {
    ($($ty:ty),*) => {
        $(
            impl<T: Tensor + ?Sized> Tensor for $ty {
                fn kind(&self) -> Kind {
                    (**self).kind()
                }
                fn shape_sizes(&self) -> Vec<usize> {
                    (**self).shape_sizes()
                }
                fn shape(&self) -> Shape {
                    (**self).shape()
                }
                fn num_dims(&self) -> usize {
                    (**self).num_dims()
                }
                fn dim_size(&self, dim: usize) -> usize {
                    (**self).dim_size(dim)
                }
                fn len(&self) -> usize {
                    (**self).len()
                }
                fn float(&self, coords: &[usize]) -> f64 {
                    (**self).float(coords)
                }
                fn float_1d(&self, i: usize) -> f64 {
                    (**self).float_1d(i)
                }
                fn string_value(&self, coords: &[usize]) -> String {
                    (**self).string_value(coords)
                }
                fn string_1d(&self, i: usize) -> String {
                    (**self).string_1d(i)
                }
                fn int(&self, coords: &[usize]) -> i64 {
                    (**self).int(coords)
                }
                fn int_1d(&self, i: usize) -> i64 {
                    (**self).int_1d(i)
                }
                fn sub_space(&self, offs: &[usize]) -> Option<AnyValues> {
                    (**self).sub_space(offs)
                }
                fn row_tensor(&self, row: usize) -> Option<AnyValues> {
                    (**self).row_tensor(row)
                }
                fn as_values(&self) -> AnyValues {
                    (**self).as_values()
                }
            }
        )*
    };
}

forward_tensor!(&T, &mut T, Box<T>, Arc<T>);

macro_rules! forward_tensor_mut {
    ($($ty:ty),*) => {
        $(
            impl<T: TensorMut + ?Sized> TensorMut for $ty {
                fn set_shape(&mut self, sizes: &[usize]) {
                    (**self).set_shape(sizes)
                }
                fn set_float(&mut self, val: f64, coords: &[usize]) {
                    (**self).set_float(val, coords)
                }
                fn set_float_1d(&mut self, val: f64, i: usize) {
                    (**self).set_float_1d(val, i)
                }
                fn set_string(&mut self, val: &str, coords: &[usize]) {
                    (**self).set_string(val, coords)
                }
                fn set_string_1d(&mut self, val: &str, i: usize) {
                    (**self).set_string_1d(val, i)
                }
                fn set_int(&mut self, val: i64, coords: &[usize]) {
                    (**self).set_int(val, coords)
                }
                fn set_int_1d(&mut self, val: i64, i: usize) {
                    (**self).set_int_1d(val, i)
                }
            }
        )*
    };
}

forward_tensor_mut!(&mut T, Box<T>);

/// Shape line followed by a grid with the innermost dimension as columns.
pub(crate) fn fmt_grid<T: Tensor + ?Sized>(tsr: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let shape = tsr.shape();
    writeln!(f, "{shape}")?;
    let nd = shape.num_dims();
    if nd == 0 {
        return writeln!(f, "{}", tsr.string_1d(0));
    }
    if nd == 1 {
        for i in 0..shape.len() {
            writeln!(f, "[{i}]:\t{}\t", tsr.string_1d(i))?;
        }
        return Ok(());
    }
    let cols = shape.dim_size(nd - 1);
    let outer = Shape::new(&shape.sizes()[..nd - 1]);
    write!(f, "\t")?;
    for c in 0..cols {
        write!(f, "[{c}]:\t")?;
    }
    writeln!(f)?;
    if cols == 0 {
        return Ok(());
    }
    for r in 0..outer.len() {
        let label = outer
            .index_from_1d(r)
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{label}]:")?;
        for c in 0..cols {
            write!(f, "\t{}", tsr.string_1d(r * cols + c))?;
        }
        writeln!(f, "\t")?;
    }
    Ok(())
}
