//! Tensorview is a small n-dimensional tensor library built around broadcast
//! alignment and indexed views.
//!
//! Dense data lives in [`Values`], a row-major buffer with a [`Shape`]. Any
//! tensor can be wrapped in a [`Sliced`] view, which reorders, filters,
//! repeats or sorts the positions of each dimension without copying the
//! source. Views and dense tensors both implement [`Tensor`], so every
//! operation accepts either.
//!
//! Binary operations broadcast their operands: shapes are aligned from the
//! innermost dimension, shorter shapes are padded with leading 1s, and a
//! dimension of size 1 stretches to match the other side.
//!
//! ## A quick guide
//! - Build dense tensors with [`Values::from_vec`], [`Values::from_slice`] or [`Values::full`].
//! - Wrap one in a [`Sliced`] view to sort, filter or permute a dimension, and
//!   collapse the view into a dense copy with [`Tensor::as_values`].
//! - Check two shapes up front with [`align_shapes`] or [`align_for_assign`].
//! - Apply elementwise functions with the dispatch functions such as
//!   [`float_binary_func`], or use the operators in [`ops`].
//! - Tune parallelism with [`VectorizeConfig`], or through the
//!   `TENSORVIEW_MIN_PARALLEL`, `TENSORVIEW_GRAIN` and `TENSORVIEW_THREADS`
//!   environment variables.
//!
//! ## What can you do with it?
//! ```
//! use tensorview_core::{float_binary_func, Sliced, Tensor, Values};
//!
//! let a = Values::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
//! let b = Values::from_slice(&[10.0, 20.0, 30.0]);
//!
//! // [2, 3] + [3] broadcasts b over every row of a
//! let sum = float_binary_func(|x, y| x + y, &a, &b).unwrap();
//! assert_eq!(sum.data(), &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
//!
//! // view the rows in descending order of their first column
//! let mut view = Sliced::new(&sum);
//! view.sort(0, false);
//! let dense = view.as_values();
//! assert_eq!(dense.as_float64().unwrap().data(), &[14.0, 25.0, 36.0, 11.0, 22.0, 33.0]);
//! ```

mod align;
mod dtype;
mod error;
pub mod funcs;
pub mod ops;
mod shape;
mod tensor;
mod vectorize;

pub use align::{align_for_assign, align_shapes, AlignedShapes};
pub use dtype::{DType, Kind};
pub use error::{Error, Result};
pub use funcs::{
    bool_floats_func, bool_floats_func_out, bool_strings_func, bool_strings_func_out,
    float_assign_func, float_binary_func, float_binary_func_out, float_func, float_func_out,
    int_assign_func, int_binary_func, int_binary_func_out, string_assign_func,
    string_binary_func, string_binary_func_out,
};
pub use shape::Shape;
pub use tensor::{
    compare_ascending, AnyValues, DimIndexes, FilterOptions, Slice, Sliced, Tensor, TensorMut,
    Values,
};
pub use vectorize::{Vectorize, VectorizeConfig};
