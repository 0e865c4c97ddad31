use std::fmt;

use crate::{
    tensor::{fmt_grid, Tensor, TensorMut},
    DType, Error, Kind, Result, Shape,
};

/// Dense tensor owning its values in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Values<T: DType> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: DType> Values<T> {
    /// Tensor of the given sizes filled with the default value of `T`.
    pub fn new(sizes: &[usize]) -> Self {
        Self::full(T::default(), sizes)
    }

    /// Materialize a tensor filled with some value.
    pub fn full(v: T, sizes: &[usize]) -> Self {
        let shape = Shape::new(sizes);
        let data = vec![v; shape.len()];
        Self { shape, data }
    }

    pub fn from_vec(data: Vec<T>, sizes: &[usize]) -> Result<Self> {
        let shape = Shape::new(sizes);
        if shape.len() != data.len() {
            return Err(Error::ShapeMismatch {
                expected: shape.len(),
                got: data.len(),
            }
            .bt());
        }
        Ok(Self { shape, data })
    }

    /// 1-D tensor holding a copy of the slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            shape: Shape::new(&[data.len()]),
            data: data.to_vec(),
        }
    }

    pub fn shape_ref(&self) -> &Shape {
        &self.shape
    }

    pub fn set_names<S: AsRef<str>>(&mut self, names: &[S]) {
        self.shape.set_names(names);
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn value(&self, coords: &[usize]) -> &T {
        &self.data[self.shape.index_to_1d(coords)]
    }

    pub fn value_1d(&self, i: usize) -> &T {
        &self.data[i]
    }

    pub fn set_value(&mut self, val: T, coords: &[usize]) {
        let i = self.shape.index_to_1d(coords);
        self.data[i] = val;
    }

    pub fn set_value_1d(&mut self, val: T, i: usize) {
        self.data[i] = val;
    }

    /// Sets every value to the default of `T`.
    pub fn set_zeros(&mut self) {
        self.data.fill(T::default());
    }

    /// Copy of the contiguous values below the given outer offsets.
    pub fn sub_values(&self, offs: &[usize]) -> Option<Values<T>> {
        let nd = self.shape.num_dims();
        if offs.is_empty() || offs.len() >= nd {
            return None;
        }
        if offs.iter().zip(self.shape.sizes()).any(|(o, s)| o >= s) {
            return None;
        }
        let inner = &self.shape.sizes()[offs.len()..];
        let mut coords = offs.to_vec();
        coords.resize(nd, 0);
        let start = self.shape.index_to_1d(&coords);
        let sub = Shape::new(inner);
        let data = self.data[start..start + sub.len()].to_vec();
        Some(Values { shape: sub, data })
    }
}

impl<T: DType> Tensor for Values<T> {
    fn kind(&self) -> Kind {
        T::KIND
    }
    fn shape_sizes(&self) -> Vec<usize> {
        self.shape.sizes().to_vec()
    }
    fn shape(&self) -> Shape {
        self.shape.clone()
    }
    fn num_dims(&self) -> usize {
        self.shape.num_dims()
    }
    fn dim_size(&self, dim: usize) -> usize {
        self.shape.dim_size(dim)
    }
    fn len(&self) -> usize {
        self.data.len()
    }
    fn float(&self, coords: &[usize]) -> f64 {
        self.value(coords).to_f64()
    }
    fn float_1d(&self, i: usize) -> f64 {
        self.data[i].to_f64()
    }
    fn string_value(&self, coords: &[usize]) -> String {
        self.value(coords).to_string_value()
    }
    fn string_1d(&self, i: usize) -> String {
        self.data[i].to_string_value()
    }
    fn int(&self, coords: &[usize]) -> i64 {
        self.value(coords).to_int()
    }
    fn int_1d(&self, i: usize) -> i64 {
        self.data[i].to_int()
    }
    fn sub_space(&self, offs: &[usize]) -> Option<AnyValues> {
        self.sub_values(offs).map(T::into_any)
    }
    fn as_values(&self) -> AnyValues {
        T::into_any(Values {
            shape: Shape::new(self.shape.sizes()),
            data: self.data.clone(),
        })
    }
}

impl<T: DType> TensorMut for Values<T> {
    /// Replaces the shape. Dimension names survive only when the number of
    /// dimensions is unchanged.
    fn set_shape(&mut self, sizes: &[usize]) {
        let mut shape = Shape::new(sizes);
        if sizes.len() == self.shape.num_dims() && !self.shape.names().is_empty() {
            shape.set_names(self.shape.names());
        }
        self.shape = shape;
        self.data.resize(self.shape.len(), T::default());
    }
    fn set_float(&mut self, val: f64, coords: &[usize]) {
        self.set_value(T::from_f64(val), coords);
    }
    fn set_float_1d(&mut self, val: f64, i: usize) {
        self.data[i] = T::from_f64(val);
    }
    fn set_string(&mut self, val: &str, coords: &[usize]) {
        self.set_value(T::from_string_value(val), coords);
    }
    fn set_string_1d(&mut self, val: &str, i: usize) {
        self.data[i] = T::from_string_value(val);
    }
    fn set_int(&mut self, val: i64, coords: &[usize]) {
        self.set_value(T::from_int(val), coords);
    }
    fn set_int_1d(&mut self, val: i64, i: usize) {
        self.data[i] = T::from_int(val);
    }
}

impl<T: DType> fmt::Display for Values<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_grid(self, f)
    }
}

impl<T: DType> From<Values<T>> for AnyValues {
    fn from(values: Values<T>) -> Self {
        T::into_any(values)
    }
}

/// A dense tensor of any supported element kind.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyValues {
    Float64(Values<f64>),
    Float32(Values<f32>),
    Int(Values<i64>),
    Int32(Values<i32>),
    Byte(Values<u8>),
    Bool(Values<bool>),
    String(Values<String>),
}

macro_rules! each_kind {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            AnyValues::Float64($v) => $body,
            AnyValues::Float32($v) => $body,
            AnyValues::Int($v) => $body,
            AnyValues::Int32($v) => $body,
            AnyValues::Byte($v) => $body,
            AnyValues::Bool($v) => $body,
            AnyValues::String($v) => $body,
        }
    };
}

macro_rules! typed_access {
    ($($as_ref:ident, $as_mut:ident, $variant:ident, $t:ty);* $(;)?) => {
        impl AnyValues {
            $(
                pub fn $as_ref(&self) -> Option<&Values<$t>> {
                    match self {
                        Self::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                pub fn $as_mut(&mut self) -> Option<&mut Values<$t>> {
                    match self {
                        Self::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            )*
        }
    };
}

typed_access!(
    as_float64, as_float64_mut, Float64, f64;
    as_float32, as_float32_mut, Float32, f32;
    as_int, as_int_mut, Int, i64;
    as_int32, as_int32_mut, Int32, i32;
    as_byte, as_byte_mut, Byte, u8;
    as_bool, as_bool_mut, Bool, bool;
    as_string, as_string_mut, String, String;
);

impl AnyValues {
    /// Default-filled tensor of the given kind and sizes.
    pub fn new(kind: Kind, sizes: &[usize]) -> Self {
        match kind {
            Kind::Float64 => Self::Float64(Values::new(sizes)),
            Kind::Float32 => Self::Float32(Values::new(sizes)),
            Kind::Int => Self::Int(Values::new(sizes)),
            Kind::Int32 => Self::Int32(Values::new(sizes)),
            Kind::Byte => Self::Byte(Values::new(sizes)),
            Kind::Bool => Self::Bool(Values::new(sizes)),
            Kind::String => Self::String(Values::new(sizes)),
        }
    }

    pub fn downcast<T: DType>(self) -> Option<Values<T>> {
        T::from_any(self)
    }

    pub fn downcast_ref<T: DType>(&self) -> Option<&Values<T>> {
        T::any_ref(self)
    }
}

impl Tensor for AnyValues {
    fn kind(&self) -> Kind {
        each_kind!(self, v => v.kind())
    }
    fn shape_sizes(&self) -> Vec<usize> {
        each_kind!(self, v => v.shape_sizes())
    }
    fn shape(&self) -> Shape {
        each_kind!(self, v => v.shape())
    }
    fn num_dims(&self) -> usize {
        each_kind!(self, v => v.num_dims())
    }
    fn dim_size(&self, dim: usize) -> usize {
        each_kind!(self, v => v.dim_size(dim))
    }
    fn len(&self) -> usize {
        each_kind!(self, v => Tensor::len(v))
    }
    fn float(&self, coords: &[usize]) -> f64 {
        each_kind!(self, v => v.float(coords))
    }
    fn float_1d(&self, i: usize) -> f64 {
        each_kind!(self, v => v.float_1d(i))
    }
    fn string_value(&self, coords: &[usize]) -> String {
        each_kind!(self, v => v.string_value(coords))
    }
    fn string_1d(&self, i: usize) -> String {
        each_kind!(self, v => v.string_1d(i))
    }
    fn int(&self, coords: &[usize]) -> i64 {
        each_kind!(self, v => v.int(coords))
    }
    fn int_1d(&self, i: usize) -> i64 {
        each_kind!(self, v => v.int_1d(i))
    }
    fn sub_space(&self, offs: &[usize]) -> Option<AnyValues> {
        each_kind!(self, v => v.sub_space(offs))
    }
    fn as_values(&self) -> AnyValues {
        self.clone()
    }
}

impl TensorMut for AnyValues {
    fn set_shape(&mut self, sizes: &[usize]) {
        each_kind!(self, v => v.set_shape(sizes))
    }
    fn set_float(&mut self, val: f64, coords: &[usize]) {
        each_kind!(self, v => v.set_float(val, coords))
    }
    fn set_float_1d(&mut self, val: f64, i: usize) {
        each_kind!(self, v => v.set_float_1d(val, i))
    }
    fn set_string(&mut self, val: &str, coords: &[usize]) {
        each_kind!(self, v => v.set_string(val, coords))
    }
    fn set_string_1d(&mut self, val: &str, i: usize) {
        each_kind!(self, v => v.set_string_1d(val, i))
    }
    fn set_int(&mut self, val: i64, coords: &[usize]) {
        each_kind!(self, v => v.set_int(val, coords))
    }
    fn set_int_1d(&mut self, val: i64, i: usize) {
        each_kind!(self, v => v.set_int_1d(val, i))
    }
}

impl fmt::Display for AnyValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_grid(self, f)
    }
}
