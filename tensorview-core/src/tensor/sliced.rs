use std::{
    cmp::Ordering,
    fmt,
    ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo},
};

use rand::{seq::SliceRandom, Rng};

use crate::{
    tensor::{fmt_grid, AnyValues, Tensor, TensorMut},
    Kind, Shape,
};

/// How one dimension of a [`Sliced`] view maps onto its source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DimIndexes {
    /// Every source position, in source order.
    #[default]
    Identity,
    /// Source positions in view order. May repeat, skip or reorder positions.
    Explicit(Vec<usize>),
}

impl DimIndexes {
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    pub fn as_slice(&self) -> Option<&[usize]> {
        match self {
            Self::Identity => None,
            Self::Explicit(ix) => Some(ix),
        }
    }
}

impl From<Vec<usize>> for DimIndexes {
    fn from(ix: Vec<usize>) -> Self {
        Self::Explicit(ix)
    }
}

impl From<Option<Vec<usize>>> for DimIndexes {
    fn from(ix: Option<Vec<usize>>) -> Self {
        ix.map_or(Self::Identity, Self::Explicit)
    }
}

/// A start / stop / step range over one dimension.
///
/// Negative positions count back from the end of the dimension, missing
/// bounds default to the ends in the direction of the step, a step of 0 is
/// taken as 1, and bounds are clamped to the dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: isize,
}

impl Slice {
    pub const fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: 1,
        }
    }

    pub const fn new(start: isize, stop: isize, step: isize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step,
        }
    }

    pub const fn with_step(self, step: isize) -> Self {
        Self { step, ..self }
    }

    pub fn is_full(&self) -> bool {
        self.start.is_none() && self.stop.is_none() && matches!(self.step, 0 | 1)
    }

    /// Positions selected in a dimension of the given size.
    pub fn indexes(&self, size: usize) -> Vec<usize> {
        let n = size as isize;
        let step = if self.step == 0 { 1 } else { self.step };
        let resolve = |v: isize| if v < 0 { v + n } else { v };
        if step > 0 {
            let start = self.start.map_or(0, resolve).clamp(0, n);
            let stop = self.stop.map_or(n, resolve).clamp(0, n);
            (start..stop).step_by(step as usize).map(|i| i as usize).collect()
        } else {
            let start = self.start.map_or(n - 1, resolve).clamp(-1, n - 1);
            let stop = self.stop.map_or(-1, resolve).clamp(-1, n - 1);
            let mut ix = Vec::new();
            let mut i = start;
            while i > stop {
                ix.push(i as usize);
                i += step;
            }
            ix
        }
    }
}

impl Default for Slice {
    fn default() -> Self {
        Self::full()
    }
}

impl From<usize> for Slice {
    fn from(i: usize) -> Self {
        Self::new(i as isize, i as isize + 1, 1)
    }
}

impl From<Range<usize>> for Slice {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start as isize, r.end as isize, 1)
    }
}

impl From<RangeInclusive<usize>> for Slice {
    fn from(r: RangeInclusive<usize>) -> Self {
        Self::new(*r.start() as isize, *r.end() as isize + 1, 1)
    }
}

impl From<RangeFrom<usize>> for Slice {
    fn from(r: RangeFrom<usize>) -> Self {
        Self {
            start: Some(r.start as isize),
            stop: None,
            step: 1,
        }
    }
}

impl From<RangeTo<usize>> for Slice {
    fn from(r: RangeTo<usize>) -> Self {
        Self {
            start: None,
            stop: Some(r.end as isize),
            step: 1,
        }
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

/// Matching rules for [`Sliced::filter_string`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Drop matching entries instead of keeping them.
    pub exclude: bool,
    /// Match when the value contains the needle rather than equals it.
    pub contains: bool,
    pub ignore_case: bool,
}

/// Ordering of `a` and `b`, reversed when not ascending.
///
/// Values that are unordered even against themselves (NaN) sort before every
/// other value and equal to each other, which keeps the order total.
pub fn compare_ascending<T: PartialOrd>(a: T, b: T, ascending: bool) -> Ordering {
    let unordered = |v: &T| v.partial_cmp(v).is_none();
    let ord = match (unordered(&a), unordered(&b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    };
    if ascending {
        ord
    } else {
        ord.reverse()
    }
}

/// A fully indexed view onto another [`Tensor`].
///
/// Every dimension either passes straight through to the source or goes
/// through an explicit list of source positions, so dimensions can be
/// reordered, filtered, repeated or sorted without touching the source data.
/// Each access pays one extra indirection; [`Tensor::as_values`] produces a
/// dense copy laid out in view order.
///
/// The view holds its source through `T`, which may be a shared borrow, a
/// mutable borrow (enabling [`TensorMut`]), an `Arc` or an owned tensor.
/// Call [`Sliced::valid_indexes`] after changing the structure of the source.
#[derive(Clone, Debug)]
pub struct Sliced<T> {
    tensor: T,
    indexes: Vec<DimIndexes>,
}

impl<T: Tensor> Sliced<T> {
    /// Transparent view: every dimension is [`DimIndexes::Identity`].
    pub fn new(tensor: T) -> Self {
        let indexes = vec![DimIndexes::Identity; tensor.num_dims()];
        Self { tensor, indexes }
    }

    /// View with the given per-dimension indexes, padded with identity or
    /// truncated to the number of source dimensions.
    ///
    /// Out-of-range positions are dropped, and a list left with no valid
    /// positions reverts to identity.
    pub fn with_indexes<I, D>(tensor: T, indexes: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DimIndexes>,
    {
        let nd = tensor.num_dims();
        let mut indexes: Vec<DimIndexes> = indexes.into_iter().map(Into::into).take(nd).collect();
        indexes.resize(nd, DimIndexes::Identity);
        let mut sl = Self { tensor, indexes };
        for d in 0..nd {
            sl.validate_dim(d, true);
        }
        sl
    }

    /// View selecting the given range in each leading dimension. Dimensions
    /// past the end of `ranges` are identity.
    pub fn from_ranges(tensor: T, ranges: &[Slice]) -> Self {
        let indexes: Vec<DimIndexes> = ranges
            .iter()
            .take(tensor.num_dims())
            .enumerate()
            .map(|(d, r)| {
                if r.is_full() {
                    DimIndexes::Identity
                } else {
                    DimIndexes::Explicit(r.indexes(tensor.dim_size(d)))
                }
            })
            .collect();
        Self::with_indexes(tensor, indexes)
    }

    pub fn tensor(&self) -> &T {
        &self.tensor
    }

    /// Mutable access to the source. Call [`Sliced::valid_indexes`] after
    /// any change to its shape.
    pub fn tensor_mut(&mut self) -> &mut T {
        &mut self.tensor
    }

    pub fn into_inner(self) -> T {
        self.tensor
    }

    pub fn indexes(&self) -> &[DimIndexes] {
        &self.indexes
    }

    pub fn dim_indexes(&self, dim: usize) -> &DimIndexes {
        &self.indexes[dim]
    }

    /// Replace the indexes of one dimension, with the same validation as
    /// [`Sliced::with_indexes`].
    pub fn set_dim_indexes(&mut self, dim: usize, ix: impl Into<DimIndexes>) {
        self.indexes[dim] = ix.into();
        self.validate_dim(dim, true);
    }

    /// Copy the indexes of another view, then validate them against our source.
    pub fn copy_indexes<U>(&mut self, other: &Sliced<U>) {
        self.indexes = other.indexes.clone();
        self.valid_indexes();
    }

    /// True when every dimension passes straight through.
    pub fn is_sequential(&self) -> bool {
        self.indexes.iter().all(DimIndexes::is_identity)
    }

    /// Reset every dimension to identity.
    pub fn sequential(&mut self) {
        self.indexes = vec![DimIndexes::Identity; self.tensor.num_dims()];
    }

    /// Re-check the indexes against the current source shape.
    ///
    /// Out-of-range positions are dropped; a list emptied by that reverts to
    /// identity. A list that was already empty, as left by [`Sliced::filter`],
    /// stays an empty dimension.
    pub fn valid_indexes(&mut self) {
        let nd = self.tensor.num_dims();
        self.indexes.resize(nd, DimIndexes::Identity);
        for d in 0..nd {
            self.validate_dim(d, false);
        }
    }

    fn validate_dim(&mut self, dim: usize, revert_empty: bool) {
        let size = self.tensor.dim_size(dim);
        let DimIndexes::Explicit(ix) = &mut self.indexes[dim] else {
            return;
        };
        let before = ix.len();
        ix.retain(|&i| i < size);
        if ix.len() < before {
            log::warn!(
                "sliced view: dropped {} out-of-range indexes in dimension {dim} (size {size})",
                before - ix.len()
            );
        }
        if ix.is_empty() && (revert_empty || before > 0) {
            log::warn!("sliced view: no valid indexes in dimension {dim}, using the full dimension");
            self.indexes[dim] = DimIndexes::Identity;
        }
    }

    /// Materialize the identity list of `dim` so it can be reordered.
    pub fn indexes_needed(&mut self, dim: usize) -> &mut Vec<usize> {
        let size = self.tensor.dim_size(dim);
        materialize(&mut self.indexes[dim], size)
    }

    /// Source position of view position `idx` in `dim`.
    pub fn source_index(&self, dim: usize, idx: usize) -> usize {
        match self.indexes.get(dim) {
            Some(DimIndexes::Explicit(ix)) => ix[idx],
            _ => idx,
        }
    }

    /// Source coordinates of view coordinates.
    pub fn source_indexes(&self, coords: &[usize]) -> Vec<usize> {
        coords
            .iter()
            .enumerate()
            .map(|(d, &c)| self.source_index(d, c))
            .collect()
    }

    /// Source coordinates of a flat index into the view's own shape.
    pub fn source_indexes_from_1d(&self, i: usize) -> Vec<usize> {
        let coords = Shape::new(&self.shape_sizes()).index_from_1d(i);
        self.source_indexes(&coords)
    }

    /// Shuffle the order of `dim`, starting from source order when it is
    /// still identity.
    pub fn permute<R: Rng + ?Sized>(&mut self, dim: usize, rng: &mut R) {
        if self.tensor.dim_size(dim) == 0 {
            return;
        }
        self.indexes_needed(dim).shuffle(rng);
    }

    /// Sort `dim` with a comparator that receives the source, the dimension
    /// and two source positions.
    pub fn sort_func<F>(&mut self, dim: usize, mut cmp: F)
    where
        F: FnMut(&T, usize, usize, usize) -> Ordering,
    {
        let tensor = &self.tensor;
        let ix = materialize(&mut self.indexes[dim], tensor.dim_size(dim));
        ix.sort_unstable_by(|&a, &b| cmp(tensor, dim, a, b));
    }

    /// Stable form of [`Sliced::sort_func`]. The comparator must return
    /// [`Ordering::Equal`] for equal elements for order to be preserved.
    pub fn sort_stable_func<F>(&mut self, dim: usize, mut cmp: F)
    where
        F: FnMut(&T, usize, usize, usize) -> Ordering,
    {
        let tensor = &self.tensor;
        let ix = materialize(&mut self.indexes[dim], tensor.dim_size(dim));
        ix.sort_by(|&a, &b| cmp(tensor, dim, a, b));
    }

    /// Restore source order in `dim`, keeping any filtering.
    pub fn sort_indexes(&mut self, dim: usize) {
        if let DimIndexes::Explicit(ix) = &mut self.indexes[dim] {
            ix.sort_unstable();
        }
    }

    /// Sort `dim` by the source values along it, taking position 0 in every
    /// other dimension. Strings sort alphabetically, everything else
    /// numerically.
    pub fn sort(&mut self, dim: usize, ascending: bool) {
        if self.tensor.is_empty() {
            return;
        }
        if self.tensor.is_string() {
            self.sort_func(dim, |tsr, dim, a, b| {
                compare_ascending(string_key(tsr, dim, a), string_key(tsr, dim, b), ascending)
            });
        } else {
            self.sort_func(dim, |tsr, dim, a, b| {
                compare_ascending(float_key(tsr, dim, a), float_key(tsr, dim, b), ascending)
            });
        }
    }

    /// Stable form of [`Sliced::sort`].
    pub fn sort_stable(&mut self, dim: usize, ascending: bool) {
        if self.tensor.is_empty() {
            return;
        }
        if self.tensor.is_string() {
            self.sort_stable_func(dim, |tsr, dim, a, b| {
                compare_ascending(string_key(tsr, dim, a), string_key(tsr, dim, b), ascending)
            });
        } else {
            self.sort_stable_func(dim, |tsr, dim, a, b| {
                compare_ascending(float_key(tsr, dim, a), float_key(tsr, dim, b), ascending)
            });
        }
    }

    /// Keep only the positions of `dim` for which `keep(source, dim,
    /// source_position)` holds. Removing everything leaves an empty dimension.
    pub fn filter<F>(&mut self, dim: usize, mut keep: F)
    where
        F: FnMut(&T, usize, usize) -> bool,
    {
        let tensor = &self.tensor;
        let ix = materialize(&mut self.indexes[dim], tensor.dim_size(dim));
        ix.retain(|&i| keep(tensor, dim, i));
    }

    /// Filter `dim` by comparing its string values (same key as
    /// [`Sliced::sort`]) against `needle`.
    pub fn filter_string(&mut self, dim: usize, needle: &str, opts: FilterOptions) {
        if self.tensor.is_empty() {
            return;
        }
        let lower = needle.to_lowercase();
        self.filter(dim, |tsr, dim, i| {
            let val = string_key(tsr, dim, i);
            let has = match (opts.contains, opts.ignore_case) {
                (true, true) => val.to_lowercase().contains(&lower),
                (true, false) => val.contains(needle),
                (false, true) => val.to_lowercase() == lower,
                (false, false) => val == needle,
            };
            has != opts.exclude
        });
    }

    /// Swap two view positions of `dim`. Identity dimensions are left as is.
    pub fn swap(&mut self, dim: usize, i: usize, j: usize) {
        if let DimIndexes::Explicit(ix) = &mut self.indexes[dim] {
            ix.swap(i, j);
        }
    }
}

fn materialize(ix: &mut DimIndexes, size: usize) -> &mut Vec<usize> {
    if ix.is_identity() {
        *ix = DimIndexes::Explicit((0..size).collect());
    }
    match ix {
        DimIndexes::Explicit(ix) => ix,
        DimIndexes::Identity => unreachable!("identity was just materialized"),
    }
}

fn key_coords<T: Tensor + ?Sized>(tsr: &T, dim: usize, i: usize) -> Vec<usize> {
    let mut coords = vec![0; tsr.num_dims()];
    coords[dim] = i;
    coords
}

fn float_key<T: Tensor + ?Sized>(tsr: &T, dim: usize, i: usize) -> f64 {
    tsr.float(&key_coords(tsr, dim, i))
}

fn string_key<T: Tensor + ?Sized>(tsr: &T, dim: usize, i: usize) -> String {
    tsr.string_value(&key_coords(tsr, dim, i))
}

impl<T: Tensor> Tensor for Sliced<T> {
    fn kind(&self) -> Kind {
        self.tensor.kind()
    }

    fn shape_sizes(&self) -> Vec<usize> {
        let mut sizes = self.tensor.shape_sizes();
        for (size, ix) in sizes.iter_mut().zip(&self.indexes) {
            if let DimIndexes::Explicit(ix) = ix {
                *size = ix.len();
            }
        }
        sizes
    }

    fn num_dims(&self) -> usize {
        self.tensor.num_dims()
    }

    fn dim_size(&self, dim: usize) -> usize {
        match self.indexes.get(dim) {
            Some(DimIndexes::Explicit(ix)) => ix.len(),
            _ => self.tensor.dim_size(dim),
        }
    }

    fn float(&self, coords: &[usize]) -> f64 {
        self.tensor.float(&self.source_indexes(coords))
    }

    // The 1D accessors must recover full coordinates first, which costs more
    // than direct n-dimensional access.
    fn float_1d(&self, i: usize) -> f64 {
        if self.is_sequential() {
            return self.tensor.float_1d(i);
        }
        self.tensor.float(&self.source_indexes_from_1d(i))
    }

    fn string_value(&self, coords: &[usize]) -> String {
        self.tensor.string_value(&self.source_indexes(coords))
    }

    fn string_1d(&self, i: usize) -> String {
        if self.is_sequential() {
            return self.tensor.string_1d(i);
        }
        self.tensor.string_value(&self.source_indexes_from_1d(i))
    }

    fn int(&self, coords: &[usize]) -> i64 {
        self.tensor.int(&self.source_indexes(coords))
    }

    fn int_1d(&self, i: usize) -> i64 {
        if self.is_sequential() {
            return self.tensor.int_1d(i);
        }
        self.tensor.int(&self.source_indexes_from_1d(i))
    }

    /// Indexed views are not contiguous, so sub-spaces are not supported.
    /// Materialize with [`Tensor::as_values`] first.
    fn sub_space(&self, _offs: &[usize]) -> Option<AnyValues> {
        None
    }

    fn row_tensor(&self, _row: usize) -> Option<AnyValues> {
        None
    }
}

impl<T: TensorMut> TensorMut for Sliced<T> {
    /// Resizes the source and resets the view to identity.
    fn set_shape(&mut self, sizes: &[usize]) {
        self.tensor.set_shape(sizes);
        self.sequential();
    }

    fn set_float(&mut self, val: f64, coords: &[usize]) {
        let src = self.source_indexes(coords);
        self.tensor.set_float(val, &src);
    }

    fn set_float_1d(&mut self, val: f64, i: usize) {
        if self.is_sequential() {
            return self.tensor.set_float_1d(val, i);
        }
        let src = self.source_indexes_from_1d(i);
        self.tensor.set_float(val, &src);
    }

    fn set_string(&mut self, val: &str, coords: &[usize]) {
        let src = self.source_indexes(coords);
        self.tensor.set_string(val, &src);
    }

    fn set_string_1d(&mut self, val: &str, i: usize) {
        if self.is_sequential() {
            return self.tensor.set_string_1d(val, i);
        }
        let src = self.source_indexes_from_1d(i);
        self.tensor.set_string(val, &src);
    }

    fn set_int(&mut self, val: i64, coords: &[usize]) {
        let src = self.source_indexes(coords);
        self.tensor.set_int(val, &src);
    }

    fn set_int_1d(&mut self, val: i64, i: usize) {
        if self.is_sequential() {
            return self.tensor.set_int_1d(val, i);
        }
        let src = self.source_indexes_from_1d(i);
        self.tensor.set_int(val, &src);
    }
}

impl<T: Tensor> fmt::Display for Sliced<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_grid(self, f)
    }
}
