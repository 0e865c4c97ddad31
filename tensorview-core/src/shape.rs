use std::fmt;

/// Compute default (contiguous) strides for a tensor of given shape.
pub(crate) fn contiguous_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(shape.len());
    let mut acc = 1;
    // Iterate dims in reverse to accumulate products
    for dim in shape.iter().rev() {
        strides.push(acc);
        acc *= *dim;
    }
    strides.reverse();
    strides
}

/// Dimension sizes, and optional names, of an n-dimensional tensor.
///
/// Layout is row-major: the last dimension varies fastest in the flat
/// storage. The number of elements is always the product of the sizes, so a
/// zero-sized dimension makes the whole tensor empty, and a shape with no
/// dimensions describes a scalar of length 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    sizes: Vec<usize>,
    strides: Vec<usize>,
    names: Vec<String>,
}

impl Shape {
    pub fn new(sizes: &[usize]) -> Self {
        Self {
            sizes: sizes.to_vec(),
            strides: contiguous_strides(sizes),
            names: Vec::new(),
        }
    }

    /// Shape with a name per dimension. Missing names are left empty and
    /// extra names are ignored.
    pub fn with_names<S: AsRef<str>>(sizes: &[usize], names: &[S]) -> Self {
        let mut shape = Self::new(sizes);
        shape.set_names(names);
        shape
    }

    pub fn set_names<S: AsRef<str>>(&mut self, names: &[S]) {
        self.names = (0..self.sizes.len())
            .map(|d| names.get(d).map(|n| n.as_ref().to_string()).unwrap_or_default())
            .collect();
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Dimension names, empty when the shape is unnamed.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn dim_name(&self, dim: usize) -> Option<&str> {
        self.names
            .get(dim)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }

    pub fn dim_by_name(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn num_dims(&self) -> usize {
        self.sizes.len()
    }

    pub fn dim_size(&self, dim: usize) -> usize {
        self.sizes[dim]
    }

    pub fn len(&self) -> usize {
        self.sizes.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the outermost dimension and the product of all the inner ones.
    pub fn row_cell_size(&self) -> (usize, usize) {
        match self.sizes.split_first() {
            None => (1, 1),
            Some((rows, rest)) => (*rows, rest.iter().product()),
        }
    }

    /// Flat row-major offset of the given coordinates.
    ///
    /// Coordinates are not checked against their dimension sizes.
    pub fn index_to_1d(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .zip(&self.strides)
            .map(|(c, s)| c * s)
            .sum()
    }

    /// Coordinates of a flat row-major offset, which must be below [`Shape::len`].
    pub fn index_from_1d(&self, flat: usize) -> Vec<usize> {
        let mut coords = vec![0; self.sizes.len()];
        self.index_from_1d_into(flat, &mut coords);
        coords
    }

    /// Allocation-free form of [`Shape::index_from_1d`].
    pub fn index_from_1d_into(&self, mut flat: usize, coords: &mut [usize]) {
        for (d, c) in coords.iter_mut().enumerate() {
            let stride = self.strides[d];
            *c = flat / stride;
            flat %= stride;
        }
    }
}

impl From<&[usize]> for Shape {
    fn from(sizes: &[usize]) -> Self {
        Self::new(sizes)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(sizes: [usize; N]) -> Self {
        Self::new(&sizes)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(sizes: Vec<usize>) -> Self {
        Self::new(&sizes)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (d, size) in self.sizes.iter().enumerate() {
            if d > 0 {
                write!(f, ", ")?;
            }
            match self.dim_name(d) {
                Some(name) => write!(f, "{name}: {size}")?,
                None => write!(f, "{size}")?,
            }
        }
        write!(f, "]")
    }
}
