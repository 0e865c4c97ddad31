//! Broadcast alignment of two tensor shapes.
//!
//! Shapes are aligned from the innermost dimension outwards, and a shape with
//! fewer dimensions is padded with leading dimensions of size 1. Two aligned
//! sizes are compatible when they are equal or when one of them is 1.

use crate::{Error, Result, Shape, Tensor};

/// The effective operand shapes and the output shape of a broadcast.
///
/// All three shapes have the same number of dimensions. The operand shapes
/// keep the flat layout of the original tensors, since padding only adds
/// leading dimensions of size 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignedShapes {
    pub a: Shape,
    pub b: Shape,
    pub output: Shape,
}

impl AlignedShapes {
    /// Symmetric broadcast: either side may have size 1 along a dimension.
    pub fn new(a: &[usize], b: &[usize]) -> Result<Self> {
        align(a, b, |dim, ad, bd| {
            if ad != bd && ad != 1 && bd != 1 {
                return Err(Error::ShapeAlignment { dim, a: ad, b: bd });
            }
            Ok(())
        })
    }

    /// Assignment broadcast of `b` into `a`: only `b` may have size 1 where
    /// the sizes differ.
    pub fn for_assign(a: &[usize], b: &[usize]) -> Result<Self> {
        align(a, b, |dim, ad, bd| {
            if ad != bd && bd != 1 {
                return Err(Error::AssignAlignment { dim, a: ad, b: bd });
            }
            Ok(())
        })
    }

    /// Flat index into an operand of the output coordinates, where every
    /// dimension of size 1 in the operand shape stays at 0.
    pub fn wrap_index(operand: &Shape, coords: &[usize]) -> usize {
        operand
            .sizes()
            .iter()
            .zip(operand.strides())
            .zip(coords)
            .map(|((&size, &stride), &c)| if size == 1 { 0 } else { c * stride })
            .sum()
    }

    /// Flat indexes into `a` and `b` for a flat index into the output.
    ///
    /// `coords` is scratch space of length `output.num_dims()`.
    pub fn operand_indexes(&self, flat: usize, coords: &mut [usize]) -> (usize, usize) {
        self.output.index_from_1d_into(flat, coords);
        (
            Self::wrap_index(&self.a, coords),
            Self::wrap_index(&self.b, coords),
        )
    }
}

fn align<F>(a: &[usize], b: &[usize], check: F) -> Result<AlignedShapes>
where
    F: Fn(usize, usize, usize) -> Result<()>,
{
    let (an, bn) = (a.len(), b.len());
    let n = an.max(bn);
    let mut asz = vec![1; n];
    let mut bsz = vec![1; n];
    let mut osz = vec![1; n];
    for d in (0..n).rev() {
        // offset of this output dimension from the innermost one
        let back = n - 1 - d;
        let ad = if back < an { a[an - 1 - back] } else { 1 };
        let bd = if back < bn { b[bn - 1 - back] } else { 1 };
        if let Err(err) = check(d, ad, bd) {
            log::debug!("shape alignment of {a:?} and {b:?} failed: {err}");
            return Err(err);
        }
        asz[d] = ad;
        bsz[d] = bd;
        // a zero-sized dimension broadcast against 1 stays empty
        osz[d] = if ad == 1 { bd } else { ad };
    }
    Ok(AlignedShapes {
        a: Shape::new(&asz),
        b: Shape::new(&bsz),
        output: Shape::new(&osz),
    })
}

/// Broadcast shapes for a binary operation between `a` and `b`.
pub fn align_shapes(a: &dyn Tensor, b: &dyn Tensor) -> Result<AlignedShapes> {
    AlignedShapes::new(&a.shape_sizes(), &b.shape_sizes())
}

/// Broadcast shapes for assigning `b` into the existing tensor `a`.
pub fn align_for_assign(a: &dyn Tensor, b: &dyn Tensor) -> Result<AlignedShapes> {
    AlignedShapes::for_assign(&a.shape_sizes(), &b.shape_sizes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_shorter_shape_with_leading_ones() {
        let al = AlignedShapes::new(&[2, 3], &[3]).unwrap();
        assert_eq!(al.a.sizes(), &[2, 3]);
        assert_eq!(al.b.sizes(), &[1, 3]);
        assert_eq!(al.output.sizes(), &[2, 3]);
    }

    #[test]
    fn reports_offending_output_dimension() {
        let err = AlignedShapes::new(&[2, 3, 4], &[5, 4]).unwrap_err();
        assert!(matches!(err, Error::ShapeAlignment { dim: 1, a: 3, b: 5 }));
    }

    #[test]
    fn wrap_index_pins_broadcast_dimensions() {
        let al = AlignedShapes::new(&[2, 3], &[3]).unwrap();
        let mut coords = vec![0; 2];
        assert_eq!(al.operand_indexes(4, &mut coords), (4, 1));
        assert_eq!(coords, vec![1, 1]);
    }

    #[test]
    fn scalar_aligns_with_anything() {
        let al = AlignedShapes::new(&[], &[4, 2]).unwrap();
        assert_eq!(al.a.sizes(), &[1, 1]);
        assert_eq!(al.output.sizes(), &[4, 2]);
    }

    #[test]
    fn assign_rejects_target_broadcast() {
        assert!(AlignedShapes::for_assign(&[4, 4], &[1, 4]).is_ok());
        let err = AlignedShapes::for_assign(&[1, 4], &[4, 4]).unwrap_err();
        assert!(matches!(err, Error::AssignAlignment { dim: 0, a: 1, b: 4 }));
    }
}
