use tensorview_core::{align_for_assign, align_shapes, AlignedShapes, Error, Values};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

macro_rules! aligns {
    ($($name:ident: $a:expr, $b:expr => $out:expr;)*) => {
        $(
            #[test]
            fn $name() {
                init();
                let (a, b, out): (&[usize], &[usize], &[usize]) = (&$a, &$b, &$out);
                let ab = AlignedShapes::new(a, b).unwrap();
                let ba = AlignedShapes::new(b, a).unwrap();
                assert_eq!(ab.output.sizes(), out);
                assert_eq!(ba.output.sizes(), ab.output.sizes());
                for d in 0..ab.output.num_dims() {
                    let (ad, bd) = (ab.a.dim_size(d), ab.b.dim_size(d));
                    assert_eq!(ab.output.dim_size(d), ad.max(bd));
                    if ad != 1 {
                        assert_eq!(ab.output.dim_size(d), ad);
                    }
                }
            }
        )*
    };
}

aligns! {
    same_shape: [3, 4], [3, 4] => [3, 4];
    row_vector: [3, 4], [4] => [3, 4];
    leading_one: [3, 4], [1, 4] => [3, 4];
    column_vector: [3, 1], [1, 5] => [3, 5];
    rank_three: [2, 1, 4], [3, 1] => [2, 3, 4];
    scalar: [], [2, 2] => [2, 2];
    both_scalar: [], [] => [];
}

macro_rules! misaligns {
    ($($name:ident: $a:expr, $b:expr => $dim:expr;)*) => {
        $(
            #[test]
            fn $name() {
                init();
                let (a, b): (&[usize], &[usize]) = (&$a, &$b);
                let err = AlignedShapes::new(a, b).unwrap_err();
                match err.inner() {
                    Error::ShapeAlignment { dim, .. } => assert_eq!(*dim, $dim),
                    other => panic!("unexpected error {other:?}"),
                }
            }
        )*
    };
}

misaligns! {
    inner_mismatch: [3, 4], [3, 5] => 1;
    outer_mismatch: [2, 4], [3, 4] => 0;
    padded_mismatch: [2, 3, 4], [5, 4] => 1;
}

#[test]
fn empty_dimension_stays_empty() {
    init();
    let al = AlignedShapes::new(&[0, 3], &[1, 3]).unwrap();
    assert_eq!(al.output.sizes(), &[0, 3]);
    assert_eq!(al.output.len(), 0);
}

#[test]
fn assign_is_asymmetric() {
    init();
    let big = Values::<f64>::new(&[4, 4]);
    let row = Values::<f64>::new(&[1, 4]);
    let al = align_for_assign(&big, &row).unwrap();
    assert_eq!(al.output.sizes(), &[4, 4]);

    let err = align_for_assign(&row, &big).unwrap_err();
    assert!(matches!(err.inner(), Error::AssignAlignment { dim: 0, a: 1, b: 4 }));
    // the symmetric form accepts both directions
    assert!(align_shapes(&row, &big).is_ok());
}

#[test]
fn operand_shapes_keep_flat_layout() {
    init();
    let al = AlignedShapes::new(&[2, 3], &[3]).unwrap();
    assert_eq!(al.b.sizes(), &[1, 3]);
    assert_eq!(al.b.len(), 3);
    let mut coords = vec![0; 2];
    let pairs: Vec<_> = (0..al.output.len())
        .map(|i| al.operand_indexes(i, &mut coords))
        .collect();
    assert_eq!(pairs, vec![(0, 0), (1, 1), (2, 2), (3, 0), (4, 1), (5, 2)]);
}
