use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};
use tensorview_core::{
    AnyValues, DimIndexes, Kind, Slice, Sliced, Tensor, TensorMut, Values,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn arange(sizes: &[usize]) -> Values<f64> {
    let n = sizes.iter().product::<usize>();
    Values::from_vec((0..n).map(|i| i as f64).collect(), sizes).unwrap()
}

fn floats(t: &dyn Tensor) -> Vec<f64> {
    (0..t.len()).map(|i| t.float_1d(i)).collect()
}

macro_rules! identity_round_trip {
    ($($name:ident: $sizes:expr;)*) => {
        $(
            #[test]
            fn $name() {
                init();
                let src = arange(&$sizes);
                let view = Sliced::new(&src);
                assert_eq!(view.shape_sizes(), src.shape_sizes());
                for i in 0..src.len() {
                    let coords = src.shape().index_from_1d(i);
                    assert_eq!(view.float(&coords), src.float(&coords));
                }
                assert_eq!(view.as_values(), AnyValues::from(src.clone()));
            }
        )*
    };
}

identity_round_trip! {
    identity_vector: [5];
    identity_matrix: [3, 4];
    identity_cube: [2, 3, 2];
    identity_empty: [2, 0];
}

#[test]
fn explicit_list_reorders_and_detaches() {
    init();
    let mut src = Values::from_slice(&[0.0, 10.0, 20.0, 30.0, 40.0]);
    let dense = {
        let view = Sliced::with_indexes(&src, [vec![4, 2, 0]]);
        assert_eq!(view.dim_size(0), 3);
        assert_eq!(floats(&view), vec![40.0, 20.0, 0.0]);
        view.as_values()
    };
    src.set_float_1d(-1.0, 4);
    assert_eq!(dense.kind(), Kind::Float64);
    assert_eq!(floats(&dense), vec![40.0, 20.0, 0.0]);
}

#[test]
fn filter_with_satisfied_predicate_is_idempotent() {
    init();
    let src = arange(&[6, 2]);
    let mut view = Sliced::with_indexes(&src, [vec![5, 1, 3]]);
    let before = view.indexes().to_vec();
    view.filter(0, |_, _, _| true);
    assert_eq!(view.indexes(), &before[..]);

    view.filter(0, |tsr, dim, i| {
        let mut coords = vec![0; 2];
        coords[dim] = i;
        tsr.float(&coords) > 2.0
    });
    assert_eq!(view.dim_indexes(0), &DimIndexes::Explicit(vec![5, 3]));
    let again = view.indexes().to_vec();
    view.filter(0, |tsr, dim, i| {
        let mut coords = vec![0; 2];
        coords[dim] = i;
        tsr.float(&coords) > 2.0
    });
    assert_eq!(view.indexes(), &again[..]);
}

#[test]
fn sort_indexes_restores_source_order() {
    init();
    let src = Values::from_slice(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
    let original = floats(&src);
    let mut view = Sliced::new(&src);

    view.permute(0, &mut StdRng::seed_from_u64(42));
    assert_eq!(view.dim_size(0), 8);
    view.sort_indexes(0);
    assert_eq!(floats(&view), original);

    view.sort(0, false);
    assert_eq!(floats(&view), vec![9.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 1.0]);
    view.sort_indexes(0);
    assert_eq!(view.dim_size(0), 8);
    assert_eq!(floats(&view), original);
}

#[test]
fn stable_sort_keeps_ties_in_order() {
    init();
    let src = Values::from_vec(vec![2.0, 0.0, 1.0, 1.0, 2.0, 2.0, 1.0, 3.0], &[4, 2]).unwrap();
    let mut view = Sliced::new(&src);
    view.sort_stable(0, true);
    assert_eq!(view.dim_indexes(0), &DimIndexes::Explicit(vec![1, 3, 0, 2]));
}

#[test]
fn sort_orders_nan_and_infinities() {
    init();
    let src = Values::from_slice(&[
        2.0,
        f64::NAN,
        f64::NEG_INFINITY,
        -1.0,
        f64::INFINITY,
        f64::NAN,
        0.0,
    ]);
    let mut view = Sliced::new(&src);
    view.sort_stable(0, true);
    assert_eq!(view.dim_indexes(0), &DimIndexes::Explicit(vec![1, 5, 2, 3, 6, 0, 4]));

    view.sort_stable(0, false);
    assert_eq!(view.dim_indexes(0), &DimIndexes::Explicit(vec![4, 0, 6, 3, 2, 1, 5]));

    let mut view = Sliced::new(&src);
    view.sort(0, true);
    let got = floats(&view);
    assert!(got[..2].iter().all(|v| v.is_nan()));
    assert_eq!(&got[2..], &[f64::NEG_INFINITY, -1.0, 0.0, 2.0, f64::INFINITY]);
}

#[test]
fn custom_comparator_sees_source_positions() {
    init();
    let src = arange(&[2, 3]);
    let mut view = Sliced::new(&src);
    // columns by descending value in the second row
    view.sort_func(1, |tsr, _, a, b| tsr.float(&[1, b]).total_cmp(&tsr.float(&[1, a])));
    assert_eq!(floats(&view), vec![2.0, 1.0, 0.0, 5.0, 4.0, 3.0]);
}

#[test]
fn permute_depends_only_on_seed() {
    init();
    let src = arange(&[16]);
    let shuffled = |seed| {
        let mut view = Sliced::new(&src);
        view.permute(0, &mut StdRng::seed_from_u64(seed));
        view.indexes().to_vec()
    };
    assert_eq!(shuffled(3), shuffled(3));
    assert_ne!(shuffled(3), shuffled(4));
}

#[test]
fn filtered_out_dimension_is_empty_not_identity() {
    init();
    let src = arange(&[4, 3]);
    let mut view = Sliced::new(&src);
    view.filter(1, |_, _, i| i > 10);
    assert_eq!(view.shape_sizes(), vec![4, 0]);
    assert!(view.is_empty());
    assert!(view.as_values().is_empty());
}

#[test]
fn explicit_empty_list_reverts_to_identity() {
    init();
    let src = arange(&[4]);
    let view = Sliced::with_indexes(&src, [Vec::<usize>::new()]);
    assert!(view.dim_indexes(0).is_identity());
    assert_eq!(view.dim_size(0), 4);

    let mut view = Sliced::new(&src);
    view.set_dim_indexes(0, vec![8, 9]);
    assert!(view.dim_indexes(0).is_identity());
}

#[test]
fn valid_indexes_after_source_shrinks() {
    init();
    let mut src = arange(&[6]);
    let mut view = Sliced::with_indexes(&mut src, [vec![5, 0, 3]]);
    view.tensor_mut().set_shape(&[4]);
    view.valid_indexes();
    assert_eq!(view.dim_indexes(0), &DimIndexes::Explicit(vec![0, 3]));

    view.tensor_mut().set_shape(&[0]);
    view.valid_indexes();
    assert!(view.dim_indexes(0).is_identity());
}

#[test]
fn ranges_and_copied_indexes() {
    init();
    let src = arange(&[4, 5]);
    let view = Sliced::from_ranges(
        &src,
        &[Slice::full().with_step(-1), Slice::from(1..4).with_step(2)],
    );
    assert_eq!(view.shape_sizes(), vec![4, 2]);
    assert_eq!(floats(&view), vec![16.0, 18.0, 11.0, 13.0, 6.0, 8.0, 1.0, 3.0]);

    let other = arange(&[3, 5]);
    let mut copy = Sliced::new(&other);
    copy.copy_indexes(&view);
    // row 3 does not exist in the smaller source
    assert_eq!(copy.dim_indexes(0), &DimIndexes::Explicit(vec![2, 1, 0]));
    assert_eq!(copy.dim_indexes(1), view.dim_indexes(1));
}

#[test]
fn strings_sort_and_display() {
    init();
    let names: Vec<String> = ["pear", "apple", "fig"].iter().map(|s| s.to_string()).collect();
    let src = Values::from_slice(&names);
    let mut view = Sliced::new(&src);
    view.sort(0, true);
    assert_eq!(view.string_1d(0), "apple");
    assert_eq!(view.to_string(), "[3]\n[0]:\tapple\t\n[1]:\tfig\t\n[2]:\tpear\t\n");
}

#[test]
fn owned_and_shared_sources() {
    init();
    let shared = Arc::new(arange(&[3]));
    let mut a = Sliced::new(Arc::clone(&shared));
    let b = Sliced::new(shared);
    a.swap(0, 0, 2);
    assert!(a.dim_indexes(0).is_identity());
    a.indexes_needed(0);
    a.swap(0, 0, 2);
    assert_eq!(floats(&a), vec![2.0, 1.0, 0.0]);
    assert_eq!(floats(&b), vec![0.0, 1.0, 2.0]);

    let mut owned = Sliced::new(arange(&[2, 2]));
    owned.set_float(7.0, &[1, 1]);
    owned.set_shape(&[3]);
    assert!(owned.is_sequential());
    assert_eq!(owned.into_inner().data(), &[0.0, 1.0, 2.0]);
}
