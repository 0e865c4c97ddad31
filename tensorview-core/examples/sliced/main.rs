use rand::{rngs::StdRng, SeedableRng};
use tensorview_core::{FilterOptions, Sliced, Tensor, Values};

fn main() {
    env_logger::init();

    let data = (0..3)
        .flat_map(|y| (0..4).map(move |x| (y * 10 + x) as f64))
        .collect();
    let grid = Values::from_vec(data, &[3, 4]).unwrap();
    println!("{grid}");

    let view = Sliced::with_indexes(&grid, [vec![2, 1], vec![3, 2]]);
    println!("{view}");

    let mut rows = Sliced::new(&grid);
    rows.permute(0, &mut StdRng::seed_from_u64(5));
    println!("{rows}");
    rows.sort(0, false);
    println!("{rows}");

    let dense = rows.as_values();
    println!("materialized {}", dense.shape());

    let fruit: Vec<String> = ["apple", "Banana", "cherry", "apricot"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let fruit = Values::from_slice(&fruit);
    let mut picks = Sliced::new(&fruit);
    picks.filter_string(
        0,
        "a",
        FilterOptions {
            contains: true,
            ignore_case: true,
            exclude: false,
        },
    );
    picks.sort(0, true);
    println!("{picks}");
}
