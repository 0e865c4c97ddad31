use tensorview_core::{align_shapes, float_binary_func, ops, Values};

fn main() {
    env_logger::init();

    let a = Values::from_vec((1..=6).map(f64::from).collect(), &[2, 3]).unwrap();
    let b = Values::from_slice(&[10.0, 20.0, 30.0]);

    let aligned = align_shapes(&a, &b).unwrap();
    println!("a {} + b {} -> {}", aligned.a, aligned.b, aligned.output);

    let sum = float_binary_func(|x, y| x + y, &a, &b).unwrap();
    println!("{sum}");
    assert_eq!(sum.data(), &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);

    let big = ops::greater(&sum, &Values::from_slice(&[25.0])).unwrap();
    println!("{big}");

    let bad = Values::<f64>::new(&[4]);
    if let Err(err) = align_shapes(&a, &bad) {
        println!("{err}");
    }
}
