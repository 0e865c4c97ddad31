use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tensorview_core::{float_binary_func_with, Sliced, Tensor, Values, Vectorize, VectorizeConfig};

fn random_values(rng: &mut StdRng, sizes: &[usize]) -> Values<f64> {
    let n = sizes.iter().product();
    Values::from_vec((0..n).map(|_| rng.random::<f64>()).collect(), sizes).unwrap()
}

fn bench_broadcast_add(c: &mut Criterion) {
    const N: usize = 512;
    let mut rng = StdRng::seed_from_u64(0);
    let a = random_values(&mut rng, &[N, N]);
    let b = random_values(&mut rng, &[N]);
    let sequential = Vectorize::new(VectorizeConfig::sequential()).unwrap();
    c.bench_function("broadcast_add_512x512_sequential", |bencher| {
        bencher.iter(|| float_binary_func_with(&sequential, |x, y| x + y, &a, &b).unwrap());
    });
    c.bench_function("broadcast_add_512x512_parallel", |bencher| {
        bencher.iter(|| float_binary_func_with(Vectorize::global(), |x, y| x + y, &a, &b).unwrap());
    });
}

fn bench_sliced_materialize(c: &mut Criterion) {
    const N: usize = 256;
    let mut rng = StdRng::seed_from_u64(1);
    let src = random_values(&mut rng, &[N, N]);
    let mut view = Sliced::new(&src);
    view.permute(0, &mut rng);
    view.sort(1, true);
    c.bench_function("sliced_as_values_256x256", |bencher| {
        bencher.iter(|| view.as_values());
    });
}

criterion_group!(benches, bench_broadcast_add, bench_sliced_materialize);
criterion_main!(benches);
