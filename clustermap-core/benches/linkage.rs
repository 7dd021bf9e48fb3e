use clustermap_core::prelude::*;
use divan::{Bencher, black_box};
use rand::SeedableRng;

const NB_SAMPLES: usize = 100;

fn correlation_matrix(nb_features: usize) -> ndarray::Array2<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let frame = Frame::random_uniform(NB_SAMPLES, nb_features, &mut rng).unwrap();
    pearson_matrix(frame.values(), false).unwrap()
}

#[divan::bench(args = [10, 100, 400])]
fn ward_linkage(
    bencher: Bencher,
    nb_features: usize,
) {
    let corr = correlation_matrix(nb_features);
    bencher.bench(|| linkage(black_box(corr.view()), Method::Ward).unwrap());
}

#[divan::bench(args = [10, 100, 400])]
fn average_linkage(
    bencher: Bencher,
    nb_features: usize,
) {
    let corr = correlation_matrix(nb_features);
    bencher.bench(|| linkage(black_box(corr.view()), Method::Average).unwrap());
}

#[divan::bench(args = [false, true])]
fn pearson(
    bencher: Bencher,
    parallel: bool,
) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let frame = Frame::random_uniform(NB_SAMPLES, 200, &mut rng).unwrap();
    bencher.bench(|| pearson_matrix(black_box(frame.values()), parallel).unwrap());
}

fn main() {
    // Run registered benchmarks.
    divan::main();
}
