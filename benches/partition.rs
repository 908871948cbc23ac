use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, SamplingMode,
};
use rand::prelude::*;

use partition::{cga, lpt, lrm, ls, multifit};

const SEED: [u8; 16] = 123u128.to_le_bytes();

// Example weights for 7 items
const EXAMPLE: [u32; 7] = [5, 5, 4, 4, 3, 3, 3];

fn identical_weights<const W: u32>(m: usize) -> Vec<u32> {
    vec![W; m]
}

/// Instance on which LPT ends up at `4n - 1` while the optimum is `3n`.
fn lpt_worst_case<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<u32> {
    let mut weights = Vec::with_capacity(2 * n + 1);
    for w in (n..2 * n).rev() {
        weights.push(w as u32);
        weights.push(w as u32);
    }
    weights.push(n as u32);
    weights.shuffle(rng);
    weights
}

fn random_weights<R: Rng + ?Sized>(m: usize, bits: u32, rng: &mut R) -> Vec<u32> {
    (0..m).map(|_| rng.gen_range(1..(1 << bits))).collect()
}

fn bench_example(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("varying groups with {EXAMPLE:?}"));

    for n in [3usize, 4].iter() {
        group.bench_with_input(BenchmarkId::new("ls", n), n, |b, n| {
            b.iter(|| ls(black_box(&EXAMPLE), black_box(*n)))
        });

        group.bench_with_input(BenchmarkId::new("lpt", n), n, |b, n| {
            b.iter(|| lpt(black_box(&EXAMPLE), black_box(*n)))
        });

        group.bench_with_input(BenchmarkId::new("multifit", n), n, |b, n| {
            b.iter(|| multifit(black_box(&EXAMPLE), black_box(*n)))
        });

        group.bench_with_input(BenchmarkId::new("lrm", n), n, |b, n| {
            b.iter(|| lrm(black_box(&EXAMPLE), black_box(*n)))
        });

        group.bench_with_input(BenchmarkId::new("cga", n), n, |b, n| {
            b.iter(|| cga(black_box(&EXAMPLE), black_box(*n)))
        });
    }

    group.finish();
}

fn bench_identical_weights(c: &mut Criterion) {
    let mut group = c.benchmark_group("varying groups with identical weights");

    for (n, m) in [(2usize, 7usize), (4, 7), (3, 50)].iter() {
        let weights = identical_weights::<1>(*m);

        group.bench_with_input(BenchmarkId::new("lpt", n), n, |b, n| {
            b.iter(|| lpt(black_box(&weights), black_box(*n)))
        });

        group.bench_with_input(BenchmarkId::new("cga", n), n, |b, n| {
            b.iter(|| cga(black_box(&weights), black_box(*n)))
        });
    }

    group.finish();
}

fn bench_lpt_worst_case(c: &mut Criterion) {
    let mut rng = rand_pcg::Pcg64Mcg::from_seed(SEED);

    let mut group = c.benchmark_group("varying groups with LPT worst case");
    group.sampling_mode(SamplingMode::Flat);

    for n in (1..=3).map(|k| 10u32.pow(k) as usize) {
        group.bench_with_input(BenchmarkId::new("lpt", n), &n, |b, n| {
            b.iter_batched(
                || lpt_worst_case(*n, &mut rng),
                |w| lpt(black_box(&w), black_box(*n)),
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("multifit", n), &n, |b, n| {
            b.iter_batched(
                || lpt_worst_case(*n, &mut rng),
                |w| multifit(black_box(&w), black_box(*n)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_random_weights(c: &mut Criterion) {
    let mut rng = rand_pcg::Pcg64Mcg::from_seed(SEED);

    let mut group = c.benchmark_group("varying weights with 3 groups and 8 bits");
    group.sampling_mode(SamplingMode::Flat);

    for m in [10usize, 15, 20].iter() {
        group.bench_with_input(BenchmarkId::new("cga", m), m, |b, m| {
            b.iter_batched(
                || random_weights(*m, 8, &mut rng),
                |w| cga(black_box(&w), black_box(3)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_example,
    bench_identical_weights,
    bench_lpt_worst_case,
    bench_random_weights
);

criterion_main!(benches);
