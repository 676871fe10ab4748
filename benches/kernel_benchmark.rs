// ============================================================================
// Numeric Kernel Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Factorial - Cold computation versus memoized lookups
// 2. Logarithm - One input per ln branch, across precisions
// 3. Roots and Powers - Newton roots and repeated multiplication
// 4. Tower Arithmetic - Mixed-kind dispatch through coercion
// ============================================================================

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use numeric_tower::prelude::*;

fn policy(digits: u32) -> PrecisionPolicy {
    PrecisionPolicy::new(digits, RoundingRule::HalfEven)
}

// ============================================================================
// Factorial Benchmarks
// ============================================================================

fn benchmark_factorial(c: &mut Criterion) {
    let mut group = c.benchmark_group("factorial");
    let unlimited = PrecisionPolicy::unlimited();

    for n in [50i64, 500, 2000].iter() {
        let input = Integer::from_i64(*n, unlimited);

        group.bench_with_input(BenchmarkId::new("cold", n), &input, |b, input| {
            b.iter(|| {
                let kernel = KernelContext::with_defaults();
                black_box(kernel.factorial(input).unwrap())
            });
        });

        let warm = KernelContext::with_defaults();
        warm.factorial(&input).unwrap();
        group.bench_with_input(BenchmarkId::new("warm", n), &input, |b, input| {
            b.iter(|| black_box(warm.factorial(input).unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Logarithm Benchmarks
// ============================================================================

fn benchmark_ln(c: &mut Criterion) {
    let mut group = c.benchmark_group("ln");
    let kernel = KernelContext::with_defaults();

    for digits in [16u32, 34, 100].iter() {
        let p = policy(*digits);
        for (branch, literal) in [("newton", "0.75"), ("series", "5"), ("decomposed", "123456.789")] {
            let x = Real::parse(literal, p).unwrap();
            group.bench_with_input(
                BenchmarkId::new(branch, digits),
                &(x, p),
                |b, (x, p)| b.iter(|| black_box(kernel.ln(x, *p).unwrap())),
            );
        }
    }

    group.finish();
}

// ============================================================================
// Roots and Powers Benchmarks
// ============================================================================

fn benchmark_roots_and_powers(c: &mut Criterion) {
    let mut group = c.benchmark_group("roots_and_powers");
    let kernel = KernelContext::with_defaults();
    let p = policy(34);
    let two = Real::from_i64(2, p);

    for n in [2u32, 3, 7].iter() {
        group.bench_with_input(BenchmarkId::new("nth_root", n), n, |b, n| {
            b.iter(|| black_box(kernel.nth_root(&two, *n, p).unwrap()));
        });
    }

    let base = Real::parse("1.0001", p).unwrap();
    group.bench_function("integer_power_365", |b| {
        b.iter(|| black_box(kernel.integer_power(&base, 365, p).unwrap()));
    });

    let exponent = Number::parse("2/3", p).unwrap();
    group.bench_function("generalized_exponent_rational", |b| {
        b.iter(|| black_box(kernel.generalized_exponent(&two, &exponent, p).unwrap()));
    });

    group.bench_function("roots_of_unity_12", |b| {
        b.iter(|| black_box(kernel.roots_of_unity(12, policy(20)).unwrap()));
    });

    group.finish();
}

// ============================================================================
// Tower Arithmetic Benchmarks
// ============================================================================

fn benchmark_tower_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("tower_arithmetic");
    let p = policy(34);
    let integer = Number::integer(123_456_789);
    let rational = Number::parse("22/7", p).unwrap();
    let real = Number::parse("2.718281828459045", p).unwrap();

    group.bench_function("integer_plus_rational", |b| {
        b.iter(|| black_box(integer.add(&rational).unwrap()));
    });

    group.bench_function("rational_times_real", |b| {
        b.iter(|| black_box(rational.multiply(&real).unwrap()));
    });

    group.bench_function("real_divide_integer", |b| {
        b.iter(|| black_box(real.divide(&integer).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_factorial,
    benchmark_ln,
    benchmark_roots_and_powers,
    benchmark_tower_arithmetic,
);
criterion_main!(benches);
