// ============================================================================
// Basic Usage Example
// ============================================================================

use numeric_tower::prelude::*;
use std::sync::Arc;

fn main() {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Numeric Tower Example ===\n");

    let policy = PrecisionPolicy::new(30, RoundingRule::HalfEven);
    let kernel = KernelContextBuilder::new()
        .with_policy(policy)
        .build(Arc::new(LoggingObserver))
        .expect("standard configuration is valid");

    // Mixed-kind arithmetic climbs the tower
    println!("Tower arithmetic:");
    let third = Number::integer(1).divide(&Number::integer(3)).unwrap();
    let quarter = Number::parse("0.25", policy).unwrap();
    let sum = third.add(&quarter).unwrap();
    println!("  1/3 ({:?}) + 0.25 ({:?}) = {} ({:?})", third.kind(), quarter.kind(), sum, sum.kind());

    let root = Number::integer(-2).sqrt().unwrap();
    println!("  sqrt(-2) = {} ({:?})", root, root.kind());
    let square = root.multiply(&root).unwrap();
    println!("  sqrt(-2)^2 = {}, back down: {}", square, square.coerce_to(TowerKind::Real).unwrap());

    // Precision reconciliation
    let narrow = Number::parse("3.14159", PrecisionPolicy::new(5, RoundingRule::HalfEven)).unwrap();
    let wide = Number::parse("2.718281828", PrecisionPolicy::new(10, RoundingRule::HalfEven)).unwrap();
    let mixed = narrow.add(&wide).unwrap();
    println!("  5-digit + 10-digit = {} ({} digits)\n", mixed, mixed.policy().digits());

    // Kernel
    println!("Kernel at {} digits:", policy.digits());
    let two = Real::from_i64(2, policy);
    println!("  ln(2)        = {}", kernel.ln(&two, policy).unwrap());
    println!("  exp(1)       = {}", kernel.exp(&Real::one(policy), policy).unwrap());
    println!("  pi           = {}", kernel.pi(policy).unwrap());
    println!("  cbrt(2)      = {}", kernel.nth_root(&two, 3, policy).unwrap());
    let exponent = Number::parse("3/2", policy).unwrap();
    println!("  2^(3/2)      = {}", kernel.generalized_exponent(&two, &exponent, policy).unwrap());
    println!("  1.01^365     = {}", kernel.integer_power(&Real::parse("1.01", policy).unwrap(), 365, policy).unwrap());

    let n = Integer::from_i64(30, policy);
    println!("  30!          = {}", kernel.factorial(&n).unwrap());

    println!("\nFifth roots of unity:");
    for root in kernel.roots_of_unity(5, PrecisionPolicy::new(12, RoundingRule::HalfEven)).unwrap() {
        println!("  {}", root);
    }

    println!("\nErrors are values:");
    println!("  ln(-1)       -> {}", kernel.ln(&Real::from_i64(-1, policy), policy).unwrap_err());
    println!("  nth_root(-4, 2) -> {}", kernel.nth_root(&Real::from_i64(-4, policy), 2, policy).unwrap_err());

    println!("\n{:?}", kernel);
}
