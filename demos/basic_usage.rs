// ============================================================================
// Basic Usage Example
// ============================================================================

use decimal_engine::prelude::*;
use std::cmp::Ordering;

const SENTINEL: i64 = i64::MIN;

fn main() {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Decimal Engine Example ===\n");

    // Layouts: how the 64 bits are split between value and scale
    println!("Layouts:");
    for bits in ScaleBits::all().filter(|b| b.get() % 4 == 0 || b.get() == 15) {
        let layout = bits.layout();
        println!(
            "  b={:>2}  value {}..={}  scale {}..={}",
            bits.get(),
            layout.min_value,
            layout.max_value,
            layout.min_scale,
            layout.max_scale
        );
    }

    // Packed arithmetic with a shared context
    println!("\n=== Packed Decimals (b = 8) ===");
    let ctx = match DecimalContext::new(8, SENTINEL) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", e);
            return;
        },
    };

    let price = ctx.parse("1999.95").unwrap();
    let qty = ctx.parse("3").unwrap();
    let fee = ctx.parse("0.0025").unwrap();

    let gross = ctx.multiply(price, qty);
    let cost = ctx.multiply(gross, fee);
    let net = ctx.subtract(gross, cost);
    println!("gross = {} x {} = {}", ctx.to_string(price), ctx.to_string(qty), ctx.to_string(gross));
    println!("fee   = {} x {} = {}", ctx.to_string(gross), ctx.to_string(fee), ctx.to_string(cost));
    println!("net   = {}", ctx.to_string(net));

    let per_unit = ctx.divide(net, qty);
    println!("net per unit = {}", ctx.to_string(per_unit));
    match ctx.compare(per_unit, price) {
        Ordering::Less => println!("net per unit is below list price"),
        _ => println!("net per unit is not below list price"),
    }

    // Results without a representation come back as the sentinel
    let zero = ctx.encode(0, 0);
    println!("\n1999.95 / 0 is sentinel: {}", ctx.is_sentinel(ctx.divide(price, zero)));
    match ctx.parse("1e400") {
        Ok(word) if ctx.is_sentinel(word) => println!("1e400 does not fit b = 8"),
        Ok(word) => println!("1e400 parsed as {}", ctx.to_string(word)),
        Err(e) => println!("1e400 rejected: {}", e),
    }
    if let Err(e) = ctx.parse("12,50") {
        println!("\"12,50\" rejected: {}", e);
    }

    // Wide scale gaps leave the i128 fast path
    let tiny = ctx.encode(1, 100);
    let huge = ctx.encode(1, -100);
    println!("1e100 + 1e-100 = {}", ctx.to_string(ctx.add(huge, tiny)));

    // Arbitrary precision
    println!("\n=== BigInt ===");
    let factorial = (1..=30u32).fold(BigInt::one(), |acc, n| &acc * &BigInt::from(n));
    println!("30!          = {}", factorial);
    println!("30! (hex)    = {}", factorial.to_string_radix(16).unwrap());
    println!("30! / 2^20   = {}", &factorial >> 20);
    println!("2^100 - 1    = {}", &(BigInt::one() << 100) - &BigInt::one());
    println!("-12 & 10     = {}", BigInt::from(-12).and(&BigInt::from(10)));
    println!("30! / 0      = {}", factorial.div_or(&BigInt::zero(), BigInt::from(-1)));

    let karatsuba = MultiplyConfig::default().with_karatsuba_threshold(8);
    if karatsuba.validate().is_ok() {
        let wide = factorial.pow(20);
        let same = wide.mul_with(&wide, &karatsuba) == wide.mul_with(&wide, &MultiplyConfig::schoolbook_only());
        println!("(30!^20)^2 via Karatsuba matches schoolbook: {}", same);
    }
}
