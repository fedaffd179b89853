//! Property-based tests using `proptest` for matching invariants.
//!
//! Covers five properties:
//!
//! 1. **Conversion inversion** — deriving a source for a destination and
//!    converting it forward always covers the destination.
//! 2. **Widened multiply-divide** — `mul_div` agrees with native `u128`
//!    arithmetic whenever the product fits.
//! 3. **Selection optimality** — the matched destination amount is at
//!    least every candidate's net output.
//! 4. **Fee consistency** — fees never exceed the trade value and follow
//!    the per-leg formula exactly.
//! 5. **Cap dominance** — capping never raises any amount, never exceeds
//!    the cap, and is idempotent.

use proptest::prelude::*;

use crate::domain::{
    Amount, BasisPoints, Decimals, Rate, ReserveFlags, ReserveId, Rounding, Token, TradePair,
};
use crate::math::{calc_dest_amount, calc_src_amount, mul_div};
use crate::testkit::{account, native, token, FixedRateReserve, StaticGovernance, StaticRegistry};

use super::{Hint, MatchingEngine, ReserveBook};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn dec(value: u8) -> Decimals {
    let Ok(d) = Decimals::new(value) else {
        panic!("valid decimals");
    };
    d
}

fn engine_with(
    registry: StaticRegistry,
    network_bps: u32,
) -> MatchingEngine<StaticRegistry, StaticGovernance> {
    let governance = StaticGovernance::new(
        BasisPoints::new(network_bps),
        BasisPoints::new(7_000),
        BasisPoints::new(2_000),
    );
    MatchingEngine::new(registry, governance)
}

/// Book and registry with `rates.len()` reserves quoting native -> `tok`,
/// all fee-accounted.
fn reference_to_token_setup(
    tok: &Token,
    rates: &[u128],
) -> (ReserveBook, StaticRegistry) {
    let mut book = ReserveBook::new();
    let mut registry = StaticRegistry::new();
    for (i, raw_rate) in rates.iter().enumerate() {
        let id = ReserveId::new(i as u64 + 1);
        let reserve = FixedRateReserve::new(account(100 + i as u8))
            .with_rate(&native(), tok, Rate::new(*raw_rate));
        let Ok(()) = book.insert(id, Box::new(reserve)) else {
            panic!("fresh book insert");
        };
        registry = registry
            .list(&native(), tok, id)
            .with_flags(id, ReserveFlags::FEE_PAYING);
    }
    (book, registry)
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Rates within two orders of magnitude of parity.
fn rate_strategy() -> impl Strategy<Value = u128> {
    (Rate::PRECISION / 100)..=(Rate::PRECISION * 100)
}

/// Source quantities large enough not to floor away, small enough to
/// stay far from the tradable cap.
fn qty_strategy() -> impl Strategy<Value = u128> {
    10u128.pow(12)..=10u128.pow(24)
}

/// Decimal counts spanning the supported token range.
fn decimals_strategy() -> impl Strategy<Value = u8> {
    6u8..=19u8
}

// ---------------------------------------------------------------------------
// Property 1: Conversion inversion
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_derived_source_covers_destination(
        dest_qty in 1u128..=10u128.pow(24),
        raw_rate in rate_strategy(),
        src_dec in decimals_strategy(),
        dest_dec in decimals_strategy(),
    ) {
        let rate = Rate::new(raw_rate);
        let Ok(src) = calc_src_amount(Amount::new(dest_qty), dec(src_dec), dec(dest_dec), rate)
        else {
            return Ok(());
        };
        let Ok(forward) = calc_dest_amount(src, dec(src_dec), dec(dest_dec), rate) else {
            return Ok(());
        };
        prop_assert!(
            forward.get() >= dest_qty,
            "derived source must cover target: forward={} < dest={}",
            forward.get(), dest_qty
        );
    }

    #[test]
    fn prop_forward_then_inverse_never_grows(
        src_qty in qty_strategy(),
        raw_rate in rate_strategy(),
        src_dec in decimals_strategy(),
        dest_dec in decimals_strategy(),
    ) {
        let rate = Rate::new(raw_rate);
        let Ok(dest) = calc_dest_amount(Amount::new(src_qty), dec(src_dec), dec(dest_dec), rate)
        else {
            return Ok(());
        };
        if dest.is_zero() {
            return Ok(());
        }
        let Ok(back) = calc_src_amount(dest, dec(src_dec), dec(dest_dec), rate) else {
            return Ok(());
        };
        prop_assert!(
            back.get() <= src_qty,
            "inverse of a floored forward cannot exceed the input: back={} > src={}",
            back.get(), src_qty
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2: Widened multiply-divide
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_mul_div_matches_native_when_in_range(
        a in 0u128..=u128::from(u64::MAX),
        b in 0u128..=u128::from(u64::MAX),
        d in 1u128..=u128::from(u64::MAX),
    ) {
        // Products of two u64-range factors always fit in u128.
        let expected = a * b / d;
        prop_assert_eq!(mul_div(a, b, d, Rounding::Down), Some(expected));

        let expected_up = if (a * b) % d == 0 { expected } else { expected + 1 };
        prop_assert_eq!(mul_div(a, b, d, Rounding::Up), Some(expected_up));
    }
}

// ---------------------------------------------------------------------------
// Property 3: Selection optimality
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_best_of_all_dominates_every_candidate(
        rates in prop::collection::vec(rate_strategy(), 1..6),
        src_qty in qty_strategy(),
        dest_dec in decimals_strategy(),
    ) {
        let tok = token(1, dest_dec);
        let (book, registry) = reference_to_token_setup(&tok, &rates);
        let engine = engine_with(registry, 20);
        let Ok(pair) = TradePair::new(native(), tok) else {
            panic!("distinct pair");
        };

        let Ok(outcome) = engine.match_trade(
            &book,
            &pair,
            Amount::new(src_qty),
            BasisPoints::ZERO,
            Hint::BestOfAll,
        ) else {
            return Ok(());
        };

        // Every candidate is fee-accounted, so each would convert the
        // same net wei; the winner must deliver the maximum output.
        let Some(leg) = outcome.reference_to_token() else {
            panic!("destination leg required");
        };
        for raw_rate in &rates {
            let Ok(candidate) = calc_dest_amount(
                leg.src_amount(),
                Decimals::NATIVE,
                tok.decimals(),
                Rate::new(*raw_rate),
            ) else {
                continue;
            };
            prop_assert!(
                outcome.dest_amount() >= candidate,
                "selected output {} below candidate {}",
                outcome.dest_amount(), candidate
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Fee consistency
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_fees_follow_per_leg_formula(
        raw_rate in rate_strategy(),
        src_qty in qty_strategy(),
        network_bps in 0u32..=100u32,
        platform_bps in 0u32..=200u32,
    ) {
        let tok = token(1, 18);
        let (book, registry) = reference_to_token_setup(&tok, &[raw_rate]);
        let engine = engine_with(registry, network_bps);
        let Ok(pair) = TradePair::new(native(), tok) else {
            panic!("distinct pair");
        };

        let Ok(outcome) = engine.match_trade(
            &book,
            &pair,
            Amount::new(src_qty),
            BasisPoints::new(platform_bps),
            Hint::BestOfAll,
        ) else {
            return Ok(());
        };

        let bps = 10_000u128;
        let expected_network = src_qty * u128::from(network_bps) / bps;
        let expected_platform = src_qty * u128::from(platform_bps) / bps;
        prop_assert_eq!(outcome.network_fee_wei().get(), expected_network);
        prop_assert_eq!(outcome.platform_fee_wei().get(), expected_platform);
        prop_assert!(
            expected_network + expected_platform <= outcome.trade_wei().get(),
            "fees exceed trade value"
        );
    }
}

// ---------------------------------------------------------------------------
// Property 5: Cap dominance
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_cap_shrinks_and_is_idempotent(
        raw_rate in rate_strategy(),
        src_qty in qty_strategy(),
        cap_num in 1u128..=1_000u128,
    ) {
        let tok = token(1, 9);
        let (book, registry) = reference_to_token_setup(&tok, &[raw_rate]);
        let engine = engine_with(registry, 20);
        let Ok(pair) = TradePair::new(native(), tok) else {
            panic!("distinct pair");
        };

        let Ok(outcome) = engine.match_trade(
            &book,
            &pair,
            Amount::new(src_qty),
            BasisPoints::new(25),
            Hint::BestOfAll,
        ) else {
            return Ok(());
        };

        // Cap somewhere in (0, dest].
        let max_dest = Amount::new((outcome.dest_amount().get() * cap_num / 1_000).max(1));
        let Ok(capped) = engine.cap_to_max_dest(&outcome, max_dest) else {
            return Ok(());
        };

        prop_assert!(capped.dest_amount() <= max_dest, "cap exceeded");
        prop_assert!(capped.src_amount() <= outcome.src_amount(), "source grew");
        prop_assert!(capped.trade_wei() <= outcome.trade_wei(), "trade value grew");
        prop_assert!(
            capped.network_fee_wei() <= outcome.network_fee_wei(),
            "network fee grew"
        );
        prop_assert!(
            capped.platform_fee_wei() <= outcome.platform_fee_wei(),
            "platform fee grew"
        );

        let Ok(again) = engine.cap_to_max_dest(&capped, max_dest) else {
            panic!("recap of a capped outcome must succeed");
        };
        prop_assert_eq!(capped, again, "capping is not idempotent");
    }
}
