//! Demand Projector: baseline demand, growth, and declared product shares.

use bizsim_core::{DecisionSnapshot, Grid, PerRegion, ReferenceParams, Region};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from the optional noisy projection helper. The deterministic
/// projector itself is total.
#[derive(Debug, Error, PartialEq)]
pub enum DemandError {
    /// Noise fraction must be finite and within [0, 1).
    #[error("noise fraction must be within [0, 1)")]
    InvalidNoise,
    /// Numeric conversion to Decimal failed.
    #[error("non-finite numeric conversion")]
    NonFinite,
}

/// Projected regional demand under a growth percentage.
///
/// Negative growth models contraction and is not clamped.
///
/// Example:
/// let d = projected_demand(Decimal::from(10_840), Decimal::ZERO);
/// assert_eq!(d, Decimal::from(10_840));
pub fn projected_demand(baseline: Decimal, growth_pct: Decimal) -> Decimal {
    baseline * (Decimal::ONE + growth_pct / Decimal::ONE_HUNDRED)
}

/// Volume of one declared product: its share of the projected demand.
pub fn product_volume(projected: Decimal, share_pct: Decimal) -> Decimal {
    projected * share_pct / Decimal::ONE_HUNDRED
}

/// Aggregate demand per (region, technology) from the declared products.
/// Two products on the same technology add up.
pub fn demand_table(snapshot: &DecisionSnapshot, params: &ReferenceParams) -> Grid<Decimal> {
    let mut demand = Grid::default();
    for product in &snapshot.products {
        let projected = projected_demand(
            params.baseline_demand[product.region],
            snapshot.growth_pct[product.region],
        );
        demand[(product.region, product.tech)] += product_volume(projected, product.share_pct);
    }
    demand
}

/// Projected demand with multiplicative uniform noise in
/// [1 - noise_frac, 1 + noise_frac], seeded for reproducibility.
///
/// Used for scenario exploration only; the evaluation pipeline stays
/// deterministic unless a caller opts in.
pub fn projected_demand_with_noise(
    baseline: Decimal,
    growth_pct: Decimal,
    noise_frac: f64,
    seed: u64,
) -> Result<Decimal, DemandError> {
    if !(0.0..1.0).contains(&noise_frac) || !noise_frac.is_finite() {
        return Err(DemandError::InvalidNoise);
    }
    let projected = projected_demand(baseline, growth_pct);
    if noise_frac == 0.0 {
        return Ok(projected);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let u: f64 = rng.gen_range(-noise_frac..=noise_frac);
    let factor = Decimal::from_f64(1.0 + u).ok_or(DemandError::NonFinite)?;
    Ok((projected * factor).max(Decimal::ZERO))
}

/// [`demand_table`] with per-region noisy projections. Each region draws from
/// its own stream derived from `seed`, so single-region results are stable
/// under changes elsewhere.
pub fn demand_table_with_noise(
    snapshot: &DecisionSnapshot,
    params: &ReferenceParams,
    noise_frac: f64,
    seed: u64,
) -> Result<Grid<Decimal>, DemandError> {
    let mut projected: PerRegion<Decimal> = PerRegion::default();
    for (i, &region) in Region::ALL.iter().enumerate() {
        projected[region] = projected_demand_with_noise(
            params.baseline_demand[region],
            snapshot.growth_pct[region],
            noise_frac,
            seed.wrapping_add(i as u64),
        )?;
    }
    let mut demand = Grid::default();
    for product in &snapshot.products {
        demand[(product.region, product.tech)] +=
            product_volume(projected[product.region], product.share_pct);
    }
    Ok(demand)
}
