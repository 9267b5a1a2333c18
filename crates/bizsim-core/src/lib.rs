#![deny(warnings)]

//! Core domain model for the round engine.
//!
//! This crate defines the serializable decision snapshot, reference
//! parameters, and result tables shared across the workspace, plus validation
//! helpers for the input boundary. All computation lives in `bizsim-alloc`
//! and `bizsim-finance`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use thiserror::Error;

/// A market region. USA and Asia also host production; Europe only consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Usa,
    Asia,
    Europe,
}

impl Region {
    /// All regions, in table order.
    pub const ALL: [Region; 3] = [Region::Usa, Region::Asia, Region::Europe];
    /// Regions with production capacity, in allocation order (USA first).
    pub const ORIGINS: [Region; 2] = [Region::Usa, Region::Asia];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Usa => "USA",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
        };
        f.write_str(name)
    }
}

/// A product line with its own cost, price, and feature attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    Tech1,
    Tech2,
    Tech3,
    Tech4,
}

impl Technology {
    /// All technologies, in table order.
    pub const ALL: [Technology; 4] = [
        Technology::Tech1,
        Technology::Tech2,
        Technology::Tech3,
        Technology::Tech4,
    ];
    pub(crate) const COUNT: usize = 4;

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technology::Tech1 => "Tech 1",
            Technology::Tech2 => "Tech 2",
            Technology::Tech3 => "Tech 3",
            Technology::Tech4 => "Tech 4",
        };
        f.write_str(name)
    }
}

/// An ordered cross-region trade lane with an actual shipping route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TradeLane {
    pub origin: Region,
    pub destination: Region,
}

impl TradeLane {
    pub const fn new(origin: Region, destination: Region) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// The four lanes with real trade in this model. Europe never exports.
    pub const ACTIVE: [TradeLane; 4] = [
        TradeLane::new(Region::Usa, Region::Asia),
        TradeLane::new(Region::Usa, Region::Europe),
        TradeLane::new(Region::Asia, Region::Usa),
        TradeLane::new(Region::Asia, Region::Europe),
    ];
}

impl fmt::Display for TradeLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.destination)
    }
}

/// Per-region table with named keys, indexable by [`Region`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerRegion<T> {
    pub usa: T,
    pub asia: T,
    pub europe: T,
}

impl<T> PerRegion<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Region, &T)> {
        Region::ALL
            .iter()
            .copied()
            .zip([&self.usa, &self.asia, &self.europe])
    }
}

impl<T: Clone> PerRegion<T> {
    /// Table with the same value for every region.
    pub fn splat(value: T) -> Self {
        Self {
            usa: value.clone(),
            asia: value.clone(),
            europe: value,
        }
    }
}

impl<T> Index<Region> for PerRegion<T> {
    type Output = T;
    fn index(&self, region: Region) -> &T {
        match region {
            Region::Usa => &self.usa,
            Region::Asia => &self.asia,
            Region::Europe => &self.europe,
        }
    }
}

impl<T> IndexMut<Region> for PerRegion<T> {
    fn index_mut(&mut self, region: Region) -> &mut T {
        match region {
            Region::Usa => &mut self.usa,
            Region::Asia => &mut self.asia,
            Region::Europe => &mut self.europe,
        }
    }
}

/// Flat table keyed by the composite `(Region, Technology)` pair.
///
/// Replaces the deeply nested per-region/per-technology records of the
/// decision surface with a single indexable 12-cell table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    cells: [T; 12],
}

impl<T> Grid<T> {
    /// All `(region, technology)` keys in cell order.
    pub fn keys() -> impl Iterator<Item = (Region, Technology)> {
        Region::ALL
            .iter()
            .flat_map(|&r| Technology::ALL.iter().map(move |&t| (r, t)))
    }

    pub fn iter(&self) -> impl Iterator<Item = ((Region, Technology), &T)> {
        Self::keys().zip(self.cells.iter())
    }
}

impl<T> Index<(Region, Technology)> for Grid<T> {
    type Output = T;
    fn index(&self, (region, tech): (Region, Technology)) -> &T {
        &self.cells[region.index() * Technology::COUNT + tech.index()]
    }
}

impl<T> IndexMut<(Region, Technology)> for Grid<T> {
    fn index_mut(&mut self, (region, tech): (Region, Technology)) -> &mut T {
        &mut self.cells[region.index() * Technology::COUNT + tech.index()]
    }
}

/// Shipping precedence for one (origin, technology): a strict permutation of
/// all three regions, earlier entries served first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityOrder(pub [Region; 3]);

impl PriorityOrder {
    /// Fallback order used when a priority selection is absent or malformed:
    /// home region first, Europe last.
    pub fn default_for(origin: Region) -> Self {
        match origin {
            Region::Asia => PriorityOrder([Region::Asia, Region::Usa, Region::Europe]),
            _ => PriorityOrder([Region::Usa, Region::Asia, Region::Europe]),
        }
    }

    /// Parse one of the six fixed permutation strings, e.g.
    /// `"1. United States, 2. Asia, 3. Europe"`. Rank prefixes and case are
    /// ignored. Returns `None` unless the result is a strict permutation.
    pub fn parse(s: &str) -> Option<Self> {
        let mut regions = s.split(',').filter_map(region_token);
        let order = PriorityOrder([regions.next()?, regions.next()?, regions.next()?]);
        if regions.next().is_some() || !order.is_permutation() {
            return None;
        }
        Some(order)
    }

    /// Parse with recovery: malformed input falls back to [`Self::default_for`].
    pub fn parse_or_default(s: &str, origin: Region) -> Self {
        Self::parse(s).unwrap_or_else(|| Self::default_for(origin))
    }

    pub fn is_permutation(self) -> bool {
        let [a, b, c] = self.0;
        a != b && b != c && a != c
    }
}

fn region_token(token: &str) -> Option<Region> {
    let name: String = token
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();
    match name.trim().to_ascii_lowercase().as_str() {
        "united states" | "usa" | "us" => Some(Region::Usa),
        "asia" => Some(Region::Asia),
        "europe" => Some(Region::Europe),
        _ => None,
    }
}

/// A declared product: a technology and its targeted share of a region's
/// projected demand. Up to two per region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeclaredProduct {
    pub region: Region,
    pub tech: Technology,
    pub share_pct: Decimal,
}

/// A production line at an origin, wholly assigned to one technology.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionLine {
    pub origin: Region,
    pub tech: Technology,
    pub capacity: Decimal,
}

/// The single outsourcing slot of an origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutsourcingSlot {
    pub origin: Region,
    pub tech: Technology,
    pub amount: Decimal,
}

/// Shipping-priority selection for one (origin, technology).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriorityRule {
    pub origin: Region,
    pub tech: Technology,
    pub order: PriorityOrder,
}

/// Marketing decisions for one (region, technology).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketingMix {
    pub region: Region,
    pub tech: Technology,
    pub price: Decimal,
    pub promotion: Decimal,
    pub features: u32,
}

/// Intercompany transfer-price multiplier for a trade lane, in [1.0, 2.0].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferPriceRule {
    pub lane: TradeLane,
    pub multiplier: Decimal,
}

/// Treasury decisions excluding the short-term plug, which the engine derives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancingPlan {
    pub long_term_loan_change: Decimal,
    pub share_issue_proceeds: Decimal,
    pub buyback_cost: Decimal,
    pub dividend: Decimal,
}

/// A team's complete decision set for one round.
///
/// The snapshot is plain data; accessor helpers build the composite-key views
/// the engine consumes. Missing entries degrade to neutral values (zero
/// quantities, transfer multiplier 1.0, default priority order).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    #[serde(default)]
    pub growth_pct: PerRegion<Decimal>,
    #[serde(default)]
    pub products: Vec<DeclaredProduct>,
    #[serde(default)]
    pub lines: Vec<ProductionLine>,
    #[serde(default)]
    pub outsourcing: Vec<OutsourcingSlot>,
    #[serde(default)]
    pub priorities: Vec<PriorityRule>,
    #[serde(default)]
    pub marketing: Vec<MarketingMix>,
    #[serde(default)]
    pub transfer_prices: Vec<TransferPriceRule>,
    #[serde(default)]
    pub financing: FinancingPlan,
    #[serde(default)]
    pub investment: PerRegion<Decimal>,
}

impl DecisionSnapshot {
    /// Total supply per (origin, technology): self-produced yield plus the
    /// outsourced amount.
    pub fn total_product(&self) -> Grid<Decimal> {
        let mut total = Grid::default();
        for line in &self.lines {
            total[(line.origin, line.tech)] += line.capacity;
        }
        for slot in &self.outsourcing {
            total[(slot.origin, slot.tech)] += slot.amount;
        }
        total
    }

    /// Shipping priority for an origin and technology; the last matching rule
    /// wins, absent rules fall back to the origin's default order.
    pub fn priority_for(&self, origin: Region, tech: Technology) -> PriorityOrder {
        self.priorities
            .iter()
            .rev()
            .find(|r| r.origin == origin && r.tech == tech)
            .map(|r| r.order)
            .unwrap_or_else(|| PriorityOrder::default_for(origin))
    }

    fn mix(&self, region: Region, tech: Technology) -> Option<&MarketingMix> {
        self.marketing
            .iter()
            .find(|m| m.region == region && m.tech == tech)
    }

    pub fn price_for(&self, region: Region, tech: Technology) -> Decimal {
        self.mix(region, tech).map_or(Decimal::ZERO, |m| m.price)
    }

    pub fn promotion_for(&self, region: Region, tech: Technology) -> Decimal {
        self.mix(region, tech)
            .map_or(Decimal::ZERO, |m| m.promotion)
    }

    pub fn features_for(&self, region: Region, tech: Technology) -> u32 {
        self.mix(region, tech).map_or(0, |m| m.features)
    }

    /// Transfer-price multiplier for a lane; lanes without a rule trade at
    /// unit cost (multiplier 1.0, no income shift).
    pub fn transfer_multiplier(&self, lane: TradeLane) -> Decimal {
        self.transfer_prices
            .iter()
            .rev()
            .find(|r| r.lane == lane)
            .map_or(Decimal::ONE, |r| r.multiplier)
    }

    /// The default decision set teams start a round from: one Tech 1 product
    /// per region at a 10% share, USA line 1 on Tech 1, flat pricing.
    pub fn baseline() -> Self {
        let products = Region::ALL
            .iter()
            .map(|&region| DeclaredProduct {
                region,
                tech: Technology::Tech1,
                share_pct: Decimal::from(10),
            })
            .collect();
        let marketing = Region::ALL
            .iter()
            .map(|&region| MarketingMix {
                region,
                tech: Technology::Tech1,
                price: Decimal::from(280),
                promotion: Decimal::from(5580),
                features: 2,
            })
            .collect();
        Self {
            products,
            lines: vec![ProductionLine {
                origin: Region::Usa,
                tech: Technology::Tech1,
                capacity: Decimal::from(5346),
            }],
            marketing,
            ..Self::default()
        }
    }
}

/// Read-only lookup tables sourced externally (parsed result workbooks or
/// static configuration). The engine assumes they are fully populated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceParams {
    pub baseline_demand: PerRegion<Decimal>,
    pub tax_rate_pct: PerRegion<Decimal>,
    pub long_term_interest_pct: Decimal,
    pub short_term_interest_pct: Decimal,
    pub minimum_cash: Decimal,
    pub depreciation_addback: Decimal,
    pub base_unit_cost: Decimal,
    pub per_feature_cost: Decimal,
    pub working_capital_change: Decimal,
    pub net_financing_costs: Decimal,
    pub beginning_cash: Decimal,
}

impl ReferenceParams {
    /// Reference data for the seeded practice round.
    pub fn baseline() -> Self {
        Self {
            baseline_demand: PerRegion {
                usa: Decimal::from(10_840),
                asia: Decimal::from(18_050),
                europe: Decimal::from(15_650),
            },
            tax_rate_pct: PerRegion {
                usa: Decimal::from(25),
                asia: Decimal::from(20),
                europe: Decimal::from(23),
            },
            long_term_interest_pct: Decimal::new(75, 1),
            short_term_interest_pct: Decimal::new(90, 1),
            minimum_cash: Decimal::from(5_000),
            depreciation_addback: Decimal::from(11_000),
            base_unit_cost: Decimal::new(1185, 1),
            per_feature_cost: Decimal::new(125, 1),
            working_capital_change: Decimal::ZERO,
            net_financing_costs: Decimal::ZERO,
            beginning_cash: Decimal::from(20_000),
        }
    }
}

/// Allocation outcome for one (region, technology) cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub demand: Decimal,
    pub sold: Decimal,
    pub exported: Decimal,
    /// Export sub-splits by destination; the home region stays zero.
    pub exports: PerRegion<Decimal>,
    pub imported: Decimal,
    /// Import sub-splits by source.
    pub imports: PerRegion<Decimal>,
    /// Origin-side produced-but-unshipped leftover.
    pub buffer: Decimal,
    pub unmet: Decimal,
}

pub type AllocationTable = Grid<Allocation>;

/// Income-statement line for one region: transfer-pricing shifts plus local
/// operating margin, taxed at the statutory rate when positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalFinancials {
    pub revenue: Decimal,
    pub cost: Decimal,
    pub taxable: Decimal,
    pub tax: Decimal,
    pub net: Decimal,
}

/// Straight sums of the regional lines.
pub type GlobalFinancials = RegionalFinancials;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub regions: PerRegion<RegionalFinancials>,
    pub global: GlobalFinancials,
}

/// Marginal accounting for one (region, technology) product.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub sales: Decimal,
    pub variable_costs: Decimal,
    pub promotion: Decimal,
    pub gross_profit: Decimal,
    /// Gross margin in percent; `None` when there are no sales.
    pub margin_pct: Option<Decimal>,
}

pub type MarginReport = Grid<Margin>;

/// The balanced cash-flow waterfall. `ending_cash >= minimum_cash` holds by
/// construction via the short-term plug.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub ebitda: Decimal,
    pub tax_paid: Decimal,
    pub investment: Decimal,
    pub working_capital_change: Decimal,
    pub net_financing_costs: Decimal,
    pub financing_flow_excl_short_term: Decimal,
    pub financing_flow: Decimal,
    pub beginning_cash: Decimal,
    pub short_term_loan_plug: Decimal,
    pub ending_cash: Decimal,
    pub net_cash_flow: Decimal,
}

/// Input-boundary violations. The engine itself never rejects inputs; callers
/// run this before invoking it.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("negative {0}")]
    NegativeQuantity(&'static str),
    #[error("share {0}% is outside [0, 100]")]
    ShareOutOfRange(Decimal),
    #[error("transfer-price multiplier {0} is outside [1.0, 2.0]")]
    TransferPriceOutOfRange(Decimal),
    #[error("{0} declares more than two products")]
    TooManyProducts(Region),
    #[error("{0} assigns more than two production lines")]
    TooManyLines(Region),
    #[error("{0} has more than one outsourcing slot")]
    TooManySlots(Region),
    #[error("{0} cannot originate production")]
    OriginNotAllowed(Region),
    #[error("priority order for {0}/{1} is not a permutation of all regions")]
    InvalidPriority(Region, Technology),
}

/// Validate a decision snapshot against the input-boundary rules.
pub fn validate_snapshot(snapshot: &DecisionSnapshot) -> Result<(), ValidationError> {
    // Negative growth models contraction and is allowed, so growth_pct is
    // deliberately unchecked.
    for region in Region::ALL {
        let declared = snapshot
            .products
            .iter()
            .filter(|p| p.region == region)
            .count();
        if declared > 2 {
            return Err(ValidationError::TooManyProducts(region));
        }
        let lines = snapshot.lines.iter().filter(|l| l.origin == region).count();
        if lines > 2 {
            return Err(ValidationError::TooManyLines(region));
        }
        let slots = snapshot
            .outsourcing
            .iter()
            .filter(|s| s.origin == region)
            .count();
        if slots > 1 {
            return Err(ValidationError::TooManySlots(region));
        }
    }
    for p in &snapshot.products {
        if p.share_pct < Decimal::ZERO || p.share_pct > Decimal::ONE_HUNDRED {
            return Err(ValidationError::ShareOutOfRange(p.share_pct));
        }
    }
    for line in &snapshot.lines {
        if line.origin == Region::Europe {
            return Err(ValidationError::OriginNotAllowed(line.origin));
        }
        if line.capacity < Decimal::ZERO {
            return Err(ValidationError::NegativeQuantity("line capacity"));
        }
    }
    for slot in &snapshot.outsourcing {
        if slot.origin == Region::Europe {
            return Err(ValidationError::OriginNotAllowed(slot.origin));
        }
        if slot.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeQuantity("outsourcing amount"));
        }
    }
    for rule in &snapshot.priorities {
        if rule.origin == Region::Europe {
            return Err(ValidationError::OriginNotAllowed(rule.origin));
        }
        if !rule.order.is_permutation() {
            return Err(ValidationError::InvalidPriority(rule.origin, rule.tech));
        }
    }
    for m in &snapshot.marketing {
        if m.price < Decimal::ZERO {
            return Err(ValidationError::NegativeQuantity("price"));
        }
        if m.promotion < Decimal::ZERO {
            return Err(ValidationError::NegativeQuantity("promotion spend"));
        }
    }
    for r in &snapshot.transfer_prices {
        if r.multiplier < Decimal::ONE || r.multiplier > Decimal::TWO {
            return Err(ValidationError::TransferPriceOutOfRange(r.multiplier));
        }
    }
    for (_, inv) in snapshot.investment.iter() {
        if *inv < Decimal::ZERO {
            return Err(ValidationError::NegativeQuantity("investment"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn grid_index_round_trips_all_keys() {
        let mut grid: Grid<Decimal> = Grid::default();
        for (i, key) in Grid::<Decimal>::keys().enumerate() {
            grid[key] = Decimal::from(i as i64);
        }
        for (i, (_, v)) in grid.iter().enumerate() {
            assert_eq!(*v, Decimal::from(i as i64));
        }
        assert_eq!(Grid::<Decimal>::keys().count(), 12);
    }

    #[test]
    fn per_region_indexing() {
        let mut t = PerRegion::splat(Decimal::ZERO);
        t[Region::Asia] = Decimal::from(7);
        assert_eq!(t.asia, Decimal::from(7));
        assert_eq!(t[Region::Usa], Decimal::ZERO);
    }

    #[test]
    fn priority_parses_the_fixed_strings() {
        let order = PriorityOrder::parse("1. United States, 2. Asia, 3. Europe").unwrap();
        assert_eq!(
            order,
            PriorityOrder([Region::Usa, Region::Asia, Region::Europe])
        );
        let order = PriorityOrder::parse("1. Europe, 2. Asia, 3. USA").unwrap();
        assert_eq!(
            order,
            PriorityOrder([Region::Europe, Region::Asia, Region::Usa])
        );
    }

    #[test]
    fn malformed_priority_falls_back_per_origin() {
        assert_eq!(
            PriorityOrder::parse_or_default("garbage", Region::Usa),
            PriorityOrder([Region::Usa, Region::Asia, Region::Europe])
        );
        assert_eq!(
            PriorityOrder::parse_or_default("1. Asia, 2. Asia, 3. Europe", Region::Asia),
            PriorityOrder([Region::Asia, Region::Usa, Region::Europe])
        );
    }

    #[test]
    fn snapshot_serde_round_trip() {
        let snapshot = DecisionSnapshot::baseline();
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let back: DecisionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn partial_snapshot_json_uses_defaults() {
        let snapshot: DecisionSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, DecisionSnapshot::default());
        assert_eq!(
            snapshot.transfer_multiplier(TradeLane::ACTIVE[0]),
            Decimal::ONE
        );
        assert_eq!(
            snapshot.priority_for(Region::Asia, Technology::Tech2),
            PriorityOrder::default_for(Region::Asia)
        );
    }

    #[test]
    fn total_product_sums_lines_and_outsourcing() {
        let snapshot = DecisionSnapshot {
            lines: vec![
                ProductionLine {
                    origin: Region::Usa,
                    tech: Technology::Tech1,
                    capacity: Decimal::from(60),
                },
                ProductionLine {
                    origin: Region::Usa,
                    tech: Technology::Tech1,
                    capacity: Decimal::from(20),
                },
            ],
            outsourcing: vec![OutsourcingSlot {
                origin: Region::Usa,
                tech: Technology::Tech1,
                amount: Decimal::from(5),
            }],
            ..DecisionSnapshot::default()
        };
        let total = snapshot.total_product();
        assert_eq!(total[(Region::Usa, Technology::Tech1)], Decimal::from(85));
        assert_eq!(total[(Region::Asia, Technology::Tech1)], Decimal::ZERO);
    }

    #[test]
    fn validation_rejects_europe_origin_and_bad_multiplier() {
        let mut snapshot = DecisionSnapshot::baseline();
        snapshot.lines.push(ProductionLine {
            origin: Region::Europe,
            tech: Technology::Tech1,
            capacity: Decimal::ONE,
        });
        assert_eq!(
            validate_snapshot(&snapshot),
            Err(ValidationError::OriginNotAllowed(Region::Europe))
        );

        let mut snapshot = DecisionSnapshot::baseline();
        snapshot.transfer_prices.push(TransferPriceRule {
            lane: TradeLane::ACTIVE[0],
            multiplier: Decimal::new(25, 1),
        });
        assert!(matches!(
            validate_snapshot(&snapshot),
            Err(ValidationError::TransferPriceOutOfRange(_))
        ));
    }

    #[test]
    fn validation_accepts_baseline() {
        validate_snapshot(&DecisionSnapshot::baseline()).unwrap();
    }

    proptest! {
        #[test]
        fn parsed_priorities_are_permutations(s in ".{0,40}") {
            if let Some(order) = PriorityOrder::parse(&s) {
                prop_assert!(order.is_permutation());
            }
        }

        #[test]
        fn shares_within_range_validate(share in 0i64..=100) {
            let snapshot = DecisionSnapshot {
                products: vec![DeclaredProduct {
                    region: Region::Usa,
                    tech: Technology::Tech1,
                    share_pct: Decimal::from(share),
                }],
                ..DecisionSnapshot::default()
            };
            prop_assert!(validate_snapshot(&snapshot).is_ok());
        }
    }
}
