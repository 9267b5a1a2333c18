//! Regional P&L, transfer-pricing shifts, and statutory tax.

use bizsim_core::{
    AllocationTable, DecisionSnapshot, FinancialReport, GlobalFinancials, Margin, MarginReport,
    PerRegion, ReferenceParams, Region, RegionalFinancials, Technology, TradeLane,
};
use rust_decimal::Decimal;

/// Unit production cost of a product configuration.
///
/// Example:
/// let c = unit_cost(Decimal::from(100), Decimal::from(10), 2);
/// assert_eq!(c, Decimal::from(120));
pub fn unit_cost(base: Decimal, per_feature: Decimal, features: u32) -> Decimal {
    base + per_feature * Decimal::from(features)
}

/// Build the regional and global income statement from an allocation table.
///
/// Taxable income is seeded by the transfer-pricing shifts of every active
/// lane, then incremented by each region's local revenue minus cost. A lane's
/// shift is `(tp - 1) x unit cost x shipped qty`, added to the origin's books
/// and subtracted from the destination's, so it is net-zero globally.
/// Negative taxable income yields zero tax, never a refund.
pub fn financial_report(
    snapshot: &DecisionSnapshot,
    params: &ReferenceParams,
    allocation: &AllocationTable,
) -> FinancialReport {
    let mut regions: PerRegion<RegionalFinancials> = PerRegion::default();

    for lane in TradeLane::ACTIVE {
        for &tech in &Technology::ALL {
            let qty = allocation[(lane.origin, tech)].exports[lane.destination];
            if qty == Decimal::ZERO {
                continue;
            }
            let tp = snapshot.transfer_multiplier(lane);
            // Cost basis is the producer's configuration.
            let cost = unit_cost(
                params.base_unit_cost,
                params.per_feature_cost,
                snapshot.features_for(lane.origin, tech),
            );
            let shift = (tp - Decimal::ONE) * cost * qty;
            regions[lane.origin].taxable += shift;
            regions[lane.destination].taxable -= shift;
        }
    }

    for ((region, tech), cell) in allocation.iter() {
        if cell.sold == Decimal::ZERO {
            continue;
        }
        let cost = unit_cost(
            params.base_unit_cost,
            params.per_feature_cost,
            snapshot.features_for(region, tech),
        );
        regions[region].revenue += cell.sold * snapshot.price_for(region, tech);
        regions[region].cost += cell.sold * cost;
    }

    let mut global = GlobalFinancials::default();
    for &region in &Region::ALL {
        let line = &mut regions[region];
        line.taxable += line.revenue - line.cost;
        line.tax = if line.taxable > Decimal::ZERO {
            line.taxable * params.tax_rate_pct[region] / Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        line.net = line.taxable - line.tax;

        global.revenue += line.revenue;
        global.cost += line.cost;
        global.taxable += line.taxable;
        global.tax += line.tax;
        global.net += line.net;
    }

    FinancialReport { regions, global }
}

/// Marginal accounting per (region, technology): sales, variable costs,
/// promotion, and gross profit. Margin percent is omitted when there are no
/// sales to divide by.
pub fn margin_report(
    snapshot: &DecisionSnapshot,
    params: &ReferenceParams,
    allocation: &AllocationTable,
) -> MarginReport {
    let mut report = MarginReport::default();
    for ((region, tech), cell) in allocation.iter() {
        let sales = cell.sold * snapshot.price_for(region, tech);
        let variable_costs = cell.sold
            * unit_cost(
                params.base_unit_cost,
                params.per_feature_cost,
                snapshot.features_for(region, tech),
            );
        let promotion = snapshot.promotion_for(region, tech);
        let gross_profit = sales - variable_costs - promotion;
        let margin_pct = if sales > Decimal::ZERO {
            Some(gross_profit / sales * Decimal::ONE_HUNDRED)
        } else {
            None
        };
        report[(region, tech)] = Margin {
            sales,
            variable_costs,
            promotion,
            gross_profit,
            margin_pct,
        };
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizsim_core::{MarketingMix, Technology, TransferPriceRule};
    use proptest::prelude::*;

    const T1: Technology = Technology::Tech1;

    fn sold(table: &mut AllocationTable, region: Region, tech: Technology, qty: i64) {
        let cell = &mut table[(region, tech)];
        cell.sold = Decimal::from(qty);
        cell.demand = Decimal::from(qty);
    }

    fn export(
        table: &mut AllocationTable,
        origin: Region,
        dest: Region,
        tech: Technology,
        qty: i64,
    ) {
        let qty = Decimal::from(qty);
        {
            let cell = &mut table[(origin, tech)];
            cell.exported += qty;
            cell.exports[dest] += qty;
        }
        let cell = &mut table[(dest, tech)];
        cell.imported += qty;
        cell.imports[origin] += qty;
    }

    fn priced_snapshot(price: i64, features: u32) -> DecisionSnapshot {
        DecisionSnapshot {
            marketing: Region::ALL
                .iter()
                .map(|&region| MarketingMix {
                    region,
                    tech: T1,
                    price: Decimal::from(price),
                    promotion: Decimal::ZERO,
                    features,
                })
                .collect(),
            ..DecisionSnapshot::default()
        }
    }

    fn flat_params() -> ReferenceParams {
        ReferenceParams {
            base_unit_cost: Decimal::from(100),
            per_feature_cost: Decimal::from(10),
            tax_rate_pct: PerRegion::splat(Decimal::from(20)),
            ..ReferenceParams::baseline()
        }
    }

    #[test]
    fn operating_margin_flows_into_taxable() {
        let mut table = AllocationTable::default();
        sold(&mut table, Region::Usa, T1, 10);
        let snapshot = priced_snapshot(200, 2);
        let report = financial_report(&snapshot, &flat_params(), &table);

        let usa = report.regions.usa;
        assert_eq!(usa.revenue, Decimal::from(2_000));
        assert_eq!(usa.cost, Decimal::from(1_200));
        assert_eq!(usa.taxable, Decimal::from(800));
        assert_eq!(usa.tax, Decimal::from(160));
        assert_eq!(usa.net, Decimal::from(640));
        assert_eq!(report.global.taxable, Decimal::from(800));
    }

    #[test]
    fn transfer_shift_moves_income_net_zero() {
        let mut table = AllocationTable::default();
        sold(&mut table, Region::Europe, T1, 10);
        export(&mut table, Region::Usa, Region::Europe, T1, 10);
        let mut snapshot = priced_snapshot(0, 0);
        snapshot.transfer_prices = vec![TransferPriceRule {
            lane: TradeLane::new(Region::Usa, Region::Europe),
            multiplier: Decimal::new(15, 1),
        }];
        let report = financial_report(&snapshot, &flat_params(), &table);

        // shift = (1.5 - 1) x 100 x 10 = 500
        assert_eq!(report.regions.usa.taxable, Decimal::from(500));
        // Europe sold 10 at price 0 with unit cost 100: -1000 margin - 500 shift.
        assert_eq!(report.regions.europe.taxable, Decimal::from(-1_500));
        assert_eq!(report.regions.usa.tax, Decimal::from(100));
        assert_eq!(report.regions.europe.tax, Decimal::ZERO);
    }

    #[test]
    fn multiplier_of_one_shifts_nothing() {
        let mut table = AllocationTable::default();
        sold(&mut table, Region::Asia, T1, 5);
        export(&mut table, Region::Usa, Region::Asia, T1, 5);
        let snapshot = priced_snapshot(150, 0);
        let report = financial_report(&snapshot, &flat_params(), &table);
        // No transfer rule: lanes trade at unit cost, no shift to USA's books.
        assert_eq!(report.regions.usa.taxable, Decimal::ZERO);
    }

    #[test]
    fn losses_produce_zero_tax() {
        let mut table = AllocationTable::default();
        sold(&mut table, Region::Usa, T1, 10);
        let snapshot = priced_snapshot(50, 0); // price below unit cost
        let report = financial_report(&snapshot, &flat_params(), &table);
        assert!(report.regions.usa.taxable < Decimal::ZERO);
        assert_eq!(report.regions.usa.tax, Decimal::ZERO);
        assert_eq!(report.regions.usa.net, report.regions.usa.taxable);
    }

    #[test]
    fn margin_report_guards_division_and_subtracts_promotion() {
        let mut table = AllocationTable::default();
        sold(&mut table, Region::Usa, T1, 10);
        let mut snapshot = priced_snapshot(200, 0);
        snapshot.marketing[0].promotion = Decimal::from(400);
        let report = margin_report(&snapshot, &flat_params(), &table);

        let usa = report[(Region::Usa, T1)];
        assert_eq!(usa.sales, Decimal::from(2_000));
        assert_eq!(usa.variable_costs, Decimal::from(1_000));
        assert_eq!(usa.gross_profit, Decimal::from(600));
        assert_eq!(usa.margin_pct, Some(Decimal::from(30)));
        assert_eq!(report[(Region::Asia, T1)].margin_pct, None);
    }

    proptest! {
        #[test]
        fn transfer_pricing_is_globally_neutral(
            qty in 0i64..10_000,
            tp_tenths in 10i64..=20,
            price in 0i64..1_000,
        ) {
            let mut table = AllocationTable::default();
            sold(&mut table, Region::Usa, T1, 100);
            sold(&mut table, Region::Europe, T1, qty);
            export(&mut table, Region::Usa, Region::Europe, T1, qty);

            let mut snapshot = priced_snapshot(price, 1);
            snapshot.transfer_prices = vec![TransferPriceRule {
                lane: TradeLane::new(Region::Usa, Region::Europe),
                multiplier: Decimal::new(tp_tenths, 1),
            }];
            let with_tp = financial_report(&snapshot, &flat_params(), &table);

            snapshot.transfer_prices.clear();
            let without_tp = financial_report(&snapshot, &flat_params(), &table);

            // Global taxable income is invariant under the multiplier alone.
            prop_assert_eq!(with_tp.global.taxable, without_tp.global.taxable);
            // And the two sides of the lane cancel exactly.
            let shift = with_tp.regions.usa.taxable - without_tp.regions.usa.taxable;
            let counter = with_tp.regions.europe.taxable - without_tp.regions.europe.taxable;
            prop_assert_eq!(shift + counter, Decimal::ZERO);
        }

        #[test]
        fn tax_is_never_negative(revenue in 0i64..5_000, qty in 0i64..100) {
            let mut table = AllocationTable::default();
            sold(&mut table, Region::Asia, T1, qty);
            let snapshot = priced_snapshot(revenue, 4);
            let report = financial_report(&snapshot, &flat_params(), &table);
            for (_, line) in report.regions.iter() {
                prop_assert!(line.tax >= Decimal::ZERO);
            }
            prop_assert!(report.global.tax >= Decimal::ZERO);
        }
    }
}
