//! Logistics Allocator: distribute each origin's supply across regional
//! demand under that origin's ranked shipping priorities.
//!
//! Origins run in a fixed sequential order (USA, then Asia). Demand
//! satisfaction is shared state between the two passes, carried in an
//! explicit [`Satisfied`] accumulator threaded functionally from one pass to
//! the next, so each pass stays independently testable.

use bizsim_core::{
    AllocationTable, DecisionSnapshot, Grid, PriorityOrder, Region, Technology,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Running demand-satisfaction accumulator per (region, technology).
pub type Satisfied = Grid<Decimal>;

/// One shipment decided during an origin pass. `destination == origin` marks
/// a local sale with no export bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub origin: Region,
    pub destination: Region,
    pub tech: Technology,
    pub qty: Decimal,
}

/// Everything a single origin decided across all technologies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginPass {
    pub shipments: Vec<Shipment>,
    /// Produced-but-unshipped leftovers per technology.
    pub buffer: Vec<(Technology, Decimal)>,
}

/// Run one origin's allocation for every technology.
///
/// Walks the origin's priority order per technology, shipping
/// `min(remaining, unsatisfied demand)` to each target in turn. Returns the
/// pass and the updated accumulator; the caller feeds the accumulator into
/// the next origin's pass.
pub fn allocate_origin<F>(
    origin: Region,
    supply: &Grid<Decimal>,
    demand: &Grid<Decimal>,
    order_for: F,
    mut satisfied: Satisfied,
) -> (OriginPass, Satisfied)
where
    F: Fn(Technology) -> PriorityOrder,
{
    let mut pass = OriginPass::default();
    for &tech in &Technology::ALL {
        let mut remaining = supply[(origin, tech)];
        if remaining <= Decimal::ZERO {
            continue;
        }
        for &target in &order_for(tech).0 {
            let needed =
                (demand[(target, tech)] - satisfied[(target, tech)]).max(Decimal::ZERO);
            let shipped = remaining.min(needed);
            if shipped > Decimal::ZERO {
                satisfied[(target, tech)] += shipped;
                remaining -= shipped;
                pass.shipments.push(Shipment {
                    origin,
                    destination: target,
                    tech,
                    qty: shipped,
                });
            }
        }
        if remaining > Decimal::ZERO {
            pass.buffer.push((tech, remaining));
        }
    }
    (pass, satisfied)
}

/// Full allocation for one decision snapshot and demand table.
///
/// USA's pass runs before Asia's, so USA's shipments have first claim on
/// shared destination demand. The result is always rebuilt from scratch and
/// internally consistent.
pub fn allocate(snapshot: &DecisionSnapshot, demand: &Grid<Decimal>) -> AllocationTable {
    let supply = snapshot.total_product();
    let mut table = AllocationTable::default();
    let mut satisfied = Satisfied::default();

    for &origin in &Region::ORIGINS {
        let (pass, next) = allocate_origin(
            origin,
            &supply,
            demand,
            |tech| snapshot.priority_for(origin, tech),
            satisfied,
        );
        debug!(%origin, shipments = pass.shipments.len(), "origin pass complete");
        record_pass(&mut table, origin, &pass);
        satisfied = next;
    }

    for key in AllocationTable::keys() {
        let sold = satisfied[key];
        let cell = &mut table[key];
        cell.demand = demand[key];
        cell.sold = sold;
        cell.unmet = (demand[key] - sold).max(Decimal::ZERO);
    }
    table
}

fn record_pass(table: &mut AllocationTable, origin: Region, pass: &OriginPass) {
    for s in &pass.shipments {
        if s.destination == s.origin {
            continue;
        }
        {
            let cell = &mut table[(s.origin, s.tech)];
            cell.exported += s.qty;
            cell.exports[s.destination] += s.qty;
        }
        let cell = &mut table[(s.destination, s.tech)];
        cell.imported += s.qty;
        cell.imports[s.origin] += s.qty;
    }
    for &(tech, qty) in &pass.buffer {
        table[(origin, tech)].buffer += qty;
    }
}
