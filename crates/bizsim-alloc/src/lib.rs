#![deny(warnings)]

//! Demand projection and priority-driven logistics allocation.
//!
//! Both halves are pure: the projector turns baseline demand and growth into
//! per-(region, technology) demand figures, and the allocator distributes
//! finite origin supply across that demand under ranked shipping priorities.

mod demand;
mod logistics;

pub use demand::{
    demand_table, demand_table_with_noise, product_volume, projected_demand,
    projected_demand_with_noise, DemandError,
};
pub use logistics::{allocate, allocate_origin, OriginPass, Satisfied, Shipment};
