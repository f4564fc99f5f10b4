use serde::{Deserialize, Serialize};

use crate::{
    capacity::Capacity,
    herd::{HerdState, HerdYear},
    proposal::ProposalInput,
};

/// Length of every projection, in years.
pub const PROJECTION_YEARS: u32 = 10;

/// Fixed cost of running a stud auction in any year with stud sales.
pub const AUCTION_BASE_COST: f64 = 50_000.0;
/// Additional auction cost per stud animal sold.
pub const AUCTION_COST_PER_HEAD: f64 = 500.0;

/// One row of the cash-flow projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: u32,
    pub name: String,
    pub income: f64,
    pub expenses: f64,
    pub net_cash_flow: f64,
    pub cumulative_cash_flow: f64,
    pub herd_size: u64,
}

/// Everything behind a [`YearRecord`]: the end-of-year herd, the head counts
/// that drove it and the cost lines that make up `expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearDetail {
    pub herd: HerdState,
    pub flows: HerdYear,
    pub labour_cost: f64,
    pub auction_cost: f64,
    pub vet_cost: f64,
    pub feed_cost: f64,
    pub startup_cost: f64,
}

pub struct Simulator<'a> {
    input: &'a ProposalInput,
    capacity: Capacity,
}

impl<'a> Simulator<'a> {
    pub fn new(input: &'a ProposalInput, capacity: Capacity) -> Self {
        Self { input, capacity }
    }

    pub fn run(&self) -> Vec<YearRecord> {
        self.run_with_hook(|_, _| {})
    }

    /// Runs the full projection, handing each year to `hook` as soon as it
    /// is settled.
    pub fn run_with_hook<F>(&self, mut hook: F) -> Vec<YearRecord>
    where
        F: FnMut(&YearRecord, &YearDetail),
    {
        let input = self.input;
        let mut herd = HerdState::foundation(input.foundation_cows, input.foundation_bulls);
        let foundation_bulls = herd.bulls;
        let mut cumulative_cash_flow = 0.0;
        let mut records = Vec::with_capacity(PROJECTION_YEARS as usize);

        for year in 1..=PROJECTION_YEARS {
            let flows = herd.advance_year(
                year,
                foundation_bulls,
                input.weaning_percentage,
                input.cow_replacement_rate,
                self.capacity.max_lsu,
            );

            let mut income = 0.0;
            income += flows.stud_bulls_sold as f64 * input.stud_bull_price;
            income += flows.stud_heifers_sold as f64 * input.stud_heifer_price;
            income += flows.cows_culled as f64 * input.cull_cow_price;
            income += flows.commercial_weaners_sold as f64
                * input.avg_weaning_weight_kg
                * input.weaner_price_per_kg;

            let herd_size = herd.total();
            let labour_cost = input.monthly_labour_cost * 12.0;
            let auction_cost = if flows.stud_sales() > 0 {
                AUCTION_BASE_COST + flows.stud_sales() as f64 * AUCTION_COST_PER_HEAD
            } else {
                0.0
            };
            let vet_cost = herd_size as f64 * input.vet_cost_per_head;
            let feed_cost = herd_size as f64 * input.feed_cost_per_head;
            let startup_cost = if year == 1 {
                input.infrastructure_budget + input.livestock_startup_cost
            } else {
                0.0
            };
            let expenses = labour_cost + auction_cost + vet_cost + feed_cost + startup_cost;

            let net_cash_flow = income - expenses;
            cumulative_cash_flow += net_cash_flow;

            let record = YearRecord {
                year,
                name: format!("Year {year}"),
                income,
                expenses,
                net_cash_flow,
                cumulative_cash_flow,
                herd_size,
            };
            let detail = YearDetail {
                herd,
                flows,
                labour_cost,
                auction_cost,
                vet_cost,
                feed_cost,
                startup_cost,
            };
            hook(&record, &detail);
            records.push(record);
        }
        records
    }
}
