//! Cohort bookkeeping for the breeding herd.
//!
//! The herd is tracked as four age classes. Each call to
//! [`HerdState::advance_year`] ages the cohorts, culls, breeds, retains as many
//! heifer calves as grazing capacity allows and reports what is left to sell.

use serde::{Deserialize, Serialize};

/// Livestock units consumed by a breeding cow.
pub const LSU_PER_COW: f64 = 1.1;
/// Livestock units consumed by a bull.
pub const LSU_PER_BULL: f64 = 1.5;
/// Livestock units consumed by a 1-2 year old heifer.
pub const LSU_PER_HEIFER_Y2: f64 = 0.8;
/// Livestock units consumed by a 0-1 year old heifer.
pub const LSU_PER_HEIFER_Y1: f64 = 0.6;

/// Bulls kept once the cow herd outgrows the foundation bull team.
pub const LARGE_HERD_BULLS: u64 = 3;
/// Cow count above which [`LARGE_HERD_BULLS`] applies.
pub const LARGE_HERD_COWS: u64 = 50;

/// Share of surplus weaners sold as stud stock, keyed by the first year the
/// fraction applies. Entries are ordered by year.
pub const STUD_SALE_SCHEDULE: [(u32, f64); 4] = [(1, 0.0), (3, 0.20), (4, 0.30), (5, 0.40)];

/// Fraction of sellable weaners that go to stud buyers in `year`.
pub fn stud_sale_fraction(year: u32) -> f64 {
    STUD_SALE_SCHEDULE
        .iter()
        .rev()
        .find(|(from, _)| year >= *from)
        .map(|(_, fraction)| *fraction)
        .unwrap_or(0.0)
}

/// Largest head count tracked per cohort; every count up to it converts to
/// `f64` exactly.
pub const MAX_HEAD_COUNT: u64 = 1 << 53;

/// Floors a rate product into a head count, treating negatives as none and
/// capping at [`MAX_HEAD_COUNT`].
fn head_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value.floor() as u64).min(MAX_HEAD_COUNT)
    } else {
        0
    }
}

/// Herd cohorts carried from one year to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerdState {
    pub breeding_cows: u64,
    pub heifers_y1: u64,
    pub heifers_y2: u64,
    pub bulls: u64,
}

/// Head counts produced by one year of herd management.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HerdYear {
    pub cows_culled: u64,
    pub calves_weaned: u64,
    pub female_calves: u64,
    pub male_calves: u64,
    pub heifers_retained: u64,
    pub stud_fraction: f64,
    pub stud_bulls_sold: u64,
    pub stud_heifers_sold: u64,
    pub commercial_weaners_sold: u64,
}

impl HerdYear {
    pub fn stud_sales(&self) -> u64 {
        self.stud_bulls_sold.saturating_add(self.stud_heifers_sold)
    }
}

impl HerdState {
    /// Opening herd: the foundation cows and bulls, no young stock.
    pub fn foundation(cows: f64, bulls: f64) -> Self {
        Self {
            breeding_cows: head_count(cows),
            heifers_y1: 0,
            heifers_y2: 0,
            bulls: head_count(bulls),
        }
    }

    pub fn total(&self) -> u64 {
        self.breeding_cows
            .saturating_add(self.heifers_y1)
            .saturating_add(self.heifers_y2)
            .saturating_add(self.bulls)
    }

    /// Runs one year of herd management and leaves `self` holding the
    /// end-of-year cohorts.
    ///
    /// `foundation_bulls` is the configured bull count; it is re-applied
    /// every year unless the cow herd is large enough for the bigger team.
    pub fn advance_year(
        &mut self,
        year: u32,
        foundation_bulls: u64,
        weaning_percentage: f64,
        cow_replacement_rate: f64,
        max_lsu: f64,
    ) -> HerdYear {
        // Aging: last year's 1-2 year olds calve for the first time.
        self.breeding_cows = self.breeding_cows.saturating_add(self.heifers_y2);
        self.heifers_y2 = self.heifers_y1;

        let cows_culled = head_count(self.breeding_cows as f64 * (cow_replacement_rate / 100.0))
            .min(self.breeding_cows);
        self.bulls = if self.breeding_cows > LARGE_HERD_COWS {
            LARGE_HERD_BULLS
        } else {
            foundation_bulls
        };

        // Calving uses the cow count before culls leave.
        let calves_weaned = head_count(self.breeding_cows as f64 * (weaning_percentage / 100.0));
        let female_calves = calves_weaned / 2;
        let male_calves = calves_weaned - female_calves;

        let current_lsu = (self.breeding_cows - cows_culled) as f64 * LSU_PER_COW
            + self.bulls as f64 * LSU_PER_BULL
            + self.heifers_y2 as f64 * LSU_PER_HEIFER_Y2;
        let lsu_space = max_lsu - current_lsu;
        let heifers_allowed = if lsu_space > 0.0 {
            head_count(lsu_space / LSU_PER_HEIFER_Y1)
        } else {
            0
        };
        let heifers_retained = female_calves.min(heifers_allowed);
        self.heifers_y1 = heifers_retained;

        let males_to_sell = male_calves;
        let females_to_sell = female_calves - heifers_retained;
        let stud_fraction = stud_sale_fraction(year);
        let stud_bulls_sold = head_count(males_to_sell as f64 * stud_fraction);
        let stud_heifers_sold = head_count(females_to_sell as f64 * stud_fraction);
        let commercial_weaners_sold =
            (males_to_sell - stud_bulls_sold).saturating_add(females_to_sell - stud_heifers_sold);

        self.breeding_cows -= cows_culled;

        HerdYear {
            cows_culled,
            calves_weaned,
            female_calves,
            male_calves,
            heifers_retained,
            stud_fraction,
            stud_bulls_sold,
            stud_heifers_sold,
            commercial_weaners_sold,
        }
    }
}
