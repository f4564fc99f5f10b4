use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{capacity::Capacity, simulator::YearRecord};

/// First year in which cumulative cash flow is no longer negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BreakEven {
    Year(u32),
    NotReached,
}

impl BreakEven {
    pub fn year(self) -> Option<u32> {
        match self {
            BreakEven::Year(year) => Some(year),
            BreakEven::NotReached => None,
        }
    }
}

impl fmt::Display for BreakEven {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakEven::Year(year) => write!(f, "Year {year}"),
            BreakEven::NotReached => f.write_str("N/A"),
        }
    }
}

impl From<BreakEven> for String {
    fn from(value: BreakEven) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for BreakEven {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "N/A" {
            return Ok(BreakEven::NotReached);
        }
        value
            .strip_prefix("Year ")
            .and_then(|year| year.trim().parse::<u32>().ok())
            .map(BreakEven::Year)
            .ok_or_else(|| format!("invalid break-even label '{value}'"))
    }
}

/// Capacity figures, the yearly projection and the headline numbers drawn
/// from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub grazing_area_ha: f64,
    pub conservation_area_ha: f64,
    pub max_lsu: f64,
    pub financials: Vec<YearRecord>,
    pub break_even: BreakEven,
    pub year10_profit: f64,
    pub total_income: f64,
    pub total_expenses: f64,
}

impl ProjectionSummary {
    pub fn from_records(capacity: Capacity, financials: Vec<YearRecord>) -> Self {
        let break_even = financials
            .iter()
            .position(|year| year.cumulative_cash_flow >= 0.0)
            .map(|index| BreakEven::Year(index as u32 + 1))
            .unwrap_or(BreakEven::NotReached);
        let year10_profit = financials
            .get(9)
            .map(|year| year.net_cash_flow)
            .unwrap_or(0.0);
        let total_income = financials.iter().map(|year| year.income).sum();
        let total_expenses = financials.iter().map(|year| year.expenses).sum();

        Self {
            grazing_area_ha: capacity.grazing_area_ha,
            conservation_area_ha: capacity.conservation_area_ha,
            max_lsu: capacity.max_lsu,
            financials,
            break_even,
            year10_profit,
            total_income,
            total_expenses,
        }
    }
}
