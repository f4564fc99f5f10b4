use serde::{Deserialize, Serialize};

use crate::proposal::ProposalInput;

/// Land split and the livestock-unit ceiling it supports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    pub grazing_area_ha: f64,
    pub conservation_area_ha: f64,
    pub max_lsu: f64,
}

impl Capacity {
    pub fn new(total_farm_size_ha: f64, conservation_percentage: f64, lsu_per_hectare: f64) -> Self {
        let conservation_area_ha = total_farm_size_ha * (conservation_percentage / 100.0);
        let grazing_area_ha = total_farm_size_ha - conservation_area_ha;
        Self {
            grazing_area_ha,
            conservation_area_ha,
            max_lsu: grazing_area_ha * lsu_per_hectare,
        }
    }

    pub fn from_input(input: &ProposalInput) -> Self {
        Self::new(
            input.total_farm_size_ha,
            input.conservation_percentage,
            input.lsu_per_hectare,
        )
    }
}
