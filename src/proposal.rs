use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

fn default_total_farm_size() -> f64 {
    2000.0
}

fn default_conservation_percentage() -> f64 {
    20.0
}

fn default_lsu_per_hectare() -> f64 {
    0.17
}

fn default_foundation_cows() -> f64 {
    50.0
}

fn default_foundation_bulls() -> f64 {
    3.0
}

fn default_weaning_percentage() -> f64 {
    90.0
}

fn default_cow_replacement_rate() -> f64 {
    15.0
}

fn default_stud_bull_price() -> f64 {
    80_000.0
}

fn default_stud_heifer_price() -> f64 {
    40_000.0
}

fn default_weaner_price_per_kg() -> f64 {
    38.0
}

fn default_cull_cow_price() -> f64 {
    9_000.0
}

fn default_avg_weaning_weight() -> f64 {
    240.0
}

fn default_monthly_labour_cost() -> f64 {
    25_000.0
}

fn default_infrastructure_budget() -> f64 {
    500_000.0
}

fn default_livestock_startup_cost() -> f64 {
    800_000.0
}

fn default_vet_cost_per_head() -> f64 {
    350.0
}

fn default_feed_cost_per_head() -> f64 {
    1_100.0
}

fn default_farm_name() -> String {
    "Boer Bonsmara Boerdery".to_string()
}

fn default_farm_location() -> String {
    "Alldays, Limpopo".to_string()
}

fn default_farm_price() -> f64 {
    5_000_000.0
}

/// Every numeric parameter the projection engine reads.
///
/// Percentages are plain numbers in `[0, 100]`; prices and costs are in rand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalInput {
    #[serde(default = "default_total_farm_size")]
    pub total_farm_size_ha: f64,
    #[serde(default = "default_conservation_percentage")]
    pub conservation_percentage: f64,
    #[serde(default = "default_lsu_per_hectare")]
    pub lsu_per_hectare: f64,
    #[serde(default = "default_foundation_cows")]
    pub foundation_cows: f64,
    #[serde(default = "default_foundation_bulls")]
    pub foundation_bulls: f64,
    #[serde(default = "default_weaning_percentage")]
    pub weaning_percentage: f64,
    #[serde(default = "default_cow_replacement_rate")]
    pub cow_replacement_rate: f64,
    #[serde(default = "default_stud_bull_price")]
    pub stud_bull_price: f64,
    #[serde(default = "default_stud_heifer_price")]
    pub stud_heifer_price: f64,
    #[serde(default = "default_weaner_price_per_kg")]
    pub weaner_price_per_kg: f64,
    #[serde(default = "default_cull_cow_price")]
    pub cull_cow_price: f64,
    #[serde(default = "default_avg_weaning_weight")]
    pub avg_weaning_weight_kg: f64,
    #[serde(default = "default_monthly_labour_cost")]
    pub monthly_labour_cost: f64,
    #[serde(default = "default_infrastructure_budget")]
    pub infrastructure_budget: f64,
    #[serde(default = "default_livestock_startup_cost")]
    pub livestock_startup_cost: f64,
    #[serde(default = "default_vet_cost_per_head")]
    pub vet_cost_per_head: f64,
    #[serde(default = "default_feed_cost_per_head")]
    pub feed_cost_per_head: f64,
}

impl Default for ProposalInput {
    fn default() -> Self {
        Self {
            total_farm_size_ha: default_total_farm_size(),
            conservation_percentage: default_conservation_percentage(),
            lsu_per_hectare: default_lsu_per_hectare(),
            foundation_cows: default_foundation_cows(),
            foundation_bulls: default_foundation_bulls(),
            weaning_percentage: default_weaning_percentage(),
            cow_replacement_rate: default_cow_replacement_rate(),
            stud_bull_price: default_stud_bull_price(),
            stud_heifer_price: default_stud_heifer_price(),
            weaner_price_per_kg: default_weaner_price_per_kg(),
            cull_cow_price: default_cull_cow_price(),
            avg_weaning_weight_kg: default_avg_weaning_weight(),
            monthly_labour_cost: default_monthly_labour_cost(),
            infrastructure_budget: default_infrastructure_budget(),
            livestock_startup_cost: default_livestock_startup_cost(),
            vet_cost_per_head: default_vet_cost_per_head(),
            feed_cost_per_head: default_feed_cost_per_head(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("field '{field}' must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

impl ProposalInput {
    /// A proposal with every numeric field at zero.
    pub fn zeroed() -> Self {
        Self::from_loose_json(&Value::Null)
    }

    pub fn fields(&self) -> [(&'static str, f64); 17] {
        [
            ("total_farm_size_ha", self.total_farm_size_ha),
            ("conservation_percentage", self.conservation_percentage),
            ("lsu_per_hectare", self.lsu_per_hectare),
            ("foundation_cows", self.foundation_cows),
            ("foundation_bulls", self.foundation_bulls),
            ("weaning_percentage", self.weaning_percentage),
            ("cow_replacement_rate", self.cow_replacement_rate),
            ("stud_bull_price", self.stud_bull_price),
            ("stud_heifer_price", self.stud_heifer_price),
            ("weaner_price_per_kg", self.weaner_price_per_kg),
            ("cull_cow_price", self.cull_cow_price),
            ("avg_weaning_weight_kg", self.avg_weaning_weight_kg),
            ("monthly_labour_cost", self.monthly_labour_cost),
            ("infrastructure_budget", self.infrastructure_budget),
            ("livestock_startup_cost", self.livestock_startup_cost),
            ("vet_cost_per_head", self.vet_cost_per_head),
            ("feed_cost_per_head", self.feed_cost_per_head),
        ]
    }

    /// Rejects NaN and infinite fields. Range is not checked: negative or
    /// oversized percentages are legal and handled by the engine.
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(InputError::NonFinite { field, value });
            }
        }
        Ok(())
    }

    /// Builds an input from untrusted form data. Numbers and numeric strings
    /// are taken as-is; anything else, including missing keys, reads as zero.
    pub fn from_loose_json(value: &Value) -> Self {
        let num = |key: &str| loose_number(value.get(key));
        Self {
            total_farm_size_ha: num("total_farm_size_ha"),
            conservation_percentage: num("conservation_percentage"),
            lsu_per_hectare: num("lsu_per_hectare"),
            foundation_cows: num("foundation_cows"),
            foundation_bulls: num("foundation_bulls"),
            weaning_percentage: num("weaning_percentage"),
            cow_replacement_rate: num("cow_replacement_rate"),
            stud_bull_price: num("stud_bull_price"),
            stud_heifer_price: num("stud_heifer_price"),
            weaner_price_per_kg: num("weaner_price_per_kg"),
            cull_cow_price: num("cull_cow_price"),
            avg_weaning_weight_kg: num("avg_weaning_weight_kg"),
            monthly_labour_cost: num("monthly_labour_cost"),
            infrastructure_budget: num("infrastructure_budget"),
            livestock_startup_cost: num("livestock_startup_cost"),
            vet_cost_per_head: num("vet_cost_per_head"),
            feed_cost_per_head: num("feed_cost_per_head"),
        }
    }

    /// Up-front capital: infrastructure plus livestock purchase.
    pub fn initial_outlay(&self) -> f64 {
        self.infrastructure_budget + self.livestock_startup_cost
    }
}

fn loose_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// A named farm proposal: descriptive metadata plus the flat engine input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_farm_name")]
    pub farm_name: String,
    #[serde(default = "default_farm_location")]
    pub farm_location: String,
    #[serde(default = "default_farm_price")]
    pub farm_price: f64,
    #[serde(flatten)]
    pub input: ProposalInput,
}

impl Proposal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            farm_name: default_farm_name(),
            farm_location: default_farm_location(),
            farm_price: default_farm_price(),
            input: ProposalInput::default(),
        }
    }
}
