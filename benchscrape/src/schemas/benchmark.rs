use serde::{Deserialize, Serialize};

/// One CPU benchmark listing, tagged with the search URL it was found through.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BenchmarkRow {
    #[serde(rename = "CPU Name")]
    pub cpu_name: String,
    #[serde(rename = "Platform Name")]
    pub platform_name: String,
    #[serde(rename = "Single-core Score")]
    pub single_core_score: u32,
    #[serde(rename = "Multi-core Score")]
    pub multi_core_score: u32,
    /// The search URL this row was scraped from.
    pub quarry: String,
}
