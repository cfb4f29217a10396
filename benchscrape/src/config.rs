use serde::Serialize;
use std::{path::PathBuf, time::Duration};

use crate::common::{Client, HttpSource, RetryPolicy, Throttle};

pub const GEEKBENCH_SEARCH: &str = "https://browser.geekbench.com/search?q=";

/// Knobs for one scraping run. [`ScrapeConfig::default`] is the stock run:
/// `laptops.csv` in, two CSVs out, 1.5-2.5s between requests.
#[derive(Serialize, Debug, Clone)]
pub struct ScrapeConfig {
    /// Search endpoint, up to and including `q=`.
    pub search_base: String,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub retry_attempts: u32,
    pub retry_base_delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub input: PathBuf,
    pub benchmarks_output: PathBuf,
    pub laptops_output: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            search_base: GEEKBENCH_SEARCH.to_string(),
            min_delay: Duration::from_millis(1500),
            max_delay: Duration::from_millis(2500),
            retry_attempts: 3,
            retry_base_delay: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
            user_agent: concat!("benchscrape/", env!("CARGO_PKG_VERSION")).to_string(),
            input: PathBuf::from("laptops.csv"),
            benchmarks_output: PathBuf::from("geekbench_data_full_quarry.csv"),
            laptops_output: PathBuf::from("laptops_quarry_full_quarry.csv"),
        }
    }
}

impl ScrapeConfig {
    pub fn throttle(&self) -> Throttle {
        Throttle::new(self.min_delay, self.max_delay)
    }

    pub fn retry(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, self.retry_base_delay)
    }

    /// An [`HttpSource`] set up according to this config.
    pub fn http_source(&self) -> crate::Result<HttpSource> {
        let client = Client::new(&self.user_agent, self.timeout)?;
        Ok(HttpSource::new(client, self.throttle(), self.retry()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ScrapeConfig;

    #[test]
    fn test_defaults() {
        let config = ScrapeConfig::default();
        assert_eq!(config.search_base, "https://browser.geekbench.com/search?q=");
        assert_eq!(config.throttle().max(), Duration::from_millis(2500));
        assert_eq!(config.retry().attempts, 3);
        assert_eq!(config.input.to_str(), Some("laptops.csv"));
    }
}
