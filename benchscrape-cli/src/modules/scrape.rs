use anyhow::anyhow;
use async_trait::async_trait;
use benchscrape::{config::ScrapeConfig, modules::geekbench};
use std::{path::PathBuf, time::Duration};
use structopt::StructOpt;

use crate::common::{Report, Run};

#[derive(StructOpt)]
pub struct Scrape {
    /// Laptop list with a `Model` column [default: laptops.csv]
    #[structopt(long, parse(from_os_str))]
    input: Option<PathBuf>,
    /// Where to write the benchmark rows [default: geekbench_data_full_quarry.csv]
    #[structopt(long, parse(from_os_str))]
    benchmarks: Option<PathBuf>,
    /// Where to write the enriched laptop list [default: laptops_quarry_full_quarry.csv]
    #[structopt(long, parse(from_os_str))]
    laptops: Option<PathBuf>,
    /// Shortest pause before a request, in seconds [default: 1.5]
    #[structopt(long)]
    min_delay: Option<f64>,
    /// Longest pause before a request, in seconds [default: 2.5]
    #[structopt(long)]
    max_delay: Option<f64>,
    /// Tries per request before giving up [default: 3]
    #[structopt(long)]
    retries: Option<u32>,
    /// Search endpoint, up to and including `q=`
    #[structopt(long)]
    base_url: Option<String>,
}

fn seconds(secs: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|err| anyhow!("delay of {} seconds is not usable: {}", secs, err))
}

impl Scrape {
    fn config(&self) -> anyhow::Result<ScrapeConfig> {
        let mut config = ScrapeConfig::default();
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(path) = &self.benchmarks {
            config.benchmarks_output = path.clone();
        }
        if let Some(path) = &self.laptops {
            config.laptops_output = path.clone();
        }
        if let Some(secs) = self.min_delay {
            config.min_delay = seconds(secs)?;
        }
        if let Some(secs) = self.max_delay {
            config.max_delay = seconds(secs)?;
        }
        if let Some(retries) = self.retries {
            config.retry_attempts = retries;
        }
        if let Some(base) = &self.base_url {
            config.search_base = base.clone();
        }
        Ok(config)
    }
}

#[async_trait]
impl Run for Scrape {
    async fn run(&self) -> anyhow::Result<Report> {
        let config = self.config()?;
        let summary = geekbench::run(&config).await?;
        Ok(Box::new(summary))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use structopt::StructOpt;

    use super::Scrape;

    #[test]
    fn test_defaults_match_fixed_run() {
        let scrape = Scrape::from_iter(vec!["scrape"]);
        let config = scrape.config().unwrap();
        assert_eq!(config.input.to_str(), Some("laptops.csv"));
        assert_eq!(config.min_delay, Duration::from_millis(1500));
        assert_eq!(config.max_delay, Duration::from_millis(2500));
    }

    #[test]
    fn test_overrides() {
        let scrape = Scrape::from_iter(vec![
            "scrape",
            "--input",
            "in.csv",
            "--min-delay",
            "0",
            "--max-delay",
            "0.5",
            "--retries",
            "1",
        ]);
        let config = scrape.config().unwrap();
        assert_eq!(config.input.to_str(), Some("in.csv"));
        assert_eq!(config.min_delay, Duration::ZERO);
        assert_eq!(config.max_delay, Duration::from_millis(500));
        assert_eq!(config.retry_attempts, 1);
    }

    #[test]
    fn test_rejects_negative_delay() {
        let scrape = Scrape::from_iter(vec!["scrape", "--min-delay=-1"]);
        assert!(scrape.config().is_err());
    }

    #[test]
    fn test_rejects_unrepresentable_delay() {
        for delay in ["--max-delay=1e30", "--min-delay=inf", "--min-delay=NaN"] {
            let scrape = Scrape::from_iter(vec!["scrape", delay]);
            assert!(scrape.config().is_err(), "{} was accepted", delay);
        }
    }
}
