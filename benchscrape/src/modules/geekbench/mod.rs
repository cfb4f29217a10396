//! Matching laptops to CPU scores on the Geekbench browser.
//!
//! A run goes: derive a search query per laptop ([`query`]), count the result
//! pages of every distinct search ([`pagination`]), download all those pages
//! ([`fetch`]), and read the listings off them ([`extract`]).

pub mod extract;
pub mod fetch;
pub mod pagination;
pub mod query;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    common::PageSource,
    config::ScrapeConfig,
    dataset::{write_benchmarks_path, LaptopTable},
    error::Result,
    schemas::{benchmark::BenchmarkRow, laptop::LaptopRecord},
};

/// One listing entry on a search results page.
pub(crate) const LISTING_ENTRY: &str = "div.col-12.list-col";

/// Counts describing a finished run.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub laptops: usize,
    pub query_failures: usize,
    pub unique_queries: usize,
    pub matched_queries: usize,
    pub matched_laptops: usize,
    /// Share of laptops with at least one result page, in percent.
    pub match_percent: f64,
    pub pages_fetched: usize,
    pub benchmark_rows: usize,
    pub rejected_entries: usize,
}

/// Everything a run produces, before it is written anywhere.
#[derive(Debug)]
pub struct Scraped {
    pub laptops: LaptopTable,
    pub benchmarks: Vec<BenchmarkRow>,
    pub summary: RunSummary,
}

/// Fill in the query and search URL of every record. Records whose model
/// cannot be turned into a query are logged and left without one.
///
/// Returns the number of such records.
pub fn derive_queries(records: &mut [LaptopRecord], search_base: &str) -> usize {
    let mut failures = 0;
    for record in records.iter_mut() {
        match query::derive_query(&record.model) {
            Ok(q) => {
                record.search_url = Some(query::search_url(search_base, &q));
                record.query = Some(q);
            }
            Err(err) => {
                log::warn!("{}", err);
                record.query = None;
                record.search_url = None;
                failures += 1;
            }
        }
    }
    failures
}

/// Run the whole pipeline over `laptops`, fetching through `source`.
///
/// # Errors
/// Errors if a page could not be fetched, or a search results page could not
/// be paginated.
pub async fn scrape<S>(
    source: &mut S,
    mut laptops: LaptopTable,
    config: &ScrapeConfig,
) -> Result<Scraped>
where
    S: PageSource + Send,
{
    let started_at = Utc::now();

    let query_failures = derive_queries(&mut laptops.records, &config.search_base);
    let urls: Vec<String> = laptops
        .records
        .iter()
        .filter_map(|r| r.search_url.clone())
        .collect();

    let counts = pagination::find_max_pages(source, &urls).await?;
    let matched_laptops = counts.apply(&mut laptops.records);
    let match_percent = if laptops.records.is_empty() {
        0.0
    } else {
        matched_laptops as f64 / laptops.records.len() as f64 * 100.0
    };
    log::info!(
        "This scraping method accounts for {} of {} laptops, yielding {:.3}% scraping success",
        matched_laptops,
        laptops.records.len(),
        match_percent
    );

    let jobs = fetch::page_jobs(&counts);
    let page_total: usize = jobs.iter().map(|j| j.page_urls.len()).sum();
    log::info!("There are {} urls to be formatted for scraping", jobs.len());
    log::info!(
        "There are {} urls to scrape, this will take around {:.1} minutes to complete",
        page_total,
        page_total as f64 * config.throttle().max().as_secs_f64() / 60.0
    );

    let pages = fetch::scrape_pages(source, &jobs).await?;
    log::info!("Scraping done");
    let pages_fetched = pages.len();
    let extraction = extract::extract_all(pages);

    let summary = RunSummary {
        started_at,
        finished_at: Utc::now(),
        laptops: laptops.records.len(),
        query_failures,
        unique_queries: counts.len(),
        matched_queries: jobs.len(),
        matched_laptops,
        match_percent,
        pages_fetched,
        benchmark_rows: extraction.rows.len(),
        rejected_entries: extraction.rejected,
    };

    Ok(Scraped {
        laptops,
        benchmarks: extraction.rows,
        summary,
    })
}

/// The stock run: read the laptop list named in `config`, scrape Geekbench
/// over HTTP, and write both output CSVs.
///
/// # Errors
/// Errors if reading or writing a file fails, or if [`scrape`] fails.
pub async fn run(config: &ScrapeConfig) -> Result<RunSummary> {
    let laptops = LaptopTable::read_path(&config.input)?;
    log::info!(
        "Read {} laptops from {}",
        laptops.records.len(),
        config.input.display()
    );

    let mut source = config.http_source()?;
    let scraped = scrape(&mut source, laptops, config).await?;

    write_benchmarks_path(&config.benchmarks_output, &scraped.benchmarks)?;
    scraped.laptops.write_path(&config.laptops_output)?;
    log::info!(
        "Wrote {} and {}",
        config.benchmarks_output.display(),
        config.laptops_output.display()
    );

    Ok(scraped.summary)
}
