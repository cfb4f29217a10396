use async_trait::async_trait;
use structopt::StructOpt;

use crate::{
    common::{Report, Run},
    modules::{pages::Pages, query::Query, scrape::Scrape},
};

/// Match laptop models to CPU benchmark scores from the Geekbench browser.
#[derive(StructOpt)]
#[structopt(name = "benchscrape-cli")]
pub enum Command {
    /// Run the whole pipeline over a laptop list and write both CSVs.
    Scrape(Scrape),
    /// Show the search query and URL derived from one model string.
    Query(Query),
    /// Count the result pages behind one search URL.
    Pages(Pages),
}

#[async_trait]
impl Run for Command {
    async fn run(&self) -> anyhow::Result<Report> {
        match self {
            Self::Scrape(s) => s.run().await,
            Self::Query(q) => q.run().await,
            Self::Pages(p) => p.run().await,
        }
    }
}
