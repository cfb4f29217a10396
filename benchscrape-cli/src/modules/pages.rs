use async_trait::async_trait;
use benchscrape::{common::PageSource, config::ScrapeConfig, modules::geekbench::pagination};
use serde::Serialize;
use structopt::StructOpt;

use crate::common::{Report, Run};

#[derive(StructOpt)]
pub struct Pages {
    /// A search URL, e.g. https://browser.geekbench.com/search?q=Apple+M1
    url: String,
}

#[derive(Serialize)]
struct PageCount {
    url: String,
    pages: u32,
}

#[async_trait]
impl Run for Pages {
    async fn run(&self) -> anyhow::Result<Report> {
        let mut source = ScrapeConfig::default().http_source()?;
        let html = source.fetch(&self.url).await?;
        let pages = pagination::count_pages(&html, &self.url)?;
        Ok(Box::new(PageCount {
            url: self.url.clone(),
            pages,
        }))
    }
}
