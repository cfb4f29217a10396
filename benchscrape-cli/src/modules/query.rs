use async_trait::async_trait;
use benchscrape::{config::GEEKBENCH_SEARCH, modules::geekbench::query};
use serde::Serialize;
use structopt::StructOpt;

use crate::common::{Report, Run};

#[derive(StructOpt)]
pub struct Query {
    /// Free-text laptop model, e.g. "Dell Inspiron 3511 Laptop (Core i5 11th Gen/ 8 GB)"
    model: String,
    /// Search endpoint the query is appended to [default: Geekbench browser]
    #[structopt(long)]
    base_url: Option<String>,
}

#[derive(Serialize)]
struct Derived {
    model: String,
    query: String,
    search_url: String,
}

#[async_trait]
impl Run for Query {
    async fn run(&self) -> anyhow::Result<Report> {
        let q = query::derive_query(&self.model)?;
        Ok(Box::new(Derived {
            model: self.model.clone(),
            search_url: query::search_url(
                self.base_url.as_deref().unwrap_or(GEEKBENCH_SEARCH),
                &q,
            ),
            query: q,
        }))
    }
}
