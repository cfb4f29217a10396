use serde::Serialize;

/// One row of the laptop list, enriched as it moves through the pipeline.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct LaptopRecord {
    pub model: String,
    /// Every column of the input row, in input order.
    #[serde(skip)]
    pub columns: Vec<String>,
    pub query: Option<String>,
    pub search_url: Option<String>,
    /// `None` when the row has no query, or its URL was never counted.
    pub page_count: Option<u32>,
}

impl LaptopRecord {
    pub fn new<S: Into<String>>(model: S, columns: Vec<String>) -> Self {
        Self {
            model: model.into(),
            columns,
            ..Self::default()
        }
    }

    pub fn has_matches(&self) -> bool {
        self.page_count.map_or(false, |n| n > 0)
    }
}

/// The paginated URLs of one search.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PageJob {
    pub base_query_url: String,
    /// Page `n` lives at index `n - 1`.
    pub page_urls: Vec<String>,
}

/// Raw HTML of one result page. Only lives until it has been extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    pub base_query_url: String,
    pub page_number: u32,
    pub url: String,
    pub html: String,
}
