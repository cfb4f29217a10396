pub mod pages;
pub mod query;
pub mod scrape;
