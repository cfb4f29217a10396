use std::collections::{HashMap, HashSet};

use crate::{
    common::PageSource,
    error::{Error, Result},
    html::Scope,
    modules::geekbench::LISTING_ENTRY,
    schemas::laptop::LaptopRecord,
};

const PAGE_LINK: &str = "a.page-link";

/// Number of result pages behind a search, read off its first page.
///
/// Geekbench follows the highest numbered page link with one more navigation
/// link, so the page count is the label of the second-to-last pagination link.
pub fn count_pages(html: &str, url: &str) -> Result<u32> {
    let document = Scope::parse(html);

    if !document.exists(LISTING_ENTRY) {
        return Ok(0);
    }

    let links = document.texts(PAGE_LINK);
    match links.len() {
        0 => Ok(1),
        1 => Err(Error::parse(url, "a lone pagination link")),
        n => {
            let label = &links[n - 2];
            label.parse::<u32>().map_err(|_| {
                Error::parse(url, format!("pagination label {:?} is not a number", label))
            })
        }
    }
}

/// Page counts per search URL, in the order the URLs were first seen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageCounts {
    order: Vec<String>,
    counts: HashMap<String, u32>,
}

impl PageCounts {
    pub fn get(&self, url: &str) -> Option<u32> {
        self.counts.get(url).copied()
    }

    pub fn insert(&mut self, url: String, pages: u32) {
        if self.counts.insert(url.clone(), pages).is_none() {
            self.order.push(url);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.order
            .iter()
            .map(move |url| (url.as_str(), self.counts[url]))
    }

    /// Fill in [`LaptopRecord::page_count`] for every record whose search URL
    /// was counted. Returns how many records have at least one page.
    pub fn apply(&self, records: &mut [LaptopRecord]) -> usize {
        for record in records.iter_mut() {
            record.page_count = record.search_url.as_deref().and_then(|url| {
                let count = self.get(url);
                if count.is_none() {
                    log::debug!("{}: Does not exist", url);
                }
                count
            });
        }
        records.iter().filter(|r| r.has_matches()).count()
    }
}

/// Visit every distinct URL once and count its result pages.
///
/// # Errors
/// Stops at the first URL that could not be fetched or understood.
pub async fn find_max_pages<S, I>(source: &mut S, urls: I) -> Result<PageCounts>
where
    S: PageSource + Send,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    let unique: Vec<String> = urls
        .into_iter()
        .map(|u| u.as_ref().to_string())
        .filter(|u| seen.insert(u.clone()))
        .collect();

    log::info!("Running find_max_pages on {} unique urls", unique.len());

    let mut counts = PageCounts::default();
    for url in unique {
        let html = source.fetch(&url).await?;
        let pages = count_pages(&html, &url)?;
        match pages {
            0 => log::info!("{} has no matches", url),
            1 => log::info!("{} has 1 page", url),
            n => log::info!("{} has {} pages", url, n),
        }
        counts.insert(url, pages);
    }
    Ok(counts)
}
