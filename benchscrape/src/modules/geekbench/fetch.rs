use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

use crate::{
    common::PageSource,
    error::Result,
    modules::geekbench::pagination::PageCounts,
    schemas::laptop::{PageJob, ScrapedPage},
};

lazy_static! {
    static ref RE_SEARCH: Regex = Regex::new(r"search\?").unwrap();
}

/// Spell out the URL of every result page of one search, pages `1..=pages`.
///
/// `https://host/search?q=x` becomes `https://host/search?page=2&q=x` and so on.
pub fn page_job(base_query_url: &str, pages: u32) -> PageJob {
    let page_urls = (1..=pages)
        .map(|n| {
            let marker = format!("search?page={}&", n);
            RE_SEARCH
                .replace(base_query_url, NoExpand(&marker))
                .into_owned()
        })
        .collect();

    PageJob {
        base_query_url: base_query_url.to_string(),
        page_urls,
    }
}

/// One [`PageJob`] per search that has at least one result page.
pub fn page_jobs(counts: &PageCounts) -> Vec<PageJob> {
    counts
        .iter()
        .filter(|(_, pages)| *pages > 0)
        .map(|(url, pages)| page_job(url, pages))
        .collect()
}

/// Download every page of every job, one request at a time.
///
/// # Errors
/// Errors on the first page that could not be fetched.
pub async fn scrape_pages<S>(source: &mut S, jobs: &[PageJob]) -> Result<Vec<ScrapedPage>>
where
    S: PageSource + Send,
{
    let mut scraped = Vec::with_capacity(jobs.iter().map(|j| j.page_urls.len()).sum());

    for (i, job) in jobs.iter().enumerate() {
        for (n, url) in job.page_urls.iter().enumerate() {
            let html = source.fetch(url).await?;
            scraped.push(ScrapedPage {
                base_query_url: job.base_query_url.clone(),
                page_number: n as u32 + 1,
                url: url.clone(),
                html,
            });
        }
        let done = i + 1;
        log::info!(
            "{} success {}, out of {}. {:.1}% complete",
            job.base_query_url,
            done,
            jobs.len(),
            done as f64 / jobs.len() as f64 * 100.0
        );
    }

    Ok(scraped)
}

#[cfg(test)]
mod tests {
    use super::{page_job, page_jobs, scrape_pages};
    use crate::modules::geekbench::{pagination::PageCounts, tests::MockSource};

    #[test]
    fn test_page_job() {
        let job = page_job("https://browser.geekbench.com/search?q=Apple+M1", 3);
        assert_eq!(job.base_query_url, "https://browser.geekbench.com/search?q=Apple+M1");
        assert_eq!(
            job.page_urls,
            vec![
                "https://browser.geekbench.com/search?page=1&q=Apple+M1",
                "https://browser.geekbench.com/search?page=2&q=Apple+M1",
                "https://browser.geekbench.com/search?page=3&q=Apple+M1",
            ]
        );
        assert!(page_job("https://browser.geekbench.com/search?q=x", 0)
            .page_urls
            .is_empty());
    }

    #[test]
    fn test_page_job_numbering_has_no_gaps() {
        let job = page_job("https://x/search?q=y", 25);
        assert_eq!(job.page_urls.len(), 25);
        for (i, url) in job.page_urls.iter().enumerate() {
            assert_eq!(url, &format!("https://x/search?page={}&q=y", i + 1));
        }
    }

    #[test]
    fn test_page_jobs_skip_empty_searches() {
        let mut counts = PageCounts::default();
        counts.insert("https://x/search?q=a".to_string(), 2);
        counts.insert("https://x/search?q=b".to_string(), 0);
        counts.insert("https://x/search?q=c".to_string(), 1);

        let jobs = page_jobs(&counts);
        assert_eq!(
            jobs.iter().map(|j| j.base_query_url.as_str()).collect::<Vec<_>>(),
            vec!["https://x/search?q=a", "https://x/search?q=c"]
        );
        assert_eq!(jobs[0].page_urls.len(), 2);
        assert_eq!(jobs[1].page_urls.len(), 1);
    }

    #[tokio::test]
    async fn test_scrape_pages() {
        let mut source = MockSource::new(maplit::hashmap! {
            "https://x/search?page=1&q=a".to_string() => "a1".to_string(),
            "https://x/search?page=2&q=a".to_string() => "a2".to_string(),
            "https://x/search?page=1&q=c".to_string() => "c1".to_string(),
        });
        let jobs = vec![page_job("https://x/search?q=a", 2), page_job("https://x/search?q=c", 1)];

        let pages = scrape_pages(&mut source, &jobs).await.unwrap();

        assert_eq!(
            pages
                .iter()
                .map(|p| (p.base_query_url.as_str(), p.page_number, p.html.as_str()))
                .collect::<Vec<_>>(),
            vec![
                ("https://x/search?q=a", 1, "a1"),
                ("https://x/search?q=a", 2, "a2"),
                ("https://x/search?q=c", 1, "c1"),
            ]
        );
        assert_eq!(
            source.requests(),
            &[
                "https://x/search?page=1&q=a",
                "https://x/search?page=2&q=a",
                "https://x/search?page=1&q=c",
            ]
        );
    }
}
