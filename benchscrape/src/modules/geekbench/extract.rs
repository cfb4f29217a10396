use std::collections::HashSet;

use crate::{
    common::parse_score,
    error::{Error, Result},
    html::Scope,
    modules::geekbench::LISTING_ENTRY,
    schemas::{benchmark::BenchmarkRow, laptop::ScrapedPage},
};

const CPU_NAME: &str = "div.col-lg-4 span.list-col-model";
/// Upload date and platform share this class; they alternate date, platform.
const ENTRY_TEXT: &str = "span.list-col-text";
/// Single-core score first, multi-core second.
const ENTRY_SCORE: &str = "span.list-col-text-score";

/// What came out of one results page.
#[derive(Debug, Default)]
pub struct PageExtract {
    pub rows: Vec<BenchmarkRow>,
    /// Entries that were skipped, and why.
    pub rejected: Vec<Error>,
}

/// Read every listing entry on a results page into a [`BenchmarkRow`] tagged with `quarry`.
///
/// Entries are handled one at a time, so a malformed entry is rejected on its
/// own and never shifts fields into its neighbours.
pub fn extract_page(html: &str, quarry: &str) -> PageExtract {
    let document = Scope::parse(html);
    let mut extract = PageExtract::default();

    for (i, entry) in document.select_all(LISTING_ENTRY).iter().enumerate() {
        match extract_entry(entry, i + 1, quarry) {
            Ok(row) => extract.rows.push(row),
            Err(err) => {
                log::warn!("skipping listing entry: {}", err);
                extract.rejected.push(err);
            }
        }
    }

    extract
}

fn extract_entry(entry: &Scope, index: usize, quarry: &str) -> Result<BenchmarkRow> {
    let names = entry.texts(CPU_NAME);
    let platforms: Vec<String> = entry
        .texts(ENTRY_TEXT)
        .into_iter()
        .enumerate()
        .filter(|(n, _)| n % 2 == 1)
        .map(|(_, text)| text)
        .collect();
    let scores = entry.texts(ENTRY_SCORE);

    match (names.as_slice(), platforms.as_slice(), scores.as_slice()) {
        ([name], [platform], [single, multi]) => {
            let score = |text: &str| {
                parse_score(text).ok_or_else(|| {
                    Error::parse(
                        format!("listing entry #{} in {}", index, quarry),
                        format!("score {:?} is not a number", text),
                    )
                })
            };
            Ok(BenchmarkRow {
                cpu_name: name.clone(),
                platform_name: platform.clone(),
                single_core_score: score(single.as_str())?,
                multi_core_score: score(multi.as_str())?,
                quarry: quarry.to_string(),
            })
        }
        _ => Err(Error::Alignment {
            quarry: quarry.to_string(),
            entry: index,
            names: names.len(),
            platforms: platforms.len(),
            scores: scores.len(),
        }),
    }
}

/// Drop exact duplicates, keeping the first occurrence of each row.
pub fn dedup_rows(rows: Vec<BenchmarkRow>) -> Vec<BenchmarkRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub rows: Vec<BenchmarkRow>,
    pub rejected: usize,
}

/// Extract every scraped page, then deduplicate. Pages are dropped as soon as
/// they have been read.
pub fn extract_all<I>(pages: I) -> Extraction
where
    I: IntoIterator<Item = ScrapedPage>,
{
    let mut rows = Vec::new();
    let mut rejected = 0;

    for page in pages {
        let extract = extract_page(&page.html, &page.base_query_url);
        log::debug!(
            "{}: {} row(s), {} rejected",
            page.url,
            extract.rows.len(),
            extract.rejected.len()
        );
        rows.extend(extract.rows);
        rejected += extract.rejected.len();
    }

    let total = rows.len();
    let rows = dedup_rows(rows);
    log::info!(
        "Extracted {} unique rows ({} duplicates dropped, {} entries rejected)",
        rows.len(),
        total - rows.len(),
        rejected
    );

    Extraction { rows, rejected }
}
