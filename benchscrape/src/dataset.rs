use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use crate::{
    error::{Error, Result},
    schemas::{benchmark::BenchmarkRow, laptop::LaptopRecord},
};

pub const MODEL_COLUMN: &str = "Model";

/// Columns appended to the laptop list on output.
pub const ENRICHED_COLUMNS: &[&str] = &["quarry", "urls_quarry", "num_pages"];

pub const BENCHMARK_COLUMNS: &[&str] = &[
    "CPU Name",
    "Platform Name",
    "Single-core Score",
    "Multi-core Score",
    "quarry",
];

/// The laptop list: original headers plus one record per row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaptopTable {
    pub headers: Vec<String>,
    pub records: Vec<LaptopRecord>,
}

impl LaptopTable {
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        let model_idx = headers
            .iter()
            .position(|h| h.trim() == MODEL_COLUMN)
            .ok_or(Error::MissingColumn(MODEL_COLUMN))?;

        let mut records = Vec::new();
        for (i, row) in rdr.records().enumerate() {
            let mut columns: Vec<String> = row?.iter().map(String::from).collect();
            if columns.len() > headers.len() {
                log::warn!(
                    "laptop row {} has {} fields but the header has {}; dropping {:?}",
                    i + 1,
                    columns.len(),
                    headers.len(),
                    &columns[headers.len()..]
                );
            }
            columns.resize(headers.len(), String::new());
            let model = columns[model_idx].clone();
            records.push(LaptopRecord::new(model, columns));
        }

        Ok(Self { headers, records })
    }

    pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read(File::open(path)?)
    }

    /// Write the original columns followed by `quarry`, `urls_quarry` and
    /// `num_pages`. Anything unknown is left empty.
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(
            self.headers
                .iter()
                .map(String::as_str)
                .chain(ENRICHED_COLUMNS.iter().copied()),
        )?;

        for record in &self.records {
            let pages = record
                .page_count
                .map(|n| n.to_string())
                .unwrap_or_default();
            let extra = vec![
                record.query.as_deref().unwrap_or(""),
                record.search_url.as_deref().unwrap_or(""),
                pages.as_str(),
            ];
            wtr.write_record(record.columns.iter().map(String::as_str).chain(extra))?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write(File::create(path)?)
    }
}

/// Write benchmark rows. The header line is written even when there are no rows.
pub fn write_benchmarks<W: Write>(writer: W, rows: &[BenchmarkRow]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(BENCHMARK_COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_benchmarks_path<P: AsRef<Path>>(path: P, rows: &[BenchmarkRow]) -> Result<()> {
    write_benchmarks(File::create(path)?, rows)
}
