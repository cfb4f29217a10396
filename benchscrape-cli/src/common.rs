use async_trait::async_trait;
use std::io::Write;

/// Whatever a subcommand produced, ready to be printed.
pub type Report = Box<dyn erased_serde::Serialize + Send>;

#[async_trait]
pub trait Run {
    async fn run(&self) -> anyhow::Result<Report>;
}

/// Write `report` to `out` as pretty JSON on its own line.
pub fn print_report<W: Write>(report: &Report, out: W) -> anyhow::Result<()> {
    let mut json = serde_json::Serializer::pretty(out);
    serde::Serialize::serialize(&**report, &mut json)?;
    let mut out = json.into_inner();
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
