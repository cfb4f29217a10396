pub(crate) mod common;
mod modules;
mod options;

use std::io::stdout;

use structopt::StructOpt;

use crate::common::{print_report, Run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = options::Command::from_args();
    let report = opt.run().await?;
    print_report(&report, stdout())
}
