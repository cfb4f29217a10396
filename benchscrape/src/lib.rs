//! Scrapes the Geekbench browser for CPU benchmark listings matching laptop
//! model names, and turns them into a clean dataset of single- and multi-core
//! scores.

pub mod common;
pub mod config;
pub mod dataset;
pub mod error;
pub mod html;

pub mod schemas {
    pub mod benchmark;
    pub mod laptop;
}

pub mod modules {
    pub mod geekbench;
}

pub use chrono;
pub use error::{Error, Result};
