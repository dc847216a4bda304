//! cross-validate: cross-table consistency checks over a generated
//! dataset.
//!
//! Usage:
//!   cross-validate --data ./data
//!
//! Exit code 0 when no failure-severity findings exist, 1 otherwise.

use anyhow::Result;
use snowtwin_core::{cross_validate::cross_validate, store::TableStore};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "./data".to_string());

    let store = TableStore::new(&data_dir);
    let bundle = store.load_bundle()?;

    let report = cross_validate(&bundle);
    print!("{}", report.render());

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
