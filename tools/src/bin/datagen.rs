//! datagen: headless generation pipeline for the snowtwin dataset.
//!
//! Usage:
//!   datagen --customers 1000000 --seed 42 --out ./data
//!   datagen --customers 50000 --zones 5000 --stream-usage

use anyhow::Result;
use snowtwin_core::{
    config::{GenConfig, DEFAULT_SEED},
    pipeline::Pipeline,
    store::TableStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = GenConfig::default();
    config.total_customers = parse_arg(&args, "--customers", config.total_customers);
    config.zones = parse_arg(&args, "--zones", config.zones);
    config.dmas = parse_arg(&args, "--dmas", config.dmas);
    let seed = parse_arg(&args, "--seed", DEFAULT_SEED);
    let stream_usage = args.iter().any(|a| a == "--stream-usage");
    let out_dir = args
        .windows(2)
        .find(|w| w[0] == "--out")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "./data".to_string());

    println!("snowtwin datagen");
    println!("  seed:       {seed}");
    println!("  customers:  {}", config.total_customers);
    println!("  zones:      {}", config.zones);
    println!("  dmas:       {}", config.dmas);
    println!("  out:        {out_dir}");
    println!("  streaming:  {stream_usage}");
    println!();

    let store = TableStore::new(&out_dir);
    let pipeline = Pipeline::new(config, seed);

    let (bundle, usage_rows) = if stream_usage {
        // Usage goes straight to disk; the other seven tables are
        // small enough to materialize.
        let mut writer = store.usage_writer()?;
        let mut write_err = None;
        let bundle = pipeline.run_with_usage_sink(|record| {
            if write_err.is_none() {
                if let Err(e) = writer.append(&record) {
                    write_err = Some(e);
                }
            }
        })?;
        if let Some(e) = write_err {
            return Err(e.into());
        }
        let rows = writer.finish()?;
        (bundle, Some(rows))
    } else {
        (pipeline.run()?, None)
    };

    store.write_bundle(&bundle, seed, usage_rows)?;

    let usage_count = usage_rows.unwrap_or(bundle.usage.len());
    println!("=== GENERATION COMPLETE ===");
    println!("  zones:         {}", bundle.zones.len());
    println!("  markets:       {}", bundle.markets.len());
    println!("  customers:     {}", bundle.customers.len());
    println!("  usage rows:    {usage_count}");
    println!("  interactions:  {}", bundle.interactions.len());
    println!("  campaigns:     {}", bundle.campaigns.len());
    println!("  total records: {}", bundle.total_records() + usage_count);
    println!("  output:        {}", store.root().display());

    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
