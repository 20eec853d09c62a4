use std::str::FromStr;

use miette::{miette, IntoDiagnostic, Result};
use thermo::Log;

fn main() -> Result<()> {
    let mut files = std::env::args().skip(1);
    let first = files.next().expect("Missing filenames");
    println!("opening {first}");
    let content = std::fs::read_to_string(&first).into_diagnostic()?;
    let mut log = Log::from_str(&content)?;

    for file in files {
        println!("merging {file}");
        let content = std::fs::read_to_string(&file).into_diagnostic()?;
        let other = Log::from_str(&content)?;
        log.merge(other).map_err(|e| miette!("{e}"))?;
    }

    let stats = log.stats();
    println!(
        "Summary for {} over {} observations, in ºF:",
        log.header.name,
        log.observations.len()
    );
    println!("  average: {:.1}", stats.average);
    println!("  max:     {:.1}", stats.max);
    println!("  min:     {:.1}", stats.min);

    Ok(())
}
