use std::str::FromStr;

use miette::{IntoDiagnostic, Result};
use thermo::Log;

fn main() -> Result<()> {
    let file = std::env::args().nth(1).expect("Missing filename");
    println!("opening {file}");
    let file = std::fs::read_to_string(file).into_diagnostic()?;

    let log = Log::from_str(&file)?;
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
