use pathwalk_core::{model, WalkDriver, WalkLog};

use super::super::args::ReplayArgs;
use super::super::console::ConsoleListener;
use super::write_report;
use crate::exit_codes;

pub fn run(args: ReplayArgs) -> anyhow::Result<i32> {
    println!(
        "Pathwalk has started to replay the walk file {}.",
        args.walk.display()
    );

    let log = WalkLog::read(&args.walk)?;
    let mut driver = WalkDriver::new();
    if let Some(spec) = &args.model {
        driver = driver.with_model(model::resolve(spec)?);
    }

    let mut console = ConsoleListener::stdout();
    let report = driver.run_replay(&log, &mut console)?;

    println!(
        "Pathwalk replayed {} steps of the walk file in: {:.3} seconds.",
        report.step_count,
        report.elapsed_ms as f64 / 1000.0
    );
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    println!();

    Ok(exit_codes::SUCCESS)
}
