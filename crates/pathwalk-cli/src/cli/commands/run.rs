use pathwalk_core::{model, EngineConfig, TraversalClient, WalkDriver};

use super::super::args::RunArgs;
use super::super::console::ConsoleListener;
use super::write_report;
use crate::exit_codes;

pub async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let mut config = EngineConfig::default();
    if let Some(url) = args.url {
        config = config.with_url(url);
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout(secs);
    }

    let client = TraversalClient::new(config)?;
    println!("Pathwalk is using the engine REST API at {}.", client.base_url());

    // Local model first: a bad model name must not touch the engine.
    let mut driver = WalkDriver::new();
    if let Some(spec) = &args.model {
        driver = driver.with_model(model::resolve(spec)?);
    }
    if let Some(dir) = &args.save {
        driver = driver.with_recording(dir);
    }

    if let Some(json) = &args.json {
        client.load_model_file(json).await?;
        println!("Pathwalk has loaded {} into the engine.", json.display());
    }

    println!("The engine is starting its walk.");
    let mut console = ConsoleListener::stdout();
    let report = driver.run_live(&client, &mut console).await?;

    println!(
        "The engine walked that model in {} steps in {:.3} seconds.",
        report.step_count,
        report.elapsed_ms as f64 / 1000.0
    );
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    println!();

    Ok(exit_codes::SUCCESS)
}
