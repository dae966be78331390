//! One-shot planner: reads a trip request as JSON (from the file given as the
//! first argument, or stdin), prints the plan and writes `travel_plan.json`.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use env_logger::Env;
use log::error;

use tripcanvas_api::config::AppConfig;
use tripcanvas_api::db::mongo;
use tripcanvas_api::error::PlannerError;
use tripcanvas_api::models::trip_request::{TripRequest, TripRequestInput};
use tripcanvas_api::services::plan_sink::{self, DEFAULT_OUTPUT_FILE};
use tripcanvas_api::services::planner_service::TripPlanner;

fn read_input(path: Option<String>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;

    let raw = read_input(std::env::args().nth(1))?;
    let input: TripRequestInput = serde_json::from_str(&raw)
        .map_err(|e| PlannerError::InputValidation(e.to_string()))?;
    let trip = TripRequest::try_from(input)?;

    let client = mongo::create_mongo_client(&config.mongo_uri).await?;
    let (planner, _) = TripPlanner::from_config(&config, client).await?;

    let plan = planner.plan(&trip).await?;

    println!("{}", plan_sink::to_pretty_json(&plan)?);
    plan_sink::write_plan_file(&plan, Path::new(DEFAULT_OUTPUT_FILE))?;
    println!("Plan written to {}", DEFAULT_OUTPUT_FILE);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if let Some(PlannerError::Parse { raw, .. }) = e.downcast_ref::<PlannerError>() {
                eprintln!("Raw response:\n{}", raw);
            }
            ExitCode::FAILURE
        }
    }
}
