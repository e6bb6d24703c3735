use std::fs;
use std::path::PathBuf;

use clap::Parser;
use syndopt::{assign_groups, AssignmentPolicy, MicrolpSolver, RawStudentRecord};

/// Balanced group assignment for student cohorts
#[derive(Parser)]
#[command(version)]
struct Args {
    /// JSON file with the raw student records
    records: PathBuf,

    /// JSON file with assignment policy overrides
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Write the resulting assignment here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let records: Vec<RawStudentRecord> =
        serde_json::from_str(&fs::read_to_string(&args.records)?)?;
    let policy = match &args.policy {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => AssignmentPolicy::default(),
    };
    log::info!("loaded {} student records", records.len());

    let assignment = assign_groups(&records, &policy, &MicrolpSolver::new())?;
    log::info!(
        "assigned {} groups with objective {}",
        assignment.rosters.len(),
        assignment.objective_value
    );

    let rendered = serde_json::to_string_pretty(&assignment)?;
    match &args.output {
        Some(path) => fs::write(path, rendered + "\n")?,
        None => println!("{rendered}"),
    }

    Ok(())
}
