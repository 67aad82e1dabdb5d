use std::{fs, path::PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use facesort_service::{EnrollStudentRequest, FacesortService};
use facesort_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = facesort_cli::VERSION,
	rename_all = "kebab",
	styles = facesort_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// JSON roster: an array of { student_id, student_name, school_id,
	/// photo_url } entries.
	#[arg(long, short = 'r', value_name = "FILE")]
	pub roster: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct RosterEntry {
	pub student_id: String,
	pub student_name: String,
	pub school_id: String,
	pub photo_url: String,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = facesort_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let roster = read_roster(&args.roster)?;

	if roster.is_empty() {
		tracing::warn!(roster = %args.roster.display(), "Roster is empty; nothing to enroll.");

		return Ok(());
	}

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let service = FacesortService::new(config, db);
	let mut enrolled = 0_usize;
	let mut failed = 0_usize;

	// One bad photo must not stop the rest of the roster.
	for entry in roster {
		let student_id = entry.student_id.clone();

		match service
			.enroll_student(EnrollStudentRequest {
				student_id: entry.student_id,
				school_id: entry.school_id,
				student_name: entry.student_name,
				photo_url: entry.photo_url,
			})
			.await
		{
			Ok(response) => {
				tracing::info!(
					student_id = student_id.as_str(),
					op = ?response.op,
					faces_detected = response.faces_detected,
					"Enrolled student."
				);

				enrolled += 1;
			},
			Err(err) => {
				tracing::warn!(
					student_id = student_id.as_str(),
					error = %err,
					"Failed to enroll student; continuing."
				);

				failed += 1;
			},
		}
	}

	tracing::info!(enrolled, failed, "Bulk enrollment finished.");

	Ok(())
}

fn read_roster(path: &PathBuf) -> color_eyre::Result<Vec<RosterEntry>> {
	let raw = fs::read_to_string(path)?;
	let roster = serde_json::from_str(&raw)?;

	Ok(roster)
}
