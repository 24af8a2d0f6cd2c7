#![warn(clippy::pedantic)]

mod annotations;

use std::{
	fs::{self, File},
	io::{Read, Write},
	path::{Path, PathBuf},
};

use annotations::AnnotationFile;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sched2ics_core::{PipelineConfig, ScheduleEntry, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(version, about = "Convert a schedule export into an iCalendar file")]
struct Args {
	/// Pipeline configuration (TOML)
	#[clap(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
	config: Option<PathBuf>,
	/// Increase log verbosity (-v info, -vv debug)
	#[clap(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,
	#[clap(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Write the annotated schedule as an .ics document
	Export {
		#[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
		path: Option<PathBuf>,
		/// Reviewer annotations (TOML)
		#[clap(short, long, value_hint = clap::ValueHint::FilePath)]
		annotations: Option<PathBuf>,
		#[clap(short, long, value_hint = clap::ValueHint::FilePath)]
		output: Option<PathBuf>,
	},
	/// Show the processed schedule as a table
	Preview {
		#[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
		path: Option<PathBuf>,
		#[clap(short, long, value_hint = clap::ValueHint::FilePath)]
		annotations: Option<PathBuf>,
	},
	/// Print an annotation file to fill in for every annotatable entry
	Template {
		#[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
		path: Option<PathBuf>,
	},
}

fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
		.with_writer(std::io::stderr)
		.init();
}

fn read_config(path: Option<&Path>) -> Result<PipelineConfig> {
	let Some(path) = path else {
		return Ok(PipelineConfig::default());
	};

	let text = fs::read_to_string(path)
		.with_context(|| format!("failed to read config from {}", path.display()))?;
	let config: PipelineConfig = toml::from_str(&text)
		.with_context(|| format!("failed to parse config in {}", path.display()))?;

	config.validate()?;

	Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
	let mut buf = Vec::new();

	if let Some(path) = path {
		File::open(path)
			.and_then(|mut file| file.read_to_end(&mut buf))
			.with_context(|| format!("failed to read schedule from {}", path.display()))?;
	} else {
		std::io::stdin()
			.read_to_end(&mut buf)
			.context("failed to read schedule from stdin")?;
	}

	Ok(buf)
}

fn open_session(
	config: PipelineConfig,
	path: Option<&Path>,
	annotations: Option<&Path>,
) -> Result<Session> {
	let mut session = Session::from_buf(&read_input(path)?, config)?;

	if let Some(annotations) = annotations {
		session.annotate_all(AnnotationFile::read(annotations)?.into_state());
	}

	Ok(session)
}

fn render_table(entries: &[ScheduleEntry]) -> String {
	const HEADER: [&str; 5] = ["Id", "Event", "Date", "Time", "Description"];

	let rows: Vec<[String; 5]> = entries
		.iter()
		.map(|e| {
			[
				e.id.to_string(),
				e.event_label.clone(),
				e.date.to_string(),
				e.time_label.to_string(),
				e.description.replace('\n', " | "),
			]
		})
		.collect();

	let mut widths = HEADER.map(|h| h.chars().count());
	for row in &rows {
		for (width, cell) in widths.iter_mut().zip(row) {
			*width = (*width).max(cell.chars().count());
		}
	}

	let line = |cells: &[&str]| {
		cells
			.iter()
			.zip(widths)
			.map(|(cell, width)| format!("{cell:<width$}"))
			.collect::<Vec<_>>()
			.join("  ")
			.trim_end()
			.to_string()
	};

	let mut table = line(&HEADER);
	table.push('\n');
	for row in &rows {
		table.push_str(&line(&row.each_ref().map(String::as_str)));
		table.push('\n');
	}

	table
}

fn main() -> Result<()> {
	let args = Args::parse();
	init_tracing(args.verbose);

	let config = read_config(args.config.as_deref())?;

	match args.command {
		Command::Export {
			path,
			annotations,
			output,
		} => {
			let mut session = open_session(config, path.as_deref(), annotations.as_deref())?;
			let export = session.export()?;

			if let Some(output) = output {
				let mut file = File::create(&output)
					.with_context(|| format!("failed to create {}", output.display()))?;
				file.write_all(&export.bytes)?;
				info!(path = %output.display(), events = session.entries().len(), "wrote calendar");
			} else {
				std::io::stdout().write_all(&export.bytes)?;
			}
		}
		Command::Preview { path, annotations } => {
			let mut session = open_session(config, path.as_deref(), annotations.as_deref())?;
			print!("{}", render_table(session.run()));
		}
		Command::Template { path } => {
			let session = open_session(config, path.as_deref(), None)?;
			print!("{}", AnnotationFile::template(session.entries()).to_toml()?);
		}
	}

	Ok(())
}
