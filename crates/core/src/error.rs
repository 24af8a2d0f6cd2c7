use thiserror::Error;

use crate::entry::EntryId;

#[derive(Error, Debug)]
pub enum ScheduleError {
	#[error("missing required column `{0}`")]
	MissingColumn(String),

	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("no entry with id {0} in the current schedule")]
	UnknownEntry(EntryId),

	#[error("unknown timezone `{0}`")]
	InvalidTimezone(String),

	#[error("configuration error: {0}")]
	Config(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
