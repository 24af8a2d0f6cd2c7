#![warn(clippy::pedantic)]

pub mod annotate;
pub mod calendar;
pub mod config;
pub mod datetime;
pub mod entry;
pub mod error;
pub mod row;
pub mod session;

pub use annotate::{Annotation, AnnotationState};
pub use calendar::{create_calendar, Export};
pub use config::PipelineConfig;
pub use entry::{EntryId, ScheduleEntry};
pub use error::{Result, ScheduleError};
pub use session::Session;

/// Reads, filters and enriches the rows of a schedule export.
///
/// # Errors
/// Fails on structural input problems such as a missing column.
pub fn load_entries(buf: &[u8], config: &PipelineConfig) -> Result<Vec<ScheduleEntry>> {
	let rows = row::read_rows(buf, config)?;
	let total = rows.len();
	let valid = row::filter_rows(rows);

	tracing::debug!(total, kept = valid.len(), "filtered schedule rows");

	Ok(entry::build_entries(valid))
}
