use std::io::{BufRead, BufReader, Read};

use csv::{ByteRecord, StringRecord};
use tracing::debug;

use crate::{
	config::{Columns, PipelineConfig},
	datetime::{normalize, Timestamp},
	error::{Result, ScheduleError},
};

pub const EVENT_COLUMN: &str = "Schedule Event";
pub const START_COLUMN: &str = "Start";
pub const END_COLUMN: &str = "End";
pub const LOCATION_COLUMN: &str = "Location";
pub const DEVICE_COLUMN: &str = "Device";

/// One data line of the export, reduced to the columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
	/// 1-based line number in the uploaded file.
	pub line: u64,
	pub event: String,
	pub start: String,
	pub end: String,
	pub location: Option<String>,
	pub device: Option<String>,
}

/// A row whose start and end both normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRow {
	pub row: RawRow,
	pub start: Timestamp,
	pub end: Timestamp,
}

#[derive(Debug)]
struct ColumnIndex {
	event: usize,
	start: usize,
	end: usize,
	location: Option<usize>,
	device: Option<usize>,
}

impl ColumnIndex {
	fn resolve(headers: &StringRecord, columns: Columns) -> Result<Self> {
		let find = |name: &str| headers.iter().position(|h| h.trim() == name);
		let require =
			|name: &str| find(name).ok_or_else(|| ScheduleError::MissingColumn(name.to_string()));
		let optional = |enabled: bool, name: &str| -> Result<Option<usize>> {
			if enabled {
				require(name).map(Some)
			} else {
				Ok(None)
			}
		};

		Ok(Self {
			event: require(EVENT_COLUMN)?,
			start: require(START_COLUMN)?,
			end: require(END_COLUMN)?,
			location: optional(columns.location, LOCATION_COLUMN)?,
			device: optional(columns.device, DEVICE_COLUMN)?,
		})
	}

	// fields that are not UTF-8 are decoded lossily rather than failing the upload
	fn row(&self, record: &ByteRecord, line: u64) -> RawRow {
		let field =
			|i: usize| record.get(i).map(String::from_utf8_lossy).unwrap_or_default().into_owned();

		RawRow {
			line,
			event: field(self.event),
			start: field(self.start),
			end: field(self.end),
			location: self.location.map(field),
			device: self.device.map(field),
		}
	}
}

/// Reads every data row of a schedule export: the banner lines are skipped,
/// the next line names the columns and the rest are delimited records.
///
/// # Errors
/// Fails when a required column is absent from the header or the input is
/// not readable as delimited text.
pub fn read_rows<R: Read>(reader: R, config: &PipelineConfig) -> Result<Vec<RawRow>> {
	let mut reader = BufReader::new(reader);
	let mut banner = Vec::new();

	for _ in 0..config.header_lines {
		banner.clear();
		if reader.read_until(b'\n', &mut banner)? == 0 {
			break;
		}
	}

	let mut rdr = csv::ReaderBuilder::new()
		.delimiter(config.delimiter_byte()?)
		.flexible(true)
		.from_reader(reader);

	let index = ColumnIndex::resolve(rdr.headers()?, config.columns)?;
	let offset = config.header_lines as u64;

	rdr.byte_records()
		.map(|record| -> Result<RawRow> {
			let record = record?;
			let line = record.position().map_or(0, |p| p.line()) + offset;

			Ok(index.row(&record, line))
		})
		.collect()
}

/// Keeps the rows whose start and end both parse, in input order.
/// Anything else (repeated headers, totals, separators) is dropped.
#[must_use]
pub fn filter_rows(rows: Vec<RawRow>) -> Vec<ValidRow> {
	rows.into_iter()
		.filter_map(|row| match (normalize(&row.start), normalize(&row.end)) {
			(Some(start), Some(end)) => Some(ValidRow { row, start, end }),
			_ => {
				debug!(line = row.line, start = %row.start, end = %row.end, "dropping row without valid timestamps");
				None
			}
		})
		.collect()
}
