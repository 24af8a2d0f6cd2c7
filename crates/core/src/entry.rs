use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use crate::{datetime::Timestamp, row::ValidRow};

pub const NON_TEACHING_DESCRIPTION: &str = "Non-teaching event";

/// Labels that never need annotating. Matched exactly, case included.
pub const NON_TEACHING_EVENTS: [&str; 2] = ["Requested Off", "Day Off"];

/// Position of an entry in the filtered sequence, fixed when the schedule is
/// loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub usize);

impl fmt::Display for EntryId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLabel {
	AllDay,
	Range(NaiveTime, NaiveTime),
}

impl TimeLabel {
	/// Only a midnight-to-midnight pair is all day; any other pair of equal
	/// times is still shown as a range.
	#[must_use]
	pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
		if start == NaiveTime::MIN && end == NaiveTime::MIN {
			Self::AllDay
		} else {
			Self::Range(start, end)
		}
	}
}

impl fmt::Display for TimeLabel {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::AllDay => f.write_str("All day"),
			Self::Range(start, end) => {
				write!(f, "{} - {}", start.format("%H%M"), end.format("%H%M"))
			}
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
	NonTeaching,
	Annotatable,
}

impl EventKind {
	#[must_use]
	pub fn classify(label: &str) -> Self {
		if NON_TEACHING_EVENTS.contains(&label) {
			Self::NonTeaching
		} else {
			Self::Annotatable
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
	pub id: EntryId,
	pub line: u64,
	pub event_label: String,
	pub start: Timestamp,
	pub end: Timestamp,
	pub date: NaiveDate,
	pub time_label: TimeLabel,
	pub location: Option<String>,
	pub device: Option<String>,
	pub kind: EventKind,
	pub description: String,
}

impl ScheduleEntry {
	#[must_use]
	pub fn new(id: EntryId, valid: ValidRow) -> Self {
		let ValidRow { row, start, end } = valid;
		let kind = EventKind::classify(&row.event);
		let description = match kind {
			EventKind::NonTeaching => NON_TEACHING_DESCRIPTION.to_string(),
			EventKind::Annotatable => String::new(),
		};

		Self {
			id,
			line: row.line,
			event_label: row.event,
			start,
			end,
			date: start.date(),
			time_label: TimeLabel::new(start.time(), end.time()),
			location: row.location,
			device: row.device,
			kind,
			description,
		}
	}

	#[must_use]
	pub fn is_annotatable(&self) -> bool {
		self.kind == EventKind::Annotatable
	}
}

/// Numbers the filtered rows in order and derives date, time label and
/// classification for each.
#[must_use]
pub fn build_entries(rows: Vec<ValidRow>) -> Vec<ScheduleEntry> {
	rows.into_iter()
		.enumerate()
		.map(|(i, row)| ScheduleEntry::new(EntryId(i), row))
		.collect()
}
