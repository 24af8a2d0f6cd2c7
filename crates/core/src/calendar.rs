use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarDateTime, Component, Event, EventLike};

use crate::{
	config::PipelineConfig,
	datetime::Timestamp,
	entry::ScheduleEntry,
	error::Result,
};

pub const FILE_NAME: &str = "event_schedule.ics";
pub const MIME_TYPE: &str = "text/calendar";

/// A rendered calendar ready to hand to whoever asked for the download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
	pub bytes: Vec<u8>,
	pub file_name: &'static str,
	pub mime_type: &'static str,
}

impl Export {
	#[must_use]
	pub fn new(calendar: &Calendar) -> Self {
		Self {
			bytes: calendar.to_string().into_bytes(),
			file_name: FILE_NAME,
			mime_type: MIME_TYPE,
		}
	}
}

// Floating times in a configured zone are written as UTC so the document
// needs no VTIMEZONE. Wall-clock times skipped by a DST jump stay floating.
fn date_time(timestamp: Timestamp, tz: Option<Tz>) -> CalendarDateTime {
	match (timestamp, tz) {
		(Timestamp::Fixed(dt), _) => CalendarDateTime::Utc(dt.with_timezone(&Utc)),
		(Timestamp::Floating(dt), Some(tz)) => tz
			.from_local_datetime(&dt)
			.earliest()
			.map_or(CalendarDateTime::Floating(dt), |local| {
				CalendarDateTime::Utc(local.with_timezone(&Utc))
			}),
		(Timestamp::Floating(dt), None) => CalendarDateTime::Floating(dt),
	}
}

/// Builds one `VEVENT` per entry, in order, from the original timestamps and
/// the entry's current description.
///
/// # Errors
/// Fails when the configured timezone is unknown.
pub fn create_calendar(entries: &[ScheduleEntry], config: &PipelineConfig) -> Result<Calendar> {
	let tz = config.tz()?;
	let mut calendar = Calendar::new();

	if let Some(name) = &config.calendar_name {
		calendar.name(name);
	}

	for entry in entries {
		let mut event = Event::new();

		event
			.uid(&format!(
				"{}-{}@sched2ics",
				entry.id,
				entry.start.local().format("%Y%m%dT%H%M%S")
			))
			.summary(&entry.event_label)
			.starts(date_time(entry.start, tz))
			.ends(date_time(entry.end, tz))
			.description(&entry.description);

		if let Some(location) = entry.location.as_deref().filter(|l| !l.is_empty()) {
			event.location(location);
		}

		calendar.push(event);
	}

	Ok(calendar)
}
