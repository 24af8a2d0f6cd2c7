use tracing::{info, warn};

use crate::{
	annotate::{merge, Annotation, AnnotationState},
	calendar::{create_calendar, Export},
	config::PipelineConfig,
	entry::{EntryId, ScheduleEntry},
	error::{Result, ScheduleError},
	load_entries,
};

/// One reviewer working on one uploaded schedule. Loading a new file throws
/// away every entry and annotation from the previous one.
#[derive(Debug, Clone)]
pub struct Session {
	config: PipelineConfig,
	entries: Vec<ScheduleEntry>,
	annotations: AnnotationState,
}

impl Session {
	/// # Errors
	/// Fails when the configuration is invalid.
	pub fn new(config: PipelineConfig) -> Result<Self> {
		config.validate()?;

		Ok(Self {
			config,
			entries: Vec::new(),
			annotations: AnnotationState::new(),
		})
	}

	/// # Errors
	/// See [`Session::new`] and [`Session::load`].
	pub fn from_buf(buf: &[u8], config: PipelineConfig) -> Result<Self> {
		let mut session = Self::new(config)?;
		session.load(buf)?;

		Ok(session)
	}

	/// Replaces the working set with the entries of `buf`. On error the
	/// previous schedule stays loaded.
	///
	/// # Errors
	/// Fails on structural input problems such as a missing column.
	pub fn load(&mut self, buf: &[u8]) -> Result<()> {
		let entries = load_entries(buf, &self.config)?;

		info!(
			entries = entries.len(),
			annotatable = entries.iter().filter(|e| e.is_annotatable()).count(),
			"loaded schedule"
		);

		self.entries = entries;
		self.annotations = AnnotationState::new();

		Ok(())
	}

	#[must_use]
	pub fn config(&self) -> &PipelineConfig {
		&self.config
	}

	#[must_use]
	pub fn entries(&self) -> &[ScheduleEntry] {
		&self.entries
	}

	#[must_use]
	pub fn annotations(&self) -> &AnnotationState {
		&self.annotations
	}

	fn check(&self, id: EntryId) -> Result<()> {
		if id.0 < self.entries.len() {
			Ok(())
		} else {
			Err(ScheduleError::UnknownEntry(id))
		}
	}

	/// Records reviewer input for `id`, keeping whatever was entered before
	/// for fields `annotation` leaves unset.
	///
	/// # Errors
	/// Fails when `id` is not part of the loaded schedule.
	pub fn annotate(&mut self, id: EntryId, annotation: Annotation) -> Result<()> {
		self.check(id)?;
		self.annotations.entry(id).apply(annotation);

		Ok(())
	}

	/// # Errors
	/// Fails when `id` is not part of the loaded schedule.
	pub fn set_teaching(&mut self, id: EntryId, teaching: bool) -> Result<()> {
		self.check(id)?;
		self.annotations.entry(id).teaching = Some(teaching);

		Ok(())
	}

	/// Annotates every entry in `state`, skipping ids that do not belong to
	/// the loaded schedule.
	pub fn annotate_all(&mut self, state: AnnotationState) {
		for (id, annotation) in state.iter() {
			if self.annotate(*id, annotation.clone()).is_err() {
				warn!(%id, "ignoring annotation for unknown entry");
			}
		}
	}

	/// Recomputes every description from the current annotations.
	pub fn run(&mut self) -> &[ScheduleEntry] {
		merge(&mut self.entries, &self.annotations, &self.config);

		&self.entries
	}

	/// # Errors
	/// Fails when the configured timezone is unknown.
	pub fn export(&mut self) -> Result<Export> {
		self.run();
		let calendar = create_calendar(&self.entries, &self.config)?;

		Ok(Export::new(&calendar))
	}
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;

	use super::*;

	const EXPORT: &str = "Instructor Schedule\n\
		Exported 2024-01-09\n\
		Schedule Event;Start;End\n\
		Math Class;2024-01-10 09:00;2024-01-10 10:30\n";

	const SECOND_EXPORT: &str = "x\ny\n\
		Schedule Event;Start;End\n\
		Day Off;2024-02-01 00:00;2024-02-01 00:00\n";

	#[test]
	fn end_to_end_default_instructor() {
		let mut session = Session::from_buf(EXPORT.as_bytes(), PipelineConfig::default()).unwrap();
		session.set_teaching(EntryId(0), true).unwrap();

		let entries = session.run();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].event_label, "Math Class");
		assert_eq!(entries[0].time_label.to_string(), "0900 - 1030");
		assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
		assert!(entries[0].description.contains("Instructor: Stephen LePrell"));

		let export = session.export().unwrap();
		let ics = String::from_utf8(export.bytes).unwrap().replace("\r\n ", "");
		assert!(ics.contains("SUMMARY:Math Class\r\n"));
		assert!(ics.contains("DESCRIPTION:Instructor: Stephen LePrell\\n"));
	}

	#[test]
	fn annotations_accumulate_per_field() {
		let mut session = Session::from_buf(EXPORT.as_bytes(), PipelineConfig::default()).unwrap();
		session.set_teaching(EntryId(0), true).unwrap();
		session
			.annotate(
				EntryId(0),
				Annotation {
					students: Some("Ann".to_string()),
					..Annotation::default()
				},
			)
			.unwrap();

		let annotation = session.annotations().get(EntryId(0)).unwrap();
		assert_eq!(annotation.teaching, Some(true));
		assert_eq!(annotation.students.as_deref(), Some("Ann"));
	}

	#[test]
	fn unknown_entry_is_rejected() {
		let mut session = Session::from_buf(EXPORT.as_bytes(), PipelineConfig::default()).unwrap();

		assert!(matches!(
			session.set_teaching(EntryId(5), true),
			Err(ScheduleError::UnknownEntry(EntryId(5)))
		));
	}

	#[test]
	fn new_upload_discards_previous_annotations() {
		let mut session = Session::from_buf(EXPORT.as_bytes(), PipelineConfig::default()).unwrap();
		session.set_teaching(EntryId(0), true).unwrap();

		session.load(SECOND_EXPORT.as_bytes()).unwrap();

		assert!(session.annotations().is_empty());
		assert_eq!(session.entries()[0].event_label, "Day Off");
		assert_eq!(session.run()[0].time_label.to_string(), "All day");
	}

	#[test]
	fn failed_upload_keeps_current_schedule() {
		let mut session = Session::from_buf(EXPORT.as_bytes(), PipelineConfig::default()).unwrap();
		session.set_teaching(EntryId(0), true).unwrap();

		let err = session.load(b"x\ny\nWhat;When\n").unwrap_err();

		assert!(matches!(err, ScheduleError::MissingColumn(_)));
		assert_eq!(session.entries().len(), 1);
		assert_eq!(session.annotations().len(), 1);
	}

	#[test]
	fn all_rows_dropped_still_exports() {
		let input = "x\ny\nSchedule Event;Start;End\nTotal;;\n";
		let mut session = Session::from_buf(input.as_bytes(), PipelineConfig::default()).unwrap();

		assert!(session.entries().is_empty());
		let ics = String::from_utf8(session.export().unwrap().bytes).unwrap();
		assert!(ics.contains("BEGIN:VCALENDAR"));
		assert!(!ics.contains("BEGIN:VEVENT"));
	}

	#[test]
	fn annotate_all_skips_stale_ids() {
		let mut session = Session::from_buf(EXPORT.as_bytes(), PipelineConfig::default()).unwrap();
		let state = AnnotationState::from_iter([
			(
				EntryId(0),
				Annotation {
					teaching: Some(true),
					..Annotation::default()
				},
			),
			(EntryId(3), Annotation::default()),
		]);

		session.annotate_all(state);

		assert_eq!(session.annotations().len(), 1);
	}
}
