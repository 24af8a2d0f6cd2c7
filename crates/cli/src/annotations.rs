use std::{fs, path::Path};

use anyhow::{Context, Result};
use sched2ics_core::{Annotation, AnnotationState, EntryId, ScheduleEntry};
use serde::{Deserialize, Serialize};

/// On-disk annotation file. `event`, `date` and `time` only help the
/// reviewer find the entry and are ignored when read back.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnnotationFile {
	#[serde(default, rename = "entry")]
	pub entries: Vec<AnnotationRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnnotationRecord {
	pub id: usize,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub event: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub time: Option<String>,
	#[serde(flatten)]
	pub annotation: Annotation,
}

impl AnnotationFile {
	pub fn read(path: &Path) -> Result<Self> {
		let text = fs::read_to_string(path)
			.with_context(|| format!("failed to read annotations from {}", path.display()))?;

		toml::from_str(&text)
			.with_context(|| format!("failed to parse annotations in {}", path.display()))
	}

	/// One record per annotatable entry, marked as not teaching so the
	/// reviewer only has to flip the flag and fill in what differs.
	pub fn template(entries: &[ScheduleEntry]) -> Self {
		let entries = entries
			.iter()
			.filter(|e| e.is_annotatable())
			.map(|e| AnnotationRecord {
				id: e.id.0,
				event: Some(e.event_label.clone()),
				date: Some(e.date.to_string()),
				time: Some(e.time_label.to_string()),
				annotation: Annotation {
					teaching: Some(false),
					..Annotation::default()
				},
			})
			.collect();

		Self { entries }
	}

	pub fn into_state(self) -> AnnotationState {
		self.entries
			.into_iter()
			.map(|r| (EntryId(r.id), r.annotation))
			.collect()
	}

	pub fn to_toml(&self) -> Result<String> {
		toml::to_string_pretty(self).context("failed to serialize annotation template")
	}
}
