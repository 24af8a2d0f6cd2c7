use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::{
	config::{DescriptionStyle, PipelineConfig},
	entry::{EntryId, EventKind, ScheduleEntry, NON_TEACHING_DESCRIPTION},
};

/// What the reviewer entered for one entry. `None` means nothing was entered
/// and the carried default applies; `Some("")` is an explicit empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotation {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub teaching: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instructor: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub seat_support: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub students: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

impl Annotation {
	#[must_use]
	pub fn is_teaching(&self) -> bool {
		self.teaching.unwrap_or(false)
	}

	/// Overlays the fields set in `other` onto `self`.
	pub fn apply(&mut self, other: Annotation) {
		let Annotation {
			teaching,
			instructor,
			seat_support,
			students,
			location,
		} = other;

		self.teaching = teaching.or(self.teaching);
		self.instructor = instructor.or(self.instructor.take());
		self.seat_support = seat_support.or(self.seat_support.take());
		self.students = students.or(self.students.take());
		self.location = location.or(self.location.take());
	}
}

/// Per-entry reviewer input for the currently loaded schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationState {
	entries: BTreeMap<EntryId, Annotation>,
}

impl AnnotationState {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn get(&self, id: EntryId) -> Option<&Annotation> {
		self.entries.get(&id)
	}

	pub fn entry(&mut self, id: EntryId) -> &mut Annotation {
		self.entries.entry(id).or_default()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> btree_map::Iter<'_, EntryId, Annotation> {
		self.entries.iter()
	}
}

impl FromIterator<(EntryId, Annotation)> for AnnotationState {
	fn from_iter<I: IntoIterator<Item = (EntryId, Annotation)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}

/// Values of the last teaching entry seen in the current pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarryForwardDefaults {
	pub instructor: String,
	pub seat_support: String,
	pub students: String,
}

impl CarryForwardDefaults {
	#[must_use]
	pub fn new(default_instructor: &str) -> Self {
		Self {
			instructor: default_instructor.to_string(),
			seat_support: String::new(),
			students: String::new(),
		}
	}

	#[must_use]
	pub fn resolve(&self, annotation: Option<&Annotation>, entry: &ScheduleEntry) -> TeachingDetails {
		let pick = |field: fn(&Annotation) -> Option<&String>, fallback: &str| {
			annotation
				.and_then(field)
				.map_or_else(|| fallback.to_string(), String::clone)
		};

		TeachingDetails {
			instructor: pick(|a| a.instructor.as_ref(), &self.instructor),
			seat_support: pick(|a| a.seat_support.as_ref(), &self.seat_support),
			students: pick(|a| a.students.as_ref(), &self.students),
			location: pick(
				|a| a.location.as_ref(),
				entry.location.as_deref().unwrap_or_default(),
			),
			device: entry.device.clone(),
		}
	}

	pub fn update(&mut self, details: &TeachingDetails) {
		self.instructor.clone_from(&details.instructor);
		self.seat_support.clone_from(&details.seat_support);
		self.students.clone_from(&details.students);
	}
}

/// Fully resolved fields of one teaching entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeachingDetails {
	pub instructor: String,
	pub seat_support: String,
	pub students: String,
	pub location: String,
	pub device: Option<String>,
}

impl TeachingDetails {
	#[must_use]
	pub fn describe(&self, style: DescriptionStyle) -> String {
		let mut fields = vec![
			format!("Instructor: {}", self.instructor),
			format!("Seat Support: {}", self.seat_support),
			format!("Students: {}", self.students),
			format!("Location: {}", self.location),
		];

		if let Some(device) = &self.device {
			fields.push(format!("Device: {device}"));
		}

		fields.join(style.separator())
	}
}

/// Writes a description into every entry. Teaching entries inherit unset
/// fields from the previous teaching entry in the same pass; everything else
/// leaves the carried values alone.
pub fn merge(entries: &mut [ScheduleEntry], state: &AnnotationState, config: &PipelineConfig) {
	let mut defaults = CarryForwardDefaults::new(&config.default_instructor);

	for entry in entries.iter_mut() {
		let annotation = state.get(entry.id);

		if entry.kind == EventKind::NonTeaching || !annotation.is_some_and(Annotation::is_teaching)
		{
			entry.description = NON_TEACHING_DESCRIPTION.to_string();
			continue;
		}

		let details = defaults.resolve(annotation, entry);
		entry.description = details.describe(config.description_style);

		if config.carry_forward {
			defaults.update(&details);
		}
	}
}
