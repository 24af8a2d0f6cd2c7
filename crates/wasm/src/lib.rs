#![warn(clippy::pedantic)]

use sched2ics_core::{
	calendar::{FILE_NAME, MIME_TYPE},
	Annotation, EntryId, PipelineConfig, ScheduleEntry, Session,
};
use serde::Serialize;
use wasm_bindgen::{prelude::wasm_bindgen, JsError};

#[derive(Debug, Serialize, PartialEq, Eq)]
struct EntryView<'a> {
	id: usize,
	event: &'a str,
	date: String,
	time: String,
	annotatable: bool,
	description: &'a str,
}

fn entries_view(entries: &[ScheduleEntry]) -> Vec<EntryView<'_>> {
	entries
		.iter()
		.map(|e| EntryView {
			id: e.id.0,
			event: &e.event_label,
			date: e.date.to_string(),
			time: e.time_label.to_string(),
			annotatable: e.is_annotatable(),
			description: &e.description,
		})
		.collect()
}

fn parse_config(config: Option<String>) -> Result<PipelineConfig, serde_json::Error> {
	config.map_or_else(|| Ok(PipelineConfig::default()), |json| serde_json::from_str(&json))
}

/// Browser-side review session: upload, annotate, download.
#[wasm_bindgen]
pub struct Reviewer {
	session: Session,
}

#[wasm_bindgen]
impl Reviewer {
	/// `config` is an optional JSON pipeline configuration.
	///
	/// # Errors
	/// Fails on malformed or invalid configuration.
	#[wasm_bindgen(constructor)]
	pub fn new(config: Option<String>) -> Result<Reviewer, JsError> {
		Ok(Self {
			session: Session::new(parse_config(config)?)?,
		})
	}

	/// # Errors
	/// Fails when the upload is missing a required column.
	pub fn load(&mut self, bytes: &[u8]) -> Result<(), JsError> {
		Ok(self.session.load(bytes)?)
	}

	/// Current entries with fresh descriptions, as a JSON array.
	///
	/// # Errors
	/// Fails only if serialization fails.
	pub fn entries(&mut self) -> Result<String, JsError> {
		Ok(serde_json::to_string(&entries_view(self.session.run()))?)
	}

	/// # Errors
	/// Fails on malformed JSON or an id outside the loaded schedule.
	pub fn annotate(&mut self, id: usize, annotation: &str) -> Result<(), JsError> {
		let annotation: Annotation = serde_json::from_str(annotation)?;

		Ok(self.session.annotate(EntryId(id), annotation)?)
	}

	/// # Errors
	/// Fails when the configured timezone is unknown.
	pub fn export(&mut self) -> Result<Vec<u8>, JsError> {
		Ok(self.session.export()?.bytes)
	}

	#[wasm_bindgen(js_name = fileName)]
	#[must_use]
	pub fn file_name() -> String {
		FILE_NAME.to_string()
	}

	#[wasm_bindgen(js_name = mimeType)]
	#[must_use]
	pub fn mime_type() -> String {
		MIME_TYPE.to_string()
	}
}

/// One-shot conversion of a schedule export with JSON annotations keyed by
/// entry id.
///
/// # Errors
/// Fails on malformed input, annotations or configuration.
#[wasm_bindgen]
pub fn from_csv(csv: &str, annotations: Option<String>, config: Option<String>) -> Result<String, JsError> {
	let mut session = Session::from_buf(csv.as_bytes(), parse_config(config)?)?;

	if let Some(annotations) = annotations {
		let annotations: Vec<(usize, Annotation)> = serde_json::from_str(&annotations)?;
		session.annotate_all(
			annotations
				.into_iter()
				.map(|(id, annotation)| (EntryId(id), annotation))
				.collect(),
		);
	}

	Ok(String::from_utf8_lossy(&session.export()?.bytes).into_owned())
}
