use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{Result, ScheduleError};

pub const DEFAULT_INSTRUCTOR: &str = "Stephen LePrell";

/// Optional columns the input schedule carries besides
/// `Schedule Event`, `Start` and `End`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Columns {
	pub location: bool,
	pub device: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionStyle {
	/// One labeled field per line.
	#[default]
	Lines,
	/// Labeled fields joined with `, `.
	Inline,
}

impl DescriptionStyle {
	#[must_use]
	pub fn separator(self) -> &'static str {
		match self {
			Self::Lines => "\n",
			Self::Inline => ", ",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
	pub default_instructor: String,
	pub carry_forward: bool,
	pub columns: Columns,
	pub description_style: DescriptionStyle,
	pub header_lines: usize,
	pub delimiter: char,
	pub timezone: Option<String>,
	pub calendar_name: Option<String>,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			default_instructor: DEFAULT_INSTRUCTOR.to_string(),
			carry_forward: true,
			columns: Columns::default(),
			description_style: DescriptionStyle::default(),
			header_lines: 2,
			delimiter: ';',
			timezone: None,
			calendar_name: None,
		}
	}
}

impl PipelineConfig {
	/// Delimiter as the single byte the CSV reader expects.
	///
	/// # Errors
	/// Fails when the configured delimiter is not ASCII.
	pub fn delimiter_byte(&self) -> Result<u8> {
		u8::try_from(self.delimiter)
			.ok()
			.filter(u8::is_ascii)
			.ok_or_else(|| {
				ScheduleError::Config(format!("delimiter {:?} is not ASCII", self.delimiter))
			})
	}

	/// # Errors
	/// Fails when the configured timezone is not a known IANA name.
	pub fn tz(&self) -> Result<Option<Tz>> {
		self.timezone
			.as_deref()
			.map(|name| {
				name.parse::<Tz>()
					.map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
			})
			.transpose()
	}

	/// Checks everything that can be wrong with a deserialized config up front,
	/// so a bad file fails before any input is read.
	///
	/// # Errors
	/// See [`Self::delimiter_byte`] and [`Self::tz`].
	pub fn validate(&self) -> Result<()> {
		self.delimiter_byte()?;
		self.tz()?;

		Ok(())
	}
}
