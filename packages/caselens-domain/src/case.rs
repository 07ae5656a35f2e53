use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Judicial outcome recorded for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Decision {
	Accepted,
	Rejected,
	#[default]
	Unknown,
}
impl Decision {
	/// Parses the stored outcome label. Anything other than the two known labels is `Unknown`.
	pub fn parse(raw: Option<&str>) -> Self {
		match raw.map(str::trim) {
			Some("accepted") => Self::Accepted,
			Some("rejected") => Self::Rejected,
			_ => Self::Unknown,
		}
	}

	pub fn as_str(self) -> Option<&'static str> {
		match self {
			Self::Accepted => Some("accepted"),
			Self::Rejected => Some("rejected"),
			Self::Unknown => None,
		}
	}

	pub fn is_accepted(self) -> bool {
		matches!(self, Self::Accepted)
	}
}
impl Serialize for Decision {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self.as_str() {
			Some(label) => serializer.serialize_str(label),
			None => serializer.serialize_none(),
		}
	}
}
impl<'de> Deserialize<'de> for Decision {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = Option::<String>::deserialize(deserializer)?;

		Ok(Self::parse(raw.as_deref()))
	}
}

/// A case as handed to the search pipeline. The embedding always matches the configured
/// dimensionality; rows that do not are dropped before they get here.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
	pub case_id: String,
	pub text: String,
	pub summary: Option<String>,
	pub decision: Decision,
	pub decision_reason: Option<String>,
	pub embedding: Vec<f32>,
}
impl CaseRecord {
	/// True when any reasoning string is stored, including whitespace-only text.
	pub fn has_reasoning(&self) -> bool {
		self.decision_reason.as_deref().is_some_and(|reason| !reason.is_empty())
	}
}
