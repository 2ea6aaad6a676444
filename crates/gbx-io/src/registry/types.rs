// Registry Types
//
// Descriptors declare, at registration time, what a tool consumes and
// produces. The dispatcher resolves payloads against the declared input
// kind, so a tool never sees bytes it did not sign up for.

use serde::Serialize;

/// How a tool wants its input handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
	/// Raw bytes, untouched.
	Binary,
	/// Bytes decoded as UTF-8 text.
	Text,
	/// Bytes that passed the Gbx magic probe, still unparsed.
	GbxBytes,
	/// A fully parsed Gbx node.
	#[serde(rename_all = "camelCase")]
	Parsed {
		/// Parse only the header, leaving body-derived fields empty.
		header_only: bool,
	},
}

/// What kind of outputs a tool produces, for hosts that want to label
/// results before running anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputKind {
	Binary,
	Text,
	Gbx,
}

/// Registration-time metadata for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
	/// Stable identifier used for dispatch, e.g. "optimize-gbx".
	pub id: String,
	/// Human-readable name for menus and logs.
	pub name: String,
	pub input: InputKind,
	pub output: OutputKind,
}

impl ToolDescriptor {
	pub fn new(
		id: impl Into<String>,
		name: impl Into<String>,
		input: InputKind,
		output: OutputKind,
	) -> Self {
		Self { id: id.into(), name: name.into(), input, output }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_descriptor_serializes_camel_case() {
		let descriptor = ToolDescriptor::new(
			"extract-thumbnail",
			"Extract thumbnail",
			InputKind::Parsed { header_only: true },
			OutputKind::Binary,
		);

		let json = serde_json::to_value(&descriptor).unwrap();
		assert_eq!(json["id"], "extract-thumbnail");
		assert_eq!(json["input"]["parsed"]["headerOnly"], true);
		assert_eq!(json["output"], "binary");
	}
}
