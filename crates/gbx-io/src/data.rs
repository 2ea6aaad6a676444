// Payload Types
//
// The byte and text carriers that flow through the dispatch pipeline:
// - BinPayload: arbitrary bytes as submitted by the host
// - TextPayload: decoded text with a display format tag
// - GbxBytes: bytes that passed the Gbx magic probe
// - ToolOutput: what a tool hands back to the pipeline

use bytes::Bytes;
use serde::Serialize;

/// Magic signature at the start of every Gbx file.
pub const GBX_MAGIC: [u8; 3] = *b"GBX";

/// Smallest buffer we are willing to treat as Gbx data. The magic plus at
/// least one version byte.
const GBX_MIN_LEN: usize = 4;

/// Returns true if `data` plausibly holds Gbx content.
///
/// This is a cheap signature probe, not a parse. Buffers shorter than
/// [`GBX_MIN_LEN`] are never considered Gbx, whatever their bytes say.
pub fn likely_gbx(data: &[u8]) -> bool {
	data.len() >= GBX_MIN_LEN && data[..GBX_MAGIC.len()] == GBX_MAGIC
}

/// Raw binary payload, optionally carrying the file name it arrived under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinPayload {
	/// Original file name, if the host knows one.
	pub name: Option<String>,
	/// The payload bytes.
	pub data: Bytes,
}

impl BinPayload {
	/// Payload with a known file name.
	pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
		Self { name: Some(name.into()), data: data.into() }
	}

	/// Payload without any file name attached.
	pub fn unnamed(data: impl Into<Bytes>) -> Self {
		Self { name: None, data: data.into() }
	}

	/// Decode the payload as UTF-8 text, replacing invalid sequences.
	pub fn into_text(self) -> TextPayload {
		let text = String::from_utf8_lossy(&self.data).into_owned();
		TextPayload { name: self.name, text, format: "txt".to_string() }
	}
}

/// Text payload with a short format tag ("txt", "json", ...) hosts can use
/// for syntax highlighting or file extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPayload {
	pub name: Option<String>,
	pub text: String,
	pub format: String,
}

impl TextPayload {
	pub fn new(name: Option<String>, text: impl Into<String>, format: impl Into<String>) -> Self {
		Self { name, text: text.into(), format: format.into() }
	}
}

/// Bytes that passed [`likely_gbx`]. Holding one of these means the buffer
/// starts with the Gbx magic, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GbxBytes {
	pub name: Option<String>,
	pub data: Bytes,
}

impl GbxBytes {
	/// Wrap `data` if it carries the Gbx signature, `None` otherwise.
	pub fn checked(name: Option<String>, data: impl Into<Bytes>) -> Option<Self> {
		let data = data.into();
		likely_gbx(&data).then(|| Self { name, data })
	}
}

/// One output produced by a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
	Bin(BinPayload),
	Text(TextPayload),
}

impl ToolOutput {
	/// File name attached to the output, if any.
	pub fn name(&self) -> Option<&str> {
		match self {
			ToolOutput::Bin(bin) => bin.name.as_deref(),
			ToolOutput::Text(text) => text.name.as_deref(),
		}
	}
}

impl From<BinPayload> for ToolOutput {
	fn from(bin: BinPayload) -> Self {
		ToolOutput::Bin(bin)
	}
}

impl From<TextPayload> for ToolOutput {
	fn from(text: TextPayload) -> Self {
		ToolOutput::Text(text)
	}
}

impl From<GbxBytes> for ToolOutput {
	fn from(gbx: GbxBytes) -> Self {
		ToolOutput::Bin(BinPayload { name: gbx.name, data: gbx.data })
	}
}
