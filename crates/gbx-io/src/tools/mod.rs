// Tool Implementations
//
// The IoTool trait, the resolved input handed to tools, and the built-in
// tools shipped with the pipeline. Tools never see raw payloads: the
// dispatcher resolves bytes into the kind each tool registered for.

mod decompress;
mod embedded;
mod ghosts;
mod optimize;
mod thumbnail;
mod to_json;

pub use decompress::DecompressGbxTool;
pub use embedded::{ExtractEmbeddedItemsTool, OptimizeEmbeddedItemsTool};
pub use ghosts::ExtractGhostsTool;
pub use optimize::OptimizeGbxTool;
pub use thumbnail::ExtractThumbnailTool;
pub use to_json::GbxToJsonTool;

use std::sync::Arc;

use bytesize::ByteSize;
use thiserror::Error;

use crate::codec::{CodecError, GbxCodec, ParsedGbx};
use crate::data::{BinPayload, GbxBytes, TextPayload, ToolOutput};
use crate::progress::ToolContext;
use crate::registry::{InputKind, OutputKind, ToolDescriptor, ToolRegistry};

/// Errors a tool can produce.
#[derive(Error, Debug)]
pub enum ToolError {
	/// The resolved input did not match what the tool expects. Hitting this
	/// means a tool was registered under the wrong input kind, or fed a node
	/// kind it cannot work with.
	#[error("tool '{tool}' expected {expected}, got {actual}")]
	UnmatchingInput { tool: &'static str, expected: &'static str, actual: &'static str },

	/// The tool understood its input but could not do its job.
	#[error("{0}")]
	Failed(String),

	#[error(transparent)]
	Codec(#[from] CodecError),
}

/// Input handed to a tool, already resolved to its registered kind.
#[derive(Debug, Clone)]
pub enum ToolInput {
	Binary(BinPayload),
	Text(TextPayload),
	Gbx(GbxBytes),
	Parsed(ParsedGbx),
}

impl ToolInput {
	/// Short lowercase label for error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			ToolInput::Binary(_) => "binary data",
			ToolInput::Text(_) => "text data",
			ToolInput::Gbx(_) => "gbx data",
			ToolInput::Parsed(_) => "parsed gbx",
		}
	}

	pub fn into_binary(self, tool: &'static str) -> Result<BinPayload, ToolError> {
		match self {
			ToolInput::Binary(bin) => Ok(bin),
			other => Err(ToolError::UnmatchingInput {
				tool,
				expected: "binary data",
				actual: other.kind(),
			}),
		}
	}

	pub fn into_text(self, tool: &'static str) -> Result<TextPayload, ToolError> {
		match self {
			ToolInput::Text(text) => Ok(text),
			other => Err(ToolError::UnmatchingInput {
				tool,
				expected: "text data",
				actual: other.kind(),
			}),
		}
	}

	pub fn into_gbx(self, tool: &'static str) -> Result<GbxBytes, ToolError> {
		match self {
			ToolInput::Gbx(gbx) => Ok(gbx),
			other => Err(ToolError::UnmatchingInput {
				tool,
				expected: "gbx data",
				actual: other.kind(),
			}),
		}
	}

	pub fn into_parsed(self, tool: &'static str) -> Result<ParsedGbx, ToolError> {
		match self {
			ToolInput::Parsed(gbx) => Ok(gbx),
			other => Err(ToolError::UnmatchingInput {
				tool,
				expected: "parsed gbx",
				actual: other.kind(),
			}),
		}
	}
}

/// One tool. Implementations hold at most shared handles (usually the
/// codec) and must be safe to invoke concurrently.
#[async_trait::async_trait]
pub trait IoTool: Send + Sync {
	/// Process one resolved input, producing zero or more outputs.
	async fn process(&self, input: ToolInput, cx: &ToolContext) -> Result<Vec<ToolOutput>, ToolError>;
}

/// Build a registry holding every built-in tool, all sharing one codec.
pub fn builtin_registry(codec: Arc<dyn GbxCodec>) -> ToolRegistry {
	let mut registry = ToolRegistry::new();

	registry.register(
		ToolDescriptor::new(OptimizeGbxTool::ID, "Optimize Gbx", InputKind::GbxBytes, OutputKind::Gbx),
		Arc::new(OptimizeGbxTool::new(codec.clone())),
	);
	registry.register(
		ToolDescriptor::new(
			DecompressGbxTool::ID,
			"Decompress Gbx",
			InputKind::GbxBytes,
			OutputKind::Gbx,
		),
		Arc::new(DecompressGbxTool::new(codec.clone())),
	);
	registry.register(
		ToolDescriptor::new(
			GbxToJsonTool::ID,
			"Gbx to JSON",
			InputKind::Parsed { header_only: false },
			OutputKind::Text,
		),
		Arc::new(GbxToJsonTool::new()),
	);
	registry.register(
		ToolDescriptor::new(
			ExtractThumbnailTool::ID,
			"Extract thumbnail/icon",
			InputKind::Parsed { header_only: true },
			OutputKind::Binary,
		),
		Arc::new(ExtractThumbnailTool::new()),
	);
	registry.register(
		ToolDescriptor::new(
			ExtractGhostsTool::ID,
			"Extract ghosts",
			InputKind::Parsed { header_only: false },
			OutputKind::Gbx,
		),
		Arc::new(ExtractGhostsTool::new(codec.clone())),
	);
	registry.register(
		ToolDescriptor::new(
			ExtractEmbeddedItemsTool::ID,
			"Extract embedded items",
			InputKind::Parsed { header_only: false },
			OutputKind::Binary,
		),
		Arc::new(ExtractEmbeddedItemsTool::new()),
	);
	registry.register(
		ToolDescriptor::new(
			OptimizeEmbeddedItemsTool::ID,
			"Optimize embedded items",
			InputKind::Parsed { header_only: false },
			OutputKind::Gbx,
		),
		Arc::new(OptimizeEmbeddedItemsTool::new(codec)),
	);

	registry
}

/// Format a signed byte delta for result messages, "-12 B" style.
pub(crate) fn signed_size(delta: i64) -> String {
	let size = ByteSize(delta.unsigned_abs());
	if delta < 0 { format!("-{size}") } else { size.to_string() }
}

/// Render `delta` as a percentage of `base`, "12.34 %" style.
pub(crate) fn percent(delta: i64, base: usize) -> String {
	format!("{:.2} %", delta as f64 * 100.0 / base as f64)
}
