// Tool Dispatch Pipeline
//
// The entry point hosts call: look the tool up, resolve the payload into
// the input kind the tool registered for, expand zip containers into
// per-entry invocations, and collect outputs in order.
//
// Failure handling is deliberately lopsided. Single-payload runs are
// strict, the first error aborts the run. Entries of a parsed archive are
// lenient, a bad entry is logged and skipped so one broken file cannot
// sink a whole batch.

mod archive;
mod error;

pub use error::DispatchError;

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::codec::{GbxCodec, ParseOutcome};
use crate::data::{likely_gbx, BinPayload, GbxBytes, ToolOutput};
use crate::progress::ToolContext;
use crate::registry::{InputKind, RegisteredTool, ToolRegistry};
use crate::tools::ToolInput;

/// Dispatches payloads to registered tools.
pub struct ToolDispatcher {
	registry: Arc<ToolRegistry>,
	codec: Arc<dyn GbxCodec>,
}

impl ToolDispatcher {
	pub fn new(registry: Arc<ToolRegistry>, codec: Arc<dyn GbxCodec>) -> Self {
		Self { registry, codec }
	}

	pub fn registry(&self) -> &ToolRegistry {
		&self.registry
	}

	/// Run one payload through the tool registered under `tool_id`.
	///
	/// An unknown id is not an error: it logs a warning and yields no
	/// outputs. Cancellation is checked here and before every archive
	/// entry, and surfaces as [`DispatchError::Cancelled`].
	pub async fn process(
		&self,
		tool_id: &str,
		payload: BinPayload,
		cx: &ToolContext,
	) -> Result<Vec<ToolOutput>, DispatchError> {
		if cx.is_cancelled() {
			return Err(DispatchError::Cancelled);
		}

		let Some(entry) = self.registry.get(tool_id) else {
			warn!(target: "gbx_io", tool = %tool_id, "tool not found");
			return Ok(Vec::new());
		};

		debug!(target: "gbx_io", tool = %tool_id, input = ?entry.descriptor().input, "dispatching payload");

		match entry.descriptor().input {
			InputKind::Binary => Ok(entry.tool().process(ToolInput::Binary(payload), cx).await?),
			InputKind::Text => {
				Ok(entry.tool().process(ToolInput::Text(payload.into_text()), cx).await?)
			},
			InputKind::GbxBytes => self.process_gbx(entry, payload, cx).await,
			InputKind::Parsed { header_only } => {
				self.process_parsed(entry, payload, header_only, cx).await
			},
		}
	}

	/// Gbx-bytes resolution: hand the payload over if it carries the magic,
	/// otherwise expand it as a zip of Gbx files. Tool errors are strict on
	/// both paths.
	async fn process_gbx(
		&self,
		entry: &RegisteredTool,
		payload: BinPayload,
		cx: &ToolContext,
	) -> Result<Vec<ToolOutput>, DispatchError> {
		if likely_gbx(&payload.data) {
			let gbx = GbxBytes { name: payload.name, data: payload.data };
			let outputs = entry.tool().process(ToolInput::Gbx(gbx), cx).await?;
			return Ok(outputs);
		}

		let Some(mut archive) = archive::open(&payload.data) else {
			warn!(target: "gbx_io", "payload is neither gbx data nor a zip archive");
			return Ok(Vec::new());
		};

		let mut outputs = Vec::new();
		for index in 0..archive.len() {
			if cx.is_cancelled() {
				return Err(DispatchError::Cancelled);
			}
			let Some(item) = archive::read_entry(&mut archive, index) else {
				continue;
			};
			let Some(gbx) = GbxBytes::checked(Some(item.path.clone()), item.data) else {
				warn!(target: "gbx_io", entry = %item.path, "archive entry is not gbx data");
				continue;
			};
			outputs.extend(entry.tool().process(ToolInput::Gbx(gbx), cx).await?);
		}

		Ok(outputs)
	}

	/// Parsed resolution: parse the whole payload, or expand it as a zip
	/// and parse entry by entry. A parse failure on the whole payload is
	/// strict, per-entry failures are logged and skipped.
	async fn process_parsed(
		&self,
		entry: &RegisteredTool,
		payload: BinPayload,
		header_only: bool,
		cx: &ToolContext,
	) -> Result<Vec<ToolOutput>, DispatchError> {
		if let ParseOutcome::Recognized(mut gbx) =
			self.codec.try_parse(&payload.data, header_only).await?
		{
			gbx.path = payload.name;
			let outputs = entry.tool().process(ToolInput::Parsed(gbx), cx).await?;
			return Ok(outputs);
		}

		let Some(mut archive) = archive::open(&payload.data) else {
			warn!(target: "gbx_io", "payload is neither gbx data nor a zip archive");
			return Ok(Vec::new());
		};

		let mut outputs = Vec::new();
		for index in 0..archive.len() {
			if cx.is_cancelled() {
				return Err(DispatchError::Cancelled);
			}
			let Some(item) = archive::read_entry(&mut archive, index) else {
				continue;
			};
			cx.report(item.path.clone()).await;

			match self.codec.try_parse(&item.data, header_only).await {
				Ok(ParseOutcome::Recognized(mut gbx)) => {
					gbx.path = Some(item.path.clone());
					match entry.tool().process(ToolInput::Parsed(gbx), cx).await {
						Ok(more) => outputs.extend(more),
						Err(err) => {
							error!(target: "gbx_io", entry = %item.path, error = %err, "failed to process archive entry");
						},
					}
				},
				// Non-Gbx entries are normal in mixed archives.
				Ok(ParseOutcome::NotRecognized) => {},
				Err(err) => {
					error!(target: "gbx_io", entry = %item.path, error = %err, "failed to parse archive entry");
				},
			}
		}

		Ok(outputs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Mutex;

	use crate::codec::MockCodec;
	use crate::data::TextPayload;
	use crate::registry::{OutputKind, ToolDescriptor};
	use crate::tools::ToolError;

	/// Records the kind of every input it sees and echoes nothing back.
	struct RecordingTool {
		kinds: Mutex<Vec<&'static str>>,
		calls: AtomicUsize,
	}

	impl RecordingTool {
		fn new() -> Self {
			Self { kinds: Mutex::new(Vec::new()), calls: AtomicUsize::new(0) }
		}
	}

	#[async_trait::async_trait]
	impl crate::tools::IoTool for RecordingTool {
		async fn process(
			&self,
			input: ToolInput,
			_cx: &ToolContext,
		) -> Result<Vec<ToolOutput>, ToolError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.kinds.lock().unwrap().push(input.kind());
			Ok(vec![])
		}
	}

	fn dispatcher_with(
		input: InputKind,
		tool: Arc<dyn crate::tools::IoTool>,
	) -> ToolDispatcher {
		let mut registry = ToolRegistry::new();
		registry.register(ToolDescriptor::new("probe", "Probe", input, OutputKind::Binary), tool);
		ToolDispatcher::new(Arc::new(registry), Arc::new(MockCodec::new()))
	}

	#[tokio::test]
	async fn test_unknown_tool_yields_no_outputs() {
		let dispatcher = dispatcher_with(InputKind::Binary, Arc::new(RecordingTool::new()));
		let cx = ToolContext::detached();

		let outputs = dispatcher
			.process("no-such-tool", BinPayload::unnamed(&b"data"[..]), &cx)
			.await
			.unwrap();

		assert!(outputs.is_empty());
	}

	#[tokio::test]
	async fn test_binary_payload_passes_through_untouched() {
		let tool = Arc::new(RecordingTool::new());
		let dispatcher = dispatcher_with(InputKind::Binary, tool.clone());
		let cx = ToolContext::detached();

		dispatcher.process("probe", BinPayload::unnamed(&b"\x00\x01"[..]), &cx).await.unwrap();

		assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
		assert_eq!(*tool.kinds.lock().unwrap(), vec!["binary data"]);
	}

	#[tokio::test]
	async fn test_text_payload_is_decoded_before_the_tool() {
		struct TextCheck;

		#[async_trait::async_trait]
		impl crate::tools::IoTool for TextCheck {
			async fn process(
				&self,
				input: ToolInput,
				_cx: &ToolContext,
			) -> Result<Vec<ToolOutput>, ToolError> {
				let text = input.into_text("probe")?;
				assert_eq!(text.text, "hello");
				Ok(vec![TextPayload::new(None, text.text, "txt").into()])
			}
		}

		let dispatcher = dispatcher_with(InputKind::Text, Arc::new(TextCheck));
		let cx = ToolContext::detached();

		let outputs = dispatcher
			.process("probe", BinPayload::unnamed(&b"hello"[..]), &cx)
			.await
			.unwrap();

		assert_eq!(outputs.len(), 1);
	}

	#[tokio::test]
	async fn test_gbx_payload_reaches_a_gbx_tool() {
		let tool = Arc::new(RecordingTool::new());
		let dispatcher = dispatcher_with(InputKind::GbxBytes, tool.clone());
		let cx = ToolContext::detached();

		dispatcher
			.process("probe", BinPayload::new("a.Gbx", &b"GBX\x06data"[..]), &cx)
			.await
			.unwrap();

		assert_eq!(*tool.kinds.lock().unwrap(), vec!["gbx data"]);
	}

	#[tokio::test]
	async fn test_non_gbx_non_zip_payload_is_dropped() {
		let tool = Arc::new(RecordingTool::new());
		let dispatcher = dispatcher_with(InputKind::GbxBytes, tool.clone());
		let cx = ToolContext::detached();

		let outputs = dispatcher
			.process("probe", BinPayload::unnamed(&b"plain text"[..]), &cx)
			.await
			.unwrap();

		assert!(outputs.is_empty());
		assert_eq!(tool.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_parsed_payload_carries_the_file_name() {
		struct PathCheck;

		#[async_trait::async_trait]
		impl crate::tools::IoTool for PathCheck {
			async fn process(
				&self,
				input: ToolInput,
				_cx: &ToolContext,
			) -> Result<Vec<ToolOutput>, ToolError> {
				let gbx = input.into_parsed("probe")?;
				assert_eq!(gbx.path.as_deref(), Some("Track.Map.Gbx"));
				assert_eq!(gbx.kind(), "map");
				Ok(vec![])
			}
		}

		let dispatcher =
			dispatcher_with(InputKind::Parsed { header_only: false }, Arc::new(PathCheck));
		let cx = ToolContext::detached();

		dispatcher
			.process("probe", BinPayload::new("Track.Map.Gbx", &b"GBXMthumb"[..]), &cx)
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn test_corrupt_single_payload_is_strict() {
		let dispatcher =
			dispatcher_with(InputKind::Parsed { header_only: false }, Arc::new(RecordingTool::new()));
		let cx = ToolContext::detached();

		// 'X' makes the mock codec report corruption.
		let err = dispatcher
			.process("probe", BinPayload::new("bad.Gbx", &b"GBXXoops"[..]), &cx)
			.await
			.unwrap_err();

		assert!(matches!(err, DispatchError::Codec(_)));
	}

	#[tokio::test]
	async fn test_cancelled_before_start() {
		let tool = Arc::new(RecordingTool::new());
		let dispatcher = dispatcher_with(InputKind::Binary, tool.clone());
		let cx = ToolContext::detached();
		cx.cancel_token().cancel();

		let err = dispatcher
			.process("probe", BinPayload::unnamed(&b"data"[..]), &cx)
			.await
			.unwrap_err();

		assert!(err.is_cancelled());
		assert_eq!(tool.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_header_only_flag_reaches_the_codec() {
		let codec = Arc::new(MockCodec::new());
		let mut registry = ToolRegistry::new();
		registry.register(
			ToolDescriptor::new(
				"probe",
				"Probe",
				InputKind::Parsed { header_only: true },
				OutputKind::Binary,
			),
			Arc::new(RecordingTool::new()),
		);
		let dispatcher = ToolDispatcher::new(Arc::new(registry), codec.clone());
		let cx = ToolContext::detached();

		dispatcher
			.process("probe", BinPayload::new("a.Gbx", &b"GBXMthumb"[..]), &cx)
			.await
			.unwrap();

		assert_eq!(codec.header_only_calls(), vec![true]);
	}
}
