// Decompress Gbx Tool

use std::sync::Arc;

use super::{percent, signed_size, IoTool, ToolError, ToolInput};
use crate::codec::GbxCodec;
use crate::data::{BinPayload, ToolOutput};
use crate::progress::ToolContext;

/// Rewrites a Gbx file with its body stored uncompressed, which some
/// editing tools need before they can patch the file in place.
pub struct DecompressGbxTool {
	codec: Arc<dyn GbxCodec>,
}

impl DecompressGbxTool {
	pub const ID: &'static str = "decompress-gbx";

	pub fn new(codec: Arc<dyn GbxCodec>) -> Self {
		Self { codec }
	}
}

#[async_trait::async_trait]
impl IoTool for DecompressGbxTool {
	async fn process(&self, input: ToolInput, cx: &ToolContext) -> Result<Vec<ToolOutput>, ToolError> {
		let gbx = input.into_gbx(Self::ID)?;
		let output = self.codec.decompress(&gbx.data).await?;

		let increased = output.len() as i64 - gbx.data.len() as i64;
		cx.report(format!(
			"Decompressed. File size increased by {} ({}).",
			signed_size(increased),
			percent(increased, gbx.data.len()),
		))
		.await;

		Ok(vec![BinPayload { name: gbx.name, data: output.into() }.into()])
	}
}
