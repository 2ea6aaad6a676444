// Optimize Gbx Tool

use std::sync::Arc;

use super::{percent, signed_size, IoTool, ToolError, ToolInput};
use crate::codec::GbxCodec;
use crate::data::{BinPayload, ToolOutput};
use crate::progress::ToolContext;

/// Recompresses a Gbx body, shrinking files that were stored uncompressed
/// or with a weak compression pass.
pub struct OptimizeGbxTool {
	codec: Arc<dyn GbxCodec>,
}

impl OptimizeGbxTool {
	pub const ID: &'static str = "optimize-gbx";

	pub fn new(codec: Arc<dyn GbxCodec>) -> Self {
		Self { codec }
	}
}

#[async_trait::async_trait]
impl IoTool for OptimizeGbxTool {
	async fn process(&self, input: ToolInput, cx: &ToolContext) -> Result<Vec<ToolOutput>, ToolError> {
		let gbx = input.into_gbx(Self::ID)?;
		let output = self.codec.compress(&gbx.data).await?;

		let saved = gbx.data.len() as i64 - output.len() as i64;
		cx.report(format!(
			"Optimized by {} ({}).",
			percent(saved, gbx.data.len()),
			signed_size(saved),
		))
		.await;

		Ok(vec![BinPayload { name: gbx.name, data: output.into() }.into()])
	}
}
