// Gbx to JSON Tool

use super::{IoTool, ToolError, ToolInput};
use crate::data::{TextPayload, ToolOutput};
use crate::progress::ToolContext;

/// Dumps a parsed Gbx node as pretty-printed JSON.
pub struct GbxToJsonTool;

impl GbxToJsonTool {
	pub const ID: &'static str = "gbx-to-json";

	pub fn new() -> Self {
		Self
	}
}

impl Default for GbxToJsonTool {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait::async_trait]
impl IoTool for GbxToJsonTool {
	async fn process(&self, input: ToolInput, _cx: &ToolContext) -> Result<Vec<ToolOutput>, ToolError> {
		let gbx = input.into_parsed(Self::ID)?;

		let json = serde_json::to_string_pretty(&gbx)
			.map_err(|err| ToolError::Failed(format!("failed to render gbx as json: {err}")))?;

		Ok(vec![TextPayload::new(gbx.path, json, "json").into()])
	}
}
