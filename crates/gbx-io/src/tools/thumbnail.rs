// Extract Thumbnail Tool

use super::{IoTool, ToolError, ToolInput};
use crate::codec::GbxNode;
use crate::data::{BinPayload, ToolOutput};
use crate::progress::ToolContext;

/// Pulls the thumbnail out of a map, or the icon out of a collector item.
/// Registered header-only, both images live in the Gbx header.
pub struct ExtractThumbnailTool;

impl ExtractThumbnailTool {
	pub const ID: &'static str = "extract-thumbnail";

	pub fn new() -> Self {
		Self
	}
}

impl Default for ExtractThumbnailTool {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait::async_trait]
impl IoTool for ExtractThumbnailTool {
	async fn process(&self, input: ToolInput, _cx: &ToolContext) -> Result<Vec<ToolOutput>, ToolError> {
		let gbx = input.into_parsed(Self::ID)?;
		let path = gbx.path.as_deref().unwrap_or("unknown");

		// Nodes without an image, and node kinds that cannot carry one,
		// produce no output rather than an error.
		let output = match &gbx.node {
			GbxNode::Map(map) => map
				.thumbnail
				.clone()
				.map(|thumbnail| BinPayload::new(format!("{path}.jpg"), thumbnail)),
			GbxNode::Item(item) => item
				.icon
				.clone()
				.map(|icon| BinPayload::new(format!("{path}.png"), icon)),
			_ => None,
		};

		Ok(output.into_iter().map(ToolOutput::from).collect())
	}
}
