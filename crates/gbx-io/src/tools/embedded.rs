// Embedded Item Tools
//
// Maps can carry a zip pack of custom items. One tool hands that pack to
// the user as-is, the other rewrites it with maximum deflate compression
// and saves the map back.

use std::io::Cursor;
use std::sync::Arc;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{percent, signed_size, IoTool, ToolError, ToolInput};
use crate::codec::{GbxCodec, GbxNode};
use crate::data::{BinPayload, ToolOutput};
use crate::progress::ToolContext;

/// Extracts the embedded item pack of a map as a zip file.
pub struct ExtractEmbeddedItemsTool;

impl ExtractEmbeddedItemsTool {
	pub const ID: &'static str = "extract-embedded-items";

	pub fn new() -> Self {
		Self
	}
}

impl Default for ExtractEmbeddedItemsTool {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait::async_trait]
impl IoTool for ExtractEmbeddedItemsTool {
	async fn process(&self, input: ToolInput, _cx: &ToolContext) -> Result<Vec<ToolOutput>, ToolError> {
		let gbx = input.into_parsed(Self::ID)?;

		let GbxNode::Map(map) = &gbx.node else {
			return Err(ToolError::UnmatchingInput {
				tool: Self::ID,
				expected: "a map",
				actual: gbx.node.kind(),
			});
		};

		let pack = match &map.embedded_items {
			Some(pack) if !pack.is_empty() => pack.clone(),
			_ => return Err(ToolError::Failed("no embedded items found".to_string())),
		};

		let path = gbx.path.as_deref().unwrap_or("unknown");
		Ok(vec![BinPayload::new(format!("{path}.zip"), pack).into()])
	}
}

/// Recompresses the embedded item pack of a map with the strongest deflate
/// setting and writes the map back out.
pub struct OptimizeEmbeddedItemsTool {
	codec: Arc<dyn GbxCodec>,
}

impl OptimizeEmbeddedItemsTool {
	pub const ID: &'static str = "optimize-embedded-items";

	pub fn new(codec: Arc<dyn GbxCodec>) -> Self {
		Self { codec }
	}
}

#[async_trait::async_trait]
impl IoTool for OptimizeEmbeddedItemsTool {
	async fn process(&self, input: ToolInput, cx: &ToolContext) -> Result<Vec<ToolOutput>, ToolError> {
		let mut gbx = input.into_parsed(Self::ID)?;

		let actual = gbx.node.kind();
		let GbxNode::Map(map) = &mut gbx.node else {
			return Err(ToolError::UnmatchingInput { tool: Self::ID, expected: "a map", actual });
		};

		let pack = match &map.embedded_items {
			Some(pack) if !pack.is_empty() => pack.clone(),
			_ => return Err(ToolError::Failed("no embedded items found".to_string())),
		};

		let repacked = repack(&pack)
			.map_err(|err| ToolError::Failed(format!("failed to repack embedded items: {err}")))?;

		let saved = pack.len() as i64 - repacked.len() as i64;
		let message = if saved >= 0 {
			format!(
				"Embedded data optimized by {} ({}).",
				percent(saved, pack.len()),
				signed_size(saved),
			)
		} else {
			format!(
				"Embedded data unfortunately increased by {} ({}).",
				percent(-saved, pack.len()),
				signed_size(-saved),
			)
		};
		cx.report(message).await;

		map.embedded_items = Some(repacked.into());

		let output = self.codec.write(&gbx).await?;
		Ok(vec![BinPayload { name: gbx.path, data: output.into() }.into()])
	}
}

/// Rebuild a zip pack entry by entry with best compression. Directory
/// markers are dropped, file entries keep their names and contents.
fn repack(pack: &[u8]) -> Result<Vec<u8>, zip::result::ZipError> {
	let mut archive = ZipArchive::new(Cursor::new(pack))?;
	let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
	let options = SimpleFileOptions::default()
		.compression_method(CompressionMethod::Deflated)
		.compression_level(Some(9));

	for index in 0..archive.len() {
		let mut entry = archive.by_index(index)?;
		if entry.is_dir() {
			continue;
		}
		let name = entry.name().to_string();
		writer.start_file(name, options)?;
		std::io::copy(&mut entry, &mut writer)?;
	}

	Ok(writer.finish()?.into_inner())
}
