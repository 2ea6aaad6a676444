// Extract Ghosts Tool

use std::sync::Arc;

use super::{IoTool, ToolError, ToolInput};
use crate::codec::{GbxCodec, GbxHeader, GbxNode, GhostNode, ParsedGbx};
use crate::data::{BinPayload, ToolOutput};
use crate::progress::ToolContext;

/// Splits every ghost out of a replay, clip, or map into its own Gbx file.
pub struct ExtractGhostsTool {
	codec: Arc<dyn GbxCodec>,
}

impl ExtractGhostsTool {
	pub const ID: &'static str = "extract-ghosts";

	pub fn new(codec: Arc<dyn GbxCodec>) -> Self {
		Self { codec }
	}
}

#[async_trait::async_trait]
impl IoTool for ExtractGhostsTool {
	async fn process(&self, input: ToolInput, _cx: &ToolContext) -> Result<Vec<ToolOutput>, ToolError> {
		let gbx = input.into_parsed(Self::ID)?;

		let ghosts: Vec<&GhostNode> = match &gbx.node {
			GbxNode::Replay(replay) => replay.ghosts(),
			GbxNode::Clip(clip) => clip.ghosts(),
			GbxNode::Map(map) => map.ghosts(),
			_ => {
				return Err(ToolError::UnmatchingInput {
					tool: Self::ID,
					expected: "a replay, clip, or map",
					actual: gbx.node.kind(),
				});
			},
		};

		let stem = gbx.path.as_deref().map(file_stem).unwrap_or("Ghost");

		let mut outputs = Vec::with_capacity(ghosts.len());
		for (i, ghost) in ghosts.into_iter().enumerate() {
			let node = GbxNode::Ghost(ghost.clone());
			let header = GbxHeader { class_id: node.class_id(), ..gbx.header };
			let ghost_gbx = ParsedGbx {
				path: Some(format!("{stem}_{num:02}.Ghost.Gbx", num = i + 1)),
				header,
				node,
			};

			let data = self.codec.write(&ghost_gbx).await?;
			outputs.push(BinPayload { name: ghost_gbx.path, data: data.into() }.into());
		}

		Ok(outputs)
	}
}

/// File name without directories and without the stacked Gbx extensions,
/// so "Runs/MyRun.Replay.Gbx" becomes "MyRun".
fn file_stem(path: &str) -> &str {
	let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
	name.split('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::{ClipNode, MapNode, MockCodec, ReplayNode};

	fn ghost(name: &str) -> GhostNode {
		GhostNode { name: Some(name.to_string()), race_time_ms: Some(48_512) }
	}

	fn parsed(path: Option<&str>, node: GbxNode) -> ToolInput {
		ToolInput::Parsed(ParsedGbx {
			path: path.map(str::to_string),
			header: GbxHeader { class_id: 0x0309_3000, version: 6, compressed_body: true },
			node,
		})
	}

	#[test]
	fn test_file_stem_cuts_directories_and_extensions() {
		assert_eq!(file_stem("Runs/MyRun.Replay.Gbx"), "MyRun");
		assert_eq!(file_stem("C:\\maps\\Loop.Map.Gbx"), "Loop");
		assert_eq!(file_stem("plain"), "plain");
	}

	#[tokio::test]
	async fn test_replay_ghosts_become_numbered_gbx_files() {
		let tool = ExtractGhostsTool::new(Arc::new(MockCodec::new()));
		let cx = ToolContext::detached();

		let node = GbxNode::Replay(ReplayNode {
			ghosts: vec![ghost("first"), ghost("second")],
			clip: Some(ClipNode { ghosts: vec![ghost("clipped")] }),
		});
		let outputs = tool
			.process(parsed(Some("Runs/MyRun.Replay.Gbx"), node), &cx)
			.await
			.unwrap();

		let names: Vec<_> = outputs.iter().map(|o| o.name().unwrap().to_string()).collect();
		assert_eq!(
			names,
			vec!["MyRun_01.Ghost.Gbx", "MyRun_02.Ghost.Gbx", "MyRun_03.Ghost.Gbx"]
		);

		let ToolOutput::Bin(bin) = &outputs[0] else {
			panic!("expected binary outputs");
		};
		assert_eq!(bin.data.as_ref(), b"GBXG");
	}

	#[tokio::test]
	async fn test_unnamed_input_falls_back_to_ghost_stem() {
		let tool = ExtractGhostsTool::new(Arc::new(MockCodec::new()));
		let cx = ToolContext::detached();

		let node = GbxNode::Clip(ClipNode { ghosts: vec![ghost("only")] });
		let outputs = tool.process(parsed(None, node), &cx).await.unwrap();

		assert_eq!(outputs[0].name(), Some("Ghost_01.Ghost.Gbx"));
	}

	#[tokio::test]
	async fn test_map_without_clips_yields_no_ghosts() {
		let tool = ExtractGhostsTool::new(Arc::new(MockCodec::new()));
		let cx = ToolContext::detached();

		let node = GbxNode::Map(MapNode {
			name: None,
			thumbnail: None,
			embedded_items: None,
			clips: vec![],
		});
		let outputs = tool.process(parsed(Some("Empty.Map.Gbx"), node), &cx).await.unwrap();

		assert!(outputs.is_empty());
	}

	#[tokio::test]
	async fn test_ghost_input_is_rejected() {
		let tool = ExtractGhostsTool::new(Arc::new(MockCodec::new()));
		let cx = ToolContext::detached();

		let err = tool
			.process(parsed(Some("Run.Ghost.Gbx"), GbxNode::Ghost(ghost("g"))), &cx)
			.await
			.unwrap_err();

		assert_eq!(
			err.to_string(),
			"tool 'extract-ghosts' expected a replay, clip, or map, got ghost"
		);
	}
}
