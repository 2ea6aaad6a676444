// Typed Gbx Node Model
//
// A deliberately small view over parsed Gbx content. Tools only need the
// handful of node kinds and fields below; everything else a codec knows
// about stays on its side of the boundary.

use bytes::Bytes;
use serde::Serialize;

/// Basic header fields shared by every Gbx file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GbxHeader {
	/// Engine class id of the root node.
	pub class_id: u32,
	/// Gbx format version.
	pub version: u16,
	/// Whether the body was stored compressed.
	pub compressed_body: bool,
}

/// The root node of a parsed Gbx file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GbxNode {
	Map(MapNode),
	Replay(ReplayNode),
	Ghost(GhostNode),
	Clip(ClipNode),
	Item(ItemNode),
}

impl GbxNode {
	/// Short lowercase label for log and error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			GbxNode::Map(_) => "map",
			GbxNode::Replay(_) => "replay",
			GbxNode::Ghost(_) => "ghost",
			GbxNode::Clip(_) => "clip",
			GbxNode::Item(_) => "item",
		}
	}

	/// Engine class id for this node kind.
	pub fn class_id(&self) -> u32 {
		match self {
			GbxNode::Map(_) => 0x0304_3000,
			GbxNode::Replay(_) => 0x0309_3000,
			GbxNode::Ghost(_) => 0x0309_2000,
			GbxNode::Clip(_) => 0x0307_9000,
			GbxNode::Item(_) => 0x2E00_2000,
		}
	}
}

/// A map (challenge), with the header-stored extras tools care about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapNode {
	pub name: Option<String>,
	/// JPEG thumbnail stored in the header, if the map has one.
	pub thumbnail: Option<Bytes>,
	/// Zip pack of embedded items, if the map embeds any.
	pub embedded_items: Option<Bytes>,
	/// Media clips attached to the map (intro, in-game, podium).
	pub clips: Vec<ClipNode>,
}

impl MapNode {
	/// Ghosts reachable through the attached media clips.
	pub fn ghosts(&self) -> Vec<&GhostNode> {
		self.clips.iter().flat_map(|clip| clip.ghosts()).collect()
	}
}

/// A replay: recorded ghosts plus an optional media clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayNode {
	pub ghosts: Vec<GhostNode>,
	pub clip: Option<ClipNode>,
}

impl ReplayNode {
	/// All ghosts in the replay, the directly recorded ones first, then any
	/// that only live inside the clip.
	pub fn ghosts(&self) -> Vec<&GhostNode> {
		let mut ghosts: Vec<&GhostNode> = self.ghosts.iter().collect();
		if let Some(clip) = &self.clip {
			ghosts.extend(clip.ghosts());
		}
		ghosts
	}
}

/// A standalone ghost.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostNode {
	pub name: Option<String>,
	pub race_time_ms: Option<u32>,
}

/// A media clip. Only the ghost blocks matter to the shipped tools.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipNode {
	pub ghosts: Vec<GhostNode>,
}

impl ClipNode {
	pub fn ghosts(&self) -> Vec<&GhostNode> {
		self.ghosts.iter().collect()
	}
}

/// A collector item, such as a custom block or decoration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemNode {
	/// Icon image stored in the header, if the item has one.
	pub icon: Option<Bytes>,
}

/// A fully parsed Gbx file: header, root node, and the path it arrived
/// under (file name or archive entry name), when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedGbx {
	pub path: Option<String>,
	pub header: GbxHeader,
	pub node: GbxNode,
}

impl ParsedGbx {
	pub fn new(header: GbxHeader, node: GbxNode) -> Self {
		Self { path: None, header, node }
	}

	pub fn kind(&self) -> &'static str {
		self.node.kind()
	}
}
