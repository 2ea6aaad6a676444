// Tool Registry
//
// Maps stable string ids to tool implementations plus their descriptors.
// Hosts build one registry up front (usually via tools::builtin_registry)
// and hand it to the dispatcher behind an Arc.

mod types;

pub use types::{InputKind, OutputKind, ToolDescriptor};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::tools::IoTool;

/// A tool implementation together with the descriptor it was registered under.
pub struct RegisteredTool {
	descriptor: ToolDescriptor,
	tool: Arc<dyn IoTool>,
}

impl RegisteredTool {
	pub fn descriptor(&self) -> &ToolDescriptor {
		&self.descriptor
	}

	pub fn tool(&self) -> &Arc<dyn IoTool> {
		&self.tool
	}
}

/// Registry of every tool the pipeline can dispatch to.
#[derive(Default)]
pub struct ToolRegistry {
	tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
	pub fn new() -> Self {
		Self { tools: HashMap::new() }
	}

	/// Register a tool under its descriptor id. Registering the same id
	/// twice replaces the earlier tool.
	pub fn register(&mut self, descriptor: ToolDescriptor, tool: Arc<dyn IoTool>) {
		let id = descriptor.id.clone();
		if self.tools.insert(id.clone(), RegisteredTool { descriptor, tool }).is_some() {
			warn!(target: "gbx_io", tool = %id, "replacing previously registered tool");
		}
	}

	/// Look up a tool by id.
	pub fn get(&self, id: &str) -> Option<&RegisteredTool> {
		self.tools.get(id)
	}

	/// Descriptors of every registered tool, sorted by id.
	pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
		let mut descriptors: Vec<_> = self.tools.values().map(RegisteredTool::descriptor).collect();
		descriptors.sort_by_key(|d| d.id.as_str());
		descriptors
	}

	pub fn len(&self) -> usize {
		self.tools.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tools.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::ToolOutput;
	use crate::progress::ToolContext;
	use crate::tools::{ToolError, ToolInput};

	struct NullTool;

	#[async_trait::async_trait]
	impl IoTool for NullTool {
		async fn process(
			&self,
			_input: ToolInput,
			_cx: &ToolContext,
		) -> Result<Vec<ToolOutput>, ToolError> {
			Ok(vec![])
		}
	}

	fn descriptor(id: &str, name: &str) -> ToolDescriptor {
		ToolDescriptor::new(id, name, InputKind::Binary, OutputKind::Binary)
	}

	#[test]
	fn test_register_and_lookup() {
		let mut registry = ToolRegistry::new();
		assert!(registry.is_empty());

		registry.register(descriptor("a-tool", "A tool"), Arc::new(NullTool));

		assert_eq!(registry.len(), 1);
		assert!(registry.get("a-tool").is_some());
		assert!(registry.get("missing").is_none());
	}

	#[test]
	fn test_duplicate_id_replaces_descriptor() {
		let mut registry = ToolRegistry::new();
		registry.register(descriptor("a-tool", "First"), Arc::new(NullTool));
		registry.register(descriptor("a-tool", "Second"), Arc::new(NullTool));

		assert_eq!(registry.len(), 1);
		let entry = registry.get("a-tool").unwrap();
		assert_eq!(entry.descriptor().name, "Second");
	}

	#[test]
	fn test_descriptors_sorted_by_id() {
		let mut registry = ToolRegistry::new();
		registry.register(descriptor("zeta", "Z"), Arc::new(NullTool));
		registry.register(descriptor("alpha", "A"), Arc::new(NullTool));
		registry.register(descriptor("mid", "M"), Arc::new(NullTool));

		let ids: Vec<_> = registry.descriptors().iter().map(|d| d.id.as_str()).collect();
		assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
	}
}
