// Dispatch Errors

use thiserror::Error;

use crate::codec::CodecError;
use crate::tools::ToolError;

/// Errors surfaced by a dispatch run.
///
/// Per-entry problems inside a parsed archive are logged and skipped, they
/// never reach this type. Whatever does reach it aborted the whole run, and
/// any outputs collected before the abort were dropped.
#[derive(Error, Debug)]
pub enum DispatchError {
	#[error(transparent)]
	Tool(#[from] ToolError),

	#[error(transparent)]
	Codec(#[from] CodecError),

	#[error("processing was cancelled")]
	Cancelled,
}

impl DispatchError {
	/// True when the run ended because the host asked for an abort.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, DispatchError::Cancelled)
	}
}
