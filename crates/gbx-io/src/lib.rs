//! Tool dispatch pipeline for Gbx files.
//!
//! Hosts submit a named byte payload plus a tool id. The dispatcher looks
//! the tool up in a [`ToolRegistry`], resolves the payload into the input
//! kind the tool registered for (raw bytes, text, magic-checked Gbx bytes,
//! or a parsed node), transparently expands zip containers into per-entry
//! invocations, and returns the collected outputs in order.
//!
//! Format knowledge lives behind the [`GbxCodec`] trait. The crate ships
//! the pipeline and the built-in tools, the codec is supplied by the host.
//!
//! Long runs stream entry names through a [`ProgressSink`] and honor
//! cooperative cancellation via the token carried in [`ToolContext`].

pub mod codec;
pub mod data;
pub mod dispatch;
pub mod progress;
pub mod registry;
pub mod tools;

pub use codec::{CodecError, GbxCodec, ParseOutcome, ParsedGbx};
pub use data::{likely_gbx, BinPayload, GbxBytes, TextPayload, ToolOutput, GBX_MAGIC};
pub use dispatch::{DispatchError, ToolDispatcher};
pub use progress::{ProgressSink, ToolContext};
pub use registry::{InputKind, OutputKind, ToolDescriptor, ToolRegistry};
pub use tools::{builtin_registry, IoTool, ToolError, ToolInput};
