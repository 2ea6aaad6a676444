// Progress and Cancellation
//
// Tools and the dispatcher talk back to the host through a ToolContext:
// a best-effort progress channel plus a cooperative cancellation token.
// Nothing here ever fails the pipeline, a host that stopped listening is
// not a reason to stop processing.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Sending half of the progress stream.
#[derive(Clone)]
pub struct ProgressSink {
	tx: Option<mpsc::UnboundedSender<String>>,
	pacing: Option<Duration>,
}

impl ProgressSink {
	/// A sink backed by a channel, together with the receiving half.
	pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx: Some(tx), pacing: None }, rx)
	}

	/// A sink that silently drops every message.
	pub fn disabled() -> Self {
		Self { tx: None, pacing: None }
	}

	/// Sleep this long after each delivered message, so interactive hosts
	/// get a chance to render between entries.
	pub fn with_pacing(mut self, pacing: Duration) -> Self {
		self.pacing = Some(pacing);
		self
	}

	/// Send one progress line. A closed or missing receiver is ignored.
	pub async fn report(&self, message: impl Into<String>) {
		let Some(tx) = &self.tx else { return };
		let message = message.into();
		trace!(target: "gbx_io", %message, "progress");
		if tx.send(message).is_err() {
			return;
		}
		if let Some(pacing) = self.pacing {
			tokio::time::sleep(pacing).await;
		}
	}
}

/// Per-dispatch context handed to every tool invocation.
#[derive(Clone)]
pub struct ToolContext {
	progress: ProgressSink,
	cancel: CancellationToken,
}

impl ToolContext {
	pub fn new(progress: ProgressSink, cancel: CancellationToken) -> Self {
		Self { progress, cancel }
	}

	/// A context with no progress consumer and a token nobody cancels.
	pub fn detached() -> Self {
		Self::new(ProgressSink::disabled(), CancellationToken::new())
	}

	/// Report a progress line to the host.
	pub async fn report(&self, message: impl Into<String>) {
		self.progress.report(message).await;
	}

	/// True once the host has requested an abort.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	pub fn cancel_token(&self) -> &CancellationToken {
		&self.cancel
	}
}
