//! Status channel mirroring.

use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::progress::{ProgressRecorder, SolveStatus};

/// Spawn a task mirroring status events to `recorder` and to `sink`.
///
/// Returns the sender to hand to the graph client and the task's handle. The
/// task drains the channel until every sender is dropped, so awaiting the
/// handle guarantees the last event sent has been forwarded. A closed `sink`
/// only stops forwarding to it; draining continues.
pub fn mirror_status(
  sink: Option<UnboundedSender<SolveStatus>>,
  recorder: ProgressRecorder,
) -> (UnboundedSender<SolveStatus>, JoinHandle<()>) {
  let (tx, mut rx) = unbounded_channel::<SolveStatus>();

  let handle = tokio::spawn(async move {
    let mut sink = sink;
    let mut events = 0usize;

    while let Some(status) = rx.recv().await {
      events += 1;
      recorder.observe(&status);

      let closed = sink.as_ref().is_some_and(|sink| sink.send(status).is_err());
      if closed {
        warn!("status sink closed, dropping further events");
        sink = None;
      }
    }

    debug!(events, "status channel drained");
  });

  (tx, handle)
}
