use std::sync::Arc;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::speech::{SpeechSink, Utterance};

/// Drains queued utterances into the host sink in enqueue order. Whatever
/// the host does with them (playback, overlap, delay) is its own business.
pub async fn run(
    mut utter_rx: Receiver<Utterance>,
    sink: Arc<dyn SpeechSink>,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        select! {
            _ = cancel.cancelled() => break,

            maybe = utter_rx.recv() => match maybe {
                Some(utterance) => {
                    debug!(text = %utterance.text, "dequeued utterance");
                    sink.speak(utterance);
                }
                None => break,
            }
        }
    }
    Ok(())
}
