use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use image::RgbaImage;
use tokio::select;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Configuration;
use crate::controller::Controller;
use crate::events::{DecodedImageCpu, ImageDecoded, ImageSelected, InvalidImage};
use crate::processing::captions::CaptionFont;
use crate::speech::{SpeechSink, Utterance};
use crate::tasks::{loader, speaker};

/// One meme request, start to finish.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub image: PathBuf,
    pub top: String,
    pub bottom: String,
    pub speak: bool,
}

/// Wires the decode and speech tasks together, drives the controller through
/// the full phase cycle for `request`, and returns the composed canvas.
pub async fn run(
    cfg: &Configuration,
    request: RenderRequest,
    sink: Arc<dyn SpeechSink>,
) -> Result<RgbaImage> {
    let font = CaptionFont::load(&cfg.font)?;
    let mut controller = Controller::new(cfg, font);
    controller.voices_changed(sink.voices());
    if let Some(name) = &cfg.speech.voice {
        if !controller.select_voice(name) {
            warn!(voice = %name, "configured voice not offered by the speech engine");
        }
    }

    let cancel = CancellationToken::new();
    let (select_tx, select_rx) = mpsc::channel(4);
    let (decoded_tx, mut decoded_rx) = mpsc::channel(4);
    let (invalid_tx, mut invalid_rx) = mpsc::channel(4);
    let (utter_tx, utter_rx) = mpsc::channel(8);

    let mut tasks = JoinSet::new();
    tasks.spawn(loader::run(select_rx, decoded_tx, invalid_tx, cancel.clone()));
    tasks.spawn(speaker::run(utter_rx, Arc::clone(&sink), cancel.clone()));

    let outcome = select! {
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            Err(anyhow::anyhow!("interrupted"))
        }
        res = drive(
            &mut controller,
            &request,
            &select_tx,
            &mut decoded_rx,
            &mut invalid_rx,
            &utter_tx,
        ) => res,
    };

    // Closing the senders lets both tasks drain their queues and exit.
    drop(select_tx);
    drop(utter_tx);
    if outcome.is_err() {
        cancel.cancel();
    }
    while let Some(joined) = tasks.join_next().await {
        joined.context("task panicked")??;
    }

    outcome?;
    Ok(controller.canvas().clone())
}

async fn drive(
    controller: &mut Controller,
    request: &RenderRequest,
    select_tx: &mpsc::Sender<ImageSelected>,
    decoded_rx: &mut mpsc::Receiver<ImageDecoded>,
    invalid_rx: &mut mpsc::Receiver<InvalidImage>,
    utter_tx: &mpsc::Sender<Utterance>,
) -> Result<()> {
    select_tx
        .send(ImageSelected(request.image.clone()))
        .await
        .context("loader task unavailable")?;

    select! {
        maybe = decoded_rx.recv() => {
            let ImageDecoded(decoded) = maybe.context("loader task exited before decoding")?;
            let DecodedImageCpu { path, width, height, pixels } = decoded;
            let image = RgbaImage::from_raw(width, height, pixels)
                .context("decoded pixel buffer does not match its dimensions")?;
            info!(path = %path.display(), width, height, "image ready");
            controller.image_decoded(image)?;
        }
        maybe = invalid_rx.recv() => {
            match maybe {
                Some(InvalidImage(path)) => bail!("could not decode image {}", path.display()),
                None => bail!("loader task exited before decoding"),
            }
        }
    }

    controller.submit_captions(&request.top, &request.bottom)?;
    info!(phase = ?controller.phase(), "captions rendered");

    if request.speak {
        for utterance in controller.read_aloud()? {
            utter_tx
                .send(utterance)
                .await
                .context("speaker task unavailable")?;
        }
    }
    Ok(())
}
