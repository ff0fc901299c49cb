use crate::events::{DecodedImageCpu, ImageDecoded, ImageSelected, InvalidImage};
use anyhow::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

// Decodes an image to RGBA8 and applies EXIF orientation if available.
// Orientation handling is best-effort; without metadata the decoded
// orientation is kept.
fn decode_rgba8(path: &Path) -> Result<image::RgbaImage> {
    let img = image::ImageReader::open(path)?
        .with_guessed_format()? // sniff based on content/extension
        .decode()?;
    let img = img.to_rgba8();
    let orientation = read_orientation(path).unwrap_or(1);
    Ok(apply_orientation(img, orientation))
}

// Maps the common EXIF orientations; unknown values fall through as-is.
fn apply_orientation(img: image::RgbaImage, orientation: u16) -> image::RgbaImage {
    use image::imageops;
    match orientation {
        2 => imageops::flip_horizontal(&img),
        3 => imageops::rotate180(&img),
        4 => imageops::flip_vertical(&img),
        5 => imageops::flip_horizontal(&imageops::rotate90(&img)),
        6 => imageops::rotate90(&img),
        7 => imageops::flip_horizontal(&imageops::rotate270(&img)),
        8 => imageops::rotate270(&img),
        _ => img,
    }
}

fn read_orientation(path: &Path) -> Option<u16> {
    let file = File::open(path).ok()?;
    let mut buf = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut buf).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let value = field.value.get_uint(0)?;
    debug!("exif orientation {} for {}", value, path.display());
    Some(value as u16)
}

/// Decode task. Every selection gets a generation number; when a completion
/// belongs to a superseded generation it is dropped, so only the most recent
/// selection ever reaches the controller. Decode failures emit
/// `InvalidImage` instead of killing the task.
pub async fn run(
    mut select_rx: Receiver<ImageSelected>,
    decoded_tx: Sender<ImageDecoded>,
    invalid_tx: Sender<InvalidImage>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut decodes: JoinSet<(u64, PathBuf, Option<image::RgbaImage>)> = JoinSet::new();
    let mut generation: u64 = 0;
    let mut draining = false;

    loop {
        select! {
            _ = cancel.cancelled() => break,

            maybe = select_rx.recv(), if !draining => match maybe {
                Some(ImageSelected(path)) => {
                    generation += 1;
                    let current = generation;
                    debug!(path = %path.display(), generation = current, "decode requested");
                    decodes.spawn(async move {
                        let p = path.clone();
                        let res = tokio::task::spawn_blocking(move || decode_rgba8(&p)).await;
                        (current, path, res.ok().and_then(|r| r.ok()))
                    });
                }
                None => {
                    // Input closed: finish in-flight decodes, then exit.
                    if decodes.is_empty() {
                        break;
                    }
                    draining = true;
                }
            },

            Some(joined) = decodes.join_next() => {
                let Ok((decode_generation, path, maybe_img)) = joined else {
                    continue;
                };
                if decode_generation < generation {
                    debug!(path = %path.display(), "decode superseded; dropping");
                } else if let Some(rgba8) = maybe_img {
                    let (width, height) = rgba8.dimensions();
                    debug!(path = %path.display(), width, height, "decoded (rgba8)");
                    let prepared = DecodedImageCpu {
                        path,
                        width,
                        height,
                        pixels: rgba8.into_raw(),
                    };
                    let _ = decoded_tx.send(ImageDecoded(prepared)).await;
                } else {
                    debug!(path = %path.display(), "invalid image");
                    let _ = invalid_tx.send(InvalidImage(path)).await;
                }
                if draining && decodes.is_empty() {
                    break;
                }
            }
        }
    }
    Ok(())
}
