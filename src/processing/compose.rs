use anyhow::{Context, Result};
use fast_image_resize as fir;
use image::{Rgba, RgbaImage, imageops};

use crate::processing::captions::{self, Anchor, CaptionFont};
use crate::processing::layout;

const BACKDROP: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fresh canvas filled opaque black, so images whose aspect does not match
/// the canvas get visible letterbox/pillarbox borders.
pub fn base_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, BACKDROP)
}

/// Scales `image` to its fit rectangle and draws it onto `canvas`.
pub fn place_image(canvas: &mut RgbaImage, image: &RgbaImage) -> Result<()> {
    let rect = layout::fit(
        canvas.width() as f32,
        canvas.height() as f32,
        image.width() as f32,
        image.height() as f32,
    );
    let dest_w = rect.width.round().max(1.0) as u32;
    let dest_h = rect.height.round().max(1.0) as u32;
    let resized = resize_rgba(image, dest_w, dest_h)?;
    imageops::overlay(
        canvas,
        &resized,
        rect.start_x.round() as i64,
        rect.start_y.round() as i64,
    );
    Ok(())
}

/// Draws the caption layer over whatever the canvas holds. Placement of the
/// image underneath is not recomputed.
pub fn draw_captions(canvas: &mut RgbaImage, font: &CaptionFont, top: &str, bottom: &str) {
    captions::draw_caption(canvas, font, top, Anchor::Top);
    captions::draw_caption(canvas, font, bottom, Anchor::Bottom);
}

fn resize_rgba(source: &RgbaImage, target_w: u32, target_h: u32) -> Result<RgbaImage> {
    if source.width() == target_w && source.height() == target_h {
        return Ok(source.clone());
    }

    let src_view = fir::images::ImageRef::new(
        source.width(),
        source.height(),
        source.as_raw(),
        fir::PixelType::U8x4,
    )
    .context("failed to create source view for canvas resize")?;
    let mut dst_image = fir::images::Image::new(target_w, target_h, fir::PixelType::U8x4);
    let options = fir::ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::CatmullRom));
    let mut resizer = fir::Resizer::new();
    resizer
        .resize(&src_view, &mut dst_image, Some(&options))
        .context("canvas resize failed")?;
    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| anyhow::anyhow!("failed to construct resized RGBA image"))
}
