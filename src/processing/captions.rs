use ab_glyph::{Font, FontVec, Glyph, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};

use crate::config::{CAPTION_PX, FontConfig, OUTLINE_PX};
use crate::error::Error;

const FILL: [u8; 3] = [255, 255, 255];
const STROKE: [u8; 3] = [0, 0, 0];

/// Vertical placement of a caption line on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Glyph tops touch the top canvas edge.
    Top,
    /// Glyph bottoms touch the bottom canvas edge.
    Bottom,
}

/// Font used for both caption lines.
pub struct CaptionFont {
    font: FontVec,
}

impl CaptionFont {
    /// Resolves the caption font: an explicit file path wins, otherwise the
    /// configured family is looked up in the system font database with a
    /// sans-serif fallback, and failing that any installed face is used.
    pub fn load(cfg: &FontConfig) -> Result<Self, Error> {
        if let Some(path) = &cfg.path {
            let data = std::fs::read(path)?;
            let font = FontVec::try_from_vec(data).map_err(|_| {
                Error::FontUnavailable(format!("{} is not a usable font file", path.display()))
            })?;
            return Ok(Self { font });
        }
        Self::from_family(&cfg.family)
    }

    pub fn from_family(family: &str) -> Result<Self, Error> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family), fontdb::Family::SansSerif],
            ..fontdb::Query::default()
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|face| face.id))
            .ok_or_else(|| {
                Error::FontUnavailable("system font database offers no usable face".into())
            })?;
        let (source, index) = db
            .face_source(id)
            .ok_or_else(|| Error::FontUnavailable("selected face has no source".into()))?;
        let data = match source {
            fontdb::Source::Binary(data) => data.as_ref().as_ref().to_vec(),
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                std::fs::read(&path)?
            }
        };
        let font = FontVec::try_from_vec_and_index(data, index).map_err(|_| {
            Error::FontUnavailable(format!("face found for '{family}' could not be parsed"))
        })?;
        Ok(Self { font })
    }
}

/// Draws one caption line horizontally centered on the canvas: a dark
/// outline first (offset passes), then the white fill on top.
pub fn draw_caption(canvas: &mut RgbaImage, font: &CaptionFont, text: &str, anchor: Anchor) {
    if text.is_empty() {
        return;
    }
    let scaled = font.font.as_scaled(PxScale::from(CAPTION_PX));
    let baseline = match anchor {
        Anchor::Top => scaled.ascent(),
        // descent is negative, so this puts the line bottom on the canvas edge
        Anchor::Bottom => canvas.height() as f32 + scaled.descent(),
    };
    let origin = ((canvas.width() as f32 - line_width(&scaled, text)) / 2.0).max(0.0);

    for dy in [-OUTLINE_PX, 0, OUTLINE_PX] {
        for dx in [-OUTLINE_PX, 0, OUTLINE_PX] {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_line(
                canvas,
                &scaled,
                text,
                origin + dx as f32,
                baseline + dy as f32,
                STROKE,
            );
        }
    }
    draw_line(canvas, &scaled, text, origin, baseline, FILL);
}

fn line_width<F: Font, SF: ScaleFont<F>>(font: &SF, text: &str) -> f32 {
    let mut width = 0.0;
    let mut last: Option<GlyphId> = None;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            width += font.kern(prev, id);
        }
        width += font.h_advance(id);
        last = Some(id);
    }
    width
}

fn draw_line<F: Font, SF: ScaleFont<F>>(
    canvas: &mut RgbaImage,
    font: &SF,
    text: &str,
    x: f32,
    baseline: f32,
    color: [u8; 3],
) {
    let mut caret = point(x, baseline);
    let mut last: Option<GlyphId> = None;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            caret.x += font.kern(prev, id);
        }
        let glyph: Glyph = id.with_scale_and_position(font.scale(), caret);
        caret.x += font.h_advance(id);
        last = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i32 + gx as i32;
            let py = bounds.min.y as i32 + gy as i32;
            if px < 0 || py < 0 {
                return;
            }
            let (px, py) = (px as u32, py as u32);
            if px >= canvas.width() || py >= canvas.height() {
                return;
            }
            blend(canvas.get_pixel_mut(px, py), color, coverage);
        });
    }
}

fn blend(px: &mut Rgba<u8>, color: [u8; 3], coverage: f32) {
    let a = coverage.clamp(0.0, 1.0);
    for c in 0..3 {
        px[c] = (f32::from(color[c]) * a + f32::from(px[c]) * (1.0 - a)).round() as u8;
    }
    px[3] = 255;
}
