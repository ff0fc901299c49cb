/// Placement rectangle for drawing a source image into a fixed canvas while
/// preserving aspect ratio. All fields are canvas pixel units; `start_x`/
/// `start_y` address the top-left corner of the drawn image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub width: f32,
    pub height: f32,
    pub start_x: f32,
    pub start_y: f32,
}

/// Computes where an `image_w` x `image_h` image lands inside a
/// `canvas_w` x `canvas_h` canvas: the longer dimension (relative to the
/// canvas) fills completely, the other is centered in the leftover space.
///
/// A square image (aspect exactly 1) takes the landscape path and fills the
/// canvas width.
///
/// Callers supply positive finite dimensions. `image_h == 0` produces a
/// non-finite aspect ratio and the IEEE result is returned as-is; degenerate
/// canvas sizes yield a degenerate rectangle rather than an error. Decoded
/// images always have positive dimensions, so neither case is checked here.
pub fn fit(canvas_w: f32, canvas_h: f32, image_w: f32, image_h: f32) -> FitRect {
    let aspect = image_w / image_h;

    if aspect < 1.0 {
        // Taller than wide: fill the canvas height, center horizontally.
        let height = canvas_h;
        let width = canvas_h * aspect;
        FitRect {
            width,
            height,
            start_x: (canvas_w - width) / 2.0,
            start_y: 0.0,
        }
    } else {
        // Wider than tall, or square: fill the canvas width, center vertically.
        let width = canvas_w;
        let height = canvas_w / aspect;
        FitRect {
            width,
            height,
            start_x: 0.0,
            start_y: (canvas_h - height) / 2.0,
        }
    }
}
