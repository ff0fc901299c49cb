use std::path::PathBuf;

/// Request to load and decode a new source image. A later selection
/// supersedes any decode still in flight.
#[derive(Debug, Clone)]
pub struct ImageSelected(pub PathBuf);

/// CPU-side RGBA8 pixels of a successfully decoded image.
#[derive(Debug, Clone)]
pub struct DecodedImageCpu {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug)]
pub struct ImageDecoded(pub DecodedImageCpu);

#[derive(Debug)]
pub struct InvalidImage(pub PathBuf);
