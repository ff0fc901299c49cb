use anyhow::Result;
use image::RgbaImage;
use tracing::debug;

use crate::config::Configuration;
use crate::error::Error;
use crate::processing::captions::CaptionFont;
use crate::processing::compose;
use crate::speech::{self, Utterance, Voice, VoiceInventory, VolumeControl, VolumeTier};

/// Interaction phases. Control enablement derives from the phase alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ImageReady,
    CaptionsRendered,
}

/// Enabled flags for the four interactive controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub generate: bool,
    pub clear: bool,
    pub read_aloud: bool,
    pub voice_select: bool,
}

impl Controls {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Idle => Self {
                generate: false,
                clear: false,
                read_aloud: false,
                voice_select: false,
            },
            Phase::ImageReady => Self {
                generate: true,
                clear: false,
                read_aloud: false,
                voice_select: false,
            },
            Phase::CaptionsRendered => Self {
                generate: false,
                clear: true,
                read_aloud: true,
                voice_select: true,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captions {
    pub top: String,
    pub bottom: String,
}

/// Owns the canvas and every piece of interaction state: current phase,
/// decoded image, submitted captions, volume, and the cached voice list.
pub struct Controller {
    canvas: RgbaImage,
    font: CaptionFont,
    phase: Phase,
    image: Option<RgbaImage>,
    captions: Option<Captions>,
    volume: VolumeControl,
    voices: VoiceInventory,
}

impl Controller {
    pub fn new(cfg: &Configuration, font: CaptionFont) -> Self {
        Self {
            canvas: compose::base_canvas(cfg.canvas_width, cfg.canvas_height),
            font,
            phase: Phase::Idle,
            image: None,
            captions: None,
            volume: VolumeControl::new(cfg.speech.volume_level),
            voices: VoiceInventory::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn controls(&self) -> Controls {
        Controls::for_phase(self.phase)
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn captions(&self) -> Option<&Captions> {
        self.captions.as_ref()
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// A freshly decoded image supersedes whatever the canvas held, from any
    /// phase: the canvas is repainted (black backdrop, fitted image) and any
    /// previous captions are discarded.
    pub fn image_decoded(&mut self, image: RgbaImage) -> Result<()> {
        let mut canvas = compose::base_canvas(self.canvas.width(), self.canvas.height());
        compose::place_image(&mut canvas, &image)?;
        self.canvas = canvas;
        self.image = Some(image);
        self.captions = None;
        self.goto(Phase::ImageReady);
        Ok(())
    }

    /// Draws the caption layer over the placed image. Valid only while an
    /// uncaptioned image is ready; the fit geometry is not recomputed.
    pub fn submit_captions(&mut self, top: &str, bottom: &str) -> Result<()> {
        if !self.controls().generate {
            return Err(Error::NoImage.into());
        }
        compose::draw_captions(&mut self.canvas, &self.font, top, bottom);
        self.captions = Some(Captions {
            top: top.to_string(),
            bottom: bottom.to_string(),
        });
        self.goto(Phase::CaptionsRendered);
        Ok(())
    }

    /// Clears the canvas and drops the image and captions. Valid only once
    /// captions have been rendered.
    pub fn reset(&mut self) -> Result<()> {
        if !self.controls().clear {
            return Err(Error::NothingRendered.into());
        }
        self.canvas = compose::base_canvas(self.canvas.width(), self.canvas.height());
        self.image = None;
        self.captions = None;
        self.goto(Phase::Idle);
        Ok(())
    }

    /// Produces the two read-aloud utterances for the rendered captions,
    /// top first, carrying the current volume multiplier and voice.
    pub fn read_aloud(&self) -> Result<[Utterance; 2]> {
        if !self.controls().read_aloud {
            return Err(Error::NothingToRead.into());
        }
        let captions = self
            .captions
            .as_ref()
            .expect("rendered phase always has captions");
        Ok(speech::caption_utterances(
            &captions.top,
            &captions.bottom,
            self.volume.multiplier(),
            self.voices.selected(),
        ))
    }

    pub fn set_volume_level(&mut self, level: u8) {
        self.volume.set_level(level);
    }

    pub fn volume_multiplier(&self) -> f32 {
        self.volume.multiplier()
    }

    pub fn volume_tier(&self) -> VolumeTier {
        self.volume.tier()
    }

    /// Replaces the cached voice list (the host engine re-announced its
    /// voices); sorting and selection stability live in the inventory.
    pub fn voices_changed(&mut self, voices: Vec<Voice>) {
        self.voices.repopulate(voices);
    }

    pub fn select_voice(&mut self, name: &str) -> bool {
        self.voices.select(name)
    }

    pub fn voices(&self) -> &VoiceInventory {
        &self.voices
    }

    fn goto(&mut self, to: Phase) {
        if self.phase != to {
            debug!(from = ?self.phase, to = ?to, "phase change");
            self.phase = to;
        }
    }
}
