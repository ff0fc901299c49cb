use tracing::info;

/// One host-provided speech voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

/// Voices offered by the host engine, sorted for presentation. The selected
/// entry survives a repopulation as long as the host still offers it.
#[derive(Debug, Clone, Default)]
pub struct VoiceInventory {
    voices: Vec<Voice>,
    selected: usize,
}

impl VoiceInventory {
    /// Replaces the whole list, sorting case-insensitively by name. The
    /// previous selection is kept by name; if it disappeared, selection
    /// falls back to the first entry.
    pub fn repopulate(&mut self, mut voices: Vec<Voice>) {
        let previous = self.selected().map(|v| v.name.clone());
        voices.sort_by_key(|v| v.name.to_uppercase());
        self.voices = voices;
        self.selected = previous.and_then(|name| self.position(&name)).unwrap_or(0);
    }

    /// Selects the named voice; returns false (selection unchanged) when the
    /// host does not offer it.
    pub fn select(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<&Voice> {
        self.voices.get(self.selected)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.voices.iter().position(|v| v.name == name)
    }
}

/// Volume slider state: an integer level 0-100.
#[derive(Debug, Clone, Copy)]
pub struct VolumeControl {
    level: u8,
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self { level: 100 }
    }
}

impl VolumeControl {
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
        }
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Level mapped to the 0.0-1.0 multiplier utterances carry.
    pub fn multiplier(&self) -> f32 {
        f32::from(self.level) / 100.0
    }

    pub fn tier(&self) -> VolumeTier {
        match self.level {
            0 => VolumeTier::Muted,
            1..=33 => VolumeTier::Low,
            34..=66 => VolumeTier::Medium,
            _ => VolumeTier::High,
        }
    }
}

/// Indicator icon tier for the current volume level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeTier {
    Muted,
    Low,
    Medium,
    High,
}

/// One queued speech request.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub volume: f32,
    pub voice: Option<Voice>,
}

/// Seam to the opaque host speech engine. Utterances arrive in enqueue
/// order; playback timing and overlap are entirely the host's business.
pub trait SpeechSink: Send + Sync {
    /// Voices the host engine offers. Hosts without audio return nothing.
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&self, utterance: Utterance);
}

/// Stand-in sink for hosts without an audio engine: logs each utterance.
#[derive(Debug, Default)]
pub struct TracingSink;

impl SpeechSink for TracingSink {
    fn speak(&self, utterance: Utterance) {
        let voice = utterance
            .voice
            .as_ref()
            .map_or("default", |v| v.name.as_str());
        info!(text = %utterance.text, volume = utterance.volume, voice, "speak");
    }
}

/// Builds the two read-aloud utterances. The top caption comes first and is
/// fully enqueued before the bottom one; both carry the same volume
/// multiplier and voice.
pub fn caption_utterances(
    top: &str,
    bottom: &str,
    volume: f32,
    voice: Option<&Voice>,
) -> [Utterance; 2] {
    [
        Utterance {
            text: top.to_string(),
            volume,
            voice: voice.cloned(),
        },
        Utterance {
            text: bottom.to_string(),
            volume,
            voice: voice.cloned(),
        },
    ]
}
