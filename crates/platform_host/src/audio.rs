//! Tone output contract for UI sound cues.

/// Oscillator shape of a [`Tone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Square wave.
    Square,
    /// Sine wave.
    Sine,
}

/// One oscillator burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    /// Pitch in Hz.
    pub frequency_hz: u32,
    /// Length of the burst.
    pub duration_ms: u32,
    /// Offset from the moment the cue was triggered.
    pub delay_ms: u32,
    /// Oscillator shape.
    pub waveform: Waveform,
}

/// Audio output able to play scheduled tones.
pub trait ToneSink {
    /// Schedules `tone` at gain `volume` in `[0, 1]`. Output failures are swallowed.
    fn play_tone(&self, tone: Tone, volume: f32);
}

#[derive(Debug, Clone, Copy, Default)]
/// Silent sink for tests and hosts without audio.
pub struct NoopToneSink;

impl ToneSink for NoopToneSink {
    fn play_tone(&self, _tone: Tone, _volume: f32) {}
}
