//! UI sound cues.
//!
//! Cues expand into a short list of tones handed to a [`ToneSink`]. The desktop only decides
//! *which* tones play and when; producing audio is up to the sink.

use std::rc::Rc;

use platform_host::{NoopToneSink, Tone, ToneSink, Waveform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Click,
    Open,
    Close,
    Error,
    Chord,
}

const CHORD_STAGGER_MS: u32 = 50;

impl SoundCue {
    pub fn tones(self) -> Vec<Tone> {
        match self {
            Self::Click => vec![square(800, 50, 0)],
            Self::Open => two_tone(600, 800, 100),
            Self::Close => two_tone(800, 500, 100),
            Self::Error => vec![square(200, 300, 0)],
            Self::Chord => [523, 659, 784]
                .into_iter()
                .zip(0u32..)
                .map(|(frequency_hz, i)| Tone {
                    frequency_hz,
                    duration_ms: 500,
                    delay_ms: i * CHORD_STAGGER_MS,
                    waveform: Waveform::Sine,
                })
                .collect(),
        }
    }
}

fn square(frequency_hz: u32, duration_ms: u32, delay_ms: u32) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
        delay_ms,
        waveform: Waveform::Square,
    }
}

/// Two halves of `total_ms`, the second starting when the first ends.
fn two_tone(first_hz: u32, second_hz: u32, total_ms: u32) -> Vec<Tone> {
    let half = total_ms / 2;
    vec![square(first_hz, half, 0), square(second_hz, half, half)]
}

#[derive(Clone)]
pub struct SoundManager {
    sink: Rc<dyn ToneSink>,
    volume: f32,
}

impl SoundManager {
    pub fn new(sink: Rc<dyn ToneSink>, volume: f32) -> Self {
        let mut manager = Self { sink, volume: 0.0 };
        manager.set_volume(volume);
        manager
    }

    pub fn silent() -> Self {
        Self::new(Rc::new(NoopToneSink), 0.0)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Sets the gain, clamped to `[0, 1]`. NaN mutes.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Plays `cue` when sound is enabled. Returns the number of tones sent to the sink.
    pub fn play(&self, cue: SoundCue, enabled: bool) -> usize {
        if !enabled {
            return 0;
        }
        let tones = cue.tones();
        for tone in &tones {
            self.sink.play_tone(*tone, self.volume);
        }
        tones.len()
    }
}

impl std::fmt::Debug for SoundManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundManager")
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        played: RefCell<Vec<(Tone, f32)>>,
    }

    impl ToneSink for RecordingSink {
        fn play_tone(&self, tone: Tone, volume: f32) {
            self.played.borrow_mut().push((tone, volume));
        }
    }

    #[test]
    fn disabled_manager_stays_silent() {
        let sink = Rc::new(RecordingSink::default());
        let manager = SoundManager::new(sink.clone(), 0.5);
        assert_eq!(manager.play(SoundCue::Open, false), 0);
        assert!(sink.played.borrow().is_empty());
    }

    #[test]
    fn two_tone_cues_split_their_duration() {
        let sink = Rc::new(RecordingSink::default());
        let manager = SoundManager::new(sink.clone(), 0.25);
        assert_eq!(manager.play(SoundCue::Close, true), 2);
        let played = sink.played.borrow();
        assert_eq!(played[0], (square(800, 50, 0), 0.25));
        assert_eq!(played[1], (square(500, 50, 50), 0.25));
    }

    #[test]
    fn chord_notes_are_staggered_sines() {
        let tones = SoundCue::Chord.tones();
        let delays: Vec<u32> = tones.iter().map(|t| t.delay_ms).collect();
        assert_eq!(delays, vec![0, 50, 100]);
        assert!(tones.iter().all(|t| t.waveform == Waveform::Sine && t.duration_ms == 500));
    }

    #[test]
    fn volume_is_clamped() {
        let mut manager = SoundManager::silent();
        manager.set_volume(3.0);
        assert_eq!(manager.volume(), 1.0);
        manager.set_volume(-1.0);
        assert_eq!(manager.volume(), 0.0);
        manager.set_volume(f32::NAN);
        assert_eq!(manager.volume(), 0.0);
    }
}
