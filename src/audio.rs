//! Sound effects, synthesized once with fundsp and played through rodio.

use fundsp::prelude64::*;
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};

pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sfx {
    Flap,
    Death,
}

/// Linear ramp from `from` to `to` as `t` goes 0 → 1, held at `to` after.
fn ramp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Runs a mono generator for `seconds` and collects its output.
fn render(mut unit: Box<dyn AudioUnit>, seconds: f64) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let len = (SAMPLE_RATE as f64 * seconds) as usize;
    (0..len).map(|_| unit.get_mono() as f32).collect()
}

/// Short upward chirp.
fn flap_samples() -> Vec<f32> {
    let freq = lfo(|t: f64| ramp(520.0, 900.0, t / 0.08));
    let gain = lfo(|t: f64| ramp(0.12, 0.0, t / 0.1));
    render(Box::new((freq >> sine()) * gain), 0.1)
}

/// Falling saw: 400Hz to 80Hz over 0.4s, fading out over 0.5s.
fn death_samples() -> Vec<f32> {
    let freq = lfo(|t: f64| ramp(400.0, 80.0, t / 0.4));
    let gain = lfo(|t: f64| ramp(0.15, 0.0, t / 0.5));
    render(Box::new((freq >> saw()) * gain), 0.5)
}

/// Open output device plus the pre-rendered effects.
pub struct Audio {
    stream: OutputStream,
    flap: Vec<f32>,
    death: Vec<f32>,
}

impl Audio {
    /// Opens the default output device. Returns `None` (and logs why) when
    /// there is none, in which case the game runs silent.
    pub fn open() -> Option<Self> {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("no audio output, sound disabled: {e}");
                return None;
            }
        };
        Some(Self {
            stream,
            flap: flap_samples(),
            death: death_samples(),
        })
    }

    /// Plays `sfx` in the background.
    pub fn play(&self, sfx: Sfx) {
        let samples = match sfx {
            Sfx::Flap => &self.flap,
            Sfx::Death => &self.death,
        };
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
        sink.detach();
    }
}
