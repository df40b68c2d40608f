use fundsp::prelude64::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

pub const SAMPLE_RATE: u32 = 44100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Flap,
    Score,
    Crash,
}

fn render(secs: f64, mut next: impl FnMut() -> f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f64 * secs) as usize;
    (0..n).map(|_| next()).collect()
}

// ── Sounds ──────────────────────────────────────────────────────────────────

/// Short upward chirp.
fn flap() -> Vec<f32> {
    let freq = lfo(|t: f64| 500.0 + 400.0 * (t / 0.08).min(1.0));
    let gain = lfo(|t: f64| 1.0 - (t / 0.1).min(1.0));
    let mut sound = (freq >> sine()) * gain;
    sound.set_sample_rate(SAMPLE_RATE as f64);
    render(0.1, || sound.get_mono() as f32)
}

/// Two rising square blips.
fn score() -> Vec<f32> {
    let freq = lfo(|t: f64| if t < 0.07 { 880.0 } else { 1320.0 });
    let gain = lfo(|t: f64| 0.6 * (1.0 - (t / 0.25).min(1.0)));
    let mut sound = (freq >> square()) * gain;
    sound.set_sample_rate(SAMPLE_RATE as f64);
    render(0.25, || sound.get_mono() as f32)
}

/// Sawtooth sweeping 400Hz down to 80Hz while it fades out.
fn crash() -> Vec<f32> {
    let freq = lfo(|t: f64| 400.0 - 320.0 * (t / 0.4).min(1.0));
    let gain = lfo(|t: f64| 1.0 - (t / 0.5).min(1.0));
    let mut sound = (freq >> saw()) * gain;
    sound.set_sample_rate(SAMPLE_RATE as f64);
    render(0.5, || sound.get_mono() as f32)
}

/// Mono samples at [`SAMPLE_RATE`].
pub fn synth(cue: Cue) -> Vec<f32> {
    match cue {
        Cue::Flap => flap(),
        Cue::Score => score(),
        Cue::Crash => crash(),
    }
}

/// Default output device plus the pre-rendered cues.
pub struct Audio {
    stream: OutputStream,
    volume: f32,
    flap: Vec<f32>,
    score: Vec<f32>,
    crash: Vec<f32>,
}

impl Audio {
    /// `None` when there is no usable output device; the game runs muted.
    pub fn open(volume: f32) -> Option<Self> {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "no audio output, continuing muted");
                return None;
            }
        };
        // The drop notice would land on stderr after the terminal is restored.
        stream.log_on_drop(false);
        Some(Self {
            stream,
            volume: volume.clamp(0.0, 1.0),
            flap: synth(Cue::Flap),
            score: synth(Cue::Score),
            crash: synth(Cue::Crash),
        })
    }

    /// Fire and forget.
    pub fn play(&self, cue: Cue) {
        let samples = match cue {
            Cue::Flap => &self.flap,
            Cue::Score => &self.score,
            Cue::Crash => &self.crash,
        };
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
        sink.detach();
    }
}
