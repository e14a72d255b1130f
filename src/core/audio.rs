use std::io::{self, Write};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
}

/// Parameters of a short synthesized tone. Sinks are free to approximate.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub sweep: Duration,
    pub start_gain: f32,
    pub end_gain: f32,
    pub length: Duration,
}

impl Tone {
    /// Low thump of a dhol: exponential pitch drop with a quick fade.
    pub fn dhol() -> Self {
        Self {
            waveform: Waveform::Sine,
            start_hz: 100.0,
            end_hz: 30.0,
            sweep: Duration::from_millis(150),
            start_gain: 0.3,
            end_gain: 0.01,
            length: Duration::from_millis(400),
        }
    }
}

/// Fire-and-forget tone output.
pub trait ToneSink {
    fn play(&mut self, tone: &Tone);
}

#[derive(Debug, Default)]
pub struct Silence;

impl ToneSink for Silence {
    fn play(&mut self, _tone: &Tone) {}
}

/// Rings the terminal bell; the closest a plain terminal gets to a drum.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl ToneSink for TerminalBell {
    fn play(&mut self, tone: &Tone) {
        debug!("Bell for {:?} tone at {} Hz", tone.waveform, tone.start_hz);
        let mut stderr = io::stderr();
        // a failed bell is not worth surfacing
        let _ = stderr.write_all(b"\x07").and_then(|_| stderr.flush());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<Tone>,
    }

    impl ToneSink for Recorder {
        fn play(&mut self, tone: &Tone) {
            self.played.push(tone.clone());
        }
    }

    #[test]
    fn test_dhol_parameters() {
        let tone = Tone::dhol();
        assert_eq!(tone.waveform, Waveform::Sine);
        assert_eq!(tone.start_hz, 100.0);
        assert_eq!(tone.end_hz, 30.0);
        assert_eq!(tone.length, Duration::from_millis(400));
    }

    #[test]
    fn test_sinks() {
        let mut recorder = Recorder::default();
        recorder.play(&Tone::dhol());
        assert_eq!(recorder.played.len(), 1);

        Silence.play(&Tone::dhol());
    }
}
