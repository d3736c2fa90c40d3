//! The two-tone chirp played when the main view is revealed

use crate::DashboardError;
use std::io::Write;

pub trait TonePlayer {
    fn play_boot_tone(&mut self) -> Result<(), DashboardError>;
}

/// Rings the terminal bell. Used when the `audio` feature is off.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TonePlayer for TerminalBell {
    fn play_boot_tone(&mut self) -> Result<(), DashboardError> {
        let mut out = std::io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| DashboardError::Audio(e.to_string()))
    }
}

#[cfg(feature = "audio")]
pub use synth::SynthTone;

#[cfg(feature = "audio")]
mod synth {
    use super::TonePlayer;
    use crate::DashboardError;
    use rodio::source::{SineWave, Source};
    use rodio::{OutputStream, Sink};
    use std::thread;
    use std::time::Duration;
    use tracing::{debug, warn};

    /// 800Hz sliding down to 400Hz over half a second, quietly
    const SWEEP: [f32; 3] = [800.0, 600.0, 400.0];
    const STEP: Duration = Duration::from_millis(166);
    const VOLUME: f32 = 0.1;

    /// Sine sweep through the default output device
    #[derive(Debug, Default)]
    pub struct SynthTone;

    impl TonePlayer for SynthTone {
        fn play_boot_tone(&mut self) -> Result<(), DashboardError> {
            // the output stream is not Send; it lives and dies on this thread
            thread::Builder::new()
                .name("boot-tone".into())
                .spawn(|| {
                    let Ok((_stream, handle)) = OutputStream::try_default() else {
                        warn!("audio output unavailable; boot tone skipped");
                        return;
                    };
                    let sink = match Sink::try_new(&handle) {
                        Ok(sink) => sink,
                        Err(err) => {
                            debug!(?err, "failed creating sink");
                            return;
                        }
                    };
                    for freq in SWEEP {
                        sink.append(SineWave::new(freq).take_duration(STEP).amplify(VOLUME));
                    }
                    sink.sleep_until_end();
                })
                .map(|_| ())
                .map_err(|e| DashboardError::Audio(e.to_string()))
        }
    }
}

/// The best tone player this build supports
pub fn default_tone_player() -> Box<dyn TonePlayer> {
    #[cfg(feature = "audio")]
    {
        Box::new(SynthTone)
    }
    #[cfg(not(feature = "audio"))]
    {
        Box::new(TerminalBell)
    }
}
