//! Copy-to-clipboard buttons on the contact panel

use super::{Dashboard, Task};
use crate::data::{sources, Severity};
use crate::DashboardError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

const REVERT_DELAY: Duration = Duration::from_millis(2000);

/// How a copy reached the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    /// The desktop clipboard via the windowing system
    Platform,
    /// An OSC 52 escape handed to the terminal emulator
    Osc52,
}

pub trait ClipboardBackend {
    fn copy(&mut self, text: &str) -> Result<CopyPath, DashboardError>;
}

/// System clipboard, falling back to OSC 52 when there is no display
/// (over SSH, in a bare console)
pub struct PlatformClipboard<W = std::io::Stdout> {
    inner: Option<arboard::Clipboard>,
    connect: fn() -> Result<arboard::Clipboard, arboard::Error>,
    fallback: W,
}

impl PlatformClipboard {
    /// Connects on first use, not here
    pub fn new() -> Self {
        Self::with_fallback(arboard::Clipboard::new, std::io::stdout())
    }
}

impl Default for PlatformClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> PlatformClipboard<W> {
    /// `connect` opens the desktop clipboard; OSC 52 goes to `fallback`
    pub fn with_fallback(
        connect: fn() -> Result<arboard::Clipboard, arboard::Error>,
        fallback: W,
    ) -> Self {
        Self {
            inner: None,
            connect,
            fallback,
        }
    }

    fn copy_platform(&mut self, text: &str) -> Result<(), arboard::Error> {
        if self.inner.is_none() {
            self.inner = Some((self.connect)()?);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard.set_text(text),
            None => Err(arboard::Error::ClipboardNotSupported),
        }
    }
}

impl<W: Write> ClipboardBackend for PlatformClipboard<W> {
    fn copy(&mut self, text: &str) -> Result<CopyPath, DashboardError> {
        match self.copy_platform(text) {
            Ok(()) => Ok(CopyPath::Platform),
            Err(err) => {
                debug!(error = %err, "platform clipboard unavailable, trying OSC 52");
                self.inner = None;
                write_osc52(&mut self.fallback, text)
                    .map_err(|e| DashboardError::Clipboard(e.to_string()))?;
                Ok(CopyPath::Osc52)
            }
        }
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

fn write_osc52(out: &mut impl Write, text: &str) -> std::io::Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Idle,
    Copied,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct CopyButton {
    pub state: CopyState,
}

impl CopyButton {
    pub fn label(&self) -> &'static str {
        match self.state {
            CopyState::Idle => "COPY",
            CopyState::Copied => "COPIED",
            CopyState::Error => "ERROR",
        }
    }

    pub(super) fn revert(&mut self) {
        self.state = CopyState::Idle;
    }
}

impl Dashboard {
    /// Copy contact entry `index` and flash its button
    pub fn copy_target(&mut self, index: usize) -> Result<CopyPath, DashboardError> {
        let Some(target) = self.config.contact.get(index) else {
            return Err(DashboardError::Clipboard(format!("no contact entry {index}")));
        };
        let label = target.label.clone();
        let result = self.clipboard.copy(&target.payload);

        let state = match &result {
            Ok(path) => {
                info!(entry = %label, ?path, "copied to clipboard");
                self.log_feed(
                    sources::CLIPBOARD,
                    "Data copied to secure clipboard",
                    Severity::Info,
                );
                CopyState::Copied
            }
            Err(err) => {
                warn!(entry = %label, error = %err, "copy failed");
                CopyState::Error
            }
        };
        if let Some(button) = self.copy_buttons.get_mut(index) {
            button.state = state;
        }
        self.scheduler.after(REVERT_DELAY, Task::CopyRevert(index));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::testing::{booted, fixed_start, CountingTone, RecordingClipboard};
    use pretty_assertions::assert_eq;

    #[test]
    fn osc52_wraps_base64_payload() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");

        let mut out = Vec::new();
        write_osc52(&mut out, "analyst@example.com").expect("write to vec");
        assert_eq!(out, b"\x1b]52;c;YW5hbHlzdEBleGFtcGxlLmNvbQ==\x07");
    }

    #[test]
    fn no_display_falls_back_to_osc52() {
        let mut board =
            PlatformClipboard::with_fallback(|| Err(arboard::Error::ClipboardNotSupported), Vec::new());

        assert_eq!(board.copy("hi").expect("fallback write"), CopyPath::Osc52);
        assert_eq!(board.copy("hi").expect("fallback write"), CopyPath::Osc52);
        assert!(board.inner.is_none());
        assert_eq!(board.fallback, b"\x1b]52;c;aGk=\x07\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn fallback_write_failure_is_a_clipboard_error() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut board =
            PlatformClipboard::with_fallback(|| Err(arboard::Error::ClipboardNotSupported), Closed);
        assert!(matches!(board.copy("hi"), Err(DashboardError::Clipboard(_))));
    }

    #[test]
    fn successful_copy_flashes_then_reverts() {
        let board = RecordingClipboard::default();
        let mut d = Dashboard::builder(DashboardConfig::default())
            .seed(3)
            .started_at(fixed_start())
            .tone(CountingTone::default())
            .clipboard(board.clone())
            .skip_boot(true)
            .build();

        assert_eq!(d.copy_target(0).expect("copied"), CopyPath::Platform);
        assert_eq!(board.copied.borrow().as_slice(), ["analyst@example.com".to_string()]);
        assert_eq!(d.copy_buttons[0].label(), "COPIED");
        assert_eq!(d.copy_buttons[1].label(), "COPY");

        let latest = d.feed.latest().expect("clipboard entry");
        assert_eq!(latest.source, "CLIPBOARD");
        assert_eq!(latest.message, "Data copied to secure clipboard");

        d.advance(Duration::from_millis(1999));
        assert_eq!(d.copy_buttons[0].state, CopyState::Copied);
        d.advance(Duration::from_millis(1));
        assert_eq!(d.copy_buttons[0].state, CopyState::Idle);
    }

    #[test]
    fn failed_copy_shows_error_without_feed_entry() {
        let mut d = Dashboard::builder(DashboardConfig::default())
            .seed(3)
            .tone(CountingTone::default())
            .clipboard(RecordingClipboard {
                fail: true,
                ..Default::default()
            })
            .skip_boot(true)
            .build();
        let before = d.feed.len();

        assert!(d.copy_target(1).is_err());
        assert_eq!(d.copy_buttons[1].label(), "ERROR");
        assert_eq!(d.feed.len(), before);

        d.advance(Duration::from_millis(2000));
        assert_eq!(d.copy_buttons[1].state, CopyState::Idle);
    }

    #[test]
    fn missing_entry_is_an_error() {
        let mut d = booted();
        assert!(d.copy_target(9).is_err());
    }
}
