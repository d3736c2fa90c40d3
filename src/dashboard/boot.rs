//! Boot sequence
//!
//! Typewriter boot log, progress fill, fade-out, then the main view.

use super::scheduler::TimerId;
use super::{Dashboard, Task};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// First line appears this long after start
const FIRST_LINE_DELAY: Duration = Duration::from_millis(500);
/// Gap between successive lines
const LINE_STAGGER: Duration = Duration::from_millis(500);
/// Typewriter speed
const CHAR_INTERVAL: Duration = Duration::from_millis(30);
/// When the progress bar starts filling
const PROGRESS_START: Duration = Duration::from_millis(4000);
/// How long the progress bar takes to fill
const PROGRESS_DURATION: Duration = Duration::from_millis(3000);
/// Fade-out length
const FADE_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    Running,
    Fading,
    Done,
}

#[derive(Debug, Clone)]
pub struct BootSequence {
    lines: Vec<String>,
    /// Characters shown per line; `None` while the line is hidden
    revealed: Vec<Option<usize>>,
    typers: HashMap<usize, TimerId>,
    progress_started: Option<Duration>,
    fade_started: Option<Duration>,
    phase: BootPhase,
}

impl BootSequence {
    pub fn new(lines: Vec<String>) -> Self {
        let revealed = vec![None; lines.len()];
        Self {
            lines,
            revealed,
            typers: HashMap::new(),
            progress_started: None,
            fade_started: None,
            phase: BootPhase::Running,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == BootPhase::Done
    }

    /// Visible text of every revealed line
    pub fn visible_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .zip(&self.revealed)
            .filter_map(|(line, shown)| shown.map(|n| line.chars().take(n).collect()))
            .collect()
    }

    /// Progress bar fill in `0.0..=1.0`
    pub fn progress(&self, now: Duration) -> f64 {
        match self.progress_started {
            Some(start) => ratio(now.saturating_sub(start), PROGRESS_DURATION),
            None => 0.0,
        }
    }

    /// Boot view opacity in `0.0..=1.0`
    pub fn opacity(&self, now: Duration) -> f64 {
        match (self.phase, self.fade_started) {
            (BootPhase::Done, _) => 0.0,
            (_, Some(start)) => 1.0 - ratio(now.saturating_sub(start), FADE_DURATION),
            _ => 1.0,
        }
    }
}

fn ratio(part: Duration, whole: Duration) -> f64 {
    (part.as_secs_f64() / whole.as_secs_f64()).clamp(0.0, 1.0)
}

impl Dashboard {
    pub(super) fn start_boot(&mut self) {
        info!(lines = self.boot.lines.len(), "boot sequence started");
        for line in 0..self.boot.lines.len() {
            let delay = FIRST_LINE_DELAY + LINE_STAGGER * line as u32;
            self.scheduler.after(delay, Task::BootRevealLine(line));
        }
        self.scheduler.after(PROGRESS_START, Task::BootProgressStart);
        self.scheduler
            .after(PROGRESS_START + PROGRESS_DURATION, Task::BootFadeOut);
    }

    pub(super) fn reveal_boot_line(&mut self, line: usize) {
        let Some(slot) = self.boot.revealed.get_mut(line) else {
            return;
        };
        *slot = Some(0);
        let typer = self.scheduler.every(CHAR_INTERVAL, Task::BootTypeChar(line));
        self.boot.typers.insert(line, typer);
    }

    pub(super) fn type_boot_char(&mut self, timer: TimerId, line: usize) {
        let total = self
            .boot
            .lines
            .get(line)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        let Some(Some(shown)) = self.boot.revealed.get_mut(line) else {
            self.scheduler.cancel(timer);
            return;
        };
        *shown = (*shown + 1).min(total);
        if *shown >= total {
            self.scheduler.cancel(timer);
            self.boot.typers.remove(&line);
        }
    }

    pub(super) fn start_boot_progress(&mut self) {
        debug!("boot progress fill");
        self.boot.progress_started = Some(self.elapsed());
    }

    pub(super) fn fade_out_boot(&mut self) {
        self.boot.phase = BootPhase::Fading;
        self.boot.fade_started = Some(self.elapsed());
        self.scheduler.after(FADE_DURATION, Task::BootComplete);
    }

    /// Reveal the main view and start everything that runs behind it
    pub(super) fn finish_boot(&mut self) {
        if self.boot.is_done() {
            return;
        }
        for (_, typer) in self.boot.typers.drain() {
            self.scheduler.cancel(typer);
        }
        self.boot.phase = BootPhase::Done;
        info!("boot complete, main view revealed");

        if let Err(err) = self.tone.play_boot_tone() {
            debug!(error = %err, "boot tone skipped");
        }

        self.initialize_dashboard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::testing::{fixed_start, CountingTone};

    fn booting(lines: &[&str]) -> (Dashboard, CountingTone) {
        let tone = CountingTone::default();
        let config = DashboardConfig {
            boot_lines: lines.iter().map(|l| l.to_string()).collect(),
            ..DashboardConfig::default()
        };
        let dashboard = Dashboard::builder(config)
            .seed(5)
            .started_at(fixed_start())
            .tone(tone.clone())
            .build();
        (dashboard, tone)
    }

    #[test]
    fn lines_type_out_one_character_at_a_time() {
        let (mut d, _) = booting(&["abcd", "xy"]);
        assert!(d.boot.visible_lines().is_empty());

        d.advance(Duration::from_millis(500));
        assert_eq!(d.boot.visible_lines(), vec![String::new()]);

        d.advance(Duration::from_millis(60));
        assert_eq!(d.boot.visible_lines(), vec!["ab".to_string()]);

        d.advance(Duration::from_millis(500));
        assert_eq!(d.boot.visible_lines(), vec!["abcd".to_string(), "xy".to_string()]);
    }

    #[test]
    fn progress_and_fade_follow_fixed_schedule() {
        let (mut d, tone) = booting(&["[ OK ] loading"]);

        d.advance(Duration::from_millis(3999));
        assert_eq!(d.boot.progress(d.elapsed()), 0.0);

        d.advance(Duration::from_millis(1501));
        assert!((d.boot.progress(d.elapsed()) - 0.5).abs() < 1e-9);

        d.advance(Duration::from_millis(2000));
        assert_eq!(d.boot.phase(), BootPhase::Fading);
        assert!(!d.is_booted());

        d.advance(Duration::from_millis(1000));
        assert!(d.is_booted());
        assert_eq!(d.boot.opacity(d.elapsed()), 0.0);
        assert_eq!(*tone.0.borrow(), 1);
    }

    #[test]
    fn empty_boot_script_reveals_immediately() {
        let (d, tone) = booting(&[]);
        assert!(d.is_booted());
        assert_eq!(*tone.0.borrow(), 1);
    }

    #[test]
    fn failing_tone_does_not_block_boot() {
        struct Mute;
        impl crate::dashboard::tone::TonePlayer for Mute {
            fn play_boot_tone(&mut self) -> Result<(), crate::DashboardError> {
                Err(crate::DashboardError::Audio("no device".into()))
            }
        }
        let d = Dashboard::builder(DashboardConfig::default())
            .seed(1)
            .tone(Mute)
            .skip_boot(true)
            .build();
        assert!(d.is_booted());
    }
}
