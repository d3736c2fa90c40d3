//! Decorative animation state
//!
//! Counters, skill bars, LEDs, tool cards and the profile scanner. None of
//! this affects behavior; the renderer reads it to decide what to draw.

use super::scheduler::TimerId;
use super::{Dashboard, Task};
use crate::config::{DashboardConfig, LedState};
use crate::data::sources;
use crate::data::Severity;
use std::time::Duration;
use tracing::info;

const COUNTER_DURATION_MS: f64 = 2000.0;
const COUNTER_INTERVAL: Duration = Duration::from_millis(16);
const SKILL_STAGGER: Duration = Duration::from_millis(200);
const SKILL_FILL_TRANSITION: Duration = Duration::from_millis(1000);
const SKILL_GLOW_DELAY: Duration = Duration::from_millis(1000);
const SKILL_GLOW_DURATION: Duration = Duration::from_millis(500);
const TOOL_PULSE_DURATION: Duration = Duration::from_millis(1000);
const TOOL_PRESS_DURATION: Duration = Duration::from_millis(200);
const SCANNER_SWEEP: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone)]
pub struct LedView {
    pub label: String,
    pub state: LedState,
    pub dim: bool,
}

#[derive(Debug, Clone)]
pub struct Counter {
    pub label: String,
    pub target: u32,
    current: f64,
}

impl Counter {
    /// Zero-padded to three digits, as on the metric tiles
    pub fn display(&self) -> String {
        format!("{:03}", self.current.floor() as u64)
    }

    pub fn is_done(&self) -> bool {
        self.current >= self.target as f64
    }
}

#[derive(Debug, Clone)]
pub struct SkillBar {
    pub name: String,
    pub level: u8,
    filled_at: Option<Duration>,
    pub glow: bool,
}

#[derive(Debug, Clone)]
pub struct Animators {
    pub system_time: String,
    pub leds: Vec<LedView>,
    pub counters: Vec<Counter>,
    pub skill_bars: Vec<SkillBar>,
    tool_pulses: Vec<bool>,
    /// (tool, action) of the button currently held down
    pub pressed_tool: Option<(usize, usize)>,
    scanner_started: Option<Duration>,
    pub paused: bool,
    paused_at: Option<Duration>,
}

impl Animators {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            system_time: String::from("--:--:--"),
            leds: config
                .leds
                .iter()
                .map(|led| LedView {
                    label: led.label.clone(),
                    state: led.state,
                    dim: false,
                })
                .collect(),
            counters: config
                .metrics
                .iter()
                .map(|m| Counter {
                    label: m.label.clone(),
                    target: m.target,
                    current: 0.0,
                })
                .collect(),
            skill_bars: config
                .skills
                .iter()
                .map(|s| SkillBar {
                    name: s.name.clone(),
                    level: s.level.min(100),
                    filled_at: None,
                    glow: false,
                })
                .collect(),
            tool_pulses: vec![false; config.tools.len()],
            pressed_tool: None,
            scanner_started: None,
            paused: false,
            paused_at: None,
        }
    }

    /// Current width of a skill bar as a fraction of the full track
    pub fn skill_fill(&self, bar: usize, now: Duration) -> f64 {
        let Some(skill) = self.skill_bars.get(bar) else {
            return 0.0;
        };
        let Some(start) = skill.filled_at else {
            return 0.0;
        };
        let progress = (now.saturating_sub(start).as_secs_f64()
            / SKILL_FILL_TRANSITION.as_secs_f64())
        .min(1.0);
        progress * f64::from(skill.level) / 100.0
    }

    pub fn set_skill_glow(&mut self, bar: usize, glow: bool) {
        if let Some(skill) = self.skill_bars.get_mut(bar) {
            skill.glow = glow;
        }
    }

    pub fn tool_pulse(&self, card: usize) -> bool {
        self.tool_pulses.get(card).copied().unwrap_or(false)
    }

    pub fn set_tool_pulse(&mut self, card: usize, on: bool) {
        if let Some(pulse) = self.tool_pulses.get_mut(card) {
            *pulse = on;
        }
    }

    pub fn restart_scanner(&mut self, now: Duration) {
        self.scanner_started = Some(now);
    }

    pub fn stop_scanner(&mut self) {
        self.scanner_started = None;
    }

    /// Scanner line position in `0.0..1.0` down the profile panel
    pub fn scanner_position(&self, now: Duration) -> Option<f64> {
        let start = self.scanner_started?;
        let now = self.paused_at.map_or(now, |at| at.min(now));
        let sweep = SCANNER_SWEEP.as_millis() as u64;
        let offset = now.saturating_sub(start).as_millis() as u64 % sweep;
        Some(offset as f64 / sweep as f64)
    }

    pub fn pause(&mut self, now: Duration) {
        if !self.paused {
            self.paused = true;
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: Duration) {
        if let Some(at) = self.paused_at.take() {
            if let Some(start) = self.scanner_started.as_mut() {
                *start += now.saturating_sub(at);
            }
        }
        self.paused = false;
    }
}

impl Dashboard {
    pub(super) fn start_counters(&mut self) {
        for counter in &mut self.animators.counters {
            counter.current = 0.0;
        }
        if !self.animators.counters.is_empty() {
            self.scheduler.every(COUNTER_INTERVAL, Task::CounterTick);
        }
    }

    pub(super) fn tick_counters(&mut self, timer: TimerId) {
        let steps = COUNTER_DURATION_MS / COUNTER_INTERVAL.as_millis() as f64;
        for counter in &mut self.animators.counters {
            let target = f64::from(counter.target);
            counter.current = (counter.current + target / steps).min(target);
        }
        if self.animators.counters.iter().all(Counter::is_done) {
            self.scheduler.cancel(timer);
        }
    }

    /// Clear every bar and fill them again one after another
    pub(super) fn start_skill_bars(&mut self) {
        for (i, bar) in self.animators.skill_bars.iter_mut().enumerate() {
            bar.filled_at = None;
            bar.glow = false;
            self.scheduler
                .after(SKILL_STAGGER * i as u32, Task::SkillBarFill(i));
        }
    }

    pub(super) fn fill_skill_bar(&mut self, bar: usize) {
        let now = self.elapsed();
        if let Some(skill) = self.animators.skill_bars.get_mut(bar) {
            skill.filled_at = Some(now);
            self.scheduler
                .after(SKILL_GLOW_DELAY, Task::SkillBarGlow(bar));
        }
    }

    pub(super) fn glow_skill_bar(&mut self, bar: usize) {
        self.animators.set_skill_glow(bar, true);
        self.scheduler
            .after(SKILL_GLOW_DURATION, Task::SkillBarGlowEnd(bar));
    }

    pub(super) fn pulse_tool_card(&mut self, card: usize) {
        self.animators.set_tool_pulse(card, true);
        self.scheduler
            .after(TOOL_PULSE_DURATION, Task::ToolPulseEnd(card));
    }

    /// Press an action button on a tool card
    pub fn run_tool_action(&mut self, tool: usize, action: usize) -> bool {
        let Some(card) = self.config.tools.get(tool) else {
            return false;
        };
        let Some(label) = card.actions.get(action) else {
            return false;
        };
        let action_name = label.to_uppercase();
        let tool_name = card.name.clone();

        self.animators.pressed_tool = Some((tool, action));
        self.scheduler
            .after(TOOL_PRESS_DURATION, Task::ToolButtonRelease);

        info!(tool = %tool_name, action = %action_name, "tool action");
        self.log_feed(
            sources::TOOL_EXEC,
            format!("{action_name} action performed on {tool_name}"),
            Severity::Info,
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::testing::booted;

    #[test]
    fn counters_reach_target_in_two_seconds() {
        let mut d = booted();
        assert_eq!(d.animators.counters[0].display(), "000");

        d.advance(Duration::from_millis(1008));
        let mid: u64 = d.animators.counters[0].display().parse().expect("numeric");
        assert!(mid > 100 && mid < 140, "halfway value was {mid}");

        d.advance(Duration::from_millis(1100));
        assert_eq!(d.animators.counters[0].display(), "247");
        assert_eq!(d.animators.counters[2].display(), "086");
        assert!(d.animators.counters.iter().all(Counter::is_done));
    }

    #[test]
    fn skill_bars_fill_in_sequence_then_glow_briefly() {
        let mut d = booted();
        d.advance(Duration::from_millis(100));
        assert!(d.animators.skill_fill(0, d.elapsed()) > 0.0);
        assert_eq!(d.animators.skill_fill(1, d.elapsed()), 0.0);

        d.advance(Duration::from_millis(1000));
        assert!((d.animators.skill_fill(0, d.elapsed()) - 0.9).abs() < 1e-9);
        assert!(d.animators.skill_bars[0].glow);

        d.advance(Duration::from_millis(500));
        assert!(!d.animators.skill_bars[0].glow);
    }

    #[test]
    fn tool_action_logs_and_releases() {
        let mut d = booted();
        assert!(d.run_tool_action(1, 0));
        assert_eq!(d.animators.pressed_tool, Some((1, 0)));

        let latest = d.feed.latest().expect("tool entry");
        assert_eq!(latest.source, "TOOL-EXEC");
        assert_eq!(latest.message, "SCAN action performed on Nmap");

        d.advance(Duration::from_millis(200));
        assert_eq!(d.animators.pressed_tool, None);
    }

    #[test]
    fn unknown_tool_action_is_ignored() {
        let mut d = booted();
        let before = d.feed.len();
        assert!(!d.run_tool_action(1, 5));
        assert!(!d.run_tool_action(42, 0));
        assert_eq!(d.feed.len(), before);
    }

    #[test]
    fn scanner_freezes_while_paused() {
        let mut d = booted();
        d.advance(Duration::from_millis(300));
        d.advance(Duration::from_millis(1000));
        let before = d.animators.scanner_position(d.elapsed());

        d.set_focus(false);
        d.advance(Duration::from_millis(1500));
        assert_eq!(d.animators.scanner_position(d.elapsed()), before);

        d.set_focus(true);
        d.advance(Duration::from_millis(1000));
        assert_eq!(d.animators.scanner_position(d.elapsed()), Some(0.5));
    }
}
