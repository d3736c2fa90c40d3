//! System monitoring: the simulated threat feed, clock and LEDs

use super::{Dashboard, Task};
use crate::config::LedState;
use crate::data::templates::{seed_entries, FEED_TEMPLATES};
use crate::data::FeedItem;
use std::time::Duration;
use tracing::{debug, info};

/// Bounds of the feed cadence, drawn once per run
const FEED_PERIOD_MIN_MS: u64 = 5_000;
const FEED_PERIOD_MAX_MS: u64 = 15_000;
/// Bounds of each LED's blink period
const LED_PERIOD_MIN_MS: u64 = 1_000;
const LED_PERIOD_MAX_MS: u64 = 3_000;

const CLOCK_INTERVAL: Duration = Duration::from_secs(1);
const CURSOR_INTERVAL: Duration = Duration::from_millis(500);
const INITIAL_SECTION_DELAY: Duration = Duration::from_millis(100);

impl Dashboard {
    /// Everything that starts once the main view is visible
    pub(super) fn initialize_dashboard(&mut self) {
        info!("dashboard initializing");
        self.tick_clock();
        self.seed_feed();
        self.start_skill_bars();
        self.scheduler
            .after(INITIAL_SECTION_DELAY, Task::InitialSection);
        self.start_monitoring();
        self.start_counters();
        self.scheduler.every(CURSOR_INTERVAL, Task::CursorBlink);
    }

    fn seed_feed(&mut self) {
        let now = self.now_local();
        for seed in seed_entries() {
            self.feed.push(FeedItem::new(
                now - seed.age,
                seed.source,
                seed.message,
                seed.severity,
            ));
        }
    }

    fn start_monitoring(&mut self) {
        self.scheduler.every(CLOCK_INTERVAL, Task::ClockTick);

        let period = Duration::from_millis(self.rng.range(FEED_PERIOD_MIN_MS, FEED_PERIOD_MAX_MS));
        debug!(period_ms = period.as_millis() as u64, "feed cadence");
        let timer = self.scheduler.every(period, Task::FeedTick);
        self.feed_timer = Some((timer, period));

        for led in 0..self.animators.leds.len() {
            if self.animators.leds[led].state == LedState::Idle {
                continue;
            }
            let period = Duration::from_millis(self.rng.range(LED_PERIOD_MIN_MS, LED_PERIOD_MAX_MS));
            self.scheduler.every(period, Task::LedBlink(led));
        }
    }

    /// Period of the simulated feed timer, if it is running
    pub fn feed_period(&self) -> Option<Duration> {
        self.feed_timer
            .filter(|(id, _)| self.scheduler.is_scheduled(*id))
            .map(|(_, period)| period)
    }

    pub(super) fn tick_clock(&mut self) {
        self.animators.system_time = self.now_local().format("%H:%M:%S").to_string();
    }

    /// Pick a canned event, stamp it and put it on top of the feed
    pub fn add_simulated_event(&mut self) {
        let template = FEED_TEMPLATES[self.rng.index(FEED_TEMPLATES.len())];
        let message = template.render(self.rng.as_mut());
        self.log_feed(template.source, message, template.severity);
    }

    pub(super) fn blink_led(&mut self, led: usize) {
        if self.animators.paused {
            return;
        }
        if let Some(l) = self.animators.leds.get_mut(led) {
            l.dim = !l.dim;
        }
    }

    /// Terminal focus changes pause and resume decorative animation
    pub fn set_focus(&mut self, focused: bool) {
        let now = self.elapsed();
        if focused {
            self.animators.resume(now);
        } else {
            self.animators.pause(now);
        }
    }
}
