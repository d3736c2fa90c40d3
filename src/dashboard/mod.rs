//! Dashboard controller and its components
//!
//! One [`Dashboard`] owns every piece of state for a run. Components are
//! split across files, each adding its operations as `impl Dashboard`
//! blocks; timed behavior is expressed as [`Task`]s on a virtual-time
//! scheduler which [`Dashboard::advance`] drains.

pub mod animators;
pub mod boot;
pub mod clipboard;
pub mod commands;
pub mod form;
pub mod matrix;
pub mod monitor;
pub mod navigation;
pub mod random;
pub mod scheduler;
pub mod tone;

use crate::config::DashboardConfig;
use crate::data::{Feed, FeedItem, Section, Severity};
use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::debug;

use animators::Animators;
use boot::BootSequence;
use clipboard::{ClipboardBackend, CopyButton, PlatformClipboard};
use commands::{CommandLine, CommandTable};
use form::{ContactForm, SimulatedUplink, Uplink};
use matrix::MatrixMode;
use navigation::NavState;
use random::{RandomSource, SeededRandom};
use scheduler::{Scheduler, TimerId};
use tone::{default_tone_player, TonePlayer};

/// Everything the dashboard can schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    // Boot sequence
    BootRevealLine(usize),
    BootTypeChar(usize),
    BootProgressStart,
    BootFadeOut,
    BootComplete,

    // Navigation
    InitialSection,
    SectionEntrance(Section),

    // Monitoring
    ClockTick,
    FeedTick,
    LedBlink(usize),
    CursorBlink,

    // Decorative animation
    CounterTick,
    SkillBarsStart,
    SkillBarFill(usize),
    SkillBarGlow(usize),
    SkillBarGlowEnd(usize),
    ScannerRestart,
    ToolPulse(usize),
    ToolPulseEnd(usize),
    ToolButtonRelease,
    CommandFlashEnd,

    // Contact form
    EncryptionStep(usize),
    TransmissionComplete,
    SubmitRestore,
    BannerDismiss,

    // Matrix mode
    MatrixFrame,
    MatrixEnd,

    // Clipboard
    CopyRevert(usize),
}

/// Builder for [`Dashboard`], mostly so tests can pin time and randomness
pub struct DashboardBuilder {
    config: DashboardConfig,
    rng: Option<Box<dyn RandomSource>>,
    clipboard: Option<Box<dyn ClipboardBackend>>,
    tone: Option<Box<dyn TonePlayer>>,
    uplink: Option<Box<dyn Uplink>>,
    started_at: Option<DateTime<Local>>,
    skip_boot: bool,
}

impl DashboardBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(Box::new(SeededRandom::new(seed)));
        self
    }

    pub fn rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn clipboard(mut self, clipboard: impl ClipboardBackend + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    pub fn tone(mut self, tone: impl TonePlayer + 'static) -> Self {
        self.tone = Some(Box::new(tone));
        self
    }

    pub fn uplink(mut self, uplink: impl Uplink + 'static) -> Self {
        self.uplink = Some(Box::new(uplink));
        self
    }

    pub fn started_at(mut self, at: DateTime<Local>) -> Self {
        self.started_at = Some(at);
        self
    }

    pub fn skip_boot(mut self, skip: bool) -> Self {
        self.skip_boot = skip;
        self
    }

    pub fn build(self) -> Dashboard {
        let config = self.config;
        let mut dashboard = Dashboard {
            started_at: self.started_at.unwrap_or_else(Local::now),
            scheduler: Scheduler::new(),
            rng: self
                .rng
                .unwrap_or_else(|| Box::new(SeededRandom::from_entropy())),
            clipboard: self
                .clipboard
                .unwrap_or_else(|| Box::new(PlatformClipboard::new())),
            tone: self.tone.unwrap_or_else(default_tone_player),
            uplink: self.uplink.unwrap_or_else(|| Box::new(SimulatedUplink)),
            boot: BootSequence::new(config.boot_lines.clone()),
            nav: NavState::new(Section::Profile),
            feed: Feed::new(),
            commands: CommandTable::new(&config.operator),
            terminal: CommandLine::default(),
            form: ContactForm::new(),
            matrix: MatrixMode::default(),
            copy_buttons: vec![CopyButton::default(); config.contact.len()],
            animators: Animators::new(&config),
            feed_timer: None,
            viewport: (80, 24),
            config,
        };

        if self.skip_boot || dashboard.boot.is_empty() {
            dashboard.finish_boot();
        } else {
            dashboard.start_boot();
        }
        dashboard
    }
}

/// The controller: one per run, owns every component
pub struct Dashboard {
    pub config: DashboardConfig,
    started_at: DateTime<Local>,
    scheduler: Scheduler<Task>,
    rng: Box<dyn RandomSource>,
    clipboard: Box<dyn ClipboardBackend>,
    tone: Box<dyn TonePlayer>,
    uplink: Box<dyn Uplink>,
    pub boot: BootSequence,
    pub nav: NavState,
    pub feed: Feed,
    pub commands: CommandTable,
    pub terminal: CommandLine,
    pub form: ContactForm,
    pub matrix: MatrixMode,
    pub copy_buttons: Vec<CopyButton>,
    pub animators: Animators,
    feed_timer: Option<(TimerId, Duration)>,
    viewport: (u16, u16),
}

impl Dashboard {
    pub fn builder(config: DashboardConfig) -> DashboardBuilder {
        DashboardBuilder {
            config,
            rng: None,
            clipboard: None,
            tone: None,
            uplink: None,
            started_at: None,
            skip_boot: false,
        }
    }

    /// Virtual time since the dashboard was constructed
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    /// Wall-clock time on the dashboard's clock
    pub fn now_local(&self) -> DateTime<Local> {
        let offset = chrono::Duration::from_std(self.scheduler.now()).unwrap_or_default();
        self.started_at + offset
    }

    pub fn is_booted(&self) -> bool {
        self.boot.is_done()
    }

    pub fn current_section(&self) -> Section {
        self.nav.current()
    }

    /// Live scheduled tasks
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    /// Move the virtual clock forward, running everything that comes due
    pub fn advance(&mut self, dt: Duration) {
        let until = self.scheduler.now() + dt;
        while let Some((id, task)) = self.scheduler.pop_due(until) {
            self.dispatch(id, task);
        }
        self.scheduler.settle(until);
    }

    /// Add an entry to the threat feed, stamped with the current time
    pub fn log_feed(&mut self, source: &str, message: impl Into<String>, severity: Severity) {
        let item = FeedItem::new(self.now_local(), source, message, severity);
        debug!(source = %item.source, message = %item.message, "feed entry");
        self.feed.push(item);
    }

    fn dispatch(&mut self, id: TimerId, task: Task) {
        match task {
            Task::BootRevealLine(line) => self.reveal_boot_line(line),
            Task::BootTypeChar(line) => self.type_boot_char(id, line),
            Task::BootProgressStart => self.start_boot_progress(),
            Task::BootFadeOut => self.fade_out_boot(),
            Task::BootComplete => self.finish_boot(),

            Task::InitialSection => self.activate(Section::Profile),
            Task::SectionEntrance(section) => self.play_section_entrance(section),

            Task::ClockTick => self.tick_clock(),
            Task::FeedTick => self.add_simulated_event(),
            Task::LedBlink(led) => self.blink_led(led),
            Task::CursorBlink => self.terminal.toggle_cursor(),

            Task::CounterTick => self.tick_counters(id),
            Task::SkillBarsStart => self.start_skill_bars(),
            Task::SkillBarFill(bar) => self.fill_skill_bar(bar),
            Task::SkillBarGlow(bar) => self.glow_skill_bar(bar),
            Task::SkillBarGlowEnd(bar) => self.animators.set_skill_glow(bar, false),
            Task::ScannerRestart => {
                let now = self.elapsed();
                self.animators.restart_scanner(now);
            }
            Task::ToolPulse(card) => self.pulse_tool_card(card),
            Task::ToolPulseEnd(card) => self.animators.set_tool_pulse(card, false),
            Task::ToolButtonRelease => self.animators.pressed_tool = None,
            Task::CommandFlashEnd => self.terminal.flash = false,

            Task::EncryptionStep(step) => self.run_encryption_step(step),
            Task::TransmissionComplete => self.complete_transmission(),
            Task::SubmitRestore => self.form.restore_submit(),
            Task::BannerDismiss => self.form.dismiss_banner(),

            Task::MatrixFrame => self.draw_matrix_frame(),
            Task::MatrixEnd => self.end_matrix_mode(),

            Task::CopyRevert(button) => {
                if let Some(b) = self.copy_buttons.get_mut(button) {
                    b.revert();
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::rc::Rc;

    pub fn fixed_start() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 6, 3, 9, 0, 0)
            .single()
            .expect("unambiguous local time")
    }

    /// Tone player that counts plays
    #[derive(Clone, Default)]
    pub struct CountingTone(pub Rc<RefCell<u32>>);

    impl TonePlayer for CountingTone {
        fn play_boot_tone(&mut self) -> Result<(), crate::DashboardError> {
            *self.0.borrow_mut() += 1;
            Ok(())
        }
    }

    /// Clipboard that records what was copied
    #[derive(Clone, Default)]
    pub struct RecordingClipboard {
        pub copied: Rc<RefCell<Vec<String>>>,
        pub fail: bool,
    }

    impl ClipboardBackend for RecordingClipboard {
        fn copy(&mut self, text: &str) -> Result<clipboard::CopyPath, crate::DashboardError> {
            if self.fail {
                return Err(crate::DashboardError::Clipboard("no display".into()));
            }
            self.copied.borrow_mut().push(text.to_string());
            Ok(clipboard::CopyPath::Platform)
        }
    }

    /// A booted dashboard with pinned time and randomness
    pub fn booted() -> Dashboard {
        Dashboard::builder(DashboardConfig::default())
            .seed(11)
            .started_at(fixed_start())
            .tone(CountingTone::default())
            .clipboard(RecordingClipboard::default())
            .skip_boot(true)
            .build()
    }
}
