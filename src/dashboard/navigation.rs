//! Section navigation
//!
//! The nav bar highlight and the visible content section are separate flags
//! so the renderer can draw them independently, but only [`Dashboard::activate`]
//! ever writes them and it always writes both from the same section.

use super::{Dashboard, Task};
use crate::data::Section;
use crate::DashboardError;
use std::time::Duration;
use tracing::{error, info};

/// Delay before a section's entrance animation plays
const ENTRANCE_DELAY: Duration = Duration::from_millis(100);
/// Extra delay before skill bars refill on entering the arsenal
const ARSENAL_REFILL_DELAY: Duration = Duration::from_millis(300);
/// Gap between tool-card pulses
const TOOL_PULSE_STAGGER: Duration = Duration::from_millis(300);

pub const SHORTCUTS: &str = "Keyboard Shortcuts:\nCtrl+1-6: Switch sections\nF1: Help\nF12: Command line focus";

#[derive(Debug, Clone)]
pub struct NavState {
    current: Section,
    nav_active: [bool; 6],
    content_active: [bool; 6],
}

impl NavState {
    pub fn new(initial: Section) -> Self {
        let mut state = Self {
            current: initial,
            nav_active: [false; 6],
            content_active: [false; 6],
        };
        state.set(initial);
        state
    }

    pub fn current(&self) -> Section {
        self.current
    }

    pub fn is_nav_active(&self, section: Section) -> bool {
        self.nav_active[section.index()]
    }

    pub fn is_content_active(&self, section: Section) -> bool {
        self.content_active[section.index()]
    }

    /// Sections whose nav entry is highlighted
    pub fn active_nav_entries(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.is_nav_active(*s))
            .collect()
    }

    /// Sections whose content is visible
    pub fn active_content(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.is_content_active(*s))
            .collect()
    }

    fn set(&mut self, section: Section) {
        self.nav_active = [false; 6];
        self.content_active = [false; 6];
        self.nav_active[section.index()] = true;
        self.content_active[section.index()] = true;
        self.current = section;
    }
}

impl Dashboard {
    /// Switch to the section named `id`. Unknown ids leave navigation as is.
    pub fn switch_section(&mut self, id: &str) -> Result<Section, DashboardError> {
        let Some(section) = Section::from_id(id) else {
            error!(section = id, "section not found");
            return Err(DashboardError::SectionNotFound(id.to_string()));
        };
        self.activate(section);
        Ok(section)
    }

    pub fn activate(&mut self, section: Section) {
        info!(section = %section, "switching section");
        self.nav.set(section);
        self.scheduler
            .after(ENTRANCE_DELAY, Task::SectionEntrance(section));
    }

    /// Shortcut digits 1-6 held with the modifier
    pub fn shortcut(&mut self, digit: char) -> Option<Section> {
        let section = Section::from_shortcut(digit)?;
        self.activate(section);
        Some(section)
    }

    pub fn log_shortcuts(&self) {
        for line in SHORTCUTS.lines() {
            info!(target: "shortcuts", "{line}");
        }
    }

    pub(super) fn play_section_entrance(&mut self, section: Section) {
        match section {
            Section::Profile => {
                self.animators.stop_scanner();
                self.scheduler.after(ENTRANCE_DELAY, Task::ScannerRestart);
            }
            Section::Arsenal => {
                self.scheduler
                    .after(ARSENAL_REFILL_DELAY, Task::SkillBarsStart);
            }
            Section::Tools => {
                for card in 0..self.config.tools.len() {
                    self.scheduler
                        .after(TOOL_PULSE_STAGGER * card as u32, Task::ToolPulse(card));
                }
            }
            Section::Operations | Section::Intel | Section::Contact => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::testing::booted;
    use proptest::prelude::*;

    fn assert_single_active(d: &Dashboard, expected: Section) {
        assert_eq!(d.nav.active_nav_entries(), vec![expected]);
        assert_eq!(d.nav.active_content(), vec![expected]);
        assert_eq!(d.current_section(), expected);
    }

    #[test]
    fn switching_moves_both_flags() {
        let mut d = booted();
        assert_eq!(d.switch_section("intel").ok(), Some(Section::Intel));
        assert_single_active(&d, Section::Intel);
    }

    #[test]
    fn unknown_section_leaves_state_untouched() {
        let mut d = booted();
        d.switch_section("arsenal").expect("arsenal exists");

        let err = d.switch_section("mainframe").expect_err("no such section");
        assert!(matches!(err, DashboardError::SectionNotFound(ref id) if id == "mainframe"));
        assert_single_active(&d, Section::Arsenal);
    }

    #[test]
    fn tools_entrance_pulses_cards_in_sequence() {
        let mut d = booted();
        d.switch_section("tools").expect("tools exists");

        d.advance(Duration::from_millis(100));
        assert!(d.animators.tool_pulse(0));
        assert!(!d.animators.tool_pulse(1));

        d.advance(Duration::from_millis(300));
        assert!(d.animators.tool_pulse(1));

        d.advance(Duration::from_millis(1000));
        assert!(!d.animators.tool_pulse(0));
    }

    #[test]
    fn profile_entrance_restarts_scanner() {
        let mut d = booted();
        d.advance(Duration::from_secs(3));
        d.switch_section("profile").expect("profile exists");

        d.advance(Duration::from_millis(150));
        assert!(d.animators.scanner_position(d.elapsed()).is_none());

        d.advance(Duration::from_millis(50));
        assert_eq!(d.animators.scanner_position(d.elapsed()), Some(0.0));
    }

    #[test]
    fn shortcut_digits_map_to_sections() {
        let mut d = booted();
        assert_eq!(d.shortcut('4'), Some(Section::Tools));
        assert_single_active(&d, Section::Tools);
        assert_eq!(d.shortcut('9'), None);
        assert_single_active(&d, Section::Tools);
    }

    proptest! {
        #[test]
        fn exactly_one_section_active_after_any_switches(ids in proptest::collection::vec(
            prop_oneof![
                Just("profile"), Just("operations"), Just("arsenal"), Just("tools"),
                Just("intel"), Just("contact"), Just("bogus"), Just(""),
            ],
            1..20,
        )) {
            let mut d = booted();
            let mut expected = d.current_section();
            for id in ids {
                if let Ok(section) = d.switch_section(id) {
                    expected = section;
                }
                prop_assert_eq!(d.nav.active_nav_entries(), vec![expected]);
                prop_assert_eq!(d.nav.active_content(), vec![expected]);
            }
        }
    }
}
