//! Navigable content sections

use serde::{Deserialize, Serialize};

/// One of the fixed content views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Profile,
    Operations,
    Arsenal,
    Tools,
    Intel,
    Contact,
}

impl Section {
    /// Navigation order, which is also the shortcut order (1-6)
    pub const ALL: [Section; 6] = [
        Section::Profile,
        Section::Operations,
        Section::Arsenal,
        Section::Tools,
        Section::Intel,
        Section::Contact,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::Profile => "profile",
            Section::Operations => "operations",
            Section::Arsenal => "arsenal",
            Section::Tools => "tools",
            Section::Intel => "intel",
            Section::Contact => "contact",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Profile => "Analyst Profile",
            Section::Operations => "Operations Log",
            Section::Arsenal => "Skill Arsenal",
            Section::Tools => "Tool Inventory",
            Section::Intel => "Threat Intel",
            Section::Contact => "Secure Comms",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Shortcut digit (1-based) to section
    pub fn from_shortcut(digit: char) -> Option<Self> {
        let n = digit.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_follow_navigation_order() {
        assert_eq!(Section::from_shortcut('1'), Some(Section::Profile));
        assert_eq!(Section::from_shortcut('3'), Some(Section::Arsenal));
        assert_eq!(Section::from_shortcut('6'), Some(Section::Contact));
        assert_eq!(Section::from_shortcut('0'), None);
        assert_eq!(Section::from_shortcut('7'), None);
        assert_eq!(Section::from_shortcut('x'), None);
    }

    #[test]
    fn ids_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_id(section.id()), Some(section));
        }
        assert_eq!(Section::from_id("mainframe"), None);
    }

    #[test]
    fn cycling_wraps_around() {
        assert_eq!(Section::Contact.next(), Section::Profile);
        assert_eq!(Section::Profile.previous(), Section::Contact);
    }
}
