//! Terminal User Interface
//!
//! Green-on-black SOC console rendered with ratatui

pub mod app;
pub mod widgets;

pub use app::App;

use crate::data::Severity;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Below this width the feed moves under the content panel
pub const COMPACT_WIDTH: u16 = 100;

/// Color scheme for the console
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub primary: Color,
    pub alert: Color,
    pub warning: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::Green,
            accent: Color::Cyan,
            primary: Color::LightGreen,
            alert: Color::Red,
            warning: Color::Yellow,
            muted: Color::DarkGray,
            border: Color::Green,
        }
    }
}

/// Get color for severity level
pub fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Medium => Color::Yellow,
        Severity::High => Color::Red,
    }
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// Boot screen banner
pub const LOGO: &str = r#"
 ███████╗ ██████╗  ██████╗
 ██╔════╝██╔═══██╗██╔════╝
 ███████╗██║   ██║██║
 ╚════██║██║   ██║██║
 ███████║╚██████╔╝╚██████╗
 ╚══════╝ ╚═════╝  ╚═════╝
   SECURITY OPERATIONS CENTER
"#;

/// Header title
pub const SMALL_LOGO: &str = " SOC://DASHBOARD ";

/// Help text
pub const HELP_TEXT: &str = r#"
╔═══════════════════════════════════════════════╗
║                KEYBOARD SHORTCUTS             ║
╠═══════════════════════════════════════════════╣
║  Ctrl/Alt+1-6  Switch sections                ║
║  ←/→           Previous / next section        ║
║  ↑/↓           Select item in section         ║
║  Enter         Copy contact / run tool action ║
║  a             Cycle tool action              ║
║  i             Edit contact form              ║
║  F12 : /       Focus command line             ║
║  Tab           Complete command / next field  ║
║  Esc           Leave command line or form     ║
║  F1            Toggle this help               ║
║  q  Ctrl+C     Quit                           ║
╚═══════════════════════════════════════════════╝
"#;

/// Header, nav tabs, body, command line
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Nav tabs
            Constraint::Min(8),    // Body
            Constraint::Length(3), // Command line
        ])
        .split(area)
        .to_vec()
}

/// Section content beside the threat feed, or above it on narrow terminals
pub fn create_body_layout(area: Rect) -> Vec<Rect> {
    if area.width < COMPACT_WIDTH {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area)
            .to_vec()
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area)
            .to_vec()
    }
}

/// A rectangle of at most `width` x `height` centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
