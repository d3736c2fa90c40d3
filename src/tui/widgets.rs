//! Custom widgets for the dashboard

use crate::config::LedState;
use crate::dashboard::matrix::{MatrixRain, GLYPH_LIFETIME};
use crate::data::FeedItem;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// A labelled proficiency bar that grows as its fill animates
pub struct SkillBar {
    label: String,
    level: u8,
    /// Fraction of the full track currently drawn
    fill: f64,
    color: Color,
    glow: bool,
}

impl SkillBar {
    pub fn new(label: &str, level: u8, fill: f64) -> Self {
        Self {
            label: label.to_string(),
            level,
            fill: fill.clamp(0.0, 1.0),
            color: Color::Green,
            glow: false,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn glow(mut self, glow: bool) -> Self {
        self.glow = glow;
        self
    }
}

impl Widget for SkillBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let mut style = Style::default().fg(self.color);
        if self.glow {
            style = style.add_modifier(Modifier::BOLD);
        }

        let label = format!("{}: {}%", self.label, self.level);
        buf.set_stringn(area.x, area.y, &label, usize::from(area.width), style);

        if area.height > 1 {
            let bar_y = area.y + 1;
            let track = area.width - 2;
            let filled = ((f64::from(track) * self.fill).round() as u16).min(track);
            buf.set_string(area.x, bar_y, "[", Style::default());
            buf.set_string(area.x + area.width - 1, bar_y, "]", Style::default());

            for x in 0..filled {
                buf.set_string(area.x + 1 + x, bar_y, "█", style);
            }
            for x in filled..track {
                buf.set_string(area.x + 1 + x, bar_y, "░", Style::default().fg(Color::DarkGray));
            }
        }
    }
}

/// A status LED with its label
pub struct Led {
    label: String,
    state: LedState,
    dim: bool,
}

impl Led {
    pub fn new(label: &str, state: LedState) -> Self {
        Self {
            label: label.to_string(),
            state,
            dim: false,
        }
    }

    pub fn dim(mut self, dim: bool) -> Self {
        self.dim = dim;
        self
    }
}

impl Widget for Led {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let color = match self.state {
            LedState::Active => Color::Green,
            LedState::Warning => Color::Yellow,
            LedState::Idle => Color::DarkGray,
        };
        let mut style = Style::default().fg(color);
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        let text = format!("● {}", self.label);
        buf.set_stringn(area.x, area.y, &text, usize::from(area.width), style);
    }
}

/// One threat feed entry: timestamp and source on the first row, message below
pub struct FeedEntry<'a> {
    item: &'a FeedItem,
}

impl<'a> FeedEntry<'a> {
    pub fn new(item: &'a FeedItem) -> Self {
        Self { item }
    }
}

impl Widget for FeedEntry<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let color = crate::tui::severity_color(&self.item.severity);
        let width = usize::from(area.width);

        let head = format!(
            "{} [{}] {}",
            self.item.severity.symbol(),
            self.item.formatted_timestamp(),
            self.item.source
        );
        buf.set_stringn(area.x, area.y, &head, width, Style::default().fg(color));

        if area.height > 1 {
            buf.set_stringn(
                area.x + 2,
                area.y + 1,
                &self.item.message,
                width.saturating_sub(2),
                Style::default().fg(Color::Gray),
            );
        }
    }
}

/// Double-bordered box for the form result banner
pub struct BannerBox {
    title: String,
    content: Vec<String>,
    border_color: Color,
}

impl BannerBox {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Vec::new(),
            border_color: Color::Green,
        }
    }

    pub fn content(mut self, lines: Vec<String>) -> Self {
        self.content = lines;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }
}

impl Widget for BannerBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 2 {
            return;
        }
        let style = Style::default().fg(self.border_color);
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;

        buf.set_string(area.x, area.y, "╔", style);
        buf.set_string(area.x, bottom, "╚", style);
        for x in area.x + 1..right {
            buf.set_string(x, area.y, "═", style);
            buf.set_string(x, bottom, "═", style);
        }
        buf.set_string(right, area.y, "╗", style);
        buf.set_string(right, bottom, "╝", style);
        for y in area.y + 1..bottom {
            buf.set_string(area.x, y, "║", style);
            buf.set_string(right, y, "║", style);
        }

        let title = format!(" {} ", self.title);
        let title_len = title.chars().count() as u16;
        if title_len < area.width {
            buf.set_string(area.x + (area.width - title_len) / 2, area.y, &title, style);
        }

        let inner_width = usize::from(area.width.saturating_sub(4));
        for (i, line) in self.content.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= bottom {
                break;
            }
            buf.set_stringn(area.x + 2, y, line, inner_width, Style::default().fg(Color::White));
        }
    }
}

/// Digital rain drawn over whatever is underneath
pub struct MatrixOverlay<'a> {
    rain: &'a MatrixRain,
}

impl<'a> MatrixOverlay<'a> {
    pub fn new(rain: &'a MatrixRain) -> Self {
        Self { rain }
    }
}

impl Widget for MatrixOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in 0..area.height.min(self.rain.height) {
            for x in 0..area.width.min(self.rain.width) {
                let cell = &mut buf[(area.x + x, area.y + y)];
                cell.reset();
                cell.set_bg(Color::Black);
                let Some(glyph) = self.rain.cell(x, y) else {
                    continue;
                };
                let style = if glyph.life == GLYPH_LIFETIME {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else if glyph.life > GLYPH_LIFETIME / 2 {
                    Style::default().fg(Color::LightGreen)
                } else {
                    Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
                };
                cell.set_char(glyph.ch).set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn skill_bar_fills_proportionally() {
        let area = Rect::new(0, 0, 12, 2);
        let mut buf = Buffer::empty(area);
        SkillBar::new("Rust", 50, 0.5).render(area, &mut buf);
        assert_eq!(row(&buf, 0).trim_end(), "Rust: 50%");
        assert_eq!(row(&buf, 1), "[█████░░░░░]");
    }

    #[test]
    fn banner_box_survives_tiny_areas() {
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        BannerBox::new("TRANSMISSION")
            .content(vec!["ok".into()])
            .render(area, &mut buf);
        assert_eq!(row(&buf, 0), "   ");
    }
}
