//! Main application state, input handling and rendering

use crate::dashboard::boot::BootPhase;
use crate::dashboard::clipboard::CopyState;
use crate::dashboard::form::{BannerKind, FieldKind};
use crate::data::Section;
use crate::tui::widgets::{BannerBox, FeedEntry, Led, MatrixOverlay, SkillBar};
use crate::tui::{centered_rect, create_body_layout, create_main_layout, styled_block, Theme};
use crate::tui::{HELP_TEXT, LOGO, SMALL_LOGO};
use crate::Dashboard;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;
use tracing::debug;

/// Index of the submit button in form focus order
const SUBMIT_SLOT: usize = FieldKind::ALL.len();

/// Where keystrokes go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Section navigation and item selection
    Panel,
    Command,
    /// Contact form field (or the submit button at [`SUBMIT_SLOT`])
    Form(usize),
}

/// Something clickable on the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Nav(Section),
    Copy(usize),
    ToolAction(usize, usize),
    FormField(usize),
    Submit,
    Command,
}

/// Application state
pub struct App {
    pub dashboard: Dashboard,
    pub theme: Theme,
    pub running: bool,
    pub show_help: bool,
    pub focus: Focus,
    /// Highlighted item in the current section
    pub selected: usize,
    /// Highlighted action on the selected tool card
    pub tool_action: usize,
    hitboxes: Vec<(Rect, Hit)>,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            theme: Theme::default(),
            running: true,
            show_help: false,
            focus: Focus::Panel,
            selected: 0,
            tool_action: 0,
            hitboxes: Vec::new(),
        }
    }

    /// Advance the dashboard clock
    pub fn tick(&mut self, dt: Duration) {
        self.dashboard.advance(dt);
    }

    /// Wait up to `timeout` for one terminal event and handle it
    pub fn handle_input(&mut self, timeout: Duration) -> std::io::Result<()> {
        if !event::poll(timeout)? {
            return Ok(());
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::FocusGained => self.dashboard.set_focus(true),
            Event::FocusLost => self.dashboard.set_focus(false),
            Event::Resize(width, height) => self.dashboard.set_viewport(width, height),
            _ => {}
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        if !self.dashboard.is_booted() {
            if key.code == KeyCode::Char('q') {
                self.running = false;
            }
            return;
        }

        // Global shortcuts
        match key.code {
            KeyCode::Char(c @ '1'..='6') if ctrl || alt => {
                if self.dashboard.shortcut(c).is_some() {
                    self.reset_selection();
                }
                return;
            }
            KeyCode::F(1) => {
                self.dashboard.log_shortcuts();
                self.show_help = !self.show_help;
                return;
            }
            KeyCode::F(12) => {
                self.focus_command();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Command => self.handle_command_key(key),
            Focus::Form(slot) => self.handle_form_key(slot, key),
            Focus::Panel => self.handle_panel_key(key),
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let before = self.dashboard.current_section();
                if let Some(outcome) = self.dashboard.submit_command() {
                    debug!(command = %outcome.command, found = outcome.found, "command submitted");
                }
                if self.dashboard.current_section() != before {
                    self.reset_selection();
                }
            }
            KeyCode::Up => self.dashboard.recall_previous(),
            KeyCode::Tab => {
                self.dashboard.complete_command();
            }
            KeyCode::Backspace => self.dashboard.terminal.backspace(),
            KeyCode::Esc => self.focus_panel(),
            KeyCode::Char(c) => self.dashboard.terminal.push_char(c),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, slot: usize, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.focus_panel(),
            KeyCode::Tab | KeyCode::Down => self.focus = Focus::Form((slot + 1) % (SUBMIT_SLOT + 1)),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = Focus::Form((slot + SUBMIT_SLOT) % (SUBMIT_SLOT + 1))
            }
            KeyCode::Char('s') if ctrl => self.submit_form(),
            KeyCode::Enter if slot == SUBMIT_SLOT => self.submit_form(),
            KeyCode::Enter => self.focus = Focus::Form(slot + 1),
            KeyCode::Backspace => {
                if let Some(&kind) = FieldKind::ALL.get(slot) {
                    self.dashboard.form.backspace(kind);
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(&kind) = FieldKind::ALL.get(slot) {
                    self.dashboard.form.push_char(kind, c);
                }
            }
            _ => {}
        }
    }

    fn handle_panel_key(&mut self, key: KeyEvent) {
        let section = self.dashboard.current_section();
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char(':') | KeyCode::Char('/') => self.focus_command(),
            KeyCode::Esc => self.show_help = false,
            KeyCode::Left => self.go_to(section.previous()),
            KeyCode::Right => self.go_to(section.next()),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.item_count(section) {
                    self.selected += 1;
                    self.tool_action = 0;
                }
            }
            KeyCode::Char('a') if section == Section::Tools => {
                let actions = self
                    .dashboard
                    .config
                    .tools
                    .get(self.selected)
                    .map_or(0, |t| t.actions.len());
                if actions > 0 {
                    self.tool_action = (self.tool_action + 1) % actions;
                }
            }
            KeyCode::Char('i') if section == Section::Contact => self.focus = Focus::Form(0),
            KeyCode::Enter | KeyCode::Char('y') if section == Section::Contact => {
                self.copy(self.selected);
            }
            KeyCode::Enter if section == Section::Tools => {
                self.dashboard.run_tool_action(self.selected, self.tool_action);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !self.dashboard.is_booted() {
            return;
        }
        let at = Position::new(mouse.column, mouse.row);
        let Some(hit) = self
            .hitboxes
            .iter()
            .find(|(rect, _)| rect.contains(at))
            .map(|(_, hit)| *hit)
        else {
            return;
        };
        match hit {
            Hit::Nav(section) => self.go_to(section),
            Hit::Copy(index) => {
                self.selected = index;
                self.copy(index);
            }
            Hit::ToolAction(tool, action) => {
                self.selected = tool;
                self.tool_action = action;
                self.dashboard.run_tool_action(tool, action);
            }
            Hit::FormField(slot) => self.focus = Focus::Form(slot),
            Hit::Submit => self.submit_form(),
            Hit::Command => self.focus_command(),
        }
    }

    fn go_to(&mut self, section: Section) {
        if self.dashboard.switch_section(section.id()).is_ok() {
            self.reset_selection();
        }
    }

    /// After a section change: the form is no longer on screen
    fn reset_selection(&mut self) {
        self.selected = 0;
        self.tool_action = 0;
        if matches!(self.focus, Focus::Form(_)) {
            self.focus = Focus::Panel;
        }
    }

    fn focus_command(&mut self) {
        self.focus = Focus::Command;
        self.dashboard.terminal.set_focus(true);
    }

    fn focus_panel(&mut self) {
        self.focus = Focus::Panel;
        self.dashboard.terminal.set_focus(false);
    }

    /// Failures show on the button itself
    fn copy(&mut self, index: usize) {
        if let Err(err) = self.dashboard.copy_target(index) {
            debug!(index, error = %err, "copy not completed");
        }
    }

    fn submit_form(&mut self) {
        if let Err(rejected) = self.dashboard.submit_form() {
            debug!(?rejected, "form not submitted");
        }
    }

    fn item_count(&self, section: Section) -> usize {
        let config = &self.dashboard.config;
        match section {
            Section::Profile => 0,
            Section::Operations => config.operations.len(),
            Section::Arsenal => config.skills.len(),
            Section::Tools => config.tools.len(),
            Section::Intel => config.intel.len(),
            Section::Contact => config.contact.len(),
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.dashboard.set_viewport(area.width, area.height);
        self.hitboxes.clear();

        if self.dashboard.boot.phase() == BootPhase::Done {
            self.render_main(frame);
        } else {
            self.render_boot(frame);
        }

        if let Some(rain) = self.dashboard.matrix.rain() {
            frame.render_widget(MatrixOverlay::new(rain), area);
        }

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_boot(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);
        let now = self.dashboard.elapsed();
        let boot = &self.dashboard.boot;

        let mut style = Style::default().fg(self.theme.fg);
        if boot.opacity(now) < 0.5 {
            style = style.add_modifier(Modifier::DIM);
        }

        let logo_height = LOGO.lines().count() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(logo_height),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(centered_rect(64, logo_height + 12, area));

        frame.render_widget(
            Paragraph::new(LOGO).style(style.add_modifier(Modifier::BOLD)),
            chunks[0],
        );

        let lines: Vec<Line> = boot
            .visible_lines()
            .into_iter()
            .map(|l| Line::from(Span::styled(l, style)))
            .collect();
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        let progress = boot.progress(now);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_style(style))
            .gauge_style(style)
            .ratio(progress)
            .label(format!("{:.0}%", progress * 100.0));
        frame.render_widget(gauge, chunks[2]);
    }

    fn render_main(&mut self, frame: &mut Frame) {
        let layout = create_main_layout(frame.area());

        self.render_header(frame, layout[0]);
        self.render_nav(frame, layout[1]);

        let body = create_body_layout(layout[2]);
        self.render_section(frame, body[0]);
        self.render_feed(frame, body[1]);

        self.render_command_line(frame, layout[3]);

        if let Some(banner) = self.dashboard.form.banner() {
            let (title, color) = match banner.kind {
                BannerKind::Success => ("TRANSMISSION COMPLETE", self.theme.primary),
                BannerKind::Error => ("TRANSMISSION FAILED", self.theme.alert),
            };
            let width = (banner.message.chars().count() as u16 + 6).max(title.len() as u16 + 6);
            let area = frame.area();
            let popup = Rect::new(
                area.x + area.width.saturating_sub(width) / 2,
                area.y + 1,
                width.min(area.width),
                3,
            )
            .intersection(area);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                BannerBox::new(title)
                    .content(vec![banner.message.clone()])
                    .border_color(color),
                popup,
            );
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let leds_width = self
            .dashboard
            .animators
            .leds
            .iter()
            .map(|l| l.label.chars().count() as u16 + 3)
            .sum::<u16>()
            + 2;
        let header_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(19),
                Constraint::Min(20),
                Constraint::Length(leds_width),
                Constraint::Length(12),
            ])
            .split(area);

        let logo = Paragraph::new(SMALL_LOGO)
            .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(logo, header_layout[0]);

        let operator = &self.dashboard.config.operator;
        let title = Paragraph::new(format!("{} | {}", operator.name, operator.title))
            .style(Style::default().fg(self.theme.fg))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(title, header_layout[1]);

        let led_block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border));
        let inner = led_block.inner(header_layout[2]);
        frame.render_widget(led_block, header_layout[2]);
        let mut x = inner.x;
        for led in &self.dashboard.animators.leds {
            let width = led.label.chars().count() as u16 + 3;
            let slot = Rect::new(x, inner.y, width.min(inner.right().saturating_sub(x)), 1);
            frame.render_widget(Led::new(&led.label, led.state).dim(led.dim), slot);
            x += width;
        }

        let clock = Paragraph::new(self.dashboard.animators.system_time.as_str())
            .style(Style::default().fg(self.theme.primary).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(clock, header_layout[3]);
    }

    fn render_nav(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut spans = Vec::new();
        let mut x = inner.x;
        for (i, section) in Section::ALL.into_iter().enumerate() {
            let label = format!(" {}:{} ", i + 1, section.id().to_uppercase());
            let width = label.chars().count() as u16;
            let style = if self.dashboard.nav.is_nav_active(section) {
                Style::default().fg(Color::Black).bg(self.theme.fg).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.fg)
            };
            self.hitboxes.push((Rect::new(x, inner.y, width, 1), Hit::Nav(section)));
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
            x += width + 1;
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn render_section(&mut self, frame: &mut Frame, area: Rect) {
        let section = self.dashboard.current_section();
        let block = styled_block(section.title(), &self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !self.dashboard.nav.is_content_active(section) {
            return;
        }
        match section {
            Section::Profile => self.render_profile(frame, inner),
            Section::Operations => self.render_operations(frame, inner),
            Section::Arsenal => self.render_arsenal(frame, inner),
            Section::Tools => self.render_tools(frame, inner),
            Section::Intel => self.render_intel(frame, inner),
            Section::Contact => self.render_contact(frame, inner),
        }
    }

    fn render_profile(&self, frame: &mut Frame, area: Rect) {
        let operator = &self.dashboard.config.operator;
        let mut lines = vec![
            Line::from(Span::styled(
                operator.name.as_str(),
                Style::default().fg(self.theme.primary).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(operator.title.as_str(), Style::default().fg(self.theme.accent))),
            Line::from(vec![
                Span::raw("Clearance: "),
                Span::styled(operator.clearance.as_str(), Style::default().fg(self.theme.warning)),
            ]),
            Line::from(""),
        ];
        lines.extend(operator.summary.iter().map(|s| Line::from(s.as_str())));
        lines.push(Line::from(""));
        lines.push(Line::from(
            self.dashboard
                .animators
                .counters
                .iter()
                .flat_map(|c| {
                    [
                        Span::styled(
                            c.display(),
                            Style::default().fg(self.theme.primary).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(format!(" {}   ", c.label), Style::default().fg(self.theme.muted)),
                    ]
                })
                .collect::<Vec<_>>(),
        ));

        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(self.theme.fg))
                .wrap(Wrap { trim: true }),
            area,
        );

        if let Some(pos) = self.dashboard.animators.scanner_position(self.dashboard.elapsed()) {
            if area.height > 0 {
                let y = area.y + (pos * f64::from(area.height)) as u16;
                let line = Rect::new(area.x, y.min(area.bottom() - 1), area.width, 1);
                frame.buffer_mut().set_style(line, Style::default().bg(Color::Rgb(0, 60, 0)));
            }
        }
    }

    fn render_operations(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        for (i, op) in self.dashboard.config.operations.iter().enumerate() {
            let marker = if i == self.selected { "▶ " } else { "  " };
            let status_color = match op.status.to_uppercase().as_str() {
                "ACTIVE" | "ONGOING" => self.theme.warning,
                "COMPLETE" | "CLOSED" => self.theme.primary,
                _ => self.theme.accent,
            };
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("[{}] ", op.code), Style::default().fg(self.theme.accent)),
                Span::styled(op.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(op.status.as_str(), Style::default().fg(status_color)),
            ]));
            if !op.summary.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", op.summary),
                    Style::default().fg(self.theme.muted),
                )));
            }
        }
        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(self.theme.fg))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_arsenal(&self, frame: &mut Frame, area: Rect) {
        let now = self.dashboard.elapsed();
        for (i, bar) in self.dashboard.animators.skill_bars.iter().enumerate() {
            let y = area.y + (i as u16) * 3;
            if y + 2 > area.bottom() {
                break;
            }
            let color = if i == self.selected { self.theme.accent } else { self.theme.fg };
            frame.render_widget(
                SkillBar::new(&bar.name, bar.level, self.dashboard.animators.skill_fill(i, now))
                    .color(color)
                    .glow(bar.glow),
                Rect::new(area.x, y, area.width, 2),
            );
        }
    }

    fn render_tools(&mut self, frame: &mut Frame, area: Rect) {
        let mut y = area.y;
        for (i, tool) in self.dashboard.config.tools.iter().enumerate() {
            if y + 3 > area.bottom() {
                break;
            }
            let mut name_style = Style::default().fg(self.theme.primary).add_modifier(Modifier::BOLD);
            if self.dashboard.animators.tool_pulse(i) {
                name_style = name_style.add_modifier(Modifier::REVERSED);
            }
            let marker = if i == self.selected { "▶ " } else { "  " };
            frame.buffer_mut().set_line(
                area.x,
                y,
                &Line::from(vec![
                    Span::raw(marker),
                    Span::styled(tool.name.as_str(), name_style),
                    Span::styled(format!("  [{}]", tool.category), Style::default().fg(self.theme.muted)),
                ]),
                area.width,
            );
            frame.buffer_mut().set_stringn(
                area.x + 4,
                y + 1,
                &tool.description,
                usize::from(area.width.saturating_sub(4)),
                Style::default().fg(self.theme.fg),
            );

            let mut x = area.x + 4;
            for (j, action) in tool.actions.iter().enumerate() {
                let label = format!("[{}]", action.to_uppercase());
                let width = label.chars().count() as u16;
                if x + width > area.right() {
                    break;
                }
                let pressed = self.dashboard.animators.pressed_tool == Some((i, j));
                let chosen = i == self.selected && j == self.tool_action;
                let style = if pressed {
                    Style::default().fg(Color::Black).bg(self.theme.primary)
                } else if chosen {
                    Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.fg)
                };
                frame.buffer_mut().set_string(x, y + 2, &label, style);
                self.hitboxes.push((Rect::new(x, y + 2, width, 1), Hit::ToolAction(i, j)));
                x += width + 1;
            }
            y += 4;
        }
    }

    fn render_intel(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        for (i, entry) in self.dashboard.config.intel.iter().enumerate() {
            let style = if i == self.selected {
                Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.primary)
            };
            lines.push(Line::from(Span::styled(format!("» {}", entry.title), style)));
            if !entry.detail.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", entry.detail),
                    Style::default().fg(self.theme.fg),
                )));
            }
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn render_contact(&mut self, frame: &mut Frame, area: Rect) {
        let mut y = area.y;
        for (i, (target, button)) in self
            .dashboard
            .config
            .contact
            .iter()
            .zip(&self.dashboard.copy_buttons)
            .enumerate()
        {
            if y >= area.bottom() {
                return;
            }
            let button_style = match button.state {
                CopyState::Idle => Style::default().fg(self.theme.accent),
                CopyState::Copied => Style::default().fg(Color::Black).bg(self.theme.primary),
                CopyState::Error => Style::default().fg(Color::White).bg(self.theme.alert),
            };
            let label = format!("[{}]", button.label());
            let marker = if i == self.selected && self.focus == Focus::Panel { "▶ " } else { "  " };
            let line = Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<8}", target.label), Style::default().fg(self.theme.muted)),
                Span::styled(target.payload.as_str(), Style::default().fg(self.theme.fg)),
                Span::raw(" "),
            ]);
            let text_width = line.width() as u16;
            frame.buffer_mut().set_line(area.x, y, &line, area.width);
            let bx = area.x + text_width;
            if bx + (label.chars().count() as u16) <= area.right() {
                frame.buffer_mut().set_string(bx, y, &label, button_style);
                self.hitboxes.push((
                    Rect::new(bx, y, label.chars().count() as u16, 1),
                    Hit::Copy(i),
                ));
            }
            y += 1;
        }
        y += 1;

        let form = &self.dashboard.form;
        for (slot, field) in form.fields.iter().enumerate() {
            if y >= area.bottom() {
                return;
            }
            let focused = self.focus == Focus::Form(slot);
            let label_style = if field.invalid {
                Style::default().fg(self.theme.alert)
            } else if focused {
                Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            };
            let required = if field.kind.required() { "*" } else { " " };
            let cursor = if focused { "_" } else { "" };
            let line = Line::from(vec![
                Span::styled(format!("{:>9}{} ", field.kind.label(), required), label_style),
                Span::styled(format!("{}{}", field.value, cursor), Style::default().fg(self.theme.fg)),
            ]);
            frame.buffer_mut().set_line(area.x, y, &line, area.width);
            self.hitboxes.push((Rect::new(area.x, y, area.width, 1), Hit::FormField(slot)));
            y += 1;
        }

        if y + 1 < area.bottom() {
            y += 1;
            let label = format!("[ {} ]", form.submit_label());
            let style = if !form.submit_enabled() {
                Style::default().fg(self.theme.muted)
            } else if self.focus == Focus::Form(SUBMIT_SLOT) {
                Style::default().fg(Color::Black).bg(self.theme.primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.primary)
            };
            let width = (label.chars().count() as u16).min(area.width);
            frame.buffer_mut().set_stringn(area.x + 2, y, &label, usize::from(width), style);
            self.hitboxes.push((Rect::new(area.x + 2, y, width, 1), Hit::Submit));
        }
    }

    fn render_feed(&self, frame: &mut Frame, area: Rect) {
        let block = styled_block("Threat Feed", &self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut y = inner.y;
        for item in self.dashboard.feed.iter() {
            if y + 2 > inner.bottom() {
                break;
            }
            frame.render_widget(FeedEntry::new(item), Rect::new(inner.x, y, inner.width, 2));
            y += 2;
        }
    }

    fn render_command_line(&mut self, frame: &mut Frame, area: Rect) {
        let terminal = &self.dashboard.terminal;
        let operator = &self.dashboard.config.operator;
        let focused = self.focus == Focus::Command;

        let cursor = if focused && terminal.cursor_visible { "█" } else { " " };
        let prompt = if focused || !terminal.input.is_empty() {
            format!("{}@{}:~$ {}{}", operator.handle, operator.host, terminal.input, cursor)
        } else {
            format!("{}@{}:~$ [Press : or F12 to type a command]", operator.handle, operator.host)
        };

        let border = if terminal.flash {
            self.theme.accent
        } else if focused {
            self.theme.primary
        } else {
            self.theme.border
        };
        let input = Paragraph::new(prompt)
            .style(Style::default().fg(if focused { self.theme.primary } else { self.theme.muted }))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(" Command "),
            );
        frame.render_widget(input, area);
        self.hitboxes.push((area, Hit::Command));
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let popup_area = centered_rect(51, HELP_TEXT.lines().count() as u16 + 2, frame.area());
        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.theme.fg))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.accent)));
        frame.render_widget(help, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::form::SUBMIT_LABEL;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        let dashboard = Dashboard::builder(DashboardConfig::default())
            .seed(9)
            .tone(Silent)
            .skip_boot(true)
            .build();
        App::new(dashboard)
    }

    struct Silent;

    impl crate::dashboard::tone::TonePlayer for Silent {
        fn play_boot_tone(&mut self) -> Result<(), crate::DashboardError> {
            Ok(())
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("create test terminal");
        terminal.draw(|frame| app.render(frame)).expect("draw ui");
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();
        for y in 0..height {
            let mut line = String::new();
            for x in 0..width {
                line.push_str(buffer[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    #[test]
    fn alt_digit_switches_section() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('3'), KeyModifiers::ALT));
        assert_eq!(app.dashboard.current_section(), Section::Arsenal);

        app.handle_key(KeyEvent::new(KeyCode::Char('9'), KeyModifiers::CONTROL));
        assert_eq!(app.dashboard.current_section(), Section::Arsenal);
    }

    #[test]
    fn command_line_round_trip() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(':')));
        assert_eq!(app.focus, Focus::Command);
        assert!(app.dashboard.terminal.focused);

        type_text(&mut app, "wh");
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.dashboard.terminal.input, "whoami");

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.dashboard.terminal.input, "");
        assert_eq!(app.dashboard.terminal.history(), ["whoami".to_string()]);

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.dashboard.terminal.input, "whoami");

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Panel);
    }

    #[test]
    fn q_types_into_command_line_but_quits_from_panel() {
        let mut app = app();
        app.handle_key(key(KeyCode::F(12)));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.dashboard.terminal.input, "q");

        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn f1_toggles_help() {
        let mut app = app();
        app.handle_key(key(KeyCode::F(1)));
        assert!(app.show_help);
        app.handle_key(key(KeyCode::F(1)));
        assert!(!app.show_help);
    }

    #[test]
    fn contact_form_fills_and_submits_from_keyboard() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('6'), KeyModifiers::ALT));
        app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(app.focus, Focus::Form(0));

        type_text(&mut app, "Ada");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "ada@example.org");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "hello");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Form(SUBMIT_SLOT));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.dashboard.form.is_transmitting());

        app.tick(Duration::from_secs(4));
        assert!(app.dashboard.form.banner().is_some());
        assert_eq!(app.dashboard.form.field(FieldKind::Message).value, "");
    }

    #[test]
    fn renders_main_view() {
        let mut app = app();
        app.tick(Duration::from_millis(200));
        let text = screen(&mut app, 120, 40);
        assert!(text.contains("SOC://DASHBOARD"));
        assert!(text.contains("1:PROFILE"));
        assert!(text.contains("Threat Feed"));
        assert!(text.contains("IDS-MONITOR"));
        assert!(text.contains("analyst@cybersec-workstation:~$"));
    }

    #[test]
    fn banner_on_a_tiny_terminal_is_clipped() {
        let mut app = app();
        app.dashboard.form.set_value(FieldKind::Name, "Ada");
        app.dashboard.form.set_value(FieldKind::Email, "ada@example.org");
        app.dashboard.form.set_value(FieldKind::Message, "hello");
        app.dashboard.submit_form().expect("valid form");
        app.tick(Duration::from_secs(4));
        assert!(app.dashboard.form.banner().is_some());

        for height in 1..=3 {
            screen(&mut app, 120, height);
        }
        assert!(screen(&mut app, 120, 40).contains("TRANSMISSION COMPLETE"));
    }

    #[test]
    fn leaving_contact_releases_form_focus() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('6'), KeyModifiers::ALT));
        app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(app.focus, Focus::Form(0));

        app.handle_key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::ALT));
        assert_eq!(app.focus, Focus::Panel);
        type_text(&mut app, "hello");
        assert_eq!(app.dashboard.form.field(FieldKind::Name).value, "");

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.dashboard.current_section(), Section::Operations);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn nav_click_releases_form_focus() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('6'), KeyModifiers::ALT));
        app.handle_key(key(KeyCode::Char('i')));
        app.handle_key(key(KeyCode::F(12)));
        type_text(&mut app, "tools");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.dashboard.current_section(), Section::Tools);
        assert_eq!(app.focus, Focus::Command);

        app.handle_key(KeyEvent::new(KeyCode::Char('6'), KeyModifiers::ALT));
        app.handle_key(key(KeyCode::Char('i')));
        screen(&mut app, 120, 40);
        let (rect, _) = app
            .hitboxes
            .iter()
            .find(|(_, hit)| *hit == Hit::Nav(Section::Intel))
            .copied()
            .expect("intel tab drawn");
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x,
            row: rect.y,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.dashboard.current_section(), Section::Intel);
        assert_eq!(app.focus, Focus::Panel);
    }

    #[test]
    fn renders_contact_section_with_submit_button() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('6'), KeyModifiers::ALT));
        let text = screen(&mut app, 120, 40);
        assert!(text.contains("[COPY]"));
        assert!(text.contains(SUBMIT_LABEL));
    }

    #[test]
    fn clicking_a_nav_tab_switches_section() {
        let mut app = app();
        screen(&mut app, 120, 40);
        let (rect, _) = app
            .hitboxes
            .iter()
            .find(|(_, hit)| *hit == Hit::Nav(Section::Tools))
            .copied()
            .expect("tools tab drawn");

        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x + 1,
            row: rect.y,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.dashboard.current_section(), Section::Tools);
    }

    #[test]
    fn matrix_overlay_covers_screen() {
        let mut app = app();
        screen(&mut app, 60, 20);
        app.dashboard.execute("matrix");
        app.tick(Duration::from_millis(35 * 5));
        let text = screen(&mut app, 60, 20);
        assert!(!text.contains("Threat Feed"));
    }

    #[test]
    fn boot_screen_ignores_keys_but_quits() {
        let dashboard = Dashboard::builder(DashboardConfig::default())
            .seed(1)
            .tone(Silent)
            .build();
        let mut app = App::new(dashboard);
        app.handle_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT));
        assert_eq!(app.dashboard.current_section(), Section::Profile);

        app.tick(Duration::from_millis(4500));
        let text = screen(&mut app, 80, 30);
        assert!(text.contains("SECURITY OPERATIONS CENTER"));

        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);
    }
}
