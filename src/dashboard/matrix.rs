//! Matrix rain overlay
//!
//! A full-screen digital-rain easter egg. Each column has a drop that
//! advances one row per frame, leaving a trail of glyphs that fade out.

use super::scheduler::TimerId;
use super::{Dashboard, Task};
use std::time::Duration;
use tracing::info;

const FRAME_INTERVAL: Duration = Duration::from_millis(35);
const MATRIX_DURATION: Duration = Duration::from_secs(10);
/// Chance per frame that a drop past the bottom starts over
const RESET_CHANCE: f64 = 0.025;
/// Frames a glyph stays visible after it is drawn
pub const GLYPH_LIFETIME: u8 = 20;

/// Half-width katakana and digits, one terminal cell each
pub const GLYPHS: &[char] = &[
    'ｱ', 'ｲ', 'ｳ', 'ｴ', 'ｵ', 'ｶ', 'ｷ', 'ｸ', 'ｹ', 'ｺ', 'ｻ', 'ｼ', 'ｽ', 'ｾ', 'ｿ', 'ﾀ',
    'ﾁ', 'ﾂ', 'ﾃ', 'ﾄ', 'ﾅ', 'ﾆ', 'ﾇ', 'ﾈ', 'ﾉ', 'ﾊ', 'ﾋ', 'ﾌ', 'ﾍ', 'ﾎ', 'ﾏ', 'ﾐ',
    'ﾑ', 'ﾒ', 'ﾓ', 'ﾔ', 'ﾕ', 'ﾖ', 'ﾗ', 'ﾘ', 'ﾙ', 'ﾚ', 'ﾛ', 'ﾜ', 'ｦ', 'ﾝ', '0', '1',
    '2', '3', '4', '5', '6', '7', '8', '9',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    /// Frames left before the glyph disappears
    pub life: u8,
}

/// The rain itself: one drop per column over a grid of fading cells
#[derive(Debug, Clone)]
pub struct MatrixRain {
    pub width: u16,
    pub height: u16,
    drops: Vec<u32>,
    cells: Vec<Option<Glyph>>,
    frames: u64,
}

impl MatrixRain {
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            drops: vec![1; usize::from(width)],
            cells: vec![None; usize::from(width) * usize::from(height)],
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Glyph> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    fn fade(&mut self) {
        for cell in &mut self.cells {
            if let Some(glyph) = cell {
                glyph.life = glyph.life.saturating_sub(1);
                if glyph.life == 0 {
                    *cell = None;
                }
            }
        }
    }
}

/// Overlay state plus the timers driving it
#[derive(Debug, Clone, Default)]
pub struct MatrixMode {
    rain: Option<MatrixRain>,
    frame_timer: Option<TimerId>,
    end_timer: Option<TimerId>,
}

impl MatrixMode {
    pub fn is_active(&self) -> bool {
        self.rain.is_some()
    }

    pub fn rain(&self) -> Option<&MatrixRain> {
        self.rain.as_ref()
    }
}

impl Dashboard {
    /// Start the rain over the whole viewport. Triggering it again while it
    /// runs starts a fresh overlay and a fresh ten seconds.
    pub fn activate_matrix_mode(&mut self) {
        self.stop_matrix_timers();
        let (width, height) = self.viewport;
        info!(width, height, "matrix mode engaged");
        self.matrix.rain = Some(MatrixRain::new(width, height));
        self.matrix.frame_timer = Some(self.scheduler.every(FRAME_INTERVAL, Task::MatrixFrame));
        self.matrix.end_timer = Some(self.scheduler.after(MATRIX_DURATION, Task::MatrixEnd));
    }

    pub(super) fn draw_matrix_frame(&mut self) {
        let Some(rain) = self.matrix.rain.as_mut() else {
            return;
        };
        rain.fade();
        let height = u32::from(rain.height);
        let width = usize::from(rain.width);
        for column in 0..width {
            let row = rain.drops[column];
            if row < height {
                let ch = GLYPHS[self.rng.index(GLYPHS.len())];
                rain.cells[row as usize * width + column] = Some(Glyph {
                    ch,
                    life: GLYPH_LIFETIME,
                });
            }
            if row > height && self.rng.chance(RESET_CHANCE) {
                rain.drops[column] = 0;
            }
            rain.drops[column] += 1;
        }
        rain.frames += 1;
    }

    pub(super) fn end_matrix_mode(&mut self) {
        self.stop_matrix_timers();
        if self.matrix.rain.take().is_some() {
            info!("matrix mode ended");
        }
    }

    fn stop_matrix_timers(&mut self) {
        if let Some(timer) = self.matrix.frame_timer.take() {
            self.scheduler.cancel(timer);
        }
        if let Some(timer) = self.matrix.end_timer.take() {
            self.scheduler.cancel(timer);
        }
    }
}
