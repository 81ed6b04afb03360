//! Fixed geometry of the 800x800 rating graphic.
//!
//! Every block is positioned absolutely; only the tracklist row height
//! depends on the data. Text is never wrapped or measured, so long track
//! names simply run past the right edge of their row.

use imageproc::rect::Rect;

pub const CANVAS_SIZE: u32 = 800;
pub const BORDER_WIDTH: u32 = 3;

pub const TRACKLIST_TOP: i32 = 175;
pub const TRACKLIST_HEIGHT: u32 = 600;
pub const MIN_ROW_HEIGHT: u32 = 20;
pub const MAX_ROW_HEIGHT: u32 = 60;
pub const ROW_GAP: u32 = 5;

pub const LEGEND_TOP: i32 = 310;
pub const LEGEND_STEP: i32 = 40;
pub const LEGEND_SWATCH_HEIGHT: u32 = 30;

pub const COVER_THUMB_SIZE: u32 = 200;

/// An axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Block {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from top-left and bottom-right corners.
    pub const fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32)
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.x, self.y).of_size(self.width.max(1), self.height.max(1))
    }

    /// The same block shrunk by `by` pixels on every side.
    pub fn inset(&self, by: u32) -> Self {
        Self::new(
            self.x + by as i32,
            self.y + by as i32,
            self.width.saturating_sub(2 * by),
            self.height.saturating_sub(2 * by),
        )
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

pub const ARTIST_BLOCK: Block = Block::from_corners(30, 30, 530, 120);
pub const ALBUM_BLOCK: Block = Block::from_corners(30, 125, 530, 165);
pub const COVER_BLOCK: Block = Block::new(550, 40, COVER_THUMB_SIZE, COVER_THUMB_SIZE);
pub const RATING_BLOCK: Block = Block::from_corners(550, 250, 750, 300);

pub const ARTIST_TEXT: (i32, i32) = (40, 40);
pub const ALBUM_TEXT: (i32, i32) = (40, 130);
pub const RATING_TEXT: (i32, i32) = (560, 260);

pub const TRACK_TEXT_X: i32 = 40;
pub const TRACK_BADGE_X: i32 = 400;
pub const LEGEND_TEXT_X: i32 = 560;

const TRACK_LEFT: i32 = 30;
const TRACK_WIDTH: u32 = 500;
const LEGEND_LEFT: i32 = 550;
const LEGEND_WIDTH: u32 = 200;

/// Height of one tracklist row: the available space split evenly, clamped so
/// short lists don't balloon and long lists stay legible.
pub fn row_height(track_count: usize) -> u32 {
    let count = u32::try_from(track_count.max(1)).unwrap_or(u32::MAX);
    (TRACKLIST_HEIGHT / count).clamp(MIN_ROW_HEIGHT, MAX_ROW_HEIGHT)
}

/// Filled block for each of `track_count` rows, top to bottom.
pub fn track_rows(track_count: usize) -> Vec<Block> {
    let height = row_height(track_count);

    (0..track_count)
        .map(|i| {
            let y = TRACKLIST_TOP + (i as u32 * height) as i32;
            Block::new(TRACK_LEFT, y, TRACK_WIDTH, height - ROW_GAP)
        })
        .collect()
}

/// Legend swatch for the `index`-th category.
pub fn legend_row(index: usize) -> Block {
    Block::new(
        LEGEND_LEFT,
        LEGEND_TOP + index as i32 * LEGEND_STEP,
        LEGEND_WIDTH,
        LEGEND_SWATCH_HEIGHT,
    )
}
