//! Positioned print-screen overlays
//!
//! Ad-hoc text placed anywhere on screen for a number of seconds. Unlike the
//! print ring every overlay keeps its own timer.

use super::types::PRINT_SCREEN_GRACE;

/// Position of an overlay along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPos {
    /// Centered on the screen
    Centered,
    /// Percentage of the screen size
    Percent(i32),
}

impl OverlayPos {
    /// Scripts pass a negative coordinate to request centering
    pub fn from_coord(value: i32) -> Self {
        if value < 0 {
            OverlayPos::Centered
        } else {
            OverlayPos::Percent(value)
        }
    }
}

/// A print-screen request as issued by an actor's AI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintScreenRequest {
    pub text: String,
    pub font: String,
    pub x: i32,
    pub y: i32,
    /// Display time in seconds
    pub seconds: i32,
}

impl PrintScreenRequest {
    /// Centered overlay
    pub fn centered(text: &str, font: &str, seconds: i32) -> Self {
        Self {
            text: text.to_string(),
            font: font.to_string(),
            x: -1,
            y: -1,
            seconds,
        }
    }
}

/// A queued overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOverlay {
    pub text: String,
    pub font: String,
    pub x: OverlayPos,
    pub y: OverlayPos,
    /// Remaining display time
    pub time: u64,
}

/// Overlays, newest first
#[derive(Debug, Default)]
pub struct PrintScreenQueue {
    items: Vec<PrintOverlay>,
}

impl PrintScreenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an overlay in front of the others
    pub fn push(&mut self, request: &PrintScreenRequest) {
        let seconds = request.seconds.max(0) as u64;
        self.items.insert(
            0,
            PrintOverlay {
                text: request.text.clone(),
                font: request.font.clone(),
                x: OverlayPos::from_coord(request.x),
                y: OverlayPos::from_coord(request.y),
                time: seconds * 1000 + PRINT_SCREEN_GRACE,
            },
        );
    }

    /// Age every overlay, dropping those that run out during this tick
    pub fn tick(&mut self, dt: u64) {
        self.items.retain_mut(|item| {
            if item.time < dt {
                false
            } else {
                item.time -= dt;
                true
            }
        });
    }

    pub fn items(&self) -> &[PrintOverlay] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
