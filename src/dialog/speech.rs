//! The single active spoken line
//!
//! Only one line can be on screen at a time. A line occupies the speech slot
//! until its countdown reaches zero; the countdown includes the fade-in and
//! fade-out time of the dialogue box when animation is enabled.

/// Currently spoken line
#[derive(Debug, Clone, Default)]
pub struct Speech {
    /// Display text
    text: String,
    /// Nominal duration of the message
    msg_time: u64,
    /// Total display duration (nominal plus animation)
    total: u64,
    /// Remaining display time
    time: u64,
    /// Whether the player is speaking
    is_player: bool,
    /// Incremented on every accepted line
    serial: u64,
}

impl Speech {
    /// Create an empty speech slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupy the slot with a new line
    ///
    /// `extra` is the animation reserve added on top of the nominal duration.
    pub fn start(&mut self, text: String, msg_time: u64, extra: u64, is_player: bool) {
        self.text = text;
        self.msg_time = msg_time;
        self.total = msg_time.saturating_add(extra);
        self.time = self.total;
        self.is_player = is_player;
        self.serial = self.serial.wrapping_add(1);
    }

    /// Advance the countdown
    ///
    /// Returns true when the slot is empty after this tick, i.e. the line has
    /// finished (or there was none).
    pub fn advance(&mut self, dt: u64) -> bool {
        if self.time <= dt {
            self.time = 0;
            true
        } else {
            self.time -= dt;
            false
        }
    }

    /// Cut the line short, leaving one time unit so the next tick finishes it
    pub fn skip(&mut self) {
        if self.time > 0 {
            self.time = 1;
        }
    }

    /// Empty the slot
    pub fn clear(&mut self) {
        self.time = 0;
    }

    pub fn is_active(&self) -> bool {
        self.time > 0
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn msg_time(&self) -> u64 {
        self.msg_time
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn remaining(&self) -> u64 {
        self.time
    }

    pub fn is_player(&self) -> bool {
        self.is_player
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Box scale and text visibility for the presentation layer
    ///
    /// `anim` is the animation time in effect (0 when animation is off).
    pub fn view(&self, anim: u64) -> SpeechView {
        let time = self.time;
        let text_end = self.msg_time.saturating_add(anim);
        let mut scale = 1.0;
        if anim > 0 {
            if time > text_end {
                scale = 1.0 - (time - text_end) as f32 / anim as f32;
            } else if time < anim {
                scale = time as f32 / anim as f32;
            }
        }
        SpeechView {
            scale: scale.clamp(0.0, 1.0),
            text_visible: time > anim && time < text_end,
        }
    }
}

/// Presentation state of the speech box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechView {
    /// Size of the box relative to its full size
    pub scale: f32,
    /// Whether the text is drawn (false while the box is fading)
    pub text_visible: bool,
}
