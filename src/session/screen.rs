//! Raw-mode terminal rendering for the listening session
//!
//! The screen is redrawn in full on every state change. Output goes
//! through crossterm commands so it behaves under raw mode.

use crate::catalog::{Mood, MOODS};
use crate::player::PlayerState;
use crate::timer::format_remaining;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use std::io::{self, Write};
use std::time::Duration;

/// Everything the screen needs to draw one frame
pub struct Frame<'a> {
    pub mood: &'a Mood,
    pub player: &'a PlayerState,
    pub ready: bool,
    pub track_title: Option<&'a str>,
    pub audio_only: bool,
    pub timer_remaining: Option<Duration>,
    pub timer_minutes: u32,
    pub status_line: Option<&'a str>,
    pub show_help: bool,
}

pub struct Screen {
    out: io::Stdout,
}

impl Screen {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }

    pub fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            Clear(ClearType::All),
            cursor::Hide
        )?;

        self.draw_header(frame)?;
        if frame.show_help {
            self.draw_help()?;
        } else {
            self.draw_status(frame)?;
        }
        self.draw_footer(frame)?;

        self.out.flush()
    }

    fn draw_header(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(Color::Magenta),
            SetAttribute(Attribute::Bold),
            Print("♪ Study Vibes Radio"),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print("\r\n\r\n")
        )?;

        // Mood selector with the active mood highlighted
        for (i, mood) in MOODS.iter().enumerate() {
            let active = mood.key == frame.mood.key;
            let label = format!("[{}] {} {}", i + 1, mood.icon, mood.name);
            if active {
                queue!(
                    self.out,
                    SetForegroundColor(accent_color(mood.terminal_color)),
                    SetAttribute(Attribute::Bold),
                    Print(&label),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?;
            } else {
                queue!(
                    self.out,
                    SetForegroundColor(Color::DarkGrey),
                    Print(&label),
                    ResetColor
                )?;
            }
            queue!(self.out, Print("  "))?;
        }
        queue!(self.out, Print("\r\n\r\n"))?;
        Ok(())
    }

    fn draw_status(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let state = if !frame.ready {
            "tuning in..."
        } else if frame.player.playing {
            "▶ playing"
        } else {
            "⏸ paused"
        };

        let volume = if frame.player.is_effectively_muted() {
            "vol muted".to_string()
        } else {
            format!("vol {}", frame.player.volume)
        };

        let mut line = format!("  {}  {}", state, volume);
        if frame.audio_only {
            line.push_str("  audio-only");
        }
        queue!(self.out, Print(&line), Print("\r\n"))?;

        if let Some(title) = frame.track_title {
            queue!(
                self.out,
                SetForegroundColor(Color::DarkGrey),
                Print(format!("  now: {}\r\n", title)),
                ResetColor
            )?;
        }

        match frame.timer_remaining {
            Some(remaining) => queue!(
                self.out,
                Print(format!("  sleep in {}\r\n", format_remaining(remaining)))
            )?,
            None if frame.timer_minutes > 0 => queue!(
                self.out,
                Print(format!("  sleep timer {} min\r\n", frame.timer_minutes))
            )?,
            None => {}
        }

        if let Some(status) = frame.status_line {
            queue!(
                self.out,
                SetForegroundColor(Color::Yellow),
                Print(format!("  {}\r\n", status)),
                ResetColor
            )?;
        }

        Ok(())
    }

    fn draw_help(&mut self) -> io::Result<()> {
        let rows = [
            ("1-5", "switch mood"),
            ("space", "play / pause"),
            ("← / →", "previous / next track"),
            ("+ / -", "volume up / down"),
            ("m", "mute"),
            ("a", "audio-only mode"),
            ("t", "sleep timer (off/15/30/45/60)"),
            ("?", "toggle this help"),
            ("q", "quit"),
        ];
        for (key, action) in rows {
            queue!(
                self.out,
                SetForegroundColor(Color::Magenta),
                Print(format!("  {:<8}", key)),
                ResetColor,
                Print(format!("{}\r\n", action))
            )?;
        }
        Ok(())
    }

    fn draw_footer(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let hint = if frame.show_help {
            "esc to close help"
        } else {
            "? for help · q to quit"
        };
        queue!(
            self.out,
            Print("\r\n"),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("  {}\r\n", hint)),
            ResetColor
        )?;
        Ok(())
    }

    /// Restore the cursor before leaving raw mode
    pub fn restore(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Show, ResetColor)?;
        self.out.flush()
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Map catalog accent colors onto crossterm's palette
fn accent_color(color: console::Color) -> Color {
    match color {
        console::Color::Blue => Color::Blue,
        console::Color::Magenta => Color::Magenta,
        console::Color::Red => Color::Red,
        console::Color::Green => Color::Green,
        console::Color::Yellow => Color::Yellow,
        console::Color::Cyan => Color::Cyan,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_colors_cover_catalog() {
        for mood in MOODS {
            assert_ne!(accent_color(mood.terminal_color), Color::White);
        }
    }
}

