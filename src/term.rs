use crate::{TermInt, Coords};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph { ch: ' ', color: Color::Reset };

    pub fn new(ch: char, color: Color) -> Self {
        Glyph { ch, color }
    }
}

/// Off-screen frame. Built from scratch every frame, then handed to
/// [`TermManager::present`], which only writes what changed.
pub struct Canvas {
    width: TermInt,
    height: TermInt,
    cells: Vec<Glyph>,
}

impl Canvas {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        Canvas { width, height, cells: vec![Glyph::BLANK; width as usize * height as usize] }
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn get(&self, pos: Coords) -> Glyph {
        self.cells[self.width as usize * pos.1 as usize + pos.0 as usize]
    }

    /// Out-of-range positions are silently dropped.
    pub fn put(&mut self, pos: Coords, glyph: Glyph) {
        if pos.0 < self.width && pos.1 < self.height {
            self.cells[self.width as usize * pos.1 as usize + pos.0 as usize] = glyph;
        }
    }

    pub fn text(&mut self, pos: Coords, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put((pos.0 + i as TermInt, pos.1), Glyph::new(ch, color));
        }
    }

    pub fn draw_borders(&mut self, top_left: Coords, size: Coords, color: Color) {
        let (width, height) = size;
        let end_x = top_left.0 + width - 1;
        let end_y = top_left.1 + height - 1;

        for x in top_left.0..=end_x {
            let ch = if x == top_left.0 || x == end_x {'+'} else {'-'};
            self.put((x, top_left.1), Glyph::new(ch, color));
            self.put((x, end_y), Glyph::new(ch, color));
        }

        for y in top_left.1 + 1..end_y {
            self.put((top_left.0, y), Glyph::new('|', color));
            self.put((end_x, y), Glyph::new('|', color));
        }
    }

    /// Centered box with one padding row above and below the lines.
    pub fn draw_message(&mut self, lines: &[(&str, Color)]) {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|(x, _)| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.put((top_left.0 + x_diff, y), Glyph::BLANK);
            }
        }

        for (i, (line, color)) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.put((top_left.0 + x_diff as TermInt, y), Glyph::new(ch, *color));
            }
        }
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    /// What is currently on screen
    screen: Vec<Glyph>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let stdout = stdout();
        let screen = vec![Glyph::BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Error hiding cursor")?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error unsetting raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)
            .context("Error showing cursor")?;
        execute!(self.stdout, LeaveAlternateScreen).context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Writes every glyph that differs from what is on screen, then flushes.
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        let (width, height) = canvas.size();
        let mut color = None;

        for y in 0..height.min(self.height) {
            for x in 0..width.min(self.width) {
                let glyph = canvas.get((x, y));
                let index = self.width as usize * y as usize + x as usize;
                if self.screen[index] == glyph {
                    continue;
                }

                if color != Some(glyph.color) {
                    queue!(self.stdout, style::SetForegroundColor(glyph.color))?;
                    color = Some(glyph.color);
                }
                queue!(self.stdout, cursor::MoveTo(x, y), style::Print(glyph.ch))?;
                self.screen[index] = glyph;
            }
        }

        self.flush()
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![Glyph::BLANK; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_ignores_positions_off_the_canvas() {
        let mut canvas = Canvas::new(4, 3);
        canvas.put((4, 0), Glyph::new('x', Color::Red));
        canvas.put((0, 3), Glyph::new('x', Color::Red));
        assert!(canvas.cells.iter().all(|g| *g == Glyph::BLANK));
    }

    #[test]
    fn text_is_clipped_at_the_edge() {
        let mut canvas = Canvas::new(5, 1);
        canvas.text((2, 0), "abcd", Color::White);
        assert_eq!(canvas.get((2, 0)).ch, 'a');
        assert_eq!(canvas.get((4, 0)).ch, 'c');
    }

    #[test]
    fn borders_frame_the_area() {
        let mut canvas = Canvas::new(6, 4);
        canvas.draw_borders((1, 0), (4, 3), Color::Grey);
        assert_eq!(canvas.get((1, 0)).ch, '+');
        assert_eq!(canvas.get((2, 0)).ch, '-');
        assert_eq!(canvas.get((4, 2)).ch, '+');
        assert_eq!(canvas.get((1, 1)).ch, '|');
        assert_eq!(canvas.get((2, 1)), Glyph::BLANK);
        assert_eq!(canvas.get((5, 1)), Glyph::BLANK);
    }

    #[test]
    fn message_is_centered() {
        let mut canvas = Canvas::new(20, 9);
        canvas.draw_message(&[("GAME OVER", Color::Red)]);
        // Box is 11 wide and 3 tall around (10, 4)
        assert_eq!(canvas.get((5, 4)), Glyph::new(' ', Color::Red));
        assert_eq!(canvas.get((6, 4)), Glyph::new('G', Color::Red));
        assert_eq!(canvas.get((14, 4)), Glyph::new('R', Color::Red));
    }
}
