use crate::{Coords, TermInt};
use std::{fmt, io::{Stdout, Write, stdin, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};
use crossterm::tty::IsTty;

#[derive(Debug)]
pub enum TermError {
    NotATerminal,
    Term(crossterm::ErrorKind),
}

impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermError::NotATerminal => write!(f, "standard input is not a terminal"),
            TermError::Term(err) => write!(f, "terminal error: {}", err),
        }
    }
}

impl std::error::Error for TermError {}

impl From<crossterm::ErrorKind> for TermError {
    fn from(err: crossterm::ErrorKind) -> Self {
        TermError::Term(err)
    }
}

impl From<std::io::Error> for TermError {
    fn from(err: std::io::Error) -> Self {
        TermError::Term(crossterm::ErrorKind::IoError(err))
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    active: bool,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { width: 0, height: 0, stdout: stdout(), active: false }
    }

    /// Checks the TTY precondition before touching any terminal state, then
    /// switches to the alternate screen in raw mode and captures the window
    /// size for the session.
    pub fn setup(&mut self) -> Result<(), TermError> {
        if !stdin().is_tty() {
            return Err(TermError::NotATerminal);
        }

        self.active = true;
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;

        let (width, height) = terminal::size()?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Idempotent. Explicit-exit paths call this directly; `Drop` covers
    /// early returns and unwinds, so the terminal is restored exactly once
    /// on every exit path.
    pub fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        // Best effort: a failed teardown step must not skip the rest.
        let _ = terminal::disable_raw_mode();
        let _ = execute!(
            self.stdout,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        );
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn clear(&mut self) -> Result<(), TermError> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    // One bounded read attempt; None means no input arrived this tick.
    pub fn poll_key(&self, timeout: Duration) -> Result<Option<KeyEvent>, TermError> {
        if poll(timeout)? {
            if let Event::Key(ev) = read()? {
                return Ok(Some(ev));
            }
        }
        Ok(None)
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent, TermError> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> Result<(), TermError> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    pub fn print_text(&mut self, pos: Coords, text: &str) -> Result<(), TermError> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(text))?;
        Ok(())
    }

    pub fn draw_borders(&mut self, ch: char) -> Result<(), TermError> {
        let end_x = self.width - 1;
        let end_y = self.height - 1;

        for x in 0..self.width {
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..self.height - 1 {
            self.print_at((0, y), ch)?;
            self.print_at((end_x, y), ch)?;
        }

        self.flush()
    }

    pub fn print_centered(&mut self, lines: &[&str]) -> Result<(), TermError> {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap_or(0) + 4) as TermInt;
        let top_left = (self.width / 2 - msg_width / 2, self.height / 2 - msg_height / 2);

        // Blank first and last rows so the box stands out over the board
        let blank = " ".repeat(msg_width as usize);
        self.print_text((top_left.0, top_left.1), &blank)?;
        self.print_text((top_left.0, top_left.1 + msg_height - 1), &blank)?;

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{: ^width$}", line, width = msg_width as usize);
            self.print_text((top_left.0, top_left.1 + i as TermInt + 1), &padded)?;
        }

        self.flush()
    }

    pub fn flush(&mut self) -> Result<(), TermError> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        self.restore();
    }
}
