use std::{process::exit, thread::sleep, time::Duration};

use crate::TermInt;
use crate::snake::{Snake, StepResult, Tile, Direction::{*, self}};
use crate::term::{TermError, TermManager};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const TICK_INTERVAL_MS: u64 = 50;
const INPUT_TIMEOUT_MS: u64 = 100;

const WALL_CHAR: char = '#';
const HEAD_CHAR: char = '@';
const BODY_CHAR: char = 'O';

pub struct SnakeGame {
    width: TermInt,
    height: TermInt,
    term: TermManager,
}

impl SnakeGame {
    pub fn new() -> Self {
        SnakeGame { width: 0, height: 0, term: TermManager::new() }
    }

    pub fn initialize(&mut self) -> Result<(), TermError> {
        self.term.setup()?;

        let (w, h) = self.term.get_terminal_size();
        self.width = w;
        self.height = h;
        Ok(())
    }

    pub fn show_intro(&mut self) -> Result<(), TermError> {
        self.term.clear()?;
        self.term.draw_borders(WALL_CHAR)?;
        self.term.print_text((2, 1), concat!("Version ", env!("CARGO_PKG_VERSION")))?;
        self.term.print_centered(&[
            "Welcome to gridsnake!",
            "",
            "Arrow keys steer the snake.",
            "Hitting a wall or your own body ends the game.",
            "Esc quits during play.",
            "",
            "Press Space to start, Q to quit.",
        ])?;

        loop {
            let ev = self.term.read_key_blocking()?;
            match ev.code {
                KeyCode::Char(' ') => return Ok(()),
                KeyCode::Char('q') | KeyCode::Char('Q') => self.clean_exit(),
                _ if is_ctrl_c(&ev) => self.clean_exit(),
                _ => {}
            }
        }
    }

    pub fn play(&mut self) -> Result<(), TermError> {
        self.term.clear()?;

        let mut snake = Snake::new(self.width, self.height);
        let mut direction = snake.direction();
        self.draw_board(&snake)?;

        loop {
            direction = self.read_direction(direction)?;

            if let StepResult::Crashed = snake.step(direction) {
                self.term.print_centered(&["GAME OVER", "", "Press any key to quit"])?;
                self.term.read_key_blocking()?;
                self.clean_exit();
            }

            self.draw_board(&snake)?;
            sleep(Duration::from_millis(TICK_INTERVAL_MS));
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    // The bounded poll is the only suspension point besides the tick sleep.
    fn read_direction(&mut self, current: Direction) -> Result<Direction, TermError> {
        let ev = match self.term.poll_key(Duration::from_millis(INPUT_TIMEOUT_MS))? {
            Some(ev) => ev,
            None => return Ok(current),
        };

        if is_ctrl_c(&ev) {
            self.clean_exit();
        }

        match ev.code {
            KeyCode::Esc => self.clean_exit(),
            code => Ok(steer(current, code)),
        }
    }

    fn draw_board(&mut self, snake: &Snake) -> Result<(), TermError> {
        let board = snake.board();
        let width = self.width as usize;
        let mut line = String::with_capacity(width);

        for y in 0..self.height {
            line.clear();
            for tile in &board[y as usize * width..(y as usize + 1) * width] {
                line.push(match tile {
                    Tile::Empty => ' ',
                    Tile::Wall => WALL_CHAR,
                    Tile::SnakeHead => HEAD_CHAR,
                    Tile::SnakeBody => BODY_CHAR,
                });
            }
            self.term.print_text((0, y), &line)?;
        }

        self.term.flush()
    }

    fn clean_exit(&mut self) -> ! {
        self.term.restore();
        exit(0);
    }
}

fn steer(current: Direction, code: KeyCode) -> Direction {
    match code {
        KeyCode::Up => turn(current, Up),
        KeyCode::Down => turn(current, Down),
        KeyCode::Left => turn(current, Left),
        KeyCode::Right => turn(current, Right),
        _ => current,
    }
}

// A reversal would drive the head straight into its own neck.
fn turn(current: Direction, requested: Direction) -> Direction {
    match (requested, current) {
        (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right) => current,
        _ => requested,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversals_are_rejected() {
        assert_eq!(turn(Up, Down), Up);
        assert_eq!(turn(Down, Up), Down);
        assert_eq!(turn(Left, Right), Left);
        assert_eq!(turn(Right, Left), Right);
    }

    #[test]
    fn orthogonal_turns_are_accepted() {
        assert_eq!(turn(Up, Left), Left);
        assert_eq!(turn(Left, Down), Down);
        assert_eq!(turn(Down, Right), Right);
        assert_eq!(turn(Right, Up), Up);
    }

    #[test]
    fn arrow_keys_steer() {
        assert_eq!(steer(Left, KeyCode::Up), Up);
        assert_eq!(steer(Up, KeyCode::Left), Left);
        assert_eq!(steer(Down, KeyCode::Right), Right);
    }

    #[test]
    fn reversal_via_arrow_key_is_ignored() {
        assert_eq!(steer(Up, KeyCode::Down), Up);
        assert_eq!(steer(Left, KeyCode::Right), Left);
    }

    #[test]
    fn unrecognized_keys_keep_the_current_direction() {
        assert_eq!(steer(Up, KeyCode::Char('x')), Up);
        assert_eq!(steer(Left, KeyCode::Enter), Left);
        assert_eq!(steer(Down, KeyCode::F(1)), Down);
        assert_eq!(steer(Right, KeyCode::Tab), Right);
    }

    #[test]
    fn ctrl_c_is_detected() {
        let ev = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert!(is_ctrl_c(&ev));

        let plain = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::empty() };
        assert!(!is_ctrl_c(&plain));
    }
}
