use crate::{Coords, TermInt};
use Cell::*;
use Direction::*;
use StepResult::*;

const INITIAL_LENGTH: TermInt = 4;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn step_from(self, (x, y): Coords) -> Coords {
        match self {
            Up => (x, y - 1),
            Down => (x, y + 1),
            Left => (x - 1, y),
            Right => (x + 1, y),
        }
    }
}

/// One cell of the body-encoding grid. A `Segment` stores the direction the
/// head was moving when it left the cell, so every body cell points one step
/// closer to the head and the chain needs no segment list to walk it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Cell {
    Empty,
    Head,
    Segment(Direction),
    TailPending(Direction),
}

/// What the renderer sees. Rebuilt from the cell grid every tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Wall,
    SnakeHead,
    SnakeBody,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StepResult {
    Moved,
    Crashed,
}

pub struct Snake {
    width: TermInt,
    height: TermInt,
    cells: Vec<Cell>,
    board: Vec<Tile>,
    head: Coords,
    direction: Direction,
    alive: bool,
}

impl Snake {
    /// Places the snake horizontally centered, head in the middle of the
    /// grid and the body trailing to the right, mirroring the initial
    /// leftward motion so the first ticks are stable.
    pub fn new(width: TermInt, height: TermInt) -> Self {
        let size = width as usize * height as usize;
        let mut snake = Snake {
            width,
            height,
            cells: vec![Empty; size],
            board: vec![Tile::Empty; size],
            head: (width / 2, height / 2),
            direction: Left,
            alive: true,
        };

        let (hx, hy) = snake.head;
        let head_idx = snake.index((hx, hy));
        snake.cells[head_idx] = Head;
        for i in 1..INITIAL_LENGTH - 1 {
            let idx = snake.index((hx + i, hy));
            snake.cells[idx] = Segment(Left);
        }
        let tail_idx = snake.index((hx + INITIAL_LENGTH - 1, hy));
        snake.cells[tail_idx] = TailPending(Left);

        for y in 0..height {
            for x in 0..width {
                let i = snake.index((x, y));
                snake.board[i] = snake.project((x, y), snake.cells[i]);
            }
        }

        snake
    }

    /// Advances the snake one cell. The vacated head cell records the travel
    /// direction, the head marker moves, and unless the move crashed, a
    /// single sweep over the grid drops the old tail, promotes the next
    /// segment to tail, and rebuilds the board projection.
    pub fn step(&mut self, direction: Direction) -> StepResult {
        if !self.alive {
            return Crashed;
        }

        self.direction = direction;
        let old_head = self.head;
        let old_idx = self.index(old_head);
        self.cells[old_idx] = Segment(direction);

        let new_head = direction.step_from(old_head);
        let new_idx = self.index(new_head);
        let target = self.cells[new_idx];
        self.cells[new_idx] = Head;
        self.head = new_head;

        // The tail cell being vacated this tick still counts as body.
        if self.on_border(new_head) || matches!(target, Segment(_) | TailPending(_)) {
            self.alive = false;
            return Crashed;
        }

        let mut tail_dropped = false;
        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.index((x, y));
                match self.cells[i] {
                    // Only the first pending tail is the real one; the cell
                    // promoted below must survive until the next tick, even
                    // when it lies later in the sweep order.
                    TailPending(d) if !tail_dropped => {
                        tail_dropped = true;
                        self.cells[i] = Empty;
                        self.board[i] = self.project((x, y), Empty);

                        let j = self.index(d.step_from((x, y)));
                        if let Segment(toward_head) = self.cells[j] {
                            self.cells[j] = TailPending(toward_head);
                        }
                    }
                    cell => self.board[i] = self.project((x, y), cell),
                }
            }
        }

        Moved
    }

    pub fn board(&self) -> &[Tile] {
        &self.board
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, (x, y): Coords) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn on_border(&self, (x, y): Coords) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    fn project(&self, pos: Coords, cell: Cell) -> Tile {
        if self.on_border(pos) {
            Tile::Wall
        } else {
            match cell {
                Empty => Tile::Empty,
                Head => Tile::SnakeHead,
                Segment(_) | TailPending(_) => Tile::SnakeBody,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // (heads, segments, pending tails) over the whole grid
    fn counts(snake: &Snake) -> (usize, usize, usize) {
        let mut heads = 0;
        let mut segments = 0;
        let mut tails = 0;

        for cell in &snake.cells {
            match cell {
                Head => heads += 1,
                Segment(_) => segments += 1,
                TailPending(_) => tails += 1,
                Empty => {}
            }
        }

        (heads, segments, tails)
    }

    #[test]
    fn initial_snake_is_four_cells_facing_left() {
        let snake = Snake::new(10, 10);

        assert_eq!(snake.head, (5, 5));
        assert_eq!(snake.direction, Left);
        assert_eq!(counts(&snake), (1, 2, 1));
        assert_eq!(snake.cells[snake.index((6, 5))], Segment(Left));
        assert_eq!(snake.cells[snake.index((7, 5))], Segment(Left));
        assert_eq!(snake.cells[snake.index((8, 5))], TailPending(Left));
    }

    #[test]
    fn head_moves_one_column_per_step() {
        let mut snake = Snake::new(10, 10);

        for expected_x in (1..=4).rev() {
            assert_eq!(snake.step(Left), Moved);
            assert_eq!(snake.head, (expected_x, 5));
        }
    }

    #[test]
    fn fifth_step_left_lands_on_the_wall() {
        let mut snake = Snake::new(10, 10);

        for _ in 0..4 {
            assert_eq!(snake.step(Left), Moved);
        }
        assert_eq!(snake.step(Left), Crashed);
        assert!(!snake.alive);
        assert_eq!(snake.head, (0, 5));
    }

    #[test]
    fn top_wall_crashes_on_the_exact_landing_step() {
        let mut snake = Snake::new(10, 10);

        for _ in 0..4 {
            assert_eq!(snake.step(Up), Moved);
        }
        assert_eq!(snake.head, (5, 1));
        assert_eq!(snake.step(Up), Crashed);
    }

    #[test]
    fn running_into_the_body_crashes() {
        let mut snake = Snake::new(10, 10);

        // (6, 5) still holds the neck segment
        assert_eq!(snake.step(Right), Crashed);
        assert!(!snake.alive);
    }

    #[test]
    fn entering_the_vacating_tail_cell_crashes() {
        let mut snake = Snake::new(10, 10);

        assert_eq!(snake.step(Up), Moved);
        assert_eq!(snake.step(Right), Moved);
        // closes a 2x2 loop onto the cell the tail is about to leave
        assert_eq!(snake.step(Down), Crashed);
    }

    #[test]
    fn length_is_preserved_while_moving() {
        // There is no food mechanic: nothing ever spawns on the board, so
        // the body cannot grow. One cell leaves at the tail and one enters
        // at the head every tick.
        let mut snake = Snake::new(30, 30);
        let walk = [Left, Left, Up, Up, Right, Right, Right, Down, Left, Down];

        for &dir in &walk {
            assert_eq!(snake.step(dir), Moved);
            assert_eq!(counts(&snake), (1, 2, 1));
        }
    }

    #[test]
    fn tail_sweep_never_cascades() {
        // Downward and rightward chains put the promoted tail cell later in
        // the sweep order; it must not be removed again in the same tick.
        let mut snake = Snake::new(30, 30);
        let walk = [Down, Down, Down, Down, Right, Right, Right, Right];

        for &dir in &walk {
            assert_eq!(snake.step(dir), Moved);
            assert_eq!(counts(&snake), (1, 2, 1));
        }
    }

    #[test]
    fn board_projection_marks_walls_head_and_body() {
        let snake = Snake::new(10, 10);
        let board = snake.board();

        assert_eq!(board[0], Tile::Wall);
        assert_eq!(board[5 * 10], Tile::Wall);
        assert_eq!(board[9 * 10 + 9], Tile::Wall);
        assert_eq!(board[5 * 10 + 5], Tile::SnakeHead);
        assert_eq!(board[5 * 10 + 6], Tile::SnakeBody);
        assert_eq!(board[5 * 10 + 8], Tile::SnakeBody);
        assert_eq!(board[5 * 10 + 4], Tile::Empty);
    }

    #[test]
    fn board_tracks_the_snake_after_a_step() {
        let mut snake = Snake::new(10, 10);
        snake.step(Left);
        let board = snake.board();

        assert_eq!(board[5 * 10 + 4], Tile::SnakeHead);
        assert_eq!(board[5 * 10 + 5], Tile::SnakeBody);
        assert_eq!(board[5 * 10 + 8], Tile::Empty);
    }

    #[test]
    fn stepping_after_a_crash_changes_nothing() {
        let mut snake = Snake::new(10, 10);

        for _ in 0..5 {
            snake.step(Left);
        }
        assert!(!snake.alive);
        assert_eq!(snake.step(Down), Crashed);
        assert_eq!(snake.head, (0, 5));
    }
}
