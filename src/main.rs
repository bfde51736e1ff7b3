mod game;
mod term;
mod snake;

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

// Kept separate from main so the game drops, restoring the terminal through
// its guard, before the process exits on the error path.
fn run() -> Result<(), term::TermError> {
    let mut game = game::SnakeGame::new();
    game.initialize()?;
    game.show_intro()?;
    game.play()
}
