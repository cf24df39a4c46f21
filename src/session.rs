//! Session orchestration: building the opening world, turning terminal
//! events into commands and running one tick at a time.
//!
//! Terminal I/O stays in `main.rs`; everything here works on a
//! [`FrameBuffer`] so a whole session can be driven from tests.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::Rng;

use crate::compute::ShotOutcome;
use crate::config::GameConfig;
use crate::display::{self, FrameBuffer, Surface};
use crate::entities::{Entity, IssueSpawner};
use crate::game::{Game, HudPlacement};
use crate::highscores::HighScore;
use crate::hud::{self, CommitCounter};

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Fire,
    Left,
    Right,
    Quit,
    Refresh,
    Resize(u16, u16),
}

/// Map a raw terminal event to a game command.
pub fn command_for(event: &Event) -> Option<Command> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('c') | KeyCode::Char('C') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            KeyCode::Char('l') | KeyCode::Char('L') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Refresh)
            }
            KeyCode::Char(' ') => Some(Command::Fire),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Left => Some(Command::Left),
            KeyCode::Right => Some(Command::Right),
            _ => None,
        },
        Event::Resize(w, h) => Some(Command::Resize(*w, *h)),
        _ => None,
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Screen positions for everything placed at session start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub width: i32,
    /// One `(x, y)` per spawner; even lanes sit on the left edge.
    pub lanes: Vec<(i32, i32)>,
    pub hud: HudPlacement,
    pub counter: (i32, i32),
    pub legend: (i32, i32),
    pub board: (i32, i32),
}

impl Layout {
    pub fn new(width: u16, height: u16, lanes: usize) -> Self {
        let width = width as i32;
        let height = height as i32;

        let lanes: Vec<(i32, i32)> = (0..lanes)
            .map(|i| {
                let x = if i % 2 == 0 { 0 } else { width };
                (x, 2 + 2 * i as i32)
            })
            .collect();
        let lanes_bottom = lanes.last().map(|&(_, y)| y).unwrap_or(2);

        // stays on screen even when the lanes do not fit
        let launcher_y = (lanes_bottom + 4).max(height - 8).min((height - 1).max(0));
        let hud_y = launcher_y + 2;

        Self {
            width,
            lanes,
            hud: HudPlacement {
                launcher: ((width / 2 - 3).max(0), launcher_y),
                score: (1, hud_y + 1),
                score_log: (24, hud_y),
            },
            counter: (1, hud_y),
            legend: (44.min((width - 32).max(0)), hud_y),
            board: (60.min((width - 16).max(0)), hud_y),
        }
    }
}

/// Deal `issues` to `spawners` round-robin: issue `i` goes to spawner `i % n`.
pub fn distribute(issues: Vec<String>, spawners: &mut [IssueSpawner]) {
    if spawners.is_empty() {
        return;
    }
    let n = spawners.len();
    for (i, issue) in issues.into_iter().enumerate() {
        spawners[i % n].add_issue(issue);
    }
}

/// Build the opening world: spawners, HUD and labels.
pub fn build_game(
    layout: &Layout,
    issues: Vec<String>,
    shas: Vec<String>,
    board: &[HighScore],
) -> Game {
    let mut game = Game::new(layout.width, shas, layout.hud);

    let mut spawners: Vec<IssueSpawner> = layout
        .lanes
        .iter()
        .map(|&(x, y)| IssueSpawner::new(x, y))
        .collect();
    distribute(issues, &mut spawners);
    for spawner in spawners {
        game.add_drawable(Entity::Spawner(spawner));
    }

    let (cx, cy) = layout.counter;
    let counter = CommitCounter::new(cx, cy, game.launcher().remaining());
    game.add_drawable(Entity::Counter(counter));

    let (lx, ly) = layout.legend;
    game.add_drawable(Entity::Label(hud::legend(lx, ly)));
    let (bx, by) = layout.board;
    game.add_drawable(Entity::Label(hud::high_score_board(bx, by, board)));

    game
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One play-through. Owns the world and the scheduling RNG.
pub struct Session<R: Rng> {
    pub game: Game,
    repo: String,
    rng: R,
    spawn_chance: f64,
    quit: bool,
    ticks: u64,
}

impl<R: Rng> Session<R> {
    pub fn new(game: Game, repo: &str, config: &GameConfig, rng: R) -> Self {
        Self {
            game,
            repo: repo.to_string(),
            rng,
            spawn_chance: config.spawn_chance.clamp(0.0, 1.0),
            quit: false,
            ticks: 0,
        }
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn is_over(&self) -> bool {
        self.quit
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn score(&self) -> u64 {
        self.game.score().value()
    }

    /// Apply one command. Returns the outcome when a shot was fired.
    pub fn handle(&mut self, command: Command) -> Option<ShotOutcome> {
        match command {
            Command::Fire => return self.game.launch(),
            Command::Left => self.game.move_launcher(-1),
            Command::Right => self.game.move_launcher(1),
            Command::Quit => {
                log::info!("quit after {} ticks with score {}", self.ticks, self.score());
                self.quit = true;
            }
            Command::Resize(w, _) => self.game.resize(w as i32),
            Command::Refresh => {}
        }
        None
    }

    /// Spawn attempt then update pass.
    pub fn tick(&mut self) {
        if self.rng.gen_bool(self.spawn_chance) {
            self.game.spawn(&mut self.rng);
        }
        self.game.update();
        self.ticks += 1;
    }

    /// Clear, draw every entity, then lay the title bar on top.
    pub fn render(&self, frame: &mut FrameBuffer) {
        frame.clear();
        self.game.draw(frame);
        display::draw_title(frame, &format!("mergeconflict: {}", self.repo));
    }
}
