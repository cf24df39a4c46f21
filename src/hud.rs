//! Heads-up display: score, score log, ammunition counter and static labels.

use std::collections::VecDeque;

use crate::config::SCORE_LOG_LEN;
use crate::display::{Style, Surface, C_COUNTER_BG, C_LOG_BG, C_LOG_FG, C_SCORE};
use crate::entities::{GameObject, Lifecycle, TickContext};
use crate::highscores::HighScore;

/// "N commits remain", refreshed every tick from the launcher.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitCounter {
    pub obj: GameObject,
}

impl CommitCounter {
    pub fn new(x: i32, y: i32, remaining: usize) -> Self {
        let mut counter = Self {
            obj: GameObject {
                h: 1,
                ..GameObject::new(x, y)
            }
            .with_style(Style::default().background(C_COUNTER_BG)),
        };
        counter.refresh(remaining);
        counter
    }

    pub fn update(&mut self, ctx: &TickContext) -> Lifecycle {
        self.refresh(ctx.commits_remaining);
        Lifecycle::Alive
    }

    fn refresh(&mut self, remaining: usize) {
        self.obj.sprite = format!("{} commits remain", remaining);
        self.obj.w = self.obj.sprite.chars().count() as i32;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Score {
    pub obj: GameObject,
    score: u64,
}

impl Score {
    pub fn new(x: i32, y: i32) -> Self {
        let mut score = Self {
            obj: GameObject {
                h: 1,
                ..GameObject::new(x, y)
            }
            .with_style(Style::default().foreground(C_SCORE)),
            score: 0,
        };
        score.update();
        score
    }

    pub fn add(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn value(&self) -> u64 {
        self.score
    }

    pub fn update(&mut self) -> Lifecycle {
        self.obj.sprite = format!("SCORE: {}", self.score);
        self.obj.w = self.obj.sprite.chars().count() as i32;
        Lifecycle::Alive
    }

    pub fn draw(&self, surface: &mut dyn Surface, default: Style) {
        self.obj.draw(surface, default);
    }
}

/// The last few scoring messages, oldest on top.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreLog {
    pub obj: GameObject,
    log: VecDeque<String>,
}

impl ScoreLog {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            obj: GameObject::new(x, y)
                .with_style(Style::default().foreground(C_LOG_FG).background(C_LOG_BG)),
            log: VecDeque::with_capacity(SCORE_LOG_LEN + 1),
        }
    }

    pub fn log(&mut self, points: u64, bonus: bool) {
        let msg = if bonus {
            format!("{} points BONUS GET!", points)
        } else {
            format!("{} points!", points)
        };
        self.log.push_back(msg);
        if self.log.len() > SCORE_LOG_LEN {
            self.log.pop_front();
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn update(&mut self) -> Lifecycle {
        let sprite = self.messages().collect::<Vec<_>>().join("\n");
        self.obj.sprite = sprite;
        self.obj.h = self.log.len() as i32;
        self.obj.w = 15;
        Lifecycle::Alive
    }

    pub fn draw(&self, surface: &mut dyn Surface, default: Style) {
        self.obj.draw(surface, default);
    }
}

// ── Static labels ─────────────────────────────────────────────────────────────

pub fn legend(x: i32, y: i32) -> GameObject {
    GameObject::new(x, y).with_sprite("move:  ← →\nspace: fire\nq:     quit")
}

/// High-score board, newest entry first.
pub fn high_score_board(x: i32, y: i32, entries: &[HighScore]) -> GameObject {
    let mut sprite = String::from("~* high scores *~");
    for entry in entries.iter().rev() {
        sprite.push_str(&format!("\n{} {}", entry.name, entry.score));
    }
    GameObject::new(x, y).with_sprite(sprite)
}
