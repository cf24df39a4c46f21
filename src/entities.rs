//! Entities that move and fight on the playfield.
//!
//! Every entity embeds a [`GameObject`] for its position, size and sprite,
//! and is stored by the world as one variant of [`Entity`].

use std::collections::VecDeque;

use crate::config::{
    BARREL_OFFSET, BURST_LIFE, FIRE_COOLDOWN, OFFSCREEN_MARGIN, SHOT_LIFE, SPAWN_COOLOFF,
};
use crate::display::{self, Style, Surface, C_BIG_BURST, C_BURST, C_ISSUE, C_LAUNCHER, RAINBOW};
use crate::geometry::Ray;
use crate::hud::CommitCounter;

// ── Base object ───────────────────────────────────────────────────────────────

/// Shared position/size/sprite state.
///
/// `w` and `h` are used for bounds checks and are not always kept in step
/// with the sprite text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameObject {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub sprite: String,
    /// Drawn over the world's style; unset colours come from the world.
    pub style: Option<Style>,
}

impl GameObject {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = sprite.into();
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn transform(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn draw(&self, surface: &mut dyn Surface, default: Style) {
        let style = match self.style {
            Some(over) => default.patch(over),
            None => default,
        };
        for (i, line) in self.sprite.split('\n').enumerate() {
            display::draw_str(surface, self.x, self.y + i as i32, style, line);
        }
    }
}

/// What an entity wants after its update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Expired,
}

/// World facts an entity may read while updating.
#[derive(Clone, Copy, Debug)]
pub struct TickContext {
    pub max_width: i32,
    pub commits_remaining: usize,
}

// ── Issues ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn step(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// One open issue's title drifting across the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Issue {
    pub obj: GameObject,
    pub dir: Direction,
}

impl Issue {
    pub fn new(x: i32, y: i32, dir: Direction, text: &str) -> Self {
        let obj = GameObject {
            w: text.chars().count() as i32,
            h: 1,
            ..GameObject::new(x, y)
        }
        .with_sprite(text)
        .with_style(Style::default().foreground(C_ISSUE));
        Self { obj, dir }
    }

    pub fn update(&mut self, ctx: &TickContext) -> Lifecycle {
        self.obj.transform(self.dir.step(), 0);
        let gone = match self.dir {
            Direction::Right => self.obj.x > OFFSCREEN_MARGIN + ctx.max_width,
            Direction::Left => self.obj.x < -OFFSCREEN_MARGIN - self.obj.w,
        };
        if gone {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }

    /// Whether column `x` falls inside `[x, x + w)`.
    pub fn spans(&self, x: i32) -> bool {
        x >= self.obj.x && x < self.obj.x + self.obj.w
    }

    pub fn letter_at(&self, offset: i32) -> Option<char> {
        usize::try_from(offset)
            .ok()
            .and_then(|i| self.obj.sprite.chars().nth(i))
    }

    /// Blank the letter at `offset`. Blanked letters never come back.
    pub fn destroy_letter_at(&mut self, offset: i32) {
        let Ok(target) = usize::try_from(offset) else {
            return;
        };
        self.obj.sprite = self
            .obj
            .sprite
            .chars()
            .enumerate()
            .map(|(i, c)| if i == target { ' ' } else { c })
            .collect();
    }

    pub fn text(&self) -> &str {
        &self.obj.sprite
    }
}

/// Edge-fixed source of issues. Emits one queued title at a time and then
/// rests for the title's length plus a short cool-off.
#[derive(Clone, Debug, PartialEq)]
pub struct IssueSpawner {
    pub obj: GameObject,
    queue: VecDeque<String>,
    countdown: usize,
}

impl IssueSpawner {
    /// A spawner at `x == 0` launches rightward; any other `x` is the right
    /// edge and launches leftward.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            obj: GameObject::new(x, y),
            queue: VecDeque::new(),
            countdown: 0,
        }
    }

    pub fn add_issue(&mut self, text: impl Into<String>) {
        self.queue.push_back(text.into());
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn countdown(&self) -> usize {
        self.countdown
    }

    pub fn is_left_edge(&self) -> bool {
        self.obj.x == 0
    }

    pub fn update(&mut self) -> Lifecycle {
        self.countdown = self.countdown.saturating_sub(1);
        Lifecycle::Alive
    }

    pub fn spawn(&mut self) -> Option<Issue> {
        if self.countdown > 0 {
            return None;
        }
        let text = self.queue.pop_front()?;
        let len = text.chars().count();
        self.countdown = len + SPAWN_COOLOFF;

        let (x, dir) = if self.is_left_edge() {
            (1 - len as i32, Direction::Right)
        } else {
            (self.obj.x, Direction::Left)
        };
        log::debug!("spawning {:?} at <{}, {}> heading {:?}", text, x, self.obj.y, dir);
        Some(Issue::new(x, self.obj.y, dir, &text))
    }
}

// ── Effects ───────────────────────────────────────────────────────────────────

const BURST_SPRITE: &str = "\\ /\n\n/ \\";

const BIG_BURST_SPRITE: &str = "*     *
    \\   /
*)___\\ /___(*
     / \\
    /   \\
   *     *";

/// Explosion left behind by a hit. The big variant marks an exact letter match.
#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    pub obj: GameObject,
    pub life: u32,
    pub big: bool,
}

impl Burst {
    pub fn new(x: i32, y: i32) -> Self {
        let obj = GameObject {
            w: 3,
            h: 3,
            ..GameObject::new(x - 1, y - 1)
        }
        .with_sprite(BURST_SPRITE)
        .with_style(Style::default().foreground(C_BURST));
        Self {
            obj,
            life: BURST_LIFE,
            big: false,
        }
    }

    pub fn big(x: i32, y: i32) -> Self {
        let obj = GameObject {
            w: 13,
            h: 6,
            ..GameObject::new(x - 6, y - 3)
        }
        .with_sprite(BIG_BURST_SPRITE)
        .with_style(Style::default().foreground(C_BIG_BURST));
        Self {
            obj,
            life: BURST_LIFE,
            big: true,
        }
    }

    pub fn update(&mut self) -> Lifecycle {
        if self.life == 0 {
            return Lifecycle::Expired;
        }
        self.life -= 1;
        Lifecycle::Alive
    }
}

// ── Commits ───────────────────────────────────────────────────────────────────

/// A fired commit: the SHA stands vertically above the launcher, last
/// character on top.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitShot {
    pub obj: GameObject,
    pub life: u32,
    sha: String,
}

impl CommitShot {
    pub fn new(x: i32, y: i32, sha: &str) -> Self {
        let sprite: String = sha.chars().rev().flat_map(|c| [c, '\n']).collect();
        let obj = GameObject {
            w: 1,
            h: sha.chars().count() as i32,
            ..GameObject::new(x, y)
        }
        .with_sprite(sprite);
        Self {
            obj,
            life: SHOT_LIFE,
            sha: sha.to_string(),
        }
    }

    pub fn sha(&self) -> &str {
        &self.sha
    }

    /// Character at `row` counted upward from the bottom of the shot.
    pub fn letter_at(&self, row: i32) -> Option<char> {
        usize::try_from(row)
            .ok()
            .and_then(|i| self.sha.chars().nth(i))
    }

    /// The column of cells the shot occupies, top to bottom.
    pub fn ray(&self) -> Ray {
        Ray::vertical(self.obj.x, self.obj.y, self.obj.h.max(0) as usize)
    }

    pub fn update(&mut self) -> Lifecycle {
        if self.life == 0 {
            return Lifecycle::Expired;
        }
        self.life -= 1;
        Lifecycle::Alive
    }
}

const LAUNCHER_SPRITE: &str = "-=$^$=-";

/// The player's cannon. Holds the remaining commit SHAs as ammunition.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitLauncher {
    pub obj: GameObject,
    cooldown: u32,
    shas: VecDeque<String>,
    rainbow_index: usize,
}

impl CommitLauncher {
    pub fn new(x: i32, y: i32, shas: Vec<String>) -> Self {
        let obj = GameObject {
            w: LAUNCHER_SPRITE.chars().count() as i32,
            h: 1,
            ..GameObject::new(x, y)
        }
        .with_sprite(LAUNCHER_SPRITE)
        .with_style(Style::default().foreground(C_LAUNCHER));
        Self {
            obj,
            cooldown: 0,
            shas: shas.into(),
            rainbow_index: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.shas.len()
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn next_sha(&self) -> Option<&str> {
        self.shas.front().map(String::as_str)
    }

    pub fn update(&mut self) -> Lifecycle {
        self.cooldown = self.cooldown.saturating_sub(1);
        Lifecycle::Alive
    }

    /// Slide by `dx`, keeping the whole sprite inside `[0, max_width)`.
    pub fn move_by(&mut self, dx: i32, max_width: i32) {
        let max_x = (max_width - self.obj.w).max(0);
        self.obj.x = (self.obj.x + dx).clamp(0, max_x);
    }

    /// Next colour in the rainbow; advances on every call.
    pub fn color_for_shot(&mut self) -> Style {
        let style = Style::default().foreground(RAINBOW[self.rainbow_index]);
        self.rainbow_index = (self.rainbow_index + 1) % RAINBOW.len();
        style
    }

    /// Fire the next SHA. Returns `None` while cooling down, and when only
    /// one SHA is left (that one is never fired).
    pub fn launch(&mut self) -> Option<CommitShot> {
        if self.cooldown > 0 || self.shas.len() <= 1 {
            return None;
        }
        let sha = self.shas.pop_front()?;
        self.cooldown = FIRE_COOLDOWN;

        let x = self.obj.x + BARREL_OFFSET;
        let y = self.obj.y - sha.chars().count() as i32;
        let mut shot = CommitShot::new(x, y, &sha);
        shot.obj.style = Some(self.color_for_shot());
        Some(shot)
    }
}

// ── Tagged union ──────────────────────────────────────────────────────────────

/// Everything the world stores in its entity collection.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Issue(Issue),
    Spawner(IssueSpawner),
    Burst(Burst),
    Shot(CommitShot),
    Counter(CommitCounter),
    Label(GameObject),
}

impl Entity {
    pub fn object(&self) -> &GameObject {
        match self {
            Entity::Issue(e) => &e.obj,
            Entity::Spawner(e) => &e.obj,
            Entity::Burst(e) => &e.obj,
            Entity::Shot(e) => &e.obj,
            Entity::Counter(e) => &e.obj,
            Entity::Label(obj) => obj,
        }
    }

    pub fn update(&mut self, ctx: &TickContext) -> Lifecycle {
        match self {
            Entity::Issue(e) => e.update(ctx),
            Entity::Spawner(e) => e.update(),
            Entity::Burst(e) => e.update(),
            Entity::Shot(e) => e.update(),
            Entity::Counter(e) => e.update(ctx),
            Entity::Label(_) => Lifecycle::Alive,
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, default: Style) {
        self.object().draw(surface, default);
    }

    pub fn as_issue(&self) -> Option<&Issue> {
        match self {
            Entity::Issue(issue) => Some(issue),
            _ => None,
        }
    }

    pub fn as_issue_mut(&mut self) -> Option<&mut Issue> {
        match self {
            Entity::Issue(issue) => Some(issue),
            _ => None,
        }
    }

    pub fn as_spawner_mut(&mut self) -> Option<&mut IssueSpawner> {
        match self {
            Entity::Spawner(spawner) => Some(spawner),
            _ => None,
        }
    }

    pub fn is_spawner(&self) -> bool {
        matches!(self, Entity::Spawner(_))
    }
}
