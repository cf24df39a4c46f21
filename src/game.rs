//! The game world.
//!
//! `Game` owns every live entity in insertion order. Removal tombstones the
//! slot so it disappears from queries at once; tombstones are swept after
//! each update pass. The launcher, score and score log are held directly so
//! hit detection and input never have to search for them.

use rand::Rng;

use crate::compute::{self, Hit, ShotOutcome};
use crate::display::{Style, Surface};
use crate::entities::{Burst, CommitLauncher, CommitShot, Entity, Issue, Lifecycle, TickContext};
use crate::geometry::Ray;
use crate::hud::{Score, ScoreLog};

/// Stable handle to an entity in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

#[derive(Clone, Debug)]
struct Slot {
    id: EntityId,
    entity: Option<Entity>,
}

/// Where the singleton HUD pieces sit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPlacement {
    pub launcher: (i32, i32),
    pub score: (i32, i32),
    pub score_log: (i32, i32),
}

#[derive(Clone, Debug)]
pub struct Game {
    slots: Vec<Slot>,
    next_id: u64,
    pub style: Style,
    max_width: i32,
    launcher: CommitLauncher,
    score: Score,
    score_log: ScoreLog,
}

impl Game {
    pub fn new(max_width: i32, shas: Vec<String>, hud: HudPlacement) -> Self {
        let (lx, ly) = hud.launcher;
        let (sx, sy) = hud.score;
        let (gx, gy) = hud.score_log;
        Self {
            slots: Vec::new(),
            next_id: 0,
            style: Style::default(),
            max_width,
            launcher: CommitLauncher::new(lx, ly, shas),
            score: Score::new(sx, sy),
            score_log: ScoreLog::new(gx, gy),
        }
    }

    pub fn max_width(&self) -> i32 {
        self.max_width
    }

    pub fn launcher(&self) -> &CommitLauncher {
        &self.launcher
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn score_log(&self) -> &ScoreLog {
        &self.score_log
    }

    // ── Collection ───────────────────────────────────────────────────────────

    /// Append an entity. It takes part in updates from the next pass on.
    pub fn add_drawable(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            entity: Some(entity),
        });
        id
    }

    /// Remove an entity. Returns `false` if it was already gone.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.slots.iter_mut().find(|s| s.id == id) {
            Some(slot) => slot.entity.take().is_some(),
            None => false,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .iter_mut()
            .find(|s| s.id == id)
            .and_then(|s| s.entity.as_mut())
    }

    /// Live entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots
            .iter()
            .filter_map(|s| s.entity.as_ref().map(|e| (s.id, e)))
    }

    pub fn len(&self) -> usize {
        self.entities().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_game_object<P>(&self, mut pred: P) -> Option<(EntityId, &Entity)>
    where
        P: FnMut(&Entity) -> bool,
    {
        self.entities().find(|(_, e)| pred(*e))
    }

    pub fn filter_game_objects<P>(&self, mut pred: P) -> Vec<(EntityId, &Entity)>
    where
        P: FnMut(&Entity) -> bool,
    {
        self.entities().filter(|(_, e)| pred(*e)).collect()
    }

    pub fn issues(&self) -> impl Iterator<Item = (EntityId, &Issue)> {
        self.entities()
            .filter_map(|(id, e)| e.as_issue().map(|issue| (id, issue)))
    }

    // ── Per-tick passes ──────────────────────────────────────────────────────

    /// Advance every entity one tick.
    pub fn update(&mut self) {
        let ctx = TickContext {
            max_width: self.max_width,
            commits_remaining: self.launcher.remaining(),
        };
        for slot in self.slots.iter_mut() {
            let expired = match slot.entity.as_mut() {
                Some(entity) => entity.update(&ctx) == Lifecycle::Expired,
                None => false,
            };
            if expired {
                slot.entity = None;
            }
        }
        self.slots.retain(|s| s.entity.is_some());

        self.launcher.update();
        self.score.update();
        self.score_log.update();
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for (_, entity) in self.entities() {
            entity.draw(surface, self.style);
        }
        self.launcher.obj.draw(surface, self.style);
        self.score.draw(surface, self.style);
        self.score_log.draw(surface, self.style);
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    /// Ask one randomly chosen spawner to emit. Returns the new issue's id.
    pub fn spawn(&mut self, rng: &mut impl Rng) -> Option<EntityId> {
        let spawners: Vec<EntityId> = self
            .entities()
            .filter(|(_, e)| e.is_spawner())
            .map(|(id, _)| id)
            .collect();
        if spawners.is_empty() {
            return None;
        }
        let chosen = spawners[rng.gen_range(0..spawners.len())];
        self.spawn_from(chosen)
    }

    /// Ask a specific spawner to emit.
    pub fn spawn_from(&mut self, spawner: EntityId) -> Option<EntityId> {
        let issue = self.get_mut(spawner)?.as_spawner_mut()?.spawn()?;
        Some(self.add_drawable(Entity::Issue(issue)))
    }

    /// Whether every spawner has run out of issues.
    pub fn spawners_dry(&self) -> bool {
        self.entities().all(|(_, e)| match e {
            Entity::Spawner(s) => s.pending() == 0,
            _ => true,
        })
    }

    // ── Player actions ───────────────────────────────────────────────────────

    pub fn move_launcher(&mut self, dx: i32) {
        self.launcher.move_by(dx, self.max_width);
    }

    /// Fire the launcher. Hits resolve right away, before the shot itself
    /// joins the world.
    pub fn launch(&mut self) -> Option<ShotOutcome> {
        let shot = self.launcher.launch()?;
        let ray = shot.ray();
        let outcome = self.detect_hits(&ray, &shot);
        self.add_drawable(Entity::Shot(shot));
        Some(outcome)
    }

    /// Resolve a shot against all live issues and book the score.
    pub fn detect_hits(&mut self, ray: &Ray, shot: &CommitShot) -> ShotOutcome {
        let hits = compute::find_hits(self.issues(), ray, shot);
        for hit in &hits {
            self.apply_hit(hit);
        }

        let outcome = compute::score_shot(&hits);
        if outcome.points > 0 {
            log::debug!(
                "shot {} destroyed {} letters x{} = {} points",
                shot.sha(),
                outcome.hits,
                outcome.multiplier,
                outcome.points
            );
            self.score_log.log(outcome.points, outcome.bonus);
            self.score.add(outcome.points);
        }
        outcome
    }

    fn apply_hit(&mut self, hit: &Hit) {
        if let Some(issue) = self.get_mut(hit.issue).and_then(Entity::as_issue_mut) {
            issue.destroy_letter_at(hit.offset);
        }
        let burst = if hit.exact {
            log::debug!("exact letter hit {:?} at {}", hit.letter, hit.at);
            Burst::big(hit.at.x, hit.at.y)
        } else {
            Burst::new(hit.at.x, hit.at.y)
        };
        self.add_drawable(Entity::Burst(burst));
    }

    /// Track a new terminal width. Right-edge spawners move with the edge.
    pub fn resize(&mut self, max_width: i32) {
        self.max_width = max_width;
        for slot in self.slots.iter_mut() {
            if let Some(spawner) = slot.entity.as_mut().and_then(Entity::as_spawner_mut) {
                if !spawner.is_left_edge() {
                    spawner.obj.x = max_width;
                }
            }
        }
        self.launcher.move_by(0, max_width);
    }
}
