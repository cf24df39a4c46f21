use crossterm::style::Color;

use mergeconflict::display::{FrameBuffer, Style, C_ISSUE};
use mergeconflict::entities::*;
use mergeconflict::game::{Game, HudPlacement};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_game() -> Game {
    let hud = HudPlacement {
        launcher: (10, 20),
        score: (1, 23),
        score_log: (24, 22),
    };
    Game::new(40, vec!["aaa".into(), "bbb".into()], hud)
}

fn label(x: i32, y: i32, text: &str) -> Entity {
    Entity::Label(GameObject::new(x, y).with_sprite(text))
}

// ── Collection ────────────────────────────────────────────────────────────────

#[test]
fn add_and_destroy() {
    let mut game = make_game();
    let a = game.add_drawable(label(0, 0, "a"));
    let b = game.add_drawable(label(0, 1, "b"));
    assert_eq!(game.len(), 2);

    assert!(game.destroy(a));
    assert!(!game.destroy(a));
    assert!(game.get(a).is_none());
    assert!(game.get(b).is_some());
    assert_eq!(game.len(), 1);
}

#[test]
fn destroyed_entities_vanish_from_queries_at_once() {
    let mut game = make_game();
    let issue = game.add_drawable(Entity::Issue(Issue::new(0, 0, Direction::Right, "abc")));
    assert_eq!(game.issues().count(), 1);
    game.destroy(issue);
    assert_eq!(game.issues().count(), 0);
    assert!(game.find_game_object(|e| e.as_issue().is_some()).is_none());
}

#[test]
fn find_returns_first_in_insertion_order() {
    let mut game = make_game();
    let first = game.add_drawable(label(0, 0, "first"));
    game.add_drawable(label(0, 1, "second"));
    let (id, _) = game
        .find_game_object(|e| matches!(e, Entity::Label(_)))
        .expect("label");
    assert_eq!(id, first);
}

#[test]
fn filter_keeps_insertion_order() {
    let mut game = make_game();
    game.add_drawable(Entity::Issue(Issue::new(0, 0, Direction::Right, "one")));
    game.add_drawable(label(0, 1, "noise"));
    game.add_drawable(Entity::Issue(Issue::new(0, 2, Direction::Right, "two")));
    let texts: Vec<String> = game
        .filter_game_objects(|e| e.as_issue().is_some())
        .into_iter()
        .filter_map(|(_, e)| e.as_issue().map(|i| i.text().to_string()))
        .collect();
    assert_eq!(texts, vec!["one", "two"]);
}

// ── Update / draw ─────────────────────────────────────────────────────────────

#[test]
fn update_removes_expired_entities() {
    let mut game = make_game();
    game.add_drawable(Entity::Burst(Burst::new(5, 5)));
    let keep = game.add_drawable(label(0, 0, "stay"));
    for _ in 0..3 {
        game.update();
    }
    assert!(game.entities().any(|(_, e)| matches!(e, Entity::Burst(_))));
    game.update();
    assert!(!game.entities().any(|(_, e)| matches!(e, Entity::Burst(_))));
    assert!(game.get(keep).is_some());
}

#[test]
fn update_moves_issues_and_cools_launcher() {
    let mut game = make_game();
    let id = game.add_drawable(Entity::Issue(Issue::new(3, 1, Direction::Left, "abc")));
    game.launch().expect("shot");
    assert!(game.launcher().cooldown() > 0);
    let before = game.launcher().cooldown();
    game.update();
    assert_eq!(game.launcher().cooldown(), before - 1);
    assert_eq!(game.get(id).map(|e| e.object().x), Some(2));
}

#[test]
fn draw_renders_sprites_with_effective_style() {
    let mut game = make_game();
    game.add_drawable(label(2, 1, "hi\nyo"));
    game.update();

    let mut frame = FrameBuffer::new(40, 25);
    game.draw(&mut frame);
    assert_eq!(frame.row_text(1), "  hi");
    assert_eq!(frame.row_text(2), "  yo");
    assert_eq!(frame.cell(2, 1).map(|c| c.style), Some(Style::default()));
    assert_eq!(frame.row_text(20), "          -=$^$=-");
    assert_eq!(frame.row_text(23), " SCORE: 0");
}

#[test]
fn world_background_reaches_styled_entities() {
    let mut game = make_game();
    game.style = Style::default().background(Color::DarkBlue);
    game.add_drawable(Entity::Issue(Issue::new(3, 5, Direction::Right, "#7 bug")));

    let mut frame = FrameBuffer::new(40, 25);
    game.draw(&mut frame);
    let style = frame.cell(3, 5).map(|c| c.style).unwrap();
    assert_eq!(style.fg, Some(C_ISSUE));
    assert_eq!(style.bg, Some(Color::DarkBlue));
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn spawn_picks_a_spawner_and_adds_its_issue() {
    let mut game = make_game();
    let mut spawner = IssueSpawner::new(0, 4);
    spawner.add_issue("#3 docs");
    game.add_drawable(Entity::Spawner(spawner));

    let mut rng = StdRng::seed_from_u64(42);
    let id = game.spawn(&mut rng).expect("issue spawned");
    let issue = game.get(id).and_then(Entity::as_issue).expect("issue");
    assert_eq!(issue.text(), "#3 docs");
    assert!(game.spawners_dry());
    // cooling down now, and empty anyway
    assert!(game.spawn(&mut rng).is_none());
}

#[test]
fn spawn_without_spawners_is_noop() {
    let mut game = make_game();
    let mut rng = StdRng::seed_from_u64(1);
    assert!(game.spawn(&mut rng).is_none());
    assert!(game.is_empty());
}

// ── Player actions ────────────────────────────────────────────────────────────

#[test]
fn last_sha_is_never_fired() {
    let mut game = make_game();
    assert!(game.launch().is_some());
    for _ in 0..10 {
        game.update();
    }
    assert!(game.launch().is_none());
    assert_eq!(game.launcher().remaining(), 1);
    assert_eq!(game.launcher().cooldown(), 0);
    let shots = game
        .entities()
        .filter(|(_, e)| matches!(e, Entity::Shot(_)))
        .count();
    assert_eq!(shots, 0); // the first shot has expired by now
}

#[test]
fn move_launcher_respects_width() {
    let mut game = make_game();
    for _ in 0..100 {
        game.move_launcher(1);
    }
    assert_eq!(game.launcher().obj.x, 40 - 7);
}

#[test]
fn resize_moves_right_spawners_and_clamps_launcher() {
    let mut game = make_game();
    let left = game.add_drawable(Entity::Spawner(IssueSpawner::new(0, 2)));
    let right = game.add_drawable(Entity::Spawner(IssueSpawner::new(40, 4)));
    for _ in 0..100 {
        game.move_launcher(1);
    }
    game.resize(20);
    assert_eq!(game.max_width(), 20);
    assert_eq!(game.get(left).map(|e| e.object().x), Some(0));
    assert_eq!(game.get(right).map(|e| e.object().x), Some(20));
    assert_eq!(game.launcher().obj.x, 13);
}
