use std::collections::HashSet;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use mergeconflict::config::GameConfig;
use mergeconflict::display::FrameBuffer;
use mergeconflict::entities::{Entity, IssueSpawner};
use mergeconflict::session::*;

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn make_session(issues: Vec<String>, lanes: usize) -> Session<StdRng> {
    let layout = Layout::new(80, 24, lanes);
    let game = build_game(&layout, issues, strings(&["aaa111", "bbb222"]), &[]);
    let config = GameConfig {
        spawn_chance: 1.0,
        lanes,
        ..GameConfig::default()
    };
    Session::new(game, "octo/cat", &config, StdRng::seed_from_u64(42))
}

// ── command_for ───────────────────────────────────────────────────────────────

#[test]
fn keys_map_to_commands() {
    assert_eq!(command_for(&key(KeyCode::Char(' '))), Some(Command::Fire));
    assert_eq!(command_for(&key(KeyCode::Char('q'))), Some(Command::Quit));
    assert_eq!(command_for(&key(KeyCode::Esc)), Some(Command::Quit));
    assert_eq!(command_for(&key(KeyCode::Left)), Some(Command::Left));
    assert_eq!(command_for(&key(KeyCode::Right)), Some(Command::Right));
    assert_eq!(command_for(&key(KeyCode::Char('x'))), None);
}

#[test]
fn control_keys_map_to_commands() {
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    let ctrl_l = Event::Key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
    assert_eq!(command_for(&ctrl_c), Some(Command::Quit));
    assert_eq!(command_for(&ctrl_l), Some(Command::Refresh));
}

#[test]
fn key_release_is_ignored() {
    let release = Event::Key(KeyEvent::new_with_kind(
        KeyCode::Char(' '),
        KeyModifiers::NONE,
        KeyEventKind::Release,
    ));
    assert_eq!(command_for(&release), None);
}

#[test]
fn resize_event_maps_to_resize() {
    assert_eq!(command_for(&Event::Resize(100, 30)), Some(Command::Resize(100, 30)));
}

// ── Layout & setup ────────────────────────────────────────────────────────────

#[test]
fn lanes_alternate_edges() {
    let layout = Layout::new(80, 24, 4);
    assert_eq!(layout.lanes, vec![(0, 2), (80, 4), (0, 6), (80, 8)]);
    assert_eq!(layout.hud.launcher, (37, 16));
}

#[test]
fn launcher_sits_below_the_lanes() {
    let layout = Layout::new(80, 30, 6);
    // last lane at row 12
    assert_eq!(layout.hud.launcher.1, 22);
    let layout = Layout::new(80, 20, 6);
    assert_eq!(layout.hud.launcher.1, 16);
}

#[test]
fn launcher_stays_visible_on_short_terminals() {
    let layout = Layout::new(80, 10, 6);
    assert_eq!(layout.hud.launcher.1, 9);
}

#[test]
fn labels_move_left_on_narrow_terminals() {
    let wide = Layout::new(120, 24, 4);
    assert_eq!((wide.legend.0, wide.board.0), (44, 60));
    let narrow = Layout::new(60, 24, 4);
    assert_eq!((narrow.legend.0, narrow.board.0), (28, 44));
}

#[test]
fn distribute_is_round_robin() {
    let mut spawners = vec![IssueSpawner::new(0, 2), IssueSpawner::new(80, 4)];
    distribute(strings(&["a", "b", "c"]), &mut spawners);
    assert_eq!(spawners[0].pending(), 2);
    assert_eq!(spawners[1].pending(), 1);
}

#[test]
fn build_game_populates_spawners_counter_and_labels() {
    let session = make_session(strings(&["#1 Fix bug"]), 3);
    let game = &session.game;
    let spawners = game.filter_game_objects(Entity::is_spawner);
    assert_eq!(spawners.len(), 3);
    assert!(game
        .entities()
        .any(|(_, e)| matches!(e, Entity::Counter(c) if c.obj.sprite == "2 commits remain")));
    let labels = game
        .entities()
        .filter(|(_, e)| matches!(e, Entity::Label(_)))
        .count();
    assert_eq!(labels, 2);
}

#[test]
fn shuffled_issues_all_appear_across_two_spawners() {
    let mut issues = strings(&["#1 Fix bug", "#2 Add feature"]);
    issues.shuffle(&mut StdRng::seed_from_u64(7));
    let expected_first = issues[0].clone();

    let mut session = make_session(issues.clone(), 2);
    let first_spawner = session.game.filter_game_objects(Entity::is_spawner)[0].0;
    let emitted = session.game.spawn_from(first_spawner).expect("spawned");
    let text = session
        .game
        .get(emitted)
        .and_then(Entity::as_issue)
        .map(|i| i.text().to_string());
    assert_eq!(text, Some(expected_first));

    let mut seen: HashSet<String> = HashSet::new();
    for _ in 0..200 {
        session.tick();
        seen.extend(session.game.issues().map(|(_, i)| i.text().to_string()));
        if session.game.spawners_dry() {
            break;
        }
    }
    seen.extend(session.game.issues().map(|(_, i)| i.text().to_string()));
    let all: HashSet<String> = issues.into_iter().collect();
    assert!(all.is_subset(&seen), "saw {:?}", seen);
}

// ── Session ───────────────────────────────────────────────────────────────────

#[test]
fn quit_ends_the_session() {
    let mut session = make_session(Vec::new(), 2);
    assert!(!session.is_over());
    session.handle(Command::Quit);
    assert!(session.is_over());
}

#[test]
fn fire_is_resolved_when_handled() {
    let mut session = make_session(Vec::new(), 2);
    let outcome = session.handle(Command::Fire).expect("fired");
    assert_eq!(outcome.hits, 0);
    assert_eq!(session.game.launcher().remaining(), 1);
    // only one SHA left: further shots are refused
    for _ in 0..5 {
        session.tick();
    }
    assert!(session.handle(Command::Fire).is_none());
}

#[test]
fn arrows_move_the_launcher() {
    let mut session = make_session(Vec::new(), 2);
    let x = session.game.launcher().obj.x;
    session.handle(Command::Left);
    session.handle(Command::Left);
    session.handle(Command::Right);
    assert_eq!(session.game.launcher().obj.x, x - 1);
}

#[test]
fn tick_counts_and_render_draws_title() {
    let mut session = make_session(strings(&["#1 Fix bug"]), 2);
    session.tick();
    assert_eq!(session.ticks(), 1);

    let mut frame = FrameBuffer::new(80, 24);
    session.render(&mut frame);
    assert_eq!(frame.row_text(0), " mergeconflict: octo/cat");
    assert!(frame.row_text(18).starts_with(" 2 commits remain"));
    assert!(frame.row_text(19).starts_with(" SCORE: 0"));
}
