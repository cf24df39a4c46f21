use std::fs::File;
use std::io::{self, stdout, BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use mergeconflict::config::GameConfig;
use mergeconflict::display::{self, FrameBuffer};
use mergeconflict::highscores::{self, HighScores};
use mergeconflict::session::{self, Command, Layout, Session};
use mergeconflict::source::{GhCli, RepoSource};

#[derive(Debug, Parser)]
#[command(
    name = "mergeconflict",
    version,
    about = "play a game about open source triage in your terminal"
)]
struct Args {
    /// Repository to play in (OWNER/NAME)
    #[arg(short = 'R', long = "repo")]
    repo: Option<String>,

    /// Enable logging to mclog.txt
    #[arg(short, long)]
    debug: bool,

    /// Seed for the issue shuffle and spawn schedule
    #[arg(long)]
    seed: Option<u64>,

    /// Number of issue lanes
    #[arg(long, default_value_t = GameConfig::default().lanes)]
    lanes: usize,
}

const INPUT_POLL: Duration = Duration::from_millis(50);

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode during play, so debug logs go to a file.
fn init_logging(debug: bool) -> Result<()> {
    if !debug {
        return Ok(());
    }
    let file = File::create("mclog.txt").context("failed to create mclog.txt")?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("mc logging");
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits. Input arrives on `rx` from the reader
/// thread and is applied at the start of each tick.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session<StdRng>,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let mut frame = FrameBuffer::new(width, height);

    loop {
        let tick_start = Instant::now();

        // ── Drain pending input ──────────────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Some(command) = session::command_for(&ev) else {
                continue;
            };
            match command {
                Command::Resize(w, h) => frame.resize(w, h),
                Command::Refresh => {
                    out.execute(terminal::Clear(terminal::ClearType::All))?;
                }
                _ => {}
            }
            session.handle(command);
        }
        if session.is_over() {
            return Ok(());
        }

        session.tick();
        session.render(&mut frame);
        display::present(out, &frame)?;

        let elapsed = tick_start.elapsed();
        if elapsed < config.tick {
            thread::sleep(config.tick - elapsed);
        }
    }
}

/// Forward terminal events to `tx` until `stop` is set or the receiver
/// hangs up.
fn input_reader(tx: mpsc::Sender<Event>, stop: &AtomicBool) {
    while !stop.load(Ordering::Relaxed) {
        match event::poll(INPUT_POLL) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        return;
                    }
                }
                Err(_) => return,
            },
            Ok(false) => {}
            Err(_) => return,
        }
    }
}

fn play(session: &mut Session<StdRng>, config: &GameConfig) -> io::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Reads live on their own thread so the loop never waits on input. The
    // thread must be gone before anything else reads stdin.
    let (tx, rx) = mpsc::channel::<Event>();
    let stop = Arc::new(AtomicBool::new(false));
    let reader = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || input_reader(tx, &stop))
    };

    let result = game_loop(&mut out, session, &rx, config);

    stop.store(true, Ordering::Relaxed);
    if reader.join().is_err() {
        log::warn!("input thread panicked");
    }

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

// ── High scores ───────────────────────────────────────────────────────────────

fn finish(repo: &str, score: u64, mut scores: HighScores) -> Result<()> {
    println!("final score: {}", score);
    highscores::confirm_and_record(
        &mut scores,
        repo,
        score,
        &highscores::state_path(),
        &mut io::stdin().lock(),
        &mut stdout(),
    )
    .context("failed to record high score")?;
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn run(args: Args) -> Result<()> {
    init_logging(args.debug)?;

    let config = GameConfig {
        lanes: args.lanes.max(1),
        seed: args.seed,
        ..GameConfig::default()
    };

    let gh = GhCli::new();
    let repo = match args.repo {
        Some(repo) => repo,
        None => gh.resolve_repository()?,
    };

    let mut issues = gh
        .issues(&repo)
        .with_context(|| format!("failed to get issues for {}", repo))?;
    let shas = gh
        .commits(&repo)
        .with_context(|| format!("failed to get shas for {}", repo))?;
    log::info!("{}: {} issues, {} commits", repo, issues.len(), shas.len());

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    issues.shuffle(&mut rng);

    let scores = match HighScores::load(&highscores::state_path()) {
        Ok(scores) => scores,
        Err(e) => {
            log::warn!("could not load state, starting fresh: {}", e);
            HighScores::new()
        }
    };

    let (width, height) = terminal::size().context("failed to read terminal size")?;
    let layout = Layout::new(width, height, config.lanes);
    let game = session::build_game(&layout, issues, shas, scores.entries(&repo));
    let mut session = Session::new(game, &repo, &config, rng);

    play(&mut session, &config).context("terminal error")?;

    finish(&repo, session.score(), scores)
}

fn main() {
    if let Err(e) = run(Args::parse()) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
