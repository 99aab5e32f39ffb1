//! Ecopolis Headless Simulation Harness
//!
//! Plays complete seeded games with a scripted mayor and validates the
//! engine's invariants after every tick. Runs entirely in-process with no
//! UI and no clock.
//!
//! Usage:
//!   cargo run -p ecopolis-simtest
//!   cargo run -p ecopolis-simtest -- --verbose --seed 7 --games 20
//!   cargo run -p ecopolis-simtest -- --config my_city.json --json
//!
//! Set `RUST_LOG=info` (or `debug` for per-tick lines) to see the engine log.

use std::collections::HashSet;
use std::path::PathBuf;

use ecopolis_core::prelude::*;
use ecopolis_logic::config::validate_config;
use ecopolis_logic::events::EVENT_TEMPLATES;
use ecopolis_logic::missions::MissionGoal;
use ecopolis_logic::scoring::ScoreRating;
use serde::Serialize;

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug)]
enum HarnessError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Args(String),
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarnessError::Io(e) => write!(f, "I/O error: {}", e),
            HarnessError::Json(e) => write!(f, "JSON error: {}", e),
            HarnessError::Args(msg) => write!(f, "bad arguments: {}", msg),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<std::io::Error> for HarnessError {
    fn from(e: std::io::Error) -> Self {
        HarnessError::Io(e)
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(e: serde_json::Error) -> Self {
        HarnessError::Json(e)
    }
}

// ── Options ─────────────────────────────────────────────────────────────

struct Options {
    verbose: bool,
    json: bool,
    seed: u64,
    games: u32,
    config: Option<PathBuf>,
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, HarnessError> {
        let mut opts = Options {
            verbose: false,
            json: false,
            seed: 1,
            games: 8,
            config: None,
        };
        let mut args = args.skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" => opts.verbose = true,
                "--json" => opts.json = true,
                "--seed" => opts.seed = parse_value(&arg, args.next())?,
                "--games" => opts.games = parse_value(&arg, args.next())?,
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| HarnessError::Args("--config needs a path".into()))?;
                    opts.config = Some(PathBuf::from(path));
                }
                other => return Err(HarnessError::Args(format!("unknown flag {}", other))),
            }
        }
        Ok(opts)
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, HarnessError> {
    value
        .as_deref()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| HarnessError::Args(format!("{} needs a number", flag)))
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig, HarnessError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(GameConfig::default()),
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct GameSummary {
    seed: u64,
    ending: Option<Ending>,
    score: u32,
    rating: Option<ScoreRating>,
    days: u32,
    buildings: u32,
    missions_done: usize,
    events_spawned: u32,
    violations: Vec<String>,
}

fn main() {
    env_logger::init();

    let opts = match Options::parse(std::env::args()) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let config = match load_config(opts.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config: {}", e);
            std::process::exit(2);
        }
    };

    println!("=== Ecopolis Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    results.extend(validate_configuration(&config));

    // 2. Static catalogs
    results.extend(validate_catalogs());

    // 3. Seeded games
    let (game_results, summaries) = run_games(&config, &opts);
    results.extend(game_results);

    // 4. Determinism
    results.extend(validate_determinism(&config, opts.seed));

    // ── Summary ──
    println!();
    if opts.json {
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to encode summaries: {}", e),
        }
    }

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(config: &GameConfig) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let problems = validate_config(config);
    results.push(TestResult {
        name: "config_valid".into(),
        passed: problems.is_empty(),
        detail: if problems.is_empty() {
            format!(
                "{}x{} grid, {} days, {}ms ticks",
                config.grid_cols, config.grid_rows, config.max_days, config.tick_interval_ms
            )
        } else {
            problems
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    let roundtrip = serde_json::to_string(config)
        .and_then(|json| serde_json::from_str::<GameConfig>(&json));
    results.push(TestResult {
        name: "config_json_roundtrip".into(),
        passed: roundtrip.as_ref().is_ok_and(|c| {
            c.max_days == config.max_days && c.start.buildings == config.start.buildings
        }),
        detail: "GameConfig survives a JSON round trip".into(),
    });

    let starting_cells: HashSet<(u32, u32)> =
        config.start.buildings.iter().map(|b| (b.col, b.row)).collect();
    results.push(TestResult {
        name: "config_free_cells".into(),
        passed: (starting_cells.len() as u32) < config.cell_count(),
        detail: format!(
            "{} of {} cells taken at start",
            starting_cells.len(),
            config.cell_count()
        ),
    });

    results
}

// ── 2. Catalogs ─────────────────────────────────────────────────────────

fn validate_catalogs() -> Vec<TestResult> {
    println!("--- Catalogs ---");
    let mut results = Vec::new();

    let ids: HashSet<&str> = EVENT_TEMPLATES.iter().map(|t| t.id).collect();
    results.push(TestResult {
        name: "event_ids_unique".into(),
        passed: ids.len() == EVENT_TEMPLATES.len(),
        detail: format!("{} event templates", EVENT_TEMPLATES.len()),
    });

    let all_timed = EVENT_TEMPLATES
        .iter()
        .all(|t| t.days_to_complete > 0 && t.requirement_count > 0);
    results.push(TestResult {
        name: "event_requirements_sane".into(),
        passed: all_timed,
        detail: "every event needs at least one building and one day".into(),
    });

    let rewards: u64 = MissionGoal::ALL.iter().map(|g| g.reward()).sum();
    results.push(TestResult {
        name: "mission_catalog".into(),
        passed: MissionGoal::ALL.len() == 7 && rewards > 0,
        detail: format!("7 missions worth ${} in total", rewards),
    });

    results
}

// ── 3. Seeded games ─────────────────────────────────────────────────────

/// Scripted mayor: builds on a rotation while money allows, claims events
/// as soon as they are met, campaigns when the city turns sour.
fn mayor_turn(engine: &mut CityEngine) {
    const ROTATION: [BuildingType; 7] = [
        BuildingType::House,
        BuildingType::Park,
        BuildingType::Factory,
        BuildingType::House,
        BuildingType::Recycle,
        BuildingType::Solar,
        BuildingType::Park,
    ];
    let day = engine.state().day;
    let pick = ROTATION[day as usize % ROTATION.len()];
    if engine.state().money >= engine.config().cost(pick) as f64 + 1500.0 {
        let _ = engine.build(pick);
    }

    let ready: Vec<EventId> = engine
        .state()
        .active_events
        .iter()
        .map(|e| e.id)
        .filter(|id| engine.event_progress(*id).is_some_and(|p| p.met))
        .collect();
    for id in ready {
        let _ = engine.complete_event(id);
    }

    if engine.state().happiness < 45.0 || engine.state().pollution > 60.0 {
        let _ = engine.launch_campaign();
    }
}

fn check_invariants(state: &CityState, violations: &mut Vec<String>) {
    if state.population > state.housing_capacity {
        violations.push(format!(
            "day {}: population {} over capacity {}",
            state.day, state.population, state.housing_capacity
        ));
    }
    if state.money < 0.0 {
        violations.push(format!("day {}: money {}", state.day, state.money));
    }
    for (name, v) in [
        ("energy", state.energy),
        ("happiness", state.happiness),
        ("pollution", state.pollution),
        ("recycling", state.recycling),
    ] {
        if !(0.0..=100.0).contains(&v) {
            violations.push(format!("day {}: {} out of range ({})", state.day, name, v));
        }
    }
    let cells: HashSet<(u32, u32)> = state.buildings.iter().map(|b| (b.col, b.row)).collect();
    if cells.len() != state.buildings.len() {
        violations.push(format!("day {}: overlapping buildings", state.day));
    }
}

fn play_game(config: &GameConfig, seed: u64) -> GameSummary {
    let mut engine = CityEngine::with_seed(config.clone(), seed);
    let mut violations = Vec::new();
    let mut events_spawned = 0;

    if let Err(e) = engine.start_game() {
        violations.push(format!("start_game failed: {}", e));
    }

    while let Some(report) = engine.advance_day() {
        if report.spawned_event.is_some() {
            events_spawned += 1;
        }
        check_invariants(engine.state(), &mut violations);
        if engine.state().is_over() {
            break;
        }
        mayor_turn(&mut engine);
        check_invariants(engine.state(), &mut violations);
        engine.drain_notifications();
    }

    let stats = engine.final_stats();
    let state = engine.state();
    if stats.is_none() {
        violations.push(format!("game still open on day {}", state.day));
    }
    GameSummary {
        seed,
        ending: state.ending,
        score: state.score,
        rating: stats.and_then(|s| s.rating),
        days: state.day,
        buildings: state.buildings.len() as u32,
        missions_done: state.missions_done(),
        events_spawned,
        violations,
    }
}

fn run_games(config: &GameConfig, opts: &Options) -> (Vec<TestResult>, Vec<GameSummary>) {
    println!("--- Seeded games ---");
    let mut results = Vec::new();
    let mut summaries = Vec::new();

    for i in 0..opts.games {
        let seed = opts.seed.wrapping_add(i as u64);
        let summary = play_game(config, seed);
        log::info!(
            "seed {}: {:?} on day {} (score {})",
            seed,
            summary.ending,
            summary.days,
            summary.score
        );
        results.push(TestResult {
            name: format!("game_seed_{}", seed),
            passed: summary.violations.is_empty() && summary.ending.is_some(),
            detail: match summary.violations.first() {
                Some(v) => format!("{} violation(s), first: {}", summary.violations.len(), v),
                None => format!(
                    "{:?} on day {}, score {}, {} buildings, {}/7 missions, {} events",
                    summary.ending,
                    summary.days,
                    summary.score,
                    summary.buildings,
                    summary.missions_done,
                    summary.events_spawned
                ),
            },
        });
        summaries.push(summary);
    }

    if opts.verbose {
        let completed = summaries
            .iter()
            .filter(|s| s.ending.is_some_and(|e| e.is_success()))
            .count();
        println!("  {}/{} games completed the term", completed, summaries.len());
    }

    (results, summaries)
}

// ── 4. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &GameConfig, seed: u64) -> Vec<TestResult> {
    println!("--- Determinism ---");

    let replay = || {
        let mut engine = CityEngine::with_seed(config.clone(), seed);
        let _ = engine.start_game();
        while engine.advance_day().is_some() {
            if engine.state().is_over() {
                break;
            }
            mayor_turn(&mut engine);
        }
        engine.snapshot().to_json()
    };

    let (a, b) = (replay(), replay());
    let passed = matches!((&a, &b), (Ok(x), Ok(y)) if x == y);
    vec![TestResult {
        name: "same_seed_same_city".into(),
        passed,
        detail: format!("seed {} replayed twice", seed),
    }]
}
