//! Sweep Pong headless driver
//!
//! Runs an autopilot-vs-autopilot match on a fixed timestep and prints the
//! final state as JSON.
//!
//! Usage: `sweep-pong [settings.json] [seconds]`

use sweep_pong::Settings;
use sweep_pong::consts::MAX_SUBSTEPS;
use sweep_pong::sim::autopilot::track_ball;
use sweep_pong::sim::{Body, GameState, Outline, TickInput, tick};

/// Simulated wall-clock frame length (seconds)
const FRAME_SECS: f64 = 1.0 / 60.0;
/// Match length when none is given (seconds)
const DEFAULT_MATCH_SECS: f64 = 120.0;

/// Match driver holding all state
struct Match {
    state: GameState,
    accumulator: f64,
    failed_ticks: u32,
}

impl Match {
    fn new(settings: Settings) -> Self {
        Self {
            state: GameState::new(settings),
            accumulator: 0.0,
            failed_ticks: 0,
        }
    }

    /// Run simulation ticks for one frame of `dt` seconds
    fn update(&mut self, dt: f64) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let tick_ms = self.state.settings.tick_ms();
        let tick_secs = tick_ms / 1000.0;
        let mut substeps = 0;
        while self.accumulator >= tick_secs && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                paddle_moves: [0, 1].map(|i| {
                    Some(track_ball(
                        &self.state.paddles[i],
                        &self.state.ball,
                        &self.state.settings,
                    ))
                }),
            };
            match tick(&mut self.state, &input, tick_ms) {
                Ok(report) => {
                    if let Some(scorer) = report.goal {
                        log::info!(
                            "{:?} concedes at tick {}",
                            scorer.opponent(),
                            self.state.time_ticks
                        );
                    }
                }
                Err(e) => {
                    // Drop the rally rather than the match
                    log::error!("Tick {} failed: {}; restarting rally", self.state.time_ticks, e);
                    self.failed_ticks += 1;
                    self.state.reset_entities();
                }
            }
            self.accumulator -= tick_secs;
            substeps += 1;
        }
    }
}

fn describe(body: &dyn Body) -> String {
    match body.outline() {
        Outline::Circle { center, radius } => format!("circle r={radius} at {center}"),
        Outline::Rect { top_left, size } => format!("rect {size} at {top_left}"),
    }
}

fn main() {
    env_logger::init();
    log::info!("Sweep Pong (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Settings::default()
            }
        },
        None => Settings::default(),
    };
    let match_secs = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(DEFAULT_MATCH_SECS);

    let mut game = Match::new(settings);
    log::debug!("Ball: {}", describe(&game.state.ball));
    for paddle in &game.state.paddles {
        log::debug!("Paddle: {}", describe(paddle));
    }

    let frames = (match_secs / FRAME_SECS).round() as u64;
    for _ in 0..frames {
        game.update(FRAME_SECS);
    }

    let snapshot = game.state.snapshot();
    log::info!(
        "Match over after {} ticks: {}:{} ({} failed ticks)",
        game.state.time_ticks,
        snapshot.score[0],
        snapshot.score[1],
        game.failed_ticks
    );
    match snapshot.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not encode snapshot: {e}"),
    }
}
