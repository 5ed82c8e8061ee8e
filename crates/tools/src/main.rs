use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use foundation::math::{Position, Rectangle, Sector, Vec2};
use foundation::time::Millis;
use gesture::InputEvent;
use globe::{Camera, LookAt};
use navigation::{EngineConfig, WorldWindow};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "globectl", version, about = "Drive a globe window from the command line")]
struct Cli {
    /// Engine configuration JSON; defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, global = true, default_value_t = 1024.0)]
    width: f64,

    /// Canvas height in pixels
    #[arg(long, global = true, default_value_t = 768.0)]
    height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay recorded input events and print where the camera ended up
    Replay {
        /// JSON list of input events, or an object with `look_at` and `events`
        script: PathBuf,

        /// Time after the last event at which pending gesture timers fire
        #[arg(long, default_value_t = 1000.0)]
        settle_ms: f64,
    },

    /// Print the terrain tiles selected for a view
    Tiles {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Eye distance from the target in meters
        #[arg(long)]
        range: f64,
        #[arg(long, default_value_t = 0.0)]
        tilt: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        heading: f64,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayScript {
    Events(Vec<InputEvent>),
    Scripted {
        #[serde(default)]
        look_at: Option<LookAt>,
        events: Vec<InputEvent>,
    },
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    events: usize,
    frames: u64,
    look_at: LookAt,
    camera: Camera,
    pick_requests: Vec<Vec2>,
    tiles: usize,
}

#[derive(Debug, Serialize)]
struct TileReport {
    key: String,
    sector: Sector,
    distance: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Replay { script, settle_ms } => {
            let script = load_script(&script)?;
            let mut window = open_window(&config, cli.width, cli.height)?;
            print_json(&replay(&mut window, script, settle_ms))
        }
        Command::Tiles {
            lat,
            lon,
            range,
            tilt,
            heading,
        } => {
            if !(range > 0.0) {
                bail!("--range must be positive, got {range}");
            }
            let mut window = open_window(&config, cli.width, cli.height)?;
            window.go_to(
                &LookAt::new(Position::new(lat, lon, 0.0), range).with_orientation(heading, tilt, 0.0),
            );
            window.render_frame(Millis::ZERO);
            let tiles: Vec<TileReport> = window
                .terrain()
                .tiles
                .iter()
                .map(|t| TileReport {
                    key: t.key().to_string(),
                    sector: t.sector,
                    distance: t.distance,
                })
                .collect();
            info!(tiles = tiles.len(), "selected terrain tiles");
            print_json(&tiles)
        }
        Command::Config => print_json(&config),
    }
}

fn open_window(config: &EngineConfig, width: f64, height: f64) -> Result<WorldWindow> {
    WorldWindow::new(config, Rectangle::new(0.0, 0.0, width, height)).context("creating window")
}

fn load_script(path: &Path) -> Result<ReplayScript> {
    let payload =
        fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
    serde_json::from_str(&payload).with_context(|| format!("parsing script {}", path.display()))
}

fn replay(window: &mut WorldWindow, script: ReplayScript, settle_ms: f64) -> ReplayReport {
    let events = match script {
        ReplayScript::Events(events) => events,
        ReplayScript::Scripted { look_at, events } => {
            if let Some(look_at) = look_at {
                window.go_to(&look_at);
            }
            events
        }
    };

    let mut last = Millis::ZERO;
    window.render_frame(last);
    for event in &events {
        last = event.time();
        window.handle_event(event);
        window.render_frame(last);
    }
    window.render_frame(last.after(settle_ms));
    info!(events = events.len(), "replay finished");

    ReplayReport {
        events: events.len(),
        frames: window.stats().frames(),
        look_at: window.camera_as_look_at(),
        camera: window.view().camera,
        pick_requests: window.take_pick_requests(),
        tiles: window.terrain().tiles.len(),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> WorldWindow {
        open_window(&EngineConfig::default(), 1024.0, 768.0).unwrap()
    }

    #[test]
    fn demo_script_drags_zooms_and_clicks() {
        let script: ReplayScript =
            serde_json::from_str(include_str!("../../../demos/drag_zoom_click.json")).unwrap();
        let report = replay(&mut window(), script, 1000.0);

        assert_eq!(report.events, 10);
        assert_eq!(report.pick_requests, vec![Vec2::new(300.0, 200.0)]);
        assert!(report.look_at.position.longitude < 7.0);
        // Two line notches towards the user zoom in by 12% each.
        assert!(report.look_at.range < 800_000.0 * 0.8);
        assert!(report.tiles > 0);
        assert!(report.frames >= 2);
    }

    #[test]
    fn bare_event_lists_replay_from_the_default_view() {
        let script: ReplayScript = serde_json::from_str(
            r#"[{ "type": "wheel", "delta_y": 100, "time": 10 }]"#,
        )
        .unwrap();
        let mut w = window();
        let start = w.camera_as_look_at().range;
        let report = replay(&mut w, script, 0.0);
        assert!((report.look_at.range - start * 1.1).abs() < 1e-6 * start);
        assert!(report.pick_requests.is_empty());
    }

    #[test]
    fn cli_parses_tile_queries_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "globectl", "tiles", "--lat", "-33.9", "--lon", "18.4", "--range", "20000",
        ])
        .unwrap();
        match cli.command {
            Command::Tiles { lat, range, .. } => {
                assert_eq!(lat, -33.9);
                assert_eq!(range, 20_000.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
