#![deny(unsafe_code)]
//! CLI binary for well-swarm.
//!
//! Subcommands:
//! - `run`: build a swarm, replay an optional input script, print a summary
//! - `presets`: print particle-count presets and the parameter schema

mod error;
mod script;
mod voices;

use clap::{Parser, Subcommand};
use error::CliError;
use script::{Script, ScriptPlayer};
use std::path::PathBuf;
use std::process;
use voices::{VoiceBank, DEFAULT_RELEASE};
use well_swarm_core::{Session, SimConfig, Simulation, Swarm, WellEvent, PARTICLE_COUNT_PRESETS};

/// Fixed frame clock for headless runs.
const FRAME_RATE: f64 = 60.0;

#[derive(Parser)]
#[command(name = "well-swarm", about = "Touch-driven gravity-well particle swarm")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the swarm for N ticks and print a summary.
    Run {
        /// Canvas width.
        #[arg(short = 'W', long, default_value_t = 800.0)]
        width: f64,

        /// Canvas height.
        #[arg(short = 'H', long, default_value_t = 600.0)]
        height: f64,

        /// Number of particles.
        #[arg(short, long, default_value_t = 600)]
        particles: usize,

        /// Number of ticks to simulate.
        #[arg(short, long, default_value_t = 600)]
        steps: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Parameter overrides as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Load the session from a JSON file instead of the flags above.
        #[arg(long)]
        session: Option<PathBuf>,

        /// JSON input script to replay.
        #[arg(long)]
        script: Option<PathBuf>,

        /// Voice release time in seconds.
        #[arg(long, default_value_t = DEFAULT_RELEASE)]
        release: f64,
    },
    /// List particle-count presets and the parameter schema.
    Presets,
}

fn build_session(
    width: f64,
    height: f64,
    particles: usize,
    steps: usize,
    seed: u64,
    params: &str,
    session: Option<PathBuf>,
) -> Result<Session, CliError> {
    if let Some(path) = session {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
        return serde_json::from_str(&text)
            .map_err(|e| CliError::Input(format!("invalid session file: {e}")));
    }
    let params: serde_json::Value = serde_json::from_str(params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let mut s = Session::new(width, height, particles, seed);
    s.steps = steps;
    s.params = params;
    Ok(s)
}

fn load_script(path: Option<PathBuf>) -> Result<Script, CliError> {
    match path {
        None => Ok(Script::default()),
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            Script::from_json(&text).map_err(|e| CliError::Input(format!("invalid script: {e}")))
        }
    }
}

/// Outcome of a headless run.
struct RunReport {
    session: Session,
    peak_wells: usize,
    wells_created: usize,
    wells_removed: usize,
    swarm: Swarm,
    voices: VoiceBank,
}

fn run_session(session: Session, script: Script, release: f64) -> Result<RunReport, CliError> {
    let mut swarm = Swarm::from_session(&session)?;
    let mut voices = VoiceBank::new(session.width, session.height, release);
    let mut player = ScriptPlayer::new(script);
    let dt = 1.0 / FRAME_RATE;
    let (mut peak, mut created, mut removed) = (0, 0, 0);

    log::info!(
        "running {} particles on {}x{} for {} ticks",
        session.particles,
        session.width,
        session.height,
        session.steps
    );

    for step in 0..session.steps {
        let now = step as f64 * dt;
        let (touches, pointer) = player.inputs_at(&mut swarm, step, now);
        let events = swarm.update_inputs_with(&touches, pointer, now, &mut voices);
        for event in &events {
            match event {
                WellEvent::Created(_) => created += 1,
                WellEvent::Removed(_) => removed += 1,
                WellEvent::Updated(_) => {}
            }
        }
        peak = peak.max(swarm.wells().len());
        swarm.step();
        voices.advance(dt);
    }

    Ok(RunReport {
        session,
        peak_wells: peak,
        wells_created: created,
        wells_removed: removed,
        swarm,
        voices,
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Presets => {
            let schema = SimConfig::param_schema();
            if cli.json {
                let info = serde_json::json!({
                    "particle_presets": PARTICLE_COUNT_PRESETS,
                    "params": schema,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Particle presets:");
                for n in PARTICLE_COUNT_PRESETS {
                    println!("  {n}");
                }
                println!("Parameters:");
                if let Some(entries) = schema.as_object() {
                    for (name, entry) in entries {
                        println!("  {name} (default {})", entry["default"]);
                    }
                }
            }
        }
        Command::Run {
            width,
            height,
            particles,
            steps,
            seed,
            params,
            session,
            script,
            release,
        } => {
            let session =
                build_session(width, height, particles, steps, seed, &params, session)?;
            let script = load_script(script)?;
            let report = run_session(session, script, release)?;
            let stats = report.swarm.stats();

            if cli.json {
                let info = serde_json::json!({
                    "session": report.session,
                    "ticks": stats.tick,
                    "particles": stats.particles,
                    "mean_distance_to_home": stats.mean_distance_to_home,
                    "max_speed_component": stats.max_speed_component,
                    "active_wells": report.swarm.wells().len(),
                    "peak_wells": report.peak_wells,
                    "wells_created": report.wells_created,
                    "wells_removed": report.wells_removed,
                    "voices_playing": report.voices.playing(),
                    "voices_releasing": report.voices.releasing(),
                    "voices_released": report.voices.released(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "ran {} particles ({}x{}, {} ticks, seed {})",
                    stats.particles,
                    report.session.width,
                    report.session.height,
                    stats.tick,
                    report.session.seed
                );
                eprintln!(
                    "wells: {} created, {} removed, peak {}, {} active",
                    report.wells_created,
                    report.wells_removed,
                    report.peak_wells,
                    report.swarm.wells().len()
                );
                eprintln!(
                    "mean distance to home {:.3}, max speed component {:.3}",
                    stats.mean_distance_to_home, stats.max_speed_component
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn build_session_from_flags() {
        let s = build_session(640.0, 480.0, 400, 10, 7, r#"{"max_wells": 3}"#, None).unwrap();
        assert_eq!(s.width, 640.0);
        assert_eq!(s.particles, 400);
        assert_eq!(s.steps, 10);
        assert_eq!(s.config().max_wells, 3);
    }

    #[test]
    fn build_session_rejects_bad_params_json() {
        let err = build_session(640.0, 480.0, 400, 10, 7, "{nope", None).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn build_session_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"{{"width": 320, "height": 200, "particles": 50, "seed": 9, "steps": 4}}"#
        )
        .unwrap();
        let s = build_session(1.0, 1.0, 1, 1, 1, "{}", Some(path)).unwrap();
        assert_eq!(s.particles, 50);
        assert_eq!(s.steps, 4);
    }

    #[test]
    fn missing_script_file_is_io_error() {
        let err = load_script(Some(PathBuf::from("/definitely/not/here.json"))).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn scripted_run_creates_and_releases_wells() {
        let script = Script::from_json(
            r#"{"frames": [
                {"step": 0, "touches": [{"id": 1, "x": 200.0, "y": 150.0},
                                        {"id": 2, "x": 600.0, "y": 450.0}]},
                {"step": 20, "touches": []}
            ]}"#,
        )
        .unwrap();
        let mut session = Session::new(800.0, 600.0, 100, 3);
        session.steps = 60;
        let report = run_session(session, script, 0.2).unwrap();
        assert_eq!(report.wells_created, 2);
        assert_eq!(report.wells_removed, 2);
        assert_eq!(report.peak_wells, 2);
        assert!(report.swarm.wells().is_empty());
        // 40 frames at 60 Hz is well past the 0.2 s release
        assert_eq!(report.voices.released(), 2);
        assert_eq!(report.swarm.stats().tick, 60);
    }

    #[test]
    fn invalid_session_is_simulation_error() {
        let session = Session::new(0.0, 600.0, 10, 1);
        let err = run_session(session, Script::default(), 0.2).err().unwrap();
        assert_eq!(err.exit_code(), 10);
    }
}
