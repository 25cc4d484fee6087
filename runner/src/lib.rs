//! Headless driver for the platformer core: loads scripts, configs and layouts from
//! disk, plays them at a fixed 60 Hz and reports what happened.

pub mod leaderboard;

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{anyhow, Context, Result};
use platformer_core::{
    CommandList, FrameInput, Game, GameConfig, GameEvent, GameSnapshot, GameState, InputScript,
    NullCanvas, StageLayout,
};
use serde::Serialize;

pub const FRAME_MS: f64 = 1000.0 / 60.0;
pub const DEFAULT_IDLE_FRAMES: u32 = 600;

pub fn load_script(path: &Path) -> Result<Vec<FrameInput>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input script: {}", path.display()))?;
    let script = InputScript::from_json(&text)
        .with_context(|| format!("invalid input script: {}", path.display()))?;
    let inputs = script.expand()?;
    tracing::info!(path = %path.display(), frames = inputs.len(), "loaded input script");
    Ok(inputs)
}

pub fn load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&text)
        .with_context(|| format!("invalid config json: {}", path.display()))?;
    if !(config.world_width > 0.0 && config.world_height > 0.0) {
        return Err(anyhow!("config world size must be positive"));
    }
    if !(config.ground_line > 0.0 && config.ground_line <= config.world_height) {
        return Err(anyhow!(
            "config ground_line {} must lie inside the world height {}",
            config.ground_line,
            config.world_height
        ));
    }
    Ok(config)
}

pub fn load_layouts(path: &Path) -> Result<Vec<StageLayout>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read layouts: {}", path.display()))?;
    let layouts = StageLayout::list_from_json(&text)
        .with_context(|| format!("invalid layouts: {}", path.display()))?;
    tracing::info!(path = %path.display(), stages = layouts.len(), "loaded stage layouts");
    Ok(layouts)
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: GameConfig,
    pub layouts: Option<Vec<StageLayout>>,
    /// Continue to the next stage whenever one is completed.
    pub auto_advance: bool,
    /// Record the draw pass instead of discarding it.
    pub record_draw: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    #[serde(flatten)]
    pub snapshot: GameSnapshot,
    pub frames: usize,
    pub events: BTreeMap<&'static str, usize>,
    pub faulted_frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_fault: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_frame_draw_commands: Option<usize>,
}

/// Starts a fresh run and feeds `inputs` through [`Game::frame`], one per 60 Hz
/// tick. `observe` sees every event as it is drained.
pub fn run(
    options: RunOptions,
    inputs: &[FrameInput],
    mut observe: impl FnMut(&GameEvent),
) -> RunSummary {
    let mut game = match options.layouts {
        Some(layouts) => Game::with_layouts(options.config, layouts),
        None => Game::new(options.config),
    };
    game.start();

    let mut events = BTreeMap::new();
    let mut faulted_frames = 0;
    let mut first_fault = None;
    let mut recorder = CommandList::new();
    let mut discard = NullCanvas;

    for (frame, input) in inputs.iter().enumerate() {
        let timestamp = frame as f64 * FRAME_MS;
        if options.record_draw {
            recorder.clear_commands();
            game.frame(timestamp, input, &mut recorder);
        } else {
            game.frame(timestamp, input, &mut discard);
        }

        if let Some(diagnostic) = game.diagnostic() {
            faulted_frames += 1;
            if first_fault.is_none() {
                tracing::warn!(frame, diagnostic, "frame faulted");
                first_fault = Some(diagnostic.to_string());
            }
        }

        for event in game.drain_events() {
            *events.entry(event.name()).or_insert(0) += 1;
            observe(&event);
        }

        if options.auto_advance && game.state() == GameState::LevelComplete {
            game.next_level();
        }
    }

    let snapshot = game.snapshot();
    tracing::info!(
        frames = inputs.len(),
        score = snapshot.score,
        stage = snapshot.stage,
        state = ?snapshot.state,
        "run complete"
    );

    RunSummary {
        snapshot,
        frames: inputs.len(),
        events,
        faulted_frames,
        first_fault,
        last_frame_draw_commands: options.record_draw.then(|| recorder.commands.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn script_file_expands_to_frames() {
        let file = write_temp(r#"[{"frames": 5, "hold": ["right"]}, {"frames": 3, "press": ["z"]}]"#);
        let inputs = load_script(file.path()).unwrap();
        assert_eq!(inputs.len(), 8);
        assert!(inputs[0].right);
        assert!(inputs[5].attack_pressed);
        assert!(!inputs[6].attack_pressed);
    }

    #[test]
    fn bad_script_mentions_the_file() {
        let file = write_temp(r#"[{"frames": 5, "hold": ["teleport"]}]"#);
        let err = load_script(file.path()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("invalid input script"), "{message}");
        assert!(message.contains("teleport"), "{message}");
    }

    #[test]
    fn partial_config_uses_defaults() {
        let file = write_temp(r#"{"seed": 7, "ground_line": 450}"#);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.ground_line, 450.0);
        assert_eq!(config.gravity, GameConfig::default().gravity);
    }

    #[test]
    fn ground_line_outside_world_is_rejected() {
        let file = write_temp(r#"{"ground_line": 900}"#);
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_layouts(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read layouts"));
    }

    #[test]
    fn idle_run_reports_counts_and_draws() {
        let inputs = vec![FrameInput::IDLE; 120];
        let mut seen = 0;
        let summary = run(
            RunOptions {
                record_draw: true,
                ..RunOptions::default()
            },
            &inputs,
            |_| seen += 1,
        );

        assert_eq!(summary.frames, 120);
        assert_eq!(summary.snapshot.state, GameState::Playing);
        assert_eq!(summary.faulted_frames, 0);
        assert_eq!(summary.events.get("level_loaded"), Some(&1));
        assert_eq!(seen, summary.events.values().sum::<usize>());
        assert!(summary.last_frame_draw_commands.unwrap_or(0) > 0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["state"], "playing");
        assert_eq!(json["frames"], 120);
    }

    #[test]
    fn empty_layout_list_faults_every_frame() {
        let summary = run(
            RunOptions {
                layouts: Some(Vec::new()),
                ..RunOptions::default()
            },
            &[FrameInput::IDLE; 10],
            |_| {},
        );
        assert_eq!(summary.faulted_frames, 10);
        assert_eq!(summary.snapshot.state, GameState::Loading);
        assert!(summary.first_fault.unwrap().contains("unknown stage"));
    }
}
