use std::{env, fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use platformer_core::{FrameInput, GameEvent};
use platformer_runner::{
    leaderboard, load_config, load_layouts, load_script, run, RunOptions, DEFAULT_IDLE_FRAMES,
};

#[derive(Debug)]
struct Cli {
    script_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    layouts_path: Option<PathBuf>,
    seed: Option<u32>,
    idle_frames: u32,
    stop_at_stage: bool,
    record_draw: bool,
    summary_out: Option<PathBuf>,
    submit_url: Option<String>,
    player_name: String,
    leaderboard_url: Option<String>,
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str, what: &str) -> Result<String> {
    args.next().ok_or_else(|| anyhow!("{flag} requires {what}"))
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);

        let mut cli = Cli {
            script_path: None,
            config_path: None,
            layouts_path: None,
            seed: None,
            idle_frames: DEFAULT_IDLE_FRAMES,
            stop_at_stage: false,
            record_draw: false,
            summary_out: None,
            submit_url: None,
            player_name: "runner".to_string(),
            leaderboard_url: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--script" => {
                    cli.script_path = Some(PathBuf::from(next_value(&mut args, "--script", "a file path")?));
                }
                "--config" => {
                    cli.config_path = Some(PathBuf::from(next_value(&mut args, "--config", "a file path")?));
                }
                "--layouts" => {
                    cli.layouts_path = Some(PathBuf::from(next_value(&mut args, "--layouts", "a file path")?));
                }
                "--seed" => {
                    let value = next_value(&mut args, "--seed", "a number")?;
                    let seed = match value.strip_prefix("0x") {
                        Some(hex) => u32::from_str_radix(hex, 16),
                        None => value.parse::<u32>(),
                    }
                    .with_context(|| format!("invalid --seed value: {value}"))?;
                    cli.seed = Some(seed);
                }
                "--frames" => {
                    let value = next_value(&mut args, "--frames", "a number")?;
                    cli.idle_frames = value
                        .parse::<u32>()
                        .with_context(|| format!("invalid --frames value: {value}"))?;
                }
                "--stop-at-stage" => cli.stop_at_stage = true,
                "--record-draw" => cli.record_draw = true,
                "--summary-out" => {
                    cli.summary_out = Some(PathBuf::from(next_value(&mut args, "--summary-out", "a file path")?));
                }
                "--submit" => {
                    cli.submit_url = Some(next_value(&mut args, "--submit", "a base url")?);
                }
                "--name" => {
                    cli.player_name = next_value(&mut args, "--name", "a player name")?;
                }
                "--leaderboard" => {
                    cli.leaderboard_url = Some(next_value(&mut args, "--leaderboard", "a base url")?);
                }
                "-h" | "--help" => {
                    println!(
                        "Usage: platformer-runner [--script <inputs.json>] [--frames <n>] [--config <config.json>] [--layouts <stages.json>] [--seed <n|0xhex>] [--stop-at-stage] [--record-draw] [--summary-out <file.json>] [--submit <base-url> --name <player>] [--leaderboard <base-url>]\nWithout --script the run idles for --frames frames (default {DEFAULT_IDLE_FRAMES})."
                    );
                    std::process::exit(0);
                }
                other => return Err(anyhow!("unknown argument: {other}. Use --help for usage.")),
            }
        }

        Ok(cli)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse()?;

    let mut config = match &cli.config_path {
        Some(path) => load_config(path)?,
        None => Default::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let layouts = cli.layouts_path.as_deref().map(load_layouts).transpose()?;
    let inputs = match &cli.script_path {
        Some(path) => load_script(path)?,
        None => vec![FrameInput::IDLE; cli.idle_frames as usize],
    };

    let mut submissions = Vec::new();
    let summary = run(
        RunOptions {
            config,
            layouts,
            auto_advance: !cli.stop_at_stage,
            record_draw: cli.record_draw,
        },
        &inputs,
        |event| {
            if let (GameEvent::RunFinished { score, .. }, Some(url)) = (event, &cli.submit_url) {
                submissions.push(leaderboard::spawn_submit(
                    url.clone(),
                    cli.player_name.clone(),
                    *score,
                ));
            }
        },
    );

    let json = serde_json::to_string_pretty(&summary).context("failed to serialize run summary")?;
    println!("{json}");
    if let Some(path) = &cli.summary_out {
        fs::write(path, &json)
            .with_context(|| format!("failed writing summary: {}", path.display()))?;
    }

    for handle in submissions {
        if handle.join().is_err() {
            tracing::warn!("score submission thread panicked");
        }
    }

    if let Some(url) = &cli.leaderboard_url {
        match leaderboard::fetch_top(url) {
            Ok(entries) => {
                println!("Leaderboard:");
                for (rank, entry) in entries.iter().enumerate() {
                    println!("  {:>2}. {:<20} {}", rank + 1, entry.player_name, entry.score);
                }
            }
            Err(err) => tracing::warn!("could not load leaderboard: {err:#}"),
        }
    }

    Ok(())
}
