mod config;
mod render;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sequin_core::config::STEP_COUNT;
use sequin_core::generator::create;
use sequin_core::{
    CurveShape, GeneratorMode, LayerBuilder, Random, RunMode, SequenceState, StepSelection,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::CliConfig;

#[derive(Parser)]
#[command(
    name = "sequin",
    about = "Step sequencer run modes, curve shapes and pattern generators"
)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Trace the step position of a sequence over a number of ticks
    Steps {
        /// Run mode, e.g. "forward", "ping-pong", "drunken walk"
        #[arg(long)]
        mode: Option<RunMode>,
        #[arg(long)]
        first: Option<usize>,
        #[arg(long)]
        last: Option<usize>,
        #[arg(long)]
        ticks: Option<u32>,
        /// Seed for the stochastic run modes
        #[arg(long)]
        seed: Option<u32>,
        /// Follow the master clock instead of free-running
        #[arg(long)]
        aligned: bool,
    },
    /// Sample a curve shape
    Curve {
        /// Shape name or index
        shape: String,
        #[arg(long)]
        points: Option<usize>,
        #[arg(long)]
        width: Option<usize>,
        /// Use the vertically inverted shape
        #[arg(long)]
        invert: bool,
        /// Use the time-reversed shape
        #[arg(long)]
        reverse: bool,
    },
    /// List every curve shape with its invert and reverse partners
    Shapes,
    /// Run a pattern generator on a fresh layer
    Generate {
        /// Generator: "random", "euclidean" or "init layer"
        mode: GeneratorMode,
        #[arg(long)]
        length: Option<usize>,
        /// Steps to write, e.g. "0-7,12"; all steps when omitted
        #[arg(long)]
        select: Option<String>,
        /// Seeds parameter randomization
        #[arg(long)]
        entropy: Option<u32>,
        /// Initial level of every step
        #[arg(long, default_value_t = 0.0)]
        level: f32,
        /// Parameter edit as INDEX:DELTA, applied in order
        #[arg(long = "edit", value_parser = parse_edit, allow_hyphen_values = true)]
        edits: Vec<(usize, i32)>,
        /// Apply edits with the coarse step
        #[arg(long)]
        shift: bool,
        #[arg(long)]
        width: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("sequin={level}").parse()?)
                .add_directive(format!("sequin_core={level}").parse()?),
        )
        .init();

    let config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load_default(),
    };

    match cli.command {
        Command::Steps { mode, first, last, ticks, seed, aligned } => {
            let steps = &config.steps;
            run_steps(
                mode.unwrap_or(steps.mode),
                first.unwrap_or(steps.first),
                last.unwrap_or(steps.last),
                ticks.unwrap_or(steps.ticks),
                seed.unwrap_or(steps.seed),
                aligned,
            )
        }
        Command::Curve { shape, points, width, invert, reverse } => {
            let mut shape = parse_shape(&shape)?;
            if invert {
                shape = shape.inverted();
            }
            if reverse {
                shape = shape.reversed();
            }
            print!(
                "{}",
                render::curve(
                    shape,
                    points.unwrap_or(config.curve.points),
                    width.unwrap_or(config.curve.width)
                )
            );
            Ok(())
        }
        Command::Shapes => {
            print!("{}", render::shape_table());
            Ok(())
        }
        Command::Generate { mode, length, select, entropy, level, edits, shift, width } => {
            run_generator(
                &config,
                mode,
                length,
                select.as_deref(),
                entropy,
                level,
                &edits,
                shift,
                width,
            )
        }
    }
}

fn run_steps(
    mode: RunMode,
    first: usize,
    last: usize,
    ticks: u32,
    seed: u32,
    aligned: bool,
) -> anyhow::Result<()> {
    if first > last {
        bail!("first step {} is after last step {}", first, last);
    }
    tracing::info!(
        "Tracing {} over steps {}..={} for {} ticks{}",
        mode,
        first,
        last,
        ticks,
        if aligned { " (aligned)" } else { "" }
    );

    let mut rng = Random::new(seed);
    let mut state = SequenceState::new();
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", render::step_header(mode, first, last))?;
    for tick in 0..ticks {
        if aligned {
            state.advance_aligned(tick, mode, first, last, &mut rng);
        } else {
            state.advance_free(mode, first, last, &mut rng);
        }
        writeln!(out, "{}", render::step_row(tick, &state))?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_generator(
    config: &CliConfig,
    mode: GeneratorMode,
    length: Option<usize>,
    select: Option<&str>,
    entropy: Option<u32>,
    level: f32,
    edits: &[(usize, i32)],
    shift: bool,
    width: Option<usize>,
) -> anyhow::Result<()> {
    let length = length.unwrap_or(config.generator.length);
    if length == 0 || length > STEP_COUNT {
        bail!("layer length must be between 1 and {}", STEP_COUNT);
    }
    let selected = match select {
        Some(text) => parse_selection(text)?,
        None => StepSelection::all(),
    };
    let entropy = Random::new(entropy.unwrap_or(config.generator.entropy));

    let mut layer = LayerBuilder::new(vec![level; length]);
    let mut params = Vec::new();
    {
        let mut generator = create(mode, &mut layer, &selected, entropy);
        for &(index, delta) in edits {
            if index >= generator.param_count() {
                bail!("{} has no parameter {}", mode, index);
            }
            generator.edit_param(index, delta, shift);
            generator.update();
        }
        for i in 0..generator.param_count() {
            params.push((generator.param_name(i), generator.param_text(i)));
        }
    }
    layer.commit();

    let written = (0..length).filter(|&i| selected.is_selected(i)).count();
    println!("{} ({} of {} steps selected)", mode, written, length);
    for (name, text) in params {
        println!("  {:<8} {}", name, text);
    }
    print!("{}", render::layer(layer.values(), width.unwrap_or(config.curve.width)));
    Ok(())
}

/// A shape given by name or by index
fn parse_shape(text: &str) -> anyhow::Result<CurveShape> {
    if let Ok(index) = text.parse::<usize>() {
        return Ok(CurveShape::try_from(index)?);
    }
    Ok(text.parse()?)
}

/// Parse a step list like `0-3,8,12-15`
fn parse_selection(text: &str) -> anyhow::Result<StepSelection> {
    let mut selection = StepSelection::new();
    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => (parse_step(a)?, parse_step(b)?),
            None => {
                let step = parse_step(part)?;
                (step, step)
            }
        };
        if start > end {
            bail!("empty step range {}", part);
        }
        for step in start..=end {
            selection.select(step);
        }
    }
    Ok(selection)
}

fn parse_step(text: &str) -> anyhow::Result<usize> {
    let step: usize = text
        .trim()
        .parse()
        .with_context(|| format!("invalid step {:?}", text))?;
    if step >= STEP_COUNT {
        bail!("step {} out of range (max {})", step, STEP_COUNT - 1);
    }
    Ok(step)
}

fn parse_edit(text: &str) -> Result<(usize, i32), String> {
    let (index, delta) = text
        .split_once(':')
        .ok_or_else(|| format!("expected INDEX:DELTA, got {:?}", text))?;
    let index = index.trim().parse().map_err(|e| format!("parameter index: {e}"))?;
    let delta = delta
        .trim()
        .trim_start_matches('+')
        .parse()
        .map_err(|e| format!("delta: {e}"))?;
    Ok((index, delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        let selection = parse_selection("0-3, 8,12-13").unwrap();
        assert_eq!(selection.count(), 7);
        assert!(selection.is_selected(2));
        assert!(selection.is_selected(8));
        assert!(!selection.is_selected(9));
        assert!(selection.is_selected(13));
    }

    #[test]
    fn test_parse_selection_rejects_bad_input() {
        assert!(parse_selection("3-1").is_err());
        assert!(parse_selection("x").is_err());
        assert!(parse_selection("64").is_err());
        assert!(!parse_selection("").unwrap().any());
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(parse_edit("0:+5"), Ok((0, 5)));
        assert_eq!(parse_edit("2:-3"), Ok((2, -3)));
        assert!(parse_edit("2").is_err());
        assert!(parse_edit("a:1").is_err());
    }

    #[test]
    fn test_parse_shape_by_name_or_index() {
        assert_eq!(parse_shape("3").unwrap(), CurveShape::StepDown);
        assert_eq!(parse_shape("bell").unwrap(), CurveShape::Bell);
        assert!(parse_shape("37").is_err());
        assert!(parse_shape("zigzag").is_err());
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "sequin", "generate", "euclidean", "--edit", "1:-1", "--select", "0-7",
        ])
        .unwrap();
        match cli.command {
            Command::Generate { mode, edits, select, .. } => {
                assert_eq!(mode, GeneratorMode::Euclidean);
                assert_eq!(edits, vec![(1, -1)]);
                assert_eq!(select.as_deref(), Some("0-7"));
            }
            _ => panic!("expected generate"),
        }
    }
}
