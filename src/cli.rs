use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use simplelog::LevelFilter;
use vectorizer_studio::{Preset, SliderValues};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Log verbosity (off, error, warn, info, debug, trace)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trace a logo image into an SVG file
    Trace(TraceCommand),
    /// List the presets with their hints and baseline options
    Presets,
    /// Replay a scripted editing session (reads stdin when no script is given)
    Session(SessionCommand),
}

/// Tracer presets selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PresetArg {
    Logo,
    Posterized1,
    Curvy,
}

impl From<PresetArg> for Preset {
    /// Convert PresetArg to vectorizer_studio::Preset.
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Logo => Preset::Logo,
            PresetArg::Posterized1 => Preset::Posterized1,
            PresetArg::Curvy => Preset::Curvy,
        }
    }
}

#[derive(Args, Debug)]
pub struct TraceCommand {
    /// Input image path (png, jpeg, webp)
    pub input: PathBuf,
    /// Output SVG path (defaults to input name with `.svg`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also write an HTML preview page (defaults to `<name>-preview.html`)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub preview: Option<Option<PathBuf>>,
    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Args, Debug)]
pub struct SessionCommand {
    /// Session script; one gesture per line
    pub script: Option<PathBuf>,
    /// Directory downloads are saved into
    #[arg(long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,
    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Args, Debug)]
pub struct TuningArgs {
    /// Vectorization preset
    #[arg(long, value_enum, env = "VECTORIZER_PRESET", default_value_t = PresetArg::Logo)]
    pub preset: PresetArg,
    /// Number of colors (2-32)
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(2..=32))]
    pub colors: u32,
    /// Path detail, lower = more precise (0-24)
    #[arg(long = "path-omit", default_value_t = 4, value_parser = clap::value_parser!(u32).range(0..=24))]
    pub path_omit: u32,
    /// Line threshold (0.0-8.0, step 0.1)
    #[arg(long = "line-threshold", default_value_t = 1.0, value_parser = parse_line_threshold)]
    pub line_threshold: f64,
    /// Corner threshold (0-100)
    #[arg(long = "corner-threshold", default_value_t = 60, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub corner_threshold: u32,
}

impl From<&TuningArgs> for SliderValues {
    fn from(args: &TuningArgs) -> Self {
        Self {
            number_of_colors: args.colors,
            path_omit: args.path_omit,
            line_threshold: args.line_threshold,
            corner_threshold: args.corner_threshold,
        }
    }
}

fn parse_line_threshold(value: &str) -> Result<f64, String> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| format!("line threshold must be numeric, got `{value}`"))?;
    if !(0.0..=8.0).contains(&parsed) {
        return Err(format!(
            "line threshold {value} is out of range; expected 0.0-8.0"
        ));
    }
    Ok((parsed * 10.0).round() / 10.0)
}
