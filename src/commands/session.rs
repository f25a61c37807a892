//! Handler for the `session` command: replays user gestures line by line.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::info;
use vectorizer_studio::{
    CompletionStatus, DirectorySink, Preset, Slider, Studio, StudioError, StudioResult,
    ThreadedExecutor, Tracer, VtracerTracer,
};

use crate::cli::SessionCommand;

use super::utils::build_studio;

/// One user gesture.
#[derive(Debug, Clone, PartialEq)]
enum SessionEvent {
    /// `upload` without a path is a cancelled file picker.
    Upload(Option<PathBuf>),
    Preset(Preset),
    Drag(Slider, f64),
    Release(Slider),
    Revectorize,
    Wait,
    Metrics,
    Status,
    Download,
    Preview(PathBuf),
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
fn parse_line(line: &str, number: usize) -> StudioResult<Option<SessionEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let session_error = |message: String| StudioError::Session {
        line: number,
        message,
    };
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));

    let event = match command {
        "upload" if rest.is_empty() => SessionEvent::Upload(None),
        "upload" => SessionEvent::Upload(Some(PathBuf::from(rest))),
        "preset" => SessionEvent::Preset(rest.parse()?),
        "drag" => {
            let (slider, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| session_error("usage: drag <slider> <value>".into()))?;
            let value = value
                .trim()
                .parse::<f64>()
                .map_err(|_| session_error(format!("`{}` is not a number", value.trim())))?;
            SessionEvent::Drag(slider.parse()?, value)
        }
        "release" => SessionEvent::Release(rest.parse()?),
        "revectorize" => SessionEvent::Revectorize,
        "wait" => SessionEvent::Wait,
        "metrics" => SessionEvent::Metrics,
        "status" => SessionEvent::Status,
        "download" => SessionEvent::Download,
        "preview" if !rest.is_empty() => SessionEvent::Preview(PathBuf::from(rest)),
        "preview" => return Err(session_error("usage: preview <path>".into())),
        other => return Err(session_error(format!("unknown gesture `{other}`"))),
    };
    Ok(Some(event))
}

/// Run the session command.
pub fn run(cmd: SessionCommand) -> StudioResult<()> {
    let studio = build_studio(&cmd.tuning, None);
    let executor = ThreadedExecutor::new(VtracerTracer);
    let mut sink = DirectorySink::new(&cmd.out_dir);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cmd.script {
        Some(path) => {
            let reader = BufReader::new(File::open(path)?);
            replay(reader, studio, executor, &mut sink, &mut out)
        }
        None => replay(io::stdin().lock(), studio, executor, &mut sink, &mut out),
    }
}

/// Drive a studio from a gesture script. Completions are applied between gestures.
fn replay<R, T, W>(
    reader: R,
    mut studio: Studio,
    mut executor: ThreadedExecutor<T>,
    sink: &mut DirectorySink,
    out: &mut W,
) -> StudioResult<()>
where
    R: BufRead,
    T: Tracer + Send + Sync + 'static,
    W: Write,
{
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        while let Some(completion) = executor.try_next() {
            report_completion(&studio.complete(completion), &studio, out)?;
        }
        let Some(event) = parse_line(&line, idx + 1)? else {
            continue;
        };
        apply(event, &mut studio, &mut executor, sink, out)?;
    }

    while let Some(completion) = executor.next_blocking() {
        report_completion(&studio.complete(completion), &studio, out)?;
    }
    Ok(())
}

fn apply<T, W>(
    event: SessionEvent,
    studio: &mut Studio,
    executor: &mut ThreadedExecutor<T>,
    sink: &mut DirectorySink,
    out: &mut W,
) -> StudioResult<()>
where
    T: Tracer + Send + Sync + 'static,
    W: Write,
{
    match event {
        SessionEvent::Upload(path) => {
            let picked = path.is_some();
            let job = studio.upload(path.as_deref());
            if picked
                && job.is_none()
                && let Some(err) = studio.last_error()
            {
                writeln!(out, "error: {err}")?;
            }
            executor.submit(job);
        }
        SessionEvent::Preset(preset) => {
            writeln!(out, "{}: {}", preset.label(), preset.hint())?;
            executor.submit(studio.select_preset(preset));
        }
        SessionEvent::Drag(slider, value) => {
            let applied = studio.slider_input(slider, value);
            writeln!(out, "{}: {applied}", slider.label())?;
        }
        SessionEvent::Release(slider) => executor.submit(studio.slider_release(slider)),
        SessionEvent::Revectorize => executor.submit(studio.revectorize()),
        SessionEvent::Wait => {
            while let Some(completion) = executor.next_blocking() {
                report_completion(&studio.complete(completion), studio, out)?;
            }
        }
        SessionEvent::Metrics => match studio.metrics() {
            Some(metrics) => writeln!(out, "Output: {metrics}")?,
            None => writeln!(out, "No output yet")?,
        },
        SessionEvent::Status => {
            writeln!(
                out,
                "phase={:?} preset={} tracing={} in_flight={}",
                studio.phase(),
                studio.preset(),
                studio.is_tracing(),
                executor.in_flight()
            )?;
        }
        SessionEvent::Download => {
            if studio.download(sink)? {
                writeln!(out, "SVG saved to {}", sink.dir().display())?;
            } else {
                writeln!(out, "Nothing to download")?;
            }
        }
        SessionEvent::Preview(path) => write_preview(studio, &path, out)?,
    }
    Ok(())
}

fn write_preview<W: Write>(studio: &Studio, path: &Path, out: &mut W) -> StudioResult<()> {
    let preview = studio.preview();
    if let Some(err) = &preview.error {
        writeln!(out, "error: {err}")?;
    }
    fs::write(path, preview.to_html())?;
    writeln!(out, "Preview HTML saved to {}", path.display())?;
    Ok(())
}

fn report_completion<W: Write>(
    status: &CompletionStatus,
    studio: &Studio,
    out: &mut W,
) -> StudioResult<()> {
    match status {
        CompletionStatus::Applied => {
            if let Some(metrics) = studio.metrics() {
                writeln!(out, "Output: {metrics}")?;
            }
        }
        CompletionStatus::Failed => {
            if let Some(err) = studio.last_error() {
                writeln!(out, "error: {err}")?;
            }
        }
        CompletionStatus::Superseded => info!("Dropped a superseded trace result"),
    }
    Ok(())
}
