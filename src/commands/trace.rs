use std::fs;
use std::path::Path;

use log::info;
use vectorizer_studio::{
    CompletionStatus, DirectorySink, SourceImage, StudioError, StudioResult, VtracerTracer,
};

use crate::cli::TraceCommand;

use super::utils::{build_studio, derive_svg_path, resolve_export_path};

/// The main function to run the trace command.
pub fn run(cmd: TraceCommand) -> StudioResult<()> {
    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_svg_path(&cmd.input));
    let filename = output_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned());
    let mut studio = build_studio(&cmd.tuning, filename.as_deref());

    let source = SourceImage::load(&cmd.input)?;
    let job = studio.source_loaded(source);
    match studio.run_job(job, &VtracerTracer) {
        Some(CompletionStatus::Applied) => {}
        Some(CompletionStatus::Failed) => {
            return Err(studio
                .take_error()
                .unwrap_or_else(|| StudioError::Trace("tracer reported no result".into())));
        }
        Some(CompletionStatus::Superseded) | None => {
            return Err(StudioError::Trace("no trace was issued".into()));
        }
    }

    let out_dir = output_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut sink = DirectorySink::new(out_dir);
    studio.download(&mut sink)?;
    println!("SVG saved to {}", output_path.display());

    if let Some(metrics) = studio.metrics() {
        println!("Output: {metrics}");
    }

    if let Some(path) = resolve_export_path(&cmd.preview, &cmd.input, "preview", "html") {
        let html = studio.preview().to_html();
        fs::write(&path, html)?;
        info!("Preview written for preset {}", studio.preset());
        println!("Preview HTML saved to {}", path.display());
    }

    Ok(())
}
