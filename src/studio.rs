//! The session controller.
//!
//! [`Studio`] owns the session state and reacts to user gestures. Gestures that
//! should trace hand back a [`TraceJob`]; whoever runs the job feeds the
//! resulting [`TraceCompletion`] back through [`Studio::complete`]. Every job
//! carries a sequence number and only the most recently issued one may update
//! the markup, so slow traces can never overwrite newer results.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::{Slider, SliderValues, StudioSettings};
use crate::download::{DownloadSink, export_markup};
use crate::metrics::Metrics;
use crate::preset::{Preset, TraceOptions, merge};
use crate::preview::Preview;
use crate::source::SourceImage;
use crate::vectorizer::Tracer;
use crate::{StudioError, StudioResult};

/// Whether a source image has been loaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
}

/// Mutable state of one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub source_image: Option<Arc<SourceImage>>,
    pub svg_markup: String,
    pub preset: Preset,
    pub sliders: SliderValues,
}

/// A trace request issued by the studio.
#[derive(Debug, Clone)]
pub struct TraceJob {
    pub seq: u64,
    pub source: Arc<SourceImage>,
    pub options: TraceOptions,
}

impl TraceJob {
    /// Run the job to completion on the calling thread.
    ///
    /// A panicking tracer still produces a completion, carrying a
    /// [`StudioError::Trace`].
    pub fn run<T: Tracer + ?Sized>(&self, tracer: &T) -> TraceCompletion {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            tracer.trace(&self.source, &self.options)
        }))
        .unwrap_or_else(|payload| {
            Err(StudioError::Trace(format!(
                "tracer panicked: {}",
                panic_message(payload.as_ref())
            )))
        });
        TraceCompletion {
            seq: self.seq,
            outcome,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause")
}

/// The single-shot result of a [`TraceJob`].
#[derive(Debug)]
pub struct TraceCompletion {
    pub seq: u64,
    pub outcome: StudioResult<String>,
}

/// What [`Studio::complete`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// The markup was replaced.
    Applied,
    /// The trace failed; the previous markup was kept.
    Failed,
    /// A newer job has been issued since; the completion was dropped.
    Superseded,
}

/// Session controller holding state, preset and slider values.
#[derive(Debug)]
pub struct Studio {
    state: SessionState,
    download_filename: String,
    issued: u64,
    completed: u64,
    last_error: Option<StudioError>,
}

impl Default for Studio {
    fn default() -> Self {
        Self::new(StudioSettings::default())
    }
}

impl Studio {
    pub fn new(settings: StudioSettings) -> Self {
        Self {
            state: SessionState {
                preset: settings.preset,
                sliders: settings.sliders,
                ..SessionState::default()
            },
            download_filename: settings.download_filename,
            issued: 0,
            completed: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.source_image.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    pub fn svg_markup(&self) -> &str {
        &self.state.svg_markup
    }

    pub fn source_image(&self) -> Option<&SourceImage> {
        self.state.source_image.as_deref()
    }

    pub fn preset(&self) -> Preset {
        self.state.preset
    }

    pub fn sliders(&self) -> &SliderValues {
        &self.state.sliders
    }

    /// Whether the latest issued job has not completed yet.
    pub fn is_tracing(&self) -> bool {
        self.completed != self.issued
    }

    /// The most recent upload or tracing failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&StudioError> {
        self.last_error.as_ref()
    }

    /// Take ownership of the last error, clearing it.
    pub fn take_error(&mut self) -> Option<StudioError> {
        self.last_error.take()
    }

    /// The options a trace issued now would use.
    pub fn options(&self) -> TraceOptions {
        merge(self.state.preset.options(), &self.state.sliders)
    }

    /// Handle a file pick. `None` (the picker was cancelled) changes nothing.
    pub fn upload(&mut self, file: Option<&Path>) -> Option<TraceJob> {
        let path = file?;
        match SourceImage::load(path) {
            Ok(image) => self.source_loaded(image),
            Err(err) => {
                warn!("{err}");
                self.last_error = Some(err);
                None
            }
        }
    }

    /// Store a decoded upload and trace it straight away.
    pub fn source_loaded(&mut self, image: SourceImage) -> Option<TraceJob> {
        if !image.is_accepted_type() {
            debug!("Upload {} has unexpected type {}", image.name(), image.mime());
        }
        info!("Loaded {} ({} bytes)", image.name(), image.bytes().len());
        self.state.source_image = Some(Arc::new(image));
        self.last_error = None;
        self.issue()
    }

    /// Select a preset. Traces immediately if the selection changed.
    pub fn select_preset(&mut self, preset: Preset) -> Option<TraceJob> {
        if self.state.preset == preset {
            return None;
        }
        self.state.preset = preset;
        self.issue()
    }

    /// Move a slider without releasing it. Never traces.
    pub fn slider_input(&mut self, slider: Slider, value: f64) -> f64 {
        self.state.sliders.set(slider, value)
    }

    /// Release a slider, tracing with the current values.
    pub fn slider_release(&mut self, slider: Slider) -> Option<TraceJob> {
        debug!("Released {slider} at {}", self.state.sliders.get(slider));
        self.issue()
    }

    /// Trace again with the current settings. A no-op without a source image.
    pub fn revectorize(&mut self) -> Option<TraceJob> {
        self.issue()
    }

    fn issue(&mut self) -> Option<TraceJob> {
        let source = Arc::clone(self.state.source_image.as_ref()?);
        self.issued += 1;
        let job = TraceJob {
            seq: self.issued,
            source,
            options: self.options(),
        };
        info!(
            "Trace #{} issued: preset={} colors={} pathomit={} ltres={} qtres={}",
            job.seq,
            self.state.preset,
            job.options.numberofcolors,
            job.options.pathomit,
            job.options.ltres,
            job.options.qtres
        );
        Some(job)
    }

    /// Apply a completion. Only the latest issued job is honoured.
    pub fn complete(&mut self, completion: TraceCompletion) -> CompletionStatus {
        if completion.seq != self.issued {
            debug!(
                "Trace #{} superseded by #{}, discarding",
                completion.seq, self.issued
            );
            return CompletionStatus::Superseded;
        }
        self.completed = completion.seq;
        match completion.outcome {
            Ok(markup) => {
                info!("Trace #{} complete ({} bytes)", completion.seq, markup.len());
                self.state.svg_markup = markup;
                self.last_error = None;
                CompletionStatus::Applied
            }
            Err(err) => {
                warn!("Trace #{} failed: {err}", completion.seq);
                self.last_error = Some(err);
                CompletionStatus::Failed
            }
        }
    }

    /// Issue-and-complete on the calling thread.
    pub fn run_job<T: Tracer + ?Sized>(
        &mut self,
        job: Option<TraceJob>,
        tracer: &T,
    ) -> Option<CompletionStatus> {
        let job = job?;
        Some(self.complete(job.run(tracer)))
    }

    pub fn metrics(&self) -> Option<Metrics> {
        Metrics::of(&self.state.svg_markup)
    }

    /// Export the current markup. Returns `Ok(false)` when there is nothing to export.
    pub fn download<S: DownloadSink + ?Sized>(&self, sink: &mut S) -> StudioResult<bool> {
        export_markup(sink, &self.state.svg_markup, &self.download_filename)
    }

    /// Sanitized preview of both panes.
    pub fn preview(&self) -> Preview {
        Preview::new(
            self.state.preset,
            self.source_image(),
            &self.state.svg_markup,
            self.last_error.as_ref().map(ToString::to_string),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SourceImage {
        SourceImage::from_bytes("logo.png", b"\x89PNG\r\n\x1a\nstub".to_vec())
    }

    struct EchoTracer;

    impl Tracer for EchoTracer {
        fn trace(&self, _image: &SourceImage, options: &TraceOptions) -> StudioResult<String> {
            Ok(format!("<svg data-colors=\"{}\"><path/></svg>", options.numberofcolors))
        }
    }

    mod sequencing {
        use super::*;

        #[test]
        fn stale_completion_is_discarded() {
            let mut studio = Studio::default();
            let first = studio.source_loaded(source()).unwrap();
            studio.slider_input(Slider::NumberOfColors, 16.0);
            let second = studio.slider_release(Slider::NumberOfColors).unwrap();

            let newer = second.run(&EchoTracer);
            let older = first.run(&EchoTracer);
            assert_eq!(studio.complete(newer), CompletionStatus::Applied);
            assert_eq!(studio.complete(older), CompletionStatus::Superseded);
            assert!(studio.svg_markup().contains("data-colors=\"16\""));
        }

        #[test]
        fn older_completion_arriving_first_is_discarded_too() {
            let mut studio = Studio::default();
            let first = studio.source_loaded(source()).unwrap();
            let second = studio.revectorize().unwrap();
            assert_eq!(studio.complete(first.run(&EchoTracer)), CompletionStatus::Superseded);
            assert!(studio.is_tracing());
            assert_eq!(studio.complete(second.run(&EchoTracer)), CompletionStatus::Applied);
            assert!(!studio.is_tracing());
        }

        #[test]
        fn tracing_flag_follows_latest_job() {
            let mut studio = Studio::default();
            assert!(!studio.is_tracing());
            let first = studio.source_loaded(source()).unwrap();
            assert!(studio.is_tracing());
            assert_eq!(studio.complete(first.run(&EchoTracer)), CompletionStatus::Applied);
            assert!(!studio.is_tracing());
            let failing = studio.revectorize().unwrap();
            assert!(studio.is_tracing());
            studio.complete(TraceCompletion {
                seq: failing.seq,
                outcome: Err(StudioError::Trace("boom".into())),
            });
            assert!(!studio.is_tracing());
        }

        #[test]
        fn sequence_numbers_increase() {
            let mut studio = Studio::default();
            let a = studio.source_loaded(source()).unwrap();
            let b = studio.revectorize().unwrap();
            let c = studio.select_preset(Preset::Curvy).unwrap();
            assert!(a.seq < b.seq && b.seq < c.seq);
        }
    }

    mod failures {
        use super::*;

        #[test]
        fn failed_trace_keeps_previous_markup() {
            let mut studio = Studio::default();
            let job = studio.source_loaded(source());
            studio.run_job(job, &EchoTracer);
            let before = studio.svg_markup().to_string();

            let job = studio.revectorize().unwrap();
            let status = studio.complete(TraceCompletion {
                seq: job.seq,
                outcome: Err(StudioError::Trace("boom".into())),
            });
            assert_eq!(status, CompletionStatus::Failed);
            assert_eq!(studio.svg_markup(), before);
            assert!(matches!(studio.last_error(), Some(StudioError::Trace(_))));
        }

        #[test]
        fn panicking_tracer_fails_the_job() {
            struct PanicTracer;

            impl Tracer for PanicTracer {
                fn trace(&self, _image: &SourceImage, _options: &TraceOptions) -> StudioResult<String> {
                    panic!("decoder blew up");
                }
            }

            let mut studio = Studio::default();
            let job = studio.source_loaded(source());
            studio.run_job(job, &EchoTracer);
            let before = studio.svg_markup().to_string();

            let job = studio.revectorize();
            assert_eq!(
                studio.run_job(job, &PanicTracer),
                Some(CompletionStatus::Failed)
            );
            assert_eq!(studio.svg_markup(), before);
            assert!(!studio.is_tracing());
            match studio.last_error() {
                Some(StudioError::Trace(message)) => assert!(message.contains("decoder blew up")),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn unparseable_markup_still_previews_source() {
            struct BrokenTracer;

            impl Tracer for BrokenTracer {
                fn trace(&self, _image: &SourceImage, _options: &TraceOptions) -> StudioResult<String> {
                    Ok("<svg><g><path/></svg>".into())
                }
            }

            let mut studio = Studio::default();
            let job = studio.source_loaded(source());
            studio.run_job(job, &BrokenTracer);

            let preview = studio.preview();
            assert!(preview.source_data_url.is_some());
            assert_eq!(preview.svg_markup, None);
            assert_eq!(preview.metrics.map(|m| m.path_count), Some(1));
            assert!(preview.error.is_some());
        }

        #[test]
        fn unreadable_upload_keeps_state_and_records_error() {
            let dir = tempfile::tempdir().unwrap();
            let mut studio = Studio::default();
            let job = studio.source_loaded(source());
            studio.run_job(job, &EchoTracer);

            let job = studio.upload(Some(dir.path().join("gone.png").as_path()));
            assert!(job.is_none());
            assert_eq!(studio.phase(), Phase::Ready);
            assert_eq!(studio.source_image().unwrap().name(), "logo.png");
            assert!(matches!(
                studio.last_error(),
                Some(StudioError::UnreadableUpload { .. })
            ));
        }

        #[test]
        fn success_clears_error() {
            let mut studio = Studio::default();
            let job = studio.source_loaded(source()).unwrap();
            studio.complete(TraceCompletion {
                seq: job.seq,
                outcome: Err(StudioError::Trace("boom".into())),
            });
            let job = studio.revectorize();
            studio.run_job(job, &EchoTracer);
            assert!(studio.last_error().is_none());
        }
    }

    mod phase {
        use super::*;

        #[test]
        fn idle_until_upload() {
            let mut studio = Studio::default();
            assert_eq!(studio.phase(), Phase::Idle);
            studio.source_loaded(source());
            assert_eq!(studio.phase(), Phase::Ready);
        }

        #[test]
        fn same_preset_does_not_retrace() {
            let mut studio = Studio::default();
            studio.source_loaded(source());
            assert!(studio.select_preset(Preset::Logo).is_none());
        }

        #[test]
        fn settings_seed_the_session() {
            let settings = StudioSettings::default()
                .with_preset(Preset::Posterized1)
                .with_sliders(SliderValues::default().with(Slider::PathOmit, 12.0));
            let studio = Studio::new(settings);
            assert_eq!(studio.preset(), Preset::Posterized1);
            assert_eq!(studio.sliders().path_omit, 12);
            assert_eq!(studio.options().pathomit, 12);
        }
    }
}
