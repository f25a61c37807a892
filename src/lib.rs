pub mod config;
pub mod download;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod preset;
pub mod preview;
pub mod source;
pub mod studio;
pub mod vectorizer;

pub use config::{DOWNLOAD_FILENAME, Slider, SliderValues, StudioSettings};
pub use download::{DirectorySink, DownloadSink, SVG_BLOB_MIME, export_markup};
pub use error::{StudioError, StudioResult};
pub use executor::ThreadedExecutor;
pub use metrics::Metrics;
pub use preset::{Preset, TraceOptions, merge};
pub use preview::{Preview, sanitize_svg, svg_data_url};
pub use source::{ACCEPTED_MIME_TYPES, SourceImage};
pub use studio::{CompletionStatus, Phase, SessionState, Studio, TraceCompletion, TraceJob};
pub use vectorizer::Tracer;
#[cfg(feature = "vectorizer-vtracer")]
pub use vectorizer::vtracer::{VtracerTracer, trace_to_svg_string};
