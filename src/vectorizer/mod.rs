use crate::preset::TraceOptions;
use crate::source::SourceImage;
use crate::StudioResult;

/// The external raster-to-SVG collaborator.
///
/// Implementations turn an uploaded image into SVG markup. The studio treats
/// them as opaque and only relies on this call contract.
pub trait Tracer {
    fn trace(&self, image: &SourceImage, options: &TraceOptions) -> StudioResult<String>;
}

impl<T: Tracer + ?Sized> Tracer for &T {
    fn trace(&self, image: &SourceImage, options: &TraceOptions) -> StudioResult<String> {
        (**self).trace(image, options)
    }
}

impl<T: Tracer + ?Sized> Tracer for std::sync::Arc<T> {
    fn trace(&self, image: &SourceImage, options: &TraceOptions) -> StudioResult<String> {
        (**self).trace(image, options)
    }
}

#[cfg(feature = "vectorizer-vtracer")]
pub mod vtracer;
