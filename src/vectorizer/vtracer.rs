use image::RgbaImage;
use log::debug;
use visioncortex::PathSimplifyMode;
use vtracer::{ColorImage, ColorMode, Config, Hierarchical, SvgFile, convert};

use crate::preset::{ColorSampling, Layering, TraceOptions};
use crate::source::SourceImage;
use crate::{StudioError, StudioResult};

use super::Tracer;

/// Range VTracer accepts for its segment length threshold.
const LENGTH_THRESHOLD_RANGE: (f64, f64) = (3.5, 10.0);
/// Upper bound of the line threshold slider.
const LTRES_MAX: f64 = 8.0;

/// VTracer-based tracer implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct VtracerTracer;

impl Tracer for VtracerTracer {
    fn trace(&self, image: &SourceImage, options: &TraceOptions) -> StudioResult<String> {
        trace_to_svg_string(image, options)
    }
}

/// Decode the upload and trace it to an SVG string with VTracer.
pub fn trace_to_svg_string(image: &SourceImage, options: &TraceOptions) -> StudioResult<String> {
    let rgba = image::load_from_memory(image.bytes())?.to_rgba8();
    let rgba = if options.blurradius > 0 {
        image::imageops::blur(&rgba, options.blurradius as f32)
    } else {
        rgba
    };
    let svg_file = trace(rgba_to_color_image(rgba), options)?;
    Ok(svg_file.to_string())
}

/// Trace a ColorImage into an SVG using VTracer with the given options.
pub fn trace(img: ColorImage, options: &TraceOptions) -> StudioResult<SvgFile> {
    let cfg = config_for(options);
    debug!(
        "vtracer config: precision={} layer_difference={} speckle={} corner={} length={:.2}",
        cfg.color_precision,
        cfg.layer_difference,
        cfg.filter_speckle,
        cfg.corner_threshold,
        cfg.length_threshold
    );
    let svg_file = convert(img, cfg).map_err(StudioError::Trace)?;
    Ok(svg_file)
}

/// Map the tracer options record onto a VTracer configuration.
pub fn config_for(options: &TraceOptions) -> Config {
    let colors = options.numberofcolors.max(2);
    // Bits per channel needed to hold `colors` distinct levels.
    let mut color_precision = (u32::BITS - (colors - 1).leading_zeros()).clamp(1, 8) as i32;
    if options.colorsampling == ColorSampling::Disabled {
        color_precision = (color_precision - 1).max(1);
    }

    let (min_len, max_len) = LENGTH_THRESHOLD_RANGE;
    let length_threshold =
        (min_len + options.ltres * (max_len - min_len) / LTRES_MAX).clamp(min_len, max_len);

    Config {
        color_mode: if colors <= 2 {
            ColorMode::Binary
        } else {
            ColorMode::Color
        },
        hierarchical: match options.layering {
            Layering::Sequential => Hierarchical::Stacked,
            Layering::Parallel => Hierarchical::Cutout,
        },
        mode: PathSimplifyMode::Spline,
        filter_speckle: options.pathomit as usize,
        color_precision,
        layer_difference: (256 / colors).clamp(1, 255) as i32,
        corner_threshold: options.qtres.round().clamp(0.0, 180.0) as i32,
        length_threshold,
        max_iterations: if options.linefilter { 20 } else { 10 },
        splice_threshold: if options.rightangleenhance { 45 } else { 90 },
        path_precision: Some(options.roundcoords),
    }
}

fn rgba_to_color_image(rgba: RgbaImage) -> ColorImage {
    let (w, h) = rgba.dimensions();
    ColorImage {
        pixels: rgba.into_raw(),
        width: w as usize,
        height: h as usize,
    }
}
