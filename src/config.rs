use std::fmt;
use std::str::FromStr;

use crate::StudioError;
use crate::preset::Preset;

/// File name used when exporting the current markup.
pub const DOWNLOAD_FILENAME: &str = "vectorized-logo.svg";

/// The four user-facing tuning sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    NumberOfColors,
    PathOmit,
    LineThreshold,
    CornerThreshold,
}

impl Slider {
    pub const ALL: [Slider; 4] = [
        Slider::NumberOfColors,
        Slider::PathOmit,
        Slider::LineThreshold,
        Slider::CornerThreshold,
    ];

    /// Inclusive value range of the slider.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Slider::NumberOfColors => (2.0, 32.0),
            Slider::PathOmit => (0.0, 24.0),
            Slider::LineThreshold => (0.0, 8.0),
            Slider::CornerThreshold => (0.0, 100.0),
        }
    }

    pub fn step(self) -> f64 {
        match self {
            Slider::LineThreshold => 0.1,
            _ => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Slider::NumberOfColors => "Number of colors",
            Slider::PathOmit => "Path detail (lower = more precise)",
            Slider::LineThreshold => "Line threshold",
            Slider::CornerThreshold => "Corner threshold",
        }
    }

    /// Name accepted on the command line and in session scripts.
    pub fn name(self) -> &'static str {
        match self {
            Slider::NumberOfColors => "colors",
            Slider::PathOmit => "path-omit",
            Slider::LineThreshold => "line-threshold",
            Slider::CornerThreshold => "corner-threshold",
        }
    }

    /// Clamp to the bounds and snap to the step, the way a range input does.
    pub fn normalize(self, value: f64) -> f64 {
        let (min, max) = self.bounds();
        if !value.is_finite() {
            return min;
        }
        let step = self.step();
        let snapped = ((value.clamp(min, max) - min) / step).round() * step + min;
        // Keep one decimal exact for the 0.1 step.
        let snapped = (snapped * 10.0).round() / 10.0;
        snapped.clamp(min, max)
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Slider {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "colors" | "numberofcolors" | "number-of-colors" => Ok(Slider::NumberOfColors),
            "path-omit" | "pathomit" => Ok(Slider::PathOmit),
            "line-threshold" | "ltres" => Ok(Slider::LineThreshold),
            "corner-threshold" | "qtres" => Ok(Slider::CornerThreshold),
            _ => Err(StudioError::UnknownSlider(s.to_string())),
        }
    }
}

/// Explicit slider values; these always win over preset baselines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderValues {
    pub number_of_colors: u32,
    pub path_omit: u32,
    pub line_threshold: f64,
    pub corner_threshold: u32,
}

impl Default for SliderValues {
    fn default() -> Self {
        Self {
            number_of_colors: 8,
            path_omit: 4,
            line_threshold: 1.0,
            corner_threshold: 60,
        }
    }
}

impl SliderValues {
    /// Current value of a slider as displayed next to it.
    pub fn get(&self, slider: Slider) -> f64 {
        match slider {
            Slider::NumberOfColors => f64::from(self.number_of_colors),
            Slider::PathOmit => f64::from(self.path_omit),
            Slider::LineThreshold => self.line_threshold,
            Slider::CornerThreshold => f64::from(self.corner_threshold),
        }
    }

    /// Set a slider, returning the value actually stored after clamping and snapping.
    pub fn set(&mut self, slider: Slider, value: f64) -> f64 {
        let value = slider.normalize(value);
        match slider {
            Slider::NumberOfColors => self.number_of_colors = value as u32,
            Slider::PathOmit => self.path_omit = value as u32,
            Slider::LineThreshold => self.line_threshold = value,
            Slider::CornerThreshold => self.corner_threshold = value as u32,
        }
        value
    }

    /// Builder-style variant of [`SliderValues::set`].
    pub fn with(mut self, slider: Slider, value: f64) -> Self {
        self.set(slider, value);
        self
    }
}

/// Initial settings for a studio session.
#[derive(Debug, Clone)]
pub struct StudioSettings {
    /// Preset selected when the session starts.
    pub preset: Preset,
    /// Slider positions when the session starts.
    pub sliders: SliderValues,
    /// File name used for exports.
    pub download_filename: String,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            sliders: SliderValues::default(),
            download_filename: DOWNLOAD_FILENAME.to_string(),
        }
    }
}

impl StudioSettings {
    /// Set the initial preset.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Set the initial slider values.
    pub fn with_sliders(mut self, sliders: SliderValues) -> Self {
        self.sliders = sliders;
        self
    }

    /// Set the export file name.
    pub fn with_download_filename(mut self, filename: impl Into<String>) -> Self {
        self.download_filename = filename.into();
        self
    }
}
