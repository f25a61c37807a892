//! Tracer presets and the options record handed to the tracer.
//!
//! A preset supplies a baseline [`TraceOptions`]; the user's [`SliderValues`]
//! are layered on top with [`merge`], always winning for the four shared keys.

use std::fmt;
use std::str::FromStr;

use crate::config::SliderValues;
use crate::StudioError;

/// Named bundle of baseline tracer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    #[default]
    Logo,
    Posterized1,
    Curvy,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Logo, Preset::Posterized1, Preset::Curvy];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Logo => "logo",
            Preset::Posterized1 => "posterized1",
            Preset::Curvy => "curvy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::Logo => "Logo (recommended)",
            Preset::Posterized1 => "Posterized",
            Preset::Curvy => "Curvy",
        }
    }

    /// Help text shown under the preset selector.
    pub fn hint(self) -> &'static str {
        match self {
            Preset::Logo => {
                "Best default for most logos with balanced edge quality and shape precision."
            }
            Preset::Posterized1 => "Strong color blocks for flat icon styles and simplified marks.",
            Preset::Curvy => "Smoother curves for calligraphic or rounded logos.",
        }
    }

    /// Baseline options implied by the preset, before slider overrides.
    pub fn options(self) -> TraceOptions {
        let base = TraceOptions::default();
        match self {
            // `logo` has no dedicated tracer table and resolves to the defaults.
            Preset::Logo => base,
            Preset::Posterized1 => TraceOptions {
                colorsampling: ColorSampling::Disabled,
                numberofcolors: 2,
                ..base
            },
            Preset::Curvy => TraceOptions {
                ltres: 0.01,
                linefilter: true,
                rightangleenhance: false,
                ..base
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StudioError::UnknownPreset(s.to_string()))
    }
}

/// How the tracer picks its initial palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSampling {
    /// Fixed, evenly spread palette.
    Disabled,
    Random,
    Deterministic,
}

/// Layer stacking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layering {
    Sequential,
    Parallel,
}

/// The options record passed to a [`Tracer`](crate::Tracer).
///
/// Field names follow the tracer's option keys.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceOptions {
    pub numberofcolors: u32,
    pub pathomit: u32,
    pub ltres: f64,
    pub qtres: f64,
    pub colorsampling: ColorSampling,
    pub rightangleenhance: bool,
    pub linefilter: bool,
    pub blurradius: u32,
    pub layering: Layering,
    /// Decimal places kept in path coordinates.
    pub roundcoords: u32,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            numberofcolors: 16,
            pathomit: 8,
            ltres: 1.0,
            qtres: 1.0,
            colorsampling: ColorSampling::Deterministic,
            rightangleenhance: true,
            linefilter: false,
            blurradius: 0,
            layering: Layering::Sequential,
            roundcoords: 1,
        }
    }
}

/// Layer the explicit slider values over a preset baseline.
pub fn merge(baseline: TraceOptions, sliders: &SliderValues) -> TraceOptions {
    TraceOptions {
        numberofcolors: sliders.number_of_colors,
        pathomit: sliders.path_omit,
        ltres: sliders.line_threshold,
        qtres: f64::from(sliders.corner_threshold),
        ..baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Slider;

    mod presets {
        use super::*;

        #[test]
        fn logo_is_tracer_default() {
            assert_eq!(Preset::Logo.options(), TraceOptions::default());
        }

        #[test]
        fn posterized_flattens_palette() {
            let options = Preset::Posterized1.options();
            assert_eq!(options.numberofcolors, 2);
            assert_eq!(options.colorsampling, ColorSampling::Disabled);
            assert_eq!(options.ltres, 1.0);
        }

        #[test]
        fn curvy_relaxes_line_fitting() {
            let options = Preset::Curvy.options();
            assert_eq!(options.ltres, 0.01);
            assert!(options.linefilter);
            assert!(!options.rightangleenhance);
        }

        #[test]
        fn parses_names_case_insensitively() {
            assert_eq!("Curvy".parse::<Preset>().unwrap(), Preset::Curvy);
            assert_eq!(" posterized1 ".parse::<Preset>().unwrap(), Preset::Posterized1);
            assert!(matches!(
                "sharp".parse::<Preset>(),
                Err(StudioError::UnknownPreset(_))
            ));
        }

        #[test]
        fn every_preset_has_a_hint() {
            for preset in Preset::ALL {
                assert!(!preset.hint().is_empty());
                assert!(!preset.label().is_empty());
            }
        }
    }

    mod merge {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn sliders_override_shared_keys() {
                let merged = merge(Preset::Curvy.options(), &SliderValues::default());
                assert_eq!(merged.numberofcolors, 8);
                assert_eq!(merged.pathomit, 4);
                assert_eq!(merged.ltres, 1.0);
                assert_eq!(merged.qtres, 60.0);
            }

            #[test]
            fn preset_only_keys_survive() {
                let merged = merge(Preset::Curvy.options(), &SliderValues::default());
                assert!(merged.linefilter);
                assert!(!merged.rightangleenhance);

                let merged = merge(Preset::Posterized1.options(), &SliderValues::default());
                assert_eq!(merged.colorsampling, ColorSampling::Disabled);
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                #[test]
                fn explicit_values_always_win(
                    colors in 2u32..=32,
                    omit in 0u32..=24,
                    ltres_tenths in 0u32..=80,
                    corner in 0u32..=100,
                    preset_idx in 0usize..3,
                ) {
                    let sliders = SliderValues::default()
                        .with(Slider::NumberOfColors, f64::from(colors))
                        .with(Slider::PathOmit, f64::from(omit))
                        .with(Slider::LineThreshold, f64::from(ltres_tenths) / 10.0)
                        .with(Slider::CornerThreshold, f64::from(corner));
                    let preset = Preset::ALL[preset_idx];
                    let merged = merge(preset.options(), &sliders);

                    prop_assert_eq!(merged.numberofcolors, colors);
                    prop_assert_eq!(merged.pathomit, omit);
                    prop_assert_eq!(merged.ltres, sliders.line_threshold);
                    prop_assert_eq!(merged.qtres, f64::from(corner));
                    prop_assert_eq!(merged.linefilter, preset.options().linefilter);
                }
            }
        }
    }
}
