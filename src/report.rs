use vectorizer_studio::{ACCEPTED_MIME_TYPES, Preset, Slider, StudioError};

pub fn report_error(err: &StudioError) {
    eprintln!("{err}");
    match err {
        StudioError::UnknownPreset(_) => {
            eprintln!();
            eprintln!("Available presets:");
            for preset in Preset::ALL {
                eprintln!("  - {:<12} {}", preset.name(), preset.hint());
            }
        }
        StudioError::UnknownSlider(_) => {
            eprintln!();
            eprintln!("Available sliders:");
            for slider in Slider::ALL {
                let (min, max) = slider.bounds();
                eprintln!("  - {:<17} {} ({min}-{max})", slider.name(), slider.label());
            }
        }
        StudioError::Image(_) | StudioError::UnreadableUpload { .. } => {
            eprintln!();
            eprintln!("Supported uploads: {}", ACCEPTED_MIME_TYPES.join(", "));
        }
        _ => {}
    }
}
