use std::path::{Path, PathBuf};

use vectorizer_studio::{Studio, StudioSettings};

use crate::cli::TuningArgs;

/// Build a studio seeded with the preset and slider flags.
pub fn build_studio(tuning: &TuningArgs, download_filename: Option<&str>) -> Studio {
    let mut settings = StudioSettings::default()
        .with_preset(tuning.preset.into())
        .with_sliders(tuning.into());
    if let Some(filename) = download_filename {
        settings = settings.with_download_filename(filename);
    }
    Studio::new(settings)
}

/// Derive a variant file path by appending a suffix before the extension.
pub fn derive_variant_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut derived = input.to_path_buf();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| suffix.to_string());
    let filename = format!("{}-{}.{}", stem, suffix, extension);
    derived.set_file_name(filename);
    derived
}

/// Derive an SVG file path by changing the extension to "svg".
pub fn derive_svg_path(input: &Path) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension("svg");
    path
}

/// Resolve an optional export flag: `Some(None)` means "use the derived default".
pub fn resolve_export_path(
    flag: &Option<Option<PathBuf>>,
    input: &Path,
    suffix: &str,
    extension: &str,
) -> Option<PathBuf> {
    match flag {
        Some(Some(path)) => Some(path.clone()),
        Some(None) => Some(derive_variant_path(input, suffix, extension)),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_path_replaces_extension() {
        assert_eq!(
            derive_svg_path(Path::new("art/logo.png")),
            PathBuf::from("art/logo.svg")
        );
    }

    #[test]
    fn variant_path_keeps_directory() {
        assert_eq!(
            derive_variant_path(Path::new("art/logo.png"), "preview", "html"),
            PathBuf::from("art/logo-preview.html")
        );
    }

    #[test]
    fn export_path_resolution() {
        let input = Path::new("logo.webp");
        assert_eq!(resolve_export_path(&None, input, "preview", "html"), None);
        assert_eq!(
            resolve_export_path(&Some(None), input, "preview", "html"),
            Some(PathBuf::from("logo-preview.html"))
        );
        assert_eq!(
            resolve_export_path(&Some(Some("x.html".into())), input, "preview", "html"),
            Some(PathBuf::from("x.html"))
        );
    }
}
