use vectorizer_studio::{Preset, StudioResult};

/// Print every preset with its hint and baseline options.
pub fn run() -> StudioResult<()> {
    for preset in Preset::ALL {
        println!("{}", describe(preset));
    }
    Ok(())
}

fn describe(preset: Preset) -> String {
    let options = preset.options();
    format!(
        "{}: {}\n    {}\n    numberofcolors={} pathomit={} ltres={} qtres={} colorsampling={:?} rightangleenhance={} linefilter={}",
        preset.name(),
        preset.label(),
        preset.hint(),
        options.numberofcolors,
        options.pathomit,
        options.ltres,
        options.qtres,
        options.colorsampling,
        options.rightangleenhance,
        options.linefilter
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_uses_plain_separator() {
        for preset in Preset::ALL {
            let text = describe(preset);
            let header = text.lines().next().unwrap();
            assert_eq!(header, format!("{}: {}", preset.name(), preset.label()));
            assert!(header.is_ascii());
        }
    }

    #[test]
    fn lists_baseline_options() {
        let text = describe(Preset::Posterized1);
        assert!(text.contains("numberofcolors=2"));
        assert!(text.contains(Preset::Posterized1.hint()));
    }
}
