use std::fmt;

/// Size and complexity of a piece of SVG markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub path_count: usize,
    pub size_bytes: usize,
}

impl Metrics {
    /// Derive metrics from markup. Returns `None` for empty markup.
    pub fn of(markup: &str) -> Option<Self> {
        if markup.is_empty() {
            return None;
        }
        Some(Self {
            path_count: count_paths(markup),
            size_bytes: markup.len(),
        })
    }

    /// UTF-8 size in kibibytes.
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    /// Size in KB with one decimal place, as displayed. Ties round up.
    pub fn size_kb_display(&self) -> String {
        let tenths = (self.size_bytes * 10 + 512) / 1024;
        format!("{}.{}", tenths / 10, tenths % 10)
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} paths · {} KB", self.path_count, self.size_kb_display())
    }
}

/// Count `<path` openings followed by a word boundary, so `<pathology>` does not count.
pub fn count_paths(markup: &str) -> usize {
    const NEEDLE: &str = "<path";
    markup
        .match_indices(NEEDLE)
        .filter(|(idx, _)| {
            markup[idx + NEEDLE.len()..]
                .chars()
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
        })
        .count()
}
