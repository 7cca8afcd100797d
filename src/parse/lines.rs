use anyhow::Result;
use regex::Regex;

/// Literal line inserted between the OCR texts of two images.
pub const BOUNDARY_MARKER: &str = "---IMAGE BREAK---";

/// Separator used when joining per-image texts into one stream.
pub const IMAGE_JOINER: &str = "\n\n---IMAGE BREAK---\n\n";

/// The "/0 Eliminations" suffix printed after every lobby name.
/// OCR regularly reads the zero as a letter o.
const ELIMINATION_SUFFIX_PATTERN: &str = r"(?i)/[0o]\s*eliminations?";

/// A slot number left in front of a name, e.g. "06 REharshOG".
const LEADING_NUMBER_PATTERN: &str = r"^\s*\d{1,2}\s+";

const WHITESPACE_RUN_PATTERN: &str = r"\s{2,}";

/// Joins per-image OCR texts into a single stream separated by boundary markers.
pub fn join_images<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(IMAGE_JOINER)
}

/// Splits raw OCR text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Returns true for the boundary marker line.
pub fn is_boundary(line: &str) -> bool {
    line.contains(BOUNDARY_MARKER)
}

/// Returns true if the line is non-empty and made of ASCII digits only.
pub fn is_purely_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Parses a 1-2 digit slot/rank label, accepting only `1..=max_id`.
pub fn parse_id(digits: &str, max_id: u8) -> Option<u8> {
    if digits.is_empty() || digits.len() > 2 || !is_purely_numeric(digits) {
        return None;
    }
    digits
        .parse::<u8>()
        .ok()
        .filter(|&n| n >= 1 && n <= max_id)
}

/// Strips OCR noise around player names.
pub struct NameCleaner {
    elimination_suffix: Regex,
    leading_number: Regex,
    whitespace_run: Regex,
}

impl NameCleaner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            elimination_suffix: Regex::new(ELIMINATION_SUFFIX_PATTERN)?,
            leading_number: Regex::new(LEADING_NUMBER_PATTERN)?,
            whitespace_run: Regex::new(WHITESPACE_RUN_PATTERN)?,
        })
    }

    /// Removes every elimination suffix, leaving the surrounding text trimmed.
    pub fn strip_elimination_suffix(&self, text: &str) -> String {
        self.elimination_suffix
            .replace_all(text, "")
            .trim()
            .to_string()
    }

    /// Full cleanup: suffix, leading slot number, repeated whitespace.
    pub fn clean(&self, name: &str) -> String {
        let stripped = self.elimination_suffix.replace_all(name, "");
        let stripped = self.leading_number.replace(&stripped, "");
        self.whitespace_run
            .replace_all(&stripped, " ")
            .trim()
            .to_string()
    }
}
