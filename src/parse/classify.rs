use serde::Serialize;

/// Keyword family printed on lobby screens ("/0 Eliminations").
const ELIMINATION_KEYWORDS: &[&str] = &["eliminat"];

/// Keyword family printed on result screens ("3 finishes").
const FINISH_KEYWORDS: &[&str] = &["finish"];

/// Lobby header ("58 Remaining") that survives OCR even when names don't.
const REMAINING_KEYWORD: &str = "remaining";

/// Which screen an OCR text came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Lobby,
    Result,
    Unknown,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Lobby => write!(f, "lobby"),
            DocumentKind::Result => write!(f, "result"),
            DocumentKind::Unknown => write!(f, "unknown"),
        }
    }
}

fn count_keywords(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().map(|k| haystack.matches(k).count()).sum()
}

/// Classifies one image's OCR text by keyword frequency.
///
/// When both keyword families show up the larger count wins, ties go to lobby.
pub fn classify_document(text: &str) -> DocumentKind {
    let lower = text.to_lowercase();
    let eliminations = count_keywords(&lower, ELIMINATION_KEYWORDS);
    let finishes = count_keywords(&lower, FINISH_KEYWORDS);

    match (eliminations, finishes) {
        (0, 0) if lower.contains(REMAINING_KEYWORD) => DocumentKind::Lobby,
        (0, 0) => DocumentKind::Unknown,
        (_, 0) => DocumentKind::Lobby,
        (0, _) => DocumentKind::Result,
        (e, f) if e >= f => DocumentKind::Lobby,
        _ => DocumentKind::Result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_text() {
        let text = "05\nAlpha /0 Eliminations\nBravo /0 Eliminations";
        assert_eq!(classify_document(text), DocumentKind::Lobby);
    }

    #[test]
    fn test_result_text() {
        let text = "1\nAlpha 3 finishes\nBravo 2 FINISHES";
        assert_eq!(classify_document(text), DocumentKind::Result);
    }

    #[test]
    fn test_remaining_alone_is_lobby() {
        assert_eq!(classify_document("58 Remaining"), DocumentKind::Lobby);
    }

    #[test]
    fn test_mixed_majority_wins() {
        let text = "Alpha 1 finish\nBravo 0 finishes\nCharlie /0 Eliminations";
        assert_eq!(classify_document(text), DocumentKind::Result);
    }

    #[test]
    fn test_mixed_tie_is_lobby() {
        let text = "Alpha 1 finish\nCharlie /0 Eliminations";
        assert_eq!(classify_document(text), DocumentKind::Lobby);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify_document(""), DocumentKind::Unknown);
        assert_eq!(classify_document("Tap to continue"), DocumentKind::Unknown);
    }
}
