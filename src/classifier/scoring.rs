//! Confidence scoring

/// What the heuristics found out about one PDF link
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreSignals {
    /// File name matches a configured book pattern
    pub book_pattern_in_name: bool,
    /// Link text contains a book keyword
    pub book_keyword_in_text: bool,
    pub has_author: bool,
    pub has_isbn: bool,
    pub has_year: bool,
    /// Size in bytes, when known
    pub size: Option<u64>,
}

const BOOK_PATTERN_WEIGHT: f64 = 0.3;
const BOOK_KEYWORD_WEIGHT: f64 = 0.2;
const AUTHOR_WEIGHT: f64 = 0.2;
const ISBN_WEIGHT: f64 = 0.3;
const BOOK_SIZE_WEIGHT: f64 = 0.2;
const YEAR_WEIGHT: f64 = 0.1;
const SMALL_FILE_PENALTY: f64 = 0.3;

/// Likelihood that a PDF is a book, in `[0, 1]`
///
/// With `min_book_size` set, a known size at or above it adds to the score
/// and a known size below it subtracts. Without it, size is ignored.
pub fn confidence(signals: &ScoreSignals, min_book_size: Option<u64>) -> f64 {
    let mut score: f64 = 0.0;

    if signals.book_pattern_in_name {
        score += BOOK_PATTERN_WEIGHT;
    }
    if signals.book_keyword_in_text {
        score += BOOK_KEYWORD_WEIGHT;
    }
    if signals.has_author {
        score += AUTHOR_WEIGHT;
    }
    if signals.has_isbn {
        score += ISBN_WEIGHT;
    }
    if signals.has_year {
        score += YEAR_WEIGHT;
    }

    if let (Some(size), Some(min_book_size)) = (signals.size, min_book_size) {
        if size >= min_book_size {
            score += BOOK_SIZE_WEIGHT;
        } else {
            score -= SMALL_FILE_PENALTY;
        }
    }

    score.clamp(0.0, 1.0)
}
