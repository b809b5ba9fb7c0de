//! Metadata heuristics for PDF links
//!
//! Every extractor works on plain strings (file names and link text) and
//! returns None when it finds nothing; none of them can fail.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static NOISE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\[pdf\]|\(pdf\)|\b(click here|read more|full text|download|pdf|view|open|file|document)\b",
    )
    .expect("hardcoded regex pattern is valid")
});

static ISBN13_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d])(97[89][-–]?\d{10})(?:$|[^\d])")
        .expect("hardcoded regex pattern is valid")
});

static ISBN10_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)isbn(?:-?10)?[-_:\s]*(\d{9}[\dx])(?:$|[^\d])")
        .expect("hardcoded regex pattern is valid")
});

static BY_AUTHOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[-_\s.])(?i:by)[-_\s]+([A-Z][A-Za-z]*(?:[-_\s]+[A-Z][A-Za-z]*){0,3})")
        .expect("hardcoded regex pattern is valid")
});

static AUTHOR_BOOK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-z]+[_\s][A-Z][a-z]+)[-_\s](?i:book)(?:$|[^A-Za-z])")
        .expect("hardcoded regex pattern is valid")
});

/// An author name, plus the title when the name was split off a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorMatch {
    pub author: String,
    pub title: Option<String>,
}

/// Last path segment of the URL, percent-decoded, extension kept
pub fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(percent_decode)
        .unwrap_or_default()
}

/// File name without a trailing `.pdf`
pub fn file_stem(filename: &str) -> &str {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        &filename[..filename.len() - 4]
    } else {
        filename
    }
}

/// Replaces name separators with spaces and collapses whitespace
pub fn separators_to_spaces(text: &str) -> String {
    text.replace(['_', '-', '+', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes noise phrases and title-cases what remains
pub fn clean_title(text: &str) -> String {
    let stripped = NOISE_REGEX.replace_all(text, " ");
    stripped
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title from a file stem, falling back to link text when the stem is too short
pub fn extract_title(stem: &str, link_text: &str) -> String {
    let from_name = clean_title(&separators_to_spaces(stem));
    if from_name.chars().count() >= 3 {
        return from_name;
    }

    let from_text = clean_title(link_text);
    if from_text.chars().count() >= 3 {
        return from_text;
    }

    let fallback = separators_to_spaces(stem);
    if fallback.is_empty() {
        link_text.trim().to_string()
    } else {
        fallback
    }
}

/// Author name from a file stem or link text
///
/// Recognized shapes, in order:
/// - `..._by_First_Last`
/// - `First_Last_book`
/// - `Title-First_Last` (the part after the last `-` is two or three names)
pub fn extract_author(text: &str) -> Option<AuthorMatch> {
    if let Some(author) = BY_AUTHOR_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| leading_capitalized_words(m.as_str()))
        .filter(|name| is_likely_person_name(name))
    {
        return Some(AuthorMatch {
            author,
            title: None,
        });
    }

    if let Some(author) = AUTHOR_BOOK_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| separators_to_spaces(m.as_str()))
        .filter(|name| is_likely_person_name(name))
    {
        return Some(AuthorMatch {
            author,
            title: None,
        });
    }

    let (title, name) = text.rsplit_once('-')?;
    let name = separators_to_spaces(name);
    let words = name.split(' ').count();
    if (2..=3).contains(&words) && is_likely_person_name(&name) && !title.trim().is_empty() {
        return Some(AuthorMatch {
            author: name,
            title: Some(title.to_string()),
        });
    }

    None
}

/// One to four capitalized, purely alphabetic words; a lone word needs three letters
pub fn is_likely_person_name(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.is_empty() || words.len() > 4 {
        return false;
    }

    let all_capitalized = words.iter().all(|word| {
        word.chars().next().is_some_and(char::is_uppercase)
            && word.chars().all(char::is_alphabetic)
    });

    all_capitalized && (words.len() > 1 || words[0].chars().count() > 2)
}

/// ISBN-13 (`978`/`979` prefix), or ISBN-10 when labelled `isbn`; dashes removed
pub fn extract_isbn(text: &str) -> Option<String> {
    ISBN13_REGEX
        .captures(text)
        .or_else(|| ISBN10_REGEX.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .chars()
                .filter(|c| *c != '-' && *c != '–')
                .collect::<String>()
                .to_ascii_uppercase()
        })
}

/// First standalone four-digit number in `[1500, current_year + 1]`
pub fn extract_year(text: &str, current_year: i32) -> Option<i32> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| run.len() == 4)
        .filter_map(|run| run.parse::<i32>().ok())
        .find(|year| (1500..=current_year + 1).contains(year))
}

fn leading_capitalized_words(text: &str) -> String {
    separators_to_spaces(text)
        .split(' ')
        .take_while(|word| word.chars().next().is_some_and(char::is_uppercase))
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn percent_decode(segment: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes())).into_owned()
}
