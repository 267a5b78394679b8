//! Lexical and statistical signals computed over article text.
//!
//! Every function here is pure and returns evidence (matched phrases,
//! counts, a score). Deciding pass/fail is the gate's job.

use std::sync::LazyLock;

use regex::Regex;

/// Characters of the opening inspected for stock introductions.
const OPENING_WINDOW_CHARS: usize = 200;

/// Characters of the ending inspected for hard-sell phrases.
const CLOSING_WINDOW_CHARS: usize = 500;

/// Sentence fragments this short (in chars) are ignored for burstiness.
const MIN_SENTENCE_CHARS: usize = 2;

/// Marketing and AI-cliché phrases that must not appear.
pub const FORBIDDEN_PHRASES: &[&str] = &[
    "dive into",
    "dive deep",
    "unlock",
    "unleash",
    "harness",
    "leverage",
    "in this article",
    "let's explore",
    "without further ado",
    "in today's world",
    "at the end of the day",
    "it's important to note",
    "in conclusion",
    "to summarize",
    "game-changer",
    "revolutionary",
    "transformative",
    "seamlessly",
    "robust",
    "cutting-edge",
    "holistic approach",
];

/// Absolute or miracle-claim terms.
pub const HYPERBOLIC_TERMS: &[&str] = &[
    "miracle",
    "cure",
    "100%",
    "guaranteed",
    "perfect",
    "instant",
    "overnight transformation",
    "completely eliminate",
];

/// Stock openings, anchored at the start of the (trimmed) opening window.
pub const GENERIC_OPENING_PATTERNS: &[&str] = &[
    r"^in this article",
    r"^today we",
    r"^welcome to",
    r"^let's talk about",
    r"^have you ever wondered",
];

pub const HARD_SELL_PHRASES: &[&str] = &[
    "click here",
    "buy now",
    "don't miss",
    "order today",
    "limited time",
    "act now",
];

pub const CONTRACTIONS: &[&str] = &[
    "i'm", "i've", "i'll", "i'd", "you're", "you've", "you'll", "you'd", "he's", "he'll", "he'd",
    "she's", "she'll", "she'd", "it's", "it'll", "it'd", "we're", "we've", "we'll", "we'd",
    "they're", "they've", "they'll", "they'd", "that's", "that'll", "that'd", "who's", "who'll",
    "who'd", "what's", "what'll", "what'd", "where's", "where'll", "where'd", "when's", "when'll",
    "when'd", "why's", "why'll", "why'd", "how's", "how'll", "how'd", "isn't", "aren't", "wasn't",
    "weren't", "hasn't", "haven't", "hadn't", "doesn't", "don't", "didn't", "won't", "wouldn't",
    "can't", "couldn't", "shouldn't", "mightn't", "mustn't", "let's", "here's", "there's",
];

pub const SENSORY_WORDS: &[&str] = &[
    "texture", "smooth", "silky", "scent", "aroma", "feel", "soft", "rich", "creamy", "velvety",
    "buttery", "warm", "cool", "thick", "light", "heavy", "gentle", "rough", "dry", "moist",
    "oily", "greasy", "fresh", "clean",
];

pub const EMOTIONAL_WORDS: &[&str] = &[
    "comfort",
    "relief",
    "confidence",
    "frustration",
    "finally",
    "love",
    "hate",
    "joy",
    "happy",
    "sad",
    "anxious",
    "calm",
    "excited",
    "worried",
    "hopeful",
    "disappointed",
    "satisfied",
    "grateful",
    "surprised",
    "amazed",
    "delighted",
    "pleased",
];

pub const BALANCE_INDICATORS: &[&str] = &[
    "results vary",
    "not for everyone",
    "some people find",
    "in my experience",
    "your mileage may vary",
    "that said",
    "however",
    "although",
    "might not",
    "may not",
    "depends on",
    "individual",
    "varies",
];

pub const MESSY_TRANSITION_MARKERS: &[&str] = &[
    "anyway",
    "actually",
    "speaking of",
    "i digress",
    "back to",
    "oh, and",
    "sorry",
    "where was i",
    "but anyway",
    "let me back up",
    "tangent",
    "off-topic",
    "sidetracked",
];

pub const FRESHNESS_MARKERS: &[&str] = &[
    "lately",
    "recently",
    "this season",
    "past few months",
    "this year",
    "just",
    "other day",
    "other week",
    "last month",
    "last week",
    "these days",
    "nowadays",
];

static OPENING_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    GENERIC_OPENING_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).expect("static opening pattern"))
        .collect()
});

static CONTRACTION_REGEXES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| CONTRACTIONS.iter().map(|c| whole_word(c)).collect());

static SENSORY_REGEXES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| SENSORY_WORDS.iter().map(|w| word_prefix(w)).collect());

static EMOTIONAL_REGEXES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| EMOTIONAL_WORDS.iter().map(|w| word_prefix(w)).collect());

static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]*\?").expect("static question pattern"));

static SENTENCE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("static sentence pattern"));

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("static word pattern"));

fn whole_word(word: &str) -> Regex {
    Regex::new(&format!(r"\b{}\b", regex::escape(word))).expect("escaped literal is valid")
}

fn word_prefix(word: &str) -> Regex {
    Regex::new(&format!(r"\b{}\w*\b", regex::escape(word))).expect("escaped literal is valid")
}

/// Returns the phrases of `list` found in `text`, case-insensitively.
///
/// Order follows `list`; each phrase is reported at most once.
fn find_phrases(text: &str, list: &[&str]) -> Vec<String> {
    let lower = text.to_lowercase();
    list.iter()
        .filter(|phrase| lower.contains(&phrase.to_lowercase()))
        .map(|phrase| phrase.to_string())
        .collect()
}

fn any_phrase(text: &str, list: &[&str]) -> bool {
    let lower = text.to_lowercase();
    list.iter().any(|phrase| lower.contains(&phrase.to_lowercase()))
}

fn count_matches(text: &str, regexes: &[Regex]) -> usize {
    regexes.iter().map(|re| re.find_iter(text).count()).sum()
}

fn first_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn last_chars(text: &str, n: usize) -> &str {
    let total = text.chars().count();
    if total <= n {
        return text;
    }
    match text.char_indices().nth(total - n) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Banned marketing/AI-cliché phrases present in `text`.
pub fn check_forbidden_phrases(text: &str) -> Vec<String> {
    find_phrases(text, FORBIDDEN_PHRASES)
}

/// Hyperbolic claim terms present in `text`.
pub fn check_hyperbolic_claims(text: &str) -> Vec<String> {
    find_phrases(text, HYPERBOLIC_TERMS)
}

/// Whole-word, case-insensitive occurrences of `name` in `text`.
pub fn count_mentions(text: &str, name: &str) -> usize {
    if name.trim().is_empty() {
        return 0;
    }
    match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name.trim()))) {
        Ok(re) => re.find_iter(text).count(),
        Err(_) => 0,
    }
}

/// Mentions of the default marketplace, Etsy.
pub fn count_etsy_mentions(text: &str) -> usize {
    count_mentions(text, "Etsy")
}

/// True when the first ~200 characters open with a stock introduction.
pub fn check_generic_opening(text: &str) -> bool {
    let opening = first_chars(text, OPENING_WINDOW_CHARS).to_lowercase();
    let opening = opening.trim();
    OPENING_REGEXES.iter().any(|re| re.is_match(opening))
}

/// True when the last ~500 characters contain a hard-sell phrase.
pub fn check_generic_closing(text: &str) -> bool {
    any_phrase(last_chars(text, CLOSING_WINDOW_CHARS), HARD_SELL_PHRASES)
}

/// Whole-word count of known contractions, after folding typographic apostrophes.
pub fn count_contractions(text: &str) -> usize {
    let normalized = text.replace(['\u{2019}', '\u{2018}'], "'").to_lowercase();
    count_matches(&normalized, &CONTRACTION_REGEXES)
}

/// Number of clauses ending in `?`.
pub fn count_rhetorical_questions(text: &str) -> usize {
    QUESTION_RE.find_iter(text).count()
}

/// Splits on `.`, `!` or `?` followed by whitespace; the punctuation stays
/// with the sentence it ends. Fragments of two chars or fewer are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK_RE.find_iter(text) {
        // punctuation is one ASCII byte
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

fn count_words(sentence: &str) -> usize {
    WORD_RE.find_iter(sentence).count()
}

/// Sample standard deviation of words-per-sentence.
///
/// Returns 0.0 when fewer than two sentences with at least one word remain.
pub fn calculate_sentence_burstiness(text: &str) -> f64 {
    let counts: Vec<f64> = split_sentences(text)
        .into_iter()
        .map(count_words)
        .filter(|&c| c > 0)
        .map(|c| c as f64)
        .collect();

    if counts.len() < 2 {
        return 0.0;
    }

    let n = counts.len() as f64;
    let mean = counts.iter().sum::<f64>() / n;
    let variance = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Sensory words, counting any suffixed form ("smooth", "smoothly").
pub fn count_sensory_words(text: &str) -> usize {
    count_matches(&text.to_lowercase(), &SENSORY_REGEXES)
}

/// Emotional words, counting any suffixed form ("calm", "calming").
pub fn count_emotional_words(text: &str) -> usize {
    count_matches(&text.to_lowercase(), &EMOTIONAL_REGEXES)
}

pub fn check_balanced_perspective(text: &str) -> bool {
    any_phrase(text, BALANCE_INDICATORS)
}

pub fn check_messy_transitions(text: &str) -> bool {
    any_phrase(text, MESSY_TRANSITION_MARKERS)
}

pub fn check_freshness_signals(text: &str) -> bool {
    any_phrase(text, FRESHNESS_MARKERS)
}

/// Every signal for one text, computed in a single pass over the metric set.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMetrics {
    pub forbidden_phrases: Vec<String>,
    pub hyperbolic_claims: Vec<String>,
    pub marketplace_mentions: usize,
    pub generic_opening: bool,
    pub generic_closing: bool,
    pub contractions: usize,
    pub rhetorical_questions: usize,
    pub sentence_burstiness: f64,
    pub sensory_words: usize,
    pub emotional_words: usize,
    pub balanced_perspective: bool,
    pub messy_transitions: bool,
    pub freshness_signals: bool,
}

impl TextMetrics {
    pub fn measure(text: &str, marketplace: &str) -> Self {
        Self {
            forbidden_phrases: check_forbidden_phrases(text),
            hyperbolic_claims: check_hyperbolic_claims(text),
            marketplace_mentions: count_mentions(text, marketplace),
            generic_opening: check_generic_opening(text),
            generic_closing: check_generic_closing(text),
            contractions: count_contractions(text),
            rhetorical_questions: count_rhetorical_questions(text),
            sentence_burstiness: calculate_sentence_burstiness(text),
            sensory_words: count_sensory_words(text),
            emotional_words: count_emotional_words(text),
            balanced_perspective: check_balanced_perspective(text),
            messy_transitions: check_messy_transitions(text),
            freshness_signals: check_freshness_signals(text),
        }
    }
}
