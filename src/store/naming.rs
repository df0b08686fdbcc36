use once_cell::sync::Lazy;
use regex::Regex;

pub const RECORD_EXTENSION: &str = "json";
pub const MAX_STEM_CHARS: usize = 50;

const UNNAMED: &str = "unnamed";
const UNKNOWN_SEX: &str = "unknown";

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\-_]").expect("valid filename charset regex"));
static DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid dash run regex"));

/// Normalizes free text into a filename component.
///
/// Lowercases and trims, maps anything outside `[a-z0-9-_]` to `-`, collapses
/// dash runs and keeps at most 50 characters. The result is a fixed point:
/// sanitizing it again returns it unchanged.
pub fn sanitize_filename(input: &str) -> String {
    let lowered = input.to_lowercase();
    let replaced = DISALLOWED_CHARS.replace_all(lowered.trim(), "-");
    let collapsed = DASH_RUNS.replace_all(&replaced, "-");
    collapsed.chars().take(MAX_STEM_CHARS).collect()
}

/// Storage key for a record, without extension.
///
/// Depends only on name, age and sex; the record id plays no part, so two
/// records sharing all three map to the same file.
pub fn derive_stem(name: Option<&str>, age: i64, sex: Option<&str>) -> String {
    let name = name
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| UNNAMED.to_string());
    format!("{}_{}_{}", sanitize_filename(&name), age, sex_indicator(sex))
}

pub fn derive_filename(name: Option<&str>, age: i64, sex: Option<&str>) -> String {
    with_extension(&derive_stem(name, age, sex))
}

pub fn with_extension(stem: &str) -> String {
    format!("{}.{}", stem, RECORD_EXTENSION)
}

fn sex_indicator(sex: Option<&str>) -> String {
    let Some(first) = sex.and_then(|value| value.chars().next()) else {
        return UNKNOWN_SEX.to_string();
    };
    first
        .to_lowercase()
        .map(|ch| if is_allowed(ch) { ch } else { '-' })
        .collect()
}

fn is_allowed(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_'
}
