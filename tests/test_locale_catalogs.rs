use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use adaptutor::engine::feedback::Feedback;
use adaptutor::engine::metrics::{AccuracyBand, SkillBand, SpeedBand};
use adaptutor::engine::vark::{self, MAX_SCORE, MIN_SCORE, QUESTIONS, VarkStyle};

const KEY_ROOTS: [&str; 6] = ["ui.", "vark.", "feedback.", "skill.", "accuracy.", "speed."];

/// Flatten nested YAML maps into dotted keys, the way rust-i18n looks them up.
fn collect_keys(prefix: &str, value: &serde_yaml::Value, out: &mut BTreeSet<String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let k = k.as_str().unwrap_or_default();
                let key = if prefix.is_empty() {
                    k.to_string()
                } else {
                    format!("{prefix}.{k}")
                };
                collect_keys(&key, v, out);
            }
        }
        _ => {
            out.insert(prefix.to_string());
        }
    }
}

fn locale_keys(locale: &str) -> BTreeSet<String> {
    let path = format!("locales/{locale}.yml");
    let content = fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path}: {e}"));
    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {path}: {e}"));
    let mut keys = BTreeSet::new();
    collect_keys("", &value, &mut keys);
    keys
}

#[test]
fn every_locale_has_the_same_keys() {
    let en = locale_keys("en");
    let es = locale_keys("es");
    let missing_in_es: Vec<_> = en.difference(&es).collect();
    let extra_in_es: Vec<_> = es.difference(&en).collect();
    assert!(missing_in_es.is_empty(), "es.yml is missing {missing_in_es:?}");
    assert!(extra_in_es.is_empty(), "es.yml has unknown keys {extra_in_es:?}");
}

#[test]
fn every_message_key_in_code_is_translated() {
    let prompts: Vec<String> = QUESTIONS.iter().map(|q| q.prompt_key()).collect();
    let mut used: Vec<&str> = [
        Feedback::Incorrect,
        Feedback::VeryFast,
        Feedback::Fast,
        Feedback::OnTime,
        Feedback::Slow,
        Feedback::TimeUp,
    ]
    .iter()
    .map(|f| f.message_key())
    .collect();
    used.extend([1, 3, 5, 7, 9].map(|l| SkillBand::from_level(l).message_key()));
    used.extend([0.0, 60.0, 80.0].map(|p| AccuracyBand::from_percentage(p).message_key()));
    used.extend([10.0, 45.0, 90.0].map(|t| SpeedBand::from_average_time(t).message_key()));
    used.extend(VarkStyle::ALL.map(|s| s.message_key()));
    used.extend((MIN_SCORE..=MAX_SCORE).filter_map(|s| -> Option<&str> { vark::scale_key(s) }));
    used.extend(prompts.iter().map(String::as_str));

    for locale in ["en", "es"] {
        let keys = locale_keys(locale);
        for key in &used {
            assert!(keys.contains(*key), "{locale}.yml has no `{key}`");
        }
    }
}

fn collect_sources(dir: &Path, out: &mut Vec<String>) {
    let entries = fs::read_dir(dir).unwrap_or_else(|e| panic!("Failed to read {}: {e}", dir.display()));
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_sources(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(fs::read_to_string(&path).unwrap());
        }
    }
}

/// Quoted literals that look like catalog keys, e.g. `"ui.hints.quit"`.
fn key_literals(source: &str) -> Vec<String> {
    let mut found = Vec::new();
    for (start, _) in source.match_indices('"') {
        let rest = &source[start + 1..];
        if !KEY_ROOTS.iter().any(|root| rest.starts_with(root)) {
            continue;
        }
        let Some(end) = rest.find('"') else {
            continue;
        };
        let literal = &rest[..end];
        let is_key = literal
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');
        if is_key && !literal.ends_with('.') {
            found.push(literal.to_string());
        }
    }
    found
}

#[test]
fn every_key_literal_in_sources_is_translated() {
    let mut sources = Vec::new();
    collect_sources(Path::new("src"), &mut sources);
    let used: BTreeSet<String> = sources.iter().flat_map(|s| key_literals(s)).collect();
    assert!(used.contains("ui.hints.quit"));
    assert!(used.contains("ui.attempts.difficulty"));

    for locale in ["en", "es"] {
        let keys = locale_keys(locale);
        let missing: Vec<_> = used.iter().filter(|k| !keys.contains(*k)).collect();
        assert!(missing.is_empty(), "{locale}.yml is missing {missing:?}");
    }
}

#[test]
fn bundled_locales_are_registered() {
    let locales = adaptutor::available_locales();
    assert!(locales.contains(&"en"));
    assert!(locales.contains(&"es"));
}
