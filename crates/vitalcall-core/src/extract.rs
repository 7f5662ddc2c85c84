//! Heuristic patient-information extraction from a call transcript.
//!
//! Every field is derived from the transcript alone. Keyword vocabularies are
//! matched as plain lower-cased substrings with no word-boundary check, so
//! "painting" yields the symptom "pain". Output order always follows the
//! vocabulary order, never the order of appearance in the text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Symptom vocabulary, in output order.
pub const SYMPTOM_KEYWORDS: &[&str] = &[
    "pain",
    "lump",
    "fatigue",
    "weight loss",
    "fever",
    "cough",
    "difficulty swallowing",
    "shortness of breath",
    "headache",
    "nausea",
    "vomiting",
    "bleeding",
    "bruising",
    "swelling",
];

/// Risk-factor vocabulary, in output order.
pub const RISK_FACTOR_KEYWORDS: &[&str] = &["smoking", "alcohol", "radiation", "chemicals"];

/// Relative roles checked once a family cancer history is detected.
pub const RELATIVE_ROLES: &[&str] = &[
    "mother",
    "father",
    "sister",
    "brother",
    "grandmother",
    "grandfather",
];

/// Name patterns, tried in order against the original-case transcript.
static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)my name is ([a-zA-Z\s]+)").unwrap(),
        Regex::new(r"(?i)i'm ([a-zA-Z\s]+)").unwrap(),
        Regex::new(r"(?i)this is ([a-zA-Z\s]+)").unwrap(),
        Regex::new(r"(?i)call me ([a-zA-Z\s]+)").unwrap(),
    ]
});

/// Age patterns, tried in order against the lower-cased transcript.
static AGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"i'm ([0-9]+) years old").unwrap(),
        Regex::new(r"i am ([0-9]+) years old").unwrap(),
        Regex::new(r"([0-9]+) years old").unwrap(),
        Regex::new(r"age ([0-9]+)").unwrap(),
    ]
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyHistory {
    pub family_cancer_history: bool,
    pub relatives_with_cancer: Vec<String>,
}

/// Structured fields pulled out of one transcript.
///
/// "No value" is always `None` for `name`/`age` (serialized as `null`) and an
/// empty list for the keyword fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub symptoms: Vec<String>,
    pub risk_factors: Vec<String>,
    pub family_history: FamilyHistory,
    /// The transcript, verbatim.
    pub notes: String,
}

/// Extract patient information from a transcript. Never fails; an empty
/// transcript gives `PatientInfo::default()`.
pub fn extract(transcript: &str) -> PatientInfo {
    if transcript.is_empty() {
        return PatientInfo::default();
    }
    let text = transcript.to_lowercase();

    PatientInfo {
        name: first_capture(&NAME_PATTERNS, transcript, |m| {
            let name = m.trim();
            (!name.is_empty()).then(|| name.to_string())
        }),
        age: first_capture(&AGE_PATTERNS, &text, |m| m.parse::<u32>().ok()),
        symptoms: scan_vocabulary(&text, SYMPTOM_KEYWORDS),
        risk_factors: scan_vocabulary(&text, RISK_FACTOR_KEYWORDS),
        family_history: family_history(&text),
        notes: transcript.to_string(),
    }
}

/// Run `patterns` in order and return the first capture that `accept` turns
/// into a value. A capture that `accept` rejects falls through to the next
/// pattern.
fn first_capture<T>(
    patterns: &[Regex],
    text: &str,
    accept: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    patterns.iter().find_map(|re| {
        let caps = re.captures(text)?;
        accept(caps.get(1)?.as_str())
    })
}

fn scan_vocabulary(text: &str, vocabulary: &[&str]) -> Vec<String> {
    vocabulary
        .iter()
        .filter(|kw| text.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

/// "family" plus "cancer"/"tumor" anywhere in the text counts as a family
/// history. No proximity check is made between the words.
fn family_history(text: &str) -> FamilyHistory {
    let has_history =
        text.contains("family") && (text.contains("cancer") || text.contains("tumor"));
    if !has_history {
        return FamilyHistory::default();
    }

    let relatives_with_cancer = if text.contains("cancer") {
        scan_vocabulary(text, RELATIVE_ROLES)
    } else {
        Vec::new()
    };

    FamilyHistory {
        family_cancer_history: true,
        relatives_with_cancer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transcript_is_all_default() {
        let info = extract("");
        assert_eq!(info, PatientInfo::default());
        assert_eq!(info.name, None);
        assert_eq!(info.age, None);
        assert!(info.symptoms.is_empty());
        assert!(info.risk_factors.is_empty());
        assert!(!info.family_history.family_cancer_history);
        assert!(info.family_history.relatives_with_cancer.is_empty());
        assert_eq!(info.notes, "");
    }

    #[test]
    fn extraction_is_repeatable() {
        let t = "Hi, I'm Sam. I am 61 years old, I have a cough and my family has cancer history.";
        assert_eq!(extract(t), extract(t));
    }

    #[test]
    fn name_from_my_name_is() {
        let info = extract("Hi, my name is Jordan Lee, I need help");
        assert_eq!(info.name.as_deref(), Some("Jordan Lee"));
        assert_eq!(info.age, None);
    }

    #[test]
    fn name_keeps_original_case_and_ignores_pattern_case() {
        let info = extract("MY NAME IS mcKenzie");
        assert_eq!(info.name.as_deref(), Some("mcKenzie"));
    }

    #[test]
    fn name_patterns_are_tried_in_order() {
        // "call me" appears first in the text, but "this is" ranks higher.
        let info = extract("Call me Al. Anyway, this is Bob speaking.");
        assert_eq!(info.name.as_deref(), Some("Bob speaking"));
    }

    #[test]
    fn blank_name_capture_falls_through() {
        // "I'm  54" captures only the second space before the digits.
        let info = extract("I'm  54 years old, this is Dana");
        assert_eq!(info.name.as_deref(), Some("Dana"));
        assert_eq!(info.age, Some(54));
    }

    #[test]
    fn age_and_lump() {
        let info = extract("I am 54 years old and worried about a lump");
        assert_eq!(info.age, Some(54));
        assert!(info.symptoms.contains(&"lump".to_string()));
        assert_eq!(info.name, None);
    }

    #[test]
    fn age_from_age_keyword() {
        assert_eq!(extract("Patient age 47, non-smoker").age, Some(47));
    }

    #[test]
    fn implausible_age_is_not_validated() {
        assert_eq!(extract("I am 300 years old").age, Some(300));
    }

    #[test]
    fn overflowing_age_is_absent() {
        assert_eq!(extract("99999999999 years old").age, None);
    }

    #[test]
    fn symptoms_follow_vocabulary_order() {
        let info = extract("I have a cough and some fatigue");
        assert_eq!(info.symptoms, vec!["fatigue", "cough"]);
    }

    #[test]
    fn symptoms_are_listed_once() {
        let info = extract("Pain here, pain there, PAIN everywhere");
        assert_eq!(info.symptoms, vec!["pain"]);
    }

    #[test]
    fn multi_word_symptoms() {
        let info = extract("Some Shortness of Breath and difficulty swallowing lately");
        assert_eq!(
            info.symptoms,
            vec!["difficulty swallowing", "shortness of breath"]
        );
    }

    #[test]
    fn substring_match_gives_false_positive() {
        // No word boundaries: "painting" contains "pain".
        let info = extract("I spent the weekend painting the fence");
        assert_eq!(info.symptoms, vec!["pain"]);
    }

    #[test]
    fn clean_text_has_no_symptoms() {
        let info = extract("I feel fine and just want a routine check");
        assert!(info.symptoms.is_empty());
        assert!(info.risk_factors.is_empty());
    }

    #[test]
    fn risk_factors() {
        let info = extract("Years of Smoking, some alcohol, and radiation at work");
        assert_eq!(info.risk_factors, vec!["smoking", "alcohol", "radiation"]);
    }

    #[test]
    fn family_history_with_relatives() {
        let info = extract("In my family, my mother had cancer and my father too");
        assert!(info.family_history.family_cancer_history);
        assert_eq!(
            info.family_history.relatives_with_cancer,
            vec!["mother", "father"]
        );
    }

    #[test]
    fn relatives_without_family_word_are_ignored() {
        let info = extract("My mother had cancer and my father too");
        assert!(!info.family_history.family_cancer_history);
        assert!(info.family_history.relatives_with_cancer.is_empty());
    }

    #[test]
    fn unrelated_family_and_cancer_still_count() {
        let info = extract("I went to a family reunion and watched a cancer documentary");
        assert!(info.family_history.family_cancer_history);
        assert!(info.family_history.relatives_with_cancer.is_empty());
    }

    #[test]
    fn tumor_sets_history_but_relatives_need_cancer() {
        let info = extract("Family history: my sister had a tumor");
        assert!(info.family_history.family_cancer_history);
        assert!(info.family_history.relatives_with_cancer.is_empty());
    }

    #[test]
    fn grandmother_also_matches_mother() {
        let info = extract("Family note: grandmother had cancer");
        assert_eq!(
            info.family_history.relatives_with_cancer,
            vec!["mother", "grandmother"]
        );
    }

    #[test]
    fn notes_keep_transcript_verbatim() {
        let t = "AI: Hello!\nUser: My name is Ana.";
        let info = extract(t);
        assert_eq!(info.notes, t);
        assert_eq!(info.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn serializes_absent_values_as_null() {
        let json = serde_json::to_value(extract("")).unwrap();
        assert!(json["name"].is_null());
        assert!(json["age"].is_null());
        assert_eq!(json["familyHistory"]["familyCancerHistory"], false);
        assert_eq!(json["riskFactors"], serde_json::json!([]));
    }
}
