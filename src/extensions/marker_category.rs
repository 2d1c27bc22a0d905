use crate::core::{Marker, MarkerCategory};

/// Infers a category for markers whose data did not supply one.
pub trait MarkerClassifier {
    fn classify(&self, marker: &Marker) -> MarkerCategory;
}

/// Explicit categories win; the classifier only fills gaps.
#[must_use]
pub fn resolve_category(marker: &Marker, classifier: &dyn MarkerClassifier) -> MarkerCategory {
    marker
        .category
        .unwrap_or_else(|| classifier.classify(marker))
}

/// Case-insensitive keyword matching over label and tooltip text.
///
/// Rules are checked in order; the first category with a matching keyword
/// wins. Version-like words (`v1`, `v2.3.0`) count as releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMarkerClassifier {
    rules: Vec<(MarkerCategory, Vec<String>)>,
}

impl Default for KeywordMarkerClassifier {
    fn default() -> Self {
        Self {
            rules: vec![
                keyword_rule(MarkerCategory::Incident, &["incident", "outage", "postmortem"]),
                keyword_rule(MarkerCategory::Release, &["release", "launch", "shipped"]),
                keyword_rule(MarkerCategory::Milestone, &["milestone", "deadline", "kickoff"]),
                keyword_rule(MarkerCategory::Talk, &["talk", "conference", "meetup", "keynote"]),
            ],
        }
    }
}

fn keyword_rule(category: MarkerCategory, words: &[&str]) -> (MarkerCategory, Vec<String>) {
    (
        category,
        words.iter().map(|word| (*word).to_owned()).collect(),
    )
}

impl KeywordMarkerClassifier {
    #[must_use]
    pub fn new(rules: Vec<(MarkerCategory, Vec<String>)>) -> Self {
        let rules = rules
            .into_iter()
            .map(|(category, words)| {
                (
                    category,
                    words.into_iter().map(|word| word.to_lowercase()).collect(),
                )
            })
            .collect();
        Self { rules }
    }
}

impl MarkerClassifier for KeywordMarkerClassifier {
    fn classify(&self, marker: &Marker) -> MarkerCategory {
        let mut text = marker.label.to_lowercase();
        if let Some(tooltip) = &marker.tooltip {
            text.push(' ');
            text.push_str(&tooltip.to_lowercase());
        }

        for (category, words) in &self.rules {
            if words.iter().any(|word| text.contains(word.as_str())) {
                return *category;
            }
        }
        if text.split(|c: char| !c.is_alphanumeric() && c != '.').any(is_version_word) {
            return MarkerCategory::Release;
        }
        MarkerCategory::Other
    }
}

fn is_version_word(word: &str) -> bool {
    let Some(rest) = word.strip_prefix('v') else {
        return false;
    };
    rest.starts_with(|c: char| c.is_ascii_digit())
        && rest.chars().all(|c| c.is_ascii_digit() || c == '.')
}
