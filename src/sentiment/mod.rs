/// Sentiment classification for free-form API labels.
///
/// The upstream API returns labels such as `"positive"`, `"Very Negative Tone"`
/// or `"neutral"`, with no fixed vocabulary. Labels are bucketed locally into
/// three classes by case-insensitive substring match. `"positive"` is checked
/// before `"negative"`, so a label containing both counts as positive.
use serde::{Deserialize, Serialize};

/// Bucketed sentiment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// All classes in display order (chart and counter order).
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Capitalized label used for chart legends.
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }

    /// Badge/chart color as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Self::Positive => "#10b981",
            Self::Negative => "#ef4444",
            Self::Neutral => "#6b7280",
        }
    }

    /// Parse a class name as typed on the command line.
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" => Some(Self::Positive),
            "negative" | "neg" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Classify a sentiment label. Absent or unrecognized labels are neutral.
pub fn classify(label: Option<&str>) -> Sentiment {
    let Some(label) = label else {
        return Sentiment::Neutral;
    };

    let lower = label.to_lowercase();
    if lower.contains("positive") {
        Sentiment::Positive
    } else if lower.contains("negative") {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(classify(Some("Positive")), Sentiment::Positive);
        assert_eq!(classify(Some("POSITIVE")), Sentiment::Positive);
        assert_eq!(classify(Some("negative")), Sentiment::Negative);
    }

    #[test]
    fn classify_matches_substrings() {
        assert_eq!(classify(Some("Very Negative Tone")), Sentiment::Negative);
        assert_eq!(classify(Some("mostly positive")), Sentiment::Positive);
    }

    #[test]
    fn classify_defaults_to_neutral() {
        assert_eq!(classify(Some("N/A")), Sentiment::Neutral);
        assert_eq!(classify(Some("neutral")), Sentiment::Neutral);
        assert_eq!(classify(Some("")), Sentiment::Neutral);
        assert_eq!(classify(None), Sentiment::Neutral);
    }

    #[test]
    fn positive_wins_over_negative() {
        assert_eq!(
            classify(Some("negative-to-positive shift")),
            Sentiment::Positive
        );
    }

    #[test]
    fn classify_is_idempotent_on_own_labels() {
        for class in Sentiment::ALL {
            assert_eq!(classify(Some(&class.to_string())), class);
            assert_eq!(classify(Some(class.label())), class);
        }
    }

    #[test]
    fn parse_accepts_short_forms() {
        assert_eq!(Sentiment::parse("pos"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse("Negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse(" neutral "), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::parse("mixed"), None);
    }
}
