//! Keyword heuristic that suggests an importance score from a description.
//!
//! The rules are an explicit table checked from the highest tier down, and the
//! first tier with a matching keyword wins. A description that mentions both
//! "urgent" and "meeting" therefore scores 9, not 7.
//!
//! | Tier | Keywords                  |
//! |------|---------------------------|
//! | 9    | `urgent`, `asap`          |
//! | 8    | `important`, `critical`   |
//! | 7    | `meeting`, `deadline`     |
//! | 5    | (no match, documented default) |

use crate::task::Importance;

/// One tier of the keyword table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportanceRule {
    pub tier: Importance,
    pub keywords: Vec<String>,
}

impl ImportanceRule {
    pub fn new(tier: Importance, keywords: &[&str]) -> Self {
        Self {
            tier,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}

/// Built-in keyword table, highest tier first.
pub const IMPORTANCE_RULES: &[(u8, &[&str])] = &[
    (9, &["urgent", "asap"]),
    (8, &["important", "critical"]),
    (7, &["meeting", "deadline"]),
];

/// Score returned when no keyword matches.
pub const DEFAULT_SUGGESTED_IMPORTANCE: u8 = 5;

/// Rule-table heuristic. `Default` gives the built-in table.
#[derive(Debug, Clone)]
pub struct ImportanceHeuristic {
    rules: Vec<ImportanceRule>,
    fallback: Importance,
}

impl ImportanceHeuristic {
    /// Build from custom rules. Rules are reordered so higher tiers are
    /// checked first; rules sharing a tier keep their given order.
    pub fn with_rules(mut rules: Vec<ImportanceRule>, fallback: Importance) -> Self {
        rules.sort_by(|a, b| b.tier.cmp(&a.tier));
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[ImportanceRule] {
        &self.rules
    }

    pub fn suggest(&self, description: &str) -> Importance {
        let haystack = description.to_lowercase();
        let suggestion = self
            .rules
            .iter()
            .find(|rule| rule.matches(&haystack))
            .map(|rule| rule.tier)
            .unwrap_or(self.fallback);
        tracing::trace!(suggested = suggestion.value(), "importance suggested");
        suggestion
    }
}

impl Default for ImportanceHeuristic {
    fn default() -> Self {
        let rules = IMPORTANCE_RULES
            .iter()
            .map(|(tier, keywords)| ImportanceRule::new(Importance::clamped(i64::from(*tier)), keywords))
            .collect();
        Self::with_rules(rules, Importance::clamped(i64::from(DEFAULT_SUGGESTED_IMPORTANCE)))
    }
}

/// Suggest an importance score for a description using the built-in table.
pub fn suggest_importance(description: &str) -> Importance {
    ImportanceHeuristic::default().suggest(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> u8 {
        suggest_importance(text).value()
    }

    #[test]
    fn each_tier_matches_its_keywords() {
        assert_eq!(score("fix this asap"), 9);
        assert_eq!(score("Urgent: call the bank"), 9);
        assert_eq!(score("an important email"), 8);
        assert_eq!(score("CRITICAL bug"), 8);
        assert_eq!(score("team meeting"), 7);
        assert_eq!(score("grant deadline"), 7);
    }

    #[test]
    fn highest_tier_wins() {
        assert_eq!(score("urgent meeting"), 9);
        assert_eq!(score("meeting about the critical path"), 8);
        assert_eq!(score("deadline is important and urgent"), 9);
    }

    #[test]
    fn no_keyword_falls_back_to_default() {
        assert_eq!(score(""), 5);
        assert_eq!(score("buy groceries"), 5);
    }

    #[test]
    fn keywords_match_as_substrings() {
        // "meetings" contains "meeting"
        assert_eq!(score("too many meetings"), 7);
    }

    #[test]
    fn custom_rules_are_checked_by_tier() {
        let heuristic = ImportanceHeuristic::with_rules(
            vec![
                ImportanceRule::new(Importance::clamped(3), &["someday"]),
                ImportanceRule::new(Importance::clamped(10), &["Fire"]),
            ],
            Importance::clamped(4),
        );

        assert_eq!(heuristic.rules()[0].tier.value(), 10);
        assert_eq!(heuristic.suggest("someday, after the fire").value(), 10);
        assert_eq!(heuristic.suggest("someday").value(), 3);
        assert_eq!(heuristic.suggest("nothing").value(), 4);
    }
}
