// 🏷️ Sport Classification Rules - Rules as Data
// Ordered (matcher, outcome) list mapping free-text categories to a sport

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ============================================================================
// SPORT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sport {
    #[serde(rename = "Skateboard")]
    Skateboard,

    #[serde(rename = "Paddle Push")]
    PaddlePush,

    #[serde(rename = "Paddle")]
    Paddle,

    #[serde(rename = "Inline Skating")]
    InlineSkating,

    #[serde(rename = "Quad Skating")]
    QuadSkating,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Skateboard => "Skateboard",
            Sport::PaddlePush => "Paddle Push",
            Sport::Paddle => "Paddle",
            Sport::InlineSkating => "Inline Skating",
            Sport::QuadSkating => "Quad Skating",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// How a rule tests the category text
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Case-sensitive equality
    Exact(String),

    /// Case-insensitive substring
    Contains(String),

    /// Every needle must appear (case-insensitive)
    ContainsAll(Vec<String>),

    /// At least one needle must appear (case-insensitive)
    ContainsAny(Vec<String>),

    /// Fallback rule
    Always,
}

impl Matcher {
    pub fn matches(&self, category: &str) -> bool {
        let lower = category.to_lowercase();
        match self {
            Matcher::Exact(expected) => category == expected,
            Matcher::Contains(needle) => lower.contains(&needle.to_lowercase()),
            Matcher::ContainsAll(needles) => needles
                .iter()
                .all(|needle| lower.contains(&needle.to_lowercase())),
            Matcher::ContainsAny(needles) => needles
                .iter()
                .any(|needle| lower.contains(&needle.to_lowercase())),
            Matcher::Always => true,
        }
    }
}

/// What a matching rule does to category / age group
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryRewrite {
    /// Leave both untouched
    Keep,

    /// Replace the category text
    Replace(String),

    /// Incoming category becomes the age group, category is replaced
    MoveToAgeGroup(String),
}

#[derive(Debug, Clone)]
pub struct SportRule {
    /// Rule ID for tracking
    pub id: String,

    pub matcher: Matcher,

    /// Sport to assign
    pub sport: Sport,

    pub rewrite: CategoryRewrite,
}

impl SportRule {
    pub fn new(id: &str, matcher: Matcher, sport: Sport, rewrite: CategoryRewrite) -> Self {
        SportRule {
            id: id.to_string(),
            matcher,
            sport,
            rewrite,
        }
    }
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub sport: Sport,
    pub category: String,
    pub age_group: String,
    pub rule_id: Option<String>,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Evaluates rules top-to-bottom; first match wins. Insertion order IS priority.
pub struct SportClassifier {
    rules: Vec<SportRule>,
}

impl SportClassifier {
    /// Create a classifier with no rules (everything falls back to Skateboard)
    pub fn new() -> Self {
        SportClassifier { rules: Vec::new() }
    }

    /// The race-category rules used for every performance
    pub fn standard() -> Self {
        let skateboard = || CategoryRewrite::Replace("Skateboard".to_string());

        SportClassifier::from_rules(vec![
            SportRule::new(
                "24-hour",
                Matcher::Exact("24 Hour".to_string()),
                Sport::Skateboard,
                skateboard(),
            ),
            SportRule::new(
                "age-bracket",
                Matcher::Contains("ages".to_string()),
                Sport::Skateboard,
                CategoryRewrite::MoveToAgeGroup("Skateboard".to_string()),
            ),
            // Must stay ahead of "paddle"
            SportRule::new(
                "paddle-push",
                Matcher::ContainsAll(vec!["paddle".to_string(), "push".to_string()]),
                Sport::PaddlePush,
                CategoryRewrite::Keep,
            ),
            SportRule::new(
                "paddle",
                Matcher::Contains("paddle".to_string()),
                Sport::Paddle,
                CategoryRewrite::Keep,
            ),
            SportRule::new(
                "inline",
                Matcher::ContainsAny(vec!["inline".to_string(), "roller".to_string()]),
                Sport::InlineSkating,
                CategoryRewrite::Keep,
            ),
            SportRule::new(
                "quad",
                Matcher::Contains("quad".to_string()),
                Sport::QuadSkating,
                CategoryRewrite::Keep,
            ),
            SportRule::new("default", Matcher::Always, Sport::Skateboard, CategoryRewrite::Keep),
        ])
    }

    pub fn from_rules(rules: Vec<SportRule>) -> Self {
        SportClassifier { rules }
    }

    /// Append a rule at the lowest priority
    pub fn add_rule(&mut self, rule: SportRule) {
        self.rules.push(rule);
    }

    pub fn classify(&self, category: &str, age_group: &str) -> ClassificationResult {
        for rule in &self.rules {
            if !rule.matcher.matches(category) {
                continue;
            }

            let (category, age_group) = match &rule.rewrite {
                CategoryRewrite::Keep => (category.to_string(), age_group.to_string()),
                CategoryRewrite::Replace(new_category) => {
                    (new_category.clone(), age_group.to_string())
                }
                CategoryRewrite::MoveToAgeGroup(new_category) => {
                    (new_category.clone(), category.to_string())
                }
            };

            return ClassificationResult {
                sport: rule.sport,
                category,
                age_group,
                rule_id: Some(rule.id.clone()),
            };
        }

        ClassificationResult {
            sport: Sport::Skateboard,
            category: category.to_string(),
            age_group: age_group.to_string(),
            rule_id: None,
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for SportClassifier {
    fn default() -> Self {
        Self::standard()
    }
}

/// Shared instance of [`SportClassifier::standard`]
pub fn standard_classifier() -> &'static SportClassifier {
    static CLASSIFIER: OnceLock<SportClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(SportClassifier::standard)
}

// ============================================================================
// TESTS
// ============================================================================
