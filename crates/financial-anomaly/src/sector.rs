//! Sector classification
//!
//! Free-text sector labels are mapped onto the small set of classes the
//! threshold table knows about. Rules are evaluated in order and the first
//! match wins.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorClass {
    Saas,
    Ecommerce,
    Marketplace,
    Default,
}

impl SectorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectorClass::Saas => "saas",
            SectorClass::Ecommerce => "ecommerce",
            SectorClass::Marketplace => "marketplace",
            SectorClass::Default => "default",
        }
    }
}

type SectorPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// A single classification rule. The predicate receives the lowercased label.
pub struct SectorRule {
    class: SectorClass,
    predicate: SectorPredicate,
}

impl SectorRule {
    pub fn new<F>(class: SectorClass, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            class,
            predicate: Box::new(predicate),
        }
    }

    /// Matches when the label contains any of `keywords`.
    pub fn keywords(class: SectorClass, keywords: &[&str]) -> Self {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        Self::new(class, move |label| keywords.iter().any(|k| label.contains(k.as_str())))
    }

    pub fn class(&self) -> SectorClass {
        self.class
    }

    fn matches(&self, label: &str) -> bool {
        (self.predicate)(label)
    }
}

pub struct SectorClassifier {
    rules: Vec<SectorRule>,
}

impl Default for SectorClassifier {
    fn default() -> Self {
        Self::new(vec![
            SectorRule::keywords(SectorClass::Saas, &["saas", "software"]),
            SectorRule::keywords(SectorClass::Ecommerce, &["ecommerce", "retail"]),
            SectorRule::keywords(SectorClass::Marketplace, &["marketplace", "platform"]),
        ])
    }
}

impl SectorClassifier {
    pub fn new(rules: Vec<SectorRule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, sector: &str) -> SectorClass {
        let label = sector.trim().to_lowercase();
        let class = self
            .rules
            .iter()
            .find(|rule| rule.matches(&label))
            .map(|rule| rule.class)
            .unwrap_or(SectorClass::Default);

        tracing::debug!("Classified sector '{}' as {}", sector, class.as_str());
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let classifier = SectorClassifier::default();
        assert_eq!(classifier.classify("B2B SaaS"), SectorClass::Saas);
        assert_eq!(classifier.classify("Enterprise Software"), SectorClass::Saas);
        assert_eq!(classifier.classify("eCommerce"), SectorClass::Ecommerce);
        assert_eq!(classifier.classify("Retail tech"), SectorClass::Ecommerce);
        assert_eq!(classifier.classify("Freelance Marketplace"), SectorClass::Marketplace);
        assert_eq!(classifier.classify("Biotech"), SectorClass::Default);
        assert_eq!(classifier.classify(""), SectorClass::Default);
    }

    #[test]
    fn test_first_match_wins() {
        let classifier = SectorClassifier::default();
        // both "software" and "platform" appear; the saas rule comes first
        assert_eq!(classifier.classify("Software platform"), SectorClass::Saas);
        assert_eq!(classifier.classify("Retail platform"), SectorClass::Ecommerce);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = SectorClassifier::new(vec![
            SectorRule::new(SectorClass::Marketplace, |label| label.starts_with("two-sided")),
            SectorRule::keywords(SectorClass::Saas, &["API"]),
        ]);
        assert_eq!(classifier.classify("Two-sided SaaS"), SectorClass::Marketplace);
        assert_eq!(classifier.classify("api tooling"), SectorClass::Saas);
        assert_eq!(classifier.classify("software"), SectorClass::Default);
    }
}
