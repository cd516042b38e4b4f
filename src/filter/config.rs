//! Filter configuration values

use crate::document::text::normalize_ref;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Per-entity exclusion rules: entity id -> contexts it is hidden under
///
/// Deserializes either from a map (`{P1: [T1, T2]}`, a single context may
/// be given as a plain string) or from a list of `"<context> to <entity>"`
/// rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawOverrides")]
pub struct OverrideRules(BTreeMap<String, Vec<String>>);

impl OverrideRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide `entity` under each of `contexts`; repeated contexts are kept once
    pub fn insert<I, S>(&mut self, entity: impl Into<String>, contexts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.0.entry(entity.into()).or_default();
        for context in contexts {
            let context = context.into();
            if !entry.contains(&context) {
                entry.push(context);
            }
        }
    }

    /// Parse a `"<context> to <entity>"` rule
    pub fn parse_rule(rule: &str) -> Result<(String, String), String> {
        let parts: Vec<&str> = rule.split_whitespace().collect();
        match parts.as_slice() {
            [context, to, entity] if to.eq_ignore_ascii_case("to") => Ok((
                normalize_ref(context).to_string(),
                normalize_ref(entity).to_string(),
            )),
            _ => Err(format!(
                "invalid override rule {:?}, expected \"<context> to <entity>\"",
                rule
            )),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Rules ordered by entity id
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn normalized(&self) -> Self {
        let mut out = Self::new();
        for (entity, contexts) in self.iter() {
            out.insert(
                normalize_ref(entity),
                contexts.iter().map(|c| normalize_ref(c).to_string()),
            );
        }
        out
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOverrides {
    Map(BTreeMap<String, OneOrMany>),
    Rules(Vec<String>),
}

impl TryFrom<RawOverrides> for OverrideRules {
    type Error = String;

    fn try_from(raw: RawOverrides) -> Result<Self, Self::Error> {
        let mut rules = OverrideRules::new();
        match raw {
            RawOverrides::Map(map) => {
                for (entity, contexts) in map {
                    match contexts {
                        OneOrMany::One(context) => rules.insert(entity, [context]),
                        OneOrMany::Many(contexts) => rules.insert(entity, contexts),
                    }
                }
            }
            RawOverrides::Rules(list) => {
                for rule in list {
                    let (context, entity) = OverrideRules::parse_rule(&rule)?;
                    rules.insert(entity, [context]);
                }
            }
        }
        Ok(rules)
    }
}

/// Declarative description of one view over the entity model
///
/// Never mutated by the filter engine, so one value can drive any number
/// of concurrent selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Sources to keep; empty keeps every source
    pub sources_to_select: Vec<String>,
    pub filter_propositions: bool,
    pub filter_matching_proposition_sequences: bool,
    pub filter_all_sequences: bool,
    pub filter_extrinsic_elements: bool,
    /// Focus anchors (thesis ids); empty disables focusing
    pub thesis_focus_id: Vec<String>,
    pub custom_propositions: OverrideRules,
    pub custom_sequences: OverrideRules,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources_to_select = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_focus<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.thesis_focus_id = anchors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_custom_proposition<I, S>(mut self, entity: impl Into<String>, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_propositions.insert(entity, contexts);
        self
    }

    pub fn with_custom_sequence<I, S>(mut self, entity: impl Into<String>, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_sequences.insert(entity, contexts);
        self
    }

    /// Copy with `#` prefixes stripped and duplicates removed, order kept
    pub fn normalized(&self) -> Self {
        Self {
            sources_to_select: dedup(&self.sources_to_select),
            thesis_focus_id: dedup(&self.thesis_focus_id),
            custom_propositions: self.custom_propositions.normalized(),
            custom_sequences: self.custom_sequences.normalized(),
            ..self.clone()
        }
    }

    /// Both override tables, propositions first
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.custom_propositions
            .iter()
            .chain(self.custom_sequences.iter())
    }
}

fn dedup(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = normalize_ref(value).to_string();
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exclude_nothing() {
        let config = FilterConfig::default();
        assert!(config.sources_to_select.is_empty());
        assert!(!config.filter_propositions);
        assert!(!config.filter_matching_proposition_sequences);
        assert!(!config.filter_all_sequences);
        assert!(!config.filter_extrinsic_elements);
        assert!(config.custom_propositions.is_empty());
    }

    #[test]
    fn overrides_deserialize_from_map() {
        let yaml = "custom_propositions:\n  plut.p1: [plut.t1, plut.t2]\n  plut.p2: plut.t3\n";
        let config: FilterConfig = serde_yaml::from_str(yaml).unwrap();
        let rules: Vec<_> = config.custom_propositions.iter().collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].0, "plut.p1");
        assert_eq!(rules[0].1, ["plut.t1".to_string(), "plut.t2".to_string()]);
        assert_eq!(rules[1].1, ["plut.t3".to_string()]);
    }

    #[test]
    fn overrides_deserialize_from_rules() {
        let yaml = "custom_sequences:\n  - \"#plut.t1 to plut.s4\"\n  - plut.t2 to plut.s4\n";
        let config: FilterConfig = serde_yaml::from_str(yaml).unwrap();
        let rules: Vec<_> = config.custom_sequences.iter().collect();
        assert_eq!(rules, vec![("plut.s4", &["plut.t1".to_string(), "plut.t2".to_string()][..])]);
    }

    #[test]
    fn malformed_rule_is_rejected() {
        let yaml = "custom_sequences:\n  - plut.t1 into plut.s4\n";
        assert!(serde_yaml::from_str::<FilterConfig>(yaml).is_err());
    }

    #[test]
    fn normalized_strips_hash_and_duplicates() {
        let config = FilterConfig::new()
            .with_sources(["#plut", "plut", "gal"])
            .with_focus(["#plut.t1"])
            .with_custom_proposition("#plut.p1", ["#plut.t1"]);
        let normalized = config.normalized();
        assert_eq!(normalized.sources_to_select, vec!["plut", "gal"]);
        assert_eq!(normalized.thesis_focus_id, vec!["plut.t1"]);
        assert_eq!(
            normalized.custom_propositions.iter().next(),
            Some(("plut.p1", &["plut.t1".to_string()][..]))
        );
    }
}
