//! Locale pattern tables and their compiled form.
//!
//! A [`PatternTable`] is plain configuration (raw regex strings, usually loaded
//! from TOML). [`MergePatterns`] is the validated, compiled form handed to the
//! pipeline. Compilation happens once; a bad pattern is a setup-time error.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the capture group holding the trailing number in `number_ending`.
pub const NUMBER_ENDING_GROUP: &str = "newTime";

/// Errors raised while compiling a [`PatternTable`].
#[derive(Debug, Error)]
pub enum PatternError {
    /// A pattern failed to compile.
    #[error("invalid {name} pattern: {source}")]
    Invalid {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// A pattern compiled but lacks a capture group the pipeline reads.
    #[error("{name} pattern must define the named group `{group}`")]
    MissingGroup {
        name: &'static str,
        group: &'static str,
    },
}

/// Raw trigger/suppress pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguityRuleTable {
    /// Tested against the whole text; the rule only applies when it matches.
    pub trigger: String,
    /// Spans overlapping any match of this pattern are removed.
    pub suppress: String,
}

/// Raw per-locale pattern configuration. Absent patterns disable their stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unspecific_date_period: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguity_filters: Vec<AmbiguityRuleTable>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub calendar_filter_words: Vec<String>,
    /// Must define the named group `newTime`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_ending: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub around: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_after: Option<String>,
}

/// Modifier words that can be absorbed in front of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Before,
    After,
    Since,
    Around,
}

impl ModifierKind {
    /// Order in which modifiers are tried; the first success wins.
    pub const PRIORITY: [Self; 4] = [Self::Before, Self::After, Self::Since, Self::Around];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Since => "since",
            Self::Around => "around",
        }
    }
}

/// Compiled trigger/suppress pair.
#[derive(Debug, Clone)]
pub struct AmbiguityRule {
    pub trigger: Regex,
    pub suppress: Regex,
}

/// A modifier pattern compiled to only match at the very end of its input.
#[derive(Debug, Clone)]
pub struct ModifierRule {
    pub kind: ModifierKind,
    pub(crate) trailing: Regex,
}

/// Compiled, validated pattern set.
#[derive(Debug, Clone, Default)]
pub struct MergePatterns {
    pub(crate) from_to: Option<Regex>,
    pub(crate) unspecific_date_period: Option<Regex>,
    pub(crate) ambiguity_rules: Vec<AmbiguityRule>,
    pub(crate) calendar_filters: Vec<Regex>,
    pub(crate) number_ending: Option<Regex>,
    pub(crate) modifiers: Vec<ModifierRule>,
    /// Anchored at both ends; matched against the whole trailing remainder.
    pub(crate) year_after: Option<Regex>,
}

impl MergePatterns {
    /// Compiles every pattern in `table`.
    pub fn compile(table: &PatternTable) -> Result<Self, PatternError> {
        let ambiguity_rules = table
            .ambiguity_filters
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                Ok(AmbiguityRule {
                    trigger: build(&format!("ambiguity_filters[{i}].trigger"), &rule.trigger)?,
                    suppress: build(
                        &format!("ambiguity_filters[{i}].suppress"),
                        &rule.suppress,
                    )?,
                })
            })
            .collect::<Result<Vec<_>, PatternError>>()?;

        let calendar_filters = table
            .calendar_filter_words
            .iter()
            .enumerate()
            .map(|(i, p)| build(&format!("calendar_filter_words[{i}]"), p))
            .collect::<Result<Vec<_>, _>>()?;

        let number_ending = optional("number_ending", table.number_ending.as_deref())?;
        if number_ending
            .as_ref()
            .is_some_and(|re| !re.capture_names().flatten().any(|n| n == NUMBER_ENDING_GROUP))
        {
            return Err(PatternError::MissingGroup {
                name: "number_ending",
                group: NUMBER_ENDING_GROUP,
            });
        }

        let mut modifiers = Vec::new();
        for kind in ModifierKind::PRIORITY {
            let raw = match kind {
                ModifierKind::Before => table.before.as_deref(),
                ModifierKind::After => table.after.as_deref(),
                ModifierKind::Since => table.since.as_deref(),
                ModifierKind::Around => table.around.as_deref(),
            };
            if let Some(raw) = raw {
                let trailing = build_insensitive(kind.as_str(), &format!(r"(?:{raw})\z"))?;
                modifiers.push(ModifierRule { kind, trailing });
            }
        }

        let year_after = table
            .year_after
            .as_deref()
            .map(|raw| build_insensitive("year_after", &format!(r"\A(?:{raw})\z")))
            .transpose()?;

        Ok(Self {
            from_to: optional("from_to", table.from_to.as_deref())?,
            unspecific_date_period: optional(
                "unspecific_date_period",
                table.unspecific_date_period.as_deref(),
            )?,
            ambiguity_rules,
            calendar_filters,
            number_ending,
            modifiers,
            year_after,
        })
    }

    /// Number of compiled patterns, counting each ambiguity rule as two.
    pub fn len(&self) -> usize {
        [
            self.from_to.is_some(),
            self.unspecific_date_period.is_some(),
            self.number_ending.is_some(),
            self.year_after.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
            + self.ambiguity_rules.len() * 2
            + self.calendar_filters.len()
            + self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compiled modifier rules in priority order.
    pub fn modifiers(&self) -> &[ModifierRule] {
        &self.modifiers
    }
}

fn build(name: &str, raw: &str) -> Result<Regex, PatternError> {
    Regex::new(raw).map_err(|source| PatternError::Invalid {
        name: name.to_string(),
        source,
    })
}

fn build_insensitive(name: &str, raw: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(raw)
        .case_insensitive(true)
        .build()
        .map_err(|source| PatternError::Invalid {
            name: name.to_string(),
            source,
        })
}

fn optional(name: &str, raw: Option<&str>) -> Result<Option<Regex>, PatternError> {
    raw.map(|raw| build(name, raw)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_compiles_to_empty_set() {
        let patterns = MergePatterns::compile(&PatternTable::default()).unwrap();
        assert!(patterns.is_empty());
        assert!(patterns.modifiers().is_empty());
    }

    #[test]
    fn counts_every_compiled_pattern() {
        let table = PatternTable {
            from_to: Some(r"^from\b".to_string()),
            ambiguity_filters: vec![AmbiguityRuleTable {
                trigger: "may".to_string(),
                suppress: "may".to_string(),
            }],
            calendar_filter_words: vec!["episode".to_string()],
            before: Some(r"\bbefore".to_string()),
            around: Some(r"\baround".to_string()),
            ..PatternTable::default()
        };
        let patterns = MergePatterns::compile(&table).unwrap();
        assert_eq!(patterns.len(), 6);
    }

    #[test]
    fn modifiers_follow_priority_order() {
        let table = PatternTable {
            around: Some("around".to_string()),
            before: Some("before".to_string()),
            since: Some("since".to_string()),
            ..PatternTable::default()
        };
        let patterns = MergePatterns::compile(&table).unwrap();
        let kinds: Vec<_> = patterns.modifiers().iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![ModifierKind::Before, ModifierKind::Since, ModifierKind::Around]
        );
    }

    #[test]
    fn modifier_patterns_only_match_at_the_end() {
        let table = PatternTable {
            after: Some(r"\bafter".to_string()),
            ..PatternTable::default()
        };
        let patterns = MergePatterns::compile(&table).unwrap();
        let rule = &patterns.modifiers()[0];
        assert!(rule.trailing.is_match("meeting AFTER"));
        assert!(!rule.trailing.is_match("after the meeting"));
    }

    #[test]
    fn invalid_pattern_names_the_entry() {
        let table = PatternTable {
            calendar_filter_words: vec!["ok".to_string(), "(unclosed".to_string()],
            ..PatternTable::default()
        };
        let err = MergePatterns::compile(&table).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("invalid calendar_filter_words[1] pattern")
        );
    }

    #[test]
    fn invalid_modifier_is_reported_by_kind() {
        let table = PatternTable {
            since: Some("[".to_string()),
            ..PatternTable::default()
        };
        let err = MergePatterns::compile(&table).unwrap_err();
        assert!(err.to_string().starts_with("invalid since pattern"));
    }

    #[test]
    fn number_ending_requires_new_time_group() {
        let table = PatternTable {
            number_ending: Some(r"^\s+to\s+(\d+)".to_string()),
            ..PatternTable::default()
        };
        let err = MergePatterns::compile(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "number_ending pattern must define the named group `newTime`"
        );

        let table = PatternTable {
            number_ending: Some(r"^\s+to\s+(?P<newTime>\d+)".to_string()),
            ..PatternTable::default()
        };
        assert!(MergePatterns::compile(&table).is_ok());
    }

    #[test]
    fn table_deserializes_from_json_with_defaults() {
        let table: PatternTable = serde_json::from_str(
            r#"{"before":"before","ambiguity_filters":[{"trigger":"a","suppress":"b"}]}"#,
        )
        .unwrap();
        assert_eq!(table.before.as_deref(), Some("before"));
        assert_eq!(table.ambiguity_filters.len(), 1);
        assert!(table.after.is_none());
    }
}
