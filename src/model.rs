use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// A solve result as returned by the solving service under `solution`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub complete_solution: CompleteSolution,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attempted_solutions: Vec<AttemptedSolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive_clue: Option<InteractiveClue>,
    #[serde(default, alias = "reasoning_analysis", skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// One candidate answer with its wordplay breakdown.
///
/// The service uses the same shape for the accepted solution and for the
/// rejected or partial attempts shown alongside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wordplay_components: Vec<WordplayComponent>,
}

pub type CompleteSolution = Solution;
pub type AttemptedSolution = Solution;

impl Solution {
    pub fn solution_text(&self) -> Option<&str> {
        non_blank(self.solution.as_deref())
    }

    pub fn definition_text(&self) -> Option<&str> {
        non_blank(self.definition.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordplayComponent {
    #[serde(default)]
    pub indicator: String,
    #[serde(default)]
    pub wordplay_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WordplayComponent {
    pub fn target_text(&self) -> Option<&str> {
        non_blank(self.target.as_deref())
    }

    pub fn result_text(&self) -> Option<&str> {
        non_blank(self.result.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractiveClue {
    #[serde(default)]
    pub original_clue: String,
    #[serde(default)]
    pub word_mapping: WordMapping,
}

impl InteractiveClue {
    pub fn tokens(&self) -> Vec<&str> {
        tokenize(&self.original_clue)
    }
}

/// Role annotations keyed by 0-based token position.
///
/// Kept as a plain table, independent of whatever elements get rendered for
/// the tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordMapping(BTreeMap<usize, WordRoleEntry>);

impl WordMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: usize, entry: WordRoleEntry) -> Option<WordRoleEntry> {
        self.0.insert(position, entry)
    }

    pub fn get(&self, position: usize) -> Option<&WordRoleEntry> {
        self.0.get(&position)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &WordRoleEntry)> {
        self.0.iter().map(|(position, entry)| (*position, entry))
    }

    /// First related position whose entry carries a role different from
    /// `entry`'s own role, scanning `related_positions` in order.
    pub fn counterpart(&self, entry: &WordRoleEntry) -> Option<(usize, &WordRoleEntry)> {
        entry.related_positions.iter().find_map(|&position| {
            self.get(position)
                .filter(|related| related.role != entry.role)
                .map(|related| (position, related))
        })
    }
}

impl FromIterator<(usize, WordRoleEntry)> for WordMapping {
    fn from_iter<I: IntoIterator<Item = (usize, WordRoleEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for WordMapping {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WordMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // One bad entry only costs that token its annotation.
        let raw = Option::<Value>::deserialize(deserializer)?;
        let mapping = match raw {
            None | Some(Value::Null) => Self::default(),
            Some(Value::Array(entries)) => entries
                .into_iter()
                .enumerate()
                .filter_map(|(position, value)| decode_entry(position, value))
                .collect(),
            Some(Value::Object(entries)) => entries
                .into_iter()
                .filter_map(|(key, value)| match key.trim().parse::<usize>() {
                    Ok(position) => decode_entry(position, value),
                    Err(_) => {
                        debug!(key = %key, "Skipping word mapping entry with invalid position");
                        None
                    }
                })
                .collect(),
            Some(other) => {
                debug!(kind = json_kind(&other), "Ignoring word mapping of unexpected shape");
                Self::default()
            }
        };
        Ok(mapping)
    }
}

fn decode_entry(position: usize, value: Value) -> Option<(usize, WordRoleEntry)> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<WordRoleEntry>(value) {
        Ok(entry) => Some((position, entry)),
        Err(err) => {
            debug!(position, error = %err, "Skipping malformed word mapping entry");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRoleEntry {
    #[serde(default)]
    pub role: Role,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wordplay_type: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "positions")]
    pub related_positions: Vec<usize>,
}

impl WordRoleEntry {
    pub fn new(role: Role, description: impl Into<String>) -> Self {
        Self {
            role,
            kind: None,
            wordplay_type: None,
            description: description.into(),
            result: None,
            related_positions: Vec::new(),
        }
    }

    /// The type line shown in a tooltip, if any.
    pub fn type_label(&self) -> Option<&str> {
        let wordplay = non_blank(self.wordplay_type.as_deref());
        match non_blank(self.kind.as_deref()) {
            Some(kind) if Some(kind) != wordplay => Some(kind),
            _ => wordplay.filter(|value| *value != "none"),
        }
    }

    pub fn result_text(&self) -> Option<&str> {
        non_blank(self.result.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Definition,
    Indicator,
    Target,
    Connector,
    #[default]
    #[serde(other)]
    Other,
}

impl Role {
    /// Roles shown in the legend, in display order.
    pub const LEGEND: [Role; 3] = [Role::Definition, Role::Indicator, Role::Target];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Definition => "definition",
            Role::Indicator => "indicator",
            Role::Target => "target",
            Role::Connector => "connector",
            Role::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Definition => "Definition",
            Role::Indicator => "Indicator",
            Role::Target => "Target",
            Role::Connector => "Connector",
            Role::Other => "Other",
        }
    }

    pub fn css_class(&self) -> String {
        format!("role-{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a clue into the tokens that `word_mapping` positions index into.
///
/// Whitespace-separated, punctuation stays attached to its word.
pub fn tokenize(clue: &str) -> Vec<&str> {
    clue.split_whitespace().collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Token positions, dropping anything that is not a non-negative integer.
fn positions<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .iter()
        .filter_map(Value::as_u64)
        .filter_map(|position| usize::try_from(position).ok())
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
