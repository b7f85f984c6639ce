//! Defensive parsing of oracle replies.
//!
//! Oracle replies arrive as free text. Depending on the model and version
//! the same information may come back as a JSON object, a JSON object inside
//! a fenced code block, or labelled lines:
//!
//! | Shape | Example |
//! |-------|---------|
//! | JSON | `{"best": "critic", "rankings": ["critic", "analyst"]}` |
//! | Fenced JSON | ```` ```json {...} ``` ```` |
//! | Labelled lines | `BEST: critic` / `RANKINGS: critic > analyst` |
//!
//! [`OracleReply::parse`] normalizes all three into [`ReplyFields`], keyed by
//! lowercase snake_case names. Consumers then look fields up through alias
//! lists, so a renamed field costs one more alias rather than a new parser.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Longest key accepted on a labelled line.
const MAX_LABEL_LEN: usize = 40;

/// A reply after the defensive adapter has looked at it.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleReply {
    Parsed(ReplyFields),
    Unparseable,
}

impl OracleReply {
    /// Parse raw oracle text into tagged fields.
    pub fn parse(raw: &str) -> Self {
        if let Some(object) = extract_json_object(raw)
            && !object.is_empty()
        {
            return OracleReply::Parsed(ReplyFields::from_object(object));
        }

        let labelled = parse_labelled_lines(raw);
        if labelled.is_empty() {
            OracleReply::Unparseable
        } else {
            OracleReply::Parsed(ReplyFields(labelled))
        }
    }

    pub fn fields(&self) -> Option<&ReplyFields> {
        match self {
            OracleReply::Parsed(fields) => Some(fields),
            OracleReply::Unparseable => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, OracleReply::Parsed(_))
    }
}

/// Normalized reply fields with alias-aware accessors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplyFields(BTreeMap<String, Value>);

impl ReplyFields {
    fn from_object(object: Map<String, Value>) -> Self {
        Self(
            object
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect(),
        )
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// First present, non-empty value among `aliases`.
    pub fn get(&self, aliases: &[&str]) -> Option<&Value> {
        aliases.iter().find_map(|alias| {
            self.0
                .get(&normalize_key(alias))
                .filter(|value| !is_blank(value))
        })
    }

    /// Read a field as text.
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        let value = self.get(aliases)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(items) => items
                .iter()
                .filter_map(scalar_text)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Object(_) => value.to_string(),
            Value::Null => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// Read a field as a list of labels.
    ///
    /// Arrays are taken item by item (objects contribute their `label`,
    /// `name` or `id`). Strings are split on `>` when present, otherwise on
    /// commas or newlines, with list numbering and bullets stripped.
    pub fn list(&self, aliases: &[&str]) -> Option<Vec<String>> {
        let value = self.get(aliases)?;
        let items: Vec<String> = match value {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => ["label", "name", "id", "persona", "candidate"]
                        .iter()
                        .find_map(|k| obj.get(*k).and_then(scalar_text)),
                    other => scalar_text(other),
                })
                .collect(),
            Value::String(s) => split_list(s),
            other => scalar_text(other).into_iter().collect(),
        };
        let items: Vec<String> = items
            .into_iter()
            .map(|item| strip_list_marker(&item).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        (!items.is_empty()).then_some(items)
    }

    /// Read a field as a number.
    ///
    /// Accepts JSON numbers, numeric strings, the leading number of a
    /// sentence (`"0.8 - solid"`) and fractions (`"8/10"`).
    pub fn number(&self, aliases: &[&str]) -> Option<f64> {
        let value = self.get(aliases)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_number(s),
            _ => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    /// Read a field as a yes/no flag.
    pub fn flag(&self, aliases: &[&str]) -> Option<bool> {
        match self.get(aliases)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|n| n > 0.0),
            Value::String(s) => {
                let lowered = s.trim().to_lowercase();
                let word = lowered
                    .split(|c: char| !c.is_alphanumeric())
                    .find(|w| !w.is_empty())?;
                match word {
                    "yes" | "y" | "true" | "respond" | "1" => Some(true),
                    "no" | "n" | "false" | "skip" | "abstain" | "0" => Some(false),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Read a field as a string-to-string map (e.g. nested hints).
    pub fn map(&self, aliases: &[&str]) -> Option<BTreeMap<String, String>> {
        match self.get(aliases)? {
            Value::Object(obj) => {
                let map: BTreeMap<String, String> = obj
                    .iter()
                    .filter_map(|(k, v)| scalar_text(v).map(|t| (normalize_key(k), t)))
                    .filter(|(_, v)| !v.is_empty())
                    .collect();
                (!map.is_empty()).then_some(map)
            }
            _ => None,
        }
    }
}

/// Lowercase snake_case form of a field name.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(obj) => obj.is_empty(),
        _ => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn split_list(s: &str) -> Vec<String> {
    let parts: Vec<&str> = if s.contains('>') {
        s.split('>').collect()
    } else if s.contains(',') {
        s.split(',').collect()
    } else {
        s.lines().collect()
    };
    parts.into_iter().map(|p| p.trim().to_string()).collect()
}

fn strip_list_marker(item: &str) -> &str {
    let item = item.trim().trim_start_matches(['-', '*', '•']).trim();
    let digits = item.chars().take_while(|c| c.is_ascii_digit()).count();
    let rest = &item[digits..];
    let unnumbered = if digits > 0 && (rest.starts_with('.') || rest.starts_with(')')) {
        rest[1..].trim()
    } else {
        item
    };
    unnumbered
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '[' || c == ']')
        .trim()
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Some((num, den)) = s.split_once('/') {
        let num = leading_number(num)?;
        let den = leading_number(den)?;
        return (den != 0.0).then(|| num / den);
    }
    leading_number(s)
}

fn leading_number(s: &str) -> Option<f64> {
    let token: String = s
        .trim()
        .chars()
        .skip_while(|c| !(c.is_ascii_digit() || *c == '-' || *c == '.'))
        .take_while(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();
    token.parse().ok()
}

/// Find a JSON object in the text: the whole reply, a fenced block, or the
/// outermost `{ ... }` span.
fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    let trimmed = raw.trim();
    let unfenced = strip_code_fence(trimmed);

    for candidate in [trimmed, unfenced] {
        if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(candidate) {
            return Some(obj);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse `KEY: value` lines; continuation lines extend the previous value.
fn parse_labelled_lines(raw: &str) -> BTreeMap<String, Value> {
    fn flush(entry: Option<(String, String)>, fields: &mut BTreeMap<String, Value>) {
        if let Some((key, value)) = entry {
            fields
                .entry(key)
                .or_insert(Value::String(value.trim().to_string()));
        }
    }

    let mut fields: BTreeMap<String, Value> = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    for line in raw.lines() {
        let cleaned = line
            .trim()
            .trim_start_matches(['-', '*', '#', '•'])
            .replace("**", "");
        let cleaned = cleaned.trim();

        if let Some((key, value)) = split_label(cleaned) {
            flush(current.take(), &mut fields);
            current = Some((key, value.to_string()));
        } else if let Some((_, value)) = current.as_mut() {
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(line.trim());
        }
    }
    flush(current.take(), &mut fields);

    fields
}

fn split_label(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    let valid = !key.is_empty()
        && key.len() <= MAX_LABEL_LEN
        && key.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-');
    valid.then(|| (normalize_key(key), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> ReplyFields {
        match OracleReply::parse(raw) {
            OracleReply::Parsed(fields) => fields,
            OracleReply::Unparseable => panic!("expected parsed reply for {raw:?}"),
        }
    }

    #[test]
    fn test_parse_plain_json() {
        let fields = parsed(r#"{"Best": "critic", "rankings": ["critic", "analyst"]}"#);
        assert_eq!(fields.text(&["best"]).unwrap(), "critic");
        assert_eq!(
            fields.list(&["rankings"]).unwrap(),
            vec!["critic".to_string(), "analyst".to_string()]
        );
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "Here you go:\n```json\n{\"route_score\": 0.7}\n```";
        let fields = parsed(raw);
        assert_eq!(fields.number(&["route_score"]), Some(0.7));
    }

    #[test]
    fn test_parse_labelled_lines() {
        let raw = "BEST: Analyst\nRANKINGS: Analyst > Critic > Synthesizer\nRATIONALE: The analyst\nwas most precise.";
        let fields = parsed(raw);
        assert_eq!(fields.text(&["best"]).unwrap(), "Analyst");
        assert_eq!(
            fields.list(&["rankings"]).unwrap(),
            vec!["Analyst", "Critic", "Synthesizer"]
        );
        assert_eq!(
            fields.text(&["rationale"]).unwrap(),
            "The analyst\nwas most precise."
        );
    }

    #[test]
    fn test_markdown_bold_labels() {
        let fields = parsed("- **Stop label**: continue\n- **Route score**: 0.9");
        assert_eq!(fields.text(&["stop_label"]).unwrap(), "continue");
        assert_eq!(fields.number(&["route_score"]), Some(0.9));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(OracleReply::parse(""), OracleReply::Unparseable);
        assert_eq!(
            OracleReply::parse("I cannot decide between these."),
            OracleReply::Unparseable
        );
        assert!(!OracleReply::parse("[1, 2, 3]").is_parsed());
    }

    #[test]
    fn test_alias_lookup_skips_blank_values() {
        let fields = parsed(r#"{"ranking": "", "order": "b > a"}"#);
        assert_eq!(
            fields.list(&["rankings", "ranking", "order"]).unwrap(),
            vec!["b", "a"]
        );
    }

    #[test]
    fn test_list_strips_numbering() {
        let fields = parsed("RANKING:\n1. critic\n2) analyst\n- synthesizer");
        assert_eq!(
            fields.list(&["ranking"]).unwrap(),
            vec!["critic", "analyst", "synthesizer"]
        );
    }

    #[test]
    fn test_list_from_objects() {
        let fields = parsed(r#"{"ranking": [{"label": "critic", "rank": 1}, {"name": "analyst"}]}"#);
        assert_eq!(fields.list(&["ranking"]).unwrap(), vec!["critic", "analyst"]);
    }

    #[test]
    fn test_number_variants() {
        let fields = parsed(
            r#"{"a": "0.8 - solid", "b": "8/10", "c": "n/a", "d": 1, "e": "1/0"}"#,
        );
        assert_eq!(fields.number(&["a"]), Some(0.8));
        assert_eq!(fields.number(&["b"]), Some(0.8));
        assert_eq!(fields.number(&["c"]), None);
        assert_eq!(fields.number(&["d"]), Some(1.0));
        assert_eq!(fields.number(&["e"]), None);
    }

    #[test]
    fn test_flag_variants() {
        let fields = parsed(r#"{"a": "Yes.", "b": "no", "c": true, "d": "maybe"}"#);
        assert_eq!(fields.flag(&["a"]), Some(true));
        assert_eq!(fields.flag(&["b"]), Some(false));
        assert_eq!(fields.flag(&["c"]), Some(true));
        assert_eq!(fields.flag(&["d"]), None);
    }

    #[test]
    fn test_map_field() {
        let fields = parsed(r#"{"expert_hints": {"Critic": "be concrete", "analyst": ""}}"#);
        let map = fields.map(&["expert_hints"]).unwrap();
        assert_eq!(map.get("critic").unwrap(), "be concrete");
        assert!(!map.contains_key("analyst"));
    }
}
