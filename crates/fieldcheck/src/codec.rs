//! Textual encoding of rule lists.
//!
//! A rule specification is a flat join of `key` or `key:value` tokens
//! separated by `|`, e.g. `required|maxLength:16|optional:1,2,3`. Parsing
//! and serialization are mirrors of each other: parsing the serialized form
//! of any rule list reconstructs an equal list.

use std::str::FromStr;

use thiserror::Error;

use crate::rule::Rule;

/// A malformed rule specification. The parse fails as a whole; no partial
/// rule list is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// A token had more than one `:` separator, or no key at all.
    #[error("malformed key-value pair `{0}`")]
    MalformedPair(String),
    /// A parameterized rule appeared without its value.
    #[error("rule `{0}` requires a value")]
    MissingValue(&'static str),
    /// A rule parameter could not be parsed.
    #[error("invalid parameter `{value}` for rule `{key}`")]
    InvalidParameter {
        key: &'static str,
        value: String,
    },
}

/// Parse a rule specification string into a rule list.
///
/// Tokens are trimmed and empty tokens are dropped, at both the `|` and the
/// `:` level. Unknown keys produce no rule and are silently skipped; a flag
/// rule with a value other than `true` (case-insensitive) likewise does not
/// match.
pub fn parse(spec: &str) -> Result<Vec<Rule>, SpecError> {
    let mut rules = Vec::new();
    for pair in spec.split('|').map(str::trim).filter(|p| !p.is_empty()) {
        let parts: Vec<&str> = pair
            .split(':')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() || parts.len() > 2 {
            return Err(SpecError::MalformedPair(pair.to_string()));
        }
        if let Some(rule) = decode(parts[0], parts.get(1).copied())? {
            rules.push(rule);
        }
    }
    Ok(rules)
}

/// Serialize a rule list back to its specification string.
///
/// Output order equals input order; flag rules always render their
/// canonical bare form (`required`, never `required:true`).
pub fn serialize(rules: &[Rule]) -> String {
    rules.iter().map(encode).collect::<Vec<_>>().join("|")
}

fn decode(key: &str, value: Option<&str>) -> Result<Option<Rule>, SpecError> {
    let rule = match key {
        "required" => flag(Rule::Required, value),
        "prohibited" => flag(Rule::Prohibited, value),
        "email" => flag(Rule::Email, value),
        "alpha" => flag(Rule::Alpha, value),
        "alphaNumber" => flag(Rule::AlphaNumber, value),
        "alphaSpace" => flag(Rule::AlphaSpace, value),
        "alphaUnderscore" => flag(Rule::AlphaUnderscore, value),
        "bool" => flag(Rule::Bool, value),
        "byte" => flag(Rule::Byte, value),
        "short" => flag(Rule::Short, value),
        "int" => flag(Rule::Int, value),
        "long" => flag(Rule::Long, value),
        "float" => flag(Rule::Float, value),
        "double" => flag(Rule::Double, value),
        "list" => flag(Rule::List, value),
        "map" => flag(Rule::Map, value),
        "ISO8601Date" => flag(Rule::Iso8601Date, value),
        "ISO8601Time" => flag(Rule::Iso8601Time, value),
        "ISO8601Datetime" => flag(Rule::Iso8601DateTime, value),
        "datetime" => flag(Rule::DateTime, value),
        "equals" => Some(Rule::Equals(required_value("equals", value)?.to_string())),
        "regex" => Some(Rule::Regex(required_value("regex", value)?.to_string())),
        "maxLength" => Some(Rule::MaxLength(param("maxLength", value)?)),
        "minLength" => Some(Rule::MinLength(param("minLength", value)?)),
        "fixLength" => Some(Rule::FixLength(param("fixLength", value)?)),
        "max" => Some(Rule::Max(param("max", value)?)),
        "min" => Some(Rule::Min(param("min", value)?)),
        "decimal" => Some(Rule::Decimal(param("decimal", value)?)),
        "digits" => match value {
            None => Some(Rule::Digits(None)),
            Some(_) => Some(Rule::Digits(Some(param("digits", value)?))),
        },
        "optional" => {
            let raw = required_value("optional", value)?;
            let values = raw
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect();
            Some(Rule::Optional(values))
        }
        _ => None,
    };
    Ok(rule)
}

fn encode(rule: &Rule) -> String {
    match rule {
        Rule::Equals(value) => format!("equals:{value}"),
        Rule::Regex(pattern) => format!("regex:{pattern}"),
        Rule::MaxLength(len) => format!("maxLength:{len}"),
        Rule::MinLength(len) => format!("minLength:{len}"),
        Rule::FixLength(len) => format!("fixLength:{len}"),
        Rule::Max(bound) => format!("max:{bound}"),
        Rule::Min(bound) => format!("min:{bound}"),
        Rule::Optional(values) => format!("optional:{}", values.join(",")),
        Rule::Digits(Some(len)) => format!("digits:{len}"),
        Rule::Decimal(point) => format!("decimal:{point}"),
        flag => flag.key().to_string(),
    }
}

/// A flag rule matches a bare key or `key:true`; any other value means
/// this token is not that rule.
fn flag(rule: Rule, value: Option<&str>) -> Option<Rule> {
    match value {
        None => Some(rule),
        Some(v) if v.eq_ignore_ascii_case("true") => Some(rule),
        Some(_) => None,
    }
}

fn required_value<'a>(key: &'static str, value: Option<&'a str>) -> Result<&'a str, SpecError> {
    value.ok_or(SpecError::MissingValue(key))
}

fn param<T: FromStr>(key: &'static str, value: Option<&str>) -> Result<T, SpecError> {
    let raw = required_value(key, value)?;
    raw.parse().map_err(|_| SpecError::InvalidParameter {
        key,
        value: raw.to_string(),
    })
}
