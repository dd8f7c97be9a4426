//! The closed set of validation rules.
//!
//! Each rule is a pure, stateless predicate over a single field value.
//! Evaluation is total: a value outside a rule's applicable type either
//! passes vacuously or fails as a normal violation, it never panics.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::Value;

// Pre-compiled patterns for the fixed-grammar rules.
static ALPHA_REGEX: OnceLock<Regex> = OnceLock::new();
static ALPHA_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
static ALPHA_SPACE_REGEX: OnceLock<Regex> = OnceLock::new();
static ALPHA_UNDERSCORE_REGEX: OnceLock<Regex> = OnceLock::new();
static ISO8601_DATE_REGEX: OnceLock<Regex> = OnceLock::new();
static ISO8601_TIME_REGEX: OnceLock<Regex> = OnceLock::new();
static ISO8601_DATETIME_REGEX: OnceLock<Regex> = OnceLock::new();
static DATETIME_REGEX: OnceLock<Regex> = OnceLock::new();
static DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_LOCAL_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_DOMAIN_REGEX: OnceLock<Regex> = OnceLock::new();

fn alpha_regex() -> &'static Regex {
    ALPHA_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z]*$").unwrap())
}

fn alpha_number_regex() -> &'static Regex {
    ALPHA_NUMBER_REGEX.get_or_init(|| Regex::new(r"^[0-9A-Za-z]*$").unwrap())
}

fn alpha_space_regex() -> &'static Regex {
    ALPHA_SPACE_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z\s]*$").unwrap())
}

fn alpha_underscore_regex() -> &'static Regex {
    ALPHA_UNDERSCORE_REGEX.get_or_init(|| Regex::new(r"^[0-9A-Za-z_]*$").unwrap())
}

fn iso8601_date_regex() -> &'static Regex {
    ISO8601_DATE_REGEX.get_or_init(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap())
}

fn iso8601_time_regex() -> &'static Regex {
    ISO8601_TIME_REGEX.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d:[0-5]\d$").unwrap())
}

fn iso8601_datetime_regex() -> &'static Regex {
    ISO8601_DATETIME_REGEX.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}T([01]\d|2[0-3]):[0-5]\d:[0-5]\d$").unwrap()
    })
}

fn datetime_regex() -> &'static Regex {
    DATETIME_REGEX.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{1,2}-\d{1,2} ([01]\d|2[0-3]):[0-5]\d:[0-5]\d$").unwrap()
    })
}

fn digits_regex() -> &'static Regex {
    DIGITS_REGEX.get_or_init(|| Regex::new(r"^(0|[1-9]\d*)$").unwrap())
}

fn email_local_regex() -> &'static Regex {
    EMAIL_LOCAL_REGEX.get_or_init(|| {
        // dot-separated atoms, everything before '@'
        Regex::new(r"^(?i)[a-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*$").unwrap()
    })
}

fn email_domain_regex() -> &'static Regex {
    EMAIL_DOMAIN_REGEX.get_or_init(|| {
        // dot-separated alphanumeric-hyphen labels, or a bracketed dotted-quad
        Regex::new(r"^(?i)([a-z0-9-]+(\.[a-z0-9-]+)*|\[\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\])$")
            .unwrap()
    })
}

/// A single, named validation predicate with fixed parameters.
///
/// Rules are immutable once constructed and freely shareable across
/// validation calls. The textual encoding in [`crate::codec`] maps each
/// variant to its [`key`](Rule::key), with parameters after a `:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "camelCase")]
pub enum Rule {
    /// Fails on an absent value or an empty string. A whitespace-only
    /// string is considered supplied.
    Required,
    /// Fails whenever the field is present at all, regardless of type.
    Prohibited,
    /// Case-insensitive comparison against the value's string form.
    Equals(String),
    /// Whole-value match of a user-supplied pattern against the value's
    /// string form. A pattern that fails to compile never matches.
    Regex(String),
    /// Maximum character count for strings and numeric string forms.
    MaxLength(usize),
    /// Minimum character count for strings and numeric string forms.
    MinLength(usize),
    /// Exact character count for strings and numeric string forms.
    FixLength(usize),
    /// Inclusive numeric upper bound; numeric strings are parsed first.
    Max(i64),
    /// Inclusive numeric lower bound; numeric strings are parsed first.
    Min(i64),
    /// Set membership: the value's string form must equal one of the
    /// allowed literals, case-insensitively.
    Optional(Vec<String>),
    Email,
    Alpha,
    AlphaNumber,
    AlphaSpace,
    AlphaUnderscore,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    List,
    Map,
    Iso8601Date,
    Iso8601Time,
    Iso8601DateTime,
    /// `yyyy-MM-dd HH:mm:ss`.
    DateTime,
    /// Unsigned integer literal with no leading zero, optionally of an
    /// exact digit count.
    Digits(Option<usize>),
    /// Decimal literal with no leading zero and a mandatory fractional
    /// part of 1..=n digits.
    Decimal(u32),
}

impl Rule {
    /// The key this rule uses in the textual rule specification.
    pub fn key(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Prohibited => "prohibited",
            Rule::Equals(_) => "equals",
            Rule::Regex(_) => "regex",
            Rule::MaxLength(_) => "maxLength",
            Rule::MinLength(_) => "minLength",
            Rule::FixLength(_) => "fixLength",
            Rule::Max(_) => "max",
            Rule::Min(_) => "min",
            Rule::Optional(_) => "optional",
            Rule::Email => "email",
            Rule::Alpha => "alpha",
            Rule::AlphaNumber => "alphaNumber",
            Rule::AlphaSpace => "alphaSpace",
            Rule::AlphaUnderscore => "alphaUnderscore",
            Rule::Bool => "bool",
            Rule::Byte => "byte",
            Rule::Short => "short",
            Rule::Int => "int",
            Rule::Long => "long",
            Rule::Float => "float",
            Rule::Double => "double",
            Rule::List => "list",
            Rule::Map => "map",
            Rule::Iso8601Date => "ISO8601Date",
            Rule::Iso8601Time => "ISO8601Time",
            Rule::Iso8601DateTime => "ISO8601Datetime",
            Rule::DateTime => "datetime",
            Rule::Digits(_) => "digits",
            Rule::Decimal(_) => "decimal",
        }
    }

    /// The violation message reported when this rule fails.
    pub fn message(&self) -> String {
        match self {
            Rule::Required => "Required".to_string(),
            Rule::Prohibited => "Prohibited".to_string(),
            Rule::Equals(value) => format!("Equals:{value}"),
            Rule::Regex(pattern) => format!("Must match pattern:{pattern}"),
            Rule::MaxLength(len) => format!("MaxLength:{len}"),
            Rule::MinLength(len) => format!("MinLength:{len}"),
            Rule::FixLength(len) => format!("FixLength:{len}"),
            Rule::Max(bound) => format!("Max value:{bound}"),
            Rule::Min(bound) => format!("Min value:{bound}"),
            Rule::Optional(values) => format!("Optional value:[{}]", values.join(", ")),
            Rule::Email => "Invalid Email".to_string(),
            Rule::Alpha => "only contain alphabetic characters".to_string(),
            Rule::AlphaNumber => "only contain alphabetic characters or numbers".to_string(),
            Rule::AlphaSpace => "only contain alphabetic characters or spaces".to_string(),
            Rule::AlphaUnderscore => {
                "only contain alphabetic characters, numbers or underscores".to_string()
            }
            Rule::Bool => "Bool Required".to_string(),
            Rule::Byte => "Byte Required".to_string(),
            Rule::Short => "Short Required".to_string(),
            Rule::Int => "int Required".to_string(),
            Rule::Long => "Long Required".to_string(),
            Rule::Float => "Float Required".to_string(),
            Rule::Double => "Double Required".to_string(),
            Rule::List => "List Required".to_string(),
            Rule::Map => "Map Required".to_string(),
            Rule::Iso8601Date => "Must match pattern: 'yyyy-MM-dd'".to_string(),
            Rule::Iso8601Time => "Must match pattern: 'HH:mm:ss'".to_string(),
            Rule::Iso8601DateTime => "Must match pattern: 'yyyy-MM-ddTHH:mm:ss'".to_string(),
            Rule::DateTime => "Must match pattern: 'yyyy-MM-dd HH:mm:ss'".to_string(),
            Rule::Digits(None) => "must be digits".to_string(),
            Rule::Digits(Some(len)) => format!("must be {len} digits"),
            Rule::Decimal(point) => format!("must be numeric and contain {point} decimal points"),
        }
    }

    /// Evaluate this rule against a field value; `None` means the field
    /// was not supplied.
    pub fn is_valid(&self, value: Option<&Value>) -> bool {
        match self {
            Rule::Required => match value {
                None => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
            Rule::Prohibited => value.is_none(),
            Rule::Equals(expected) => match value {
                None => true,
                Some(v) => expected.eq_ignore_ascii_case(&v.to_string()),
            },
            Rule::Regex(pattern) => match value {
                None => true,
                Some(v) => full_match(pattern, &v.to_string()),
            },
            Rule::MaxLength(len) => text_length(value, |actual| actual <= *len),
            Rule::MinLength(len) => text_length(value, |actual| actual >= *len),
            Rule::FixLength(len) => text_length(value, |actual| actual == *len),
            Rule::Max(bound) => numeric_bound(value, |n| n <= *bound, |n| n <= *bound as f64),
            Rule::Min(bound) => numeric_bound(value, |n| n >= *bound, |n| n >= *bound as f64),
            Rule::Optional(allowed) => match value {
                None => true,
                Some(v) => {
                    let text = v.to_string();
                    allowed.iter().any(|a| a.eq_ignore_ascii_case(&text))
                }
            },
            Rule::Email => match value {
                Some(Value::String(s)) => s.is_empty() || is_valid_email(s),
                _ => true,
            },
            Rule::Alpha => string_matches(value, alpha_regex()),
            Rule::AlphaNumber => string_matches(value, alpha_number_regex()),
            Rule::AlphaSpace => string_matches(value, alpha_space_regex()),
            Rule::AlphaUnderscore => string_matches(value, alpha_underscore_regex()),
            Rule::Bool => match value {
                None => true,
                Some(Value::Bool(_)) => true,
                Some(Value::String(s)) => s == "true" || s == "false",
                Some(_) => false,
            },
            Rule::Byte => integer_width(value, i8::MIN as i64, i8::MAX as i64, |s| {
                s.parse::<i8>().is_ok()
            }),
            Rule::Short => integer_width(value, i16::MIN as i64, i16::MAX as i64, |s| {
                s.parse::<i16>().is_ok()
            }),
            Rule::Int => integer_width(value, i32::MIN as i64, i32::MAX as i64, |s| {
                s.parse::<i32>().is_ok()
            }),
            Rule::Long => integer_width(value, i64::MIN, i64::MAX, |s| s.parse::<i64>().is_ok()),
            Rule::Float => match value {
                None => true,
                Some(v) if v.is_number() => true,
                Some(Value::String(s)) => s.parse::<f32>().is_ok(),
                Some(_) => false,
            },
            Rule::Double => match value {
                None => true,
                Some(v) if v.is_number() => true,
                Some(Value::String(s)) => s.parse::<f64>().is_ok(),
                Some(_) => false,
            },
            Rule::List => matches!(value, None | Some(Value::Array(_))),
            Rule::Map => matches!(value, None | Some(Value::Map(_))),
            Rule::Iso8601Date => string_matches(value, iso8601_date_regex()),
            Rule::Iso8601Time => string_matches(value, iso8601_time_regex()),
            Rule::Iso8601DateTime => string_matches(value, iso8601_datetime_regex()),
            Rule::DateTime => string_matches(value, datetime_regex()),
            Rule::Digits(len) => match value {
                None => true,
                Some(v) => {
                    let text = v.to_string();
                    digits_regex().is_match(&text)
                        && len.map_or(true, |expected| text.chars().count() == expected)
                }
            },
            Rule::Decimal(point) => match value {
                None => true,
                Some(v) => {
                    let pattern =
                        format!(r"[1-9]\d*\.\d{{1,{point}}}|0\.\d{{1,{point}}}");
                    full_match(&pattern, &v.to_string())
                }
            },
        }
    }
}

/// Whole-value match with a pattern compiled on demand; an invalid
/// pattern never matches.
fn full_match(pattern: &str, text: &str) -> bool {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

/// Strings must match the anchored pattern; everything else passes.
fn string_matches(value: Option<&Value>, re: &Regex) -> bool {
    match value.and_then(Value::as_str) {
        Some(s) => re.is_match(s),
        None => true,
    }
}

/// Length checks apply to strings and to the string form of numbers;
/// everything else passes.
fn text_length(value: Option<&Value>, check: impl Fn(usize) -> bool) -> bool {
    match value {
        Some(Value::String(s)) => check(s.chars().count()),
        Some(v) if v.is_number() => check(v.to_string().chars().count()),
        _ => true,
    }
}

/// Bound checks apply to numbers directly and to parseable numeric
/// strings (a parse failure is a violation); everything else passes.
/// Integers compare exactly as `i64` so 64-bit boundary values are not
/// rounded through `f64`; only genuine floats take the float comparison.
fn numeric_bound(
    value: Option<&Value>,
    check_int: impl Fn(i64) -> bool,
    check_float: impl Fn(f64) -> bool,
) -> bool {
    match value {
        Some(Value::I8(n)) => check_int(i64::from(*n)),
        Some(Value::I16(n)) => check_int(i64::from(*n)),
        Some(Value::I32(n)) => check_int(i64::from(*n)),
        Some(Value::I64(n)) => check_int(*n),
        Some(Value::F32(n)) => check_float(f64::from(*n)),
        Some(Value::F64(n)) => check_float(*n),
        Some(Value::String(s)) => match s.parse::<i64>() {
            Ok(n) => check_int(n),
            Err(_) => s.parse::<f64>().map(|n| check_float(n)).unwrap_or(false),
        },
        _ => true,
    }
}

/// Integer-width checks: native integers pass when inside the target
/// range (widening included), numeric strings are re-parsed at the target
/// width, floats and non-numeric types fail.
fn integer_width(
    value: Option<&Value>,
    min: i64,
    max: i64,
    parses: impl Fn(&str) -> bool,
) -> bool {
    let in_range = |n: i64| n >= min && n <= max;
    match value {
        None => true,
        Some(Value::I8(n)) => in_range(i64::from(*n)),
        Some(Value::I16(n)) => in_range(i64::from(*n)),
        Some(Value::I32(n)) => in_range(i64::from(*n)),
        Some(Value::I64(n)) => in_range(*n),
        Some(Value::String(s)) => parses(s),
        Some(_) => false,
    }
}

fn is_valid_email(text: &str) -> bool {
    // Split with limit 3: a second '@' yields a third part and rejects the
    // address without ever reaching the pattern match.
    let parts: Vec<&str> = text.splitn(3, '@').collect();
    if parts.len() != 2 {
        return false;
    }
    // IDNA toASCII drops a trailing '.', so reject it up front.
    if parts[0].ends_with('.') || parts[1].ends_with('.') {
        return false;
    }
    let Ok(local) = idna::domain_to_ascii(parts[0]) else {
        return false;
    };
    let Ok(domain) = idna::domain_to_ascii(parts[1]) else {
        return false;
    };
    // The non-strict mapping skips DNS length verification, so enforce it
    // here on both encoded parts.
    if !dns_lengths_ok(&local) || !dns_lengths_ok(&domain) {
        return false;
    }
    email_local_regex().is_match(&local) && email_domain_regex().is_match(&domain)
}

/// DNS limits: 63 octets per label, 255 for the full name.
fn dns_lengths_ok(name: &str) -> bool {
    name.len() <= 255 && name.split('.').all(|label| label.len() <= 63)
}
