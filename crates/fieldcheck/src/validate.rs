//! The validation engine: binds rule sets to fields and evaluates them
//! against a value bag, aggregating every violation before reporting.

use crate::codec::{self, SpecError};
use crate::error::{ErrorReport, ValidationError};
use crate::rule::Rule;
use crate::value::{MultiValueBag, Value, ValueBag};

/// An ordered binding from field names to their rule lists.
///
/// Rules and bindings are constructed once and shared read-only across
/// validation calls. Evaluation order across fields and across rules
/// within a field is insertion order; it determines message ordering in
/// the report and nothing else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<(String, Vec<Rule>)>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to a field, creating the field entry on first use.
    pub fn add(&mut self, field: impl Into<String>, rule: Rule) {
        let field = field.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, rules)) => rules.push(rule),
            None => self.entries.push((field, vec![rule])),
        }
    }

    /// Builder-style: bind a list of rules to a field.
    pub fn field(mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        let field = field.into();
        for rule in rules {
            self.add(field.clone(), rule);
        }
        self
    }

    /// Builder-style: bind a field to the rules parsed from a
    /// specification string, e.g. `"required|maxLength:16"`.
    pub fn parse_field(mut self, field: impl Into<String>, spec: &str) -> Result<Self, SpecError> {
        let field = field.into();
        for rule in codec::parse(spec)? {
            self.add(field.clone(), rule);
        }
        Ok(self)
    }

    /// Whether no field is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate fields and their rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.entries
            .iter()
            .map(|(field, rules)| (field.as_str(), rules.as_slice()))
    }
}

/// External collaborator seam: anything that can flatten itself into a
/// field-to-value mapping can be validated with [`validate_object`].
pub trait ToFieldMap {
    /// Produce a mapping from field name to current value.
    fn to_field_map(&self) -> ValueBag;
}

/// Validate a scalar value bag against a rule set.
///
/// Every rule of every field is evaluated; nothing short-circuits. All
/// violations are aggregated into a single [`ValidationError`] raised at
/// the end of the call.
pub fn validate(params: &ValueBag, rules: &RuleSet) -> Result<(), ValidationError> {
    let mut report = ErrorReport::new();
    for (field, field_rules) in rules.iter() {
        let value = params.get(field);
        for rule in field_rules {
            if !rule.is_valid(value) {
                report.put(field, rule.message());
            }
        }
    }
    finish(report)
}

/// Validate a multi-valued bag (e.g. repeated query parameters).
///
/// A `required` rule against an absent or empty entry records exactly one
/// violation for the field; every other combination evaluates each present
/// value independently, one violation per failing value.
pub fn validate_multi(params: &MultiValueBag, rules: &RuleSet) -> Result<(), ValidationError> {
    let mut report = ErrorReport::new();
    for (field, field_rules) in rules.iter() {
        let values: Vec<Value> = params
            .get(field)
            .map(|vs| vs.iter().map(|v| Value::String(v.clone())).collect())
            .unwrap_or_default();
        for rule in field_rules {
            if values.is_empty() && matches!(rule, Rule::Required) {
                report.put(field, rule.message());
                continue;
            }
            for value in &values {
                if !rule.is_valid(Some(value)) {
                    report.put(field, rule.message());
                }
            }
        }
    }
    finish(report)
}

/// Validate a structured object by flattening it through [`ToFieldMap`]
/// and delegating to [`validate`].
pub fn validate_object<T: ToFieldMap>(target: &T, rules: &RuleSet) -> Result<(), ValidationError> {
    validate(&target.to_field_map(), rules)
}

fn finish(report: ErrorReport) -> Result<(), ValidationError> {
    if report.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_rules() -> RuleSet {
        RuleSet::new()
            .field("username", [Rule::Required, Rule::MaxLength(16)])
            .field("password", [Rule::Required])
    }

    #[test]
    fn aggregates_all_violations() {
        let rules = user_rules()
            .field("profile", [Rule::Required])
            .field("interest", [Rule::Required]);

        let mut params = ValueBag::new();
        params.insert("username".to_string(), Value::from("edgar"));

        let err = validate(&params, &rules).unwrap_err();
        assert_eq!(err.report().len(), 3);
        assert!(err.report().get("username").is_none());
        assert_eq!(err.report().get("password").unwrap(), &["Required"]);
        assert_eq!(err.report().get("profile").unwrap(), &["Required"]);
        assert_eq!(err.report().get("interest").unwrap(), &["Required"]);
    }

    #[test]
    fn type_test_rules_fail_on_scalars() {
        let rules = user_rules()
            .field("profile", [Rule::Required, Rule::List])
            .field("interest", [Rule::Map]);

        let mut params = ValueBag::new();
        params.insert("username".to_string(), Value::from("edgar"));
        params.insert("profile".to_string(), Value::from("edgar"));
        params.insert("interest".to_string(), Value::from("edgar"));

        let err = validate(&params, &rules).unwrap_err();
        assert_eq!(err.report().len(), 3);
        assert_eq!(err.report().get("profile").unwrap(), &["List Required"]);
        assert_eq!(err.report().get("interest").unwrap(), &["Map Required"]);
    }

    #[test]
    fn containers_satisfy_type_tests() {
        let rules = user_rules()
            .field("profile", [Rule::Required, Rule::List])
            .field("interest", [Rule::Map]);

        let mut params = ValueBag::new();
        params.insert("username".to_string(), Value::from("edgar"));
        params.insert("profile".to_string(), Value::Array(vec![]));
        params.insert("interest".to_string(), Value::Map(Default::default()));

        let err = validate(&params, &rules).unwrap_err();
        assert_eq!(err.report().len(), 1);
        assert_eq!(err.report().get("password").unwrap(), &["Required"]);
    }

    #[test]
    fn passes_when_all_rules_hold() {
        let mut params = ValueBag::new();
        params.insert("username".to_string(), Value::from("edgar"));
        params.insert("password".to_string(), Value::from("secret"));

        assert!(validate(&params, &user_rules()).is_ok());
    }

    #[test]
    fn is_idempotent() {
        let mut params = ValueBag::new();
        params.insert("username".to_string(), Value::from("edgar"));

        let first = validate(&params, &user_rules()).unwrap_err();
        let second = validate(&params, &user_rules()).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn multi_required_absent_records_one_violation() {
        let rules = RuleSet::new().field("tag", [Rule::Required]);
        let params = MultiValueBag::new();

        let err = validate_multi(&params, &rules).unwrap_err();
        assert_eq!(err.report().len(), 1);
        assert_eq!(err.report().get("tag").unwrap(), &["Required"]);
    }

    #[test]
    fn multi_required_empty_entry_records_one_violation() {
        let rules = RuleSet::new().field("tag", [Rule::Required]);
        let mut params = MultiValueBag::new();
        params.insert("tag".to_string(), vec![]);

        let err = validate_multi(&params, &rules).unwrap_err();
        assert_eq!(err.report().len(), 1);
    }

    #[test]
    fn multi_evaluates_each_value() {
        let rules = RuleSet::new().field("id", [Rule::Digits(None)]);
        let mut params = MultiValueBag::new();
        params.insert(
            "id".to_string(),
            vec!["12".to_string(), "ab".to_string(), "03".to_string()],
        );

        let err = validate_multi(&params, &rules).unwrap_err();
        assert_eq!(err.report().get("id").unwrap().len(), 2);
    }

    #[test]
    fn multi_passes_when_values_hold() {
        let rules = RuleSet::new().field("id", [Rule::Required, Rule::Digits(None)]);
        let mut params = MultiValueBag::new();
        params.insert("id".to_string(), vec!["12".to_string(), "7".to_string()]);

        assert!(validate_multi(&params, &rules).is_ok());
    }

    #[test]
    fn object_validation_through_field_map() {
        struct Login {
            username: String,
            password: Option<String>,
        }

        impl ToFieldMap for Login {
            fn to_field_map(&self) -> ValueBag {
                let mut bag = ValueBag::new();
                bag.insert("username".to_string(), Value::from(self.username.clone()));
                if let Some(password) = &self.password {
                    bag.insert("password".to_string(), Value::from(password.clone()));
                }
                bag
            }
        }

        let login = Login {
            username: "edgar".to_string(),
            password: None,
        };

        let err = validate_object(&login, &user_rules()).unwrap_err();
        assert_eq!(err.report().len(), 1);
        assert_eq!(err.report().get("password").unwrap(), &["Required"]);
    }

    #[test]
    fn rule_set_from_spec_string() {
        let rules = RuleSet::new()
            .parse_field("username", "required|maxLength:16")
            .unwrap()
            .parse_field("password", "required")
            .unwrap();

        let mut params = ValueBag::new();
        params.insert(
            "username".to_string(),
            Value::from("a-very-long-username-indeed"),
        );

        let err = validate(&params, &rules).unwrap_err();
        assert_eq!(err.report().get("username").unwrap(), &["MaxLength:16"]);
        assert_eq!(err.report().get("password").unwrap(), &["Required"]);
    }

    #[test]
    fn add_appends_to_existing_field() {
        let mut rules = RuleSet::new();
        rules.add("name", Rule::Required);
        rules.add("name", Rule::MaxLength(8));
        let collected: Vec<(&str, usize)> =
            rules.iter().map(|(field, rs)| (field, rs.len())).collect();
        assert_eq!(collected, vec![("name", 2)]);
    }
}
