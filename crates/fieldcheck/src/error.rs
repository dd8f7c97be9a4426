//! Aggregated validation failure types.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

const BANNER: &str = "--------------------------------------------------------------";

/// An ordered multimap from field name to violation messages.
///
/// Fields appear in the order their first violation was recorded; messages
/// within a field keep evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorReport {
    entries: Vec<(String, Vec<String>)>,
}

impl ErrorReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation message for a field.
    pub fn put(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.entries.push((field, vec![message.into()])),
        }
    }

    /// Whether any violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of violation messages across all fields.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, messages)| messages.len()).sum()
    }

    /// Number of distinct fields with violations.
    pub fn field_count(&self) -> usize {
        self.entries.len()
    }

    /// The messages recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Iterate fields and their messages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

/// The failure raised by one validation call, carrying every violation
/// found in that call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationError {
    message: Option<String>,
    report: ErrorReport,
}

impl ValidationError {
    /// Wrap a report into a raised failure.
    pub fn new(report: ErrorReport) -> Self {
        Self {
            message: None,
            report,
        }
    }

    /// Wrap a report with a top-level message.
    pub fn with_message(message: impl Into<String>, report: ErrorReport) -> Self {
        Self {
            message: Some(message.into()),
            report,
        }
    }

    /// The optional top-level message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The per-field violation report.
    pub fn report(&self) -> &ErrorReport {
        &self.report
    }

    /// Record an extra violation, chainable:
    /// `err.put_error("foo", "bar").put_error("name", "Required")`.
    pub fn put_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.report.put(field, message);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            write!(f, "{message}")?;
        }
        if !self.report.is_empty() {
            write!(f, "\nDetails: \n{BANNER}")?;
            for (field, messages) in self.report.iter() {
                write!(f, "\n{field}:[{}]", messages.join(", "))?;
            }
            write!(f, "\n{BANNER}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Serializes to the wire error format:
///
/// ```json
/// {
///   "error": {
///     "type": "validation_error",
///     "message": "Validation failed",
///     "fields": [
///       {"field": "password", "message": "Required"}
///     ]
///   }
/// }
/// ```
impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct FieldEntry<'a> {
            field: &'a str,
            message: &'a str,
        }

        #[derive(Serialize)]
        struct ErrorBody<'a> {
            #[serde(rename = "type")]
            error_type: &'static str,
            message: &'a str,
            fields: Vec<FieldEntry<'a>>,
        }

        let fields = self
            .report
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |message| FieldEntry {
                    field,
                    message,
                })
            })
            .collect();

        let body = ErrorBody {
            error_type: "validation_error",
            message: self.message.as_deref().unwrap_or("Validation failed"),
            fields,
        };

        let mut state = serializer.serialize_struct("ValidationError", 1)?;
        state.serialize_field("error", &body)?;
        state.end()
    }
}
