//! # fieldcheck
//!
//! Declarative, data-driven field validation. Rules are plain values that
//! can be built in code or parsed from a compact text form, bound to field
//! names, and evaluated against loosely-typed parameter maps. Every
//! violation is collected before the call fails.
//!
//! ## Example
//!
//! ```rust
//! use fieldcheck::prelude::*;
//!
//! let rules = RuleSet::new()
//!     .parse_field("username", "required|maxLength:16")
//!     .unwrap()
//!     .field("age", [Rule::Int, Rule::Min(18)]);
//!
//! let mut params = ValueBag::new();
//! params.insert("username".to_string(), Value::from("edgar"));
//! params.insert("age".to_string(), Value::from(17));
//!
//! let err = validate(&params, &rules).unwrap_err();
//! assert_eq!(err.report().get("age").unwrap(), &["Min value:18"]);
//! ```
//!
//! ## Rule keys
//!
//! Flags: `required`, `prohibited`, `email`, `alpha`, `alphaNumber`,
//! `alphaSpace`, `alphaUnderscore`, `bool`, `byte`, `short`, `int`, `long`,
//! `float`, `double`, `list`, `map`, `ISO8601Date`, `ISO8601Time`,
//! `ISO8601Datetime`, `datetime`.
//!
//! Parameterized: `equals:V`, `regex:P`, `maxLength:N`, `minLength:N`,
//! `fixLength:N`, `max:N`, `min:N`, `optional:A,B,C`, `digits[:N]`,
//! `decimal:N`.
//!
//! ## Error Format
//!
//! [`ValidationError`] serializes to JSON as:
//!
//! ```json
//! {
//!   "error": {
//!     "type": "validation_error",
//!     "message": "Validation failed",
//!     "fields": [
//!       {"field": "username", "message": "MaxLength:16"},
//!       {"field": "age", "message": "Min value:18"}
//!     ]
//!   }
//! }
//! ```

pub mod codec;
mod error;
mod rule;
mod validate;
mod value;

pub use codec::SpecError;
pub use error::{ErrorReport, ValidationError};
pub use rule::Rule;
pub use validate::{validate, validate_multi, validate_object, RuleSet, ToFieldMap};
pub use value::{MultiValueBag, Value, ValueBag};

/// Convenient glob import for the common surface.
pub mod prelude {
    pub use crate::codec::{self, SpecError};
    pub use crate::error::{ErrorReport, ValidationError};
    pub use crate::rule::Rule;
    pub use crate::validate::{validate, validate_multi, validate_object, RuleSet, ToFieldMap};
    pub use crate::value::{MultiValueBag, Value, ValueBag};
}
