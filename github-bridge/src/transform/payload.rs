//! Defaulting accessors over a parsed webhook body.
//!
//! GitHub payload shapes vary per event and many fields are optional. Every
//! lookup here goes through a JSON pointer and resolves to a named default
//! instead of failing.

use serde_json::Value;

/// Repository name used when `repository.full_name` is absent.
pub const UNKNOWN_REPO: &str = "unknown/repo";

/// Actor and scalar placeholder used when a field is absent.
pub const UNKNOWN: &str = "unknown";

/// Placeholder for a missing issue or pull request description.
pub const NO_DESCRIPTION: &str = "(no description)";

/// Placeholder for a missing comment or review body.
pub const NO_COMMENT: &str = "(no comment)";

/// Placeholder for missing release notes.
pub const NO_RELEASE_NOTES: &str = "(no release notes)";

/// Placeholder for a commit without a message.
pub const NO_COMMIT_MESSAGE: &str = "(no message)";

/// Borrowed view of a decoded webhook body.
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a> {
    value: &'a Value,
}

impl<'a> Payload<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// `repository.full_name`, if present.
    pub fn repo_full_name(&self) -> Option<&'a str> {
        self.str("/repository/full_name")
    }

    /// `repository.full_name`, or [`UNKNOWN_REPO`].
    pub fn repo(&self) -> &'a str {
        self.repo_full_name().unwrap_or(UNKNOWN_REPO)
    }

    /// `sender.login`, or [`UNKNOWN`].
    pub fn sender(&self) -> &'a str {
        self.str("/sender/login").unwrap_or(UNKNOWN)
    }

    /// The top-level `action`, if any.
    pub fn action(&self) -> Option<&'a str> {
        self.str("/action")
    }

    /// A string field. Empty strings count as absent.
    pub fn str(&self, pointer: &str) -> Option<&'a str> {
        self.value
            .pointer(pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// A string field, or `default`.
    pub fn str_or(&self, pointer: &str, default: &'a str) -> &'a str {
        self.str(pointer).unwrap_or(default)
    }

    /// An identifier (number or string) rendered exactly as sent.
    pub fn ident(&self, pointer: &str) -> String {
        match self.value.pointer(pointer) {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => UNKNOWN.to_string(),
        }
    }

    /// A boolean field, absent treated as `false`.
    pub fn flag(&self, pointer: &str) -> bool {
        self.value
            .pointer(pointer)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// An array field as borrowed sub-payloads. Absent or non-array is empty.
    pub fn list(&self, pointer: &str) -> Vec<Payload<'a>> {
        self.value
            .pointer(pointer)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Payload::new).collect())
            .unwrap_or_default()
    }
}
