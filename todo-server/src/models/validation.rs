//! Validation error types
//!
//! Every rejected input is reported as a [`FieldError`]: where it was found
//! (`loc`), a human-readable message (`msg`) and a stable machine code
//! (`type`). Request bodies are checked field by field so a single response
//! lists all problems at once.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Why a single input value was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent
    Missing,

    /// String shorter than allowed
    TooShort { min: usize },

    /// String longer than allowed
    TooLong { max: usize },

    /// Value has the wrong JSON type
    WrongType { expected: &'static str },

    /// Value can't be read as a boolean
    NotABoolean,

    /// Text that should hold an integer doesn't
    NotAnInteger,

    /// Number below the lower bound
    BelowMin { min: i64 },

    /// Number above the upper bound
    AboveMax { max: i64 },

    /// Text that should hold a UUID doesn't
    InvalidUuid,

    /// Body isn't parseable JSON
    InvalidJson,

    /// Body is JSON but not an object
    NotAnObject,

    /// Anything else the framework refused to parse
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Field required"),
            Self::TooShort { min: 1 } => write!(f, "String should have at least 1 character"),
            Self::TooShort { min } => write!(f, "String should have at least {} characters", min),
            Self::TooLong { max } => write!(f, "String should have at most {} characters", max),
            Self::WrongType { expected } => write!(f, "Input should be a valid {}", expected),
            Self::NotABoolean => write!(
                f,
                "Input should be a valid boolean, unable to interpret input"
            ),
            Self::NotAnInteger => write!(
                f,
                "Input should be a valid integer, unable to parse string as an integer"
            ),
            Self::BelowMin { min } => {
                write!(f, "Input should be greater than or equal to {}", min)
            }
            Self::AboveMax { max } => write!(f, "Input should be less than or equal to {}", max),
            Self::InvalidUuid => write!(f, "Input should be a valid UUID"),
            Self::InvalidJson => write!(f, "JSON decode error"),
            Self::NotAnObject => write!(
                f,
                "Input should be a valid dictionary or object to extract fields from"
            ),
            Self::Malformed { reason } => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::TooShort { .. } => "string_too_short",
            Self::TooLong { .. } => "string_too_long",
            Self::WrongType { expected: "boolean" } => "bool_type",
            Self::WrongType { .. } => "string_type",
            Self::NotABoolean => "bool_parsing",
            Self::NotAnInteger => "int_parsing",
            Self::BelowMin { .. } => "greater_than_equal",
            Self::AboveMax { .. } => "less_than_equal",
            Self::InvalidUuid => "uuid_parsing",
            Self::InvalidJson => "json_invalid",
            Self::NotAnObject => "model_attributes_type",
            Self::Malformed { .. } => "value_error",
        }
    }
}

/// One rejected input, serialized as `{loc, msg, type}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    pub fn new<I, S>(loc: I, error: ValidationError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loc: loc.into_iter().map(Into::into).collect(),
            msg: error.to_string(),
            kind: error.code(),
        }
    }

    /// Whether this error points at the given field name (last `loc` segment).
    pub fn is_for(&self, field: &str) -> bool {
        self.loc.last().is_some_and(|l| l == field)
    }
}

/// Request bodies that validate themselves from parsed JSON
pub trait FromJsonBody: Sized {
    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>>;
}

/// Field-by-field reader over a JSON request body.
///
/// Each accessor records an error instead of returning early; call
/// [`BodyFields::finish`] once all fields have been read. Unknown fields are
/// ignored and an explicit `null` counts as "not supplied" for optional fields.
pub struct BodyFields<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> BodyFields<'a> {
    pub fn new(body: &'a Value) -> Result<Self, Vec<FieldError>> {
        match body {
            Value::Object(object) => Ok(Self {
                object,
                errors: Vec::new(),
            }),
            _ => Err(vec![FieldError::new(["body"], ValidationError::NotAnObject)]),
        }
    }

    /// Required string with a character-count range.
    pub fn required_str(&mut self, name: &'static str, min: usize, max: usize) -> Option<String> {
        let object = self.object;
        match object.get(name) {
            None => {
                self.reject(name, ValidationError::Missing);
                None
            }
            Some(value) => self.check_str(name, value, min, max),
        }
    }

    /// Optional string with a character-count range.
    pub fn optional_str(&mut self, name: &'static str, min: usize, max: usize) -> Option<String> {
        let object = self.object;
        match object.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => self.check_str(name, value, min, max),
        }
    }

    /// Optional boolean.
    ///
    /// Besides JSON `true`/`false`, accepts the numbers `0`/`1` and the
    /// strings `true`/`false`, `yes`/`no`, `on`/`off`, `t`/`f`, `y`/`n`,
    /// `1`/`0` (case-insensitive).
    pub fn optional_bool(&mut self, name: &'static str) -> Option<bool> {
        let object = self.object;
        let parsed = match object.get(name) {
            None | Some(Value::Null) => return None,
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v == 0.0 => Ok(false),
                Some(v) if v == 1.0 => Ok(true),
                _ => Err(ValidationError::NotABoolean),
            },
            Some(Value::String(s)) => parse_lax_bool(s).ok_or(ValidationError::NotABoolean),
            Some(_) => Err(ValidationError::WrongType { expected: "boolean" }),
        };

        match parsed {
            Ok(b) => Some(b),
            Err(error) => {
                self.reject(name, error);
                None
            }
        }
    }

    /// Ok when no accessor recorded an error.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn check_str(
        &mut self,
        name: &'static str,
        value: &Value,
        min: usize,
        max: usize,
    ) -> Option<String> {
        let Value::String(s) = value else {
            self.reject(name, ValidationError::WrongType { expected: "string" });
            return None;
        };

        let len = s.chars().count();
        if len < min {
            self.reject(name, ValidationError::TooShort { min });
            None
        } else if len > max {
            self.reject(name, ValidationError::TooLong { max });
            None
        } else {
            Some(s.clone())
        }
    }

    fn reject(&mut self, name: &'static str, error: ValidationError) {
        self.errors.push(FieldError::new(["body", name], error));
    }
}

fn parse_lax_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
