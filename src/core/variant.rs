//! Variant definitions and validation
//!
//! A variant is a named, typed, defaulted build option of a package.
//! Boolean variants are toggled with `+name`/`~name`; valued and multi-valued
//! variants are set with `name=value` (`name=a,b` for multi).

use serde::Serialize;
use std::fmt;

use crate::error::VariantError;

/// Value of a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VariantValue {
    Bool(bool),
    Single(String),
    Multi(Vec<String>),
}

impl VariantValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Single(_) => "value",
            Self::Multi(_) => "multi",
        }
    }
}

impl fmt::Display for VariantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("on"),
            Self::Bool(false) => f.write_str("off"),
            Self::Single(value) => f.write_str(value),
            Self::Multi(values) if values.is_empty() => f.write_str("none"),
            Self::Multi(values) => f.write_str(&values.join(",")),
        }
    }
}

/// Rule applied to each textual value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCheck {
    /// Any text
    Any,
    /// A float greater than zero
    PositiveFloat,
    /// Decimal digits only
    Digits,
}

impl ValueCheck {
    fn check(self, name: &str, value: &str) -> Result<(), VariantError> {
        let reason = match self {
            Self::Any => return Ok(()),
            Self::PositiveFloat => match value.parse::<f64>() {
                Ok(v) if v > 0.0 => return Ok(()),
                _ => "expected a float greater than zero",
            },
            Self::Digits => {
                if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
                    return Ok(());
                }
                "expected decimal digits"
            }
        };
        Err(VariantError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
    }
}

/// What kind of values a variant takes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VariantKind {
    Bool,
    Single {
        check: ValueCheck,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        choices: Vec<String>,
    },
    Multi {
        check: ValueCheck,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        choices: Vec<String>,
    },
}

/// A declared variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDefinition {
    pub name: String,
    pub default: VariantValue,
    pub description: String,
    #[serde(flatten)]
    pub kind: VariantKind,
}

impl VariantDefinition {
    /// Boolean variant
    pub fn bool(name: &str, default: bool, description: &str) -> Self {
        Self {
            name: name.to_string(),
            default: VariantValue::Bool(default),
            description: description.to_string(),
            kind: VariantKind::Bool,
        }
    }

    /// Single-valued variant
    pub fn single(name: &str, default: &str, check: ValueCheck, description: &str) -> Self {
        Self {
            name: name.to_string(),
            default: VariantValue::Single(default.to_string()),
            description: description.to_string(),
            kind: VariantKind::Single {
                check,
                choices: Vec::new(),
            },
        }
    }

    /// Multi-valued variant, empty by default
    pub fn multi(name: &str, check: ValueCheck, description: &str) -> Self {
        Self {
            name: name.to_string(),
            default: VariantValue::Multi(Vec::new()),
            description: description.to_string(),
            kind: VariantKind::Multi {
                check,
                choices: Vec::new(),
            },
        }
    }

    pub fn is_bool(&self) -> bool {
        self.kind == VariantKind::Bool
    }

    /// Parse a `name=value` right-hand side into a value of this variant
    pub fn parse_value(&self, raw: &str) -> Result<VariantValue, VariantError> {
        let value = match &self.kind {
            VariantKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => VariantValue::Bool(true),
                "false" | "off" | "no" | "0" => VariantValue::Bool(false),
                _ => {
                    return Err(VariantError::InvalidType {
                        name: self.name.clone(),
                        expected: "bool".to_string(),
                        got: raw.to_string(),
                    })
                }
            },
            VariantKind::Single { .. } => VariantValue::Single(raw.to_string()),
            VariantKind::Multi { .. } => VariantValue::Multi(
                raw.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty() && *v != "none")
                    .map(String::from)
                    .collect(),
            ),
        };
        self.validate(&value)?;
        Ok(value)
    }

    /// Validate a value against this definition
    pub fn validate(&self, value: &VariantValue) -> Result<(), VariantError> {
        match (&self.kind, value) {
            (VariantKind::Bool, VariantValue::Bool(_)) => Ok(()),
            (VariantKind::Single { check, choices }, VariantValue::Single(v)) => {
                self.validate_text(*check, choices, v)
            }
            (VariantKind::Multi { check, choices }, VariantValue::Multi(values)) => values
                .iter()
                .try_for_each(|v| self.validate_text(*check, choices, v)),
            (kind, value) => Err(VariantError::InvalidType {
                name: self.name.clone(),
                expected: kind_name(kind).to_string(),
                got: value.type_name().to_string(),
            }),
        }
    }

    fn validate_text(&self, check: ValueCheck, choices: &[String], value: &str) -> Result<(), VariantError> {
        if !choices.is_empty() && !choices.iter().any(|c| c == value) {
            return Err(VariantError::InvalidChoice {
                name: self.name.clone(),
                value: value.to_string(),
                choices: choices.to_vec(),
            });
        }
        check.check(&self.name, value)
    }
}

fn kind_name(kind: &VariantKind) -> &'static str {
    match kind {
        VariantKind::Bool => "bool",
        VariantKind::Single { .. } => "value",
        VariantKind::Multi { .. } => "multi",
    }
}
