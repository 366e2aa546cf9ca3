//! Constraint syntax
//!
//! Parses the compact spack-style notation used for dependency declarations,
//! `when` conditions and command-line requests:
//!
//! ```text
//! hypre+mpi~int64~superlu-dist@2.18.2:
//! boost cxxstd=14
//! +hypre~cuda
//! amr-wind+cuda cuda_arch=70,80 %gcc
//! ```
//!
//! `+name` enables a boolean variant, `~name` disables it, `key=value` sets a
//! valued variant, `@1.2` pins a version, `@1.2:` sets a version floor and
//! `%name` selects a compiler. Tokens are separated by whitespace.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::core::version;
use crate::error::SpecError;

/// Version requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionBound {
    /// `@1.2`
    Exact(String),
    /// `@1.2:`
    AtLeast(String),
}

impl VersionBound {
    /// Whether `version` meets this bound
    pub fn admits(&self, version: &str) -> bool {
        match self {
            Self::Exact(v) => v == version,
            Self::AtLeast(floor) => version::at_least(version, floor),
        }
    }
}

impl fmt::Display for VersionBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "@{v}"),
            Self::AtLeast(v) => write!(f, "@{v}:"),
        }
    }
}

/// A parsed constraint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constraint {
    /// Package name, absent in `when` conditions
    pub name: Option<String>,
    /// Variants written as `+name`
    pub enabled: Vec<String>,
    /// Variants written as `~name`
    pub disabled: Vec<String>,
    /// Variants written as `key=value`, in order
    pub values: Vec<(String, String)>,
    /// Version requirement
    pub version: Option<VersionBound>,
    /// Compiler written as `%name`
    pub compiler: Option<String>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
}

impl Constraint {
    /// Parse a constraint
    pub fn parse(input: &str) -> Result<Self, SpecError> {
        let mut constraint = Self::default();
        for token in input.split_whitespace() {
            constraint.parse_token(input, token)?;
        }
        Ok(constraint)
    }

    /// Parse a constraint that must name a package
    pub fn parse_named(input: &str) -> Result<Self, SpecError> {
        let constraint = Self::parse(input)?;
        if constraint.name.is_none() {
            return Err(SpecError::Anonymous {
                input: input.to_string(),
            });
        }
        Ok(constraint)
    }

    fn parse_token(&mut self, input: &str, token: &str) -> Result<(), SpecError> {
        if let Some((key, value)) = token.split_once('=') {
            if !key.is_empty() && key.chars().all(is_name_char) {
                self.values.push((key.to_string(), value.to_string()));
                return Ok(());
            }
        }

        let chars: Vec<char> = token.chars().collect();
        let mut pos = 0;

        if chars.first().is_some_and(|c| is_name_char(*c)) {
            let name = take_while(&chars, &mut pos, is_name_char);
            if self.name.is_some() {
                return Err(SpecError::DuplicateName {
                    input: input.to_string(),
                });
            }
            self.name = Some(name);
        }

        while pos < chars.len() {
            let sigil = chars[pos];
            pos += 1;
            match sigil {
                '+' | '~' | '%' => {
                    let name = take_while(&chars, &mut pos, is_name_char);
                    if name.is_empty() {
                        return Err(SpecError::MissingName {
                            input: input.to_string(),
                            sigil,
                        });
                    }
                    match sigil {
                        '+' => self.enabled.push(name),
                        '~' => self.disabled.push(name),
                        _ => self.compiler = Some(name),
                    }
                }
                '@' => {
                    let version = take_while(&chars, &mut pos, is_version_char);
                    if version.is_empty() {
                        return Err(SpecError::MissingName {
                            input: input.to_string(),
                            sigil,
                        });
                    }
                    if chars.get(pos) == Some(&':') {
                        pos += 1;
                        self.version = Some(VersionBound::AtLeast(version));
                    } else {
                        self.version = Some(VersionBound::Exact(version));
                    }
                }
                found => {
                    return Err(SpecError::UnexpectedChar {
                        input: input.to_string(),
                        position: pos - 1,
                        found,
                    });
                }
            }
        }
        Ok(())
    }

    /// The package name, or an empty string for anonymous constraints
    pub fn package(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

fn take_while(chars: &[char], pos: &mut usize, pred: fn(char) -> bool) -> String {
    let start = *pos;
    while *pos < chars.len() && pred(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            f.write_str(name)?;
        }
        if let Some(version) = &self.version {
            write!(f, "{version}")?;
        }
        for name in &self.enabled {
            write!(f, "+{name}")?;
        }
        for name in &self.disabled {
            write!(f, "~{name}")?;
        }
        if let Some(compiler) = &self.compiler {
            write!(f, "%{compiler}")?;
        }
        let mut separate = !(self.name.is_none()
            && self.version.is_none()
            && self.enabled.is_empty()
            && self.disabled.is_empty()
            && self.compiler.is_none());
        for (key, value) in &self.values {
            if separate {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
            separate = true;
        }
        Ok(())
    }
}

impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
