//! Typing of variable values for the flattened (tfvars JSON) render.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::value::{to_raw_value, RawValue};
use serde_json::Value;

use crate::error::{Result, TfcError};
use crate::models::variable::{Variable, VariableSet};

/// Value rendered in place of a sensitive variable's content.
pub const SENSITIVE_PLACEHOLDER: &str = "sensitive";

/// Declared type of a variable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Bool,
    List,
    Map,
}

impl ValueType {
    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Map => "map",
        }
    }

    /// Convert a stored string into a JSON fragment of this type.
    ///
    /// Numbers, lists and maps keep the stored text, so precision and
    /// formatting survive.
    ///
    /// # Errors
    ///
    /// Returns [`TfcError::InvalidValue`] if `raw` does not hold a value of
    /// this type.
    pub fn convert(self, key: &str, raw: &str) -> Result<Box<RawValue>> {
        let invalid = || TfcError::InvalidValue {
            key: key.to_string(),
            expected: self.name(),
            value: raw.to_string(),
        };

        if self == Self::String {
            return Ok(to_raw_value(raw)?);
        }

        let fragment = RawValue::from_string(raw.trim().to_string()).map_err(|_| invalid())?;
        let parsed: Value = serde_json::from_str(fragment.get()).map_err(|_| invalid())?;
        let matches = match self {
            Self::Bool => parsed.is_boolean(),
            Self::Number => parsed.is_number(),
            Self::List => parsed.is_array(),
            _ => parsed.is_object(),
        };
        if matches {
            Ok(fragment)
        } else {
            Err(invalid())
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = TfcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(Self::String),
            "number" | "num" => Ok(Self::Number),
            "bool" | "boolean" => Ok(Self::Bool),
            "list" | "tuple" | "set" => Ok(Self::List),
            "map" | "object" => Ok(Self::Map),
            _ => Err(TfcError::InvalidTypeSpec(s.to_string())),
        }
    }
}

/// Parse a `KEY=KIND` declaration such as `count=number`.
pub fn parse_type_declaration(declaration: &str) -> Result<(String, ValueType)> {
    let (key, kind) = declaration
        .split_once('=')
        .ok_or_else(|| TfcError::InvalidTypeSpec(declaration.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(TfcError::InvalidTypeSpec(declaration.to_string()));
    }
    let kind = kind
        .parse::<ValueType>()
        .map_err(|_| TfcError::InvalidTypeSpec(declaration.to_string()))?;
    Ok((key.to_string(), kind))
}

impl Variable {
    /// The JSON fragment this variable takes in a flattened render.
    ///
    /// Sensitive variables always yield [`SENSITIVE_PLACEHOLDER`]. Variables
    /// with a declared type are converted to it. Otherwise a stored string
    /// that is already JSON (`10`, `["a"]`, `"api"`) is passed through
    /// byte-for-byte, and anything else (`api`, an empty value) becomes a
    /// JSON string with a warning naming the key.
    pub fn flat_value(&self) -> Result<Box<RawValue>> {
        if self.sensitive {
            return Ok(to_raw_value(SENSITIVE_PLACEHOLDER)?);
        }

        if let Some(declared) = self.declared_type {
            return declared.convert(&self.key, &self.value);
        }

        match RawValue::from_string(self.value.clone()) {
            Ok(fragment) => Ok(fragment),
            Err(_) => {
                tracing::warn!(
                    key = %self.key,
                    "value is not JSON; rendering it as a string (declare a type to silence this)"
                );
                Ok(to_raw_value(&self.value)?)
            }
        }
    }
}

impl VariableSet {
    /// Flatten into a key → fragment map, sorted by key. Later duplicates
    /// overwrite earlier ones.
    pub fn to_flat_map(&self) -> Result<BTreeMap<String, Box<RawValue>>> {
        let mut flat = BTreeMap::new();
        for variable in self {
            flat.insert(variable.key.clone(), variable.flat_value()?);
        }
        Ok(flat)
    }

    /// Render the flattened map as a JSON object string.
    pub fn render_flat(&self, pretty: bool) -> Result<String> {
        let flat = self.to_flat_map()?;
        let rendered = if pretty {
            serde_json::to_string_pretty(&flat)?
        } else {
            serde_json::to_string(&flat)?
        };
        Ok(rendered)
    }
}
