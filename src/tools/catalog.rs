//! Tool catalog: typed metadata for the functions exposed to the
//! orchestrator, parameter binding, prompt generation.
//!
//! Owns tool *metadata*; the handlers live next to it in this module.

use crate::envelope::ToolParameter;
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{
    ACTION_GROUP_AVAILABILITY, ACTION_GROUP_FIND, ACTION_GROUP_RESERVATION,
    FN_CHECK_AVAILABILITY, FN_FIND_RESTAURANTS, FN_MAKE_RESERVATION,
};

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs.
///
/// The orchestrator transmits every value as a string, so coercion accepts
/// decimal strings for integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
}

impl ParamType {
    /// Coerce a raw parameter value into this type.
    pub fn coerce(&self, value: &Value) -> std::result::Result<Value, String> {
        match self {
            ParamType::String => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                other => Err(format!("expected string, got {}", value_type_name(other))),
            },
            ParamType::Integer => match value {
                Value::Number(n) => n
                    .as_i64()
                    .map(Value::from)
                    .ok_or_else(|| format!("expected integer, got {}", n)),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| format!("expected integer, got '{}'", s)),
                other => Err(format!("expected integer, got {}", value_type_name(other))),
            },
        }
    }

    /// Human-readable type name for prompt generation.
    pub fn display_name(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
        }
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
}

impl ParamDef {
    fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required: true,
        }
    }
}

// =============================================================================
// Bound arguments
// =============================================================================

/// Parameters of one call, coerced to their declared types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    values: HashMap<String, Value>,
}

impl ToolArguments {
    pub fn str(&self, name: &str) -> Result<&str> {
        self.values
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::parameter_missing(name))
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.values
            .get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::parameter_missing(name))
    }
}

// =============================================================================
// Tool entry
// =============================================================================

/// Complete tool metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEntry {
    pub action_group: String,
    pub function: String,
    pub description: String,
    pub parameters: Vec<ParamDef>,
}

impl ToolEntry {
    /// Generate a prompt line for this tool.
    ///
    /// Format: `- function(param1: type, param2?: type): description`
    pub fn to_prompt_line(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let optional = if p.required { "" } else { "?" };
                format!("{}{}: {}", p.name, optional, p.param_type.display_name())
            })
            .collect();

        format!("- {}({}): {}", self.function, params.join(", "), self.description)
    }

    /// Extract declared parameters by exact name. No defaults: a missing
    /// required parameter fails the call. Undeclared parameters are ignored.
    pub fn bind(&self, supplied: &[ToolParameter]) -> Result<ToolArguments> {
        let mut values = HashMap::with_capacity(self.parameters.len());

        for def in &self.parameters {
            let Some(param) = supplied.iter().find(|p| p.name == def.name) else {
                if def.required {
                    return Err(Error::parameter_missing(&def.name));
                }
                continue;
            };
            let value = def.param_type.coerce(&param.value).map_err(|e| {
                Error::invalid_parameter(format!("parameter '{}': {}", def.name, e))
            })?;
            values.insert(def.name.clone(), value);
        }

        Ok(ToolArguments { values })
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// In-memory tool catalog keyed by function name.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    entries: HashMap<String, ToolEntry>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The three reservation-assistant tools.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        let entries = [
            ToolEntry {
                action_group: ACTION_GROUP_AVAILABILITY.to_string(),
                function: FN_CHECK_AVAILABILITY.to_string(),
                description: "Check restaurant availability before making reservation. \
                              The available capacity should be greater or equal to the \
                              number of persons to reserve."
                    .to_string(),
                parameters: vec![ParamDef::required(
                    "restaurant_name",
                    ParamType::String,
                    "the name of the restaurant to check availability for",
                )],
            },
            ToolEntry {
                action_group: ACTION_GROUP_FIND.to_string(),
                function: FN_FIND_RESTAURANTS.to_string(),
                description: "Find restaurants based on a SQL query. The table to query \
                              must always be 'restaurants'. Example: 'SELECT * FROM restaurants'."
                    .to_string(),
                parameters: vec![ParamDef::required(
                    "sql_query",
                    ParamType::String,
                    &format!(
                        "A query in SQL for a relational table with columns {}. The column \
                         'dishes' is a string containing all dishes separated by a comma (',').",
                        crate::catalog::COLUMNS
                            .iter()
                            .map(|c| format!("'{}'", c))
                            .collect::<Vec<_>>()
                            .join(",")
                    ),
                )],
            },
            ToolEntry {
                action_group: ACTION_GROUP_RESERVATION.to_string(),
                function: FN_MAKE_RESERVATION.to_string(),
                description: "Make a restaurant reservation. Always check beforehand if \
                              there is availability for all persons."
                    .to_string(),
                parameters: vec![
                    ParamDef::required(
                        "restaurant_name",
                        ParamType::String,
                        "the name of the restaurant to be reserved",
                    ),
                    ParamDef::required(
                        "main_guest_name",
                        ParamType::String,
                        "the name of the person making the reservation",
                    ),
                    ParamDef::required(
                        "number_of_persons",
                        ParamType::Integer,
                        "number of persons for the reservation. must be positive number.",
                    ),
                ],
            },
        ];
        for entry in entries {
            catalog.entries.insert(entry.function.clone(), entry);
        }
        catalog
    }

    /// Get a tool entry by function name.
    pub fn get(&self, function: &str) -> Option<&ToolEntry> {
        self.entries.get(function)
    }

    /// List all tool entries, sorted by function name.
    pub fn list_entries(&self) -> Vec<&ToolEntry> {
        let mut entries: Vec<&ToolEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.function.cmp(&b.function));
        entries
    }

    /// Generate formatted prompt section for LLM consumption.
    pub fn generate_prompt(&self) -> String {
        let entries = self.list_entries();
        if entries.is_empty() {
            return String::new();
        }

        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push("Available tools:".to_string());
        for entry in entries {
            lines.push(entry.to_prompt_line());
        }
        lines.join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
