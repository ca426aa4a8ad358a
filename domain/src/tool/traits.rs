//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async execution ports live in the application layer.

use super::entities::{ToolArguments, ToolDefinition, ToolParameter, json_kind};

/// Validator for parsed tool arguments
///
/// This is a pure domain trait that validates arguments
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate arguments against a tool definition
    fn validate(&self, args: &ToolArguments, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, args: &ToolArguments, definition: &ToolDefinition) -> Result<(), String> {
        // Check that all required parameters are present
        for param in definition.required_parameters() {
            match args.get(&param.name) {
                None | Some(serde_json::Value::Null) => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                Some(_) => {}
            }
        }

        for arg_name in args.keys() {
            let Some(param) = definition.parameter(arg_name) else {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            };

            if let Some(value) = args.get(arg_name) {
                check_value(param, value, &definition.name)?;
            }
        }

        Ok(())
    }
}

fn check_value(
    param: &ToolParameter,
    value: &serde_json::Value,
    tool_name: &str,
) -> Result<(), String> {
    // Optional parameters may be explicitly null
    if value.is_null() && !param.required {
        return Ok(());
    }

    let type_ok = match param.param_type.as_str() {
        "string" | "path" => value.is_string(),
        // Ids arrive both as numbers and as numeric strings
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_str().is_some_and(|s| s.trim().parse::<i64>().is_ok())
        }
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        _ => true,
    };

    if !type_ok {
        return Err(format!(
            "Parameter '{}' for tool '{}' must be {}, got {}",
            param.name,
            tool_name,
            param.param_type,
            json_kind(value)
        ));
    }

    if !param.allowed_values.is_empty() {
        let accepted = value
            .as_str()
            .is_some_and(|s| param.allowed_values.iter().any(|v| v == s));
        if !accepted {
            return Err(format!(
                "Parameter '{}' for tool '{}' must be one of: {}",
                param.name,
                tool_name,
                param.allowed_values.join(", ")
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolCategory;

    fn add_task() -> ToolDefinition {
        ToolDefinition::new("add_task", "Create a task", ToolCategory::Task)
            .with_parameter(ToolParameter::new("title", "Title", true))
            .with_parameter(ToolParameter::new("description", "Description", false))
            .with_parameter(
                ToolParameter::new("priority", "Priority", false)
                    .with_allowed_values(["low", "medium", "high"]),
            )
    }

    fn complete_task() -> ToolDefinition {
        ToolDefinition::new("complete_task", "Complete a task", ToolCategory::Task)
            .with_parameter(ToolParameter::new("task_id", "Task id", true).with_type("integer"))
    }

    #[test]
    fn test_validator_missing_required() {
        let result = DefaultToolValidator.validate(&ToolArguments::new(), &add_task());
        assert!(result.unwrap_err().contains("Missing required parameter 'title'"));
    }

    #[test]
    fn test_validator_null_required() {
        let args = ToolArguments::new().with_arg("title", serde_json::Value::Null);
        let result = DefaultToolValidator.validate(&args, &add_task());
        assert!(result.unwrap_err().contains("Missing required parameter"));
    }

    #[test]
    fn test_validator_unknown_param() {
        let args = ToolArguments::new()
            .with_arg("title", "Buy milk")
            .with_arg("due", "tomorrow");
        let result = DefaultToolValidator.validate(&args, &add_task());
        assert!(result.unwrap_err().contains("Unknown parameter 'due'"));
    }

    #[test]
    fn test_validator_type_mismatch() {
        let args = ToolArguments::new().with_arg("title", 7);
        let result = DefaultToolValidator.validate(&args, &add_task());
        assert!(result.unwrap_err().contains("must be string, got number"));
    }

    #[test]
    fn test_validator_allowed_values() {
        let args = ToolArguments::new()
            .with_arg("title", "Buy milk")
            .with_arg("priority", "urgent");
        let result = DefaultToolValidator.validate(&args, &add_task());
        assert!(result.unwrap_err().contains("must be one of: low, medium, high"));
    }

    #[test]
    fn test_validator_integer_accepts_numeric_string() {
        let numeric = ToolArguments::new().with_arg("task_id", "12");
        assert!(DefaultToolValidator.validate(&numeric, &complete_task()).is_ok());

        let number = ToolArguments::new().with_arg("task_id", 12);
        assert!(DefaultToolValidator.validate(&number, &complete_task()).is_ok());

        let word = ToolArguments::new().with_arg("task_id", "twelve");
        assert!(DefaultToolValidator.validate(&word, &complete_task()).is_err());
    }

    #[test]
    fn test_validator_valid_call() {
        let args = ToolArguments::new()
            .with_arg("title", "Buy milk")
            .with_arg("priority", "high")
            .with_arg("description", serde_json::Value::Null);
        assert!(DefaultToolValidator.validate(&args, &add_task()).is_ok());
    }
}
