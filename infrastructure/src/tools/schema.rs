//! JSON Schema tool converter.
//!
//! Turns [`ToolDefinition`]s into the OpenAI-compatible `tools` array:
//! `{"type": "function", "function": {name, description, parameters}}`.

use serde_json::{Map, Value, json};
use taskpilot_domain::ToolDefinition;

/// Converts tool definitions to function-calling JSON Schema.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"`, `"path"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
///
/// Parameters with allowed values get an `enum`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaToolConverter;

impl JsonSchemaToolConverter {
    pub fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "string" | "path" => "string",
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(schema_type));
            prop.insert("description".to_string(), json!(param.description));
            if !param.allowed_values.is_empty() {
                prop.insert("enum".to_string(), json!(param.allowed_values));
            }
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }

    /// Schemas for every tool, in catalog order
    pub fn all_tools_schema(&self, tools: &[ToolDefinition]) -> Vec<Value> {
        tools.iter().map(|t| self.tool_to_schema(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::catalog::task_assistant_registry;
    use taskpilot_domain::{ToolCategory, ToolParameter};

    #[test]
    fn test_tool_to_schema() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("read_backend_file", "Read a file", ToolCategory::ProjectFiles)
            .with_parameter(ToolParameter::new("path", "File path to read", true).with_type("path"))
            .with_parameter(
                ToolParameter::new("max_lines", "Max lines to read", false).with_type("integer"),
            );

        let schema = converter.tool_to_schema(&tool);

        assert_eq!(schema["type"], "function");
        let function = &schema["function"];
        assert_eq!(function["name"], "read_backend_file");
        assert_eq!(function["description"], "Read a file");
        assert_eq!(function["parameters"]["type"], "object");

        // "path" maps to "string"
        let path_prop = &function["parameters"]["properties"]["path"];
        assert_eq!(path_prop["type"], "string");
        assert_eq!(path_prop["description"], "File path to read");
        assert!(path_prop.get("enum").is_none());

        let lines_prop = &function["parameters"]["properties"]["max_lines"];
        assert_eq!(lines_prop["type"], "integer");

        let required = function["parameters"]["required"].as_array().unwrap();
        assert_eq!(required, &vec![json!("path")]);
    }

    #[test]
    fn test_allowed_values_become_enum() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("list_tasks", "List tasks", ToolCategory::Task).with_parameter(
            ToolParameter::new("status", "Filter", false)
                .with_allowed_values(["all", "incomplete", "complete"]),
        );

        let schema = converter.tool_to_schema(&tool);
        assert_eq!(
            schema["function"]["parameters"]["properties"]["status"]["enum"],
            json!(["all", "incomplete", "complete"])
        );
        assert_eq!(schema["function"]["parameters"]["required"], json!([]));
    }

    #[test]
    fn test_all_tools_schema_keeps_catalog_order() {
        let converter = JsonSchemaToolConverter;
        let registry = task_assistant_registry().unwrap();

        let tools = converter.all_tools_schema(registry.definitions());
        assert_eq!(tools.len(), 12);

        let names: Vec<&str> = tools
            .iter()
            .map(|t| t["function"]["name"].as_str().unwrap())
            .collect();
        let expected: Vec<&str> = registry.names().collect();
        assert_eq!(names, expected);

        for tool in &tools {
            assert!(tool["function"]["description"].is_string());
            assert_eq!(tool["function"]["parameters"]["type"], "object");
        }
    }
}
