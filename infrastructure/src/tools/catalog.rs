//! The task assistant's tool catalog.
//!
//! Twelve definitions in a fixed order: task CRUD, project file access,
//! then service control. The order is what the model sees in the prompt
//! and in the `tools` array of every completion request.

use taskpilot_domain::{
    DomainError, ToolCategory, ToolDefinition, ToolName, ToolParameter, ToolRegistry,
};

/// Upper bound on task titles accepted by the task service
pub const MAX_TITLE_LEN: usize = 255;

const PRIORITIES: [&str; 3] = ["low", "medium", "high"];
const STATUSES: [&str; 2] = ["incomplete", "complete"];

fn task_id_param() -> ToolParameter {
    ToolParameter::new("task_id", "Numeric id of the task", true).with_type("integer")
}

fn priority_param() -> ToolParameter {
    ToolParameter::new("priority", "Task priority (defaults to medium)", false)
        .with_allowed_values(PRIORITIES)
}

fn path_param(required: bool, description: &str) -> ToolParameter {
    ToolParameter::new("path", description, required).with_type("path")
}

// ==================== Task tools ====================

pub fn add_task_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::AddTask.as_str(),
        "Create a new task for the user",
        ToolCategory::Task,
    )
    .with_parameter(ToolParameter::new(
        "title",
        format!("Short title of the task (at most {} characters)", MAX_TITLE_LEN),
        true,
    ))
    .with_parameter(ToolParameter::new(
        "description",
        "Optional longer description",
        false,
    ))
    .with_parameter(priority_param())
}

pub fn list_tasks_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::ListTasks.as_str(),
        "List the user's tasks, optionally filtered by status",
        ToolCategory::Task,
    )
    .with_parameter(
        ToolParameter::new("status", "Which tasks to list (defaults to all)", false)
            .with_allowed_values(["all", "incomplete", "complete"]),
    )
}

pub fn complete_task_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::CompleteTask.as_str(),
        "Mark a task as complete",
        ToolCategory::Task,
    )
    .with_parameter(task_id_param())
}

pub fn update_task_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::UpdateTask.as_str(),
        "Change the title, description, priority or status of a task",
        ToolCategory::Task,
    )
    .with_parameter(task_id_param())
    .with_parameter(ToolParameter::new("title", "New title", false))
    .with_parameter(ToolParameter::new("description", "New description", false))
    .with_parameter(priority_param())
    .with_parameter(
        ToolParameter::new("status", "New status", false).with_allowed_values(STATUSES),
    )
}

pub fn delete_task_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::DeleteTask.as_str(),
        "Delete a task permanently",
        ToolCategory::Task,
    )
    .with_parameter(task_id_param())
}

// ==================== Project file tools ====================

pub fn read_frontend_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::ReadFrontendFile.as_str(),
        "Read a file from the frontend source tree",
        ToolCategory::ProjectFiles,
    )
    .with_parameter(path_param(true, "Path relative to the frontend root"))
}

pub fn read_backend_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::ReadBackendFile.as_str(),
        "Read a file from the backend source tree",
        ToolCategory::ProjectFiles,
    )
    .with_parameter(path_param(true, "Path relative to the backend root"))
}

pub fn update_frontend_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::UpdateFrontendFile.as_str(),
        "Overwrite a file in the frontend source tree",
        ToolCategory::ProjectFiles,
    )
    .with_parameter(path_param(true, "Path relative to the frontend root"))
    .with_parameter(ToolParameter::new("content", "Complete new file content", true))
}

pub fn update_backend_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::UpdateBackendFile.as_str(),
        "Overwrite a file in the backend source tree",
        ToolCategory::ProjectFiles,
    )
    .with_parameter(path_param(true, "Path relative to the backend root"))
    .with_parameter(ToolParameter::new("content", "Complete new file content", true))
}

pub fn list_frontend_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::ListFrontendDirectory.as_str(),
        "List entries of a directory in the frontend source tree",
        ToolCategory::ProjectFiles,
    )
    .with_parameter(path_param(false, "Directory relative to the frontend root"))
}

pub fn list_backend_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::ListBackendDirectory.as_str(),
        "List entries of a directory in the backend source tree",
        ToolCategory::ProjectFiles,
    )
    .with_parameter(path_param(false, "Directory relative to the backend root"))
}

// ==================== Service tools ====================

pub fn restart_services_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::RestartServices.as_str(),
        "Restart the frontend, the backend, or both",
        ToolCategory::Services,
    )
    .with_parameter(
        ToolParameter::new("service", "Which service to restart (defaults to all)", false)
            .with_allowed_values(["frontend", "backend", "all"]),
    )
}

/// Common near-miss names mapped to their canonical tool
pub const TOOL_ALIASES: [(&str, &str); 5] = [
    ("create_task", "add_task"),
    ("remove_task", "delete_task"),
    ("finish_task", "complete_task"),
    ("edit_task", "update_task"),
    ("get_tasks", "list_tasks"),
];

/// Build the full twelve-tool registry with aliases.
///
/// Fails if a definition is duplicated or a capability is missing, which
/// can only happen if this file is edited incorrectly.
pub fn task_assistant_registry() -> Result<ToolRegistry, DomainError> {
    let registry = ToolRegistry::from_definitions([
        add_task_definition(),
        list_tasks_definition(),
        complete_task_definition(),
        update_task_definition(),
        delete_task_definition(),
        read_frontend_file_definition(),
        read_backend_file_definition(),
        update_frontend_file_definition(),
        update_backend_file_definition(),
        list_frontend_directory_definition(),
        list_backend_directory_definition(),
        restart_services_definition(),
    ])?
    .register_aliases(TOOL_ALIASES)?;

    registry.ensure_complete()?;
    Ok(registry)
}
