//! Ordered, immutable tool catalog.

use super::entities::ToolDefinition;
use super::name::ToolName;
use crate::core::error::DomainError;
use std::collections::HashMap;

/// Catalog of tools offered to the model.
///
/// Built once at startup with the consuming builder methods; every builder
/// step fails fast on a duplicate name. After construction the registry is
/// only read, so it can be shared freely behind an `Arc`.
///
/// [`definitions`](Self::definitions) returns tools in registration order,
/// which keeps prompts and test fixtures reproducible.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
    /// Alias → canonical name mapping (e.g. "create_task" → "add_task")
    aliases: HashMap<String, String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of definitions.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ToolDefinition>,
    ) -> Result<Self, DomainError> {
        definitions
            .into_iter()
            .try_fold(Self::new(), |registry, def| registry.register(def))
    }

    pub fn register(mut self, tool: ToolDefinition) -> Result<Self, DomainError> {
        if self.index.contains_key(&tool.name) || self.aliases.contains_key(&tool.name) {
            return Err(DomainError::DuplicateTool(tool.name));
        }
        self.index.insert(tool.name.clone(), self.tools.len());
        self.tools.push(tool);
        Ok(self)
    }

    /// Register a single alias mapping (builder pattern)
    pub fn register_alias(
        mut self,
        alias: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let alias = alias.into();
        let canonical = canonical.into();

        if !self.index.contains_key(&canonical) {
            return Err(DomainError::UnknownTool(canonical));
        }
        if self.index.contains_key(&alias) || self.aliases.contains_key(&alias) {
            return Err(DomainError::DuplicateTool(alias));
        }

        self.aliases.insert(alias, canonical);
        Ok(self)
    }

    /// Register multiple aliases at once (builder pattern)
    pub fn register_aliases<A, C>(
        self,
        mappings: impl IntoIterator<Item = (A, C)>,
    ) -> Result<Self, DomainError>
    where
        A: Into<String>,
        C: Into<String>,
    {
        mappings
            .into_iter()
            .try_fold(self, |registry, (alias, canonical)| {
                registry.register_alias(alias, canonical)
            })
    }

    /// All definitions, in registration order. Aliases are not included.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Look up a tool by canonical name or alias.
    pub fn resolve(&self, name: &str) -> Result<&ToolDefinition, DomainError> {
        self.canonical_name(name)
            .and_then(|canonical| self.get(canonical))
            .ok_or_else(|| DomainError::UnknownTool(name.to_string()))
    }

    /// Resolve a name: returns the canonical name if it's a registered tool,
    /// or resolves an alias, or None if unknown
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.index.contains_key(name) {
            Some(name)
        } else {
            self.aliases.get(name).map(|s| s.as_str())
        }
    }

    /// Exact lookup, aliases are ignored
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Fail unless every capability in [`ToolName::ALL`] is registered.
    pub fn ensure_complete(&self) -> Result<(), DomainError> {
        let missing: Vec<String> = ToolName::ALL
            .iter()
            .filter(|name| !self.index.contains_key(name.as_str()))
            .map(|name| name.as_str().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::IncompleteCatalog(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolCategory;

    fn def(name: &str) -> ToolDefinition {
        ToolDefinition::new(name, format!("{} tool", name), ToolCategory::Task)
    }

    #[test]
    fn test_definitions_preserve_registration_order() {
        let registry = ToolRegistry::new()
            .register(def("list_tasks"))
            .unwrap()
            .register(def("add_task"))
            .unwrap()
            .register(def("delete_task"))
            .unwrap();

        let names: Vec<&str> = registry.definitions().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["list_tasks", "add_task", "delete_task"]);
        // Stable across calls
        let again: Vec<&str> = registry.names().collect();
        assert_eq!(names, again);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let err = ToolRegistry::from_definitions([def("add_task"), def("add_task")]).unwrap_err();
        assert_eq!(err, DomainError::DuplicateTool("add_task".to_string()));
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let registry = ToolRegistry::from_definitions([def("add_task")]).unwrap();

        assert_eq!(registry.resolve("add_task").unwrap().name, "add_task");
        assert_eq!(
            registry.resolve("get_weather").unwrap_err(),
            DomainError::UnknownTool("get_weather".to_string())
        );
    }

    #[test]
    fn test_aliases_resolve_but_are_not_listed() {
        let registry = ToolRegistry::from_definitions([def("add_task"), def("delete_task")])
            .unwrap()
            .register_aliases([("create_task", "add_task"), ("remove_task", "delete_task")])
            .unwrap();

        assert_eq!(registry.resolve("create_task").unwrap().name, "add_task");
        assert_eq!(registry.canonical_name("remove_task"), Some("delete_task"));
        assert_eq!(registry.canonical_name("add_task"), Some("add_task"));
        assert!(registry.get("create_task").is_none());
        assert_eq!(registry.definitions().len(), 2);
    }

    #[test]
    fn test_alias_must_target_registered_tool() {
        let err = ToolRegistry::new()
            .register(def("add_task"))
            .unwrap()
            .register_alias("nuke", "drop_database")
            .unwrap_err();
        assert_eq!(err, DomainError::UnknownTool("drop_database".to_string()));
    }

    #[test]
    fn test_alias_cannot_shadow_tool() {
        let err = ToolRegistry::from_definitions([def("add_task"), def("list_tasks")])
            .unwrap()
            .register_alias("list_tasks", "add_task")
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateTool("list_tasks".to_string()));
    }

    #[test]
    fn test_ensure_complete_reports_missing() {
        let registry = ToolRegistry::from_definitions([def("add_task")]).unwrap();
        match registry.ensure_complete() {
            Err(DomainError::IncompleteCatalog(missing)) => {
                assert_eq!(missing.len(), 11);
                assert!(missing.contains(&"restart_services".to_string()));
                assert!(!missing.contains(&"add_task".to_string()));
            }
            other => panic!("expected IncompleteCatalog, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_complete_accepts_full_catalog() {
        let registry =
            ToolRegistry::from_definitions(ToolName::ALL.iter().map(|n| def(n.as_str()))).unwrap();
        assert!(registry.ensure_complete().is_ok());
        assert_eq!(registry.len(), 12);
    }
}
