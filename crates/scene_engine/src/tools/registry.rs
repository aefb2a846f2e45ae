//! Keyed, insertion-ordered tool registry

use crate::tools::Tool;

/// Registry mapping a capability key to a tool instance
///
/// Entries keep their registration order, so the per-frame update visits
/// tools deterministically. Lookup is linear; registries hold a handful of
/// tools, not thousands.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<(String, Box<dyn Tool>)>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under a capability key
    ///
    /// Replaces and returns any tool previously registered under the same
    /// key; the entry keeps its original position in the update order.
    pub fn register(&mut self, key: impl Into<String>, tool: Box<dyn Tool>) -> Option<Box<dyn Tool>> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                log::debug!("Tool '{}' replaced", key);
                Some(std::mem::replace(&mut entry.1, tool))
            }
            None => {
                log::debug!("Tool '{}' registered", key);
                self.entries.push((key, tool));
                None
            }
        }
    }

    /// Remove and return the tool registered under a key
    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Tool>> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Borrow the tool under a key as its concrete type
    pub fn get<T: Tool + 'static>(&self, key: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, tool)| tool.as_any().downcast_ref())
    }

    /// Mutably borrow the tool under a key as its concrete type
    pub fn get_mut<T: Tool + 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .and_then(|(_, tool)| tool.as_any_mut().downcast_mut())
    }

    /// Whether a tool is registered under a key
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Registered keys in update order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Update every registered tool in registration order
    pub fn update_all(&mut self, delta: f32) {
        for (_, tool) in &mut self.entries {
            tool.update(delta);
        }
    }
}
