use crate::configuration::Configuration;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared, name-indexed store of configurations used to resolve imports.
///
/// Cloning hands out another handle to the same store, so configurations
/// registered later are visible to everyone holding a handle.
#[derive(Clone, Default)]
pub struct Repository {
    inner: Rc<RefCell<IndexMap<String, Rc<Configuration>>>>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configurations<I>(configurations: I) -> Self
    where
        I: IntoIterator<Item = (String, Configuration)>,
    {
        let repository = Self::new();
        for (name, configuration) in configurations {
            repository.add_configuration(&name, configuration);
        }
        repository
    }

    pub fn find_by_name(&self, name: &str) -> Option<Rc<Configuration>> {
        self.inner.borrow().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Registers a configuration, replacing any previous one with that name.
    pub fn add_configuration(
        &self,
        name: &str,
        configuration: impl Into<Rc<Configuration>>,
    ) -> Rc<Configuration> {
        let configuration = configuration.into();
        self.inner
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&configuration));
        configuration
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_after_construction_is_visible() {
        let repository = Repository::new();
        let handle = repository.clone();
        assert!(handle.find_by_name("A").is_none());
        repository.add_configuration("A", Configuration::new("a = b"));
        assert!(handle.find_by_name("A").is_some());
        assert_eq!(handle.names(), vec!["A"]);
    }

    #[test]
    fn test_names_keep_registration_order() {
        let repository = Repository::from_configurations(vec![
            ("b".to_string(), Configuration::new("")),
            ("a".to_string(), Configuration::new("")),
        ]);
        assert_eq!(repository.names(), vec!["b", "a"]);
        repository.clear();
        assert!(repository.is_empty());
    }
}
