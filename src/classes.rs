//! Runtime class registry and capability checks
//!
//! Entities and objects carry a runtime class name ("AcDb…") arranged
//! in a single-inheritance tree. Capability checks ("is this object a
//! kind of AcDbCurve?") walk the parent chain; per-capability facts are
//! memoized and revalidated against a registry version counter, so a
//! class registration invalidates every cached fact at once.

use crate::error::{CadError, Result};
use ahash::AHashMap;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::cell::RefCell;

/// The built-in class tree: (class, parent). Roots have no parent.
static BUILTIN_CLASSES: Lazy<Vec<(&'static str, Option<&'static str>)>> = Lazy::new(|| {
    vec![
        ("AcDbObject", None),
        ("AcDbEntity", Some("AcDbObject")),
        ("AcDbBlockReference", Some("AcDbEntity")),
        ("AcDbCurve", Some("AcDbEntity")),
        ("AcDbLine", Some("AcDbCurve")),
        ("AcDbRay", Some("AcDbCurve")),
        ("AcDbXline", Some("AcDbCurve")),
        ("AcDbText", Some("AcDbEntity")),
        ("AcDbAttribute", Some("AcDbText")),
        ("AcDbAttributeDefinition", Some("AcDbText")),
        ("AcDbSymbolTableRecord", Some("AcDbObject")),
        ("AcDbBlockTableRecord", Some("AcDbSymbolTableRecord")),
        ("AcDbDictionary", Some("AcDbObject")),
        ("AcDbXrecord", Some("AcDbObject")),
    ]
});

/// Memoized facts about one capability, valid for a registry version
#[derive(Debug, Clone, Copy)]
struct KindFacts {
    version: u64,
    has_descendants: bool,
}

/// Registry of runtime classes with memoized capability facts
#[derive(Debug)]
pub struct ClassRegistry {
    /// class name -> parent class name (None for roots)
    parents: IndexMap<String, Option<String>>,
    /// Bumped on every registration; stale facts are recomputed
    version: u64,
    /// capability name -> cached facts
    facts: RefCell<AHashMap<String, KindFacts>>,
}

impl ClassRegistry {
    /// Create a registry seeded with the built-in class tree
    pub fn new() -> Self {
        let mut parents = IndexMap::new();
        for (name, parent) in BUILTIN_CLASSES.iter() {
            parents.insert(name.to_string(), parent.map(|p| p.to_string()));
        }
        ClassRegistry {
            parents,
            version: 0,
            facts: RefCell::new(AHashMap::new()),
        }
    }

    /// Register a new class under an existing parent
    ///
    /// Bumps the registry version, invalidating all memoized facts.
    pub fn register(&mut self, name: &str, parent: &str) -> Result<()> {
        if self.parents.contains_key(name) {
            return Err(CadError::DuplicateEntry(name.to_string()));
        }
        if !self.parents.contains_key(parent) {
            return Err(CadError::UnknownClass(parent.to_string()));
        }
        self.parents
            .insert(name.to_string(), Some(parent.to_string()));
        self.version += 1;
        Ok(())
    }

    /// Current registry version; changes whenever the tree changes
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if a class name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    /// Check whether `class` is `capability` or a registered descendant of it
    ///
    /// When the capability has no descendants the check degenerates to a
    /// name comparison without walking the tree.
    pub fn is_kind_of(&self, class: &str, capability: &str) -> Result<bool> {
        let facts = self.capability_facts(capability)?;
        if class == capability {
            return Ok(true);
        }
        if !facts.has_descendants {
            return Ok(false);
        }
        // Walk the parent chain of `class` looking for `capability`
        let mut current = self.parents.get(class);
        while let Some(parent) = current {
            match parent {
                Some(p) if p == capability => return Ok(true),
                Some(p) => current = self.parents.get(p.as_str()),
                None => break,
            }
        }
        Ok(false)
    }

    /// Check whether `class` is exactly `capability`
    ///
    /// Only valid for leaf capabilities. Calling this with a capability
    /// that has registered descendants is a contract violation and
    /// fails fast, because equality would silently miss subclasses.
    pub fn is_exact_kind(&self, class: &str, capability: &str) -> Result<bool> {
        let facts = self.capability_facts(capability)?;
        if facts.has_descendants {
            return Err(CadError::Precondition(format!(
                "class {} has descendants; exact-kind check is not applicable",
                capability
            )));
        }
        Ok(class == capability)
    }

    /// Look up (or recompute) the memoized facts for a capability
    fn capability_facts(&self, capability: &str) -> Result<KindFacts> {
        if let Some(cached) = self.facts.borrow().get(capability) {
            if cached.version == self.version {
                return Ok(*cached);
            }
        }
        if !self.parents.contains_key(capability) {
            return Err(CadError::UnknownClass(capability.to_string()));
        }
        let has_descendants = self
            .parents
            .values()
            .any(|parent| parent.as_deref() == Some(capability));
        let facts = KindFacts {
            version: self.version,
            has_descendants,
        };
        self.facts
            .borrow_mut()
            .insert(capability.to_string(), facts);
        Ok(facts)
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_hierarchy() {
        let reg = ClassRegistry::new();
        assert!(reg.is_kind_of("AcDbLine", "AcDbCurve").unwrap());
        assert!(reg.is_kind_of("AcDbLine", "AcDbEntity").unwrap());
        assert!(reg.is_kind_of("AcDbLine", "AcDbObject").unwrap());
        assert!(!reg.is_kind_of("AcDbLine", "AcDbText").unwrap());
        assert!(reg.is_kind_of("AcDbCurve", "AcDbCurve").unwrap());
    }

    #[test]
    fn test_unknown_capability() {
        let reg = ClassRegistry::new();
        let err = reg.is_kind_of("AcDbLine", "AcDbWidget").unwrap_err();
        assert!(matches!(err, CadError::UnknownClass(_)));
    }

    #[test]
    fn test_exact_kind_on_leaf() {
        let reg = ClassRegistry::new();
        assert!(reg.is_exact_kind("AcDbLine", "AcDbLine").unwrap());
        assert!(!reg.is_exact_kind("AcDbRay", "AcDbLine").unwrap());
    }

    #[test]
    fn test_exact_kind_fails_fast_on_non_leaf() {
        let reg = ClassRegistry::new();
        let err = reg.is_exact_kind("AcDbLine", "AcDbCurve").unwrap_err();
        assert!(matches!(err, CadError::Precondition(_)));
    }

    #[test]
    fn test_register_requires_existing_parent() {
        let mut reg = ClassRegistry::new();
        assert!(reg.register("AcDbSpline", "AcDbCurve").is_ok());
        assert!(reg.is_kind_of("AcDbSpline", "AcDbEntity").unwrap());

        let err = reg.register("AcDbWidget", "AcDbGizmo").unwrap_err();
        assert!(matches!(err, CadError::UnknownClass(_)));

        let err = reg.register("AcDbSpline", "AcDbCurve").unwrap_err();
        assert!(matches!(err, CadError::DuplicateEntry(_)));
    }

    #[test]
    fn test_registration_invalidates_cached_facts() {
        let mut reg = ClassRegistry::new();

        // Caches AcDbLine as a leaf
        assert!(reg.is_exact_kind("AcDbLine", "AcDbLine").unwrap());

        // Registering a subclass invalidates the fact: the capability
        // now has descendants and the exact-kind contract no longer holds.
        reg.register("AcDbCustomLine", "AcDbLine").unwrap();
        let err = reg.is_exact_kind("AcDbLine", "AcDbLine").unwrap_err();
        assert!(matches!(err, CadError::Precondition(_)));
        assert!(reg.is_kind_of("AcDbCustomLine", "AcDbLine").unwrap());
    }
}
