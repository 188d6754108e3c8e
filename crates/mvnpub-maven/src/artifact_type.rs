//! Artifact type stereotypes: what extension and default classifier a
//! packaging or attachment type maps to.

use std::collections::BTreeMap;

use mvnpub_core::config::TypeEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactType {
    pub extension: String,
    pub classifier: Option<String>,
}

/// Read-only lookup table from type name to [`ArtifactType`].
#[derive(Debug, Clone, Default)]
pub struct ArtifactTypeRegistry {
    types: BTreeMap<String, ArtifactType>,
}

impl ArtifactTypeRegistry {
    /// An empty registry: every type maps to itself as extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stereotypes every Maven repository session knows about.
    pub fn maven_defaults() -> Self {
        Self::new()
            .with_type("pom", "pom", None)
            .with_type("jar", "jar", None)
            .with_type("maven-plugin", "jar", None)
            .with_type("ejb", "jar", None)
            .with_type("ejb-client", "jar", Some("client"))
            .with_type("test-jar", "jar", Some("tests"))
            .with_type("javadoc", "jar", Some("javadoc"))
            .with_type("java-source", "jar", Some("sources"))
            .with_type("war", "war", None)
            .with_type("ear", "ear", None)
            .with_type("rar", "rar", None)
            .with_type("par", "par", None)
    }

    /// Maven defaults with `[types]` entries from `publish.toml` layered on top.
    pub fn from_config(overrides: &BTreeMap<String, TypeEntry>) -> Self {
        let mut registry = Self::maven_defaults();
        for (name, entry) in overrides {
            registry.insert(name, &entry.extension, entry.classifier.as_deref());
        }
        registry
    }

    pub fn with_type(mut self, name: &str, extension: &str, classifier: Option<&str>) -> Self {
        self.insert(name, extension, classifier);
        self
    }

    pub fn insert(&mut self, name: &str, extension: &str, classifier: Option<&str>) {
        self.types.insert(
            name.to_string(),
            ArtifactType {
                extension: extension.to_string(),
                classifier: classifier.filter(|c| !c.is_empty()).map(str::to_string),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_maven_stereotypes() {
        let registry = ArtifactTypeRegistry::maven_defaults();
        assert_eq!(registry.len(), 12);
        let test_jar = registry.get("test-jar").unwrap();
        assert_eq!(test_jar.extension, "jar");
        assert_eq!(test_jar.classifier.as_deref(), Some("tests"));
        assert_eq!(registry.get("maven-plugin").unwrap().extension, "jar");
        assert!(registry.get("aar").is_none());
    }

    #[test]
    fn config_overrides_replace_and_extend() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "aar".to_string(),
            TypeEntry {
                extension: "aar".to_string(),
                classifier: None,
            },
        );
        overrides.insert(
            "javadoc".to_string(),
            TypeEntry {
                extension: "zip".to_string(),
                classifier: Some("docs".to_string()),
            },
        );
        let registry = ArtifactTypeRegistry::from_config(&overrides);
        assert_eq!(registry.get("aar").unwrap().extension, "aar");
        let javadoc = registry.get("javadoc").unwrap();
        assert_eq!(javadoc.extension, "zip");
        assert_eq!(javadoc.classifier.as_deref(), Some("docs"));
    }
}
