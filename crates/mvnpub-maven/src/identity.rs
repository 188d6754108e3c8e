//! Canonical identity of a typed artifact.

use crate::artifact_type::ArtifactTypeRegistry;
use crate::coordinate::ArtifactCoordinate;

/// Compute the coordinate of an artifact of type `type_`.
///
/// A registered type contributes its extension, and its default classifier
/// when the caller gives none (or an empty one). An unregistered type is
/// used verbatim as the extension and the caller's classifier is kept as is.
pub fn resolve(
    registry: &ArtifactTypeRegistry,
    group_id: &str,
    artifact_id: &str,
    version: &str,
    type_: &str,
    classifier: Option<&str>,
) -> ArtifactCoordinate {
    let (extension, classifier) = match registry.get(type_) {
        Some(stereotype) => {
            let classifier = classifier
                .filter(|c| !c.is_empty())
                .or(stereotype.classifier.as_deref());
            (stereotype.extension.as_str(), classifier)
        }
        None => (type_, classifier),
    };
    ArtifactCoordinate::new(group_id, artifact_id, version, classifier, extension)
}
