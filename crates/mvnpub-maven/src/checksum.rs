//! Checksum sidecars (`.sha1`, `.md5`) for deployed files.

use mvnpub_util::errors::{MvnpubError, MvnpubResult};
use mvnpub_util::hash::{ChecksumAlgorithm, SIDECAR_ALGORITHMS};

/// A checksum file to upload next to a deployed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
    pub path: String,
    pub content: String,
}

/// The checksum sidecars for `data` stored at `path`.
pub fn sidecars(path: &str, data: &[u8]) -> Vec<Sidecar> {
    SIDECAR_ALGORITHMS
        .iter()
        .map(|algo| Sidecar {
            path: format!("{path}.{}", algo.extension()),
            content: algo.hex_digest(data),
        })
        .collect()
}

/// Whether `data` matches the checksum file `sidecar_content`.
pub fn matches(algo: ChecksumAlgorithm, data: &[u8], sidecar_content: &str) -> bool {
    let expected = extract_hash(sidecar_content);
    let actual = algo.hex_digest(data);
    if actual.eq_ignore_ascii_case(expected) {
        tracing::debug!("{} ok", algo.extension());
        true
    } else {
        tracing::warn!(
            "{} mismatch: expected {expected}, got {actual}",
            algo.extension()
        );
        false
    }
}

/// Check `data` fetched from `path` against its checksum file.
pub fn verify(
    algo: ChecksumAlgorithm,
    path: &str,
    data: &[u8],
    sidecar_content: &str,
) -> MvnpubResult<()> {
    if matches(algo, data, sidecar_content) {
        return Ok(());
    }
    Err(MvnpubError::Network {
        message: format!(
            "{} mismatch for {path}: expected {}, got {}",
            algo.extension(),
            extract_hash(sidecar_content),
            algo.hex_digest(data)
        ),
    })
}

/// Extract the hex hash from a checksum file.
///
/// Checksum files may contain just the hash, or `hash  filename`.
fn extract_hash(content: &str) -> &str {
    content.split_whitespace().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_hash_with_filename() {
        assert_eq!(extract_hash("abc123  my-lib-1.0.jar\n"), "abc123");
        assert_eq!(extract_hash(""), "");
    }

    #[test]
    fn sidecars_for_file() {
        let files = sidecars("com/example/lib/1.0/lib-1.0.jar", b"hello world");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "com/example/lib/1.0/lib-1.0.jar.sha1");
        assert_eq!(files[0].content, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
        assert_eq!(files[1].path, "com/example/lib/1.0/lib-1.0.jar.md5");
        assert_eq!(files[1].content, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn matches_is_case_insensitive() {
        assert!(matches(
            ChecksumAlgorithm::Md5,
            b"hello world",
            "5EB63BBBE01EEED093CB22BB8F5ACDC3  file\n"
        ));
        assert!(!matches(ChecksumAlgorithm::Md5, b"hello world", "00"));
    }

    #[test]
    fn verify_mismatch_is_network_error() {
        let err = verify(
            ChecksumAlgorithm::Sha1,
            "maven-metadata.xml",
            b"<metadata/>",
            &"0".repeat(40),
        )
        .unwrap_err();
        assert!(matches!(err, MvnpubError::Network { .. }));
        assert!(err.to_string().contains("sha1 mismatch for maven-metadata.xml"));
        assert!(verify(
            ChecksumAlgorithm::Sha1,
            "lib.jar",
            b"hello world",
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        )
        .is_ok());
    }
}
