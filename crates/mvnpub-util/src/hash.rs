use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Checksums written next to every deployed file.
pub const SIDECAR_ALGORITHMS: [ChecksumAlgorithm; 2] =
    [ChecksumAlgorithm::Sha1, ChecksumAlgorithm::Md5];

/// Checksum algorithms used for repository sidecar files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Sha1,
    Md5,
    Sha256,
}

impl ChecksumAlgorithm {
    /// Sidecar file extension, e.g. `sha1` for `lib-1.0.jar.sha1`.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }

    /// Hash a byte slice, returning a lowercase hex string.
    pub fn hex_digest(self, data: &[u8]) -> String {
        match self {
            Self::Sha1 => hex::<Sha1>(data),
            Self::Md5 => hex::<Md5>(data),
            Self::Sha256 => hex::<Sha256>(data),
        }
    }
}

fn hex<D: Digest>(data: &[u8]) -> String {
    let mut hasher = D::new();
    hasher.update(data);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
