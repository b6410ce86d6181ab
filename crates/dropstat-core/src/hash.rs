//! Recall tokens derived from report ids
use crate::data_model::ReportId;

/// Key-derivation context; changing it invalidates every outstanding token.
const TOKEN_CONTEXT: &str = "dropstat 2024-06-01 report recall token v1";

/// Maps a report id to the opaque token handed to the submitter.
///
/// Pure and stateless: the same id yields the same token in every process.
pub struct ReportHasher;

impl ReportHasher {
    pub fn hash(id: &ReportId) -> String {
        Self::digest(id).to_hex().to_string()
    }

    /// Constant-time comparison of a presented token against `id`'s token.
    /// Anything that is not a well-formed token never matches.
    pub fn matches(id: &ReportId, token: &str) -> bool {
        match blake3::Hash::from_hex(token) {
            Ok(presented) => presented == Self::digest(id),
            Err(_) => false,
        }
    }

    fn digest(id: &ReportId) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_derive_key(TOKEN_CONTEXT);
        hasher.update(id.as_str().as_bytes());
        hasher.finalize()
    }
}
