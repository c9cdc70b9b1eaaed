//! Download filename derivation.
//!
//! A positional heuristic with no collision guarantees; two distinct
//! resources may yield the same derived name.

/// Strategy for naming a download from decomposed resource path segments.
///
/// Implementations inspect the non-empty `/`-separated segments of the
/// resource path and return a display name when the shape is recognized.
/// Alternate resource-naming conventions plug in here without touching the
/// stream bridge.
pub trait FilenameStrategy: Send + Sync {
    fn derive(&self, segments: &[&str]) -> Option<String>;
}

/// Default strategy: the conventional `{instance}/blobs/{digest}/{size}`
/// shape, from which the digest makes a presentable name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestFilename;

impl FilenameStrategy for DigestFilename {
    fn derive(&self, segments: &[&str]) -> Option<String> {
        (segments.len() == 4).then(|| segments[2].to_string())
    }
}

/// Derive a non-empty display name for a download.
///
/// 1. A non-empty hint wins: its last non-empty `/`-separated segment.
/// 2. Otherwise the strategy is asked with the decomposed resource path.
/// 3. Otherwise the raw resource path is returned unchanged.
pub fn derive_filename(
    hint: &str,
    resource_path: &str,
    strategy: &dyn FilenameStrategy,
) -> String {
    if let Some(name) = hint.split('/').filter(|s| !s.is_empty()).next_back() {
        return name.to_string();
    }

    let segments: Vec<&str> = resource_path.split('/').filter(|s| !s.is_empty()).collect();
    if let Some(name) = strategy.derive(&segments) {
        return name;
    }

    resource_path.to_string()
}
