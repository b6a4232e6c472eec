use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::composition::config::{FontConfig, FontRole};
use crate::foundation::error::{ReelError, ReelResult};

/// Normalize and validate an assets-relative path.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(ReelError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') || s.split('/').next().is_some_and(|p| p.ends_with(':')) {
        return Err(ReelError::validation(format!(
            "asset path '{source}' must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                return Err(ReelError::validation(format!(
                    "asset path '{source}' must not contain '..'"
                )));
            }
            _ => out.push(part),
        }
    }
    if out.is_empty() {
        return Err(ReelError::validation(format!(
            "asset path '{source}' must contain a file name"
        )));
    }
    Ok(out.join("/"))
}

/// Resolve an assets-relative path against `root`.
pub fn resolve_asset_path(root: &Path, source: &str) -> ReelResult<PathBuf> {
    Ok(root.join(normalize_rel_path(source)?))
}

/// Font file contents and the family name it registers as.
#[derive(Clone)]
pub struct FontBlob {
    /// Where the bytes came from (normalized relative path, or a caller-chosen tag).
    pub source: String,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Primary family name found in the font data.
    pub family: String,
}

impl std::fmt::Debug for FontBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBlob")
            .field("source", &self.source)
            .field("bytes_len", &self.bytes.len())
            .field("family", &self.family)
            .finish()
    }
}

impl FontBlob {
    /// Wrap font bytes, checking that they register at least one family.
    pub fn from_bytes(source: impl Into<String>, bytes: Vec<u8>) -> ReelResult<Self> {
        let source = source.into();
        let bytes = Arc::new(bytes);
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::validation(format!("font '{source}' registers no font families"))
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                ReelError::validation(format!("font '{source}' family has no name"))
            })?
            .to_string();
        Ok(Self {
            source,
            bytes,
            family,
        })
    }

    /// Read a font file below `root`.
    pub fn load(root: &Path, source: &str) -> ReelResult<Self> {
        let rel = normalize_rel_path(source)?;
        let path = root.join(&rel);
        let bytes = std::fs::read(&path).map_err(|e| {
            ReelError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(rel, bytes)
    }
}

/// Fonts for every text role, loaded once before rendering.
#[derive(Clone, Debug)]
pub struct PreparedFonts {
    /// Karaoke words font.
    pub words: FontBlob,
    /// Indicator label font.
    pub label: FontBlob,
}

impl PreparedFonts {
    /// Load the configured fonts from `assets_root`. A missing label font reuses the words font.
    pub fn load(config: &FontConfig, assets_root: &Path) -> ReelResult<Self> {
        let words = FontBlob::load(assets_root, &config.words)?;
        let label = match &config.label {
            Some(src) if normalize_rel_path(src)? != words.source => {
                FontBlob::load(assets_root, src)?
            }
            _ => words.clone(),
        };
        tracing::debug!(
            words = %words.family,
            label = %label.family,
            "loaded fonts"
        );
        Ok(Self { words, label })
    }

    /// Use one font for every role.
    pub fn single(font: FontBlob) -> Self {
        Self {
            label: font.clone(),
            words: font,
        }
    }

    /// Font used for `role`.
    pub fn font_for(&self, role: FontRole) -> &FontBlob {
        match role {
            FontRole::Words => &self.words,
            FontRole::Label => &self.label,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
