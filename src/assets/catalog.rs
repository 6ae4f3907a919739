//! Static catalog of decorative mask shapes.

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::{bitmap::Bitmap, decode::decode_any},
    foundation::error::{ShapecropError, ShapecropResult},
};

/// One catalog entry. `path` is relative to the catalog root.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MaskEntry {
    pub id: String,
    pub name: String,
    pub path: String,
}

struct BuiltinMask {
    id: &'static str,
    name: &'static str,
    path: &'static str,
    bytes: &'static [u8],
}

const BUILTIN_MASKS: &[BuiltinMask] = &[
    BuiltinMask {
        id: "circle",
        name: "Circle",
        path: "masks/circle.svg",
        bytes: include_bytes!("../../assets/masks/circle.svg"),
    },
    BuiltinMask {
        id: "square",
        name: "Square",
        path: "masks/square.svg",
        bytes: include_bytes!("../../assets/masks/square.svg"),
    },
    BuiltinMask {
        id: "heart",
        name: "Heart",
        path: "masks/heart.svg",
        bytes: include_bytes!("../../assets/masks/heart.svg"),
    },
    BuiltinMask {
        id: "star",
        name: "Star",
        path: "masks/star.svg",
        bytes: include_bytes!("../../assets/masks/star.svg"),
    },
];

/// Insertion-ordered, immutable list of masks keyed by id.
///
/// Without a root directory, entry paths resolve to the shapes embedded in the crate.
#[derive(Clone, Debug)]
pub struct MaskCatalog {
    entries: Vec<MaskEntry>,
    root: Option<PathBuf>,
}

impl Default for MaskCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MaskCatalog {
    pub fn builtin() -> Self {
        let entries = BUILTIN_MASKS
            .iter()
            .map(|m| MaskEntry {
                id: m.id.to_string(),
                name: m.name.to_string(),
                path: m.path.to_string(),
            })
            .collect();
        Self {
            entries,
            root: None,
        }
    }

    /// Catalog whose entry paths are read from `root` on disk.
    pub fn from_entries(entries: Vec<MaskEntry>, root: Option<PathBuf>) -> ShapecropResult<Self> {
        for (i, e) in entries.iter().enumerate() {
            if e.id.is_empty() {
                return Err(ShapecropError::validation("mask id must be non-empty"));
            }
            if entries[..i].iter().any(|prev| prev.id == e.id) {
                return Err(ShapecropError::validation(format!(
                    "duplicate mask id '{}'",
                    e.id
                )));
            }
            normalize_rel_path(&e.path)?;
        }
        Ok(Self { entries, root })
    }

    /// Same entries, read from `root` instead of the embedded shapes.
    pub fn with_root(self, root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..self
        }
    }

    pub fn entries(&self) -> &[MaskEntry] {
        &self.entries
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn resolve(&self, id: &str) -> ShapecropResult<&MaskEntry> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| ShapecropError::not_found(format!("mask '{id}'")))
    }

    /// Encoded bytes of the entry's image resource.
    pub fn load_bytes(&self, entry: &MaskEntry) -> ShapecropResult<Cow<'static, [u8]>> {
        let rel = normalize_rel_path(&entry.path)?;
        match &self.root {
            Some(root) => {
                let path = root.join(&rel);
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read mask '{}'", path.display()))?;
                Ok(Cow::Owned(bytes))
            }
            None => BUILTIN_MASKS
                .iter()
                .find(|m| m.path == rel)
                .map(|m| Cow::Borrowed(m.bytes))
                .ok_or_else(|| {
                    ShapecropError::not_found(format!("embedded mask resource '{rel}'"))
                }),
        }
    }

    /// Decode the entry's resource; SVG shapes are rasterized with `longest_side` pixels.
    pub fn load_bitmap(&self, entry: &MaskEntry, longest_side: u32) -> ShapecropResult<Bitmap> {
        let bytes = self.load_bytes(entry)?;
        decode_any(&bytes, longest_side)
    }
}

/// Normalize and validate catalog-relative resource paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> ShapecropResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ShapecropError::validation("mask paths must be relative"));
    }
    if s.is_empty() {
        return Err(ShapecropError::validation("mask path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ShapecropError::validation("mask paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ShapecropError::validation("mask path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
