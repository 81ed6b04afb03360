use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use tracing::{debug, warn};

use crate::error::{AppError, Result};

const REGULAR_CANDIDATES: &[&str] = &[
    "fonts/arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "fonts/arialbd.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Typeface used for all text on the graphic.
///
/// A configured face always beats the built-in candidates. Within each group
/// bold is tried before regular. With no font at all the renderer draws
/// shapes only.
pub struct Fonts {
    face: Option<FontVec>,
}

impl Fonts {
    /// Load a font. Configured paths (bold, then regular) win over the
    /// bundled `fonts/` directory and common system locations.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Self {
        let face = find_font(search_order(regular, bold));

        if face.is_none() {
            warn!("No usable font found, the graphic will be drawn without text");
        }

        Self { face }
    }

    /// No font at all; text is skipped.
    pub fn none() -> Self {
        Self { face: None }
    }

    pub fn has_text(&self) -> bool {
        self.face.is_some()
    }

    pub fn face(&self) -> Option<&FontVec> {
        self.face.as_ref()
    }
}

fn search_order(regular: Option<&Path>, bold: Option<&Path>) -> Vec<PathBuf> {
    let configured = bold.into_iter().chain(regular).map(Path::to_path_buf);
    let fallbacks = BOLD_CANDIDATES
        .iter()
        .chain(REGULAR_CANDIDATES)
        .map(PathBuf::from);

    configured.chain(fallbacks).collect()
}

fn find_font(paths: impl IntoIterator<Item = PathBuf>) -> Option<FontVec> {
    for path in paths {
        if !path.exists() {
            continue;
        }

        match load_font(&path) {
            Ok(font) => {
                debug!("Loaded font {}", path.display());
                return Some(font);
            }
            Err(e) => warn!("Skipping font {}: {}", path.display(), e),
        }
    }

    None
}

pub fn load_font(path: &Path) -> Result<FontVec> {
    let bytes = fs::read(path)?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| AppError::Font(format!("{}: {}", path.display(), e)))
}
