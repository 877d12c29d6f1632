//! Mode catalog: the built-in breathing patterns and user-supplied ones.
//!
//! Structure:
//! - Pure functions: built-in modes, validation, lookup
//! - Effect functions: reading a JSON catalog from disk

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{CatalogError, Error, Result};
use crate::types::{Mode, ModeColor, Phase};

/// Catalog filename within the config directory.
const CATALOG_FILENAME: &str = "modes.json";

/// Session length of the reference deployment, in seconds.
pub const DEFAULT_SESSION_SECS: u32 = 120;

// ============================================================================
// PURE FUNCTIONS (Computations)
// ============================================================================

/// Returns the default catalog path.
///
/// On Linux: ~/.config/serene-flow/modes.json
pub fn default_catalog_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("serene-flow")
        .join(CATALOG_FILENAME)
}

/// The reference catalog: Zen, Focused, Energize.
pub fn builtin_modes() -> Vec<Mode> {
    vec![
        Mode {
            id: "zen".into(),
            name: "Zen".into(),
            description: "Deep relaxation with extended breathing cycles".into(),
            color: ModeColor([0x4a, 0x90, 0xe2]),
            inhale: 4,
            hold: 7,
            exhale: 8,
        },
        Mode {
            id: "focused".into(),
            name: "Focused".into(),
            description: "Balanced breathing for concentration and clarity".into(),
            color: ModeColor([0x50, 0xc8, 0x78]),
            inhale: 4,
            hold: 4,
            exhale: 4,
        },
        Mode {
            id: "energize".into(),
            name: "Energize".into(),
            description: "Quick breathing to boost energy and alertness".into(),
            color: ModeColor([0xff, 0x6b, 0x6b]),
            inhale: 2,
            hold: 1,
            exhale: 3,
        },
    ]
}

/// Check a list of modes against the catalog invariants.
pub fn validate(modes: &[Mode]) -> Result<(), CatalogError> {
    if modes.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::new();
    for mode in modes {
        if !seen.insert(mode.id.as_str()) {
            return Err(CatalogError::DuplicateId(mode.id.clone()));
        }
        for phase in [Phase::Inhale, Phase::Hold, Phase::Exhale] {
            if mode.duration(phase) == 0 {
                return Err(CatalogError::ZeroDuration {
                    id: mode.id.clone(),
                    phase,
                });
            }
        }
    }

    Ok(())
}

/// An ordered, validated, non-empty list of modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    modes: Vec<Mode>,
}

impl Catalog {
    /// Build a catalog, rejecting lists that break the invariants.
    pub fn new(modes: Vec<Mode>) -> Result<Self, CatalogError> {
        validate(&modes)?;
        Ok(Catalog { modes })
    }

    /// The reference catalog.
    pub fn builtin() -> Self {
        Catalog {
            modes: builtin_modes(),
        }
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Whether the catalog has no modes.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// First entry; the mode a fresh session starts with.
    pub fn default_mode(&self) -> &Mode {
        &self.modes[0]
    }

    pub fn get(&self, index: usize) -> Option<&Mode> {
        self.modes.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.modes.iter().position(|m| m.id == id)
    }

    /// Index of the mode with `id`, or fail with the list of known ids.
    pub fn require(&self, id: &str) -> Result<usize> {
        self.position(id).ok_or_else(|| Error::UnknownMode {
            id: id.to_string(),
            known: self.modes.iter().map(|m| m.id.clone()).collect(),
        })
    }

    // ========================================================================
    // EFFECT FUNCTIONS (Actions)
    // ========================================================================

    /// Read a JSON array of modes from `path` and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let modes: Vec<Mode> = serde_json::from_str(&raw).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Catalog::new(modes)?;
        info!(path = %path.display(), modes = catalog.len(), "loaded mode catalog");
        Ok(catalog)
    }

    /// Load the catalog the CLI should use.
    ///
    /// An explicit path must load. Without one, the default path is tried
    /// and the built-in catalog is used when no file exists there.
    pub fn load_or_builtin(explicit: Option<&Path>) -> Result<Self> {
        Catalog::load_or_builtin_from(explicit, &default_catalog_path())
    }

    /// [`Catalog::load_or_builtin`] with the default path given.
    ///
    /// A default file that exists but fails to load is an error.
    pub fn load_or_builtin_from(explicit: Option<&Path>, default: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Catalog::load(path);
        }

        if default.exists() {
            Catalog::load(default)
        } else {
            warn!(path = %default.display(), "no catalog file, using built-in modes");
            Ok(Catalog::builtin())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
