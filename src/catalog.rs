//! Proposal catalog
//!
//! Read-only lookup from numeric id to a raw formation record. The session only
//! depends on the `ProposalCatalog` trait; `InMemoryCatalog` covers the sources
//! we ship (JSON documents and the built-in formation list).

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use crate::error::{GameError, GameResult};
use crate::proposal::ProposalId;

/// Raw catalog row. `field` stays text until it crosses into `Proposal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    #[validate(length(min = 1, message = "Formation name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Formation field is required"))]
    pub field: String,

    pub candidates: u32,

    pub jobs: u32,
}

impl CatalogRecord {
    pub fn new(name: impl Into<String>, field: impl Into<String>, candidates: u32, jobs: u32) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            candidates,
            jobs,
        }
    }
}

/// Read-only source of formation records, keyed `1..=len()`
pub trait ProposalCatalog {
    /// Catalog cardinality, the size of the draw pool.
    fn len(&self) -> u32;

    /// `None` when the catalog has no record for `id`.
    fn lookup(&self, id: ProposalId) -> Option<CatalogRecord>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: ProposalCatalog + ?Sized> ProposalCatalog for Box<C> {
    fn len(&self) -> u32 {
        (**self).len()
    }

    fn lookup(&self, id: ProposalId) -> Option<CatalogRecord> {
        (**self).lookup(id)
    }
}

/// Catalog held entirely in memory. Ids are assigned in record order from 1.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    records: Vec<CatalogRecord>,
}

impl InMemoryCatalog {
    pub fn new(records: Vec<CatalogRecord>) -> GameResult<Self> {
        for (index, record) in records.iter().enumerate() {
            record.validate().map_err(|e| {
                GameError::CatalogLoad(format!("record {} is invalid: {}", index + 1, e))
            })?;
        }
        if u32::try_from(records.len()).is_err() {
            return Err(GameError::CatalogLoad("catalog has too many records".to_string()));
        }
        Ok(Self { records })
    }

    /// Parse a JSON array of records
    pub fn from_json_str(json: &str) -> GameResult<Self> {
        let records: Vec<CatalogRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Load a JSON catalog file. The file is read once and closed before returning.
    pub fn from_json_file(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GameError::CatalogLoad(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json_str(&contents)?;
        info!(
            "Loaded catalog from {}: {} formations",
            path.display(),
            catalog.records.len()
        );
        Ok(catalog)
    }

    /// The default formation list
    pub fn builtin() -> Self {
        debug!("Using built-in catalog ({} formations)", BUILTIN_RECORDS.len());
        Self {
            records: BUILTIN_RECORDS.clone(),
        }
    }
}

impl ProposalCatalog for InMemoryCatalog {
    fn len(&self) -> u32 {
        // bounded in `new`
        self.records.len() as u32
    }

    fn lookup(&self, id: ProposalId) -> Option<CatalogRecord> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.records.get(index).cloned()
    }
}

static BUILTIN_RECORDS: Lazy<Vec<CatalogRecord>> = Lazy::new(|| {
    vec![
        CatalogRecord::new("BUT Techniques de Commercialisation", "COMMERCE", 420, 65),
        CatalogRecord::new("BUT Génie Électrique et Informatique Industrielle", "ENGINEERING", 260, 80),
        CatalogRecord::new("BUT Statistique et Informatique Décisionnelle", "STATISTICS", 180, 55),
        CatalogRecord::new("BUT Informatique", "COMPUTER_SCIENCE", 510, 90),
        CatalogRecord::new("BUT Réseaux et Télécommunications", "COMPUTER_SCIENCE", 230, 70),
        CatalogRecord::new("BUT Qualité, Logistique Industrielle et Organisation", "INDUSTRY", 150, 60),
        CatalogRecord::new("BUT Génie Biologique", "BIOLOGY", 310, 35),
        CatalogRecord::new("BUT Management de la Logistique et des Transports", "LOGISTICS", 200, 75),
        CatalogRecord::new("BUT Chimie", "CHEMISTRY", 170, 45),
        CatalogRecord::new("BUT Hygiène, Sécurité, Environnement", "ENVIRONMENT", 140, 50),
        CatalogRecord::new("BUT Génie Mécanique et Productique", "MECHANICS", 240, 85),
        CatalogRecord::new("BUT Gestion des Entreprises et des Administrations", "ADMINISTRATION", 460, 60),
        CatalogRecord::new("BUT Carrières Juridiques", "LAW", 380, 40),
        CatalogRecord::new("BUT Carrières Sociales", "SOCIAL", 290, 30),
        CatalogRecord::new("BUT Science et Génie des Matériaux", "ENGINEERING", 110, 55),
        CatalogRecord::new("BUT Mesures Physiques", "INDUSTRY", 160, 50),
        CatalogRecord::new("BUT Gestion Logistique et Transport", "LOGISTICS", 190, 65),
    ]
});
