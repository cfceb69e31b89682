//! Static catalog data: idol templates, work regions and jobs.
//!
//! The catalog is loaded once at startup and may be refreshed later by the
//! sync task. Readers always work against an immutable [`CatalogSnapshot`]
//! held behind an `Arc`; a refresh builds a whole new snapshot and swaps it
//! in through [`CatalogStore::install`], so no reader ever observes a
//! half-applied update.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Card rarity, ordered from most common to rarest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rarity {
    N,
    R,
    Sr,
    Ssr,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::N, Rarity::R, Rarity::Sr, Rarity::Ssr];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::R => "R",
            Self::Sr => "SR",
            Self::Ssr => "SSR",
        }
    }
}

impl FromStr for Rarity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::N),
            "R" => Ok(Self::R),
            "SR" => Ok(Self::Sr),
            "SSR" => Ok(Self::Ssr),
            other => Err(CoreError::Validation(format!("Unknown rarity '{other}'"))),
        }
    }
}

/// Idol attribute used for work type matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdolType {
    Cute,
    Cool,
    Passion,
}

impl IdolType {
    pub const ALL: [IdolType; 3] = [IdolType::Cute, IdolType::Cool, IdolType::Passion];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cute => "cute",
            Self::Cool => "cool",
            Self::Passion => "passion",
        }
    }
}

impl FromStr for IdolType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cute" => Ok(Self::Cute),
            "cool" => Ok(Self::Cool),
            "passion" => Ok(Self::Passion),
            other => Err(CoreError::Validation(format!("Unknown idol type '{other}'"))),
        }
    }
}

/// Type requirement of a work job. `All` accepts every idol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobType {
    All,
    Cute,
    Cool,
    Passion,
}

impl JobType {
    /// The specific idol type this job favors, if any.
    pub fn favored(self) -> Option<IdolType> {
        match self {
            Self::All => None,
            Self::Cute => Some(IdolType::Cute),
            Self::Cool => Some(IdolType::Cool),
            Self::Passion => Some(IdolType::Passion),
        }
    }

    pub fn matches(self, idol_type: IdolType) -> bool {
        self.favored().map_or(true, |t| t == idol_type)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Cute => "CUTE",
            Self::Cool => "COOL",
            Self::Passion => "PASSION",
        }
    }
}

impl FromStr for JobType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "CUTE" => Ok(Self::Cute),
            "COOL" => Ok(Self::Cool),
            "PASSION" => Ok(Self::Passion),
            _ => Err(CoreError::Validation(format!("Unknown job type '{s}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog entities
// ---------------------------------------------------------------------------

/// Immutable definition of an idol card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdolTemplate {
    pub id: DbId,
    pub name: String,
    pub rarity: Rarity,
    pub idol_type: IdolType,
    pub vocal: i32,
    pub dance: i32,
    pub visual: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRegion {
    pub id: DbId,
    pub name: String,
    /// Minimum producer level needed to take jobs in this region.
    pub unlock_level: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkJob {
    pub id: DbId,
    pub region_id: DbId,
    pub name: String,
    pub stamina_cost: i32,
    pub job_type: JobType,
    pub base_money: i64,
    pub base_exp: i64,
    /// Event that this job feeds points into, if any.
    pub event_id: Option<DbId>,
    #[serde(default)]
    pub base_event_points: i64,
}

/// Catalog payload as served by the sync source and as loaded from the database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub templates: Vec<IdolTemplate>,
    pub regions: Vec<WorkRegion>,
    pub jobs: Vec<WorkJob>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A complete, validated, read-only view of the catalog.
#[derive(Debug)]
pub struct CatalogSnapshot {
    version: u64,
    templates: HashMap<DbId, IdolTemplate>,
    by_rarity: HashMap<Rarity, Vec<DbId>>,
    regions: Vec<WorkRegion>,
    jobs: HashMap<DbId, WorkJob>,
}

impl CatalogSnapshot {
    /// Validate `doc` and index it.
    ///
    /// Rejects documents that would leave the gacha unable to honor a rarity
    /// roll, jobs pointing at unknown regions, and non-positive stamina costs.
    pub fn build(version: u64, doc: CatalogDocument) -> Result<Self, CoreError> {
        let mut by_rarity: HashMap<Rarity, Vec<DbId>> = HashMap::new();
        let mut templates = HashMap::with_capacity(doc.templates.len());
        for template in doc.templates {
            if template.vocal < 0 || template.dance < 0 || template.visual < 0 {
                return Err(CoreError::Validation(format!(
                    "Template {} has negative stats",
                    template.id
                )));
            }
            by_rarity.entry(template.rarity).or_default().push(template.id);
            templates.insert(template.id, template);
        }
        for rarity in Rarity::ALL {
            if !by_rarity.contains_key(&rarity) {
                return Err(CoreError::Validation(format!(
                    "Catalog has no {} templates",
                    rarity.as_str()
                )));
            }
        }
        for ids in by_rarity.values_mut() {
            ids.sort_unstable();
        }

        let mut jobs = HashMap::with_capacity(doc.jobs.len());
        for job in doc.jobs {
            if !doc.regions.iter().any(|r| r.id == job.region_id) {
                return Err(CoreError::Validation(format!(
                    "Job {} references unknown region {}",
                    job.id, job.region_id
                )));
            }
            if job.stamina_cost <= 0 {
                return Err(CoreError::Validation(format!(
                    "Job {} must cost at least one stamina",
                    job.id
                )));
            }
            jobs.insert(job.id, job);
        }

        let mut regions = doc.regions;
        regions.sort_by_key(|r| r.id);

        Ok(Self {
            version,
            templates,
            by_rarity,
            regions,
            jobs,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn template(&self, id: DbId) -> Option<&IdolTemplate> {
        self.templates.get(&id)
    }

    /// Template ids of one rarity, sorted ascending. Never empty.
    pub fn template_ids(&self, rarity: Rarity) -> &[DbId] {
        self.by_rarity.get(&rarity).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn templates(&self) -> impl Iterator<Item = &IdolTemplate> {
        self.templates.values()
    }

    pub fn regions(&self) -> &[WorkRegion] {
        &self.regions
    }

    pub fn region(&self, id: DbId) -> Option<&WorkRegion> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn job(&self, id: DbId) -> Option<&WorkJob> {
        self.jobs.get(&id)
    }

    /// Jobs of one region ordered by id.
    pub fn jobs_in_region(&self, region_id: DbId) -> Vec<&WorkJob> {
        let mut jobs: Vec<&WorkJob> = self
            .jobs
            .values()
            .filter(|j| j.region_id == region_id)
            .collect();
        jobs.sort_by_key(|j| j.id);
        jobs
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Holder of the current catalog snapshot.
///
/// Thread-safe; designed to be wrapped in `Arc` and shared across handlers.
pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new(initial: CatalogSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in `next` if it is newer than the current snapshot.
    ///
    /// Returns `true` when the swap happened.
    pub fn install(&self, next: CatalogSnapshot) -> bool {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        if next.version <= guard.version {
            return false;
        }
        *guard = Arc::new(next);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
