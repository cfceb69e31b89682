//! Catalog rows and their conversion into core catalog entities.

use idolsim_core::catalog::{IdolTemplate, WorkJob, WorkRegion};
use idolsim_core::error::CoreError;
use idolsim_core::types::DbId;
use sqlx::FromRow;

/// A row from the `idol_templates` table.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateRow {
    pub id: DbId,
    pub name: String,
    pub rarity: String,
    pub idol_type: String,
    pub vocal: i32,
    pub dance: i32,
    pub visual: i32,
}

impl TryFrom<TemplateRow> for IdolTemplate {
    type Error = CoreError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        Ok(IdolTemplate {
            id: row.id,
            name: row.name,
            rarity: row.rarity.parse()?,
            idol_type: row.idol_type.parse()?,
            vocal: row.vocal,
            dance: row.dance,
            visual: row.visual,
        })
    }
}

/// A row from the `work_regions` table.
#[derive(Debug, Clone, FromRow)]
pub struct RegionRow {
    pub id: DbId,
    pub name: String,
    pub unlock_level: i32,
}

impl From<RegionRow> for WorkRegion {
    fn from(row: RegionRow) -> Self {
        WorkRegion {
            id: row.id,
            name: row.name,
            unlock_level: row.unlock_level,
        }
    }
}

/// A row from the `work_jobs` table.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: DbId,
    pub region_id: DbId,
    pub name: String,
    pub stamina_cost: i32,
    pub job_type: String,
    pub base_money: i64,
    pub base_exp: i64,
    pub event_id: Option<DbId>,
    pub base_event_points: i64,
}

impl TryFrom<JobRow> for WorkJob {
    type Error = CoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(WorkJob {
            id: row.id,
            region_id: row.region_id,
            name: row.name,
            stamina_cost: row.stamina_cost,
            job_type: row.job_type.parse()?,
            base_money: row.base_money,
            base_exp: row.base_exp,
            event_id: row.event_id,
            base_event_points: row.base_event_points,
        })
    }
}
