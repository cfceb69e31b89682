//! Repository for the static catalog tables.

use idolsim_core::catalog::{CatalogDocument, IdolTemplate, WorkJob, WorkRegion};
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::catalog::{JobRow, RegionRow, TemplateRow};

pub struct CatalogRepo;

impl CatalogRepo {
    /// Read templates, regions and jobs into one catalog document.
    pub async fn load_document(pool: &PgPool) -> Result<CatalogDocument, DbError> {
        let templates = sqlx::query_as::<_, TemplateRow>(
            "SELECT id, name, rarity, idol_type, vocal, dance, visual
             FROM idol_templates ORDER BY id",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(IdolTemplate::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        let regions = sqlx::query_as::<_, RegionRow>(
            "SELECT id, name, unlock_level FROM work_regions ORDER BY id",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(WorkRegion::from)
        .collect();

        let jobs = sqlx::query_as::<_, JobRow>(
            "SELECT id, region_id, name, stamina_cost, job_type, base_money, base_exp,
                    event_id, base_event_points
             FROM work_jobs ORDER BY region_id, id",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(WorkJob::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(CatalogDocument {
            templates,
            regions,
            jobs,
        })
    }

    /// Insert or update every entry of a synced catalog in one transaction.
    ///
    /// Rows absent from the document are kept: owned idols still reference
    /// their templates.
    pub async fn upsert_document(pool: &PgPool, doc: &CatalogDocument) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        for t in &doc.templates {
            sqlx::query(
                "INSERT INTO idol_templates (id, name, rarity, idol_type, vocal, dance, visual)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    rarity = EXCLUDED.rarity,
                    idol_type = EXCLUDED.idol_type,
                    vocal = EXCLUDED.vocal,
                    dance = EXCLUDED.dance,
                    visual = EXCLUDED.visual,
                    updated_at = NOW()",
            )
            .bind(t.id)
            .bind(&t.name)
            .bind(t.rarity.as_str())
            .bind(t.idol_type.as_str())
            .bind(t.vocal)
            .bind(t.dance)
            .bind(t.visual)
            .execute(&mut *tx)
            .await?;
        }

        for r in &doc.regions {
            sqlx::query(
                "INSERT INTO work_regions (id, name, unlock_level) VALUES ($1, $2, $3)
                 ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    unlock_level = EXCLUDED.unlock_level",
            )
            .bind(r.id)
            .bind(&r.name)
            .bind(r.unlock_level)
            .execute(&mut *tx)
            .await?;
        }

        for j in &doc.jobs {
            sqlx::query(
                "INSERT INTO work_jobs
                    (id, region_id, name, stamina_cost, job_type, base_money, base_exp,
                     event_id, base_event_points)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 ON CONFLICT (id) DO UPDATE SET
                    region_id = EXCLUDED.region_id,
                    name = EXCLUDED.name,
                    stamina_cost = EXCLUDED.stamina_cost,
                    job_type = EXCLUDED.job_type,
                    base_money = EXCLUDED.base_money,
                    base_exp = EXCLUDED.base_exp,
                    event_id = EXCLUDED.event_id,
                    base_event_points = EXCLUDED.base_event_points",
            )
            .bind(j.id)
            .bind(j.region_id)
            .bind(&j.name)
            .bind(j.stamina_cost)
            .bind(j.job_type.as_str())
            .bind(j.base_money)
            .bind(j.base_exp)
            .bind(j.event_id)
            .bind(j.base_event_points)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
