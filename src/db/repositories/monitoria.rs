use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::{monitorias, prelude::*};

/// Validated monitoria fields. Dates are already normalized to
/// `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone)]
pub struct MonitoriaInput {
    pub persona_id: i32,
    pub tipo_monitoria_id: i32,
    pub dependencia_id: i32,
    pub periodo_academico_id: i32,
    pub descripcion: Option<String>,
    pub inicio: String,
    pub fin: String,
    pub horas_asignadas: i32,
    pub estado: String,
}

pub struct MonitoriaRepository {
    conn: DatabaseConnection,
}

impl MonitoriaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<monitorias::Model>> {
        Monitorias::find()
            .order_by_desc(monitorias::Column::Inicio)
            .order_by_asc(monitorias::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list monitorias")
    }

    pub async fn get(&self, id: &str) -> Result<Option<monitorias::Model>> {
        Monitorias::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query monitoria")
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    pub async fn create(&self, input: MonitoriaInput) -> Result<monitorias::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = monitorias::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..monitoria_fields(input)
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert monitoria")
    }

    pub async fn update(
        &self,
        id: &str,
        input: MonitoriaInput,
    ) -> Result<Option<monitorias::Model>> {
        if !self.exists(id).await? {
            return Ok(None);
        }

        let active = monitorias::ActiveModel {
            id: Set(id.to_string()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..monitoria_fields(input)
        };

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update monitoria")?;
        Ok(Some(model))
    }

    /// Delete a monitoria and, through the cascade, its justificaciones.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Monitorias::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete monitoria")?;
        Ok(result.rows_affected > 0)
    }
}

fn monitoria_fields(input: MonitoriaInput) -> monitorias::ActiveModel {
    monitorias::ActiveModel {
        persona_id: Set(input.persona_id),
        tipo_monitoria_id: Set(input.tipo_monitoria_id),
        dependencia_id: Set(input.dependencia_id),
        periodo_academico_id: Set(input.periodo_academico_id),
        descripcion: Set(input.descripcion),
        inicio: Set(input.inicio),
        fin: Set(input.fin),
        horas_asignadas: Set(input.horas_asignadas),
        estado: Set(input.estado),
        ..Default::default()
    }
}
