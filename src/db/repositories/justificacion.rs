use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{justificaciones, prelude::*};

#[derive(Debug, Clone)]
pub struct JustificacionInput {
    pub monitoria_id: String,
    pub persona_id: i32,
    pub periodo_academico_id: i32,
    pub tipo_justificacion_id: i32,
    pub descripcion: String,
    pub fecha: Option<String>,
}

pub struct JustificacionRepository {
    conn: DatabaseConnection,
}

impl JustificacionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<justificaciones::Model>> {
        Justificaciones::find()
            .order_by_desc(justificaciones::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list justificaciones")
    }

    pub async fn list_for_monitoria(&self, monitoria_id: &str) -> Result<Vec<justificaciones::Model>> {
        Justificaciones::find()
            .filter(justificaciones::Column::MonitoriaId.eq(monitoria_id))
            .order_by_desc(justificaciones::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list justificaciones for monitoria")
    }

    pub async fn get(&self, id: &str) -> Result<Option<justificaciones::Model>> {
        Justificaciones::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query justificacion")
    }

    pub async fn create(&self, input: JustificacionInput) -> Result<justificaciones::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        justificaciones::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            monitoria_id: Set(input.monitoria_id),
            persona_id: Set(input.persona_id),
            periodo_academico_id: Set(input.periodo_academico_id),
            tipo_justificacion_id: Set(input.tipo_justificacion_id),
            descripcion: Set(input.descripcion),
            fecha: Set(input.fecha),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert justificacion")
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Justificaciones::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete justificacion")?;
        Ok(result.rows_affected > 0)
    }
}
