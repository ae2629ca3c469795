//! Reference tables: personas, dependencias, tipos de monitoria,
//! periodos academicos and tipos de justificacion.

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PrimaryKeyTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{
    dependencias, periodos_academicos, personas, prelude::*, tipos_justificacion, tipos_monitoria,
};

#[derive(Debug, Clone, Default)]
pub struct PersonaInput {
    pub tipo_documento: String,
    pub numero_documento: Option<String>,
    pub nombre_a: Option<String>,
    pub nombre_b: Option<String>,
    pub apellido_a: Option<String>,
    pub apellido_b: Option<String>,
    pub correo_electronico: Option<String>,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub direccion: Option<String>,
    pub estado: String,
}

/// Shared shape of dependencias and tipos de monitoria.
#[derive(Debug, Clone, Default)]
pub struct CatalogInput {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub estado: String,
}

#[derive(Debug, Clone, Default)]
pub struct PeriodoInput {
    pub nombre: String,
    pub fecha_inicio: String,
    pub fecha_fin: String,
    pub estado: String,
}

#[derive(Debug, Clone, Default)]
pub struct TipoJustificacionInput {
    pub nombre: String,
    pub descripcion: Option<String>,
}

/// Repository for the integer-keyed reference tables
pub struct CatalogRepository {
    conn: DatabaseConnection,
}

impl CatalogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Generic Operations
    // ========================================================================

    pub async fn list<E>(&self) -> Result<Vec<E::Model>>
    where
        E: EntityTrait,
    {
        E::find()
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to list {}", E::default().table_name()))
    }

    pub async fn get<E>(&self, id: i32) -> Result<Option<E::Model>>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        E::find_by_id(id)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query {} {id}", E::default().table_name()))
    }

    pub async fn exists<E>(&self, id: i32) -> Result<bool>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        Ok(self.get::<E>(id).await?.is_some())
    }

    /// Delete a row; dependent rows go with it through `ON DELETE CASCADE`.
    pub async fn delete<E>(&self, id: i32) -> Result<bool>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        let result = E::delete_by_id(id)
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete {} {id}", E::default().table_name()))?;
        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Personas
    // ========================================================================

    pub async fn list_personas(&self) -> Result<Vec<personas::Model>> {
        Ok(Personas::find()
            .order_by_asc(personas::Column::ApellidoA)
            .order_by_asc(personas::Column::Id)
            .all(&self.conn)
            .await?)
    }

    /// Whether another persona already holds `numero_documento`.
    pub async fn numero_documento_taken(
        &self,
        numero_documento: &str,
        except_id: Option<i32>,
    ) -> Result<bool> {
        let mut query =
            Personas::find().filter(personas::Column::NumeroDocumento.eq(numero_documento));
        if let Some(id) = except_id {
            query = query.filter(personas::Column::Id.ne(id));
        }
        Ok(query.one(&self.conn).await?.is_some())
    }

    pub async fn create_persona(&self, input: PersonaInput) -> Result<personas::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = personas::ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..persona_fields(input)
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert persona")
    }

    pub async fn update_persona(
        &self,
        id: i32,
        input: PersonaInput,
    ) -> Result<Option<personas::Model>> {
        if !self.exists::<Personas>(id).await? {
            return Ok(None);
        }

        let active = personas::ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..persona_fields(input)
        };

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update persona")?;
        Ok(Some(model))
    }

    // ========================================================================
    // Dependencias
    // ========================================================================

    pub async fn create_dependencia(&self, input: CatalogInput) -> Result<dependencias::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        dependencias::ActiveModel {
            nombre: Set(input.nombre),
            descripcion: Set(input.descripcion),
            estado: Set(input.estado),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert dependencia")
    }

    pub async fn update_dependencia(
        &self,
        id: i32,
        input: CatalogInput,
    ) -> Result<Option<dependencias::Model>> {
        if !self.exists::<Dependencias>(id).await? {
            return Ok(None);
        }

        let model = dependencias::ActiveModel {
            id: Set(id),
            nombre: Set(input.nombre),
            descripcion: Set(input.descripcion),
            estado: Set(input.estado),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .update(&self.conn)
        .await
        .context("Failed to update dependencia")?;
        Ok(Some(model))
    }

    // ========================================================================
    // Tipos de monitoria
    // ========================================================================

    pub async fn create_tipo_monitoria(
        &self,
        input: CatalogInput,
    ) -> Result<tipos_monitoria::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        tipos_monitoria::ActiveModel {
            nombre: Set(input.nombre),
            descripcion: Set(input.descripcion),
            estado: Set(input.estado),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert tipo de monitoria")
    }

    pub async fn update_tipo_monitoria(
        &self,
        id: i32,
        input: CatalogInput,
    ) -> Result<Option<tipos_monitoria::Model>> {
        if !self.exists::<TiposMonitoria>(id).await? {
            return Ok(None);
        }

        let model = tipos_monitoria::ActiveModel {
            id: Set(id),
            nombre: Set(input.nombre),
            descripcion: Set(input.descripcion),
            estado: Set(input.estado),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .update(&self.conn)
        .await
        .context("Failed to update tipo de monitoria")?;
        Ok(Some(model))
    }

    // ========================================================================
    // Periodos academicos
    // ========================================================================

    pub async fn list_periodos(&self) -> Result<Vec<periodos_academicos::Model>> {
        Ok(PeriodosAcademicos::find()
            .order_by_desc(periodos_academicos::Column::FechaInicio)
            .all(&self.conn)
            .await?)
    }

    pub async fn create_periodo(&self, input: PeriodoInput) -> Result<periodos_academicos::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        periodos_academicos::ActiveModel {
            nombre: Set(input.nombre),
            fecha_inicio: Set(input.fecha_inicio),
            fecha_fin: Set(input.fecha_fin),
            estado: Set(input.estado),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert periodo academico")
    }

    pub async fn update_periodo(
        &self,
        id: i32,
        input: PeriodoInput,
    ) -> Result<Option<periodos_academicos::Model>> {
        if !self.exists::<PeriodosAcademicos>(id).await? {
            return Ok(None);
        }

        let model = periodos_academicos::ActiveModel {
            id: Set(id),
            nombre: Set(input.nombre),
            fecha_inicio: Set(input.fecha_inicio),
            fecha_fin: Set(input.fecha_fin),
            estado: Set(input.estado),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .update(&self.conn)
        .await
        .context("Failed to update periodo academico")?;
        Ok(Some(model))
    }

    // ========================================================================
    // Tipos de justificacion
    // ========================================================================

    pub async fn tipo_justificacion_nombre_taken(
        &self,
        nombre: &str,
        except_id: Option<i32>,
    ) -> Result<bool> {
        let mut query =
            TiposJustificacion::find().filter(tipos_justificacion::Column::Nombre.eq(nombre));
        if let Some(id) = except_id {
            query = query.filter(tipos_justificacion::Column::Id.ne(id));
        }
        Ok(query.one(&self.conn).await?.is_some())
    }

    pub async fn create_tipo_justificacion(
        &self,
        input: TipoJustificacionInput,
    ) -> Result<tipos_justificacion::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        tipos_justificacion::ActiveModel {
            nombre: Set(input.nombre),
            descripcion: Set(input.descripcion),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert tipo de justificacion")
    }

    pub async fn update_tipo_justificacion(
        &self,
        id: i32,
        input: TipoJustificacionInput,
    ) -> Result<Option<tipos_justificacion::Model>> {
        if !self.exists::<TiposJustificacion>(id).await? {
            return Ok(None);
        }

        let model = tipos_justificacion::ActiveModel {
            id: Set(id),
            nombre: Set(input.nombre),
            descripcion: Set(input.descripcion),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .update(&self.conn)
        .await
        .context("Failed to update tipo de justificacion")?;
        Ok(Some(model))
    }
}

fn persona_fields(input: PersonaInput) -> personas::ActiveModel {
    personas::ActiveModel {
        tipo_documento: Set(input.tipo_documento),
        numero_documento: Set(input.numero_documento),
        nombre_a: Set(input.nombre_a),
        nombre_b: Set(input.nombre_b),
        apellido_a: Set(input.apellido_a),
        apellido_b: Set(input.apellido_b),
        correo_electronico: Set(input.correo_electronico),
        telefono: Set(input.telefono),
        fecha_nacimiento: Set(input.fecha_nacimiento),
        direccion: Set(input.direccion),
        estado: Set(input.estado),
        ..Default::default()
    }
}
