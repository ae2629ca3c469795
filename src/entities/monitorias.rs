use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "monitorias")]
pub struct Model {
    /// UUID v4, generated on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub persona_id: i32,
    #[sea_orm(indexed)]
    pub tipo_monitoria_id: i32,
    #[sea_orm(indexed)]
    pub dependencia_id: i32,
    #[sea_orm(indexed)]
    pub periodo_academico_id: i32,
    pub descripcion: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`
    pub inicio: String,
    pub fin: String,
    pub horas_asignadas: i32,
    /// `activo` or `inactivo`
    pub estado: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::personas::Entity",
        from = "Column::PersonaId",
        to = "super::personas::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Personas,
    #[sea_orm(
        belongs_to = "super::tipos_monitoria::Entity",
        from = "Column::TipoMonitoriaId",
        to = "super::tipos_monitoria::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    TiposMonitoria,
    #[sea_orm(
        belongs_to = "super::dependencias::Entity",
        from = "Column::DependenciaId",
        to = "super::dependencias::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Dependencias,
    #[sea_orm(
        belongs_to = "super::periodos_academicos::Entity",
        from = "Column::PeriodoAcademicoId",
        to = "super::periodos_academicos::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PeriodosAcademicos,
    #[sea_orm(has_many = "super::justificaciones::Entity")]
    Justificaciones,
}

impl Related<super::personas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Personas.def()
    }
}

impl Related<super::tipos_monitoria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TiposMonitoria.def()
    }
}

impl Related<super::dependencias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dependencias.def()
    }
}

impl Related<super::periodos_academicos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PeriodosAcademicos.def()
    }
}

impl Related<super::justificaciones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Justificaciones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
