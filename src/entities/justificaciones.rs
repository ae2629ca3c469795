use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "justificaciones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub monitoria_id: String,
    #[sea_orm(indexed)]
    pub persona_id: i32,
    #[sea_orm(indexed)]
    pub periodo_academico_id: i32,
    #[sea_orm(indexed)]
    pub tipo_justificacion_id: i32,
    #[sea_orm(column_type = "Text")]
    pub descripcion: String,
    pub fecha: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::monitorias::Entity",
        from = "Column::MonitoriaId",
        to = "super::monitorias::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Monitorias,
    #[sea_orm(
        belongs_to = "super::personas::Entity",
        from = "Column::PersonaId",
        to = "super::personas::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Personas,
    #[sea_orm(
        belongs_to = "super::periodos_academicos::Entity",
        from = "Column::PeriodoAcademicoId",
        to = "super::periodos_academicos::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PeriodosAcademicos,
    #[sea_orm(
        belongs_to = "super::tipos_justificacion::Entity",
        from = "Column::TipoJustificacionId",
        to = "super::tipos_justificacion::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    TiposJustificacion,
}

impl Related<super::monitorias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Monitorias.def()
    }
}

impl Related<super::tipos_justificacion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TiposJustificacion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
