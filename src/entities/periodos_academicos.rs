use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "periodos_academicos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nombre: String,
    pub fecha_inicio: String,
    pub fecha_fin: String,
    pub estado: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::monitorias::Entity")]
    Monitorias,
}

impl Related<super::monitorias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Monitorias.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
