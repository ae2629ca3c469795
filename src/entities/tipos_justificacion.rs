use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "tipos_justificacion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub nombre: String,
    pub descripcion: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::justificaciones::Entity")]
    Justificaciones,
}

impl Related<super::justificaciones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Justificaciones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
