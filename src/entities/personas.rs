use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "personas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tipo_documento: String,
    #[sea_orm(unique)]
    pub numero_documento: Option<String>,
    #[serde(rename = "nombreA")]
    pub nombre_a: Option<String>,
    #[serde(rename = "nombreB")]
    pub nombre_b: Option<String>,
    #[serde(rename = "apellidoA")]
    pub apellido_a: Option<String>,
    #[serde(rename = "apellidoB")]
    pub apellido_b: Option<String>,
    pub correo_electronico: Option<String>,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub direccion: Option<String>,
    /// `1` active, `0` inactive
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
