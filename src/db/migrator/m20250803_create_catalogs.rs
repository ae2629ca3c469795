use crate::entities::prelude::*;
use crate::entities::tipos_justificacion;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Justification types every installation starts with.
const TIPOS_JUSTIFICACION: &[(&str, &str)] = &[
    ("Enfermedad", "Justificación por enfermedad"),
    ("Compromiso personal", "Justificación por compromiso personal"),
    ("Problemas técnicos", "Justificación por problemas técnicos"),
    ("Otro", "Otra justificación"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        manager
            .create_table(
                schema
                    .create_table_from_entity(Dependencias)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(TiposMonitoria)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(PeriodosAcademicos)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(TiposJustificacion)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(TiposJustificacion)
            .columns([
                tipos_justificacion::Column::Nombre,
                tipos_justificacion::Column::Descripcion,
                tipos_justificacion::Column::CreatedAt,
                tipos_justificacion::Column::UpdatedAt,
            ])
            .to_owned();

        for (nombre, descripcion) in TIPOS_JUSTIFICACION {
            insert.values_panic([
                (*nombre).into(),
                (*descripcion).into(),
                now.clone().into(),
                now.clone().into(),
            ]);
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TiposJustificacion).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PeriodosAcademicos).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TiposMonitoria).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Dependencias).to_owned())
            .await?;

        Ok(())
    }
}
