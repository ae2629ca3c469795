use sea_orm_migration::prelude::*;

mod m20250801_create_users;
mod m20250802_create_personas;
mod m20250803_create_catalogs;
mod m20250803_create_monitorias;
mod m20250804_create_justificaciones;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_create_users::Migration),
            Box::new(m20250802_create_personas::Migration),
            Box::new(m20250803_create_catalogs::Migration),
            Box::new(m20250803_create_monitorias::Migration),
            Box::new(m20250804_create_justificaciones::Migration),
        ]
    }
}
