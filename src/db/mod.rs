use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{TokenId, UserId};
use crate::entities::{
    dependencias, justificaciones, monitorias, periodos_academicos, personas, prelude::*,
    tipos_justificacion, tipos_monitoria,
};

pub mod migrator;
pub mod repositories;

pub use repositories::catalog::{
    CatalogInput, PeriodoInput, PersonaInput, TipoJustificacionInput,
};
pub use repositories::justificacion::JustificacionInput;
pub use repositories::monitoria::MonitoriaInput;
pub use repositories::token::{IssuedToken, ResolvedToken};
pub use repositories::user::{NewUser, User};

/// Demo accounts inserted by the `seed` command.
pub const DEMO_USERS: &[(&str, &str)] = &[
    ("Administrador", "admin@ejemplo.com"),
    ("Usuario Normal", "usuario@ejemplo.com"),
    ("Usuario Prueba", "prueba@ejemplo.com"),
];

pub const DEMO_PASSWORD: &str = "password123";

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    fn catalog_repo(&self) -> repositories::catalog::CatalogRepository {
        repositories::catalog::CatalogRepository::new(self.conn.clone())
    }

    fn monitoria_repo(&self) -> repositories::monitoria::MonitoriaRepository {
        repositories::monitoria::MonitoriaRepository::new(self.conn.clone())
    }

    fn justificacion_repo(&self) -> repositories::justificacion::JustificacionRepository {
        repositories::justificacion::JustificacionRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_email_with_password(email).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.user_repo().create(new_user).await
    }

    pub async fn create_user_with_token(
        &self,
        new_user: NewUser,
        token_name: &str,
    ) -> Result<(User, IssuedToken)> {
        self.user_repo().create_with_token(new_user, token_name).await
    }

    /// Insert the demo accounts that are not present yet. Returns how many
    /// were created.
    pub async fn seed_demo_users(&self, security: &SecurityConfig) -> Result<usize> {
        let mut created = 0;

        for (name, email) in DEMO_USERS {
            if self.email_exists(email).await? {
                continue;
            }

            let password_hash = repositories::user::hash_password_blocking(
                DEMO_PASSWORD.to_string(),
                security.clone(),
            )
            .await?;

            self.create_user(NewUser {
                name: (*name).to_string(),
                email: (*email).to_string(),
                password_hash,
                email_verified: true,
            })
            .await?;

            info!(email = %email, "Seeded demo user");
            created += 1;
        }

        Ok(created)
    }

    // ========================================================================
    // Access tokens
    // ========================================================================

    pub async fn resolve_token(&self, presented: &str) -> Result<Option<ResolvedToken>> {
        self.token_repo().resolve(presented).await
    }

    pub async fn touch_token(&self, token_id: TokenId) -> Result<()> {
        self.token_repo().touch(token_id).await
    }

    pub async fn issue_token(&self, user_id: UserId, name: &str) -> Result<IssuedToken> {
        self.token_repo().issue(user_id, name).await
    }

    pub async fn revoke_token(&self, token_id: TokenId) -> Result<bool> {
        self.token_repo().revoke(token_id).await
    }

    pub async fn revoke_all_tokens(&self, user_id: UserId) -> Result<u64> {
        self.token_repo().revoke_all(user_id).await
    }

    pub async fn replace_all_tokens(&self, user_id: UserId, name: &str) -> Result<IssuedToken> {
        self.token_repo().replace_all(user_id, name).await
    }

    pub async fn rotate_token(
        &self,
        user_id: UserId,
        token_id: TokenId,
        name: &str,
    ) -> Result<Option<IssuedToken>> {
        self.token_repo().rotate(user_id, token_id, name).await
    }

    pub async fn count_tokens(&self, user_id: UserId) -> Result<u64> {
        self.token_repo().count_for_user(user_id).await
    }

    // ========================================================================
    // Personas
    // ========================================================================

    pub async fn list_personas(&self) -> Result<Vec<personas::Model>> {
        self.catalog_repo().list_personas().await
    }

    pub async fn get_persona(&self, id: i32) -> Result<Option<personas::Model>> {
        self.catalog_repo().get::<Personas>(id).await
    }

    pub async fn persona_exists(&self, id: i32) -> Result<bool> {
        self.catalog_repo().exists::<Personas>(id).await
    }

    pub async fn numero_documento_taken(
        &self,
        numero_documento: &str,
        except_id: Option<i32>,
    ) -> Result<bool> {
        self.catalog_repo()
            .numero_documento_taken(numero_documento, except_id)
            .await
    }

    pub async fn create_persona(&self, input: PersonaInput) -> Result<personas::Model> {
        self.catalog_repo().create_persona(input).await
    }

    pub async fn update_persona(
        &self,
        id: i32,
        input: PersonaInput,
    ) -> Result<Option<personas::Model>> {
        self.catalog_repo().update_persona(id, input).await
    }

    pub async fn delete_persona(&self, id: i32) -> Result<bool> {
        self.catalog_repo().delete::<Personas>(id).await
    }

    // ========================================================================
    // Dependencias
    // ========================================================================

    pub async fn list_dependencias(&self) -> Result<Vec<dependencias::Model>> {
        self.catalog_repo().list::<Dependencias>().await
    }

    pub async fn get_dependencia(&self, id: i32) -> Result<Option<dependencias::Model>> {
        self.catalog_repo().get::<Dependencias>(id).await
    }

    pub async fn dependencia_exists(&self, id: i32) -> Result<bool> {
        self.catalog_repo().exists::<Dependencias>(id).await
    }

    pub async fn create_dependencia(&self, input: CatalogInput) -> Result<dependencias::Model> {
        self.catalog_repo().create_dependencia(input).await
    }

    pub async fn update_dependencia(
        &self,
        id: i32,
        input: CatalogInput,
    ) -> Result<Option<dependencias::Model>> {
        self.catalog_repo().update_dependencia(id, input).await
    }

    pub async fn delete_dependencia(&self, id: i32) -> Result<bool> {
        self.catalog_repo().delete::<Dependencias>(id).await
    }

    // ========================================================================
    // Tipos de monitoria
    // ========================================================================

    pub async fn list_tipos_monitoria(&self) -> Result<Vec<tipos_monitoria::Model>> {
        self.catalog_repo().list::<TiposMonitoria>().await
    }

    pub async fn get_tipo_monitoria(&self, id: i32) -> Result<Option<tipos_monitoria::Model>> {
        self.catalog_repo().get::<TiposMonitoria>(id).await
    }

    pub async fn tipo_monitoria_exists(&self, id: i32) -> Result<bool> {
        self.catalog_repo().exists::<TiposMonitoria>(id).await
    }

    pub async fn create_tipo_monitoria(
        &self,
        input: CatalogInput,
    ) -> Result<tipos_monitoria::Model> {
        self.catalog_repo().create_tipo_monitoria(input).await
    }

    pub async fn update_tipo_monitoria(
        &self,
        id: i32,
        input: CatalogInput,
    ) -> Result<Option<tipos_monitoria::Model>> {
        self.catalog_repo().update_tipo_monitoria(id, input).await
    }

    pub async fn delete_tipo_monitoria(&self, id: i32) -> Result<bool> {
        self.catalog_repo().delete::<TiposMonitoria>(id).await
    }

    // ========================================================================
    // Periodos academicos
    // ========================================================================

    pub async fn list_periodos(&self) -> Result<Vec<periodos_academicos::Model>> {
        self.catalog_repo().list_periodos().await
    }

    pub async fn get_periodo(&self, id: i32) -> Result<Option<periodos_academicos::Model>> {
        self.catalog_repo().get::<PeriodosAcademicos>(id).await
    }

    pub async fn periodo_exists(&self, id: i32) -> Result<bool> {
        self.catalog_repo().exists::<PeriodosAcademicos>(id).await
    }

    pub async fn create_periodo(&self, input: PeriodoInput) -> Result<periodos_academicos::Model> {
        self.catalog_repo().create_periodo(input).await
    }

    pub async fn update_periodo(
        &self,
        id: i32,
        input: PeriodoInput,
    ) -> Result<Option<periodos_academicos::Model>> {
        self.catalog_repo().update_periodo(id, input).await
    }

    pub async fn delete_periodo(&self, id: i32) -> Result<bool> {
        self.catalog_repo().delete::<PeriodosAcademicos>(id).await
    }

    // ========================================================================
    // Tipos de justificacion
    // ========================================================================

    pub async fn list_tipos_justificacion(&self) -> Result<Vec<tipos_justificacion::Model>> {
        self.catalog_repo().list::<TiposJustificacion>().await
    }

    pub async fn get_tipo_justificacion(
        &self,
        id: i32,
    ) -> Result<Option<tipos_justificacion::Model>> {
        self.catalog_repo().get::<TiposJustificacion>(id).await
    }

    pub async fn tipo_justificacion_exists(&self, id: i32) -> Result<bool> {
        self.catalog_repo().exists::<TiposJustificacion>(id).await
    }

    pub async fn tipo_justificacion_nombre_taken(
        &self,
        nombre: &str,
        except_id: Option<i32>,
    ) -> Result<bool> {
        self.catalog_repo()
            .tipo_justificacion_nombre_taken(nombre, except_id)
            .await
    }

    pub async fn create_tipo_justificacion(
        &self,
        input: TipoJustificacionInput,
    ) -> Result<tipos_justificacion::Model> {
        self.catalog_repo().create_tipo_justificacion(input).await
    }

    pub async fn update_tipo_justificacion(
        &self,
        id: i32,
        input: TipoJustificacionInput,
    ) -> Result<Option<tipos_justificacion::Model>> {
        self.catalog_repo().update_tipo_justificacion(id, input).await
    }

    pub async fn delete_tipo_justificacion(&self, id: i32) -> Result<bool> {
        self.catalog_repo().delete::<TiposJustificacion>(id).await
    }

    // ========================================================================
    // Monitorias
    // ========================================================================

    pub async fn list_monitorias(&self) -> Result<Vec<monitorias::Model>> {
        self.monitoria_repo().list().await
    }

    pub async fn get_monitoria(&self, id: &str) -> Result<Option<monitorias::Model>> {
        self.monitoria_repo().get(id).await
    }

    pub async fn monitoria_exists(&self, id: &str) -> Result<bool> {
        self.monitoria_repo().exists(id).await
    }

    pub async fn create_monitoria(&self, input: MonitoriaInput) -> Result<monitorias::Model> {
        self.monitoria_repo().create(input).await
    }

    pub async fn update_monitoria(
        &self,
        id: &str,
        input: MonitoriaInput,
    ) -> Result<Option<monitorias::Model>> {
        self.monitoria_repo().update(id, input).await
    }

    pub async fn delete_monitoria(&self, id: &str) -> Result<bool> {
        self.monitoria_repo().delete(id).await
    }

    // ========================================================================
    // Justificaciones
    // ========================================================================

    pub async fn list_justificaciones(&self) -> Result<Vec<justificaciones::Model>> {
        self.justificacion_repo().list().await
    }

    pub async fn list_justificaciones_for_monitoria(
        &self,
        monitoria_id: &str,
    ) -> Result<Vec<justificaciones::Model>> {
        self.justificacion_repo()
            .list_for_monitoria(monitoria_id)
            .await
    }

    pub async fn get_justificacion(&self, id: &str) -> Result<Option<justificaciones::Model>> {
        self.justificacion_repo().get(id).await
    }

    pub async fn create_justificacion(
        &self,
        input: JustificacionInput,
    ) -> Result<justificaciones::Model> {
        self.justificacion_repo().create(input).await
    }

    pub async fn delete_justificacion(&self, id: &str) -> Result<bool> {
        self.justificacion_repo().delete(id).await
    }
}
