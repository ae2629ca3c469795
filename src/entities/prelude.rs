pub use super::dependencias::Entity as Dependencias;
pub use super::justificaciones::Entity as Justificaciones;
pub use super::monitorias::Entity as Monitorias;
pub use super::periodos_academicos::Entity as PeriodosAcademicos;
pub use super::personal_access_tokens::Entity as PersonalAccessTokens;
pub use super::personas::Entity as Personas;
pub use super::tipos_justificacion::Entity as TiposJustificacion;
pub use super::tipos_monitoria::Entity as TiposMonitoria;
pub use super::users::Entity as Users;
