pub mod prelude;

pub mod dependencias;
pub mod justificaciones;
pub mod monitorias;
pub mod periodos_academicos;
pub mod personal_access_tokens;
pub mod personas;
pub mod tipos_justificacion;
pub mod tipos_monitoria;
pub mod users;
