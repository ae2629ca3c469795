pub mod catalog;
pub mod justificacion;
pub mod monitoria;
pub mod token;
pub mod user;
