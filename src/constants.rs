pub mod auth {

    /// Label stored on every token issued by register, login and refresh.
    pub const TOKEN_NAME: &str = "auth_token";

    pub const TOKEN_TYPE: &str = "Bearer";

    /// Random bytes in a token secret (hex encoded to twice this length).
    pub const TOKEN_SECRET_BYTES: usize = 32;
}

pub mod estados {

    pub const ACTIVO: &str = "activo";

    pub const INACTIVO: &str = "inactivo";

    pub const ALL: &[&str] = &[ACTIVO, INACTIVO];

    /// Persona rows use the single-character flag from the legacy schema.
    pub const PERSONA_ALL: &[&str] = &["1", "0"];
}

pub mod limits {

    pub const MAX_NAME_LENGTH: usize = 255;

    pub const MAX_EMAIL_LENGTH: usize = 255;

    pub const MAX_DESCRIPCION_LENGTH: usize = 255;
}
