use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// The two roles a name can log in as. A name is bound to one role forever;
/// the wire values match the stored TEXT values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Role {
    #[serde(rename = "GM")]
    #[sqlx(rename = "GM")]
    Gm,
    #[serde(rename = "Giocatore")]
    #[sqlx(rename = "Giocatore")]
    Player,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    #[serde(default)]
    pub name: String,
    pub role: Option<Role>,
}
