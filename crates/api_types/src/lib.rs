//! Wire types shared by the HTTP server and its clients.
//!
//! Field names are the league's public ones (`id_club`, `nombre`, `dorsal`,
//! ...). Alternative spellings accepted from older clients are folded into
//! the canonical field here, so nothing past this crate ever sees them.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Accept an amount written either as a JSON string or as a JSON number.
///
/// The value is handed on as text; parsing it into money is the engine's job
/// so that a malformed amount is reported like any other invalid field.
pub fn amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    }))
}

/// Accept an integer written either as a JSON number or as a numeric string.
///
/// A string that is not a number is passed as `Some(i64::MIN)` so the
/// engine rejects it with its usual range message.
pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(
        Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
            Raw::Int(n) => n,
            Raw::Text(text) => text.trim().parse().unwrap_or(i64::MIN),
        }),
    )
}

/// Tell an absent field (`None`) apart from an explicit `null` (`Some(None)`).
///
/// Use together with `#[serde(default)]`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub mod club {
    use super::*;

    use crate::{coach::CoachView, player::PlayerView};

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ClubNew {
        #[serde(alias = "code")]
        pub id_club: Option<String>,
        pub nombre: Option<String>,
        #[serde(default, deserialize_with = "integer")]
        pub fundacion: Option<i64>,
        pub ciudad: Option<String>,
        pub estadio: Option<String>,
        #[serde(default, deserialize_with = "amount")]
        pub presupuesto: Option<String>,
    }

    /// Every field is optional; absent fields keep their value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ClubUpdate {
        #[serde(alias = "code")]
        pub id_club: Option<String>,
        pub nombre: Option<String>,
        #[serde(default, deserialize_with = "integer")]
        pub fundacion: Option<i64>,
        pub ciudad: Option<String>,
        pub estadio: Option<String>,
        #[serde(default, deserialize_with = "amount")]
        pub presupuesto: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ClubView {
        pub id_club: String,
        pub nombre: String,
        pub fundacion: i32,
        pub ciudad: String,
        pub estadio: String,
        pub presupuesto: String,
        pub presupuesto_restante: String,
    }

    /// A club with everyone assigned to it.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ClubDetail {
        #[serde(flatten)]
        pub club: ClubView,
        pub jugadores: Vec<PlayerView>,
        pub entrenador: Option<CoachView>,
    }
}

pub mod player {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PlayerNew {
        pub nombre: Option<String>,
        pub apellidos: Option<String>,
        #[serde(default, deserialize_with = "integer")]
        pub dorsal: Option<i64>,
        #[serde(default, deserialize_with = "amount")]
        pub salario: Option<String>,
        #[serde(alias = "club")]
        pub id_club: Option<String>,
    }

    /// `id_club: null` releases the player, an absent `id_club` keeps it.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PlayerUpdate {
        pub nombre: Option<String>,
        pub apellidos: Option<String>,
        #[serde(default, deserialize_with = "integer")]
        pub dorsal: Option<i64>,
        #[serde(default, deserialize_with = "amount")]
        pub salario: Option<String>,
        #[serde(
            default,
            alias = "club",
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub id_club: Option<Option<String>>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PlayerView {
        pub id: Uuid,
        pub nombre: String,
        pub apellidos: String,
        pub dorsal: i32,
        pub salario: String,
        pub id_club: Option<String>,
    }
}

pub mod coach {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CoachNew {
        #[serde(alias = "Dni", alias = "DNI")]
        pub dni: Option<String>,
        pub nombre: Option<String>,
        pub apellidos: Option<String>,
        #[serde(default, deserialize_with = "amount")]
        pub salario: Option<String>,
        #[serde(alias = "club")]
        pub id_club: Option<String>,
    }

    /// `dni` may be sent but cannot change.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CoachUpdate {
        #[serde(alias = "Dni", alias = "DNI")]
        pub dni: Option<String>,
        pub nombre: Option<String>,
        pub apellidos: Option<String>,
        #[serde(default, deserialize_with = "amount")]
        pub salario: Option<String>,
        #[serde(
            default,
            alias = "club",
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub id_club: Option<Option<String>>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CoachView {
        pub id: Uuid,
        pub dni: String,
        pub nombre: String,
        pub apellidos: String,
        pub salario: String,
        pub id_club: Option<String>,
    }
}

pub mod ledger {
    use super::*;

    /// Budget breakdown of a club.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LedgerView {
        pub id_club: String,
        pub presupuesto: String,
        pub salarios_jugadores: String,
        pub salario_entrenador: String,
        pub presupuesto_restante: String,
        pub jugadores: usize,
        pub tiene_entrenador: bool,
    }
}

pub mod listing {
    use super::*;

    /// Query string of the listing endpoints.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ListQuery {
        pub page: Option<u64>,
        #[serde(alias = "per_page")]
        pub limit: Option<u64>,
        #[serde(alias = "name")]
        pub nombre: Option<String>,
        #[serde(alias = "club")]
        pub id_club: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Pagination {
        pub current_page: u64,
        pub per_page: u64,
        pub total_items: u64,
        pub total_pages: u64,
        pub has_next_page: bool,
        pub has_prev_page: bool,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Listing<T> {
        pub items: Vec<T>,
        pub pagination: Pagination,
    }
}

pub mod mutation {
    use super::*;

    /// Body of every create, update and delete response.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MutationResponse<T> {
        pub success: bool,
        pub errors: Option<BTreeMap<String, String>>,
        pub entity: Option<T>,
    }

    /// Body of a failed request that is not a validation failure.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        pub retryable: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::{coach::CoachNew, player::PlayerUpdate};

    #[test]
    fn national_id_aliases_are_folded() {
        for key in ["dni", "Dni", "DNI"] {
            let body = format!(r#"{{"{key}": "12345678Z", "salario": 1500.5}}"#);
            let coach: CoachNew = serde_json::from_str(&body).unwrap();
            assert_eq!(coach.dni.as_deref(), Some("12345678Z"));
            assert_eq!(coach.salario.as_deref(), Some("1500.5"));
        }
    }

    #[test]
    fn club_reference_is_tri_state() {
        let keep: PlayerUpdate = serde_json::from_str(r#"{"dorsal": "7"}"#).unwrap();
        assert_eq!(keep.id_club, None);
        assert_eq!(keep.dorsal, Some(7));

        let release: PlayerUpdate = serde_json::from_str(r#"{"id_club": null}"#).unwrap();
        assert_eq!(release.id_club, Some(None));

        let transfer: PlayerUpdate = serde_json::from_str(r#"{"id_club": "RMA"}"#).unwrap();
        assert_eq!(transfer.id_club, Some(Some("RMA".to_string())));
    }

    #[test]
    fn amounts_accept_strings_and_numbers() {
        let update: PlayerUpdate =
            serde_json::from_str(r#"{"salario": "2000,50", "dorsal": "siete"}"#).unwrap();
        assert_eq!(update.salario.as_deref(), Some("2000,50"));
        assert_eq!(update.dorsal, Some(i64::MIN));

        let update: PlayerUpdate = serde_json::from_str(r#"{"salario": 2000000}"#).unwrap();
        assert_eq!(update.salario.as_deref(), Some("2000000"));
    }
}
