//! Fixed area metadata plus server and seed configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::AreaId;

/// Immutable display metadata for one plan area.
#[derive(Debug, Clone, Copy)]
pub struct AreaConfig {
    pub id: AreaId,
    pub title: &'static str,
    pub short_title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub icon_name: &'static str,
}

const FINDING: AreaConfig = AreaConfig {
    id: AreaId::Finding,
    title: "Encontrar personas",
    short_title: "Encontrar",
    subtitle: "Para que los misioneros les enseñen",
    description: "Estrategias para contactar nuevas personas y compartir el mensaje.",
    color: "orange",
    icon_name: "user-plus",
};

const TEACHING: AreaConfig = AreaConfig {
    id: AreaId::Teaching,
    title: "Personas recibiendo enseñanzas",
    short_title: "Enseñando",
    subtitle: "Apoyar a las personas a quienes los misioneros estén enseñando",
    description: "Seguimiento al progreso de los investigadores actuales.",
    color: "amber",
    icon_name: "users",
};

const NEW_MEMBERS: AreaConfig = AreaConfig {
    id: AreaId::NewMembers,
    title: "Miembros nuevos",
    short_title: "Nuevos Miembros",
    subtitle: "Fortalecer a los miembros nuevos espiritualmente",
    description: "Fortalecimiento de los miembros nuevos para su retención.",
    color: "sky",
    icon_name: "user-check",
};

const RETURNING: AreaConfig = AreaConfig {
    id: AreaId::Returning,
    title: "Miembros que regresan",
    short_title: "Retorno",
    subtitle: "Fortalecer a los miembros que regresan a la actividad",
    description: "Apoyo a miembros menos activos para volver a la actividad.",
    color: "emerald",
    icon_name: "user-round",
};

/// Display metadata for `id`.
pub fn area_config(id: AreaId) -> &'static AreaConfig {
    match id {
        AreaId::Finding => &FINDING,
        AreaId::Teaching => &TEACHING,
        AreaId::NewMembers => &NEW_MEMBERS,
        AreaId::Returning => &RETURNING,
    }
}

/// One entry of the ward seed list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardSeed {
    pub id: String,
    pub name: String,
    /// Defaults to the ward id when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}

impl WardSeed {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            passphrase: None,
        }
    }

    pub fn resolved_passphrase(&self) -> &str {
        self.passphrase.as_deref().unwrap_or(&self.id)
    }
}

/// Wards of the default deployment (Estaca Primavera).
pub fn default_wards() -> Vec<WardSeed> {
    vec![
        WardSeed::new("primavera", "Barrio Primavera"),
        WardSeed::new("jardines", "Barrio Jardines"),
        WardSeed::new("centro", "Barrio Centro"),
        WardSeed::new("mirador", "Barrio El Mirador"),
    ]
}

/// Server configuration, usually loaded from a YAML file with
/// [`Self::load`]. `Default` is suitable for local development.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP API binds to.
    pub bind_addr: SocketAddr,
    /// Path of the SQLite ward database.
    pub db_path: PathBuf,
    /// Quiet period before a debounced persist fires, in milliseconds.
    pub debounce_ms: u64,
    /// Wards created on first `initialize` run.
    pub wards: Vec<WardSeed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 3000).into(),
            db_path: PathBuf::from("misional.db"),
            debounce_ms: 1_000,
            wards: default_wards(),
        }
    }
}

impl Config {
    /// Load the config from a YAML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&s)?;
        Ok(config)
    }
}
