use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::cell::Cell;

/// One player row, in the fixed column order of the membership export.
///
/// Deserializes from a JSON array (positional, trailing columns may be left
/// out) or from an object keyed by field name. Nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    pub player_id: Cell,
    pub player_name: String,
    pub gender_id: Cell,
    pub address: Cell,
    pub date_of_birth: Cell,
    pub email: Cell,
    /// Exported by the membership database but not used on the form.
    pub unused: Cell,
    pub medical_conditions: Cell,
    pub train: Cell,
    pub play: Cell,
    pub photo_consent: Cell,
    pub role: Cell,
    pub primary_phone: Cell,
    pub primary_contact: Cell,
    pub secondary_phone: Cell,
    pub secondary_contact: Cell,
    pub guardian_name: Cell,
    pub guardian_address: Cell,
    pub guardian_date_of_birth: Cell,
    pub guardian_mobile: Cell,
}

impl PlayerRecord {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
