use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::error::ApiError;

/// The six D&D ability scores. Stored as one JSON text column; a missing or
/// malformed column decodes to the all-zero default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(default)]
    pub strength: i64,
    #[serde(default)]
    pub dexterity: i64,
    #[serde(default)]
    pub constitution: i64,
    #[serde(default)]
    pub intelligence: i64,
    #[serde(default)]
    pub wisdom: i64,
    #[serde(default)]
    pub charisma: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proficiencies {
    #[serde(default)]
    pub armor: Vec<String>,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub saving_throws: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// A full character sheet as it travels on the wire.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub class: String,
    pub race: String,
    pub level: i64,
    pub campaign_id: i64,
    pub owner_id: i64,
    pub ability_scores: AbilityScores,
    #[serde(rename = "currentHP")]
    pub current_hp: i64,
    #[serde(rename = "maxHP")]
    pub max_hp: i64,
    pub armor_class: i64,
    pub initiative: i64,
    pub speed: i64,
    pub proficiencies: Proficiencies,
    pub languages: Vec<String>,
    pub traits: Vec<String>,
    pub background: Option<String>,
    pub alignment: Option<String>,
    pub experience: i64,
    pub equipment: Vec<String>,
    pub notes: Option<String>,
    pub avatar: Option<String>,
}

/// A character sheet as stored: nested structures are JSON text columns.
#[derive(FromRow, Debug)]
pub struct CharacterRow {
    pub id: i64,
    pub name: String,
    pub class: String,
    pub race: String,
    pub level: i64,
    pub campaign_id: i64,
    pub owner_id: i64,
    pub ability_scores: String,
    pub current_hp: i64,
    pub max_hp: i64,
    pub armor_class: i64,
    pub initiative: i64,
    pub speed: i64,
    pub proficiencies: String,
    pub languages: String,
    pub traits: String,
    pub background: Option<String>,
    pub alignment: Option<String>,
    pub experience: i64,
    pub equipment: String,
    pub notes: Option<String>,
    pub avatar: Option<String>,
}

fn decode<T: Default + for<'de> Deserialize<'de>>(raw: &str) -> T {
    if raw.trim().is_empty() {
        return T::default();
    }
    serde_json::from_str(raw).unwrap_or_default()
}

fn encode<T: Serialize>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

impl From<CharacterRow> for Character {
    fn from(row: CharacterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            class: row.class,
            race: row.race,
            level: row.level,
            campaign_id: row.campaign_id,
            owner_id: row.owner_id,
            ability_scores: decode(&row.ability_scores),
            current_hp: row.current_hp,
            max_hp: row.max_hp,
            armor_class: row.armor_class,
            initiative: row.initiative,
            speed: row.speed,
            proficiencies: decode(&row.proficiencies),
            languages: decode(&row.languages),
            traits: decode(&row.traits),
            background: row.background,
            alignment: row.alignment,
            experience: row.experience,
            equipment: decode(&row.equipment),
            notes: row.notes,
            avatar: row.avatar,
        }
    }
}

impl Character {
    /// Serializes the five structured fields for storage. Never fails: an
    /// unserializable value falls back to its empty form.
    pub fn to_row(&self) -> CharacterRow {
        CharacterRow {
            id: self.id,
            name: self.name.clone(),
            class: self.class.clone(),
            race: self.race.clone(),
            level: self.level,
            campaign_id: self.campaign_id,
            owner_id: self.owner_id,
            ability_scores: encode(&self.ability_scores, "{}"),
            current_hp: self.current_hp,
            max_hp: self.max_hp,
            armor_class: self.armor_class,
            initiative: self.initiative,
            speed: self.speed,
            proficiencies: encode(&self.proficiencies, "{}"),
            languages: encode(&self.languages, "[]"),
            traits: encode(&self.traits, "[]"),
            background: self.background.clone(),
            alignment: self.alignment.clone(),
            experience: self.experience,
            equipment: encode(&self.equipment, "[]"),
            notes: self.notes.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

fn default_armor_class() -> i64 {
    10
}

fn default_speed() -> i64 {
    30
}

/// Request body for create and replace. Every field past the six required
/// ones defaults when omitted, which is what gives PUT its destructive
/// replace semantics.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub race: String,
    pub level: Option<i64>,
    pub campaign_id: Option<i64>,
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub ability_scores: AbilityScores,
    #[serde(default, rename = "currentHP")]
    pub current_hp: i64,
    #[serde(default, rename = "maxHP")]
    pub max_hp: i64,
    #[serde(default = "default_armor_class")]
    pub armor_class: i64,
    #[serde(default)]
    pub initiative: i64,
    #[serde(default = "default_speed")]
    pub speed: i64,
    #[serde(default)]
    pub proficiencies: Proficiencies,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    pub background: Option<String>,
    pub alignment: Option<String>,
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub notes: Option<String>,
    pub avatar: Option<String>,
}

impl CharacterInput {
    /// Validates the required fields and materializes the full sheet with
    /// documented defaults for everything omitted.
    pub fn into_character(self, id: i64) -> Result<Character, ApiError> {
        if self.name.trim().is_empty()
            || self.class.trim().is_empty()
            || self.race.trim().is_empty()
        {
            return Err(ApiError::Validation(
                "name, class and race are required".to_string(),
            ));
        }
        let level = self
            .level
            .ok_or_else(|| ApiError::Validation("level is required".to_string()))?;
        let campaign_id = self
            .campaign_id
            .ok_or_else(|| ApiError::Validation("campaignId is required".to_string()))?;
        let owner_id = self
            .owner_id
            .ok_or_else(|| ApiError::Validation("ownerId is required".to_string()))?;
        Ok(Character {
            id,
            name: self.name,
            class: self.class,
            race: self.race,
            level,
            campaign_id,
            owner_id,
            ability_scores: self.ability_scores,
            current_hp: self.current_hp,
            max_hp: self.max_hp,
            armor_class: self.armor_class,
            initiative: self.initiative,
            speed: self.speed,
            proficiencies: self.proficiencies,
            languages: self.languages,
            traits: self.traits,
            background: self.background,
            alignment: self.alignment,
            experience: self.experience,
            equipment: self.equipment,
            notes: self.notes,
            avatar: self.avatar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_sheet() -> Character {
        Character {
            id: 7,
            name: "Mordenkainen".to_string(),
            class: "Wizard".to_string(),
            race: "Human".to_string(),
            level: 12,
            campaign_id: 3,
            owner_id: 2,
            ability_scores: AbilityScores {
                strength: 10,
                dexterity: 14,
                constitution: 12,
                intelligence: 20,
                wisdom: 15,
                charisma: 13,
            },
            current_hp: 58,
            max_hp: 66,
            armor_class: 12,
            initiative: 2,
            speed: 30,
            proficiencies: Proficiencies {
                armor: vec![],
                weapons: vec!["Dagger".to_string(), "Quarterstaff".to_string()],
                tools: vec!["Alchemist's supplies".to_string()],
                saving_throws: vec!["Intelligence".to_string(), "Wisdom".to_string()],
                skills: vec!["Arcana".to_string(), "History".to_string()],
            },
            languages: vec!["Common".to_string(), "Draconic".to_string()],
            traits: vec!["Archmage".to_string()],
            background: Some("Sage".to_string()),
            alignment: Some("Neutral".to_string()),
            experience: 100_000,
            equipment: vec!["Spellbook".to_string(), "Staff".to_string()],
            notes: Some("Founder of the Circle of Eight".to_string()),
            avatar: None,
        }
    }

    fn empty_sheet() -> Character {
        Character {
            id: 1,
            name: "Aragorn".to_string(),
            class: "Fighter".to_string(),
            race: "Human".to_string(),
            level: 5,
            campaign_id: 1,
            owner_id: 1,
            ability_scores: AbilityScores::default(),
            current_hp: 0,
            max_hp: 0,
            armor_class: 10,
            initiative: 0,
            speed: 30,
            proficiencies: Proficiencies::default(),
            languages: vec![],
            traits: vec![],
            background: None,
            alignment: None,
            experience: 0,
            equipment: vec![],
            notes: None,
            avatar: None,
        }
    }

    #[test]
    fn sheet_round_trips_through_storage() {
        for sheet in [full_sheet(), empty_sheet()] {
            assert_eq!(Character::from(sheet.to_row()), sheet);
        }
    }

    #[test]
    fn malformed_columns_decode_to_defaults() {
        let mut row = full_sheet().to_row();
        row.ability_scores = "garbage".to_string();
        row.proficiencies = String::new();
        row.languages = "{\"wrong\": \"shape\"}".to_string();
        let decoded = Character::from(row);
        assert_eq!(decoded.ability_scores, AbilityScores::default());
        assert_eq!(decoded.proficiencies, Proficiencies::default());
        assert_eq!(decoded.languages, Vec::<String>::new());
    }

    #[test]
    fn minimal_input_gets_documented_defaults() {
        let input: CharacterInput = serde_json::from_str(
            r#"{"name":"Aragorn","class":"Fighter","race":"Human","level":5,"campaignId":1,"ownerId":1}"#,
        )
        .unwrap();
        let character = input.into_character(1).unwrap();
        assert_eq!(character, empty_sheet());
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let missing_level: CharacterInput = serde_json::from_str(
            r#"{"name":"Aragorn","class":"Fighter","race":"Human","campaignId":1,"ownerId":1}"#,
        )
        .unwrap();
        assert!(matches!(
            missing_level.into_character(1),
            Err(ApiError::Validation(_))
        ));

        let blank_name: CharacterInput = serde_json::from_str(
            r#"{"name":"  ","class":"Fighter","race":"Human","level":5,"campaignId":1,"ownerId":1}"#,
        )
        .unwrap();
        assert!(matches!(
            blank_name.into_character(1),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn wire_names_keep_hp_capitalization() {
        let json = serde_json::to_value(empty_sheet()).unwrap();
        assert!(json.get("currentHP").is_some());
        assert!(json.get("maxHP").is_some());
        assert!(json.get("armorClass").is_some());
        assert!(json.get("campaignId").is_some());
    }
}
