use serde::Deserialize;

pub mod campaign;
pub mod character;
pub mod update;
pub mod user;

/// Query string shared by the character and update listings.
#[derive(Deserialize, Debug, Default)]
pub struct CampaignFilter {
    #[serde(rename = "campagnaId")]
    pub campagna_id: Option<i64>,
}
