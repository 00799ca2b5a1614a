use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::error::ApiError;
use crate::model::character::{Character, CharacterInput, CharacterRow};
use crate::model::CampaignFilter;

pub async fn list(
    State(pool): State<Pool<Sqlite>>,
    Query(filter): Query<CampaignFilter>,
) -> Result<Json<Vec<Character>>, ApiError> {
    let rows: Vec<CharacterRow> = match filter.campagna_id {
        Some(campaign_id) => {
            sqlx::query_as("SELECT * FROM characters WHERE campaign_id = ?1")
                .bind(campaign_id)
                .fetch_all(&pool)
                .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM characters")
                .fetch_all(&pool)
                .await?
        }
    };
    Ok(Json(rows.into_iter().map(Character::from).collect()))
}

pub async fn detail(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<i64>,
) -> Result<Json<Character>, ApiError> {
    let row: CharacterRow = sqlx::query_as("SELECT * FROM characters WHERE id = ?1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(ApiError::NotFound("character"))?;
    Ok(Json(row.into()))
}

pub async fn create(
    State(pool): State<Pool<Sqlite>>,
    Json(input): Json<CharacterInput>,
) -> Result<Json<Character>, ApiError> {
    let mut character = input.into_character(0)?;
    let row = character.to_row();
    let result = sqlx::query(
        "INSERT INTO characters (name, class, race, level, campaign_id, owner_id,
           ability_scores, current_hp, max_hp, armor_class, initiative, speed,
           proficiencies, languages, traits, background, alignment, experience,
           equipment, notes, avatar)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
           ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
    )
    .bind(&row.name)
    .bind(&row.class)
    .bind(&row.race)
    .bind(row.level)
    .bind(row.campaign_id)
    .bind(row.owner_id)
    .bind(&row.ability_scores)
    .bind(row.current_hp)
    .bind(row.max_hp)
    .bind(row.armor_class)
    .bind(row.initiative)
    .bind(row.speed)
    .bind(&row.proficiencies)
    .bind(&row.languages)
    .bind(&row.traits)
    .bind(&row.background)
    .bind(&row.alignment)
    .bind(row.experience)
    .bind(&row.equipment)
    .bind(&row.notes)
    .bind(&row.avatar)
    .execute(&pool)
    .await?;
    character.id = result.last_insert_rowid();
    info!("character {} ({}) created", character.id, character.name);
    Ok(Json(character))
}

/// Destructive PUT: every omitted field is reset to its default, nothing is
/// merged with the stored sheet.
pub async fn replace(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<i64>,
    Json(input): Json<CharacterInput>,
) -> Result<Json<Character>, ApiError> {
    // a missing character answers 404 even when the body is also invalid
    sqlx::query_as::<_, (i64,)>("SELECT id FROM characters WHERE id = ?1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(ApiError::NotFound("character"))?;
    let character = input.into_character(id)?;
    let row = character.to_row();
    let result = sqlx::query(
        "UPDATE characters SET name = ?1, class = ?2, race = ?3, level = ?4,
           campaign_id = ?5, owner_id = ?6, ability_scores = ?7, current_hp = ?8,
           max_hp = ?9, armor_class = ?10, initiative = ?11, speed = ?12,
           proficiencies = ?13, languages = ?14, traits = ?15, background = ?16,
           alignment = ?17, experience = ?18, equipment = ?19, notes = ?20,
           avatar = ?21
         WHERE id = ?22",
    )
    .bind(&row.name)
    .bind(&row.class)
    .bind(&row.race)
    .bind(row.level)
    .bind(row.campaign_id)
    .bind(row.owner_id)
    .bind(&row.ability_scores)
    .bind(row.current_hp)
    .bind(row.max_hp)
    .bind(row.armor_class)
    .bind(row.initiative)
    .bind(row.speed)
    .bind(&row.proficiencies)
    .bind(&row.languages)
    .bind(&row.traits)
    .bind(&row.background)
    .bind(&row.alignment)
    .bind(row.experience)
    .bind(&row.equipment)
    .bind(&row.notes)
    .bind(&row.avatar)
    .bind(id)
    .execute(&pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("character"));
    }
    Ok(Json(character))
}

pub async fn remove(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let result = sqlx::query("DELETE FROM characters WHERE id = ?1")
        .bind(id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("character"));
    }
    info!("character {} deleted", id);
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    async fn pool_with_campaigns() -> Pool<Sqlite> {
        let pool = memory_pool().await;
        sqlx::query(
            "INSERT INTO campaigns (name, description, gm_id) VALUES
               ('First', 'fixture campaign', 1), ('Second', 'fixture campaign', 1)",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    fn minimal(name: &str, campaign_id: i64) -> CharacterInput {
        serde_json::from_str(&format!(
            r#"{{"name":"{name}","class":"Fighter","race":"Human","level":5,"campaignId":{campaign_id},"ownerId":1}}"#
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn minimal_create_fills_documented_defaults() {
        let pool = pool_with_campaigns().await;
        let Json(aragorn) = create(State(pool.clone()), Json(minimal("Aragorn", 1)))
            .await
            .unwrap();
        assert_eq!(aragorn.current_hp, 0);
        assert_eq!(aragorn.max_hp, 0);
        assert_eq!(aragorn.armor_class, 10);
        assert_eq!(aragorn.initiative, 0);
        assert_eq!(aragorn.speed, 30);
        assert_eq!(aragorn.languages, Vec::<String>::new());
        assert_eq!(aragorn.equipment, Vec::<String>::new());

        // what we returned is exactly what a re-read decodes
        let Json(reread) = detail(State(pool), Path(aragorn.id)).await.unwrap();
        assert_eq!(reread, aragorn);
    }

    #[tokio::test]
    async fn create_validates_required_fields() {
        let pool = memory_pool().await;
        let input: CharacterInput =
            serde_json::from_str(r#"{"name":"Aragorn","class":"Fighter","race":"Human"}"#).unwrap();
        assert!(matches!(
            create(State(pool), Json(input)).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_campaign() {
        let pool = pool_with_campaigns().await;
        create(State(pool.clone()), Json(minimal("Aragorn", 1)))
            .await
            .unwrap();
        create(State(pool.clone()), Json(minimal("Gandalf", 1)))
            .await
            .unwrap();
        create(State(pool.clone()), Json(minimal("Drizzt", 2)))
            .await
            .unwrap();

        let Json(all) = list(State(pool.clone()), Query(CampaignFilter::default()))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let Json(first_campaign) = list(
            State(pool),
            Query(CampaignFilter {
                campagna_id: Some(1),
            }),
        )
        .await
        .unwrap();
        let names: Vec<&str> = first_campaign.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Aragorn", "Gandalf"]);
    }

    #[tokio::test]
    async fn replace_resets_omitted_fields() {
        let pool = pool_with_campaigns().await;
        let mut input = minimal("Aragorn", 1);
        input.background = Some("Ranger of the North".to_string());
        input.equipment = vec!["Andúril".to_string()];
        let Json(created) = create(State(pool.clone()), Json(input)).await.unwrap();
        assert_eq!(created.background.as_deref(), Some("Ranger of the North"));

        // replacement body omits background and equipment entirely
        let Json(replaced) = replace(State(pool.clone()), Path(created.id), Json(minimal("Aragorn", 1)))
            .await
            .unwrap();
        assert_eq!(replaced.background, None);
        assert_eq!(replaced.equipment, Vec::<String>::new());

        let Json(stored) = detail(State(pool), Path(created.id)).await.unwrap();
        assert_eq!(stored.background, None);
    }

    #[tokio::test]
    async fn replace_and_delete_require_an_existing_character() {
        let pool = pool_with_campaigns().await;
        assert!(matches!(
            replace(State(pool.clone()), Path(404), Json(minimal("Nobody", 1))).await,
            Err(ApiError::NotFound(_))
        ));

        // a missing character wins over an invalid body
        let invalid: CharacterInput =
            serde_json::from_str(r#"{"name":"Nobody","class":"Fighter","race":"Human"}"#).unwrap();
        assert!(matches!(
            replace(State(pool.clone()), Path(404), Json(invalid)).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            remove(State(pool.clone()), Path(404)).await,
            Err(ApiError::NotFound(_))
        ));

        let Json(created) = create(State(pool.clone()), Json(minimal("Boromir", 1)))
            .await
            .unwrap();
        remove(State(pool.clone()), Path(created.id)).await.unwrap();
        assert!(matches!(
            detail(State(pool), Path(created.id)).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
