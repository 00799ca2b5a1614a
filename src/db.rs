use sqlx::{Executor, Pool, Sqlite};
use tracing::info;

pub async fn get_db(url: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    let pool = sqlx::sqlite::SqlitePool::connect(url).await?;
    db_setup(&pool).await?;
    seed_demo_data(&pool).await?;
    Ok(pool)
}

pub async fn db_setup(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    add_users_table(pool).await?;
    add_campaigns_table(pool).await?;
    add_characters_table(pool).await?;
    add_updates_table(pool).await?;
    Ok(())
}

async fn add_users_table(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    pool.execute(
        "
    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL UNIQUE,
      role TEXT NOT NULL
    )
  ",
    )
    .await?;
    Ok(())
}

async fn add_campaigns_table(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    pool.execute(
        "
    CREATE TABLE IF NOT EXISTS campaigns (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      description TEXT NOT NULL,
      gm_id INTEGER NOT NULL,
      players TEXT NOT NULL DEFAULT '[]'
    )
  ",
    )
    .await?;
    Ok(())
}

async fn add_characters_table(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    pool.execute(
        "
    CREATE TABLE IF NOT EXISTS characters (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      class TEXT NOT NULL,
      race TEXT NOT NULL,
      level INTEGER NOT NULL,
      campaign_id INTEGER NOT NULL,
      owner_id INTEGER NOT NULL,
      ability_scores TEXT NOT NULL DEFAULT '{}',
      current_hp INTEGER NOT NULL DEFAULT 0,
      max_hp INTEGER NOT NULL DEFAULT 0,
      armor_class INTEGER NOT NULL DEFAULT 10,
      initiative INTEGER NOT NULL DEFAULT 0,
      speed INTEGER NOT NULL DEFAULT 30,
      proficiencies TEXT NOT NULL DEFAULT '{}',
      languages TEXT NOT NULL DEFAULT '[]',
      traits TEXT NOT NULL DEFAULT '[]',
      background TEXT,
      alignment TEXT,
      experience INTEGER NOT NULL DEFAULT 0,
      equipment TEXT NOT NULL DEFAULT '[]',
      notes TEXT,
      avatar TEXT,
      FOREIGN KEY (campaign_id) REFERENCES campaigns(id)
    )
  ",
    )
    .await?;
    Ok(())
}

async fn add_updates_table(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    pool.execute(
        "
    CREATE TABLE IF NOT EXISTS updates (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      text TEXT NOT NULL,
      campaign_id INTEGER NOT NULL,
      FOREIGN KEY (campaign_id) REFERENCES campaigns(id)
    )
  ",
    )
    .await?;
    Ok(())
}

/// Demo rows for an empty database, matching the original sample data.
async fn seed_demo_data(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    let (campaigns,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM campaigns")
        .fetch_one(pool)
        .await?;
    if campaigns > 0 {
        return Ok(());
    }
    info!("empty database, inserting demo data");
    sqlx::query("INSERT INTO users (name, role) VALUES (?1, ?2)")
        .bind("Matteo")
        .bind("GM")
        .execute(pool)
        .await?;
    sqlx::query(
        "INSERT INTO campaigns (name, description, gm_id, players) VALUES
          ('La Maledizione di Strahd', 'Campagna horror gotica', 1, '[]'),
          ('L''avventura degli Eroi Perduti', 'Campagna epica fantasy', 1, '[]')",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "INSERT INTO characters (name, class, race, level, campaign_id, owner_id) VALUES
          ('Aragorn', 'Guerriero', 'Umano', 5, 1, 1),
          ('Gandalf', 'Mago', 'Umano', 10, 1, 1)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "INSERT INTO updates (text, campaign_id) VALUES
          ('Il party entra nel castello di Strahd.', 1),
          ('Il drago rosso viene sconfitto.', 2)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
pub async fn memory_pool() -> Pool<Sqlite> {
    // One connection, otherwise each pooled connection gets its own :memory: db.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db_setup(&pool).await.unwrap();
    pool
}
