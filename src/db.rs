// connexion BD + création des tables manquantes

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::{password_reset_tokens, product, purchase, sale, store, users};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const IDLE_TIMEOUT: Duration = Duration::from_secs(45);

pub async fn establish_connection(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .connect_timeout(CONNECT_TIMEOUT)
        .acquire_timeout(CONNECT_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Crée les tables à partir des entités si elles n'existent pas.
/// L'ordre compte: les tables référencées par une FK passent en premier.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, password_reset_tokens::Entity).await?;
    create_table(db, product::Entity).await?;
    create_table(db, store::Entity).await?;
    create_table(db, purchase::Entity).await?;
    create_table(db, sale::Entity).await?;
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);

    db.execute(backend.build(statement.if_not_exists())).await?;
    tracing::debug!(table = entity.table_name(), "table ready");
    Ok(())
}
