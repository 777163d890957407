use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Таблицы, которые создаются при первом запуске (минимальный bootstrap схемы)
const SCHEMA: &[(&str, &str)] = &[
    (
        "a001_service_industry",
        r#"
        CREATE TABLE a001_service_industry (
            key TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT '',
            sort_order INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a001_service_item",
        r#"
        CREATE TABLE a001_service_item (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            industry_key TEXT NOT NULL,
            code TEXT NOT NULL,
            name TEXT NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0,
            UNIQUE (industry_key, code)
        );
        "#,
    ),
    (
        "a001_service_option",
        r#"
        CREATE TABLE a001_service_option (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            industry_key TEXT NOT NULL,
            service_code TEXT NOT NULL,
            code TEXT NOT NULL,
            label TEXT NOT NULL,
            price INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            UNIQUE (industry_key, service_code, code)
        );
        "#,
    ),
    (
        "a002_consultation",
        r#"
        CREATE TABLE a002_consultation (
            row_index INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            name TEXT NOT NULL,
            industry TEXT NOT NULL,
            phone TEXT NOT NULL,
            region TEXT NOT NULL,
            selected_services TEXT NOT NULL DEFAULT '[]',
            total_amount INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL
        );
        "#,
    ),
    (
        "a003_visit",
        r#"
        CREATE TABLE a003_visit (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            visited_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "sys_users",
        r#"
        CREATE TABLE sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_login_at TEXT
        );
        "#,
    ),
    (
        "sys_settings",
        r#"
        CREATE TABLE sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
];

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    for (table, create_sql) in SCHEMA {
        ensure_table(&conn, table, create_sql).await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

async fn ensure_table(conn: &DatabaseConnection, table: &str, create_sql: &str) -> anyhow::Result<()> {
    let exists = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?",
            [table.into()],
        ))
        .await?;

    if exists.is_empty() {
        tracing::info!("Creating {} table", table);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_sql.to_string(),
        ))
        .await?;
    }
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
