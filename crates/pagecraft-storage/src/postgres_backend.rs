//! `PostgreSQL` repository.
//!
//! Stores pages, leads, and analytics events in three tables created on
//! connect. Page configs live in a `JSONB` column. Leads and events carry a
//! foreign key to `landing_pages`, so inserting against an unknown page fails
//! inside the database rather than in application code.
//!
//! Feature-gated behind `postgres-backend`. Uses `sqlx` with the Tokio
//! runtime for fully async operations.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::records::{AnalyticsEvent, EventCount, Lead, NewEvent, NewLead, PageRecord};
use crate::{Repository, StorageError, tables};

const SCHEMA: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS landing_pages (\
        id         UUID        PRIMARY KEY, \
        owner_id   TEXT        NOT NULL, \
        slug       TEXT        NOT NULL UNIQUE, \
        title      TEXT        NOT NULL, \
        config     JSONB       NOT NULL, \
        created_at TIMESTAMPTZ NOT NULL, \
        updated_at TIMESTAMPTZ NOT NULL\
    )",
    "CREATE INDEX IF NOT EXISTS idx_landing_pages_owner ON landing_pages (owner_id, created_at DESC)",
    "CREATE TABLE IF NOT EXISTS leads (\
        id         UUID        PRIMARY KEY DEFAULT gen_random_uuid(), \
        page_id    UUID        NOT NULL REFERENCES landing_pages (id) ON DELETE CASCADE, \
        name       TEXT, \
        email      TEXT        NOT NULL, \
        source     TEXT, \
        metadata   JSONB, \
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()\
    )",
    "CREATE TABLE IF NOT EXISTS analytics_events (\
        id              UUID        PRIMARY KEY DEFAULT gen_random_uuid(), \
        landing_page_id UUID        NOT NULL REFERENCES landing_pages (id) ON DELETE CASCADE, \
        event_type      TEXT        NOT NULL, \
        session_id      TEXT, \
        ip_hash         TEXT, \
        user_agent      TEXT, \
        referrer        TEXT, \
        utm_source      TEXT, \
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()\
    )",
    "CREATE INDEX IF NOT EXISTS idx_analytics_events_page ON analytics_events (landing_page_id, event_type)",
];

/// A [`Repository`] backed by `PostgreSQL`.
///
/// Thread-safe via `PgPool`. All operations are fully async.
///
/// # Examples
///
/// ```no_run
/// # use pagecraft_storage::PostgresRepository;
/// # #[tokio::main]
/// # async fn main() {
/// let repo = PostgresRepository::connect("postgres://localhost/pagecraft").await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRepository")
            .field("pool", &"[PgPool]")
            .finish_non_exhaustive()
    }
}

impl PostgresRepository {
    /// Connect to `PostgreSQL` and create the tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the connection or table creation fails.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Open {
                target: "[redacted database url]".to_owned(),
                reason: e.to_string(),
            })?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| StorageError::Open {
                    target: "[redacted database url]".to_owned(),
                    reason: format!("schema setup failed: {e}"),
                })?;
        }

        tracing::debug!("postgres schema ready");
        Ok(Self { pool })
    }
}

/// Map a write failure, recognising unique (23505) and foreign-key (23503)
/// violations.
fn write_error(table: &'static str, err: &sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = err {
        match db_err.code().as_deref() {
            Some("23505") => {
                return StorageError::Conflict {
                    table,
                    reason: db_err.message().to_owned(),
                };
            }
            Some("23503") => {
                return StorageError::MissingReference {
                    table,
                    reason: db_err.message().to_owned(),
                };
            }
            _ => {}
        }
    }
    StorageError::Write {
        table,
        reason: err.to_string(),
    }
}

fn read_error(table: &'static str, err: &sqlx::Error) -> StorageError {
    StorageError::Read {
        table,
        reason: err.to_string(),
    }
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    async fn save_page(&self, page: &PageRecord) -> Result<PageRecord, StorageError> {
        sqlx::query_as::<_, PageRecord>(
            r"INSERT INTO landing_pages (id, owner_id, slug, title, config, created_at, updated_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7)
              ON CONFLICT (id) DO UPDATE SET
                slug = EXCLUDED.slug,
                title = EXCLUDED.title,
                config = EXCLUDED.config,
                updated_at = EXCLUDED.updated_at
              RETURNING *",
        )
        .bind(page.id)
        .bind(&page.owner_id)
        .bind(&page.slug)
        .bind(&page.title)
        .bind(&page.config)
        .bind(page.created_at)
        .bind(page.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(tables::LANDING_PAGES, &e))
    }

    async fn find_page_by_slug(&self, slug: &str) -> Result<Option<PageRecord>, StorageError> {
        sqlx::query_as::<_, PageRecord>("SELECT * FROM landing_pages WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(tables::LANDING_PAGES, &e))
    }

    async fn find_page_by_id(&self, id: Uuid) -> Result<Option<PageRecord>, StorageError> {
        sqlx::query_as::<_, PageRecord>("SELECT * FROM landing_pages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(tables::LANDING_PAGES, &e))
    }

    async fn list_pages_by_owner(&self, owner_id: &str) -> Result<Vec<PageRecord>, StorageError> {
        sqlx::query_as::<_, PageRecord>(
            "SELECT * FROM landing_pages WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(tables::LANDING_PAGES, &e))
    }

    async fn insert_lead(&self, lead: NewLead) -> Result<Lead, StorageError> {
        sqlx::query_as::<_, Lead>(
            r"INSERT INTO leads (page_id, name, email, source, metadata)
              VALUES ($1, $2, $3, $4, $5)
              RETURNING *",
        )
        .bind(lead.page_id)
        .bind(lead.name)
        .bind(lead.email)
        .bind(lead.source)
        .bind(lead.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(tables::LEADS, &e))
    }

    async fn list_leads(&self, page_id: Uuid) -> Result<Vec<Lead>, StorageError> {
        sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE page_id = $1 ORDER BY created_at DESC",
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(tables::LEADS, &e))
    }

    async fn insert_event(&self, event: NewEvent) -> Result<AnalyticsEvent, StorageError> {
        sqlx::query_as::<_, AnalyticsEvent>(
            r"INSERT INTO analytics_events
                (landing_page_id, event_type, session_id, ip_hash, user_agent, referrer, utm_source)
              VALUES ($1, $2, $3, $4, $5, $6, $7)
              RETURNING *",
        )
        .bind(event.landing_page_id)
        .bind(event.event_type)
        .bind(event.session_id)
        .bind(event.ip_hash)
        .bind(event.user_agent)
        .bind(event.referrer)
        .bind(event.utm_source)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(tables::ANALYTICS_EVENTS, &e))
    }

    async fn count_events(&self, page_id: Uuid) -> Result<Vec<EventCount>, StorageError> {
        sqlx::query_as::<_, EventCount>(
            r"SELECT event_type, COUNT(*) AS count
              FROM analytics_events
              WHERE landing_page_id = $1
              GROUP BY event_type
              ORDER BY event_type",
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(tables::ANALYTICS_EVENTS, &e))
    }
}
