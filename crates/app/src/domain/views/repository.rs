//! Saved Views Repository

use gabinet::{
    fields::EntityType,
    views::{SystemView, ViewConfig},
};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::parse_column,
    domain::views::records::{SavedViewRecord, SavedViewUuid},
};

const LIST_VIEWS_SQL: &str = include_str!("sql/list_views.sql");
const GET_VIEW_SQL: &str = include_str!("sql/get_view.sql");
const LOCK_VIEW_SQL: &str = include_str!("sql/lock_view.sql");
const CREATE_VIEW_SQL: &str = include_str!("sql/create_view.sql");
const UPDATE_VIEW_SQL: &str = include_str!("sql/update_view.sql");
const DELETE_VIEW_SQL: &str = include_str!("sql/delete_view.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgViewsRepository;

impl PgViewsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "views.repository.list_views",
        skip(self, tx),
        fields(entity_type = %entity_type, view_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_views(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entity_type: EntityType,
    ) -> Result<Vec<SavedViewRecord>, sqlx::Error> {
        let views = query_as::<Postgres, SavedViewRecord>(LIST_VIEWS_SQL)
            .bind(entity_type.as_str())
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("view_count", views.len());

        Ok(views)
    }

    pub(crate) async fn get_view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        view: SavedViewUuid,
    ) -> Result<SavedViewRecord, sqlx::Error> {
        query_as::<Postgres, SavedViewRecord>(GET_VIEW_SQL)
            .bind(view.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        view: SavedViewUuid,
    ) -> Result<SavedViewRecord, sqlx::Error> {
        query_as::<Postgres, SavedViewRecord>(LOCK_VIEW_SQL)
            .bind(view.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        view: SavedViewUuid,
        entity_type: EntityType,
        name: &str,
        config: &ViewConfig,
    ) -> Result<SavedViewRecord, sqlx::Error> {
        query_as::<Postgres, SavedViewRecord>(CREATE_VIEW_SQL)
            .bind(view.into_uuid())
            .bind(entity_type.as_str())
            .bind(None::<String>)
            .bind(name)
            .bind(Json(config))
            .bind(false)
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "views.repository.seed_system_views",
        skip(self, tx, views),
        fields(view_count = views.len()),
        err
    )]
    pub(crate) async fn seed_system_views(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        views: &[SystemView],
    ) -> Result<Vec<SavedViewRecord>, sqlx::Error> {
        let mut seeded = Vec::with_capacity(views.len());

        for view in views {
            let record = query_as::<Postgres, SavedViewRecord>(CREATE_VIEW_SQL)
                .bind(SavedViewUuid::new().into_uuid())
                .bind(view.entity_type.as_str())
                .bind(&view.slug)
                .bind(&view.name)
                .bind(Json(&view.config))
                .bind(true)
                .fetch_one(&mut **tx)
                .await?;

            seeded.push(record);
        }

        Ok(seeded)
    }

    pub(crate) async fn update_view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        view: SavedViewUuid,
        name: &str,
        config: &ViewConfig,
    ) -> Result<SavedViewRecord, sqlx::Error> {
        query_as::<Postgres, SavedViewRecord>(UPDATE_VIEW_SQL)
            .bind(view.into_uuid())
            .bind(name)
            .bind(Json(config))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        view: SavedViewUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_VIEW_SQL)
            .bind(view.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for SavedViewRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SavedViewUuid::from_uuid(row.try_get("uuid")?),
            entity_type: parse_column(row, "entity_type")?,
            slug: row.try_get("slug")?,
            name: row.try_get("name")?,
            config: row.try_get::<Json<ViewConfig>, _>("config")?.0,
            is_system: row.try_get("is_system")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
