use crate::{error::DataAccessError, models::HistoryRecord, patron::PatronRecordNumber};
use async_trait::async_trait;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

// patron ids are decoded with reckey2id; a valid-looking id with no history yields zero rows
const READING_HISTORY_QUERY: &str = r#"
    SELECT
        brp.best_title AS "Title",
        brp.best_author AS "Author",
        id2reckey(rh.item_record_metadata_id) || 'a' AS "Item Number",
        TO_CHAR(rh.checkout_gmt::DATE, 'MM/DD/YYYY') AS "Checkedout Date"
    FROM sierra_view.reading_history rh
    LEFT JOIN sierra_view.bib_record_property brp
        ON rh.bib_record_metadata_id = brp.bib_record_id
    WHERE rh.patron_record_metadata_id = reckey2id($1)
    ORDER BY rh.checkout_gmt DESC
"#;

/// Source of a patron's checkout history, newest first.
#[async_trait]
pub trait ReadingHistory: Send + Sync {
    async fn fetch(
        &self,
        patron: &PatronRecordNumber,
    ) -> Result<Vec<HistoryRecord>, DataAccessError>;
}

#[derive(Debug, Clone)]
pub struct Entity {
    pool: PgPool,
}

impl Entity {
    // connections are opened on first use, so startup does not need a reachable database
    pub fn new(options: PgConnectOptions) -> Self {
        let pool = PgPoolOptions::new().connect_lazy_with(options);
        Entity { pool }
    }
}

#[async_trait]
impl ReadingHistory for Entity {
    #[tracing::instrument(level = "debug", skip_all, fields(patron = %patron))]
    async fn fetch(
        &self,
        patron: &PatronRecordNumber,
    ) -> Result<Vec<HistoryRecord>, DataAccessError> {
        let items = sqlx::query_as::<_, HistoryRecord>(READING_HISTORY_QUERY)
            .bind(patron.as_str())
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(rows = items.len(), "fetched reading history");
        Ok(items)
    }
}
