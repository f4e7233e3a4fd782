/// One checkout event, as exported to CSV.
#[derive(Debug, Default, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct HistoryRecord {
    #[sqlx(rename = "Title")]
    pub title: Option<String>,
    #[sqlx(rename = "Author")]
    pub author: Option<String>,
    #[sqlx(rename = "Item Number")]
    pub item_number: Option<String>,
    #[sqlx(rename = "Checkedout Date")]
    pub checkedout_date: Option<String>,
}
