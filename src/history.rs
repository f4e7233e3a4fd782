use crate::{entity::ReadingHistory, export::to_csv, patron::PatronRecordNumber};

pub const INVALID_MESSAGE: &str =
    "Invalid patron record number. The value must start with 'p', end with 'a', and be alphanumeric.";
pub const NO_RESULTS_MESSAGE: &str = "Please make sure the patron record number entered is valid, or the patron has opted-in for the Reading History feature.";
pub const UNAVAILABLE_MESSAGE: &str =
    "The reading history service is temporarily unavailable. Please try again later.";

/// Result of one form submission.
#[derive(Debug, PartialEq, Eq)]
pub enum Export {
    Invalid,
    NoResults,
    Unavailable,
    Csv { filename: String, body: String },
}

impl Export {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Export::Invalid => Some(INVALID_MESSAGE),
            Export::NoResults => Some(NO_RESULTS_MESSAGE),
            Export::Unavailable => Some(UNAVAILABLE_MESSAGE),
            Export::Csv { .. } => None,
        }
    }
}

pub async fn export(history: &dyn ReadingHistory, patron_record_number: &str) -> Export {
    let Some(patron) = PatronRecordNumber::parse(patron_record_number) else {
        tracing::info!("rejected malformed patron record number");
        return Export::Invalid;
    };

    let items = match history.fetch(&patron).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "failed to fetch reading history"
            );
            return Export::Unavailable;
        }
    };

    if items.is_empty() {
        tracing::info!("no reading history found");
        tracing::debug!(%patron, "empty result set");
        return Export::NoResults;
    }

    tracing::info!(rows = items.len(), "exporting reading history");
    Export::Csv {
        filename: patron.export_filename(),
        body: to_csv(&items),
    }
}
