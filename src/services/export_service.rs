use crate::models::Influencer;
use crate::utils::{AppError, AppResult};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Attachment name for a city's export, e.g. `influencers_san_francisco.csv`.
pub fn export_filename(city_name: &str) -> String {
    let slug: String = city_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("influencers_{}.csv", slug)
}

/// Renders influencers as CSV with a header row. `None` when there is nothing to export.
pub fn influencers_to_csv(influencers: &[Influencer]) -> AppResult<Option<String>> {
    if influencers.is_empty() {
        return Ok(None);
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for influencer in influencers {
        writer
            .serialize(influencer)
            .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV: {}", e)))?;
    let csv = String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("CSV is not valid UTF-8: {}", e)))?;

    Ok(Some(csv))
}
