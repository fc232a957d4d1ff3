//! CSV export of a webinar's submissions.

use registra_core::models::submission::Submission;
use registra_core::models::webinar::Webinar;
use registra_core::schema::export_columns;

use crate::error::ServerError;

/// One header row, then one row per submission in the given order.
pub fn submissions_csv(webinar: &Webinar, submissions: &[Submission]) -> Result<Vec<u8>, ServerError> {
    let columns = export_columns(&webinar.form_schema);
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.heading.as_str()))?;
    for submission in submissions {
        writer.write_record(columns.iter().map(|c| c.cell(&webinar.title, submission)))?;
    }

    writer
        .into_inner()
        .map_err(|e| ServerError::Export(e.to_string()))
}
