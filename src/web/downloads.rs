use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::dashboard::ExportFile;

/// Offer the file to the browser as an attachment download.
impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();

        let content_type = match HeaderValue::from_str(self.content_type.as_ref()) {
            Ok(value) => value,
            Err(err) => {
                error!(?err, content_type = %self.content_type, "invalid download content type");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        headers.insert(header::CONTENT_TYPE, content_type);

        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        let disposition = match HeaderValue::from_str(&disposition) {
            Ok(value) => value,
            Err(err) => {
                error!(?err, filename = self.filename, "invalid download filename");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        headers.insert(header::CONTENT_DISPOSITION, disposition);

        (headers, self.bytes).into_response()
    }
}
