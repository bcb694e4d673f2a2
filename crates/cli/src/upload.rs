use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use thiserror::Error;

pub(crate) const MAPPING_PART: &str = "mapping";
pub(crate) const TABLE_PART: &str = "table";

/// Files received by the upload route
#[derive(Debug, Clone)]
pub(crate) struct Uploads {
    pub(crate) mapping: Bytes,
    pub(crate) table: Bytes,
}

/// Client errors in an upload request. Everything is a 400 except a body over
/// the configured limit, which is a 413.
#[derive(Debug, Error)]
pub(crate) enum UploadError {
    #[error("Missing upload part '{0}'")]
    MissingPart(&'static str),

    #[error("Upload part '{part}' must be a {expected} file, got '{file_name}'")]
    BadExtension {
        part: &'static str,
        file_name: String,
        expected: &'static str,
    },

    #[error("Upload too large: {0}")]
    TooLarge(MultipartError),

    #[error("Invalid multipart body: {0}")]
    Multipart(MultipartError),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge(err)
        } else {
            Self::Multipart(err)
        }
    }
}

impl UploadError {
    pub(crate) fn status_code(&self) -> u16 {
        match self {
            Self::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE.as_u16(),
            _ => StatusCode::BAD_REQUEST.as_u16(),
        }
    }
}

pub(crate) async fn read_uploads(mut multipart: Multipart) -> Result<Uploads, UploadError> {
    let mut mapping = None;
    let mut table = None;

    while let Some(field) = multipart.next_field().await? {
        let part = match field.name() {
            Some(MAPPING_PART) => MAPPING_PART,
            Some(TABLE_PART) => TABLE_PART,
            other => {
                log::debug!("Ignoring upload part {other:?}");
                continue;
            }
        };
        let expected = if part == MAPPING_PART { ".json" } else { ".csv" };
        check_extension(part, field.file_name(), expected)?;

        let bytes = field.bytes().await?;
        if part == MAPPING_PART {
            mapping = Some(bytes);
        } else {
            table = Some(bytes);
        }
    }

    Ok(Uploads {
        mapping: mapping.ok_or(UploadError::MissingPart(MAPPING_PART))?,
        table: table.ok_or(UploadError::MissingPart(TABLE_PART))?,
    })
}

pub(crate) fn check_extension(
    part: &'static str,
    file_name: Option<&str>,
    expected: &'static str,
) -> Result<(), UploadError> {
    let file_name = file_name.unwrap_or_default();
    if file_name.to_ascii_lowercase().ends_with(expected) {
        return Ok(());
    }
    Err(UploadError::BadExtension {
        part,
        file_name: file_name.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_extension_case_insensitively() {
        check_extension(TABLE_PART, Some("template.CSV"), ".csv").unwrap();
        check_extension(MAPPING_PART, Some("old_to_new.json"), ".json").unwrap();
    }

    #[test]
    fn rejects_wrong_or_missing_file_name() {
        let err = check_extension(TABLE_PART, Some("template.xlsx"), ".csv").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Upload part 'table' must be a .csv file, got 'template.xlsx'"
        );
        assert!(matches!(
            check_extension(MAPPING_PART, None, ".json"),
            Err(UploadError::BadExtension { .. })
        ));
    }
}
