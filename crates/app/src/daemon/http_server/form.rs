//! Multipart form parsing shared by the page and API handlers

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;

/// A file part of a multipart form
#[derive(Debug)]
pub struct UploadedFile {
    /// Name the client sent, unsanitized
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

/// The fields our forms use, whichever of them were present
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    /// base64 signature, surrounding whitespace removed
    pub signature: Option<String>,
    /// PEM public key, surrounding whitespace removed and line endings normalized
    pub public_key: Option<String>,
}

impl UploadForm {
    /// Read every field of the form.
    ///
    /// A file input left empty by a browser arrives as a part with an empty
    /// file name and no data; that counts as no file. Text fields that are
    /// blank after trimming count as missing.
    pub async fn read(multipart: &mut Multipart) -> Result<Self, MultipartError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::error!("Multipart parsing error: {}", e);
            e
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            match field_name.as_str() {
                "file" => {
                    let file_name = field.file_name().map(|s| s.to_string());
                    let data = field.bytes().await.map_err(|e| {
                        tracing::error!("Error reading file data for {:?}: {}", file_name, e);
                        e
                    })?;

                    if file_name.as_deref() == Some("") && data.is_empty() {
                        tracing::debug!("ignoring empty file input");
                        continue;
                    }
                    form.file = Some(UploadedFile {
                        file_name,
                        data: data.to_vec(),
                    });
                }
                "signature" => {
                    let text = field.text().await?;
                    form.signature = non_blank(text.trim());
                }
                "pubkey" | "public_key" => {
                    let text = field.text().await?;
                    form.public_key = non_blank(&text.trim().replace("\r\n", "\n"));
                }
                _ => {
                    tracing::warn!("Ignoring unknown field: {}", field_name);
                }
            }
        }

        Ok(form)
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
