use std::cell::RefCell;

use futures::future::join_all;
use gloo::file::futures::read_as_bytes;
use gloo::file::File;
use thiserror::Error;

use super::data_uri::DataUri;
use super::store::{NewUpload, UploadStore};

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("{name}: could not read file: {reason}")]
    Read { name: String, reason: String },
    #[error("{name}: file is empty")]
    Empty { name: String },
    #[error("{name}: {mime} is not an image")]
    NotAnImage { name: String, mime: String },
    #[error("{name}: unrecognized image format")]
    UnknownFormat { name: String },
}

/// Pick the MIME type for an upload. The browser-reported type wins; when the
/// browser gives none, the format is sniffed from the file header.
fn resolve_mime(name: &str, reported: &str, bytes: &[u8]) -> Result<String, DecodeError> {
    if reported.starts_with("image/") {
        return Ok(reported.to_string());
    }
    if !reported.is_empty() {
        return Err(DecodeError::NotAnImage {
            name: name.to_string(),
            mime: reported.to_string(),
        });
    }

    image::guess_format(bytes)
        .map(|format| format.to_mime_type().to_string())
        .map_err(|_| DecodeError::UnknownFormat {
            name: name.to_string(),
        })
}

/// Turn the raw bytes of a picked file into an upload carrying a data URI.
pub fn encode_upload(name: &str, reported_mime: &str, bytes: &[u8]) -> Result<NewUpload, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty {
            name: name.to_string(),
        });
    }
    let mime = resolve_mime(name, reported_mime, bytes)?;
    Ok(NewUpload::new(name, DataUri::encode(&mime, bytes).to_uri()))
}

pub async fn decode_file(file: File) -> Result<NewUpload, DecodeError> {
    let name = file.name();
    let bytes = read_as_bytes(&file).await.map_err(|e| DecodeError::Read {
        name: name.clone(),
        reason: e.to_string(),
    })?;
    encode_upload(&name, &file.raw_mime_type(), &bytes)
}

/// Decode a batch of files concurrently. Results come back in the order the
/// files were picked, whatever order the reads finish in.
pub async fn decode_files(files: Vec<File>) -> Vec<Result<NewUpload, DecodeError>> {
    join_all(files.into_iter().map(decode_file)).await
}

/// Add the decoded uploads of a batch to `store` in order. Failures are
/// logged and returned as messages; they never stop the rest of the batch.
pub fn apply_decoded(
    store: &RefCell<UploadStore>,
    results: Vec<Result<NewUpload, DecodeError>>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(upload) => {
                UploadStore::add_shared(store, upload);
            }
            Err(e) => {
                log::error!("{}", e);
                errors.push(e.to_string());
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_reported_mime_is_used() {
        let upload = encode_upload("cat.jpg", "image/jpeg", b"abc").unwrap();
        assert_eq!(upload.name, "cat.jpg");
        assert_eq!(upload.url, "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn test_missing_mime_is_sniffed() {
        let upload = encode_upload("noext", "", PNG_MAGIC).unwrap();
        assert!(upload.url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_non_image_rejected() {
        let err = encode_upload("notes.txt", "text/plain", b"hello").unwrap_err();
        assert_eq!(
            err,
            DecodeError::NotAnImage {
                name: "notes.txt".into(),
                mime: "text/plain".into()
            }
        );
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = encode_upload("blob", "", b"hello world").unwrap_err();
        assert_eq!(err, DecodeError::UnknownFormat { name: "blob".into() });
    }

    #[test]
    fn test_empty_file_rejected() {
        let err = encode_upload("empty.png", "image/png", &[]).unwrap_err();
        assert_eq!(err.to_string(), "empty.png: file is empty");
    }

    #[test]
    fn test_mixed_batch_adds_successes_in_order() {
        let store = RefCell::new(UploadStore::new());
        let notified = Rc::new(Cell::new(0));
        let count = notified.clone();
        let _sub = store
            .borrow_mut()
            .subscribe(move |_| count.set(count.get() + 1));

        let batch = vec![
            encode_upload("first.png", "image/png", b"one"),
            encode_upload("notes.txt", "text/plain", b"hello"),
            encode_upload("second.gif", "image/gif", b"two"),
        ];
        let errors = apply_decoded(&store, batch);

        assert_eq!(errors, vec!["notes.txt: text/plain is not an image".to_string()]);
        let store = store.borrow();
        let names: Vec<&str> = store.list().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first.png", "second.gif"]);
        assert_eq!(store.list()[1].url, "data:image/gif;base64,dHdv");
        assert_eq!(notified.get(), 2);
    }
}
