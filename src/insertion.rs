use std::cell::RefCell;
use std::io::Cursor;

use futures::future::{FutureExt, LocalBoxFuture};
use thiserror::Error;

use crate::editor::{DesignEditor, ElementDescriptor, ElementId};
use crate::types::Size;
use crate::uploads::DataUri;
use crate::utils::{js_error_message, load_image};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProbeError {
    #[error("image source is not a usable data URI: {0}")]
    Source(String),
    #[error("could not read image dimensions: {0}")]
    Unreadable(String),
    #[error("image has no pixels")]
    Empty,
}

#[derive(Debug, Error, PartialEq)]
pub enum InsertError {
    #[error("insertion aborted: {0}")]
    Probe(#[from] ProbeError),
}

/// Finds the intrinsic pixel size of an image source.
pub trait ImageProbe {
    fn probe<'a>(&'a self, src: &'a str) -> LocalBoxFuture<'a, Result<Size, ProbeError>>;
}

fn checked_size(width: u32, height: u32) -> Result<Size, ProbeError> {
    if width == 0 || height == 0 {
        return Err(ProbeError::Empty);
    }
    Ok(Size::new(width as f64, height as f64))
}

/// Reads dimensions from the encoded header of a base64 data URI.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderProbe;

impl HeaderProbe {
    pub fn dimensions(src: &str) -> Result<Size, ProbeError> {
        let uri = DataUri::parse(src).map_err(|e| ProbeError::Source(e.to_string()))?;
        if !uri.is_image() {
            return Err(ProbeError::Source(format!("{} is not an image", uri.mime)));
        }
        let bytes = uri.decode().map_err(|e| ProbeError::Source(e.to_string()))?;
        let (width, height) = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ProbeError::Unreadable(e.to_string()))?
            .into_dimensions()
            .map_err(|e| ProbeError::Unreadable(e.to_string()))?;
        checked_size(width, height)
    }
}

impl ImageProbe for HeaderProbe {
    fn probe<'a>(&'a self, src: &'a str) -> LocalBoxFuture<'a, Result<Size, ProbeError>> {
        futures::future::ready(Self::dimensions(src)).boxed_local()
    }
}

/// Lets the browser decode the image. Handles every format the browser
/// does, SVG included.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserProbe;

impl ImageProbe for BrowserProbe {
    fn probe<'a>(&'a self, src: &'a str) -> LocalBoxFuture<'a, Result<Size, ProbeError>> {
        async move {
            let img = load_image(src)
                .await
                .map_err(|e| ProbeError::Unreadable(js_error_message(&e)))?;
            checked_size(img.natural_width(), img.natural_height())
        }
        .boxed_local()
    }
}

/// Size an image of `intrinsic` dimensions takes inside `bounds`. Images that
/// overflow either side are scaled down uniformly; smaller ones are untouched.
pub fn fit_within(intrinsic: Size, bounds: Size) -> Size {
    if !intrinsic.exceeds(&bounds) {
        return intrinsic;
    }
    let ratio = (bounds.width / intrinsic.width).min(bounds.height / intrinsic.height);
    intrinsic.scale(ratio)
}

/// Decides where and how large an uploaded image lands on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertionPolicy {
    pub max_size: Size,
}

impl InsertionPolicy {
    pub fn new(max_size: Size) -> Self {
        Self { max_size }
    }

    /// Descriptor for an image centered on a page of `page_size`.
    pub fn place(&self, src: &str, intrinsic: Size, page_size: Size) -> ElementDescriptor {
        let size = fit_within(intrinsic, self.max_size);
        ElementDescriptor::image(src, size.centered_in(&page_size), size)
    }
}

/// Probe `src`, then create an image element for it and make that element
/// the selection. A failed probe leaves the editor untouched.
pub async fn insert_image<E, P>(
    editor: &RefCell<E>,
    probe: &P,
    policy: &InsertionPolicy,
    src: &str,
) -> Result<ElementId, InsertError>
where
    E: DesignEditor + ?Sized,
    P: ImageProbe + ?Sized,
{
    let intrinsic = match probe.probe(src).await {
        Ok(size) => size,
        Err(e) => {
            log::error!("failed to insert image: {}", e);
            return Err(e.into());
        }
    };

    // Borrow only once the probe has resolved
    let mut editor = editor.borrow_mut();
    let descriptor = policy.place(src, intrinsic, editor.page_size());
    let id = editor.add_element(descriptor);
    editor.select_elements(&[id]);
    log::info!(
        "inserted image {}x{} as {:?}",
        intrinsic.width,
        intrinsic.height,
        id
    );
    Ok(id)
}
