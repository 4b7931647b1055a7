use futures::future::{FutureExt, LocalBoxFuture};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement};

use crate::editor::{ElementKind, Page};
use crate::types::Size;
use crate::utils::{js_error_message, load_image};

pub const PNG_EXTENSION: &str = ".png";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExportError {
    #[error("please enter a file name")]
    EmptyName,
    #[error("there is no page to export")]
    NoPage,
    #[error("rasterization failed: {0}")]
    Render(String),
    #[error("download failed: {0}")]
    Download(String),
}

impl From<JsValue> for ExportError {
    fn from(value: JsValue) -> Self {
        ExportError::Render(js_error_message(&value))
    }
}

/// A validated, non-blank export file name without its extension.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportName(String);

impl ExportName {
    /// Trims `input` and strips one trailing `.png` in any case.
    pub fn parse(input: &str) -> Result<Self, ExportError> {
        let trimmed = input.trim();
        let stem = match trimmed.len().checked_sub(PNG_EXTENSION.len()) {
            Some(cut)
                if trimmed.is_char_boundary(cut)
                    && trimmed[cut..].eq_ignore_ascii_case(PNG_EXTENSION) =>
            {
                trimmed[..cut].trim_end()
            }
            _ => trimmed,
        };
        if stem.is_empty() {
            return Err(ExportError::EmptyName);
        }
        Ok(Self(stem.to_string()))
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.0, PNG_EXTENSION)
    }
}

/// Renders a page to a PNG data URI.
pub trait Rasterizer {
    fn to_data_url<'a>(&'a self, page: &'a Page) -> LocalBoxFuture<'a, Result<String, ExportError>>;
}

/// Offers a finished export to the user.
pub trait Downloader {
    fn offer(&self, file_name: &str, data_url: &str) -> Result<(), ExportError>;
}

/// Export `page` as `<name>.png`.
///
/// The name is checked before anything else runs, so a blank name never
/// reaches the rasterizer or the downloader. `set_busy` is raised while
/// rendering and always lowered afterwards.
pub async fn export_png<R, D>(
    name: &str,
    page: Option<&Page>,
    rasterizer: &R,
    downloader: &D,
    set_busy: &dyn Fn(bool),
) -> Result<String, ExportError>
where
    R: Rasterizer + ?Sized,
    D: Downloader + ?Sized,
{
    let file_name = ExportName::parse(name)?.file_name();
    let page = page.ok_or(ExportError::NoPage)?;

    set_busy(true);
    let result = match rasterizer.to_data_url(page).await {
        Ok(data_url) => downloader.offer(&file_name, &data_url),
        Err(e) => Err(e),
    };
    set_busy(false);

    match result {
        Ok(()) => {
            log::info!("exported {}", file_name);
            Ok(file_name)
        }
        Err(e) => {
            log::error!("export of {} failed: {}", file_name, e);
            Err(e)
        }
    }
}

/// Draws image elements onto an offscreen canvas with a white background.
pub struct CanvasRasterizer {
    pub page_size: Size,
    pub pixel_ratio: f64,
}

impl CanvasRasterizer {
    pub fn new(page_size: Size, pixel_ratio: f64) -> Self {
        Self {
            page_size,
            pixel_ratio,
        }
    }

    /// Pixel size of the output canvas. Refuses sizes that round to zero,
    /// which the browser would export as an empty `data:,` URL.
    pub fn canvas_size(&self) -> Result<(u32, u32), ExportError> {
        let width = (self.page_size.width * self.pixel_ratio).round();
        let height = (self.page_size.height * self.pixel_ratio).round();
        if !(width >= 1.0 && height >= 1.0 && width.is_finite() && height.is_finite()) {
            return Err(ExportError::Render(format!(
                "canvas would be {}x{} pixels",
                width, height
            )));
        }
        Ok((width as u32, height as u32))
    }

    async fn render(&self, page: &Page, (width, height): (u32, u32)) -> Result<String, JsValue> {
        let canvas: HtmlCanvasElement = gloo_utils::document()
            .create_element("canvas")?
            .dyn_into()?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.scale(self.pixel_ratio, self.pixel_ratio)?;
        ctx.set_fill_style_str("#ffffff");
        ctx.fill_rect(0.0, 0.0, self.page_size.width, self.page_size.height);

        for element in &page.elements {
            match &element.kind {
                ElementKind::Image { src } => {
                    let img = load_image(src).await?;
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        &img,
                        element.position.x,
                        element.position.y,
                        element.size.width,
                        element.size.height,
                    )?;
                }
            }
        }

        canvas.to_data_url_with_type("image/png")
    }
}

impl Rasterizer for CanvasRasterizer {
    fn to_data_url<'a>(&'a self, page: &'a Page) -> LocalBoxFuture<'a, Result<String, ExportError>> {
        async move {
            let size = self.canvas_size()?;
            self.render(page, size).await.map_err(ExportError::from)
        }
        .boxed_local()
    }
}

/// Triggers a browser download through a hidden anchor element.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnchorDownloader;

impl AnchorDownloader {
    fn click_link(file_name: &str, data_url: &str) -> Result<(), JsValue> {
        let document = gloo_utils::document();
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let a: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        a.set_href(data_url);
        a.set_download(file_name);
        a.style().set_property("display", "none")?;

        body.append_child(&a)?;
        a.click();
        a.remove();
        Ok(())
    }
}

impl Downloader for AnchorDownloader {
    fn offer(&self, file_name: &str, data_url: &str) -> Result<(), ExportError> {
        Self::click_link(file_name, data_url)
            .map_err(|e| ExportError::Download(js_error_message(&e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::PageId;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    struct FakeRasterizer {
        result: Result<String, ExportError>,
        calls: Cell<usize>,
    }

    impl FakeRasterizer {
        fn ok() -> Self {
            Self {
                result: Ok("data:image/png;base64,AAAA".into()),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err(ExportError::Render("context lost".into())),
                calls: Cell::new(0),
            }
        }
    }

    impl Rasterizer for FakeRasterizer {
        fn to_data_url<'a>(&'a self, _page: &'a Page) -> LocalBoxFuture<'a, Result<String, ExportError>> {
            self.calls.set(self.calls.get() + 1);
            futures::future::ready(self.result.clone()).boxed_local()
        }
    }

    #[derive(Default)]
    struct RecordingDownloader {
        offered: RefCell<Vec<(String, String)>>,
    }

    impl Downloader for RecordingDownloader {
        fn offer(&self, file_name: &str, data_url: &str) -> Result<(), ExportError> {
            self.offered
                .borrow_mut()
                .push((file_name.to_string(), data_url.to_string()));
            Ok(())
        }
    }

    fn page() -> Page {
        Page::new(PageId(1))
    }

    #[test]
    fn test_name_parsing() {
        assert_eq!(ExportName::parse("  poster ").unwrap().file_name(), "poster.png");
        assert_eq!(ExportName::parse("poster.PNG").unwrap().file_name(), "poster.png");
        assert_eq!(ExportName::parse("poster.jpg").unwrap().file_name(), "poster.jpg.png");
        assert_eq!(ExportName::parse(""), Err(ExportError::EmptyName));
        assert_eq!(ExportName::parse(" \t "), Err(ExportError::EmptyName));
        assert_eq!(ExportName::parse(".png"), Err(ExportError::EmptyName));
    }

    #[test]
    fn test_export_offers_png() {
        let rasterizer = FakeRasterizer::ok();
        let downloader = RecordingDownloader::default();
        let busy = RefCell::new(Vec::new());
        let page = page();

        let file = block_on(export_png(
            "design",
            Some(&page),
            &rasterizer,
            &downloader,
            &|b| busy.borrow_mut().push(b),
        ))
        .unwrap();

        assert_eq!(file, "design.png");
        assert_eq!(
            *downloader.offered.borrow(),
            vec![("design.png".to_string(), "data:image/png;base64,AAAA".to_string())]
        );
        assert_eq!(*busy.borrow(), vec![true, false]);
    }

    #[test]
    fn test_blank_name_aborts_before_rendering() {
        let rasterizer = FakeRasterizer::ok();
        let downloader = RecordingDownloader::default();
        let busy = RefCell::new(Vec::new());
        let page = page();

        let result = block_on(export_png(
            "   ",
            Some(&page),
            &rasterizer,
            &downloader,
            &|b| busy.borrow_mut().push(b),
        ));

        assert_eq!(result, Err(ExportError::EmptyName));
        assert_eq!(rasterizer.calls.get(), 0);
        assert!(downloader.offered.borrow().is_empty());
        assert!(busy.borrow().is_empty());
    }

    #[test]
    fn test_render_failure_clears_busy_and_skips_download() {
        let rasterizer = FakeRasterizer::failing();
        let downloader = RecordingDownloader::default();
        let busy = RefCell::new(Vec::new());
        let page = page();

        let result = block_on(export_png(
            "design",
            Some(&page),
            &rasterizer,
            &downloader,
            &|b| busy.borrow_mut().push(b),
        ));

        assert_eq!(result, Err(ExportError::Render("context lost".into())));
        assert!(downloader.offered.borrow().is_empty());
        assert_eq!(busy.borrow().last(), Some(&false));
    }

    #[test]
    fn test_canvas_size() {
        let rasterizer = CanvasRasterizer::new(Size::new(1080.0, 540.0), 2.0);
        assert_eq!(rasterizer.canvas_size(), Ok((2160, 1080)));

        for ratio in [0.0, -1.0, f64::NAN] {
            let rasterizer = CanvasRasterizer::new(Size::new(1080.0, 540.0), ratio);
            assert!(matches!(rasterizer.canvas_size(), Err(ExportError::Render(_))));
        }
    }

    #[test]
    fn test_missing_page() {
        let rasterizer = FakeRasterizer::ok();
        let downloader = RecordingDownloader::default();

        let result = block_on(export_png("design", None, &rasterizer, &downloader, &|_| {}));
        assert_eq!(result, Err(ExportError::NoPage));
        assert_eq!(rasterizer.calls.get(), 0);
    }
}
