mod element;
mod store;

pub use element::*;
pub use store::*;

use crate::types::Size;

/// Operations the uploads layer needs from the design editor.
pub trait DesignEditor {
    /// Create an element on the active page, adding a page first if there is none.
    fn add_element(&mut self, descriptor: ElementDescriptor) -> ElementId;

    /// Replace the selection. Ids not on the active page are ignored.
    fn select_elements(&mut self, ids: &[ElementId]);

    /// Append a blank page and make it active.
    fn add_page(&mut self) -> PageId;

    fn page_size(&self) -> Size;
}
