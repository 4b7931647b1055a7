use super::element::{Element, ElementDescriptor, ElementId, Page, PageId};
use super::DesignEditor;
use crate::types::Size;

/// In-memory design document: pages of elements plus the current selection.
pub struct DesignStore {
    pages: Vec<Page>,
    /// Index into `pages` of the page being edited
    active_page: Option<usize>,
    /// Selected element ids, all on the active page
    selection: Vec<ElementId>,
    page_size: Size,
    next_element_id: u64,
    next_page_id: u64,
    /// Bumped on every change so views know to re-render
    revision: u64,
}

impl DesignStore {
    /// Create an empty store with no pages
    pub fn new(page_size: Size) -> Self {
        Self {
            pages: Vec::new(),
            active_page: None,
            selection: Vec::new(),
            page_size,
            next_element_id: 1,
            next_page_id: 1,
            revision: 0,
        }
    }

    /// Create a store holding one blank page
    pub fn with_blank_page(page_size: Size) -> Self {
        let mut store = Self::new(page_size);
        store.add_page();
        store
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.active_page.and_then(|idx| self.pages.get(idx))
    }

    pub fn active_page_id(&self) -> Option<PageId> {
        self.active_page().map(|p| p.id)
    }

    /// Switch editing to another page. Clears the selection.
    pub fn activate_page(&mut self, id: PageId) {
        if let Some(idx) = self.pages.iter().position(|p| p.id == id) {
            if self.active_page != Some(idx) {
                self.active_page = Some(idx);
                self.selection.clear();
                self.touch();
            }
        }
    }

    /// Look up an element on any page
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.pages.iter().find_map(|p| p.element(id))
    }

    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let page = self.page_containing_mut(id)?;
        let pos = page.elements.iter().position(|e| e.id == id)?;
        let element = page.elements.remove(pos);
        self.selection.retain(|&sid| sid != id);
        self.touch();
        Some(element)
    }

    // === Selection ===

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.touch();
        }
    }

    // === Z-Order ===

    /// Move element to the top of its page
    pub fn bring_to_front(&mut self, id: ElementId) {
        if let Some(page) = self.page_containing_mut(id) {
            if let Some(pos) = page.elements.iter().position(|e| e.id == id) {
                let element = page.elements.remove(pos);
                page.elements.push(element);
                self.touch();
            }
        }
    }

    /// Move element to the bottom of its page
    pub fn send_to_back(&mut self, id: ElementId) {
        if let Some(page) = self.page_containing_mut(id) {
            if let Some(pos) = page.elements.iter().position(|e| e.id == id) {
                let element = page.elements.remove(pos);
                page.elements.insert(0, element);
                self.touch();
            }
        }
    }

    /// Counter that changes whenever the document or selection changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn page_containing_mut(&mut self, id: ElementId) -> Option<&mut Page> {
        self.pages
            .iter_mut()
            .find(|p| p.elements.iter().any(|e| e.id == id))
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl DesignEditor for DesignStore {
    fn add_element(&mut self, descriptor: ElementDescriptor) -> ElementId {
        if self.active_page.is_none() {
            self.add_page();
        }
        let id = ElementId(self.next_element_id);
        self.next_element_id += 1;

        let idx = self.active_page.unwrap_or(0);
        if let Some(page) = self.pages.get_mut(idx) {
            page.elements.push(Element::from_descriptor(id, descriptor));
        }
        self.touch();
        id
    }

    fn select_elements(&mut self, ids: &[ElementId]) {
        let selection: Vec<ElementId> = match self.active_page() {
            Some(page) => ids
                .iter()
                .copied()
                .filter(|&id| page.element(id).is_some())
                .fold(Vec::new(), |mut acc, id| {
                    if !acc.contains(&id) {
                        acc.push(id);
                    }
                    acc
                }),
            None => Vec::new(),
        };
        self.selection = selection;
        self.touch();
    }

    fn add_page(&mut self) -> PageId {
        let id = PageId(self.next_page_id);
        self.next_page_id += 1;
        self.pages.push(Page::new(id));
        self.active_page = Some(self.pages.len() - 1);
        self.selection.clear();
        self.touch();
        id
    }

    fn page_size(&self) -> Size {
        self.page_size
    }
}
