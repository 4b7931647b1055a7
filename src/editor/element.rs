use crate::types::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub u64);

/// What an element draws
#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    /// Bitmap drawn from a URL (usually a data URI)
    Image { src: String },
}

impl ElementKind {
    pub fn image(src: impl Into<String>) -> Self {
        Self::Image { src: src.into() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Image { .. } => "image",
        }
    }
}

/// Request to create an element. The editor assigns the id.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementDescriptor {
    pub kind: ElementKind,
    pub position: Point,
    pub size: Size,
}

impl ElementDescriptor {
    pub fn image(src: impl Into<String>, position: Point, size: Size) -> Self {
        Self {
            kind: ElementKind::image(src),
            position,
            size,
        }
    }
}

/// An element placed on a page
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Top-left corner in page coordinates
    pub position: Point,
    pub size: Size,
}

impl Element {
    pub fn from_descriptor(id: ElementId, descriptor: ElementDescriptor) -> Self {
        Self {
            id,
            kind: descriptor.kind,
            position: descriptor.position,
            size: descriptor.size,
        }
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.size.width
            && point.y >= self.position.y
            && point.y <= self.position.y + self.size.height
    }
}

/// A page holds elements bottom to top.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub id: PageId,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            elements: Vec::new(),
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Topmost element under `point`
    pub fn hit_test(&self, point: &Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains_point(point))
            .map(|e| e.id)
    }
}
