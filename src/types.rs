use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side exceeds the matching side of `bounds`.
    pub fn exceeds(&self, bounds: &Size) -> bool {
        self.width > bounds.width || self.height > bounds.height
    }

    pub fn scale(&self, ratio: f64) -> Self {
        Self::new(self.width * ratio, self.height * ratio)
    }

    /// Top-left position that centers `self` inside `container`.
    pub fn centered_in(&self, container: &Size) -> Point {
        Point::new(
            (container.width - self.width) / 2.0,
            (container.height - self.height) / 2.0,
        )
    }
}

/// Sections available in the editor side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidePanelSection {
    Uploads,
}

impl SidePanelSection {
    /// Sections shown in the rail, in order. The stock sections are replaced
    /// entirely by the uploads section.
    pub const ALL: &'static [SidePanelSection] = &[SidePanelSection::Uploads];

    pub fn label(&self) -> &'static str {
        match self {
            SidePanelSection::Uploads => "Uploads",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeds() {
        let bounds = Size::new(600.0, 400.0);
        assert!(Size::new(601.0, 10.0).exceeds(&bounds));
        assert!(Size::new(10.0, 401.0).exceeds(&bounds));
        assert!(!Size::new(600.0, 400.0).exceeds(&bounds));
    }

    #[test]
    fn test_centered_in() {
        let pos = Size::new(600.0, 400.0).centered_in(&Size::new(1080.0, 1080.0));
        assert_eq!(pos, Point::new(240.0, 340.0));
    }
}
