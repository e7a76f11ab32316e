use crate::app::DrawItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Pixel-space rectangle; may extend past the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub fn right(&self) -> i32 {
        self.left.saturating_add(self.width as i32)
    }

    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height as i32)
    }

    /// Intersection with the viewport as `(left, top, right, bottom)`, exclusive end.
    pub fn clipped_to(&self, viewport: Viewport) -> Option<(i32, i32, i32, i32)> {
        let left = self.left.max(0);
        let top = self.top.max(0);
        let right = self.right().min(viewport.width as i32);
        let bottom = self.bottom().min(viewport.height as i32);
        (left < right && top < bottom).then_some((left, top, right, bottom))
    }
}

pub fn draw_item_rect(item: &DrawItem) -> Option<ScreenRect> {
    let values = [item.x, item.y, item.width, item.height];
    if values.iter().any(|value| !value.is_finite()) {
        return None;
    }
    let width = item.width.round();
    let height = item.height.round();
    if width < 1.0 || height < 1.0 {
        return None;
    }
    Some(ScreenRect {
        left: item.x.round() as i32,
        top: item.y.round() as i32,
        width: width as u32,
        height: height as u32,
    })
}
