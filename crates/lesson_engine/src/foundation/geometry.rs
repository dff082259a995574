//! Integer rectangles and the clipping math behind scaled texture copies

/// Axis-aligned rectangle in pixel coordinates, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub w: u32,
    /// Height in pixels
    pub h: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle covering a whole `width` x `height` surface
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// True when the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Overlapping part of two rectangles, `None` if they do not overlap
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = i64::from(self.x).max(i64::from(other.x));
        let top = i64::from(self.y).max(i64::from(other.y));
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(Self {
            x: left as i32,
            y: top as i32,
            w: (right - left) as u32,
            h: (bottom - top) as u32,
        })
    }
}

/// Source texels and destination pixels of a copy after clipping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyRegion {
    /// Part of the source texture that lands on screen
    pub src: Rect,
    /// Part of the destination rectangle that is inside the target
    pub dst: Rect,
}

/// Clip a scaled copy of a `src_w` x `src_h` texture into `dst` against a
/// `target_w` x `target_h` surface.
///
/// The source region shrinks in proportion to how much of `dst` was cut off,
/// rounded outward so that at least one texel is always sampled. Returns
/// `None` when nothing would be drawn.
pub fn clip_copy(src_w: u32, src_h: u32, dst: Rect, target_w: u32, target_h: u32) -> Option<CopyRegion> {
    if src_w == 0 || src_h == 0 || dst.is_empty() {
        return None;
    }

    let visible = dst.intersection(&Rect::from_size(target_w, target_h))?;

    let (src_x, src_w_clipped) = scale_span(
        i64::from(visible.x) - i64::from(dst.x),
        i64::from(visible.w),
        i64::from(dst.w),
        i64::from(src_w),
    );
    let (src_y, src_h_clipped) = scale_span(
        i64::from(visible.y) - i64::from(dst.y),
        i64::from(visible.h),
        i64::from(dst.h),
        i64::from(src_h),
    );

    Some(CopyRegion {
        src: Rect::new(src_x as i32, src_y as i32, src_w_clipped as u32, src_h_clipped as u32),
        dst: visible,
    })
}

/// Map a `[offset, offset + len)` span of a `dst_len`-wide destination onto a
/// `src_len`-wide source, returning the source start and length.
fn scale_span(offset: i64, len: i64, dst_len: i64, src_len: i64) -> (i64, i64) {
    let start = offset * src_len / dst_len;
    let end = ((offset + len) * src_len + dst_len - 1) / dst_len;
    let end = end.clamp(start + 1, src_len);
    (start, end - start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_inside_and_disjoint() {
        let screen = Rect::from_size(640, 480);
        let inside = Rect::new(10, 20, 30, 40);
        assert_eq!(inside.intersection(&screen), Some(inside));

        let outside = Rect::new(700, 0, 10, 10);
        assert_eq!(outside.intersection(&screen), None);

        let touching = Rect::new(640, 0, 10, 10);
        assert_eq!(touching.intersection(&screen), None);
    }

    #[test]
    fn test_unclipped_copy_uses_whole_source() {
        let region = clip_copy(64, 32, Rect::new(5, 5, 128, 64), 640, 480).unwrap();
        assert_eq!(region.src, Rect::new(0, 0, 64, 32));
        assert_eq!(region.dst, Rect::new(5, 5, 128, 64));
    }

    #[test]
    fn test_copy_hanging_off_left_edge_drops_source_columns() {
        // Half of a 2x scaled 100px-wide texture is off screen
        let region = clip_copy(100, 10, Rect::new(-100, 0, 200, 20), 640, 480).unwrap();
        assert_eq!(region.dst, Rect::new(0, 0, 100, 20));
        assert_eq!(region.src, Rect::new(50, 0, 50, 10));
    }

    #[test]
    fn test_copy_hanging_off_bottom_right() {
        let region = clip_copy(320, 240, Rect::new(320, 240, 320, 480), 640, 480).unwrap();
        assert_eq!(region.dst, Rect::new(320, 240, 320, 240));
        assert_eq!(region.src, Rect::new(0, 0, 320, 120));
    }

    #[test]
    fn test_tiny_visible_sliver_still_samples_one_texel() {
        let region = clip_copy(4, 4, Rect::new(-399, 0, 400, 4), 640, 480).unwrap();
        assert_eq!(region.dst.w, 1);
        assert_eq!(region.src.w, 1);
        assert_eq!(region.src.x, 3);
    }

    #[test]
    fn test_nothing_to_draw() {
        assert!(clip_copy(10, 10, Rect::new(0, 0, 0, 10), 640, 480).is_none());
        assert!(clip_copy(0, 10, Rect::new(0, 0, 10, 10), 640, 480).is_none());
        assert!(clip_copy(10, 10, Rect::new(-20, -20, 10, 10), 640, 480).is_none());
    }
}
