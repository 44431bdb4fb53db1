use super::Rect;

/// Guillotine bin packer with a first-fit free list.
///
/// Free space is kept as a list of disjoint rectangles. A placement always
/// lands at the origin of the first free rectangle that can hold it; the rest
/// of that rectangle is cut in two along the shorter leftover axis and the two
/// fragments take its place in the list, smaller area first.
pub struct GuillotinePacker {
    bin_width: u32,
    bin_height: u32,
    padding: u32,
    free_rects: Vec<Rect>,
}

impl GuillotinePacker {
    pub fn new(width: u32, height: u32, padding: u32) -> Self {
        let free_rects = if width > 0 && height > 0 {
            vec![Rect::new(0, 0, width, height)]
        } else {
            Vec::new()
        };

        Self {
            bin_width: width,
            bin_height: height,
            padding,
            free_rects,
        }
    }

    /// Try to insert a rectangle with the given dimensions.
    /// Returns the placed rectangle (without padding) if successful.
    pub fn insert(&mut self, width: u32, height: u32) -> Option<Rect> {
        if width == 0 || height == 0 {
            return None;
        }

        let (slot, reserved_w, reserved_h) =
            self.free_rects.iter().enumerate().find_map(|(i, free)| {
                let (w, h) = self.reserve(free, width, height)?;
                Some((i, w, h))
            })?;
        let free = self.free_rects[slot];

        let fragments = split_free_rect(free, reserved_w, reserved_h);
        self.free_rects.splice(slot..=slot, fragments);

        Some(Rect::new(free.x, free.y, width, height))
    }

    /// Space a `width` x `height` placement claims from `free`, padding
    /// included.
    ///
    /// Padding is reserved to the right and below. It may only be cut short
    /// where `free` ends at the canvas edge.
    fn reserve(&self, free: &Rect, width: u32, height: u32) -> Option<(u32, u32)> {
        let at_right = free.right() == u64::from(self.bin_width);
        let at_bottom = free.bottom() == u64::from(self.bin_height);
        let w = padded_extent(width, self.padding, free.width, at_right)?;
        let h = padded_extent(height, self.padding, free.height, at_bottom)?;
        Some((w, h))
    }

    #[cfg(test)]
    fn free_rects(&self) -> &[Rect] {
        &self.free_rects
    }
}

fn padded_extent(size: u32, padding: u32, available: u32, at_canvas_edge: bool) -> Option<u32> {
    let padded = size.saturating_add(padding);
    if padded <= available {
        Some(padded)
    } else if at_canvas_edge && size <= available {
        Some(available)
    } else {
        None
    }
}

/// Cut the space left in `free` after reserving its top-left
/// `used_w` x `used_h` corner.
///
/// The cut runs along the shorter leftover axis so the larger leftover keeps
/// the full edge of the original rectangle. Zero-area fragments are dropped.
fn split_free_rect(free: Rect, used_w: u32, used_h: u32) -> Vec<Rect> {
    let leftover_w = free.width - used_w;
    let leftover_h = free.height - used_h;

    let (right, below) = if leftover_w < leftover_h {
        // Horizontal cut: the strip below spans the full width
        (
            Rect::new(free.x + used_w, free.y, leftover_w, used_h),
            Rect::new(free.x, free.y + used_h, free.width, leftover_h),
        )
    } else {
        // Vertical cut: the strip on the right spans the full height
        (
            Rect::new(free.x + used_w, free.y, leftover_w, free.height),
            Rect::new(free.x, free.y + used_h, used_w, leftover_h),
        )
    };

    let mut fragments: Vec<Rect> = [right, below]
        .into_iter()
        .filter(|r| r.area() > 0)
        .collect();
    fragments.sort_by_key(Rect::area);
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_disjoint(rects: &[Rect]) {
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_single_insert() {
        let mut packer = GuillotinePacker::new(100, 100, 0);
        let rect = packer.insert(50, 50).unwrap();

        assert_eq!(rect, Rect::new(0, 0, 50, 50));
    }

    #[test]
    fn test_multiple_inserts() {
        let mut packer = GuillotinePacker::new(100, 100, 0);

        let placed: Vec<Rect> = (0..4).map(|_| packer.insert(50, 50).unwrap()).collect();

        // All four 50x50 rects should fit in a 100x100 bin
        assert_disjoint(&placed);
        assert!(placed.iter().all(|r| r.within(100, 100)));
        assert!(packer.insert(1, 1).is_none());
    }

    #[test]
    fn test_too_large() {
        let mut packer = GuillotinePacker::new(100, 100, 1);
        assert!(packer.insert(150, 50).is_none());
        assert!(packer.insert(50, 101).is_none());
    }

    #[test]
    fn test_zero_sized_insert_is_rejected() {
        let mut packer = GuillotinePacker::new(100, 100, 1);
        assert!(packer.insert(0, 10).is_none());
        assert_eq!(packer.free_rects(), &[Rect::new(0, 0, 100, 100)]);
    }

    #[test]
    fn test_exact_fit_ignores_padding() {
        let mut packer = GuillotinePacker::new(64, 64, 1);
        let rect = packer.insert(64, 64).unwrap();

        assert_eq!(rect, Rect::new(0, 0, 64, 64));
        assert!(packer.free_rects().is_empty());
        assert!(packer.insert(1, 1).is_none());
    }

    #[test]
    fn test_padding_separates_neighbours() {
        let mut packer = GuillotinePacker::new(100, 100, 1);
        let a = packer.insert(40, 40).unwrap();
        let b = packer.insert(40, 40).unwrap();

        assert_eq!(a, Rect::new(0, 0, 40, 40));
        // One pixel gap between the two sprites
        let gap_x = b.x.saturating_sub(a.x + a.width);
        let gap_y = b.y.saturating_sub(a.y + a.height);
        assert!(gap_x >= 1 || gap_y >= 1, "{:?} touches {:?}", a, b);
    }

    #[test]
    fn test_split_along_shorter_leftover() {
        // 100x40 leftover below is taller than the 20-wide strip on the right,
        // so the cut is horizontal and the strip below spans the full width.
        let fragments = split_free_rect(Rect::new(0, 0, 100, 100), 80, 60);
        assert_eq!(
            fragments,
            vec![Rect::new(80, 0, 20, 60), Rect::new(0, 60, 100, 40)]
        );

        let fragments = split_free_rect(Rect::new(0, 0, 100, 100), 60, 80);
        // Wider leftover on the right: vertical cut, smaller fragment first
        assert_eq!(
            fragments,
            vec![Rect::new(0, 80, 60, 20), Rect::new(60, 0, 40, 100)]
        );
    }

    #[test]
    fn test_split_drops_empty_fragments() {
        let fragments = split_free_rect(Rect::new(10, 10, 30, 30), 30, 12);
        assert_eq!(fragments, vec![Rect::new(10, 22, 30, 18)]);
    }

    #[test]
    fn test_free_rects_stay_disjoint() {
        let mut packer = GuillotinePacker::new(128, 128, 1);
        let mut placed = Vec::new();
        for (w, h) in [(50, 30), (20, 60), (33, 33), (10, 10), (70, 12), (5, 90)] {
            if let Some(rect) = packer.insert(w, h) {
                placed.push(rect);
            }
            assert_disjoint(packer.free_rects());
        }

        assert_disjoint(&placed);
        for rect in &placed {
            for free in packer.free_rects() {
                assert!(!rect.intersects(free));
            }
        }
    }

    #[test]
    fn test_padding_held_against_inner_free_rects() {
        let mut packer = GuillotinePacker::new(100, 100, 1);
        let a = packer.insert(60, 60).unwrap();
        assert_eq!(a, Rect::new(0, 0, 60, 60));

        // The strip below `a` is 61 wide but ends inside the canvas, so a
        // 61-wide sprite there would touch whatever lands on the right.
        assert!(packer.insert(61, 10).is_none());

        let c = packer.insert(39, 80).unwrap();
        assert_eq!(c, Rect::new(61, 0, 39, 80));

        let b = packer.insert(60, 10).unwrap();
        assert_eq!(b, Rect::new(0, 61, 60, 10));
        assert!(u64::from(c.x) >= b.right() + 1);
    }

    #[test]
    fn test_padding_clamped_only_at_canvas_edge() {
        let mut packer = GuillotinePacker::new(50, 50, 2);
        let a = packer.insert(30, 49).unwrap();
        assert_eq!(a, Rect::new(0, 0, 30, 49));

        // 18 columns remain right of the padding; only an exact fit goes there
        assert!(packer.insert(19, 49).is_none());
        let b = packer.insert(18, 49).unwrap();
        assert_eq!(b, Rect::new(32, 0, 18, 49));
    }
}
