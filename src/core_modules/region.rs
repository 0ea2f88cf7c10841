// THEORY:
// A `Region` is a half-open rectangle of pixel coordinates, `[x0, x1) x [y0, y1)`.
// It is the unit of work for the partitioner: every encode task owns exactly one
// region, and the regions handed to sibling tasks never overlap.
//
// Splitting is by midpoint on both axes, rounding toward the origin, which gives
// four quadrants in a fixed order: top-left, top-right, bottom-left, bottom-right.
// When a region is one pixel wide (or tall) the midpoint lands on the boundary on
// that axis and two of the quadrants come back empty; the other two still shrink,
// so repeated splitting always terminates.

pub mod region {
    /// Half-open pixel rectangle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Region {
        pub x0: u32,
        pub y0: u32,
        pub x1: u32,
        pub y1: u32,
    }

    impl Region {
        /// Builds a region. Inverted bounds are clamped to an empty region.
        pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
            Self {
                x0,
                y0,
                x1: x1.max(x0),
                y1: y1.max(y0),
            }
        }

        /// The region covering a whole `width` x `height` image.
        pub fn full(width: u32, height: u32) -> Self {
            Self::new(0, 0, width, height)
        }

        pub fn width(&self) -> u32 {
            self.x1 - self.x0
        }

        pub fn height(&self) -> u32 {
            self.y1 - self.y0
        }

        pub fn area(&self) -> u64 {
            self.width() as u64 * self.height() as u64
        }

        pub fn is_empty(&self) -> bool {
            self.width() == 0 || self.height() == 0
        }

        /// True when the region is no larger than `edge` on both axes.
        pub fn fits_within(&self, edge: u32) -> bool {
            self.width() <= edge && self.height() <= edge
        }

        /// Splits at the midpoints into `[top_left, top_right, bottom_left, bottom_right]`.
        pub fn quadrants(&self) -> [Region; 4] {
            let mid_x = self.x0 + self.width() / 2;
            let mid_y = self.y0 + self.height() / 2;
            [
                Region::new(self.x0, self.y0, mid_x, mid_y),
                Region::new(mid_x, self.y0, self.x1, mid_y),
                Region::new(self.x0, mid_y, mid_x, self.y1),
                Region::new(mid_x, mid_y, self.x1, self.y1),
            ]
        }

        /// The non-empty quadrants, still in top-left, top-right, bottom-left,
        /// bottom-right order. A one-pixel-wide or one-pixel-tall region has two.
        pub fn split(&self) -> Vec<Region> {
            self.quadrants().into_iter().filter(|q| !q.is_empty()).collect()
        }

        /// Every coordinate in the region, row-major.
        pub fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
            (self.y0..self.y1).flat_map(move |y| (self.x0..self.x1).map(move |x| (x, y)))
        }
    }
}
