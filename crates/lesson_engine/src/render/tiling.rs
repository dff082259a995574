//! Square tiling of the window

/// Grid of equal square tiles covering a surface from the top-left
///
/// Only whole tiles are counted: a surface that is not a multiple of the
/// tile size keeps an undrawn strip along its right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    tile_size: u32,
    columns: u32,
    rows: u32,
}

impl TileGrid {
    /// Grid of `tile_size` squares over a `width` x `height` surface
    ///
    /// A zero tile size yields an empty grid.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        let (columns, rows) = if tile_size == 0 {
            (0, 0)
        } else {
            (width / tile_size, height / tile_size)
        };
        Self {
            tile_size,
            columns,
            rows,
        }
    }

    /// Tiles per row
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Tiles per column
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of one tile
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Total number of tiles
    pub fn len(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// True when no tile fits
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-left corner of tile `index`, counting row by row
    pub fn origin(&self, index: usize) -> Option<(i32, i32)> {
        if index >= self.len() {
            return None;
        }
        let columns = self.columns as usize;
        let size = self.tile_size as usize;
        let x = (index % columns) * size;
        let y = (index / columns) * size;
        Some((x as i32, y as i32))
    }

    /// Every tile origin in row-major order
    pub fn origins(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.len()).filter_map(move |index| self.origin(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_grid() {
        let grid = TileGrid::new(640, 480, 40);
        assert_eq!(grid.columns(), 16);
        assert_eq!(grid.rows(), 12);
        assert_eq!(grid.len(), 192);
        assert_eq!(grid.origin(0), Some((0, 0)));
        assert_eq!(grid.origin(15), Some((600, 0)));
        assert_eq!(grid.origin(16), Some((0, 40)));
        assert_eq!(grid.origin(191), Some((600, 440)));
        assert_eq!(grid.origin(192), None);
    }

    #[test]
    fn test_origins_are_row_major() {
        let origins: Vec<_> = TileGrid::new(100, 60, 40).origins().collect();
        assert_eq!(origins, vec![(0, 0), (40, 0)]);
    }

    #[test]
    fn test_partial_tiles_are_skipped() {
        let grid = TileGrid::new(650, 470, 40);
        assert_eq!((grid.columns(), grid.rows()), (16, 11));
        let (x, y) = grid.origins().last().unwrap();
        assert!(x + 40 <= 650 && y + 40 <= 470);
    }

    #[test]
    fn test_degenerate_grids() {
        assert!(TileGrid::new(640, 480, 0).is_empty());
        assert!(TileGrid::new(30, 480, 40).is_empty());
        assert_eq!(TileGrid::new(640, 480, 0).origins().count(), 0);
    }
}
