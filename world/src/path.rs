//! Immutable map layout: tile grid plus the polyline enemies walk along.

use glam::Vec2;
use quiz_defence_core::CellCoord;
use thiserror::Error;

const CLASSIC_COLUMNS: u32 = 20;
const CLASSIC_ROWS: u32 = 15;
const CLASSIC_TILE_LENGTH: f32 = 40.0;

#[rustfmt::skip]
const CLASSIC_GRID: [[u8; CLASSIC_COLUMNS as usize]; CLASSIC_ROWS as usize] = [
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
    [1,1,1,1,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
    [0,0,0,0,1,0,0,0,1,1,1,1,1,1,1,0,0,0,0,0],
    [0,0,0,0,1,0,0,0,1,0,0,0,0,0,1,0,0,0,0,0],
    [0,0,0,0,1,1,1,1,1,0,0,0,0,0,1,1,1,1,0,0],
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,0,0],
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,0,0],
    [0,0,1,1,1,1,1,1,1,1,1,0,0,0,0,0,0,1,0,0],
    [0,0,1,0,0,0,0,0,0,0,1,0,0,0,0,0,0,1,0,0],
    [0,0,1,0,0,0,0,0,0,0,1,1,1,1,1,1,1,1,0,0],
    [0,0,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
    [0,0,1,1,1,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
    [0,0,0,0,0,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
    [0,0,0,0,0,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
];

const CLASSIC_WAYPOINTS: [(u32, u32); 17] = [
    (0, 1), (4, 1), (4, 4), (8, 4), (8, 2), (14, 2), (14, 4), (17, 4), (17, 9),
    (10, 9), (10, 7), (2, 7), (2, 11), (5, 11), (5, 13), (15, 13), (19, 13),
];

/// Errors raised while assembling a map layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A path needs a start and an end.
    #[error("a path needs at least two waypoints, got {count}")]
    TooFewWaypoints {
        /// Number of waypoints supplied.
        count: usize,
    },
    /// The tile list does not match the grid dimensions.
    #[error("expected {expected} tiles, got {actual}")]
    TileCountMismatch {
        /// Tiles implied by the dimensions.
        expected: usize,
        /// Tiles supplied.
        actual: usize,
    },
    /// Tiles must have a positive side length.
    #[error("tile length must be positive")]
    InvalidTileLength,
    /// Consecutive route points must share a row or a column.
    #[error("route segment {from:?} -> {to:?} is not axis aligned")]
    DiagonalSegment {
        /// Start of the offending segment.
        from: CellCoord,
        /// End of the offending segment.
        to: CellCoord,
    },
    /// The route crosses a cell that is outside the grid or not a path tile.
    #[error("route crosses {cell:?}, which is not a path tile")]
    RouteOffPath {
        /// First offending cell along the route.
        cell: CellCoord,
    },
}

/// Ordered sequence of waypoints traversed start to end.
#[derive(Clone, Debug, PartialEq)]
pub struct PathModel {
    waypoints: Vec<Vec2>,
}

impl PathModel {
    /// Creates a path from world-space waypoints.
    pub fn new(waypoints: Vec<Vec2>) -> Result<Self, LayoutError> {
        if waypoints.len() < 2 {
            return Err(LayoutError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        Ok(Self { waypoints })
    }

    /// Waypoint at the provided index, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Point where enemies enter the map.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.waypoints[0]
    }

    /// All waypoints in traversal order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }
}

/// Terrain of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Buildable ground.
    Grass,
    /// Part of the enemy route; never buildable.
    Path,
}

/// Tile grid together with the path drawn over it.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    columns: u32,
    rows: u32,
    tile_length: f32,
    tiles: Vec<TileKind>,
    path: PathModel,
}

impl MapLayout {
    /// Assembles a layout from row-major tiles and a tile-space route.
    ///
    /// Route points are tile coordinates; they are converted to tile centres.
    /// Every cell the route crosses must be a path tile.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        tiles: Vec<TileKind>,
        route: &[CellCoord],
    ) -> Result<Self, LayoutError> {
        if tile_length <= 0.0 {
            return Err(LayoutError::InvalidTileLength);
        }
        let expected = columns as usize * rows as usize;
        if tiles.len() != expected {
            return Err(LayoutError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        let waypoints = route
            .iter()
            .map(|cell| cell_center(*cell, tile_length))
            .collect();
        let layout = Self {
            columns,
            rows,
            tile_length,
            tiles,
            path: PathModel::new(waypoints)?,
        };
        for cell in route_cells(route)? {
            if layout.tile(cell) != Some(TileKind::Path) {
                return Err(LayoutError::RouteOffPath { cell });
            }
        }
        Ok(layout)
    }

    /// Layout shipped with the game: a 20×15 field with a winding route.
    #[must_use]
    pub fn classic() -> Self {
        let tiles = CLASSIC_GRID
            .iter()
            .flat_map(|row| row.iter())
            .map(|&tile| if tile == 1 { TileKind::Path } else { TileKind::Grass })
            .collect();
        let waypoints = CLASSIC_WAYPOINTS
            .iter()
            .map(|&(column, row)| cell_center(CellCoord::new(column, row), CLASSIC_TILE_LENGTH))
            .collect();
        Self {
            columns: CLASSIC_COLUMNS,
            rows: CLASSIC_ROWS,
            tile_length: CLASSIC_TILE_LENGTH,
            tiles,
            path: PathModel { waypoints },
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Route enemies follow.
    #[must_use]
    pub fn path(&self) -> &PathModel {
        &self.path
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Terrain at the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileKind> {
        if !self.contains(cell) {
            return None;
        }
        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.tiles.get(index).copied()
    }

    /// Centre of the provided cell in world units.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        cell_center(cell, self.tile_length)
    }
}

/// Expands route corners into every cell the route walks across, in order.
fn route_cells(route: &[CellCoord]) -> Result<Vec<CellCoord>, LayoutError> {
    let mut cells = Vec::new();
    for pair in route.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if from.column() != to.column() && from.row() != to.row() {
            return Err(LayoutError::DiagonalSegment { from, to });
        }
        let columns = span(from.column(), to.column());
        let rows = span(from.row(), to.row());
        for column in columns {
            for row in rows.clone() {
                cells.push(CellCoord::new(column, row));
            }
        }
    }
    Ok(cells)
}

fn span(a: u32, b: u32) -> std::ops::RangeInclusive<u32> {
    a.min(b)..=a.max(b)
}

fn cell_center(cell: CellCoord, tile_length: f32) -> Vec2 {
    Vec2::new(
        cell.column() as f32 * tile_length + tile_length / 2.0,
        cell.row() as f32 * tile_length + tile_length / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_tiles() -> Vec<TileKind> {
        let layout = MapLayout::classic();
        (0..CLASSIC_ROWS)
            .flat_map(|row| (0..CLASSIC_COLUMNS).map(move |column| CellCoord::new(column, row)))
            .map(|cell| layout.tile(cell).expect("cell inside grid"))
            .collect()
    }

    fn classic_route() -> Vec<CellCoord> {
        CLASSIC_WAYPOINTS
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect()
    }

    #[test]
    fn classic_route_follows_path_tiles() {
        let layout = MapLayout::classic();
        for cell in route_cells(&classic_route()).expect("axis aligned route") {
            assert_eq!(
                layout.tile(cell),
                Some(TileKind::Path),
                "route cell {cell:?} is not a path tile",
            );
        }
        assert_eq!(layout.path().waypoints().len(), 17);
        assert_eq!(layout.path().start(), Vec2::new(20.0, 60.0));
        assert_eq!(layout.tile(CellCoord::new(17, 13)), Some(TileKind::Path));
    }

    #[test]
    fn classic_tables_pass_layout_validation() {
        let rebuilt = MapLayout::new(
            CLASSIC_COLUMNS,
            CLASSIC_ROWS,
            CLASSIC_TILE_LENGTH,
            classic_tiles(),
            &classic_route(),
        );
        assert_eq!(rebuilt, Ok(MapLayout::classic()));
    }

    #[test]
    fn route_over_grass_is_rejected() {
        let mut tiles = classic_tiles();
        tiles[13 * CLASSIC_COLUMNS as usize + 17] = TileKind::Grass;
        let error = MapLayout::new(
            CLASSIC_COLUMNS,
            CLASSIC_ROWS,
            CLASSIC_TILE_LENGTH,
            tiles,
            &classic_route(),
        )
        .unwrap_err();
        assert_eq!(
            error,
            LayoutError::RouteOffPath {
                cell: CellCoord::new(17, 13)
            }
        );
    }

    #[test]
    fn diagonal_route_is_rejected() {
        let route = [CellCoord::new(0, 0), CellCoord::new(1, 1)];
        let error = MapLayout::new(2, 2, 10.0, vec![TileKind::Path; 4], &route).unwrap_err();
        assert_eq!(
            error,
            LayoutError::DiagonalSegment {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(1, 1)
            }
        );
    }

    #[test]
    fn path_requires_two_waypoints() {
        assert_eq!(
            PathModel::new(vec![Vec2::ZERO]),
            Err(LayoutError::TooFewWaypoints { count: 1 })
        );
    }

    #[test]
    fn layout_rejects_mismatched_tiles() {
        let route = [CellCoord::new(0, 0), CellCoord::new(1, 0)];
        let error = MapLayout::new(2, 2, 10.0, vec![TileKind::Grass; 3], &route).unwrap_err();
        assert_eq!(
            error,
            LayoutError::TileCountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn out_of_bounds_cells_have_no_tile() {
        let layout = MapLayout::classic();
        assert_eq!(layout.tile(CellCoord::new(20, 0)), None);
        assert_eq!(layout.tile(CellCoord::new(0, 15)), None);
        assert_eq!(layout.tile(CellCoord::new(0, 0)), Some(TileKind::Grass));
    }
}
