//! Rectangular tile grids.
//!
//! Map generation is the host's business; this builder only lays out a
//! `width × height` lattice with uniform spacing, marks blocked cells, and
//! wires 4- or 8-neighbour adjacency.  Tiles are numbered row-major, so
//! `TileId(row * width + col)`.
//!
//! Adjacency is structural: blocked cells keep their edges and are filtered
//! by walkability at query time.  Diagonals are wired unconditionally (no
//! corner-cutting rule).

use nav_core::{TileId, WorldPos};

use crate::{Connectivity, TileGraph, TileGraphBuilder};

/// Index arithmetic for a row-major grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    pub width:  u32,
    pub height: u32,
}

impl GridLayout {
    /// Tile at `(col, row)`, or `None` outside the grid.
    #[inline]
    pub fn tile(&self, col: u32, row: u32) -> Option<TileId> {
        (col < self.width && row < self.height).then(|| TileId(row * self.width + col))
    }

    /// `(col, row)` of `tile`, or `None` if it is not part of the grid.
    #[inline]
    pub fn coords(&self, tile: TileId) -> Option<(u32, u32)> {
        (tile.index() < self.len()).then(|| (tile.0 % self.width, tile.0 / self.width))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fluent builder for grid-shaped [`TileGraph`]s.
///
/// ```
/// use nav_spatial::{Connectivity, GridBuilder};
///
/// let (graph, layout) = GridBuilder::new(5, 5)
///     .connectivity(Connectivity::FourWay)
///     .block(2, 2)
///     .build();
/// assert_eq!(graph.tile_count(), 25);
/// assert!(!graph.is_walkable(layout.tile(2, 2).unwrap()));
/// ```
pub struct GridBuilder {
    layout:       GridLayout,
    spacing:      f32,
    origin:       WorldPos,
    connectivity: Connectivity,
    blocked:      Vec<bool>,
}

impl GridBuilder {
    /// A fully walkable 4-connected grid with unit spacing at the origin.
    pub fn new(width: u32, height: u32) -> Self {
        let layout = GridLayout { width, height };
        Self {
            layout,
            spacing:      1.0,
            origin:       WorldPos::ZERO,
            connectivity: Connectivity::FourWay,
            blocked:      vec![false; layout.len()],
        }
    }

    /// World distance between orthogonally adjacent tile centres.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// World position of tile `(0, 0)`.
    pub fn origin(mut self, origin: WorldPos) -> Self {
        self.origin = origin;
        self
    }

    /// `FourWay` or `EightWay`.  `Arbitrary` is treated as `FourWay` wiring
    /// but keeps the Euclidean default heuristic.
    pub fn connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Mark `(col, row)` unwalkable.  Out-of-range cells are ignored.
    pub fn block(mut self, col: u32, row: u32) -> Self {
        if let Some(t) = self.layout.tile(col, row) {
            self.blocked[t.index()] = true;
        }
        self
    }

    /// Mark every cell for which `pred(col, row)` holds unwalkable.
    pub fn block_where(mut self, pred: impl Fn(u32, u32) -> bool) -> Self {
        for row in 0..self.layout.height {
            for col in 0..self.layout.width {
                if pred(col, row) {
                    self.blocked[(row * self.layout.width + col) as usize] = true;
                }
            }
        }
        self
    }

    pub fn build(self) -> (TileGraph, GridLayout) {
        let GridLayout { width, height } = self.layout;
        let mut b = TileGraphBuilder::with_capacity(self.layout.len(), self.layout.len() * 4)
            .connectivity(self.connectivity);

        for row in 0..height {
            for col in 0..width {
                let pos = WorldPos::new(
                    self.origin.x + col as f32 * self.spacing,
                    self.origin.y + row as f32 * self.spacing,
                );
                b.add_tile(pos, !self.blocked[(row * width + col) as usize]);
            }
        }

        let layout   = self.layout;
        let diagonal = self.connectivity == Connectivity::EightWay;
        let mut link = |a: TileId, c: Option<TileId>| {
            if let Some(c) = c {
                let wired = b.connect(a, c);
                debug_assert!(wired.is_ok(), "grid wiring produced an invalid edge");
            }
        };
        for row in 0..height {
            for col in 0..width {
                let Some(here) = layout.tile(col, row) else { continue };
                link(here, layout.tile(col + 1, row));
                link(here, layout.tile(col, row + 1));
                if diagonal {
                    link(here, layout.tile(col + 1, row + 1));
                    if col > 0 {
                        link(here, layout.tile(col - 1, row + 1));
                    }
                }
            }
        }

        (b.build(), self.layout)
    }
}
