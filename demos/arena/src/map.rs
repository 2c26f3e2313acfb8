//! ASCII arena maps.

use anyhow::{Result, bail};

use nav_spatial::{GridBuilder, GridLayout, TileGraph};

/// `#` is wall, `.` is floor.  Row 0 is the first line.
pub const ARENA: &str = "\
################
#..............#
#..####....#...#
#..#.......#...#
#..#...#####...#
#......#.......#
#####..#..###..#
#......#....#..#
#..##.......#..#
#...#...##..#..#
#...#....#.....#
################";

/// Parse `map` into a 4-connected grid with unit spacing.
pub fn parse(map: &str) -> Result<(TileGraph, GridLayout)> {
    let rows: Vec<&[u8]> = map.lines().map(str::as_bytes).collect();
    let height = rows.len();
    let width  = rows.first().map_or(0, |r| r.len());
    if width == 0 {
        bail!("empty map");
    }

    let mut walls = vec![false; width * height];
    for (r, row) in rows.iter().enumerate() {
        if row.len() != width {
            bail!("map row {r} has {} cells, expected {width}", row.len());
        }
        for (c, &cell) in row.iter().enumerate() {
            walls[r * width + c] = match cell {
                b'#' => true,
                b'.' => false,
                other => bail!("unknown map cell {:?} at ({c}, {r})", other as char),
            };
        }
    }

    let w = width as u32;
    Ok(GridBuilder::new(w, height as u32)
        .block_where(|c, r| walls[(r * w + c) as usize])
        .build())
}
