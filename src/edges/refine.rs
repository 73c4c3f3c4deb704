//! Morphological clean-up of binary edge maps.
//!
//! Closing bridges one-pixel gaps, opening drops isolated specks, and the
//! component filter removes 8-connected blobs below a pixel-count floor.
//! Closing runs before opening so that reconnected segments survive.
use super::canny::EDGE_ON;
use crate::types::EdgeMap;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::close;
use imageproc::region_labelling::{connected_components, Connectivity};
use log::debug;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefineOptions {
    pub apply_morphology: bool,
    pub remove_small_components: bool,
    pub min_component_size: u32,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            apply_morphology: true,
            remove_small_components: true,
            min_component_size: 100,
        }
    }
}

/// 2×2 elliptical element: the anchor plus its left and upper neighbours.
const OPEN_ELEMENT: [(i64, i64); 3] = [(0, 0), (-1, 0), (0, -1)];

fn is_on(img: &GrayImage, x: i64, y: i64) -> Option<bool> {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return None;
    }
    Some(img.get_pixel(x as u32, y as u32).0[0] > 0)
}

/// Opening with the 2×2 element. The dilation uses the reflected element so
/// that surviving structures stay in place.
pub fn open_small(edges: &EdgeMap) -> EdgeMap {
    let eroded = GrayImage::from_fn(edges.width(), edges.height(), |x, y| {
        let keep = OPEN_ELEMENT
            .iter()
            .all(|&(dx, dy)| is_on(edges, x as i64 + dx, y as i64 + dy).unwrap_or(true));
        Luma([if keep { EDGE_ON } else { 0 }])
    });
    GrayImage::from_fn(edges.width(), edges.height(), |x, y| {
        let hit = OPEN_ELEMENT
            .iter()
            .any(|&(dx, dy)| is_on(&eroded, x as i64 - dx, y as i64 - dy).unwrap_or(false));
        Luma([if hit { EDGE_ON } else { 0 }])
    })
}

/// Closing with the 3×3 cross.
pub fn close_gaps(edges: &EdgeMap) -> EdgeMap {
    close(edges, Norm::L1, 1)
}

/// Zero every 8-connected component with fewer than `min_size` pixels.
pub fn remove_small_components(edges: &EdgeMap, min_size: u32) -> EdgeMap {
    let labels = connected_components(edges, Connectivity::Eight, Luma([0u8]));
    let n_labels = labels.pixels().map(|p| p.0[0]).max().unwrap_or(0) as usize;
    let mut sizes = vec![0u32; n_labels + 1];
    for p in labels.pixels() {
        sizes[p.0[0] as usize] += 1;
    }
    let removed = sizes.iter().skip(1).filter(|&&s| s < min_size).count();
    debug!("component filter: {n_labels} components, {removed} below {min_size} px");
    GrayImage::from_fn(edges.width(), edges.height(), |x, y| {
        let label = labels.get_pixel(x, y).0[0] as usize;
        Luma([if label != 0 && sizes[label] >= min_size { EDGE_ON } else { 0 }])
    })
}

pub fn refine_edges(edges: &EdgeMap, options: &RefineOptions) -> EdgeMap {
    let mut refined = edges.clone();
    if options.apply_morphology {
        refined = open_small(&close_gaps(&refined));
    }
    if options.remove_small_components {
        refined = remove_small_components(&refined, options.min_component_size);
    }
    refined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_from(rows: &[&str]) -> GrayImage {
        GrayImage::from_fn(rows[0].len() as u32, rows.len() as u32, |x, y| {
            let on = rows[y as usize].as_bytes()[x as usize] == b'#';
            Luma([if on { EDGE_ON } else { 0 }])
        })
    }

    #[test]
    fn closing_bridges_single_pixel_gap() {
        let edges = map_from(&[
            ".......",
            ".##.##.",
            ".##.##.",
            ".##.##.",
            ".......",
        ]);
        let closed = close_gaps(&edges);
        assert_eq!(closed.get_pixel(3, 2).0[0], EDGE_ON);
        assert_eq!(closed.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn opening_drops_speck_and_blob_corner() {
        let edges = map_from(&[
            "........",
            ".#......",
            "........",
            "....###.",
            "....###.",
            "....###.",
        ]);
        let opened = open_small(&edges);
        assert_eq!(opened.get_pixel(1, 1).0[0], 0);
        // no placement of the L-shaped element covers the top-left corner
        assert_eq!(opened.get_pixel(4, 3).0[0], 0);
        for y in 3..6 {
            for x in 4..7 {
                if (x, y) != (4, 3) {
                    assert_eq!(opened.get_pixel(x, y).0[0], EDGE_ON, "({x},{y})");
                }
            }
        }
    }

    #[test]
    fn small_components_are_removed() {
        let mut edges = GrayImage::new(30, 30);
        for x in 0..20 {
            edges.put_pixel(x, 5, Luma([EDGE_ON]));
        }
        edges.put_pixel(25, 25, Luma([EDGE_ON]));
        let out = remove_small_components(&edges, 10);
        assert_eq!(out.get_pixel(10, 5).0[0], EDGE_ON);
        assert_eq!(out.get_pixel(25, 25).0[0], 0);
    }

    #[test]
    fn refinement_keeps_binary_output() {
        let edges = map_from(&["##..#", "##...", "....#"]);
        let out = refine_edges(&edges, &RefineOptions::default());
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == EDGE_ON));
    }
}
