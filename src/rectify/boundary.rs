use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::{approximate_polygon_dp, arc_length, convex_hull};
use imageproc::point::Point;
use tracing::debug;

use crate::models::{PageBoundary, Quadrilateral};

/// Locate the page outline in a binary edge map.
///
/// Every external contour is reduced to its convex hull, and the hull is
/// simplified to a polygon with a tolerance proportional to the hull's
/// perimeter, which keeps the simplification scale-invariant across image
/// resolutions. The largest polygon wins, provided it clears `min_area`
/// (in squared pixels); a winner without exactly four vertices means boundary
/// detection failed for this page and the caller falls back to the
/// unrectified image.
pub fn find_page_boundary(
    edges: &GrayImage,
    min_area: f64,
    simplify_tolerance: f64,
) -> PageBoundary {
    let contours = find_contours::<i32>(edges);

    let mut best: Option<(f64, Vec<Point<i32>>)> = None;
    for contour in &contours {
        if contour.border_type != BorderType::Outer || contour.points.len() < 3 {
            continue;
        }

        let hull = convex_hull(contour.points.as_slice());
        if hull.len() < 3 {
            continue;
        }

        let epsilon = simplify_tolerance * arc_length(&hull, true);
        let polygon = approximate_polygon_dp(&hull, epsilon, true);
        let area = polygon_area(&polygon);
        if area < min_area {
            continue;
        }

        // Strictly-greater keeps the first of equally sized polygons, so the
        // selection does not depend on allocation order.
        if best.as_ref().is_none_or(|(best_area, _)| area > *best_area) {
            best = Some((area, polygon));
        }
    }

    match best {
        Some((area, polygon)) if polygon.len() == 4 => {
            let corners = [
                (polygon[0].x as f32, polygon[0].y as f32),
                (polygon[1].x as f32, polygon[1].y as f32),
                (polygon[2].x as f32, polygon[2].y as f32),
                (polygon[3].x as f32, polygon[3].y as f32),
            ];
            debug!(area, "page boundary located");
            PageBoundary::Found(Quadrilateral::from_unordered(corners))
        }
        Some((area, polygon)) => {
            debug!(
                area,
                vertices = polygon.len(),
                "largest contour does not simplify to four corners"
            );
            PageBoundary::NotFound
        }
        None => {
            debug!(min_area, "no contour clears the area floor");
            PageBoundary::NotFound
        }
    }
}

/// Shoelace area of a closed polygon.
fn polygon_area(polygon: &[Point<i32>]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut doubled = 0i64;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        doubled += i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y);
    }
    (doubled.abs() as f64) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_area_of_rectangle() {
        let rect = vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 5),
            Point::new(0, 5),
        ];
        assert_eq!(polygon_area(&rect), 50.0);
    }

    #[test]
    fn polygon_area_ignores_winding() {
        let rect = vec![
            Point::new(0, 5),
            Point::new(10, 5),
            Point::new(10, 0),
            Point::new(0, 0),
        ];
        assert_eq!(polygon_area(&rect), 50.0);
    }

    #[test]
    fn blank_edge_map_finds_nothing() {
        let edges = GrayImage::new(100, 100);
        let boundary = find_page_boundary(&edges, 1000.0, 0.02);
        assert_eq!(boundary, PageBoundary::NotFound);
    }
}
