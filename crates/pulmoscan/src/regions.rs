//! Contour geometry and candidate region extraction.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::backend::Contour;
use crate::config::RegionConfig;

/// One surfaced candidate abnormal region.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CandidateRegion {
    /// Centroid x as a percentage of image width, in [0, 100].
    pub x_percent: f64,
    /// Centroid y as a percentage of image height, in [0, 100].
    pub y_percent: f64,
    /// Polygon area of the region contour (pixels²).
    pub pixel_area: f64,
    /// Mean normalized enhanced intensity under the region, floored by policy.
    pub severity: f64,
}

/// Zeroth and first order spatial moments of a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Centroid `(x, y)`, or `None` for degenerate (zero-area) geometry.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Absolute shoelace area of the closed polygon through `points`.
pub fn polygon_area(points: &[[i32; 2]]) -> f64 {
    polygon_moments(points).m00
}

/// Polygon moments via Green's theorem, oriented so that `m00 >= 0`.
pub fn polygon_moments(points: &[[i32; 2]]) -> Moments {
    let n = points.len();
    if n < 3 {
        return Moments::default();
    }
    let (mut a00, mut a10, mut a01) = (0.0f64, 0.0f64, 0.0f64);
    let mut prev = points[n - 1];
    for &p in points {
        let (xp, yp) = (prev[0] as f64, prev[1] as f64);
        let (x, y) = (p[0] as f64, p[1] as f64);
        let cross = xp * y - x * yp;
        a00 += cross;
        a10 += cross * (xp + x);
        a01 += cross * (yp + y);
        prev = p;
    }
    let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
    Moments {
        m00: sign * a00 / 2.0,
        m10: sign * a10 / 6.0,
        m01: sign * a01 / 6.0,
    }
}

/// Polygon vertices suitable for `imageproc` fills: a repeated closing point
/// is dropped and coordinates are shifted by `-origin`.
fn fill_polygon(points: &[[i32; 2]], origin: [i32; 2]) -> Vec<Point<i32>> {
    let mut poly: Vec<Point<i32>> = points
        .iter()
        .map(|p| Point::new(p[0] - origin[0], p[1] - origin[1]))
        .collect();
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    poly
}

/// Fill the interior and border of `contour` into `canvas` with `value`.
pub fn fill_contour(canvas: &mut GrayImage, contour: &Contour, value: u8) {
    let poly = fill_polygon(&contour.points, [0, 0]);
    match poly.len() {
        0 => {}
        1 | 2 => {
            for p in &poly {
                if p.x >= 0 && p.y >= 0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height() {
                    canvas.put_pixel(p.x as u32, p.y as u32, Luma([value]));
                }
            }
        }
        _ => draw_polygon_mut(canvas, &poly, Luma([value])),
    }
}

/// Mean of `image` under the filled contour, or `None` if it covers no pixel.
pub fn mean_under_contour(image: &GrayImage, contour: &Contour) -> Option<f64> {
    let [x0, y0, x1, y1] = contour.bounding_box()?;
    let x0 = x0.max(0);
    let y0 = y0.max(0);
    let x1 = x1.min(image.width() as i32 - 1);
    let y1 = y1.min(image.height() as i32 - 1);
    if x1 < x0 || y1 < y0 {
        return None;
    }

    // Rasterize into a bounding-box sized mask instead of a full frame.
    let mut mask = GrayImage::new((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
    let local = Contour {
        points: fill_polygon(&contour.points, [x0, y0])
            .into_iter()
            .map(|p| [p.x, p.y])
            .collect(),
        is_hole: contour.is_hole,
        parent: None,
    };
    fill_contour(&mut mask, &local, 255);

    let mut sum = 0u64;
    let mut count = 0u64;
    for (mx, my, m) in mask.enumerate_pixels() {
        if m[0] != 0 {
            sum += image.get_pixel(mx + x0 as u32, my + y0 as u32)[0] as u64;
            count += 1;
        }
    }
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Regions surfaced from one contour set.
#[derive(Debug, Clone)]
pub struct RegionExtraction<'a> {
    /// Reported regions, in contour order.
    pub regions: Vec<CandidateRegion>,
    /// Every contour that passed the area gate (drawn on the overlay).
    pub significant: Vec<&'a Contour>,
    /// Sum of areas of all `significant` contours.
    pub significant_area: f64,
}

/// Gate contours by area and measure each survivor.
///
/// `equalized` is the CLAHE output; severity is measured on it rather than
/// on the raw or smoothed image.
pub fn extract_regions<'a>(
    contours: &'a [Contour],
    equalized: &GrayImage,
    config: &RegionConfig,
) -> RegionExtraction<'a> {
    let (w, h) = equalized.dimensions();
    let mut significant = Vec::new();
    let mut significant_area = 0.0;
    for contour in contours {
        let area = polygon_area(&contour.points);
        if area > config.min_area_px {
            significant.push(contour);
            significant_area += area;
        }
    }

    let mut regions = Vec::with_capacity(significant.len());
    for contour in &significant {
        let moments = polygon_moments(&contour.points);
        let Some((cx, cy)) = moments.centroid() else {
            tracing::debug!(points = contour.points.len(), "skipping degenerate contour");
            continue;
        };
        // Centroids are reported at whole-pixel resolution.
        let cx = cx.trunc();
        let cy = cy.trunc();
        let x_percent = (cx / w as f64 * 100.0).clamp(0.0, 100.0);
        let y_percent = (cy / h as f64 * 100.0).clamp(0.0, 100.0);

        let intensity = mean_under_contour(equalized, contour).unwrap_or(0.0) / 255.0;
        regions.push(CandidateRegion {
            x_percent,
            y_percent,
            pixel_area: moments.m00,
            severity: intensity.max(config.severity_floor),
        });
    }

    RegionExtraction {
        regions,
        significant,
        significant_area,
    }
}
