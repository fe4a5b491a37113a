use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use survey_core::{homography_from_quad, warp_perspective, GrayImage, GrayImageView};

/// Four marker corner points as reported by the marker detector.
///
/// The detector's corner order is not trusted; [`order_corners`] derives a
/// stable geometric order before any geometry is computed.
pub type CornerQuad = [Point2<f32>; 4];

/// Errors raised while rectifying a marker sheet.
#[derive(thiserror::Error, Debug)]
pub enum RectifyError {
    #[error("degenerate marker: sheet extent {width:.2}x{height:.2} px")]
    DegenerateMarker { width: f32, height: f32 },
    #[error("projective mapping is not solvable for the supplied corners")]
    MappingFailed,
}

/// Marker corners in canonical geometric order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrderedQuad {
    pub left_top: Point2<f32>,
    pub right_top: Point2<f32>,
    pub left_bottom: Point2<f32>,
    pub right_bottom: Point2<f32>,
}

/// Canonicalize the corner order of a marker quad.
///
/// The two points with the smaller vertical coordinate form the top pair,
/// the other two the bottom pair; within each pair the smaller horizontal
/// coordinate is "left". Ties on the vertical coordinate break on the
/// horizontal one, so the result is invariant under any permutation of the
/// input corners even when corners share a `y` value.
pub fn order_corners(quad: &CornerQuad) -> OrderedQuad {
    let mut pts = *quad;
    pts.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut top = [pts[0], pts[1]];
    let mut bottom = [pts[2], pts[3]];
    if top[0].x > top[1].x {
        top.swap(0, 1);
    }
    if bottom[0].x > bottom[1].x {
        bottom.swap(0, 1);
    }

    OrderedQuad {
        left_top: top[0],
        right_top: top[1],
        left_bottom: bottom[0],
        right_bottom: bottom[1],
    }
}

/// Where the item sheet sits relative to the marker, in marker-edge units.
///
/// The `u` axis runs along the marker's top edge (left-top toward
/// right-top), `v` along its left edge (left-top toward left-bottom). The
/// sheet is the axis-aligned span `[u_min, u_max] x [v_min, v_max]` in that
/// frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetTemplate {
    pub u_min: f32,
    pub u_max: f32,
    pub v_min: f32,
    pub v_max: f32,
}

impl SheetTemplate {
    /// The marker square itself.
    pub fn marker() -> Self {
        Self {
            u_min: 0.0,
            u_max: 1.0,
            v_min: 0.0,
            v_max: 1.0,
        }
    }

    /// Sheet corners in image space, ordered left-top, right-top,
    /// right-bottom, left-bottom.
    fn corners(&self, quad: &OrderedQuad) -> [Point2<f32>; 4] {
        let origin = quad.left_top;
        let u_axis = quad.right_top - origin;
        let v_axis = quad.left_bottom - origin;
        let at = |u: f32, v: f32| origin + u_axis * u + v_axis * v;
        [
            at(self.u_min, self.v_min),
            at(self.u_max, self.v_min),
            at(self.u_max, self.v_max),
            at(self.u_min, self.v_max),
        ]
    }
}

impl Default for SheetTemplate {
    /// Survey sheet layout: the marker sits in the sheet's top-right
    /// region, so the sheet spans 83/20 marker widths to the left, 17/20 to
    /// the right, 1/4 up, and 15/4 down.
    fn default() -> Self {
        Self {
            u_min: -83.0 / 20.0,
            u_max: 17.0 / 20.0,
            v_min: -1.0 / 4.0,
            v_max: 15.0 / 4.0,
        }
    }
}

/// Rectify the item sheet addressed by a marker quad into an axis-aligned
/// image.
///
/// The output size follows the observed sheet edges: width is the distance
/// between the top corners, height between the left corners. Fails with
/// [`RectifyError::DegenerateMarker`] when either extent collapses below
/// one pixel.
pub fn rectify_sheet(
    image: &GrayImageView<'_>,
    quad: &CornerQuad,
    template: &SheetTemplate,
) -> Result<GrayImage, RectifyError> {
    let ordered = order_corners(quad);
    let sheet = template.corners(&ordered);

    let width = (sheet[0] - sheet[1]).norm();
    let height = (sheet[0] - sheet[3]).norm();
    if width < 1.0 || height < 1.0 {
        return Err(RectifyError::DegenerateMarker { width, height });
    }

    let out_w = width.round() as usize;
    let out_h = height.round() as usize;
    let rect = [
        Point2::new(0.0, 0.0),
        Point2::new(width, 0.0),
        Point2::new(width, height),
        Point2::new(0.0, height),
    ];

    // maps rectified pixels back into the source image for sampling
    let map = homography_from_quad(&rect, &sheet).ok_or(RectifyError::MappingFailed)?;

    log::debug!("rectifying sheet to {out_w}x{out_h}");
    Ok(warp_perspective(image, &map, out_w, out_h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point2<f32> {
        Point2::new(x, y)
    }

    fn ramp_image(width: usize, height: usize) -> GrayImage {
        let data = (0..width * height)
            .map(|i| ((i % width) * 7 % 251) as u8)
            .collect();
        GrayImage::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn orders_any_permutation_the_same_way() {
        let lt = p(10.0, 12.0);
        let rt = p(31.0, 10.0);
        let lb = p(11.0, 30.0);
        let rb = p(33.0, 32.0);
        let expected = order_corners(&[lt, rt, lb, rb]);

        let permutations = [
            [rt, lt, rb, lb],
            [rb, lb, rt, lt],
            [lb, rt, lt, rb],
            [rb, rt, lb, lt],
        ];
        for quad in &permutations {
            assert_eq!(order_corners(quad), expected);
        }
    }

    #[test]
    fn tied_vertical_coordinates_still_order_consistently() {
        // diamond: a marker rotated 45 degrees, middle corners share y
        let quad = [p(5.0, 0.0), p(0.0, 5.0), p(10.0, 5.0), p(5.0, 10.0)];
        let expected = order_corners(&quad);
        assert_eq!(expected.left_top, p(0.0, 5.0));
        assert_eq!(expected.right_top, p(5.0, 0.0));
        assert_eq!(expected.left_bottom, p(5.0, 10.0));
        assert_eq!(expected.right_bottom, p(10.0, 5.0));

        let permutations = [
            [p(10.0, 5.0), p(5.0, 10.0), p(5.0, 0.0), p(0.0, 5.0)],
            [p(0.0, 5.0), p(10.0, 5.0), p(5.0, 10.0), p(5.0, 0.0)],
            [p(5.0, 10.0), p(0.0, 5.0), p(10.0, 5.0), p(5.0, 0.0)],
        ];
        for quad in &permutations {
            assert_eq!(order_corners(quad), expected);
        }
    }

    #[test]
    fn rectified_output_ignores_corner_permutation() {
        let img = ramp_image(64, 64);
        let quad = [p(20.0, 18.0), p(40.0, 20.0), p(19.0, 39.0), p(41.0, 41.0)];
        let template = SheetTemplate::marker();

        let reference = rectify_sheet(&img.view(), &quad, &template).unwrap();
        let shuffled = [quad[3], quad[0], quad[2], quad[1]];
        let other = rectify_sheet(&img.view(), &shuffled, &template).unwrap();
        assert_eq!(reference, other);
    }

    #[test]
    fn axis_aligned_marker_crops_in_place() {
        let img = ramp_image(32, 32);
        let quad = [p(10.0, 10.0), p(20.0, 10.0), p(10.0, 20.0), p(20.0, 20.0)];
        let out = rectify_sheet(&img.view(), &quad, &SheetTemplate::marker()).unwrap();

        assert_eq!(out.width(), 10);
        assert_eq!(out.height(), 10);
        // column values are linear in x, so bilinear sampling is exact
        let v = img.view();
        for x in 0..10 {
            let expected = v.sample_bilinear_u8(10.5 + x as f32, 10.5);
            assert_eq!(out.view().get(x as i32, 0), expected);
        }
    }

    #[test]
    fn default_template_expands_around_the_marker() {
        let quad = [
            p(400.0, 100.0),
            p(420.0, 100.0),
            p(400.0, 120.0),
            p(420.0, 120.0),
        ];
        let ordered = order_corners(&quad);
        let corners = SheetTemplate::default().corners(&ordered);
        // 5 marker widths wide, 4 marker heights tall
        assert!(((corners[0] - corners[1]).norm() - 100.0).abs() < 1e-3);
        assert!(((corners[0] - corners[3]).norm() - 80.0).abs() < 1e-3);
        // marker's left-top sits inside the sheet's right-top region
        assert!(corners[0].x < 400.0 && corners[0].y < 100.0);
    }

    #[test]
    fn degenerate_marker_is_rejected() {
        let img = ramp_image(16, 16);
        let quad = [p(5.0, 5.0), p(5.2, 5.0), p(5.0, 5.3), p(5.2, 5.3)];
        let err = rectify_sheet(&img.view(), &quad, &SheetTemplate::marker()).unwrap_err();
        assert!(matches!(err, RectifyError::DegenerateMarker { .. }));
    }
}
