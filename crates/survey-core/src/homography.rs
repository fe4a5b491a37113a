use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

use crate::{GrayImage, GrayImageView};

/// Plane projective transform in homogeneous pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    m: Matrix3<f64>,
}

impl Homography {
    pub fn from_matrix(m: Matrix3<f64>) -> Self {
        Self { m }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.m * Vector3::new(p.x as f64, p.y as f64, 1.0);
        Point2::new((v[0] / v[2]) as f32, (v[1] / v[2]) as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(Self::from_matrix)
    }
}

/// Hartley conditioning: translate the four points to their centroid and
/// scale so the mean distance from it is sqrt(2).
fn conditioning_transform(pts: &[Point2<f32>; 4]) -> Matrix3<f64> {
    let mut cx = 0.0_f64;
    let mut cy = 0.0_f64;
    for p in pts {
        cx += p.x as f64;
        cy += p.y as f64;
    }
    cx *= 0.25;
    cy *= 0.25;

    let mut mean_dist = 0.0_f64;
    for p in pts {
        mean_dist += ((p.x as f64 - cx).hypot(p.y as f64 - cy)).abs();
    }
    mean_dist *= 0.25;

    let s = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn condition(pts: &[Point2<f32>; 4], t: &Matrix3<f64>) -> [Point2<f64>; 4] {
    let mut out = [Point2::new(0.0_f64, 0.0_f64); 4];
    for (o, p) in out.iter_mut().zip(pts.iter()) {
        let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
        *o = Point2::new(v[0], v[1]);
    }
    out
}

/// Compute H such that `dst ~ H * src` from exactly four correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Returns `None`
/// when the configuration is degenerate (e.g. three collinear points).
pub fn homography_from_quad(
    src: &[Point2<f32>; 4],
    dst: &[Point2<f32>; 4],
) -> Option<Homography> {
    let t_src = conditioning_transform(src);
    let t_dst = conditioning_transform(dst);
    let s = condition(src, &t_src);
    let d = condition(dst, &t_dst);

    // Fix h33 = 1; for each (x,y) -> (u,v) two linear equations remain:
    //   h11 x + h12 y + h13 - u h31 x - u h32 y = u
    //   h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let (x, y) = (s[k].x, s[k].y);
        let (u, v) = (d[k].x, d[k].y);

        let r = 2 * k;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -u * y;
        b[r] = u;

        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -v * x;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = v;
    }

    let h = a.lu().solve(&b)?;
    let conditioned = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);

    let unconditioned = t_dst.try_inverse()? * conditioned * t_src;
    let scale = unconditioned[(2, 2)];
    if scale.abs() < 1e-12 {
        return None;
    }

    Some(Homography::from_matrix(unconditioned / scale))
}

/// Resample `src` into a `out_w` x `out_h` image.
///
/// `map` takes output pixel coordinates into the source image; every output
/// pixel center is mapped and sampled bilinearly.
pub fn warp_perspective(
    src: &GrayImageView<'_>,
    map: &Homography,
    out_w: usize,
    out_h: usize,
) -> GrayImage {
    let mut out = GrayImage::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let p = map.apply(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
            out.put(x, y, src.sample_bilinear_u8(p.x, p.y));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point2<f32>, b: Point2<f32>, tol: f32) {
        assert!(
            (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol,
            "expected ({:.5},{:.5}) ~ ({:.5},{:.5})",
            a.x,
            a.y,
            b.x,
            b.y
        );
    }

    #[test]
    fn recovers_known_transform() {
        let truth = Homography::from_matrix(Matrix3::new(
            0.9, 0.04, 60.0, //
            -0.03, 1.2, 25.0, //
            0.0007, -0.0003, 1.0,
        ));

        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(200.0_f32, 0.0),
            Point2::new(200.0_f32, 150.0),
            Point2::new(0.0_f32, 150.0),
        ];
        let dst = src.map(|p| truth.apply(p));

        let recovered = homography_from_quad(&src, &dst).expect("solvable");
        for p in [
            Point2::new(10.0_f32, 10.0),
            Point2::new(120.0, 80.0),
            Point2::new(190.0, 140.0),
        ] {
            assert_close(recovered.apply(p), truth.apply(p), 1e-3);
        }
    }

    #[test]
    fn inverse_round_trips() {
        let h = Homography::from_matrix(Matrix3::new(
            1.1, 0.05, 8.0, //
            -0.02, 0.95, -4.0, //
            0.0004, 0.0002, 1.0,
        ));
        let inv = h.inverse().expect("invertible");
        for p in [Point2::new(0.0_f32, 0.0), Point2::new(80.0_f32, 45.0)] {
            assert_close(inv.apply(h.apply(p)), p, 1e-3);
        }
    }

    #[test]
    fn collinear_points_are_rejected() {
        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(1.0_f32, 0.0),
            Point2::new(2.0_f32, 0.0),
            Point2::new(3.0_f32, 0.0),
        ];
        let dst = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(1.0_f32, 1.0),
            Point2::new(2.0_f32, 2.0),
            Point2::new(3.0_f32, 3.0),
        ];
        assert!(homography_from_quad(&src, &dst).is_none());
    }

    #[test]
    fn half_pixel_shift_warp_preserves_pixels() {
        let src = GrayImage::from_raw(2, 2, vec![10, 200, 30, 90]).unwrap();
        // maps each output pixel center (x+0.5, y+0.5) onto the source grid
        // node (x, y), so bilinear sampling lands exactly on the pixels
        let map = Homography::from_matrix(Matrix3::new(
            1.0, 0.0, -0.5, //
            0.0, 1.0, -0.5, //
            0.0, 0.0, 1.0,
        ));
        let out = warp_perspective(&src.view(), &map, 2, 2);
        assert_eq!(out.data(), src.data());
    }
}
