//! Adapters between `image::GrayImage` and the mission core's frame types.
//!
//! Hosts that capture through the `image` crate convert here once at the
//! boundary; everything past the [`mission::Camera`](crate::mission::Camera)
//! trait works on the lightweight `survey-core` buffers.

use crate::{core, vision};

/// Errors produced by the facade adapters.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error(transparent)]
    Rectify(#[from] vision::RectifyError),
}

/// Borrow an `image::GrayImage` as a `survey-core` view, without copying.
pub fn gray_view(img: &::image::GrayImage) -> Result<core::GrayImageView<'_>, FrameError> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    core::GrayImageView::new(width, height, img.as_raw()).ok_or(FrameError::InvalidGrayBuffer {
        expected: width * height,
        got: img.as_raw().len(),
    })
}

/// Copy an `image::GrayImage` into an owned `survey-core` frame, the type
/// the [`mission::Camera`](crate::mission::Camera) trait hands out.
pub fn gray_image(img: &::image::GrayImage) -> Result<core::GrayImage, FrameError> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    core::GrayImage::from_raw(width, height, img.as_raw().clone()).ok_or(
        FrameError::InvalidGrayBuffer {
            expected: width * height,
            got: img.as_raw().len(),
        },
    )
}

/// Convert a `survey-core` frame back into an `image::GrayImage`, for
/// saving rectified sheets or other debug output.
pub fn to_image(frame: &core::GrayImage) -> Result<::image::GrayImage, FrameError> {
    let expected = frame.width() * frame.height();
    ::image::GrayImage::from_raw(
        frame.width() as u32,
        frame.height() as u32,
        frame.data().to_vec(),
    )
    .ok_or(FrameError::InvalidGrayBuffer {
        expected,
        got: frame.data().len(),
    })
}

/// Rectify the sheet addressed by a marker straight from an
/// `image::GrayImage` frame.
pub fn rectify_marker_sheet(
    img: &::image::GrayImage,
    corners: &vision::CornerQuad,
    template: &vision::SheetTemplate,
) -> Result<core::GrayImage, FrameError> {
    let view = gray_view(img)?;
    Ok(vision::rectify_sheet(&view, corners, template)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn checker(width: u32, height: u32) -> ::image::GrayImage {
        ::image::GrayImage::from_fn(width, height, |x, y| {
            ::image::Luma([if (x + y) % 2 == 0 { 200 } else { 40 }])
        })
    }

    #[test]
    fn gray_image_round_trips_through_core() {
        let img = checker(8, 6);
        let frame = gray_image(&img).unwrap();
        assert_eq!(frame.width(), 8);
        assert_eq!(frame.height(), 6);
        let back = to_image(&frame).unwrap();
        assert_eq!(back.as_raw(), img.as_raw());
    }

    #[test]
    fn view_borrows_without_copying() {
        let img = checker(4, 4);
        let view = gray_view(&img).unwrap();
        assert_eq!(view.get(0, 0), 200);
        assert_eq!(view.get(1, 0), 40);
    }

    #[test]
    fn marker_sheet_rectifies_from_an_image_frame() {
        let img = checker(64, 64);
        let corners = [
            Point2::new(20.0, 20.0),
            Point2::new(40.0, 20.0),
            Point2::new(20.0, 40.0),
            Point2::new(40.0, 40.0),
        ];
        let sheet =
            rectify_marker_sheet(&img, &corners, &vision::SheetTemplate::marker()).unwrap();
        assert!(sheet.width() > 0 && sheet.height() > 0);
    }

    #[test]
    fn degenerate_marker_surfaces_the_rectify_error() {
        let img = checker(64, 64);
        let corners = [Point2::new(10.0, 10.0); 4];
        let err =
            rectify_marker_sheet(&img, &corners, &vision::SheetTemplate::marker()).unwrap_err();
        assert!(matches!(err, FrameError::Rectify(_)));
    }
}
