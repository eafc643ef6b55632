//! Pixel format conversion between the RGB surface and RGBA framebuffers.

use rayon::prelude::*;
use thiserror::Error;

/// Pixels converted per rayon task.
const PIXELS_PER_TASK: usize = 4096;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PixelFormatError {
    #[error("rgb buffer length {0} is not a multiple of 3")]
    PartialPixel(usize),
    #[error("rgba buffer length {actual} does not match expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Copies RGB pixel data to RGBA, setting alpha to 255.
///
/// `dst` must hold exactly four bytes for every three in `src`.
pub fn copy_rgb_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), PixelFormatError> {
    if src.len() % 3 != 0 {
        return Err(PixelFormatError::PartialPixel(src.len()));
    }

    let expected = (src.len() / 3) * 4;
    if dst.len() != expected {
        return Err(PixelFormatError::SizeMismatch {
            expected,
            actual: dst.len(),
        });
    }

    src.par_chunks(PIXELS_PER_TASK * 3)
        .zip(dst.par_chunks_mut(PIXELS_PER_TASK * 4))
        .for_each(|(src_run, dst_run)| {
            for (src_pixel, dst_pixel) in src_run.chunks_exact(3).zip(dst_run.chunks_exact_mut(4)) {
                dst_pixel[..3].copy_from_slice(src_pixel);
                dst_pixel[3] = 255;
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_rgb_to_rgba_known_values() {
        let src = vec![
            255, 0, 0, // red
            0, 255, 0, // green
            0, 0, 255, // blue
            255, 255, 255, // white
        ];
        let mut dst = vec![0; (src.len() / 3) * 4];

        copy_rgb_to_rgba(&src, &mut dst).unwrap();

        assert_eq!(
            dst,
            vec![
                255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 255, 255
            ]
        );
    }

    #[test]
    fn test_copy_rgb_to_rgba_empty_buffers() {
        let mut dst: Vec<u8> = vec![];

        copy_rgb_to_rgba(&[], &mut dst).unwrap();

        assert!(dst.is_empty());
    }

    #[test]
    fn test_copy_spans_several_tasks() {
        let pixels = PIXELS_PER_TASK * 2 + 7;
        let src: Vec<u8> = (0..pixels * 3).map(|i| (i % 251) as u8).collect();
        let mut dst = vec![0; pixels * 4];

        copy_rgb_to_rgba(&src, &mut dst).unwrap();

        for (index, (rgb, rgba)) in src.chunks_exact(3).zip(dst.chunks_exact(4)).enumerate() {
            assert_eq!(&rgba[..3], rgb, "pixel {index}");
            assert_eq!(rgba[3], 255, "pixel {index}");
        }
    }

    #[test]
    fn test_rejects_partial_pixel() {
        let mut dst = vec![0; 4];

        assert_eq!(
            copy_rgb_to_rgba(&[1, 2], &mut dst),
            Err(PixelFormatError::PartialPixel(2))
        );
    }

    #[test]
    fn test_rejects_wrong_destination_size() {
        let mut dst = vec![0; 3];

        assert_eq!(
            copy_rgb_to_rgba(&[1, 2, 3], &mut dst),
            Err(PixelFormatError::SizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }
}
