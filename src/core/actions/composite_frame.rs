use crate::core::actions::ports::pixel_surface::PixelSurface;
use crate::core::data::point::Point;
use crate::core::data::stream_frame::PixelBatch;

/// What happened to the pixels of one batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CompositeStats {
    pub written: u64,
    pub out_of_bounds: u64,
    pub unknown_index: u64,
}

impl CompositeStats {
    pub fn merge(&mut self, other: CompositeStats) {
        self.written += other.written;
        self.out_of_bounds += other.out_of_bounds;
        self.unknown_index += other.unknown_index;
    }

    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.out_of_bounds + self.unknown_index
    }
}

/// Paints a batch onto the surface using the batch's own palette.
///
/// Plain overwrite: whichever batch touches a pixel last decides its colour.
/// Pixels that fall off the surface or name a colour the palette lacks are
/// skipped, the rest of the batch still lands.
pub fn composite_frame<S: PixelSurface + ?Sized>(batch: &PixelBatch, surface: &mut S) -> CompositeStats {
    let mut stats = CompositeStats::default();

    for (i, column) in batch.data.iter().enumerate() {
        for (j, &index) in column.iter().enumerate() {
            let Some(colour) = batch.palette.get(index) else {
                stats.unknown_index += 1;
                continue;
            };

            let x = batch.origin.x as i64 + i as i64;
            let y = batch.origin.y as i64 + j as i64;
            let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
                stats.out_of_bounds += 1;
                continue;
            };

            match surface.set_pixel(Point { x, y }, colour) {
                Ok(()) => stats.written += 1,
                Err(_) => stats.out_of_bounds += 1,
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::decode_frame::decode_frame;
    use crate::core::data::colour::Colour;
    use crate::core::data::colour_palette::ColourPalette;
    use crate::core::data::pixel_buffer::PixelBuffer;
    use crate::core::data::pixel_rect::PixelRect;
    use crate::core::data::stream_frame::StreamFrame;

    const BLACK: Colour = Colour { r: 0, g: 0, b: 0 };
    const WHITE: Colour = Colour { r: 255, g: 255, b: 255 };
    const RED: Colour = Colour { r: 255, g: 0, b: 0 };

    fn surface(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::new(PixelRect::from_size(width, height).unwrap())
    }

    fn batch(x: i32, y: i32, data: Vec<Vec<u32>>, colours: Vec<Colour>) -> PixelBatch {
        PixelBatch {
            origin: Point { x, y },
            data,
            palette: ColourPalette::new(colours),
        }
    }

    #[test]
    fn test_inbound_event_scenario() {
        let mut surface = surface(64, 64);
        let payload = r##"{"terminate":false,"x":10,"y":20,"data":[[0,1]],"colours":["#000000","#FFFFFF"]}"##;
        let StreamFrame::Batch(batch) = decode_frame(payload).unwrap() else {
            panic!("expected a pixel batch");
        };
        surface
            .set_pixel(Point { x: 11, y: 20 }, RED)
            .unwrap();

        let stats = composite_frame(&batch, &mut surface);

        assert_eq!(stats.written, 2);
        assert_eq!(surface.pixel(Point { x: 10, y: 20 }), Some(BLACK));
        assert_eq!(surface.pixel(Point { x: 10, y: 21 }), Some(WHITE));
        assert_eq!(surface.pixel(Point { x: 11, y: 20 }), Some(RED));
    }

    #[test]
    fn test_outer_index_walks_columns() {
        let mut surface = surface(4, 4);
        let batch = batch(1, 1, vec![vec![0, 0], vec![1, 1]], vec![WHITE, RED]);

        composite_frame(&batch, &mut surface);

        assert_eq!(surface.pixel(Point { x: 1, y: 1 }), Some(WHITE));
        assert_eq!(surface.pixel(Point { x: 1, y: 2 }), Some(WHITE));
        assert_eq!(surface.pixel(Point { x: 2, y: 1 }), Some(RED));
        assert_eq!(surface.pixel(Point { x: 2, y: 2 }), Some(RED));
        assert_eq!(surface.pixel(Point { x: 0, y: 0 }), Some(BLACK));
    }

    #[test]
    fn test_overlapping_frames_last_write_wins() {
        let mut surface = surface(4, 4);
        let first = batch(0, 0, vec![vec![0, 0], vec![0, 0]], vec![WHITE]);
        let second = batch(1, 1, vec![vec![0, 0], vec![0, 0]], vec![RED]);

        composite_frame(&first, &mut surface);
        composite_frame(&second, &mut surface);

        assert_eq!(surface.pixel(Point { x: 0, y: 0 }), Some(WHITE));
        assert_eq!(surface.pixel(Point { x: 1, y: 0 }), Some(WHITE));
        assert_eq!(surface.pixel(Point { x: 0, y: 1 }), Some(WHITE));
        assert_eq!(surface.pixel(Point { x: 1, y: 1 }), Some(RED));
        assert_eq!(surface.pixel(Point { x: 2, y: 2 }), Some(RED));
    }

    #[test]
    fn test_disjoint_frames_are_order_independent() {
        let left = batch(0, 0, vec![vec![0, 0]], vec![WHITE]);
        let right = batch(1, 0, vec![vec![0, 0]], vec![RED]);

        let mut forwards = surface(2, 2);
        composite_frame(&left, &mut forwards);
        composite_frame(&right, &mut forwards);

        let mut backwards = surface(2, 2);
        composite_frame(&right, &mut backwards);
        composite_frame(&left, &mut backwards);

        assert_eq!(forwards.buffer(), backwards.buffer());
    }

    #[test]
    fn test_palette_is_per_frame() {
        let mut surface = surface(2, 1);
        let first = batch(0, 0, vec![vec![0]], vec![WHITE]);
        let second = batch(1, 0, vec![vec![0]], vec![RED]);

        composite_frame(&first, &mut surface);
        composite_frame(&second, &mut surface);

        assert_eq!(surface.pixel(Point { x: 0, y: 0 }), Some(WHITE));
        assert_eq!(surface.pixel(Point { x: 1, y: 0 }), Some(RED));
    }

    #[test]
    fn test_skips_out_of_bounds_and_unknown_indices() {
        let mut surface = surface(2, 2);
        let batch = batch(1, 1, vec![vec![0, 0], vec![0, 7]], vec![WHITE]);

        let stats = composite_frame(&batch, &mut surface);

        assert_eq!(
            stats,
            CompositeStats {
                written: 1,
                out_of_bounds: 2,
                unknown_index: 1
            }
        );
        assert_eq!(stats.skipped(), 3);
        assert_eq!(surface.pixel(Point { x: 1, y: 1 }), Some(WHITE));
    }

    #[test]
    fn test_negative_origin_clips() {
        let mut surface = surface(2, 2);
        let batch = batch(-1, -1, vec![vec![0, 0], vec![0, 0]], vec![WHITE]);

        let stats = composite_frame(&batch, &mut surface);

        assert_eq!(stats.written, 1);
        assert_eq!(stats.out_of_bounds, 3);
        assert_eq!(surface.pixel(Point { x: 0, y: 0 }), Some(WHITE));
    }

    #[test]
    fn test_merge_stats() {
        let mut total = CompositeStats::default();
        total.merge(CompositeStats {
            written: 3,
            out_of_bounds: 1,
            unknown_index: 0,
        });
        total.merge(CompositeStats {
            written: 2,
            out_of_bounds: 0,
            unknown_index: 4,
        });

        assert_eq!(
            total,
            CompositeStats {
                written: 5,
                out_of_bounds: 1,
                unknown_index: 4
            }
        );
    }
}
