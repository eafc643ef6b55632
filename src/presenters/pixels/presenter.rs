use egui::Context as EguiContext;
use egui_wgpu::Renderer as EguiRenderer;
use pixels::wgpu;
use pixels::{Pixels, SurfaceTexture};
use winit::window::Window;

use crate::adapters::pixel_format::{PixelFormatError, copy_rgb_to_rgba};
use crate::core::actions::ports::pixel_surface::PixelSurface;
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::input::gui::ports::presenter::GuiPresenterPort;

/// Shows the render surface in a `pixels` framebuffer scaled to the window,
/// with the egui panel drawn on top.
///
/// The framebuffer keeps the surface's size; only the window-side texture
/// follows resizes.
pub struct PixelsPresenter {
    pixels: Pixels<'static>,
    egui_renderer: EguiRenderer,
    window_width: u32,
    window_height: u32,
}

impl PixelsPresenter {
    pub fn new(
        window: &'static Window,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Self, pixels::Error> {
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(surface_width, surface_height, surface_texture)?;

        let egui_renderer = EguiRenderer::new(
            pixels.device(),
            pixels.render_texture_format(),
            None, // depth format
            1,    // msaa samples
        );

        Ok(Self {
            pixels,
            egui_renderer,
            window_width: size.width,
            window_height: size.height,
        })
    }
}

impl GuiPresenterPort for PixelsPresenter {
    fn present(&mut self, surface: &PixelBuffer) -> Result<(), PixelFormatError> {
        let expected = surface.pixel_rect().size() as usize * 4;
        let frame = self.pixels.frame_mut();

        if frame.len() != expected {
            return Err(PixelFormatError::SizeMismatch {
                expected,
                actual: frame.len(),
            });
        }

        copy_rgb_to_rgba(surface.buffer(), frame)
    }

    fn render(&mut self, egui_output: egui::FullOutput, egui_ctx: &EguiContext) -> Result<(), pixels::Error> {
        if self.window_width == 0 || self.window_height == 0 {
            return Ok(());
        }

        let window_size = [self.window_width, self.window_height];
        let egui_renderer = &mut self.egui_renderer;

        self.pixels.render_with(|encoder, render_target, context| {
            context.scaling_renderer.render(encoder, render_target);

            let clipped_primitives =
                egui_ctx.tessellate(egui_output.shapes, egui_ctx.pixels_per_point());

            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: window_size,
                pixels_per_point: egui_ctx.pixels_per_point(),
            };

            let textures_delta = egui_output.textures_delta;

            for (id, delta) in &textures_delta.set {
                egui_renderer.update_texture(&context.device, &context.queue, *id, delta);
            }

            egui_renderer.update_buffers(
                &context.device,
                &context.queue,
                encoder,
                &clipped_primitives,
                &screen_descriptor,
            );

            {
                let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: render_target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            // keep the fractal underneath
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                });

                egui_renderer.render(&mut render_pass, &clipped_primitives, &screen_descriptor);
            }

            for id in &textures_delta.free {
                egui_renderer.free_texture(id);
            }

            Ok(())
        })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), pixels::TextureError> {
        self.window_width = width;
        self.window_height = height;

        if width == 0 || height == 0 {
            return Ok(());
        }

        self.pixels.resize_surface(width, height)
    }

    fn surface_position(&self, window_position: (f32, f32)) -> Option<(f64, f64)> {
        self.pixels
            .window_pos_to_pixel(window_position)
            .ok()
            .map(|(x, y)| (x as f64, y as f64))
    }
}
