//! Main GUI application loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use egui::Context;
use egui_winit::State as EguiWinitState;
use tracing::{error, info, warn};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

use crate::adapters::http_transport::HttpTransport;
use crate::controllers::render::{ControllerState, RenderController, RenderError};
use crate::core::actions::ports::pixel_surface::PixelSurface;
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::render_request::RenderMode;
use crate::input::cli::EngineArgs;
use crate::input::gui::ports::presenter::GuiPresenterPort;
use crate::input::gui::ui_state::{PanelChange, PanelSelection, UiState};
use crate::presenters::pixels::presenter::PixelsPresenter;

/// Poll interval while a render is streaming.
const STREAM_POLL_INTERVAL: Duration = Duration::from_millis(16);

type GuiController = RenderController<HttpTransport, PixelBuffer>;

pub struct GuiApp<P: GuiPresenterPort> {
    controller: GuiController,
    presenter: P,
    ui_state: UiState,
    equations: Vec<String>,
    colour_schemes: Vec<String>,
    cursor: Option<(f32, f32)>,
    surface_dirty: bool,
    egui_ctx: Context,
    egui_state: EguiWinitState,
}

impl<P: GuiPresenterPort> GuiApp<P> {
    pub fn new(
        window: &'static Window,
        event_loop: &EventLoop<()>,
        presenter: P,
        controller: GuiController,
    ) -> Self {
        let egui_ctx = Context::default();
        let egui_state = EguiWinitState::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            event_loop,
            Some(window.scale_factor() as f32),
            None, // max_texture_side, use default
        );

        let (equations, colour_schemes) = controller
            .catalog()
            .map(|catalog| {
                (
                    catalog
                        .equations
                        .iter()
                        .map(|equation| equation.equation_type.clone())
                        .collect(),
                    catalog.colour_schemes.clone(),
                )
            })
            .unwrap_or_default();

        let mut app = Self {
            controller,
            presenter,
            ui_state: UiState::default(),
            equations,
            colour_schemes,
            cursor: None,
            surface_dirty: true,
            egui_ctx,
            egui_state,
        };
        app.ui_state.panel = app.applied_selection();
        app
    }

    pub fn run(mut self, window: &'static Window, event_loop: EventLoop<()>) -> anyhow::Result<()> {
        let mut redraw_pending = true;

        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                let response = self.egui_state.on_window_event(window, event);
                if response.repaint {
                    redraw_pending = true;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        self.controller.cancel();
                        elwt.exit();
                    }
                    WindowEvent::RedrawRequested => {
                        redraw_pending = false;

                        let egui_output = self.update_ui(window);
                        self.egui_state
                            .handle_platform_output(window, egui_output.platform_output.clone());

                        self.apply_panel();
                        self.submit_render_if_needed();

                        if let Err(err) = self.draw(egui_output) {
                            error!(error = %err, "render error");
                            elwt.exit();
                        }
                    }
                    WindowEvent::Resized(size) => {
                        if let Err(err) = self.presenter.resize(size.width, size.height) {
                            warn!(error = %err, "resize failed");
                        }
                        redraw_pending = true;
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        self.egui_ctx.set_pixels_per_point(*scale_factor as f32);
                        let size = window.inner_size();
                        if let Err(err) = self.presenter.resize(size.width, size.height) {
                            warn!(error = %err, "resize failed");
                        }
                        redraw_pending = true;
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        self.cursor = Some((position.x as f32, position.y as f32));
                    }
                    WindowEvent::CursorLeft { .. } => {
                        self.cursor = None;
                    }
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button,
                        ..
                    } if !response.consumed => {
                        self.handle_click(*button);
                        redraw_pending = true;
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                if self.pump() {
                    redraw_pending = true;
                }

                if redraw_pending {
                    window.request_redraw();
                }

                if self.controller.state() == ControllerState::Rendering {
                    elwt.set_control_flow(ControlFlow::WaitUntil(Instant::now() + STREAM_POLL_INTERVAL));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        })?;

        Ok(())
    }

    /// Applies queued frames; true when the picture changed.
    fn pump(&mut self) -> bool {
        match self.controller.pump() {
            Ok(report) => {
                self.ui_state.frames_received += report.frames;
                let changed = report.frames > 0 || report.finished.is_some();
                if let Some(summary) = report.finished {
                    self.ui_state.record_summary(summary);
                }
                self.surface_dirty |= changed;
                changed
            }
            Err(err) => {
                self.ui_state.record_error(err.to_string());
                true
            }
        }
    }

    fn handle_click(&mut self, button: MouseButton) {
        let result = match button {
            MouseButton::Left => {
                let Some(position) = self.cursor.and_then(|c| self.presenter.surface_position(c)) else {
                    return;
                };
                let rect = self.controller.surface().pixel_rect();
                self.controller.zoom_at(
                    position.0,
                    position.1,
                    f64::from(rect.width()),
                    f64::from(rect.height()),
                )
            }
            MouseButton::Right => self.controller.zoom_out(),
            _ => return,
        };

        self.record_render(result);
    }

    fn apply_panel(&mut self) {
        if std::mem::take(&mut self.ui_state.reset_requested) {
            if let Err(err) = self.controller.reset_view() {
                self.ui_state.record_error(err.to_string());
            }
        }

        if std::mem::take(&mut self.ui_state.zoom_out_requested) {
            let result = self.controller.zoom_out();
            self.record_render(result);
        }

        let (Some(edited), Some(applied)) = (self.ui_state.panel.clone(), self.applied_selection())
        else {
            return;
        };

        for change in edited.changes_from(&applied) {
            let result = match change {
                PanelChange::Equation(equation) => self.controller.select_equation(&equation),
                PanelChange::ColourScheme(colour_scheme) => {
                    self.controller.select_colour_scheme(&colour_scheme)
                }
                PanelChange::Iterations(iterations) => self.controller.set_iterations(iterations),
                PanelChange::Mode(mode) => {
                    self.controller.set_mode(mode);
                    Ok(())
                }
            };

            if let Err(err) = result {
                self.ui_state.record_error(err.to_string());
            }
        }

        self.ui_state.panel = self.applied_selection();
    }

    fn submit_render_if_needed(&mut self) {
        let descriptor = match self.controller.descriptor() {
            Ok(descriptor) => descriptor,
            Err(err) => {
                self.ui_state.record_error(err.to_string());
                return;
            }
        };

        if self.ui_state.should_submit(&descriptor) {
            let result = self.controller.render();
            self.record_render(result);
        }
    }

    fn record_render(&mut self, result: Result<u64, RenderError>) {
        match result {
            Ok(session_id) => match self.controller.descriptor() {
                Ok(descriptor) => self.ui_state.record_submission(descriptor, session_id),
                Err(err) => self.ui_state.record_error(err.to_string()),
            },
            Err(err) => self.ui_state.record_error(err.to_string()),
        }
    }

    fn applied_selection(&self) -> Option<PanelSelection> {
        Some(PanelSelection {
            equation: self.controller.equation_type()?.to_string(),
            colour_scheme: self.controller.colour_scheme()?.to_string(),
            iterations: self.controller.viewport()?.iterations(),
            mode: self.controller.mode(),
        })
    }

    fn draw(&mut self, egui_output: egui::FullOutput) -> anyhow::Result<()> {
        if std::mem::take(&mut self.surface_dirty) {
            self.presenter.present(self.controller.surface())?;
        }

        self.presenter.render(egui_output, &self.egui_ctx)?;
        Ok(())
    }

    fn update_ui(&mut self, window: &Window) -> egui::FullOutput {
        let raw_input = self.egui_state.take_egui_input(window);

        let view = self.controller.viewport().map(|viewport| {
            (
                format!("x: [{}, {}]", viewport.min_x(), viewport.max_x()),
                format!("y: [{}, {}]", viewport.min_y(), viewport.max_y()),
            )
        });
        let rendering = self.controller.state() == ControllerState::Rendering;

        self.egui_ctx.run(raw_input, |ctx| {
            egui::Window::new("Render")
                .default_pos([10.0, 10.0])
                .default_size([260.0, 260.0])
                .show(ctx, |ui| {
                    ui.heading("Fractal Stream");
                    ui.separator();

                    if let Some(panel) = self.ui_state.panel.as_mut() {
                        ui.horizontal(|ui| {
                            ui.label("Equation:");
                            egui::ComboBox::from_id_source("equation")
                                .selected_text(panel.equation.clone())
                                .show_ui(ui, |ui| {
                                    for name in &self.equations {
                                        ui.selectable_value(&mut panel.equation, name.clone(), name.as_str());
                                    }
                                });
                        });

                        ui.horizontal(|ui| {
                            ui.label("Colours:");
                            egui::ComboBox::from_id_source("colour_scheme")
                                .selected_text(panel.colour_scheme.clone())
                                .show_ui(ui, |ui| {
                                    for name in &self.colour_schemes {
                                        ui.selectable_value(
                                            &mut panel.colour_scheme,
                                            name.clone(),
                                            name.as_str(),
                                        );
                                    }
                                });
                        });

                        ui.horizontal(|ui| {
                            ui.label("Iterations:");
                            ui.add(
                                egui::Slider::new(&mut panel.iterations, 1..=10_000).logarithmic(true),
                            );
                        });

                        ui.horizontal(|ui| {
                            ui.label("Mode:");
                            for &mode in RenderMode::ALL {
                                ui.radio_value(&mut panel.mode, mode, mode.as_str());
                            }
                        });
                    }

                    ui.separator();
                    if let Some((x_range, y_range)) = &view {
                        ui.label(x_range);
                        ui.label(y_range);
                    }

                    ui.horizontal(|ui| {
                        if ui.button("Render").clicked() {
                            self.ui_state.render_requested = true;
                        }
                        if ui.button("Zoom out").clicked() {
                            self.ui_state.zoom_out_requested = true;
                        }
                        if ui.button("Reset view").clicked() {
                            self.ui_state.reset_requested = true;
                        }
                    });

                    ui.separator();
                    if let Some(session_id) = self.ui_state.latest_session_id {
                        let status = if rendering { "streaming" } else { "idle" };
                        ui.label(format!("Session {session_id}: {status}"));
                        ui.label(format!("Frames: {}", self.ui_state.frames_received));
                    }
                    if let Some(summary) = &self.ui_state.last_summary {
                        ui.label(format!(
                            "Last render: {} ms, {} pixels",
                            summary.elapsed.as_millis(),
                            summary.pixels.written
                        ));
                    }
                    if let Some(message) = &self.ui_state.last_error {
                        ui.separator();
                        ui.colored_label(egui::Color32::LIGHT_RED, message);
                    }
                });
        })
    }
}

/// Opens the explorer window and streams renders until it is closed.
pub fn run_gui(engine: &EngineArgs) -> anyhow::Result<()> {
    let transport = Arc::new(HttpTransport::new(&engine.server, engine.connect_timeout())?);
    let surface_rect = engine.surface_rect()?;

    let mut controller = RenderController::new(
        transport,
        PixelBuffer::new(surface_rect),
        engine.session_settings(),
    );
    controller
        .load_catalog()
        .context("loading the render engine catalog")?;
    controller.set_mode(engine.mode);

    info!(server = %engine.server, "catalog loaded, opening window");

    let event_loop = EventLoop::new()?;

    // pixels needs a 'static window
    let window: &'static Window = Box::leak(Box::new(
        WindowBuilder::new()
            .with_title("Fractal Stream")
            .with_inner_size(LogicalSize::new(
                f64::from(surface_rect.width()),
                f64::from(surface_rect.height()),
            ))
            .with_min_inner_size(LogicalSize::new(200.0, 200.0))
            .build(&event_loop)?,
    ));

    let presenter = PixelsPresenter::new(window, surface_rect.width(), surface_rect.height())?;
    let app = GuiApp::new(window, &event_loop, presenter, controller);

    app.run(window, event_loop)
}
