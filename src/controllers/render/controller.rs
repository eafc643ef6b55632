use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::controllers::render::errors::{CatalogError, RenderError, SessionError};
use crate::controllers::render::ports::transport::RenderTransport;
use crate::controllers::render::session::stream_session::{SessionEvent, StreamSession};
use crate::controllers::render::settings::SessionSettings;
use crate::core::actions::composite_frame::{CompositeStats, composite_frame};
use crate::core::actions::encode_request::{RequestDescriptor, encode_request};
use crate::core::actions::ports::pixel_surface::PixelSurface;
use crate::core::actions::zoom_viewport;
use crate::core::data::catalog::Catalog;
use crate::core::data::render_request::{RenderMode, RenderRequest};
use crate::core::data::stream_frame::PixelBatch;
use crate::core::data::viewport::Viewport;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Ready,
    Rendering,
}

/// Frames applied by one call to [`RenderController::pump`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PumpReport {
    pub frames: u64,
    pub pixels: CompositeStats,
    /// Set when the render finished during this pump.
    pub finished: Option<RenderSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub session_id: u64,
    pub descriptor: RequestDescriptor,
    pub frames: u64,
    pub pixels: CompositeStats,
    pub dropped_frames: u64,
    pub retries: u32,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
struct Selection {
    viewport: Viewport,
    equation_type: String,
    colour_scheme: String,
}

struct ActiveRender {
    session: StreamSession,
    descriptor: RequestDescriptor,
    attempt: u32,
    retry_at: Option<Instant>,
    frames: u64,
    pixels: CompositeStats,
    dropped_frames: u64,
    started: Instant,
}

impl ActiveRender {
    fn new(session: StreamSession, descriptor: RequestDescriptor) -> Self {
        Self {
            session,
            descriptor,
            attempt: 0,
            retry_at: None,
            frames: 0,
            pixels: CompositeStats::default(),
            dropped_frames: 0,
            started: Instant::now(),
        }
    }

    fn apply<S: PixelSurface + ?Sized>(&mut self, batch: &PixelBatch, surface: &mut S) -> CompositeStats {
        let stats = composite_frame(batch, surface);

        if stats.skipped() > 0 {
            debug!(
                session_id = self.session.id(),
                out_of_bounds = stats.out_of_bounds,
                unknown_index = stats.unknown_index,
                "batch partially applied"
            );
        }

        self.frames += 1;
        self.pixels.merge(stats);
        stats
    }

    fn summary(&self) -> RenderSummary {
        RenderSummary {
            session_id: self.session.id(),
            descriptor: self.descriptor.clone(),
            frames: self.frames,
            pixels: self.pixels,
            dropped_frames: self.dropped_frames + self.session.dropped_frames(),
            retries: self.attempt,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Owns everything one explorer view needs: the catalog, the current
/// parameters, the pixel surface and at most one streaming session.
///
/// Frames only ever reach the surface from the current session, and starting a
/// render closes the previous session before the new one is opened.
pub struct RenderController<T: RenderTransport + ?Sized + 'static, S: PixelSurface> {
    transport: Arc<T>,
    surface: S,
    settings: SessionSettings,
    catalog: Option<Catalog>,
    selection: Option<Selection>,
    mode: RenderMode,
    active: Option<ActiveRender>,
    last_session_id: u64,
}

impl<T: RenderTransport + ?Sized + 'static, S: PixelSurface> RenderController<T, S> {
    pub fn new(transport: Arc<T>, surface: S, settings: SessionSettings) -> Self {
        Self {
            transport,
            surface,
            settings,
            catalog: None,
            selection: None,
            mode: RenderMode::default(),
            active: None,
            last_session_id: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        match (&self.selection, &self.active) {
            (None, _) => ControllerState::Uninitialized,
            (Some(_), None) => ControllerState::Ready,
            (Some(_), Some(_)) => ControllerState::Rendering,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.selection.as_ref().map(|selection| selection.viewport)
    }

    #[must_use]
    pub fn equation_type(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.equation_type.as_str())
    }

    #[must_use]
    pub fn colour_scheme(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.colour_scheme.as_str())
    }

    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Id of the session currently feeding the surface.
    #[must_use]
    pub fn active_session_id(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.session.id())
    }

    /// Seeds the parameters from the catalog's first equation and first
    /// colour scheme. Any render in progress is cancelled.
    pub fn initialise(&mut self, catalog: Catalog) -> Result<(), RenderError> {
        let equation = catalog.equations.first().ok_or(CatalogError::NoEquations)?;
        let colour_scheme = catalog
            .colour_schemes
            .first()
            .ok_or(CatalogError::NoColourSchemes)?;
        let viewport = default_viewport(&catalog, &equation.equation_type)?;

        info!(
            equations = catalog.equations.len(),
            colour_schemes = catalog.colour_schemes.len(),
            equation = %equation.equation_type,
            colour_scheme = %colour_scheme,
            "catalog loaded"
        );

        self.cancel();
        self.selection = Some(Selection {
            viewport,
            equation_type: equation.equation_type.clone(),
            colour_scheme: colour_scheme.clone(),
        });
        self.catalog = Some(catalog);

        Ok(())
    }

    pub fn load_catalog(&mut self) -> Result<(), RenderError> {
        let catalog = self.transport.fetch_catalog()?;
        self.initialise(catalog)
    }

    /// The descriptor [`render`](Self::render) would open right now.
    pub fn descriptor(&self) -> Result<RequestDescriptor, RenderError> {
        Ok(encode_request(&self.request()?)?)
    }

    /// Starts streaming the current parameters and returns the new session id.
    pub fn render(&mut self) -> Result<u64, RenderError> {
        let request = self.request()?;
        let descriptor = encode_request(&request)?;

        self.cancel();

        let session = self.open_session(&descriptor)?;
        let id = session.id();
        self.active = Some(ActiveRender::new(session, descriptor));

        Ok(id)
    }

    /// Zooms in 2× on the pointer and renders the new view.
    pub fn zoom_at(
        &mut self,
        pointer_x: f64,
        pointer_y: f64,
        width: f64,
        height: f64,
    ) -> Result<u64, RenderError> {
        let selection = self.selection_mut()?;
        selection.viewport =
            zoom_viewport::recenter(&selection.viewport, pointer_x, pointer_y, width, height)?;

        self.render()
    }

    /// Zooms out 2× about the current centre and renders the new view.
    pub fn zoom_out(&mut self) -> Result<u64, RenderError> {
        let selection = self.selection_mut()?;
        selection.viewport = zoom_viewport::zoom_out(&selection.viewport)?;

        self.render()
    }

    /// Restores the selected equation's catalog view.
    pub fn reset_view(&mut self) -> Result<(), RenderError> {
        let catalog = self.catalog.as_ref().ok_or(RenderError::Uninitialized)?;
        let selection = self.selection.as_mut().ok_or(RenderError::Uninitialized)?;

        selection.viewport = default_viewport(catalog, &selection.equation_type)?;
        Ok(())
    }

    /// Switches equation; the view jumps to that equation's defaults.
    pub fn select_equation(&mut self, equation_type: &str) -> Result<(), RenderError> {
        let catalog = self.catalog.as_ref().ok_or(RenderError::Uninitialized)?;
        let viewport = default_viewport(catalog, equation_type)?;
        let selection = self.selection.as_mut().ok_or(RenderError::Uninitialized)?;

        selection.equation_type = equation_type.to_string();
        selection.viewport = viewport;
        Ok(())
    }

    pub fn select_colour_scheme(&mut self, colour_scheme: &str) -> Result<(), RenderError> {
        let catalog = self.catalog.as_ref().ok_or(RenderError::Uninitialized)?;
        if !catalog.has_colour_scheme(colour_scheme) {
            return Err(CatalogError::UnknownColourScheme(colour_scheme.to_string()).into());
        }

        self.selection_mut()?.colour_scheme = colour_scheme.to_string();
        Ok(())
    }

    pub fn set_iterations(&mut self, iterations: u32) -> Result<(), RenderError> {
        let selection = self.selection_mut()?;
        selection.viewport = selection.viewport.with_iterations(iterations)?;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.selection_mut()?.viewport = viewport;
        Ok(())
    }

    /// Applies whatever frames are already queued without waiting for more.
    ///
    /// At most one queue's worth of frames is applied per call so a fast
    /// engine cannot starve the caller's event loop.
    pub fn pump(&mut self) -> Result<PumpReport, RenderError> {
        let mut report = PumpReport::default();
        let budget = self.settings.frame_queue_depth.max(1) as u64;

        while report.frames < budget {
            let Some(active) = self.active.as_mut() else {
                break;
            };

            if let Some(retry_at) = active.retry_at {
                if Instant::now() < retry_at {
                    break;
                }
                self.reopen()?;
                continue;
            }

            match active.session.try_next_event() {
                Ok(None) => break,
                Ok(Some(SessionEvent::Batch(batch))) => {
                    let stats = active.apply(&batch, &mut self.surface);
                    report.frames += 1;
                    report.pixels.merge(stats);
                }
                Ok(Some(SessionEvent::Closed(_))) => {
                    report.finished = self.finish();
                    break;
                }
                Err(err) => self.schedule_retry(err)?,
            }
        }

        Ok(report)
    }

    /// Blocks until the current render terminates or fails for good.
    pub fn run_to_completion(&mut self) -> Result<RenderSummary, RenderError> {
        loop {
            let active = self.active.as_mut().ok_or(RenderError::NoActiveRender)?;

            if let Some(retry_at) = active.retry_at {
                thread::sleep(retry_at.saturating_duration_since(Instant::now()));
                self.reopen()?;
                continue;
            }

            match active.session.next_event() {
                Ok(SessionEvent::Batch(batch)) => {
                    active.apply(&batch, &mut self.surface);
                }
                Ok(SessionEvent::Closed(_)) => {
                    return self.finish().ok_or(RenderError::NoActiveRender);
                }
                Err(err) => self.schedule_retry(err)?,
            }
        }
    }

    /// Stops the current render, if any. Frames already applied stay.
    pub fn cancel(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.session.close();
            debug!(session_id = active.session.id(), "render cancelled");
        }
    }

    fn request(&self) -> Result<RenderRequest, RenderError> {
        let selection = self.selection.as_ref().ok_or(RenderError::Uninitialized)?;

        Ok(RenderRequest {
            viewport: selection.viewport,
            equation_type: selection.equation_type.clone(),
            colour_scheme: selection.colour_scheme.clone(),
            mode: self.mode,
        })
    }

    fn selection_mut(&mut self) -> Result<&mut Selection, RenderError> {
        self.selection.as_mut().ok_or(RenderError::Uninitialized)
    }

    fn open_session(&mut self, descriptor: &RequestDescriptor) -> Result<StreamSession, RenderError> {
        self.last_session_id += 1;

        Ok(StreamSession::open(
            self.last_session_id,
            Arc::clone(&self.transport),
            descriptor.clone(),
            &self.settings,
        )?)
    }

    fn reopen(&mut self) -> Result<(), RenderError> {
        let Some(descriptor) = self.active.as_ref().map(|a| a.descriptor.clone()) else {
            return Ok(());
        };

        let session = match self.open_session(&descriptor) {
            Ok(session) => session,
            Err(err) => {
                self.active = None;
                return Err(err);
            }
        };

        if let Some(active) = self.active.as_mut() {
            info!(
                session_id = session.id(),
                attempt = active.attempt,
                descriptor = %descriptor,
                "retrying render"
            );
            active.dropped_frames += active.session.dropped_frames();
            active.session = session;
            active.retry_at = None;
        }

        Ok(())
    }

    fn schedule_retry(&mut self, err: SessionError) -> Result<(), RenderError> {
        let Some(active) = self.active.as_mut() else {
            return Err(err.into());
        };

        let attempt = active.attempt + 1;
        let delay = if err.is_retryable() {
            self.settings.retry.delay_for(attempt)
        } else {
            None
        };

        match delay {
            Some(delay) => {
                warn!(
                    session_id = active.session.id(),
                    error = %err,
                    attempt,
                    ?delay,
                    "render session failed, will retry"
                );
                active.attempt = attempt;
                active.retry_at = Some(Instant::now() + delay);
                Ok(())
            }
            None => {
                warn!(
                    session_id = active.session.id(),
                    error = %err,
                    frames = active.frames,
                    "render failed"
                );
                self.active = None;
                Err(err.into())
            }
        }
    }

    fn finish(&mut self) -> Option<RenderSummary> {
        let active = self.active.take()?;
        let summary = active.summary();

        info!(
            session_id = summary.session_id,
            frames = summary.frames,
            pixels = summary.pixels.written,
            skipped = summary.pixels.skipped(),
            dropped = summary.dropped_frames,
            retries = summary.retries,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "render complete"
        );

        Some(summary)
    }
}

fn default_viewport(catalog: &Catalog, equation_type: &str) -> Result<Viewport, CatalogError> {
    let equation = catalog
        .equation(equation_type)
        .ok_or_else(|| CatalogError::UnknownEquation(equation_type.to_string()))?;

    equation
        .viewport()
        .map_err(|source| CatalogError::InvalidDefaults {
            equation: equation_type.to_string(),
            source,
        })
}
