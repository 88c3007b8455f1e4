//! The editor controller: owns the image, region and removal settings, and
//! routes pointer input through hit-testing, drag sessions and rendering.
//!
//! All mutation happens through `&mut self` on a single UI task. The two
//! asynchronous collaborators (image loading and removal) are split into a
//! `begin_*` call that issues a [`Ticket`] and a `finish_*` call that applies
//! the completion only when the ticket is still current, so results that
//! arrive for a superseded image or submission are dropped.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::backend::{
    is_supported_image, ImageInfo, ImageSource, RemovalBackend, RemovalOutcome, RemovalRequest,
};
use crate::color::{self, FillColor, RemovalMode};
use crate::drag::DragSession;
use crate::error::{Error, Result};
use crate::geometry::{
    DisplayPoint, ViewTransform, DEFAULT_MAX_DISPLAY_HEIGHT, DEFAULT_MAX_DISPLAY_WIDTH,
};
use crate::hit::{hit_test, CursorIcon, DragMode, DEFAULT_HIT_MARGIN};
use crate::region::Region;
use crate::render::{prepare_base, render, RenderStyle, Scene};

/// Options controlling the editing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Maximum display surface width.
    pub max_display_width: u32,
    /// Maximum display surface height.
    pub max_display_height: u32,
    /// Hit tolerance around handles and edges, in display pixels.
    pub hit_margin: f64,
    /// Visual constants for the surface.
    pub style: RenderStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_display_width: DEFAULT_MAX_DISPLAY_WIDTH,
            max_display_height: DEFAULT_MAX_DISPLAY_HEIGHT,
            hit_margin: DEFAULT_HIT_MARGIN,
            style: RenderStyle::default(),
        }
    }
}

/// Pointer button that triggered a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Starts drag sessions.
    Primary,
    /// Samples the fill color in fill mode.
    Secondary,
}

/// Identifies one asynchronous request issued by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
struct LoadedImage {
    path: PathBuf,
    transform: ViewTransform,
    base: RgbaImage,
}

/// Interactive region editor.
#[derive(Debug)]
pub struct EditorController {
    config: EditorConfig,
    image: Option<LoadedImage>,
    region: Region,
    mode: RemovalMode,
    fill: FillColor,
    drag: Option<DragSession>,
    surface: Option<RgbaImage>,
    outcome: Option<RemovalOutcome>,
    next_ticket: u64,
    pending_load: Option<Ticket>,
    pending_submit: Option<Ticket>,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorController {
    /// Create an empty editor.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            image: None,
            region: Region::new(0, 0, 0, 0),
            mode: RemovalMode::default(),
            fill: FillColor::default(),
            drag: None,
            surface: None,
            outcome: None,
            next_ticket: 0,
            pending_load: None,
            pending_submit: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Whether an image is loaded.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Path of the loaded image.
    #[must_use]
    pub fn image_path(&self) -> Option<&Path> {
        self.image.as_ref().map(|img| img.path.as_path())
    }

    /// Full-resolution size of the loaded image.
    #[must_use]
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.transform.image_size())
    }

    /// Transform of the loaded image.
    #[must_use]
    pub fn transform(&self) -> Option<&ViewTransform> {
        self.image.as_ref().map(|img| &img.transform)
    }

    /// Current region. Meaningless while no image is loaded.
    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    /// `w × h` label for the current region.
    #[must_use]
    pub fn size_label(&self) -> String {
        self.region.size_label()
    }

    /// Current removal mode.
    #[must_use]
    pub fn mode(&self) -> RemovalMode {
        self.mode
    }

    /// Current fill color.
    #[must_use]
    pub fn fill_color(&self) -> FillColor {
        self.fill
    }

    /// Last rendered frame.
    #[must_use]
    pub fn surface(&self) -> Option<&RgbaImage> {
        self.surface.as_ref()
    }

    /// Mode of the active drag, if any.
    #[must_use]
    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.as_ref().map(DragSession::mode)
    }

    /// Whether a drag session is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether a removal request is in flight. The surface ignores input
    /// while busy.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending_submit.is_some()
    }

    /// Whether an image load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Outcome of the last completed submission.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&RemovalOutcome> {
        self.outcome.as_ref()
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Start loading `path`.
    ///
    /// Supersedes any earlier load and any in-flight submission; their
    /// completions will be ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if the extension is not accepted.
    /// The editor state is left untouched.
    pub fn begin_load(&mut self, path: &Path) -> Result<Ticket> {
        if !is_supported_image(path) {
            log::warn!("rejecting {}: unsupported format", path.display());
            return Err(Error::UnsupportedFormat(path.display().to_string()));
        }
        if let Some(stale) = self.pending_submit.take() {
            log::info!("dropping interest in submission {stale:?}: new image requested");
        }
        let ticket = self.issue_ticket();
        self.pending_load = Some(ticket);
        log::info!("loading {} ({ticket:?})", path.display());
        Ok(ticket)
    }

    /// Apply the result of a load started with [`begin_load`](Self::begin_load).
    ///
    /// Returns `Ok(false)` when the ticket was superseded and the result was
    /// discarded.
    ///
    /// # Errors
    ///
    /// Propagates the source's error, or reports invalid dimensions and
    /// undecodable thumbnails. On error the prior image stays loaded.
    pub fn finish_load(&mut self, ticket: Ticket, result: Result<ImageInfo>) -> Result<bool> {
        if self.pending_load != Some(ticket) {
            log::warn!("discarding stale load completion {ticket:?}");
            return Ok(false);
        }
        self.pending_load = None;

        let info = result?;
        if info.width == 0 || info.height == 0 {
            return Err(Error::InvalidDimensions {
                width: info.width,
                height: info.height,
            });
        }
        let thumbnail = image::load_from_memory(&info.thumbnail).map_err(Error::ThumbnailDecode)?;

        let transform = ViewTransform::fit(
            info.width,
            info.height,
            self.config.max_display_width,
            self.config.max_display_height,
        );
        let base = prepare_base(&thumbnail, &transform);
        log::info!(
            "loaded {} ({}x{}, scale {:.3})",
            info.path.display(),
            info.width,
            info.height,
            transform.scale()
        );

        self.region = Region::default_for(info.width, info.height);
        self.image = Some(LoadedImage {
            path: info.path,
            transform,
            base,
        });
        self.drag = None;
        self.outcome = None;
        self.redraw();
        Ok(true)
    }

    /// Load `path` from `source` and install it.
    ///
    /// # Errors
    ///
    /// See [`begin_load`](Self::begin_load) and [`finish_load`](Self::finish_load).
    pub async fn load_image<S: ImageSource>(&mut self, source: &S, path: &Path) -> Result<()> {
        let ticket = self.begin_load(path)?;
        let result = source.load(path).await;
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Drop the image and return to the empty state.
    pub fn clear(&mut self) {
        self.image = None;
        self.region = Region::new(0, 0, 0, 0);
        self.drag = None;
        self.surface = None;
        self.outcome = None;
        self.pending_load = None;
        self.pending_submit = None;
    }

    /// Switch the removal mode. Ignored while busy.
    pub fn set_mode(&mut self, mode: RemovalMode) {
        if self.is_busy() || self.mode == mode {
            return;
        }
        self.mode = mode;
        log::debug!("removal mode: {mode}");
        self.redraw();
    }

    /// Set the fill color directly or from the palette. Ignored while busy.
    pub fn set_fill_color(&mut self, color: FillColor) {
        if self.is_busy() || self.fill == color {
            return;
        }
        self.fill = color;
        log::debug!("fill color: {color}");
        self.redraw();
    }

    /// Set the fill color from text entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] and keeps the current color when the
    /// text does not parse.
    pub fn set_fill_color_hex(&mut self, text: &str) -> Result<()> {
        let color = FillColor::parse(text)?;
        self.set_fill_color(color);
        Ok(())
    }

    /// Handle a pointer-down on the surface at display position `pointer`.
    ///
    /// The primary button starts a drag session; the secondary button samples
    /// the fill color in fill mode and never starts a drag.
    pub fn pointer_down(&mut self, pointer: DisplayPoint, button: PointerButton) {
        if self.is_busy() || self.drag.is_some() {
            return;
        }
        let Some(image) = &self.image else {
            return;
        };

        match button {
            PointerButton::Primary => {
                let session =
                    DragSession::begin(pointer, self.region, &image.transform, self.config.hit_margin);
                let at = session.anchor_pointer();
                log::debug!("drag start: {:?} at ({:.1}, {:.1})", session.mode(), at.x, at.y);
                self.drag = Some(session);
            }
            PointerButton::Secondary => self.sample_color(pointer),
        }
    }

    /// Handle pointer motion. Returns the cursor to show.
    ///
    /// While dragging this reshapes the region and redraws; otherwise it only
    /// reports the hover affordance.
    pub fn pointer_move(&mut self, pointer: DisplayPoint) -> CursorIcon {
        if self.is_busy() {
            return CursorIcon::Default;
        }
        let Some(image) = &self.image else {
            return CursorIcon::Default;
        };

        match self.drag {
            Some(session) => {
                let region = session.update(pointer, &image.transform);
                if region != self.region {
                    self.region = region;
                    self.redraw();
                }
                session.mode().cursor()
            }
            None => hit_test(pointer, &self.region, &image.transform, self.config.hit_margin).cursor(),
        }
    }

    /// Handle pointer release; ends the drag and keeps the region.
    pub fn pointer_up(&mut self) {
        if let Some(session) = self.drag.take() {
            log::debug!(
                "drag end: {:?} {} -> {}",
                session.mode(),
                session.anchor_region(),
                self.region
            );
        }
    }

    /// Handle the pointer leaving the surface; same as a release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Pick the fill color from the rendered surface. No-op in blur mode,
    /// while busy, or off the surface.
    pub fn sample_color(&mut self, pointer: DisplayPoint) {
        if self.mode != RemovalMode::Fill || self.is_busy() {
            return;
        }
        let Some(color) = self.surface.as_ref().and_then(|s| color::sample(s, pointer)) else {
            return;
        };
        log::debug!("sampled {color} at ({:.1}, {:.1})", pointer.x, pointer.y);
        self.set_fill_color(color);
    }

    /// The request that a commit would submit right now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImage`] when the editor is empty.
    pub fn request(&self) -> Result<RemovalRequest> {
        let image = self.image.as_ref().ok_or(Error::NoImage)?;
        Ok(RemovalRequest::new(
            image.path.clone(),
            self.region,
            self.mode,
            self.fill,
        ))
    }

    /// The current region and settings applied to several inputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImage`] when the editor is empty.
    pub fn batch_requests<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<Vec<RemovalRequest>> {
        if self.image.is_none() {
            return Err(Error::NoImage);
        }
        Ok(inputs
            .iter()
            .map(|p| RemovalRequest::new(p.as_ref().to_path_buf(), self.region, self.mode, self.fill))
            .collect())
    }

    /// Lock the surface and package the current state for submission.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImage`] when empty and [`Error::Busy`] when a
    /// submission is already in flight.
    pub fn commit(&mut self) -> Result<(Ticket, RemovalRequest)> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let request = self.request()?;
        self.pointer_up();
        let ticket = self.issue_ticket();
        self.pending_submit = Some(ticket);
        self.outcome = None;
        log::info!(
            "submitting {} region {} ({}, {}) {ticket:?}",
            request.input_path.display(),
            request.region(),
            request.mode,
            request.color
        );
        Ok((ticket, request))
    }

    /// Apply a removal completion. Returns `false` when the ticket is stale
    /// and the completion was ignored.
    ///
    /// Region, mode and color are never touched: a failure is recorded as an
    /// outcome message so the user can adjust and retry.
    pub fn finish_submission(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<RemovalOutcome, String>,
    ) -> bool {
        if self.pending_submit != Some(ticket) {
            log::warn!("discarding stale removal completion {ticket:?}");
            return false;
        }
        self.pending_submit = None;
        let outcome = match result {
            Ok(outcome) => {
                log::info!("removal finished: {}", outcome.message);
                outcome
            }
            Err(message) => {
                log::warn!("removal failed: {message}");
                RemovalOutcome::failed(message)
            }
        };
        self.outcome = Some(outcome);
        true
    }

    /// Stop waiting for the in-flight submission and unlock the surface.
    ///
    /// Advisory only: the backend may still finish, but its result is ignored.
    pub fn cancel_submission(&mut self) {
        if let Some(ticket) = self.pending_submit.take() {
            log::info!("cancelled submission {ticket:?}");
        }
    }

    /// Commit and await `backend`.
    ///
    /// # Errors
    ///
    /// See [`commit`](Self::commit). Backend failures are not errors here;
    /// they come back as an unsuccessful outcome.
    pub async fn submit<B: RemovalBackend>(&mut self, backend: &B) -> Result<RemovalOutcome> {
        let (ticket, request) = self.commit()?;
        let result = backend.remove(&request).await;
        let outcome = match &result {
            Ok(outcome) => outcome.clone(),
            Err(message) => RemovalOutcome::failed(message.clone()),
        };
        self.finish_submission(ticket, result);
        Ok(outcome)
    }

    fn redraw(&mut self) {
        let Some(image) = &self.image else {
            self.surface = None;
            return;
        };
        let scene = Scene {
            base: &image.base,
            region: self.region,
            transform: image.transform,
            mode: self.mode,
            fill: self.fill,
        };
        self.surface = Some(render(&scene, &self.config.style));
    }
}
