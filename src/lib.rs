//! Interactive rectangular-region editor for marking watermark areas.
//!
//! The editor shows an image scaled onto a display surface, lets the user
//! draw, move and resize a rectangle with the pointer, previews the removal
//! over it, and packages the final region for an external removal operation.
//! Pixel-level removal itself is out of scope; it sits behind the
//! [`RemovalBackend`] trait.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use futures::executor::block_on;
//! use watermark_region::{DisplayPoint, EditorController, FsImageSource, PointerButton};
//!
//! let mut editor = EditorController::default();
//! block_on(editor.load_image(&FsImageSource::default(), Path::new("photo.jpg")))
//!     .expect("failed to load image");
//!
//! // Drag a new region on the display surface.
//! editor.pointer_down(DisplayPoint::new(40.0, 30.0), PointerButton::Primary);
//! editor.pointer_move(DisplayPoint::new(140.0, 70.0));
//! editor.pointer_up();
//!
//! let request = editor.request().unwrap();
//! println!("{}x{} at ({}, {})", request.width, request.height, request.x, request.y);
//! ```
//!
//! # Geometry
//!
//! Regions live in image pixels and are clamped after every change so they
//! never leave the image, never shrink below [`MIN_SIZE`], and never invert.
//! Hit margins and handle sizes are in display pixels.

#![deny(missing_docs)]

pub mod backend;
pub mod color;
pub mod drag;
mod editor;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod region;
pub mod render;

pub use backend::{
    default_output_path, is_supported_image, FsImageSource, ImageInfo, ImageSource,
    RemovalBackend, RemovalOutcome, RemovalRequest,
};
pub use color::{FillColor, RemovalMode, PALETTE};
pub use drag::DragSession;
pub use editor::{EditorConfig, EditorController, PointerButton, Ticket};
pub use error::{Error, Result};
pub use geometry::{DisplayPoint, ImagePoint, ViewTransform};
pub use hit::{hit_test, CursorIcon, DragMode};
pub use region::{Region, MIN_SIZE};
pub use render::{render, RenderStyle, Scene};
