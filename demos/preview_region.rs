//! Drag a region on an image and save the editing surface.
//!
//! Usage:
//! ```sh
//! cargo run --example preview_region -- input.jpg preview.png
//! ```

use std::env;
use std::path::Path;
use std::process;

use futures::executor::block_on;
use watermark_region::{DisplayPoint, EditorController, FsImageSource, PointerButton};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output>", args[0]);
        process::exit(1);
    }

    let mut editor = EditorController::default();
    if let Err(e) = block_on(editor.load_image(&FsImageSource::default(), Path::new(&args[1]))) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    // Grab the default region by its top-left handle and pull it outwards.
    let region = editor.region();
    let transform = *editor.transform().expect("image is loaded");
    let corner = transform.to_display(watermark_region::ImagePoint::new(
        f64::from(region.x),
        f64::from(region.y),
    ));
    editor.pointer_down(corner, PointerButton::Primary);
    editor.pointer_move(DisplayPoint::new(corner.x - 40.0, corner.y - 20.0));
    editor.pointer_up();

    let surface = editor.surface().expect("surface is rendered");
    if let Err(e) = surface.save(&args[2]) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    println!("Region {} ({})", editor.region(), editor.size_label());
}
