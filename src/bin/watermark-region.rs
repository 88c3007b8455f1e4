use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use futures::executor::block_on;
use rayon::prelude::*;

use watermark_region::geometry::{DEFAULT_MAX_DISPLAY_HEIGHT, DEFAULT_MAX_DISPLAY_WIDTH};
use watermark_region::{
    is_supported_image, DisplayPoint, EditorConfig, EditorController, FillColor, FsImageSource,
    PointerButton, RemovalMode, RemovalRequest,
};

/// A primary-button drag on the display surface.
#[derive(Debug, Clone, Copy)]
struct Gesture {
    from: DisplayPoint,
    to: DisplayPoint,
}

#[derive(Parser)]
#[command(
    name = "watermark-region",
    about = "Mark a watermark region on an image and preview its removal",
    version,
    after_help = "Simple usage: watermark-region <image>  (default bottom-right region)\n\n\
                  Drags and picks are given in display-surface pixels, i.e. on the image\n\
                  scaled to fit --max-width x --max-height, exactly as a pointer would."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Preview output file or directory (default: {name}_region.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Pointer drag on the display surface as X0,Y0:X1,Y1 (repeatable)
    #[arg(short, long = "drag", value_parser = parse_gesture)]
    drags: Vec<Gesture>,

    /// Removal mode (blur or fill)
    #[arg(short, long, default_value = "blur")]
    mode: RemovalMode,

    /// Fill color as #rrggbb
    #[arg(short, long)]
    color: Option<String>,

    /// Sample the fill color at display point X,Y (fill mode only)
    #[arg(long, value_parser = parse_point)]
    pick: Option<DisplayPoint>,

    /// Maximum display surface width
    #[arg(long, default_value_t = DEFAULT_MAX_DISPLAY_WIDTH)]
    max_width: u32,

    /// Maximum display surface height
    #[arg(long, default_value_t = DEFAULT_MAX_DISPLAY_HEIGHT)]
    max_height: u32,

    /// Print removal requests as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

/// Settings shared by every processed image.
struct Options {
    config: EditorConfig,
    drags: Vec<Gesture>,
    mode: RemovalMode,
    color: Option<FillColor>,
    pick: Option<DisplayPoint>,
}

/// Result of previewing a single image.
struct PreviewResult {
    path: PathBuf,
    request: Option<RemovalRequest>,
    message: String,
}

fn parse_point(s: &str) -> Result<DisplayPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok(DisplayPoint::new(x, y))
}

fn parse_gesture(s: &str) -> Result<Gesture, String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected X0,Y0:X1,Y1, got '{s}'"))?;
    Ok(Gesture {
        from: parse_point(from)?,
        to: parse_point(to)?,
    })
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let color = match cli.color.as_deref().map(FillColor::parse).transpose() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if cli.max_width == 0 || cli.max_height == 0 {
        eprintln!("Error: Display bounds must be positive");
        process::exit(1);
    }

    let opts = Options {
        config: EditorConfig {
            max_display_width: cli.max_width,
            max_display_height: cli.max_height,
            ..EditorConfig::default()
        },
        drags: cli.drags.clone(),
        mode: cli.mode,
        color,
        pick: cli.pick,
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    let results = if input_path.is_dir() {
        let Some(output_dir) = cli.output.as_ref().map(PathBuf::from) else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: watermark-region <input_dir> -o <output_dir>");
            process::exit(1);
        };
        preview_directory(input_path, &output_dir, &opts)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_preview_path(input_path),
        };
        vec![preview_file(input_path, &output_path, &opts)]
    };

    let mut ok_count = 0u32;
    let mut fail_count = 0u32;
    for r in &results {
        print_result(r, &cli);
        if r.request.is_some() {
            ok_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !cli.quiet {
        eprintln!();
        eprint!("[Summary] Previewed: {ok_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

/// `"photo.jpg"` becomes `"photo_region.png"`.
fn default_preview_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_region.png"))
}

fn preview_file(input: &Path, output: &Path, opts: &Options) -> PreviewResult {
    let mut result = PreviewResult {
        path: input.to_path_buf(),
        request: None,
        message: String::new(),
    };

    let mut editor = EditorController::new(opts.config.clone());
    if let Err(e) = block_on(editor.load_image(&FsImageSource::default(), input)) {
        result.message = format!("Failed to load: {e}");
        return result;
    }

    editor.set_mode(opts.mode);
    if let Some(color) = opts.color {
        editor.set_fill_color(color);
    }
    for gesture in &opts.drags {
        editor.pointer_down(gesture.from, PointerButton::Primary);
        editor.pointer_move(gesture.to);
        editor.pointer_up();
    }
    if let Some(pick) = opts.pick {
        editor.pointer_down(pick, PointerButton::Secondary);
    }

    if let Some(surface) = editor.surface() {
        if let Err(e) = surface.save(output) {
            result.message = format!("Failed to save preview: {e}");
            return result;
        }
    }

    match editor.request() {
        Ok(request) => {
            result.message = format!("Preview saved to {}", output.display());
            result.request = Some(request);
        }
        Err(e) => result.message = e.to_string(),
    }
    result
}

fn preview_directory(input_dir: &Path, output_dir: &Path, opts: &Options) -> Vec<PreviewResult> {
    let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_supported_image(p))
            .collect(),
        Err(e) => {
            return vec![PreviewResult {
                path: input_dir.to_path_buf(),
                request: None,
                message: format!("Failed to read directory: {e}"),
            }];
        }
    };

    if let Err(e) = std::fs::create_dir_all(output_dir) {
        return vec![PreviewResult {
            path: output_dir.to_path_buf(),
            request: None,
            message: format!("Failed to create output directory: {e}"),
        }];
    }

    entries
        .par_iter()
        .map(|input| {
            let name = default_preview_path(input);
            let output = output_dir.join(name.file_name().unwrap_or_default());
            preview_file(input, &output, opts)
        })
        .collect()
}

fn print_result(result: &PreviewResult, cli: &Cli) {
    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    let Some(request) = &result.request else {
        eprintln!("[FAIL] {filename}: {}", result.message);
        return;
    };

    if cli.json {
        match serde_json::to_string_pretty(request) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("[FAIL] {filename}: {e}"),
        }
    } else if !cli.quiet {
        println!(
            "{filename}: region {} mode {} color {}",
            request.region(),
            request.mode,
            request.color
        );
    }

    if !cli.quiet {
        eprintln!("[OK] {filename}");
    }
    if cli.verbose {
        eprintln!("  -> {}", result.message);
    }
}
