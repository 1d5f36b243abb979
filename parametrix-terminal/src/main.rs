/// Parametrix Terminal - shape viewer
///
/// Usage: parametrix-terminal <shapes.json> [--config <config.json>]
///                            [--export <out.stl>] [--ascii]
///
/// Controls:
///   - Tab: Switch between the 2D and 3D views
///   - WASD / Arrow Keys: Rotate the 3D view
///   - +/-: Zoom, P: Perspective/orthographic, 0: Reset rotation
///   - Q/ESC: Quit
use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use parametrix_core::compose;
use parametrix_core::stl::{write_ascii_stl, write_binary_stl};
use parametrix_terminal::{ShapeSource, TerminalApp, TerminalConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "parametrix-terminal.log";

struct Args {
    shapes: PathBuf,
    config: Option<PathBuf>,
    export: Option<PathBuf>,
    ascii: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = env::args().skip(1);
    let mut shapes = None;
    let mut config = None;
    let mut export = None;
    let mut ascii = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().ok_or("--config needs a path")?.into()),
            "--export" => export = Some(args.next().ok_or("--export needs a path")?.into()),
            "--ascii" => ascii = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            path if shapes.is_none() => shapes = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }

    Ok(Args {
        shapes: shapes.ok_or("missing shapes file")?,
        config,
        export,
        ascii,
    })
}

/// Log to a file; the alternate screen owns stdout while the viewer runs.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match File::create(LOG_FILE) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn export(source: &mut ShapeSource, out: &Path, ascii: bool) -> Result<(), String> {
    let shapes = source.load().map_err(|e| e.to_string())?;
    let scene = compose(shapes.as_slice());
    for skipped in &scene.skipped {
        warn!(shape = %skipped.name, error = %skipped.error, "not exported");
    }
    for node in &scene.nodes {
        info!(shape = %node.name, primitive = node.solid.primitive.kind_name(), "exporting");
    }
    let mesh = scene.mesh();

    let data = if ascii {
        write_ascii_stl(&mesh, "parametrix").into_bytes()
    } else {
        write_binary_stl(&mesh)
    };
    fs::write(out, data).map_err(|e| format!("failed to write {}: {e}", out.display()))?;

    info!(solids = scene.nodes.len(), triangles = mesh.triangles.len(), "exported STL");
    println!(
        "Exported {} solids ({} triangles) to {}",
        scene.nodes.len(),
        mesh.triangles.len(),
        out.display()
    );
    if !scene.skipped.is_empty() {
        eprintln!("Skipped {} shapes, see {LOG_FILE}", scene.skipped.len());
    }
    Ok(())
}

fn run(args: Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => TerminalConfig::load(path).map_err(|e| e.to_string())?,
        None => TerminalConfig::default(),
    };
    let mut source = ShapeSource::new(args.shapes);

    if let Some(out) = &args.export {
        return export(&mut source, out, args.ascii);
    }

    let mut app = TerminalApp::new(source, config).map_err(|e| e.to_string())?;
    println!("Loaded {} shapes (press Q to quit)...", app.shapes().len());
    app.run().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!(
                "Usage: parametrix-terminal <shapes.json> [--config <config.json>] [--export <out.stl>] [--ascii]"
            );
            return ExitCode::from(2);
        }
    };

    init_logging();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "parametrix-terminal failed");
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}
