use std::env;
use std::path::Path;
use wireframe_portrait::config::{load_config, OutlineToolConfig};
use wireframe_portrait::edges::detect_edges_with;
use wireframe_portrait::image::io::{load_image, save_gray, save_rgb, save_rgba, write_json_file};
use wireframe_portrait::pipeline::{Collaborators, WireframeInput, WireframeProcessor};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: OutlineToolConfig =
        load_config(Path::new(&config_path)).map_err(|e| format!("config {config_path}: {e}"))?;
    let wireframe = config
        .resolve_wireframe()
        .ok_or_else(|| format!("unknown preset {:?}", config.preset))?;
    if wireframe.needs_landmarks() {
        return Err(
            "config enables construction lines, mesh or face masking, which need a landmark \
             detector; outline_demo has none (use the outline_only preset)"
                .to_string(),
        );
    }
    if wireframe.background_merge {
        return Err("background_merge needs a background image and a segmentation model; outline_demo has neither".into());
    }

    let image = load_image(&config.input).map_err(|e| e.to_string())?;
    let edges = detect_edges_with(&image, &wireframe.edges);
    save_gray(&edges, &config.output.edges_image).map_err(|e| e.to_string())?;

    // No landmark or segmentation backends are wired into the demo.
    let processor = WireframeProcessor::new(wireframe);
    let output = processor
        .process(&WireframeInput::new(image), &Collaborators::new())
        .map_err(|e| e.to_string())?;

    save_rgb(&output.canvas, &config.output.outline_image).map_err(|e| e.to_string())?;
    save_rgba(&output.rgba, &config.output.rgba_image).map_err(|e| e.to_string())?;
    write_json_file(&config.output.report_json, &output.report()).map_err(|e| e.to_string())?;

    println!(
        "Saved edges to {} and outline to {}",
        config.output.edges_image.display(),
        config.output.outline_image.display()
    );
    println!(
        "{} contours (largest area {:.0}) in {:.2} ms; report at {}",
        output.stats.count,
        output.stats.largest_area,
        output.timing.total_ms,
        config.output.report_json.display()
    );
    Ok(())
}

fn usage() -> String {
    "Usage: outline_demo <config.json>".to_string()
}
