use std::path::PathBuf;
use std::process;

use terravox_bench::report;
use terravox_bench::runner::BenchmarkRunner;
use terravox_bench::scenes;
use terravox_core::Settings;
use terravox_post::{PostProcess, PostSettings};
use terravox_world::WorldTextures;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut settings_path: Option<PathBuf> = None;
    let mut post_path: Option<PathBuf> = None;
    let mut texture_dir: Option<PathBuf> = None;
    let mut image_dir: Option<PathBuf> = None;
    let mut scene_filter: Option<String> = None;
    let mut regression_threshold = 10.0f64;
    let mut frame_count = 8u32;
    let mut width = 320u32;
    let mut height = 180u32;
    let mut seed = 1u32;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--help" || flag == "-h" {
            print_usage();
            process::exit(0);
        }
        i += 1;
        let Some(value) = args.get(i) else {
            eprintln!("Missing value for {}", flag);
            process::exit(1);
        };
        match flag {
            "--baseline" => baseline_path = Some(PathBuf::from(value)),
            "--output" => output_path = Some(PathBuf::from(value)),
            "--settings" => settings_path = Some(PathBuf::from(value)),
            "--post" => post_path = Some(PathBuf::from(value)),
            "--textures" => texture_dir = Some(PathBuf::from(value)),
            "--image-dir" => image_dir = Some(PathBuf::from(value)),
            "--scene" => scene_filter = Some(value.clone()),
            "--regression-threshold" => {
                regression_threshold = value
                    .parse()
                    .expect("invalid --regression-threshold value");
            }
            "--frames" => frame_count = value.parse().expect("invalid --frames value"),
            "--width" => width = value.parse().expect("invalid --width value"),
            "--height" => height = value.parse().expect("invalid --height value"),
            "--seed" => seed = value.parse().expect("invalid --seed value"),
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let settings = match &settings_path {
        Some(path) => Settings::load(path).unwrap_or_else(|e| {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }),
        None => Settings::default(),
    };
    let post_settings = match &post_path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(terravox_core::TerravoxError::from)
            .and_then(|s| PostSettings::from_ron_str(&s))
            .unwrap_or_else(|e| {
                eprintln!("ERROR: {}: {}", path.display(), e);
                process::exit(1);
            }),
        None => PostSettings::default(),
    };

    log::info!("Preparing textures...");
    let textures = match &texture_dir {
        Some(dir) => WorldTextures::load_or_procedural(dir, seed),
        None => WorldTextures::procedural(seed),
    };

    let mut runner = BenchmarkRunner::new(
        settings,
        textures,
        PostProcess::new(post_settings),
        width,
        height,
        frame_count,
    );
    if let Some(dir) = image_dir {
        runner = runner.with_image_dir(dir);
    }

    let scene_configs: Vec<_> = scenes::standard_scenes()
        .into_iter()
        .filter(|s| scene_filter.as_deref().map_or(true, |name| s.name == name))
        .collect();
    if scene_configs.is_empty() {
        eprintln!("No scene matches the --scene filter");
        process::exit(1);
    }

    let mut results = Vec::new();
    for config in &scene_configs {
        match runner.run_scene(config) {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("ERROR: scene '{}': {}", config.name, e);
                process::exit(1);
            }
        }
    }

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: bench_timestamp(),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            eprintln!("ERROR: failed to save baseline: {}", e);
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}

fn print_usage() {
    eprintln!("Usage: terravox-bench [OPTIONS]");
    eprintln!("  --settings <path>              Renderer settings (RON)");
    eprintln!("  --post <path>                  Post-process settings (RON)");
    eprintln!("  --textures <dir>               Texture directory (missing files are generated)");
    eprintln!("  --seed <n>                     Seed for generated textures (default: 1)");
    eprintln!("  --width <px>                   Frame width (default: 320)");
    eprintln!("  --height <px>                  Frame height (default: 180)");
    eprintln!("  --frames <n>                   Frames per scene (default: 8)");
    eprintln!("  --scene <name>                 Only run the named scene");
    eprintln!("  --image-dir <dir>              Write the last frame of each scene as PNG");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
}

fn bench_timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("bench-{}", secs)
}
