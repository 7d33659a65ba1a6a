use plant_morphometry::analyzer::{AnalyzeError, Analyzer, NullSink, VisualizationSink};
use plant_morphometry::config::{load_config, AbortPolicy, AnalyzerConfig};
use plant_morphometry::image::io::{load_rgb_image, write_json_file};
use plant_morphometry::interaction::{CancelToken, ScriptedOperator, SessionScript};
use plant_morphometry::overlay::OverlaySink;
use plant_morphometry::MetricsTable;
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

struct Args {
    image: PathBuf,
    session: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut image = None;
    let mut session = None;
    let mut config = None;
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--session" => session = Some(PathBuf::from(it.next().ok_or_else(usage)?)),
            "--config" => config = Some(PathBuf::from(it.next().ok_or_else(usage)?)),
            "-h" | "--help" => return Err(usage()),
            _ if image.is_none() => image = Some(PathBuf::from(arg)),
            _ => return Err(usage()),
        }
    }
    Ok(Args {
        image: image.ok_or_else(usage)?,
        session,
        config,
    })
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AnalyzerConfig::default(),
    };

    let image = load_rgb_image(&args.image)?;
    let basename = args
        .image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let session_path = args
        .session
        .clone()
        .unwrap_or_else(|| default_session_path(&args.image, &basename));
    let script = SessionScript::load(&session_path)?;

    let cancel = CancelToken::new();
    let mut operator = ScriptedOperator::new(script, cancel.clone());
    let mut overlays = config
        .output
        .overlay_dir
        .as_ref()
        .map(|dir| OverlaySink::new(dir, basename.as_str()));
    let mut null = NullSink;
    let sink: &mut dyn VisualizationSink = match overlays.as_mut() {
        Some(s) => s,
        None => &mut null,
    };

    let analyzer = Analyzer::from_config(&config);
    match analyzer.run(&image, &mut operator, sink, &cancel) {
        Ok(outcome) => {
            save_table(&outcome.table, &config)?;
            if let Some(path) = &config.output.json {
                write_json_file(path, &outcome.report)?;
                println!("Saved report to {}", path.display());
            }
            Ok(())
        }
        Err(AnalyzeError::Aborted { completed, .. }) => {
            println!("User exited.");
            if config.abort_policy == AbortPolicy::KeepCompleted && !completed.is_empty() {
                save_table(&completed, &config)?;
            }
            Ok(())
        }
        Err(err) => Err(err.to_string()),
    }
}

fn save_table(table: &MetricsTable, config: &AnalyzerConfig) -> Result<(), String> {
    table.save_csv(&config.output.csv)?;
    println!(
        "All metrics saved to '{}' ({} plant(s))",
        config.output.csv.display(),
        table.len()
    );
    Ok(())
}

fn default_session_path(image: &Path, basename: &str) -> PathBuf {
    image.with_file_name(format!("{basename}.session.json"))
}

fn usage() -> String {
    "Usage: plant-morphometry <image_path> [--session <session.json>] [--config <config.json>]"
        .to_string()
}
