use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use focuspoint_core::detection::domain::face_detector::FaceDetector;
use focuspoint_core::detection::infrastructure::model_resolver::{
    ModelResolveError, ModelResolver,
};
use focuspoint_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use focuspoint_core::focus::domain::face_selection::FaceSelection;
use focuspoint_core::focus::infrastructure::resolver_factory::{build_resolver, FocusConfig};
use focuspoint_core::imaging::domain::image_source::ImageSource;
use focuspoint_core::imaging::infrastructure::file_image_source::FileImageSource;
use focuspoint_core::imaging::infrastructure::http_image_source::HttpImageSource;
use focuspoint_core::imaging::infrastructure::jpeg_file_writer::JpegFileWriter;
use focuspoint_core::imaging::infrastructure::location_image_source::LocationImageSource;
use focuspoint_core::pipeline::detect_faces_use_case::DetectFacesUseCase;
use focuspoint_core::pipeline::focus_point_use_case::FocusPointUseCase;
use focuspoint_core::pipeline::saliency_map_use_case::SaliencyMapUseCase;
use focuspoint_core::saliency::infrastructure::estimator_factory::SaliencyAlgorithm;
use focuspoint_core::shared::constants::{
    DEFAULT_TOP_K, FETCH_TIMEOUT_SECS, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};

/// Finds the point an image should stay centred on when cropped.
///
/// Results are printed to stdout as JSON. Failures print
/// `{"error": "..."}` and exit with status 1.
#[derive(Parser)]
#[command(name = "focuspoint", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, global = true, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Number of largest faces averaged into the focus point.
    #[arg(long, global = true, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Average every detected face instead of the largest few.
    #[arg(long, global = true)]
    all_faces: bool,

    /// Saliency fallback: fine-grained, spectral-residual or none.
    #[arg(long, global = true, default_value = "fine-grained")]
    saliency: SaliencyAlgorithm,

    /// Image download timeout in seconds.
    #[arg(long, global = true, default_value_t = FETCH_TIMEOUT_SECS)]
    timeout: u64,

    /// Face detection model (skips the cache lookup and download).
    #[arg(long, global = true)]
    model: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the focus point as {"x": .., "y": ..}.
    Point { url: String },
    /// Print every detected face as [{"bbox": [x1, y1, x2, y2]}].
    Faces { url: String },
    /// Write the image with detected faces outlined.
    Boxes {
        url: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write the image with the focus point marked.
    Focus {
        url: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write the saliency map as a greyscale image.
    SaliencyMap {
        url: String,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct OutputBody<'a> {
    output: &'a Path,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        print_json(&ErrorBody {
            error: e.to_string(),
        });
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let source = build_source(cli.timeout)?;
    let resolver = build_resolver(build_detector(&cli)?, &focus_config(&cli));
    let writer = Box::new(JpegFileWriter::new());

    match &cli.command {
        Command::Point { url } => {
            let use_case = FocusPointUseCase::new(source, resolver, writer);
            let resolution = use_case.execute(url)?;
            log::info!("Focus point from {} tier", resolution.tier);
            print_json(&resolution.point);
        }
        Command::Faces { url } => {
            let use_case = DetectFacesUseCase::new(source, resolver, writer);
            print_json(&use_case.execute(url)?);
        }
        Command::Boxes { url, output } => {
            let use_case = DetectFacesUseCase::new(source, resolver, writer);
            use_case.execute_to_file(url, output)?;
            print_json(&OutputBody { output });
        }
        Command::Focus { url, output } => {
            let use_case = FocusPointUseCase::new(source, resolver, writer);
            use_case.execute_to_file(url, output)?;
            print_json(&OutputBody { output });
        }
        Command::SaliencyMap { url, output } => {
            let use_case = SaliencyMapUseCase::new(source, resolver, writer);
            use_case.execute_to_file(url, output)?;
            print_json(&OutputBody { output });
        }
    }

    Ok(())
}

fn build_source(timeout_secs: u64) -> Result<Box<dyn ImageSource>, Box<dyn std::error::Error>> {
    let remote = HttpImageSource::with_timeout(Duration::from_secs(timeout_secs))?;
    Ok(Box::new(LocationImageSource::new(
        Box::new(remote),
        Box::new(FileImageSource::new()),
    )))
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let model_path = match &cli.model {
        Some(path) => path.clone(),
        None => {
            log::info!("Resolving model: {YOLO_MODEL_NAME}");
            let (path, downloaded) = fetch_model(&ModelResolver::new()?)?;
            if downloaded {
                // end the progress line
                eprintln!();
            }
            path
        }
    };
    Ok(Box::new(OnnxYoloDetector::new(&model_path, cli.confidence)?))
}

/// Resolves the face model, reporting whether it had to be downloaded.
fn fetch_model(resolver: &ModelResolver) -> Result<(PathBuf, bool), ModelResolveError> {
    let downloaded = resolver.find_local(YOLO_MODEL_NAME).is_none();
    let path = resolver.resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        Some(Box::new(download_progress)),
    )?;
    Ok((path, downloaded))
}

fn focus_config(cli: &Cli) -> FocusConfig {
    let face_selection = if cli.all_faces {
        FaceSelection::All
    } else {
        FaceSelection::Largest(cli.top_k)
    };
    FocusConfig {
        face_selection,
        saliency: cli.saliency,
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.top_k == 0 {
        return Err("Top-k must be at least 1".into());
    }
    if cli.timeout == 0 {
        return Err("Timeout must be at least 1 second".into());
    }
    if let Some(model) = &cli.model {
        if !model.is_file() {
            return Err(format!("Model file not found: {}", model.display()).into());
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialise output: {e}"),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
