use argh::FromArgs;
use std::path::PathBuf;

use swirl::face::{
    compare_faces, detect_face, CascadeDetector, CascadeDetectorConfig, FaceError, FaceLocator,
    FaceMatch, HistogramCorrelation, Verdict, DEFAULT_REGION_HEIGHT, DEFAULT_REGION_WIDTH,
    DEFAULT_SIMILARITY_THRESHOLD,
};
use swirl::image::{Image, ImageSize};
use swirl::io::functional as F;

#[derive(FromArgs)]
/// Compare the most prominent face of two images
struct Args {
    /// path to the reference image
    #[argh(option)]
    actual: PathBuf,

    /// path to the image under test
    #[argh(option)]
    test: PathBuf,

    /// path to an OpenCV Haar cascade, e.g. haarcascade_frontalface_default.xml
    #[argh(option)]
    cascade: PathBuf,

    /// similarity above which both faces are deemed the same person
    #[argh(option, default = "DEFAULT_SIMILARITY_THRESHOLD")]
    threshold: f64,

    /// width of the compared face regions
    #[argh(option, default = "DEFAULT_REGION_WIDTH")]
    width: usize,

    /// height of the compared face regions
    #[argh(option, default = "DEFAULT_REGION_HEIGHT")]
    height: usize,
}

/// Compare the most prominent faces of both images.
///
/// Returns `None` when either image has no face.
fn compare_images<L: FaceLocator + ?Sized>(
    locator: &L,
    actual: &Image<u8, 3>,
    test: &Image<u8, 3>,
    target: ImageSize,
    threshold: f64,
) -> Result<Option<FaceMatch>, FaceError> {
    let (Some(actual_face), Some(test_face)) = (
        detect_face(locator, actual, target)?,
        detect_face(locator, test, target)?,
    ) else {
        return Ok(None);
    };

    log::info!(
        "faces at {:?} and {:?}",
        actual_face.rect,
        test_face.rect
    );

    compare_faces(
        &HistogramCorrelation::default(),
        &actual_face,
        &test_face,
        threshold,
    )
    .map(Some)
}

/// The lines printed for a comparison outcome.
fn report(outcome: Option<&FaceMatch>) -> Vec<String> {
    let Some(result) = outcome else {
        return vec!["Face(s) not detected.".to_string()];
    };

    let verdict = match result.verdict {
        Verdict::SameSubject => "Faces might be of the same person.",
        Verdict::DifferentSubjects => "Faces likely of different people.",
    };

    vec![format!("Similarity Score: {}", result.score), verdict.to_string()]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let detector = CascadeDetector::from_file(&args.cascade, CascadeDetectorConfig::default())?;
    let target = ImageSize {
        width: args.width,
        height: args.height,
    };

    let actual = F::read_image_any_rgb8(&args.actual)?;
    let test = F::read_image_any_rgb8(&args.test)?;

    let outcome = compare_images(&detector, &actual, &test, target, args.threshold)?;
    for line in report(outcome.as_ref()) {
        println!("{line}");
    }

    Ok(())
}
