use argh::FromArgs;
use std::path::PathBuf;

use swirl::image::Image;
use swirl::imgproc::warp::{twist, SwirlParams};
use swirl::io::functional as F;

#[derive(FromArgs)]
/// Apply a swirl distortion to an image
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image, the encoder follows the extension
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// rotation in radians at the swirl centre
    #[argh(option, default = "1.0")]
    strength: f32,

    /// radius in pixels beyond which the image is untouched
    #[argh(option, default = "100.0")]
    radius: f32,

    /// x coordinate of the swirl centre, the image centre by default
    #[argh(option)]
    center_x: Option<f32>,

    /// y coordinate of the swirl centre, the image centre by default
    #[argh(option)]
    center_y: Option<f32>,

    /// how fast the rotation fades towards the radius
    #[argh(option, default = "0.9")]
    decay_scale: f32,

    /// jpeg quality of the output
    #[argh(option, default = "95")]
    quality: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut params = SwirlParams::new(args.strength, args.radius).with_decay_scale(args.decay_scale);
    match (args.center_x, args.center_y) {
        (Some(cx), Some(cy)) => params = params.with_center(cx, cy),
        (None, None) => {}
        _ => return Err("--center-x and --center-y must be given together".into()),
    }

    let image: Image<u8, 3> = F::read_image_any_rgb8(&args.input)?;
    log::info!("read {} ({})", args.input.display(), image.size());

    let now = std::time::Instant::now();

    let twisted = twist(&image.cast::<f32>()?, &params)?;
    let twisted: Image<u8, 3> = twisted.map_from_f32()?;

    log::info!("swirl with {:?} took {:?}", params, now.elapsed());

    F::write_image_any_rgb8(&args.output, &twisted, args.quality)?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}
