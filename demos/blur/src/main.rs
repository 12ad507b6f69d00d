use argh::FromArgs;
use std::{path::PathBuf, process::ExitCode};

use rowblur::{
    imgproc::filter::{box_blur, BlurError},
    io::{read_image_any_rgba8, write_image_png_rgba8, IoError},
};

/// Name of the output file, written to the current directory.
const OUTPUT_PATH: &str = "blurred.png";

#[derive(FromArgs, Debug)]
/// Blur an image with a 3x3 box filter, one thread per batch of rows.
struct Args {
    /// number of threads, one per batch of rows
    #[argh(positional)]
    num_threads: usize,

    /// path to the input image
    #[argh(positional)]
    input_image_path: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum BlurAppError {
    #[error("{0}")]
    Decode(IoError),

    #[error("cannot blur with the requested threads. {0}")]
    Configuration(BlurError),

    #[error("{0}")]
    Encode(IoError),
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

// like argh::from_env, but usage and argument errors go to stdout
fn parse_args() -> Result<Args, ExitCode> {
    let strings = std::env::args().collect::<Vec<_>>();
    let cmd = strings
        .first()
        .and_then(|s| std::path::Path::new(s).file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("blur");
    let rest = strings.iter().skip(1).map(String::as_str).collect::<Vec<_>>();

    Args::from_args(&[cmd], &rest).map_err(|early_exit| {
        println!("{}", early_exit.output);
        match early_exit.status {
            Ok(()) => ExitCode::SUCCESS,
            Err(()) => ExitCode::FAILURE,
        }
    })
}

fn run(args: &Args) -> Result<(), BlurAppError> {
    let image = read_image_any_rgba8(&args.input_image_path).map_err(BlurAppError::Decode)?;
    log::info!(
        "read {} ({}x{})",
        args.input_image_path.display(),
        image.width(),
        image.height()
    );

    let blurred = box_blur(&image, args.num_threads).map_err(BlurAppError::Configuration)?;

    write_image_png_rgba8(OUTPUT_PATH, &blurred).map_err(BlurAppError::Encode)?;
    log::info!("wrote {OUTPUT_PATH}");

    Ok(())
}
