use argh::FromArgs;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageFormat, RgbaImage};
use qoi_cpr::{write_file, Config, ImageDescriptor};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Lossy, perceptually-guided QOI encoder.
///
/// Encodes a PNG or JPEG into a `.qoi` stream, trading exact pixel reproduction for smaller
/// output within a perceptual budget. Given a `.qoi` input and a raster output path, decodes
/// instead (via the `qoi` crate; this tool never parses its own opcodes back).
#[derive(FromArgs)]
struct Cli {
    /// input image: `.png`, `.jpg`/`.jpeg`, or `.qoi`
    #[argh(positional)]
    input: String,
    /// output path: `.qoi` to encode, or `.png`/`.jpg`/`.jpeg` to decode a `.qoi` input
    #[argh(positional)]
    output: String,

    /// per-channel perceptual weights as "r,g,b,a" percentages, e.g. "60,100,40,75" (default)
    #[argh(option)]
    weights: Option<Weights>,
    /// quality budget applied in low-contrast regions (default 0.5)
    #[argh(option, default = "0.5")]
    lothresh: f32,
    /// quality budget applied in high-contrast regions (default 24.0)
    #[argh(option, default = "24.0")]
    hithresh: f32,
    /// scale colour distance and local contrast by alpha, so transparent regions tolerate more drift
    #[argh(switch)]
    mulalpha: bool,
    /// encode losslessly, equivalent to --lothresh 0 --hithresh 0 --weights 1,1,1,1
    #[argh(switch)]
    lossless: bool,
    /// jpeg encode quality, 0..100 (default 95); only consumed when decoding a `.qoi` to `.jpg`/`.jpeg`
    #[argh(option, default = "95")]
    quality: u8,
}

#[derive(Debug, Clone, Copy)]
struct Weights([f32; 4]);

impl FromStr for Weights {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [0.0f32; 4];
        let mut parts = s.split(',');
        for slot in out.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| "expected 4 comma-separated weights, e.g. 60,100,40,75".to_string())?;
            let percent: f32 = part
                .trim()
                .parse()
                .map_err(|_| format!("invalid weight `{part}`"))?;
            *slot = percent / 100.0;
        }
        if parts.next().is_some() {
            return Err("expected exactly 4 comma-separated weights".into());
        }
        Ok(Weights(out))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli: Cli = argh::from_env();
    run(cli)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let input_is_qoi = has_extension(&cli.input, "qoi");
    let output_is_qoi = has_extension(&cli.output, "qoi");

    match (input_is_qoi, output_is_qoi) {
        (false, true) => encode_to_qoi(&cli),
        (true, false) => decode_from_qoi(&cli.input, &cli.output, cli.quality),
        (true, true) => Err("refusing to copy .qoi to .qoi; nothing to encode or decode".into()),
        (false, false) => Err("one of input or output must be a .qoi file".into()),
    }
}

fn encode_to_qoi(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = if cli.lossless {
        Config::lossless()
    } else {
        let weights = cli.weights.map(|w| w.0).unwrap_or(Config::default().weights);
        Config::new(weights, cli.lothresh, cli.hithresh, cli.mulalpha)
    };

    let image = image::open(&cli.input)?.into_rgba8();
    let (width, height) = image.dimensions();
    log::info!("encoding {width}x{height} image from {}", cli.input);

    let desc = ImageDescriptor::new(width, height, 4, 0);
    let written = write_file(&cli.output, image.as_raw(), desc, &cfg)?;

    println!("wrote {written} bytes to `{}`", cli.output);
    Ok(())
}

fn decode_from_qoi(input: &str, output: &str, quality: u8) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(input)?;
    let (header, pixels) = qoi::decode_to_vec(&bytes)?;
    log::info!("decoding {}x{} image from {input}", header.width, header.height);

    let image = RgbaImage::from_vec(header.width, header.height, pixels)
        .ok_or("decoded pixel buffer does not match declared image dimensions")?;

    let format = output_format(output)?;
    match format {
        ImageFormat::Jpeg => {
            let file = File::create(output)?;
            JpegEncoder::new_with_quality(file, quality).encode(
                image.as_raw(),
                header.width,
                header.height,
                ColorType::Rgba8,
            )?;
        }
        _ => image.save_with_format(output, format)?,
    }

    println!("wrote {}x{} image to `{output}`", header.width, header.height);
    Ok(())
}

fn has_extension(path: &str, ext: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn output_format(path: &str) -> Result<ImageFormat, Box<dyn std::error::Error>> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match ext.to_ascii_lowercase().as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        other => Err(format!("unsupported output format `.{other}`; use .png or .jpg").into()),
    }
}
