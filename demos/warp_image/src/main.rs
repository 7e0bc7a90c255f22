use argh::FromArgs;
use warpkit::{
    image::Image,
    imgproc::{
        filter::Filter,
        parallel::ExecutionStrategy,
        warp::{transform_into, MeshMap, Region, TransformMethod, TransformParams},
    },
};

/// Warps an image with an affine, extent, perspective, quad or mesh transform
#[derive(Debug, FromArgs)]
struct Args {
    /// input image path
    #[argh(positional)]
    input: String,

    /// output image path
    #[argh(positional)]
    output: String,

    /// transform method: affine, extent, perspective, quad or mesh
    #[argh(option, short = 'm', default = "TransformMethod::Affine")]
    method: TransformMethod,

    /// comma separated parameters; for mesh, 12 values per entry:
    /// region x0,y0,x1,y1 then quad nw,sw,se,ne
    #[argh(option, short = 'p', default = "String::new()")]
    params: String,

    /// output width, defaults to the input width
    #[argh(option)]
    width: Option<usize>,

    /// output height, defaults to the input height
    #[argh(option)]
    height: Option<usize>,

    /// resampling filter: nearest, box, linear, hermite, mitchell, catmullrom, lanczos
    #[argh(option, short = 'f', default = "Filter::LINEAR", from_str_fn(parse_filter))]
    filter: Filter,

    /// color for pixels without a source sample, as r,g,b,a
    #[argh(option, from_str_fn(parse_color))]
    fill: Option<[u8; 4]>,

    /// number of threads, 0 runs on the current thread
    #[argh(option, short = 't')]
    threads: Option<usize>,
}

fn parse_values(value: &str) -> Result<Vec<f64>, String> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("{v}: {e}")))
        .collect()
}

fn parse_filter(value: &str) -> Result<Filter, String> {
    Filter::from_name(value).ok_or_else(|| format!("unsupported filter: {value}"))
}

fn parse_color(value: &str) -> Result<[u8; 4], String> {
    let channels = value
        .split(',')
        .map(|v| v.trim().parse::<u8>().map_err(|e| format!("{v}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    channels
        .try_into()
        .map_err(|_| "fill color needs 4 channels".to_string())
}

fn mesh_from_values(values: &[f64]) -> Result<MeshMap, String> {
    if values.len() % 12 != 0 {
        return Err(format!(
            "mesh needs 12 values per entry, got {}",
            values.len()
        ));
    }
    Ok(values
        .chunks_exact(12)
        .map(|e| {
            let region = Region::new(e[0] as i64, e[1] as i64, e[2] as i64, e[3] as i64);
            let mut quad = [0.0; 8];
            quad.copy_from_slice(&e[4..]);
            (region, quad)
        })
        .collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let rgba = image::open(&args.input)?.to_rgba8();
    let (w, h) = rgba.dimensions();
    let src = Image::<u8, 4>::new([w as usize, h as usize].into(), rgba.into_raw())?;

    let dst_size = [
        args.width.unwrap_or(src.width()),
        args.height.unwrap_or(src.height()),
    ];
    let mut dst = Image::<u8, 4>::from_size_val(dst_size.into(), 0)?;

    let values = parse_values(&args.params)?;
    let params = match args.method {
        TransformMethod::Mesh => TransformParams::Mesh(mesh_from_values(&values)?),
        _ => TransformParams::Values(values),
    };

    let strategy = match args.threads {
        None => ExecutionStrategy::ParallelRows,
        Some(0) => ExecutionStrategy::Serial,
        Some(n) => ExecutionStrategy::Fixed(n),
    };

    log::info!(
        "warping {} ({}) into {} with {:?}",
        args.input,
        src.size(),
        dst.size(),
        args.filter
    );

    let start = std::time::Instant::now();
    transform_into(
        &src,
        &mut dst,
        args.method,
        &params,
        &args.filter,
        args.fill,
        strategy,
    )?;
    log::info!("{} transform took {:?}", args.method, start.elapsed());

    let (out_w, out_h) = (dst.width() as u32, dst.height() as u32);
    let out = image::RgbaImage::from_raw(out_w, out_h, dst.into_vec())
        .ok_or("output buffer does not match its size")?;
    out.save(&args.output)?;

    log::info!("saved {}", args.output);

    Ok(())
}
