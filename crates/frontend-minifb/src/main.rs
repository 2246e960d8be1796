//! unPNG command-line frontend.
//!
//! - `unpng encode <input> <output>`: convert any image the `image` crate
//!   can open into an unPNG (RGBA by default, `--no-alpha` for RGB).
//! - `unpng info <file>`: print geometry and row offsets, `--json` for a
//!   machine-readable document.
//! - `unpng view <file>`: show an unPNG in a window, reading rows straight
//!   out of the file without inflating.

use log::{debug, error, info, LevelFilter};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::Path;
use std::process::exit;
use unpng_core::{verify, Encoder, PixelBuffer, PixelFormat, Profile, UnPng};

mod viewer;

fn usage(program: &str) -> ! {
    eprintln!("unPNG tools v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Usage:");
    eprintln!("  {} encode <input> <output> [--no-alpha] [--verify]", program);
    eprintln!("  {} info <file.png> [--json]", program);
    eprintln!("  {} view <file.png>", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --no-alpha     Write RGB instead of RGBA");
    eprintln!("  --verify       Re-read the output with a full PNG check");
    eprintln!("  --profile F    Load encoder profile from a JSON file");
    eprintln!("  --max-res N    Resolution ceiling (default {})", Profile::default().max_resolution);
    eprintln!("  --json         Print info as JSON");
    eprintln!("  -v             Debug logging (-vv for trace)");
    exit(1);
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Positional arguments after the subcommand, skipping flags and their values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut i = 2;
    while i < args.len() {
        if args[i] == "--max-res" || args[i] == "--profile" {
            i += 2;
            continue;
        }
        if !args[i].starts_with('-') {
            out.push(args[i].as_str());
        }
        i += 1;
    }
    out
}

/// Profile JSON; missing fields take their defaults.
fn parse_profile(json: &str) -> Result<Profile, String> {
    serde_json::from_str(json).map_err(|e| e.to_string())
}

fn profile_from_args(args: &[String]) -> Result<Profile, String> {
    let mut profile = Profile::default();
    if let Some(path) = flag_value(args, "--profile") {
        let json = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
        profile = parse_profile(&json).map_err(|e| format!("{}: {}", path, e))?;
        debug!("profile from {}: {:?}", path, profile);
    }
    if let Some(s) = flag_value(args, "--max-res") {
        let n: u32 = s.parse().map_err(|e| format!("--max-res {}: {}", s, e))?;
        profile = profile.with_max_resolution(n);
    }
    profile.validate().map_err(|e| e.to_string())?;
    Ok(profile)
}

fn init_logger(args: &[String]) {
    let level = if has_flag(args, "-vv") {
        LevelFilter::Trace
    } else if has_flag(args, "-v") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).env().init() {
        eprintln!("Warning: logger: {}", e);
    }
}

// ─── Encode ─────────────────────────────────────────────────────────────────

/// Decode `path` into a buffer in `format`. Source decoding stays outside
/// the core; the `image` crate handles every input format.
fn load_image(path: &str, format: PixelFormat) -> Result<PixelBuffer, String> {
    let img = image::open(path).map_err(|e| format!("{}: {}", path, e))?;
    let (width, height) = (img.width(), img.height());
    let data = match format {
        PixelFormat::Rgb8 => img.to_rgb8().into_raw(),
        PixelFormat::Rgba8 => img.to_rgba8().into_raw(),
    };
    PixelBuffer::new(width, height, format, data).map_err(|e| e.to_string())
}

fn run_encode(args: &[String], profile: Profile) -> Result<(), String> {
    let pos = positionals(args);
    let (input, output) = match pos.as_slice() {
        [input, output] => (*input, *output),
        _ => usage(&args[0]),
    };
    let format = if has_flag(args, "--no-alpha") { PixelFormat::Rgb8 } else { PixelFormat::Rgba8 };

    let buffer = load_image(input, format)?;
    debug!("loaded {} ({}x{})", input, buffer.width(), buffer.height());

    let encoder = Encoder::new(profile).map_err(|e| e.to_string())?;
    encoder
        .encode_file(Path::new(output), format, &buffer)
        .map_err(|e| format!("{}: {}", output, e))?;
    info!("wrote {} ({}x{} {})", output, buffer.width(), buffer.height(), format);

    if has_flag(args, "--verify") {
        let bytes = fs::read(output).map_err(|e| format!("{}: {}", output, e))?;
        let report = verify(&bytes).map_err(|e| format!("{}: verification failed: {}", output, e))?;
        if report.pixels() != buffer.data() {
            return Err(format!("{}: verification failed: pixel data differs", output));
        }
        UnPng::parse_with(&profile, &bytes).map_err(|e| format!("{}: {}", output, e))?;
        info!("verified {}: {} chunks, adler32 {:08x}", output, report.chunks.len(), report.adler32);
    }
    Ok(())
}

// ─── Info ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct InfoDoc<'a> {
    path: &'a str,
    width: u32,
    height: u32,
    format: PixelFormat,
    file_len: usize,
    row_len: usize,
    row_record_len: usize,
    first_row_offset: usize,
    adler32: String,
    profile: Profile,
}

fn run_info(args: &[String], profile: Profile) -> Result<(), String> {
    let path = match positionals(args).as_slice() {
        [path] => *path,
        _ => usage(&args[0]),
    };
    let bytes = fs::read(path).map_err(|e| format!("{}: {}", path, e))?;
    let img = UnPng::parse_with(&profile, &bytes).map_err(|e| format!("{}: {}", path, e))?;
    let layout = img.layout();
    let doc = InfoDoc {
        path,
        width: img.width(),
        height: img.height(),
        format: img.format(),
        file_len: layout.file_len(),
        row_len: layout.row_len(),
        row_record_len: layout.row_record_len(),
        first_row_offset: layout.row_pixels_offset(0),
        adler32: format!("{:08x}", img.stored_adler32()),
        profile,
    };

    if has_flag(args, "--json") {
        let s = serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?;
        println!("{}", s);
    } else {
        println!("{}: {}x{} {}", doc.path, doc.width, doc.height, doc.format);
        println!("  file length     {}", doc.file_len);
        println!("  row length      {} (+8 header)", doc.row_len);
        println!("  row 0 pixels at {}", doc.first_row_offset);
        println!("  row y pixels at {} + y * {}", doc.first_row_offset, doc.row_record_len);
        println!("  adler32         {}", doc.adler32);
    }
    Ok(())
}

// ─── View ───────────────────────────────────────────────────────────────────

fn run_view(args: &[String], profile: Profile) -> Result<(), String> {
    let path = match positionals(args).as_slice() {
        [path] => *path,
        _ => usage(&args[0]),
    };
    let bytes = fs::read(path).map_err(|e| format!("{}: {}", path, e))?;
    let img = UnPng::parse_with(&profile, &bytes).map_err(|e| format!("{}: {}", path, e))?;
    viewer::show(&img, &format!("unPNG viewer - {}", path))
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
    }
    init_logger(&args);

    let result = profile_from_args(&args).and_then(|profile| match args[1].as_str() {
        "encode" => run_encode(&args, profile),
        "info" => run_info(&args, profile),
        "view" => run_view(&args, profile),
        _ => usage(&args[0]),
    });

    if let Err(e) = result {
        error!("{}", e);
        exit(1);
    }
}
