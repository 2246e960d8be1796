//! minifb window showing an unPNG.

use minifb::{Key, Scale, ScaleMode, Window, WindowOptions};
use unpng_core::{PixelFormat, UnPng};

/// Checkerboard cell size behind transparent pixels.
const CHECKER: usize = 8;

/// Converts rows to minifb's 0RGB, compositing alpha over a checkerboard.
pub fn to_framebuffer(img: &UnPng<'_>) -> Vec<u32> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut fb = Vec::with_capacity(w * h);
    for (y, row) in img.rows().enumerate() {
        match img.format() {
            PixelFormat::Rgb8 => {
                fb.extend(row.chunks_exact(3).map(|p| rgb(p[0], p[1], p[2])));
            }
            PixelFormat::Rgba8 => {
                fb.extend(row.chunks_exact(4).enumerate().map(|(x, p)| {
                    let bg: u16 = if (x / CHECKER + y / CHECKER) % 2 == 0 { 0xCC } else { 0x99 };
                    let a = p[3] as u16;
                    let mix = |c: u8| ((c as u16 * a + bg * (255 - a) + 127) / 255) as u8;
                    rgb(mix(p[0]), mix(p[1]), mix(p[2]))
                }));
            }
        }
    }
    fb
}

fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Blocks until the window is closed or Esc is pressed.
pub fn show(img: &UnPng<'_>, title: &str) -> Result<(), String> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let fb = to_framebuffer(img);

    let mut window = Window::new(
        title, w, h,
        WindowOptions {
            scale: Scale::X1,
            scale_mode: ScaleMode::AspectRatioStretch,
            resize: true,
            ..Default::default()
        },
    ).map_err(|e| format!("window: {}", e))?;
    window.set_target_fps(30);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&fb, w, h).map_err(|e| format!("window: {}", e))?;
    }
    Ok(())
}
