//! PNG preview of a role's gradient colors.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::fetch::RoleColors;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 200;

pub fn filename(role_id: u64) -> String {
    format!("role-gradient-{}.png", role_id)
}

fn channels(color: u32) -> [f32; 3] {
    [
        ((color >> 16) & 0xFF) as f32,
        ((color >> 8) & 0xFF) as f32,
        (color & 0xFF) as f32,
    ]
}

/// Color at `t` in `0.0..=1.0` along evenly spaced stops.
fn color_at(stops: &[u32], t: f32) -> Rgba<u8> {
    let [r, g, b] = match stops {
        [] => [0.0; 3],
        [only] => channels(*only),
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let i = (scaled.floor() as usize).min(stops.len() - 2);
            let local = scaled - i as f32;
            let (from, to) = (channels(stops[i]), channels(stops[i + 1]));
            [0usize, 1, 2].map(|k| from[k] + (to[k] - from[k]) * local)
        }
    };
    Rgba([r.round() as u8, g.round() as u8, b.round() as u8, 255])
}

/// Horizontal linear gradient across the role's color stops, PNG encoded.
/// A single stop renders as a solid fill.
pub fn render(colors: &RoleColors) -> Result<Vec<u8>, image::ImageError> {
    let stops: Vec<u32> = colors.stops().into_iter().map(|(_, c)| c).collect();
    let last = (WIDTH - 1) as f32;
    let columns: Vec<Rgba<u8>> = (0..WIDTH)
        .map(|x| color_at(&stops, x as f32 / last))
        .collect();
    let img = RgbaImage::from_fn(WIDTH, HEIGHT, |x, _| columns[x as usize]);

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
