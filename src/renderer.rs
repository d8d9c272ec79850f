use crate::state::{idx_inner, FrameSnapshot};

/// Map a dye concentration to a grey level: clamped to [0, 255], truncated.
pub fn dye_to_intensity(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

/// Pixel layout: every grid cell becomes a `scale`×`scale` square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub n: usize,
    pub scale: usize,
    pub frame_width: usize,
    pub frame_height: usize,
}

impl RenderConfig {
    pub fn new(n: usize, scale: usize) -> Self {
        Self {
            n,
            scale,
            frame_width: n * scale,
            frame_height: n * scale,
        }
    }
}

/// Render the dye field to an RGBA buffer, resizing it to the frame if needed.
/// Grid row 0 is the top of the frame.
pub fn render_into(buf: &mut Vec<u8>, snap: &FrameSnapshot, cfg: &RenderConfig) {
    let fw = cfg.frame_width;
    let needed = fw * cfg.frame_height * 4;
    if buf.len() != needed {
        buf.resize(needed, 0);
    }
    debug_assert_eq!(snap.n, cfg.n);

    for j in 0..cfg.n {
        for i in 0..cfg.n {
            let g = dye_to_intensity(snap.dye[idx_inner(i, j, cfg.n)]);
            for py in (j * cfg.scale)..((j + 1) * cfg.scale) {
                let row = py * fw;
                for px in (i * cfg.scale)..((i + 1) * cfg.scale) {
                    let offset = (row + px) * 4;
                    buf[offset] = g;
                    buf[offset + 1] = g;
                    buf[offset + 2] = g;
                    buf[offset + 3] = 255;
                }
            }
        }
    }
}

/// Convert RGBA &[u8] buffer to 0RGB &[u32] buffer for minifb.
pub fn rgba_to_argb(rgba: &[u8], out: &mut [u32]) {
    for (i, pixel) in rgba.chunks_exact(4).enumerate() {
        out[i] = (pixel[0] as u32) << 16 | (pixel[1] as u32) << 8 | pixel[2] as u32;
    }
}
