//! Procedurally painted sprite sheet, so the demo ships without image files.

use tessera_engine::render::{ImageError, PixelBuffer};

/// Sheet cells, `(column, row)`.
pub const GRASS: (i32, i32) = (0, 0);
pub const WATER: (i32, i32) = (1, 0);
pub const STONE: (i32, i32) = (2, 0);
pub const TREE: (i32, i32) = (3, 0);
/// 2x2 player, top-left cell.
pub const PLAYER: (i32, i32) = (4, 0);
pub const TORCH: (i32, i32) = (6, 0);

const SHEET_W: u32 = 64;
const SHEET_H: u32 = 16;

const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn rgb(v: u32) -> [u8; 4] {
    [(v >> 16) as u8, (v >> 8) as u8, v as u8, 255]
}

/// Cheap integer hash for texture speckle.
pub fn hash(x: i32, y: i32) -> u32 {
    let mut h = (x as u32).wrapping_mul(0x27d4_eb2d) ^ (y as u32).wrapping_mul(0x1656_67b1);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^ (h >> 13)
}

fn paint(cx: u32, cy: u32, x: u32, y: u32) -> [u8; 4] {
    let speckle = hash(x as i32, y as i32) % 5 == 0;
    match (cx, cy) {
        (0, 0) => rgb(if speckle { 0x3f8f3a } else { 0x4ca845 }),
        (1, 0) => rgb(if (x + y * 2) % 7 == 0 { 0x6f9fff } else { 0x2d5fd0 }),
        (2, 0) => rgb(if speckle { 0x6b6b6b } else { 0x8a8a8a }),
        (3, 0) => {
            let dx = x as i32 - 4;
            let dy = y as i32 - 3;
            if dx * dx + dy * dy <= 9 {
                rgb(if speckle { 0x1f5e1a } else { 0x2b7a22 })
            } else if (3..=4).contains(&x) && y >= 5 {
                rgb(0x6b4423)
            } else {
                CLEAR
            }
        }
        // Player, 2x2 cells: head, body, legs; white pixels take the tint.
        (4..=5, 0..=1) => {
            let px = (cx - 4) * 8 + x;
            let py = cy * 8 + y;
            let inside = (4..12).contains(&px);
            if !inside {
                CLEAR
            } else if py < 6 {
                rgb(0xe0b090)
            } else if py < 12 {
                [255, 255, 255, 255]
            } else if (px < 7 || px > 8) && py < 16 {
                rgb(0x303040)
            } else {
                CLEAR
            }
        }
        (6, 0) => {
            if (3..=4).contains(&x) && y >= 3 {
                rgb(0x6b4423)
            } else if (2..=5).contains(&x) && y < 3 {
                rgb(0xffd040)
            } else {
                CLEAR
            }
        }
        _ => CLEAR,
    }
}

pub fn sheet() -> Result<PixelBuffer, ImageError> {
    PixelBuffer::from_fn(SHEET_W, SHEET_H, |x, y| paint(x / 8, y / 8, x % 8, y % 8))
}
