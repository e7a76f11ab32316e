use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use tracing::warn;
use winit::window::Window;

use crate::app::sinks::{Banner, HudState, StatusBar};
use crate::app::DrawItem;
use crate::sprite_keys::sprite_path_for_key;

use super::transform::{draw_item_rect, ScreenRect, Viewport};

const CLEAR_COLOR: [u8; 4] = [250, 214, 146, 255];
const HUD_LEFT_PX: i32 = 40;
const HUD_TOP_PX: i32 = 30;
const HUD_BAR_WIDTH_PX: u32 = 360;
const HUD_BAR_HEIGHT_PX: u32 = 26;
const HUD_BAR_SPACING_PX: i32 = 12;
const HUD_BAR_BACKGROUND: [u8; 4] = [40, 40, 40, 200];
const BANNER_PAUSED_TINT: [u8; 4] = [0, 0, 0, 110];
const BANNER_WON_TINT: [u8; 4] = [255, 220, 60, 110];
const BANNER_LOST_TINT: [u8; 4] = [120, 0, 0, 130];

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

/// Software renderer onto a fixed logical canvas. The window surface is
/// scaled by pixels; resizing never changes the canvas size.
pub struct Renderer {
    pixels: Pixels<'static>,
    canvas: Viewport,
    asset_root: PathBuf,
    sprite_cache: HashMap<String, Option<LoadedSprite>>,
    warned_sprite_keys: HashSet<String>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, canvas: Viewport, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), window);
        let pixels = Pixels::new(canvas.width.max(1), canvas.height.max(1), surface)?;
        Ok(Self {
            pixels,
            canvas,
            asset_root,
            sprite_cache: HashMap::new(),
            warned_sprite_keys: HashSet::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub fn render(&mut self, items: &[DrawItem], hud: &HudState) -> Result<(), Error> {
        let canvas = self.canvas;
        let frame = self.pixels.frame_mut();
        clear_frame(frame, CLEAR_COLOR);

        for item in items {
            let Some(rect) = draw_item_rect(item) else {
                continue;
            };
            match resolve_cached_sprite(
                &mut self.sprite_cache,
                &mut self.warned_sprite_keys,
                &self.asset_root,
                item.sprite_key,
            ) {
                Some(sprite) => draw_sprite_scaled(frame, canvas, rect, sprite, item.mirrored),
                None => fill_rect(frame, canvas, rect, item.placeholder_color),
            }
        }

        draw_hud(frame, canvas, hud);
        self.pixels.render()
    }
}

fn draw_hud(frame: &mut [u8], canvas: Viewport, hud: &HudState) {
    for (row, (bar, value)) in hud.bars().enumerate() {
        let top = HUD_TOP_PX + row as i32 * (HUD_BAR_HEIGHT_PX as i32 + HUD_BAR_SPACING_PX);
        let (left, color) = match bar {
            StatusBar::BossEnergy => (
                canvas.width as i32 - HUD_LEFT_PX - HUD_BAR_WIDTH_PX as i32,
                [230, 120, 30, 255],
            ),
            StatusBar::PlayerEnergy => (HUD_LEFT_PX, [70, 190, 70, 255]),
            StatusBar::Bottles => (HUD_LEFT_PX, [60, 140, 220, 255]),
            StatusBar::Coins => (HUD_LEFT_PX, [240, 200, 40, 255]),
        };
        let background = ScreenRect {
            left,
            top,
            width: HUD_BAR_WIDTH_PX,
            height: HUD_BAR_HEIGHT_PX,
        };
        blend_rect(frame, canvas, background, HUD_BAR_BACKGROUND);
        let fill_width = bar_fill_width(HUD_BAR_WIDTH_PX, value.ratio());
        if fill_width > 0 {
            fill_rect(
                frame,
                canvas,
                ScreenRect {
                    width: fill_width,
                    ..background
                },
                color,
            );
        }
    }

    let tint = match hud.banner() {
        Some(Banner::Paused) => BANNER_PAUSED_TINT,
        Some(Banner::Won) => BANNER_WON_TINT,
        Some(Banner::Lost) => BANNER_LOST_TINT,
        None => return,
    };
    blend_rect(
        frame,
        canvas,
        ScreenRect {
            left: 0,
            top: 0,
            width: canvas.width,
            height: canvas.height,
        },
        tint,
    );
}

fn bar_fill_width(total: u32, ratio: f32) -> u32 {
    (total as f32 * ratio.clamp(0.0, 1.0)).round() as u32
}

fn resolve_cached_sprite<'a>(
    cache: &'a mut HashMap<String, Option<LoadedSprite>>,
    warned_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
    key: &str,
) -> Option<&'a LoadedSprite> {
    if !cache.contains_key(key) {
        let sprite = match sprite_path_for_key(asset_root, key) {
            Ok(path) => match load_sprite_rgba(&path) {
                Ok(sprite) => Some(sprite),
                Err(reason) => {
                    warn_sprite_load_once(warned_sprite_keys, key, Some(&path), &reason);
                    None
                }
            },
            Err(error) => {
                warn_sprite_load_once(
                    warned_sprite_keys,
                    key,
                    None,
                    &format!("invalid_key:{error}"),
                );
                None
            }
        };
        cache.insert(key.to_string(), sprite);
    }
    cache.get(key).and_then(Option::as_ref)
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_sprite_load_once(
    warned_keys: &mut HashSet<String>,
    key: &str,
    resolved_path: Option<&Path>,
    reason: &str,
) {
    if !warned_keys.insert(key.to_string()) {
        return;
    }
    let path_display = resolved_path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    warn!(
        sprite_key = key,
        path = %path_display,
        reason = reason,
        "renderer_sprite_load_failed_using_placeholder"
    );
}

fn clear_frame(frame: &mut [u8], color: [u8; 4]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

fn fill_rect(frame: &mut [u8], canvas: Viewport, rect: ScreenRect, color: [u8; 4]) {
    let Some((left, top, right, bottom)) = rect.clipped_to(canvas) else {
        return;
    };
    let stride = canvas.width as usize * 4;
    for y in top..bottom {
        let row = y as usize * stride;
        for x in left..right {
            let offset = row + x as usize * 4;
            if let Some(pixel) = frame.get_mut(offset..offset + 4) {
                pixel.copy_from_slice(&color);
            }
        }
    }
}

fn blend_rect(frame: &mut [u8], canvas: Viewport, rect: ScreenRect, color: [u8; 4]) {
    let Some((left, top, right, bottom)) = rect.clipped_to(canvas) else {
        return;
    };
    let stride = canvas.width as usize * 4;
    for y in top..bottom {
        let row = y as usize * stride;
        for x in left..right {
            let offset = row + x as usize * 4;
            if let Some(pixel) = frame.get_mut(offset..offset + 4) {
                blend_pixel(pixel, color);
            }
        }
    }
}

fn blend_pixel(dst: &mut [u8], src: [u8; 4]) {
    let alpha = src[3] as u32;
    if alpha == 0 {
        return;
    }
    if alpha == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    let inv = 255 - alpha;
    for channel in 0..3 {
        dst[channel] = ((src[channel] as u32 * alpha + dst[channel] as u32 * inv) / 255) as u8;
    }
    dst[3] = 255;
}

/// Nearest-neighbour scale of `sprite` into `rect`, optionally mirrored horizontally.
fn draw_sprite_scaled(
    frame: &mut [u8],
    canvas: Viewport,
    rect: ScreenRect,
    sprite: &LoadedSprite,
    mirrored: bool,
) {
    if sprite.width == 0 || sprite.height == 0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }
    let Some((left, top, right, bottom)) = rect.clipped_to(canvas) else {
        return;
    };

    let stride = canvas.width as usize * 4;
    let x_scale = sprite.width as f32 / rect.width as f32;
    let y_scale = sprite.height as f32 / rect.height as f32;
    let sprite_stride = sprite.width as usize * 4;

    for out_y in top..bottom {
        let dy = (out_y - rect.top) as f32;
        let src_y = ((dy * y_scale) as u32).min(sprite.height - 1) as usize;
        for out_x in left..right {
            let mut dx = (out_x - rect.left) as u32;
            if mirrored {
                dx = rect.width - 1 - dx;
            }
            let src_x = ((dx as f32 * x_scale) as u32).min(sprite.width - 1) as usize;
            let src = src_y * sprite_stride + src_x * 4;
            let color = [
                sprite.rgba[src],
                sprite.rgba[src + 1],
                sprite.rgba[src + 2],
                sprite.rgba[src + 3],
            ];
            let dst = out_y as usize * stride + out_x as usize * 4;
            if let Some(pixel) = frame.get_mut(dst..dst + 4) {
                blend_pixel(pixel, color);
            }
        }
    }
}
