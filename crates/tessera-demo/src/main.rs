mod art;
mod world;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use tessera_engine::coords::SurfaceSize;
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::device::GpuInit;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::paint::Color;
use tessera_engine::render::{Renderer, SpriteSheet, CELL};
use tessera_engine::scene::{Axis, Mirror, Screen, Sprite, SpriteCell, SpriteStyle};
use tessera_engine::window::{Runtime, RuntimeConfig};

use world::{World, TILE};

/// GUI layer clear: white at zero alpha, so the world shows through.
const GUI_CLEAR: u32 = 0x00_ff_ff_ff;

struct Layers {
    world: Screen,
    gui: Screen,
    sheet: SpriteSheet,
    player: Sprite,
}

struct Demo {
    world: World,
    layers: Option<Layers>,
    paused: bool,
    speed: f64,
}

impl Demo {
    fn new() -> Self {
        Self {
            world: World::generate(48, 48, 7),
            layers: None,
            paused: false,
            speed: 1.0,
        }
    }

    fn draw_world(&self, layers: &mut Layers) {
        let world = &self.world;
        let screen = &mut layers.world;
        let size = screen.size();
        let (w, h) = (size.width as i32, size.height as i32);

        let cam_x = world.player.0 + TILE - w / 2;
        let cam_y = world.player.1 + TILE - h / 2;

        screen.clear(0);
        screen.set_offset(cam_x, cam_y);

        let (x0, y0) = (cam_x.div_euclid(TILE), cam_y.div_euclid(TILE));
        for ty in y0..=y0 + h / TILE + 1 {
            for tx in x0..=x0 + w / TILE + 1 {
                let (cx, cy) = world.tile(tx, ty).cell();
                screen.render_cell(tx * TILE, ty * TILE, layers.sheet, cx, cy, SpriteStyle::default());
            }
        }

        for &(x, y) in &world.torches {
            let (cx, cy) = art::TORCH;
            let style = SpriteStyle {
                full_bright: true,
                ..SpriteStyle::default()
            };
            screen.render_cell(x - 4, y - 4, layers.sheet, cx, cy, style);
            screen.render_light(x, y, 40);
        }

        let mirror = if world.facing_left { Mirror::X } else { Mirror::NONE };
        let (px, py) = world.player;
        screen.render_sprite(px, py, &layers.player, mirror, false, None);
        screen.render_light(px + 8, py + 8, 56);

        // Selection marker on the tile in front of the player.
        let ahead = if world.facing_left { px - TILE } else { px + 2 * TILE };
        let marker_y = (py + 8).div_euclid(TILE) * TILE;
        let marker_x = ahead.div_euclid(TILE) * TILE;
        screen.draw_line_special(marker_x, marker_y, Axis::X, TILE - 1);
        screen.draw_line_special(marker_x, marker_y + TILE - 1, Axis::X, TILE - 1);

        let (xa, ya) = (cam_x.rem_euclid(4), cam_y.rem_euclid(4));
        screen.overlay(world.level, xa, ya, &world.cycle);
    }

    fn draw_gui(&self, layers: &mut Layers, fps: u32, tps: u32) {
        let screen = &mut layers.gui;
        let size = screen.size();
        let w = size.width as i32;

        screen.clear(GUI_CLEAR);
        screen.set_offset(0, 0);

        // Rate bars, one pixel per frame/tick.
        screen.fill_rect(4, 4, 64, 10, Color::rgba(0.0, 0.0, 0.0, 0.6));
        screen.fill_rect(6, 6, fps.min(60) as i32, 2, Color::from_rgb24(0x40ff40));
        screen.fill_rect(6, 10, tps.min(60) as i32, 2, Color::from_rgb24(0x40a0ff));
        screen.draw_rect(4, 4, 64, 10, Color::WHITE);

        // Day progress.
        let day = &self.world.cycle;
        let progress = (day.tick_count % World::DAY_LENGTH) as f64 / World::DAY_LENGTH as f64;
        let bar = w - 16;
        screen.draw_axis_line(8, 20, Axis::X, bar, Color::from_rgb24(0x808080));
        let sun = 8 + (progress * bar as f64) as i32;
        screen.draw_line(sun, 18, sun, 22, Color::from_rgb24(0xffd040));

        if self.paused {
            let (cx, cy) = art::PLAYER;
            let tint = SpriteStyle {
                color: Some(Color::WHITE),
                ..SpriteStyle::default()
            };
            screen.render_cell(w - 12, 4, layers.sheet, cx, cy, tint);
        }
    }
}

impl App for Demo {
    fn init(&mut self, renderer: &mut Renderer, resolution: SurfaceSize) -> Result<()> {
        let sheet = renderer.upload_image(&art::sheet()?)?;
        let c = CELL as i32;
        log::info!("sheet uploaded: {}x{} cells", sheet.width as i32 / c, sheet.height as i32 / c);

        let (px, py) = art::PLAYER;
        let cell = |dx, dy| SpriteCell {
            x: px + dx,
            y: py + dy,
            mirror: Mirror::NONE,
            sheet,
        };
        let player = Sprite {
            cells: vec![vec![cell(0, 0), cell(1, 0)], vec![cell(0, 1), cell(1, 1)]],
            white_tint: Some(Color::from_rgb24(0xc03030)),
        };

        self.layers = Some(Layers {
            world: renderer.create_screen(resolution),
            gui: renderer.create_screen(resolution),
            sheet,
            player,
        });
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
            PhysicalKey::Code(KeyCode::Space) => self.paused = !self.paused,
            PhysicalKey::Code(KeyCode::KeyL) => {
                self.world.level = (self.world.level + 1) % 6;
                log::info!("level {}", self.world.level);
            }
            PhysicalKey::Code(KeyCode::Equal) => self.speed = (self.speed * 2.0).min(64.0),
            PhysicalKey::Code(KeyCode::Minus) => self.speed = (self.speed / 2.0).max(0.25),
            _ => {}
        }
        AppControl::Continue
    }

    fn tick(&mut self) -> AppControl {
        if !self.paused {
            self.world.tick();
        }
        AppControl::Continue
    }

    fn in_play(&self) -> bool {
        !self.paused
    }

    fn game_speed(&self) -> Option<f64> {
        Some(self.speed)
    }

    fn render(&mut self, frame: &mut FrameCtx<'_>) -> AppControl {
        let Some(mut layers) = self.layers.take() else {
            return AppControl::Continue;
        };

        self.draw_world(&mut layers);
        self.draw_gui(&mut layers, frame.stats.fps, frame.stats.tps);

        layers.world.flush(&mut *frame.recorder);
        layers.gui.flush(&mut *frame.recorder);
        frame.composite(&layers.gui, &layers.world);
        frame.present(&layers.world);

        self.layers = Some(layers);
        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "tessera demo".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), Demo::new())
}
