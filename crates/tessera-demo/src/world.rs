//! A small generated island the demo walks around on.

use tessera_engine::light::DayCycle;

use crate::art::{self, hash};

pub const TILE: i32 = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tile {
    Grass,
    Water,
    Stone,
    Tree,
}

impl Tile {
    pub fn cell(self) -> (i32, i32) {
        match self {
            Tile::Grass => art::GRASS,
            Tile::Water => art::WATER,
            Tile::Stone => art::STONE,
            Tile::Tree => art::TREE,
        }
    }

    fn walkable(self) -> bool {
        matches!(self, Tile::Grass | Tile::Stone)
    }
}

pub struct World {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,

    pub player: (i32, i32),
    pub facing_left: bool,
    pub torches: Vec<(i32, i32)>,

    pub cycle: DayCycle,
    pub level: i32,
}

impl World {
    pub const DAY_LENGTH: u64 = 64800;

    pub fn generate(width: i32, height: i32, seed: i32) -> Self {
        let (cx, cy) = (width / 2, height / 2);
        let mut tiles = Vec::with_capacity((width * height) as usize);
        let mut torches = Vec::new();

        for y in 0..height {
            for x in 0..width {
                let (dx, dy) = (x - cx, y - cy);
                let island = dx * dx + dy * dy < (width * width) / 5;
                let roll = hash(x + seed, y - seed) % 100;
                let tile = if !island {
                    Tile::Water
                } else if roll < 8 {
                    Tile::Tree
                } else if roll < 14 {
                    Tile::Stone
                } else {
                    Tile::Grass
                };
                if tile == Tile::Stone && roll == 13 {
                    torches.push((x * TILE + 4, y * TILE + 4));
                }
                tiles.push(tile);
            }
        }
        // Spawn is always clear.
        tiles[(cy * width + cx) as usize] = Tile::Grass;

        Self {
            width,
            height,
            tiles,
            player: (cx * TILE, cy * TILE),
            facing_left: false,
            torches,
            cycle: DayCycle::new(Self::DAY_LENGTH / 2, Self::DAY_LENGTH, false),
            level: 3,
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> Tile {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return Tile::Water;
        }
        self.tiles[(y * self.width + x) as usize]
    }

    /// One fixed step: the clock advances and the player wanders.
    pub fn tick(&mut self) {
        self.cycle.tick_count += 1;
        if self.cycle.tick_count % Self::DAY_LENGTH == 0 {
            self.cycle.past_day1 = true;
        }

        let t = self.cycle.tick_count as i32;
        if t % 4 != 0 {
            return;
        }
        let dir = hash(t / 64, 7) % 4;
        let (dx, dy) = [(1, 0), (-1, 0), (0, 1), (0, -1)][dir as usize];
        let next = (self.player.0 + dx, self.player.1 + dy);
        let feet = ((next.0 + 4).div_euclid(TILE), (next.1 + 12).div_euclid(TILE));
        if self.tile(feet.0, feet.1).walkable() {
            self.player = next;
        }
        if dx != 0 {
            self.facing_left = dx < 0;
        }
    }
}
