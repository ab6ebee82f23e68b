//! Block name to per-face texture name resolution.
//!
//! A block resolves through, in order: the per-face table, name aliases,
//! structural derivations (stairs to their material and so on), and finally
//! the pack's own textures of the same name. Anything left over has no
//! texture and is drawn with the placeholder tile.

use crate::resource_pack::TexturePack;
use crate::types::Face;

const MAX_DEPTH: usize = 4;

/// Blocks that are never drawn and never reported as missing.
const INVISIBLE: &[&str] = &[
    "air",
    "cave_air",
    "void_air",
    "light",
    "barrier",
    "structure_void",
];

const WOOD_TYPES: &[&str] = &[
    "oak", "spruce", "birch", "jungle", "acacia", "dark_oak", "mangrove", "cherry", "bamboo",
    "crimson", "warped", "pale_oak",
];

const COLORS: &[&str] = &[
    "white", "orange", "magenta", "light_blue", "yellow", "lime", "pink", "gray", "light_gray",
    "cyan", "purple", "blue", "brown", "green", "red", "black",
];

/// Which face a table entry's front texture lands on.
#[derive(Clone, Copy)]
enum Front {
    /// Horizontal blocks are authored facing north.
    North(&'static str),
    /// Directional blocks are authored facing up.
    Top(&'static str),
}

struct FaceEntry {
    name: &'static str,
    top: &'static str,
    bottom: &'static str,
    side: &'static str,
    front: Option<Front>,
}

const fn entry(
    name: &'static str,
    top: &'static str,
    bottom: &'static str,
    side: &'static str,
    front: Option<Front>,
) -> FaceEntry {
    FaceEntry {
        name,
        top,
        bottom,
        side,
        front,
    }
}

/// Blocks whose faces do not follow the `_top`/`_side`/`_bottom` naming.
const FACE_TABLE: &[FaceEntry] = &[
    entry("grass_block", "grass_block_top", "dirt", "grass_block_side", None),
    entry("podzol", "podzol_top", "dirt", "podzol_side", None),
    entry("mycelium", "mycelium_top", "dirt", "mycelium_side", None),
    entry("dirt_path", "dirt_path_top", "dirt", "dirt_path_side", None),
    entry("farmland", "farmland", "dirt", "dirt", None),
    entry("crimson_nylium", "crimson_nylium", "netherrack", "crimson_nylium_side", None),
    entry("warped_nylium", "warped_nylium", "netherrack", "warped_nylium_side", None),
    entry("bookshelf", "oak_planks", "oak_planks", "bookshelf", None),
    entry(
        "crafting_table",
        "crafting_table_top",
        "oak_planks",
        "crafting_table_side",
        Some(Front::North("crafting_table_front")),
    ),
    entry(
        "furnace",
        "furnace_top",
        "furnace_top",
        "furnace_side",
        Some(Front::North("furnace_front")),
    ),
    entry(
        "blast_furnace",
        "blast_furnace_top",
        "blast_furnace_top",
        "blast_furnace_side",
        Some(Front::North("blast_furnace_front")),
    ),
    entry(
        "smoker",
        "smoker_top",
        "smoker_bottom",
        "smoker_side",
        Some(Front::North("smoker_front")),
    ),
    entry(
        "carved_pumpkin",
        "pumpkin_top",
        "pumpkin_top",
        "pumpkin_side",
        Some(Front::North("carved_pumpkin")),
    ),
    entry(
        "jack_o_lantern",
        "pumpkin_top",
        "pumpkin_top",
        "pumpkin_side",
        Some(Front::North("jack_o_lantern")),
    ),
    entry(
        "loom",
        "loom_top",
        "loom_bottom",
        "loom_side",
        Some(Front::North("loom_front")),
    ),
    entry("piston", "piston_top", "piston_bottom", "piston_side", None),
    entry("sticky_piston", "piston_top_sticky", "piston_bottom", "piston_side", None),
    entry("observer", "observer_front", "observer_back", "observer_side", None),
    entry(
        "dispenser",
        "furnace_top",
        "furnace_top",
        "furnace_side",
        Some(Front::Top("dispenser_front_vertical")),
    ),
    entry(
        "dropper",
        "furnace_top",
        "furnace_top",
        "furnace_side",
        Some(Front::Top("dropper_front_vertical")),
    ),
    entry("chest", "oak_planks", "oak_planks", "oak_planks", None),
    entry("trapped_chest", "oak_planks", "oak_planks", "oak_planks", None),
    entry("ender_chest", "obsidian", "obsidian", "obsidian", None),
    entry("water", "water_still", "water_still", "water_still", None),
    entry("lava", "lava_still", "lava_still", "lava_still", None),
    entry("snow_block", "snow", "snow", "snow", None),
    entry("magma_block", "magma", "magma", "magma", None),
];

/// Prefixes that do not change the texture.
const STRIP_PREFIXES: &[&str] = &["waxed_", "infested_"];

/// Direct renames.
const ALIASES: &[(&str, &str)] = &[
    ("grass", "short_grass"),
    ("short_grass", "grass"),
    ("wall_torch", "torch"),
    ("soul_wall_torch", "soul_torch"),
    ("redstone_wall_torch", "redstone_torch"),
    ("campfire", "campfire_log"),
    ("soul_campfire", "campfire_log"),
    ("light_weighted_pressure_plate", "gold_block"),
    ("heavy_weighted_pressure_plate", "iron_block"),
    ("moss_carpet", "moss_block"),
    ("petrified_oak_slab", "oak_planks"),
    ("smooth_quartz", "quartz_block_bottom"),
    ("smooth_sandstone", "sandstone_top"),
    ("smooth_red_sandstone", "red_sandstone_top"),
    ("redstone_wire", "redstone_dust_dot"),
    ("bubble_column", "water_still"),
];

/// Suffixes of derived blocks, longest first so `_fence_gate` wins over `_fence`.
const DERIVED_SUFFIXES: &[&str] = &[
    "_wall_hanging_sign",
    "_hanging_sign",
    "_pressure_plate",
    "_fence_gate",
    "_wall_sign",
    "_stairs",
    "_button",
    "_fence",
    "_slab",
    "_wall",
    "_pane",
    "_sign",
];

pub fn is_invisible(block_name: &str) -> bool {
    let key = texture_key(block_name);
    INVISIBLE.contains(&key.as_str())
}

/// Texture key of a block name: `minecraft:` is dropped, other namespaces kept.
pub fn texture_key(block_name: &str) -> String {
    match block_name.split_once(':') {
        Some(("minecraft", path)) => path.to_string(),
        Some(_) => block_name.to_string(),
        None => block_name.to_string(),
    }
}

/// Resolved texture name per face; `None` draws the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceTextures {
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub north: Option<String>,
    pub south: Option<String>,
    pub east: Option<String>,
    pub west: Option<String>,
}

impl FaceTextures {
    fn sides(top: String, bottom: String, side: String) -> Self {
        Self {
            top: Some(top),
            bottom: Some(bottom),
            north: Some(side.clone()),
            south: Some(side.clone()),
            east: Some(side.clone()),
            west: Some(side),
        }
    }

    fn uniform(texture: String) -> Self {
        Self::sides(texture.clone(), texture.clone(), texture)
    }

    pub fn get(&self, face: Face) -> Option<&str> {
        match face {
            Face::Top => self.top.as_deref(),
            Face::Bottom => self.bottom.as_deref(),
            Face::North => self.north.as_deref(),
            Face::South => self.south.as_deref(),
            Face::East => self.east.as_deref(),
            Face::West => self.west.as_deref(),
        }
    }

    /// Distinct texture names, in face order.
    pub fn textures(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for face in Face::BOX_ORDER {
            if let Some(name) = self.get(face) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn is_missing(&self) -> bool {
        Face::BOX_ORDER.iter().any(|face| self.get(*face).is_none())
    }
}

/// Resolves block names against the textures of a pack.
pub struct TextureResolver<'a> {
    pack: &'a TexturePack,
}

impl<'a> TextureResolver<'a> {
    pub fn new(pack: &'a TexturePack) -> Self {
        Self { pack }
    }

    /// Face textures of a block. Invisible blocks resolve to nothing.
    pub fn resolve(&self, block_name: &str) -> FaceTextures {
        if is_invisible(block_name) {
            return FaceTextures::default();
        }
        let key = texture_key(block_name);
        self.resolve_key(&key, 0).unwrap_or_default()
    }

    fn has(&self, texture: &str) -> bool {
        self.pack.has_texture(texture)
    }

    fn resolve_key(&self, key: &str, depth: usize) -> Option<FaceTextures> {
        if depth > MAX_DEPTH {
            return None;
        }
        let (namespace, name) = split_key(key);

        if let Some(faces) = self.from_table(namespace, name) {
            return Some(faces);
        }

        for candidate in alias_candidates(name) {
            if let Some(faces) = self.resolve_key(&join_key(namespace, &candidate), depth + 1) {
                return Some(faces);
            }
        }

        let derived = derived_base(name);
        if let Some(base) = derived {
            for candidate in derived_candidates(base) {
                if let Some(faces) = self.resolve_key(&join_key(namespace, &candidate), depth + 1) {
                    return Some(faces);
                }
            }
        }

        if let Some(faces) = self.passthrough(key) {
            return Some(faces);
        }

        if derived.is_none() {
            for candidate in material_candidates(name) {
                if let Some(faces) = self.resolve_key(&join_key(namespace, &candidate), depth + 1) {
                    return Some(faces);
                }
            }
        }
        None
    }

    fn from_table(&self, namespace: Option<&str>, name: &str) -> Option<FaceTextures> {
        if namespace.is_some() {
            return None;
        }
        let entry = FACE_TABLE.iter().find(|e| e.name == name)?;
        if !self.has(entry.side) {
            return None;
        }
        let pick = |texture: &'static str| {
            if self.has(texture) {
                texture.to_string()
            } else {
                entry.side.to_string()
            }
        };
        let mut faces = FaceTextures::sides(pick(entry.top), pick(entry.bottom), entry.side.to_string());
        match entry.front {
            Some(Front::North(front)) => faces.north = Some(pick(front)),
            Some(Front::Top(front)) => faces.top = Some(pick(front)),
            None => {}
        }
        Some(faces)
    }

    /// The pack's own textures for this name, with `_top`, `_side`,
    /// `_bottom` and `_front` variants.
    fn passthrough(&self, key: &str) -> Option<FaceTextures> {
        let variant = |suffix: &str| {
            let texture = format!("{}{}", key, suffix);
            self.has(&texture).then_some(texture)
        };
        let top = variant("_top");
        let bottom = variant("_bottom");
        let side = variant("")
            .or_else(|| variant("_side"))
            .or_else(|| bottom.clone())
            .or_else(|| variant("_front"))
            .or_else(|| top.clone())?;

        let mut faces = FaceTextures::uniform(side.clone());
        if let Some(top) = &top {
            faces.top = Some(top.clone());
        }
        faces.bottom = bottom.or(top).or(Some(side));
        if let Some(front) = variant("_front") {
            faces.north = Some(front);
        }
        Some(faces)
    }
}

fn split_key(key: &str) -> (Option<&str>, &str) {
    match key.split_once(':') {
        Some((namespace, name)) => (Some(namespace), name),
        None => (None, key),
    }
}

fn join_key(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(namespace) => format!("{}:{}", namespace, name),
        None => name.to_string(),
    }
}

fn alias_candidates(name: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    for prefix in STRIP_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            candidates.push(rest.to_string());
        }
    }
    for (from, to) in ALIASES {
        if *from == name && *to != name {
            candidates.push(to.to_string());
        }
    }
    if let Some(plant) = name.strip_prefix("potted_") {
        candidates.push(plant.to_string());
    }
    if let Some(color) = name.strip_suffix("_bed") {
        candidates.push(format!("{}_wool", color));
    }
    if let Some(base) = name.strip_suffix("_carpet") {
        if COLORS.contains(&base) {
            candidates.push(format!("{}_wool", base));
        }
    }
    candidates
}

/// Material part of a stair, slab, wall, fence, pane, button, plate or sign.
fn derived_base(name: &str) -> Option<&str> {
    DERIVED_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|base| !base.is_empty())
}

/// Names a derived block borrows its texture from.
fn derived_candidates(base: &str) -> Vec<String> {
    let mut candidates = vec![base.to_string()];
    candidates.extend(material_candidates(base));
    dedup_keep_order(candidates)
}

/// Planks for wood types, plural bricks and tiles, `_block` storage blocks.
fn material_candidates(base: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    if WOOD_TYPES.contains(&base) {
        candidates.push(format!("{}_planks", base));
    }
    for wood in WOOD_TYPES {
        if base == format!("{}_wood", wood) {
            candidates.push(format!("{}_log", wood));
        }
        if base == format!("stripped_{}_wood", wood) {
            candidates.push(format!("stripped_{}_log", wood));
        }
    }
    if base.ends_with("brick") || base.ends_with("tile") {
        candidates.push(format!("{}s", base));
    }
    if !base.ends_with("_block") {
        candidates.push(format!("{}_block", base));
    }
    candidates
}

fn dedup_keep_order(input: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(input.len());
    for entry in input {
        if !out.iter().any(|v| v == &entry) {
            out.push(entry);
        }
    }
    out
}
