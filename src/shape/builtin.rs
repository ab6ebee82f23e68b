//! Shapes and rules compiled into the crate.

use super::{
    BlockPattern, BoxDefinition, ConnectableKind, FacingMode, ShapeDefinition, ShapeRule, FULL,
    STAIRS,
};
use std::collections::HashMap;

fn b(from: [f32; 3], to: [f32; 3]) -> BoxDefinition {
    BoxDefinition::new(from, to)
}

pub fn builtin_shapes() -> HashMap<String, ShapeDefinition> {
    let shapes = [
        (FULL, ShapeDefinition::full()),
        (
            "horizontal_block",
            ShapeDefinition::full().rotatable(FacingMode::Horizontal),
        ),
        (
            "directional_block",
            ShapeDefinition::full().rotatable(FacingMode::Directional),
        ),
        // Boxes describe the east-facing straight stair; the mesher swaps in
        // corner boxes and rotates per facing/half/shape.
        (
            STAIRS,
            ShapeDefinition::multi(vec![
                b([0.0, 0.0, 0.0], [16.0, 8.0, 16.0]),
                b([8.0, 8.0, 0.0], [16.0, 16.0, 16.0]),
            ])
            .rotatable(FacingMode::Horizontal),
        ),
        (
            "slab",
            ShapeDefinition::single([0.0, 0.0, 0.0], [16.0, 8.0, 16.0]).half_aware(),
        ),
        (
            "fence",
            ShapeDefinition::single([6.0, 0.0, 6.0], [10.0, 16.0, 10.0])
                .connectable(ConnectableKind::Fence),
        ),
        (
            "wall",
            ShapeDefinition::single([4.0, 0.0, 4.0], [12.0, 16.0, 12.0])
                .connectable(ConnectableKind::Wall),
        ),
        (
            "glass_pane",
            ShapeDefinition::single([7.0, 0.0, 7.0], [9.0, 16.0, 9.0])
                .connectable(ConnectableKind::GlassPane),
        ),
        (
            "carpet",
            ShapeDefinition::single([0.0, 0.0, 0.0], [16.0, 1.0, 16.0]),
        ),
        (
            "pressure_plate",
            ShapeDefinition::single([1.0, 0.0, 1.0], [15.0, 1.0, 15.0]),
        ),
        (
            "button",
            ShapeDefinition::single([5.0, 0.0, 6.0], [11.0, 2.0, 10.0])
                .rotatable(FacingMode::Directional),
        ),
        (
            "trapdoor",
            ShapeDefinition::single([0.0, 0.0, 0.0], [16.0, 3.0, 16.0]).half_aware(),
        ),
        (
            "door",
            ShapeDefinition::single([0.0, 0.0, 13.0], [16.0, 16.0, 16.0])
                .rotatable(FacingMode::Horizontal),
        ),
        (
            "bed",
            ShapeDefinition::single([0.0, 0.0, 0.0], [16.0, 9.0, 16.0])
                .rotatable(FacingMode::Horizontal),
        ),
        (
            "chest",
            ShapeDefinition::single([1.0, 0.0, 1.0], [15.0, 14.0, 15.0])
                .rotatable(FacingMode::Horizontal),
        ),
        (
            "anvil",
            ShapeDefinition::multi(vec![
                b([2.0, 0.0, 2.0], [14.0, 4.0, 14.0]),
                b([4.0, 4.0, 3.0], [12.0, 5.0, 13.0]),
                b([6.0, 5.0, 4.0], [10.0, 10.0, 12.0]),
                b([3.0, 10.0, 0.0], [13.0, 16.0, 16.0]),
            ])
            .rotatable(FacingMode::Horizontal),
        ),
        (
            "hopper",
            ShapeDefinition::multi(vec![
                b([0.0, 10.0, 0.0], [16.0, 16.0, 16.0]),
                b([4.0, 4.0, 4.0], [12.0, 10.0, 12.0]),
                b([6.0, 0.0, 6.0], [10.0, 4.0, 10.0]),
            ]),
        ),
        (
            "lantern",
            ShapeDefinition::multi(vec![
                b([5.0, 0.0, 5.0], [11.0, 7.0, 11.0]),
                b([6.0, 7.0, 6.0], [10.0, 9.0, 10.0]),
            ]),
        ),
        (
            "torch",
            ShapeDefinition::single([7.0, 0.0, 7.0], [9.0, 10.0, 9.0]),
        ),
        (
            "rod",
            ShapeDefinition::single([7.0, 0.0, 7.0], [9.0, 16.0, 9.0])
                .rotatable(FacingMode::Directional),
        ),
        (
            "chain",
            ShapeDefinition::single([6.5, 0.0, 6.5], [9.5, 16.0, 9.5]),
        ),
        (
            "cake",
            ShapeDefinition::single([1.0, 0.0, 1.0], [15.0, 8.0, 15.0]),
        ),
        (
            "snow_layer",
            ShapeDefinition::single([0.0, 0.0, 0.0], [16.0, 2.0, 16.0]),
        ),
        (
            "enchanting_table",
            ShapeDefinition::single([0.0, 0.0, 0.0], [16.0, 12.0, 16.0]),
        ),
        (
            "daylight_detector",
            ShapeDefinition::single([0.0, 0.0, 0.0], [16.0, 6.0, 16.0]),
        ),
        (
            "ladder",
            ShapeDefinition::single([0.0, 0.0, 15.0], [16.0, 16.0, 16.0])
                .rotatable(FacingMode::Horizontal),
        ),
        (
            "flower_pot",
            ShapeDefinition::single([5.0, 0.0, 5.0], [11.0, 6.0, 11.0]),
        ),
        (
            "campfire",
            ShapeDefinition::single([0.0, 0.0, 0.0], [16.0, 7.0, 16.0]),
        ),
        ("cross", ShapeDefinition::cross()),
    ];
    shapes
        .into_iter()
        .map(|(name, def)| (name.to_string(), def))
        .collect()
}

/// Ordered classification rules; the first match wins.
pub fn builtin_rules() -> Vec<ShapeRule> {
    use BlockPattern::{Contains, Suffix};
    let s = |v: &str| v.to_string();

    vec![
        ShapeRule::new(Suffix(s("_stairs")), STAIRS),
        ShapeRule::new(Suffix(s("_slab")), "slab"),
        ShapeRule::new(Suffix(s("_fence")), "fence"),
        ShapeRule::new(Suffix(s("_wall")), "wall"),
        ShapeRule::new(Contains(s("glass_pane")), "glass_pane"),
        ShapeRule::new(BlockPattern::exact(["iron_bars"]), "glass_pane"),
        ShapeRule::new(Suffix(s("_carpet")), "carpet"),
        ShapeRule::new(Suffix(s("_pressure_plate")), "pressure_plate"),
        ShapeRule::new(Suffix(s("_button")), "button"),
        ShapeRule::new(Suffix(s("_trapdoor")), "trapdoor"),
        ShapeRule::new(Suffix(s("_door")), "door"),
        ShapeRule::new(Suffix(s("_bed")), "bed"),
        ShapeRule::new(
            BlockPattern::exact(["chest", "trapped_chest", "ender_chest"]),
            "chest",
        ),
        ShapeRule::new(Suffix(s("anvil")), "anvil"),
        ShapeRule::new(BlockPattern::exact(["hopper"]), "hopper"),
        ShapeRule::new(BlockPattern::exact(["lantern", "soul_lantern"]), "lantern"),
        ShapeRule::new(
            BlockPattern::exact(["torch", "soul_torch", "redstone_torch"]),
            "torch",
        ),
        ShapeRule::new(BlockPattern::exact(["end_rod", "lightning_rod"]), "rod"),
        ShapeRule::new(BlockPattern::exact(["chain", "iron_chain"]), "chain"),
        ShapeRule::new(BlockPattern::exact(["cake"]), "cake"),
        ShapeRule::new(BlockPattern::exact(["snow"]), "snow_layer"),
        ShapeRule::new(BlockPattern::exact(["enchanting_table"]), "enchanting_table"),
        ShapeRule::new(Suffix(s("daylight_detector")), "daylight_detector"),
        ShapeRule::new(BlockPattern::exact(["ladder"]), "ladder"),
        ShapeRule::new(BlockPattern::exact(["flower_pot"]), "flower_pot"),
        ShapeRule::new(Contains(s("potted_")), "flower_pot"),
        ShapeRule::new(BlockPattern::exact(["campfire", "soul_campfire"]), "campfire"),
        ShapeRule::new(Suffix(s("_sapling")), "cross"),
        ShapeRule::new(Suffix(s("_tulip")), "cross"),
        ShapeRule::new(
            BlockPattern::exact([
                "grass",
                "short_grass",
                "tall_grass",
                "fern",
                "large_fern",
                "dead_bush",
                "dandelion",
                "poppy",
                "blue_orchid",
                "allium",
                "azure_bluet",
                "oxeye_daisy",
                "cornflower",
                "lily_of_the_valley",
                "wither_rose",
                "torchflower",
                "sunflower",
                "lilac",
                "rose_bush",
                "peony",
                "brown_mushroom",
                "red_mushroom",
                "crimson_fungus",
                "warped_fungus",
                "crimson_roots",
                "warped_roots",
                "nether_sprouts",
                "sugar_cane",
                "cobweb",
                "sweet_berry_bush",
                "seagrass",
                "kelp",
                "kelp_plant",
                "hanging_roots",
                "wheat",
                "carrots",
                "potatoes",
                "beetroots",
            ]),
            "cross",
        ),
        ShapeRule::new(
            BlockPattern::exact([
                "piston",
                "sticky_piston",
                "observer",
                "dispenser",
                "dropper",
                "barrel",
            ]),
            "directional_block",
        ),
        ShapeRule::new(
            BlockPattern::exact([
                "furnace",
                "blast_furnace",
                "smoker",
                "carved_pumpkin",
                "jack_o_lantern",
                "loom",
                "beehive",
                "bee_nest",
            ]),
            "horizontal_block",
        ),
    ]
}
