//! Connection state for fences, walls and panes.

use crate::shape::ConnectableKind;
use crate::types::{BlockState, Direction};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Height of a wall arm. Fences and panes only use `None` and `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallSide {
    #[default]
    None,
    Low,
    Tall,
}

impl WallSide {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" | "false" => Some(WallSide::None),
            // older walls store plain booleans
            "low" | "true" => Some(WallSide::Low),
            "tall" => Some(WallSide::Tall),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WallSide::None => "none",
            WallSide::Low => "low",
            WallSide::Tall => "tall",
        }
    }

    pub fn is_connected(&self) -> bool {
        !matches!(self, WallSide::None)
    }
}

/// Resolved connections of a connectable block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connections {
    pub kind: ConnectableKind,
    /// Indexed north, east, south, west.
    sides: [WallSide; 4],
    /// Wall centre post. Always false for fences and panes.
    pub up: bool,
}

fn side_index(direction: Direction) -> Option<usize> {
    match direction {
        Direction::North => Some(0),
        Direction::East => Some(1),
        Direction::South => Some(2),
        Direction::West => Some(3),
        _ => None,
    }
}

impl Connections {
    pub fn new(kind: ConnectableKind) -> Self {
        Self {
            kind,
            sides: [WallSide::None; 4],
            up: kind == ConnectableKind::Wall,
        }
    }

    pub fn side(&self, direction: Direction) -> WallSide {
        side_index(direction)
            .map(|i| self.sides[i])
            .unwrap_or(WallSide::None)
    }

    pub fn set(&mut self, direction: Direction, side: WallSide) {
        if let Some(i) = side_index(direction) {
            self.sides[i] = side;
        }
    }

    pub fn with(mut self, direction: Direction, side: WallSide) -> Self {
        self.set(direction, side);
        self
    }

    pub fn is_connected(&self, direction: Direction) -> bool {
        self.side(direction).is_connected()
    }

    /// Connected directions, in north/east/south/west order.
    pub fn connected(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::HORIZONTAL
            .into_iter()
            .filter(move |d| self.is_connected(*d))
    }

    /// Read explicit connection properties. Returns `None` when the state
    /// carries none of `north`, `east`, `south`, `west`.
    pub fn from_properties(kind: ConnectableKind, state: &BlockState) -> Option<Self> {
        let mut connections = Self::new(kind);
        let mut found = false;
        for direction in Direction::HORIZONTAL {
            if let Some(value) = state.property(direction.as_str()) {
                found = true;
                let side = WallSide::from_str(value).unwrap_or_default();
                // fences and panes have no tall arms
                let side = match (kind, side) {
                    (ConnectableKind::Wall, side) => side,
                    (_, WallSide::Tall) => WallSide::Low,
                    (_, side) => side,
                };
                connections.set(direction, side);
            }
        }
        if !found {
            return None;
        }
        if kind == ConnectableKind::Wall {
            connections.up = state.property("up").map_or(true, |v| v == "true");
        }
        Some(connections)
    }

    /// Derive connections from neighbors. `connects` reports whether the
    /// neighbor in a direction accepts a connection.
    pub fn infer<F>(kind: ConnectableKind, connects: F) -> Self
    where
        F: Fn(Direction) -> bool,
    {
        let mut connections = Self::new(kind);
        for direction in Direction::HORIZONTAL {
            if connects(direction) {
                connections.set(direction, WallSide::Low);
            }
        }
        if kind == ConnectableKind::Wall {
            let n = connections.is_connected(Direction::North);
            let e = connections.is_connected(Direction::East);
            let s = connections.is_connected(Direction::South);
            let w = connections.is_connected(Direction::West);
            // a straight run hides the post
            let straight = (n && s && !e && !w) || (e && w && !n && !s);
            connections.up = !straight;
        }
        connections
    }
}

impl Serialize for Connections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wall = self.kind == ConnectableKind::Wall;
        let mut map = serializer.serialize_map(Some(if wall { 5 } else { 4 }))?;
        for direction in Direction::HORIZONTAL {
            let side = self.side(direction);
            if wall {
                map.serialize_entry(direction.as_str(), side.as_str())?;
            } else {
                map.serialize_entry(direction.as_str(), &side.is_connected())?;
            }
        }
        if wall {
            map.serialize_entry("up", &self.up)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_properties() {
        let state = BlockState::new("minecraft:oak_fence")
            .with_property("north", "true")
            .with_property("east", "false")
            .with_property("south", "true")
            .with_property("west", "false");
        let c = Connections::from_properties(ConnectableKind::Fence, &state).unwrap();
        assert!(c.is_connected(Direction::North));
        assert!(!c.is_connected(Direction::East));
        assert!(!c.up);
        assert_eq!(c.connected().collect::<Vec<_>>(), vec![Direction::North, Direction::South]);
    }

    #[test]
    fn test_wall_properties() {
        let state = BlockState::new("minecraft:cobblestone_wall")
            .with_property("north", "tall")
            .with_property("east", "low")
            .with_property("south", "none")
            .with_property("west", "true")
            .with_property("up", "false");
        let c = Connections::from_properties(ConnectableKind::Wall, &state).unwrap();
        assert_eq!(c.side(Direction::North), WallSide::Tall);
        assert_eq!(c.side(Direction::East), WallSide::Low);
        assert_eq!(c.side(Direction::South), WallSide::None);
        assert_eq!(c.side(Direction::West), WallSide::Low);
        assert!(!c.up);
    }

    #[test]
    fn test_no_properties() {
        let state = BlockState::new("minecraft:oak_fence");
        assert!(Connections::from_properties(ConnectableKind::Fence, &state).is_none());
    }

    #[test]
    fn test_inferred_wall_post() {
        let run = Connections::infer(ConnectableKind::Wall, |d| {
            matches!(d, Direction::East | Direction::West)
        });
        assert!(!run.up);
        let corner = Connections::infer(ConnectableKind::Wall, |d| {
            matches!(d, Direction::East | Direction::North)
        });
        assert!(corner.up);
        let alone = Connections::infer(ConnectableKind::Wall, |_| false);
        assert!(alone.up);
    }

    #[test]
    fn test_serialize_shapes() {
        let fence = Connections::new(ConnectableKind::Fence).with(Direction::East, WallSide::Low);
        assert_eq!(
            serde_json::to_value(fence).unwrap(),
            serde_json::json!({"north": false, "east": true, "south": false, "west": false})
        );
        let wall = Connections::new(ConnectableKind::Wall).with(Direction::North, WallSide::Tall);
        assert_eq!(
            serde_json::to_value(wall).unwrap(),
            serde_json::json!({"north": "tall", "east": "none", "south": "none", "west": "none", "up": true})
        );
    }
}
