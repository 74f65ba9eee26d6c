//! Plot entity - a player-ownable UGC building area inside a field

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AccountId, MapId, PlotId};

/// Grid coordinate of a placed cube. Unique within a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CubePosition {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl CubePosition {
    pub const fn new(x: i8, y: i8, z: i8) -> Self {
        Self { x, y, z }
    }
}

/// A cube placed on a plot. `uid` is 0 until persistence assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UgcCube {
    pub uid: i64,
    pub item_id: i32,
    pub position: CubePosition,
    pub rotation: f32,
}

impl UgcCube {
    pub fn new(item_id: i32, position: CubePosition) -> Self {
        Self {
            uid: 0,
            item_id,
            position,
            rotation: 0.0,
        }
    }
}

/// Scalar plot attributes, without cubes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotInfo {
    pub id: PlotId,
    pub map_id: MapId,
    pub number: i32,
    /// `None` while the plot is for sale.
    pub owner_id: Option<AccountId>,
    pub name: String,
    pub expiry_time: i64,
}

impl PlotInfo {
    /// An unowned plot as laid out in the map.
    pub fn unowned(map_id: MapId, number: i32) -> Self {
        Self {
            id: PlotId::default(),
            map_id,
            number,
            owner_id: None,
            name: String::new(),
            expiry_time: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub info: PlotInfo,
    pub cubes: HashMap<CubePosition, UgcCube>,
}

impl Plot {
    pub fn new(info: PlotInfo) -> Self {
        Self {
            info,
            cubes: HashMap::new(),
        }
    }

    pub fn number(&self) -> i32 {
        self.info.number
    }

    /// Place a cube, replacing whatever occupied its position.
    pub fn place_cube(&mut self, cube: UgcCube) -> Option<UgcCube> {
        self.cubes.insert(cube.position, cube)
    }

    /// Copy owner, name and expiry from `info`, leaving identity and cubes alone.
    pub fn patch(&mut self, info: &PlotInfo) {
        self.info.owner_id = info.owner_id;
        self.info.name = info.name.clone();
        self.info.expiry_time = info.expiry_time;
    }

    /// Replace every cube with `cubes`, keyed by their own positions.
    pub fn replace_cubes(&mut self, cubes: impl IntoIterator<Item = UgcCube>) {
        self.cubes.clear();
        for cube in cubes {
            self.cubes.insert(cube.position, cube);
        }
    }

    /// Cubes ordered by position, for deterministic persistence.
    pub fn cubes_sorted(&self) -> Vec<UgcCube> {
        let mut cubes: Vec<UgcCube> = self.cubes.values().cloned().collect();
        cubes.sort_by_key(|cube| cube.position);
        cubes
    }
}

/// Plot payload accepted by a field: either a scalar patch or a full replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlotUpdate {
    Info(PlotInfo),
    Full(Plot),
}

impl PlotUpdate {
    pub fn info(&self) -> &PlotInfo {
        match self {
            PlotUpdate::Info(info) => info,
            PlotUpdate::Full(plot) => &plot.info,
        }
    }
}

/// Location of one of a character's home plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomePlot {
    pub map_id: MapId,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Home {
    pub indoor: HomePlot,
    pub outdoor: Option<HomePlot>,
}

impl Home {
    /// Plot numbers of this home that are located on `map_id`.
    pub fn plots_on(&self, map_id: MapId) -> Vec<i32> {
        std::iter::once(self.indoor)
            .chain(self.outdoor)
            .filter(|plot| plot.map_id == map_id)
            .map(|plot| plot.number)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_cubes_drops_stale_positions() {
        let mut plot = Plot::new(PlotInfo::unowned(MapId::new(1), 1));
        plot.place_cube(UgcCube::new(50100001, CubePosition::new(0, 0, 0)));
        plot.place_cube(UgcCube::new(50100001, CubePosition::new(1, 0, 0)));

        plot.replace_cubes(vec![UgcCube::new(50100002, CubePosition::new(2, 2, 0))]);

        assert_eq!(plot.cubes.len(), 1);
        assert!(plot.cubes.contains_key(&CubePosition::new(2, 2, 0)));
    }

    #[test]
    fn patch_leaves_cubes_alone() {
        let mut plot = Plot::new(PlotInfo::unowned(MapId::new(1), 3));
        plot.place_cube(UgcCube::new(50100001, CubePosition::new(0, 0, 0)));

        let mut info = plot.info.clone();
        info.owner_id = Some(AccountId::new(9));
        info.name = "Cozy".to_string();
        info.number = 99;
        plot.patch(&info);

        assert_eq!(plot.info.owner_id, Some(AccountId::new(9)));
        assert_eq!(plot.info.name, "Cozy");
        assert_eq!(plot.number(), 3);
        assert_eq!(plot.cubes.len(), 1);
    }

    #[test]
    fn home_plots_filter_by_map() {
        let home = Home {
            indoor: HomePlot { map_id: MapId::new(62000000), number: 1 },
            outdoor: Some(HomePlot { map_id: MapId::new(2000062), number: 4 }),
        };
        assert_eq!(home.plots_on(MapId::new(2000062)), vec![4]);
        assert_eq!(home.plots_on(MapId::new(62000000)), vec![1]);
        assert!(home.plots_on(MapId::new(5)).is_empty());
    }
}
