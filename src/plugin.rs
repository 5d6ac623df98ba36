//! Bevy integration: stamp on request, rebuild navigation when the grid changes.

use bevy::prelude::*;
use tracing::{info, warn};

use crate::autotile::AutoTileConfig;
use crate::constants::DEFAULT_CELL_SIZE;
use crate::grid::{GridView, TileGrid};
use crate::logging::{LoggingPlugin, TracingConfig};
use crate::navigation::{NavigationBuilder, NavigationPolygonData, NavigationReport};
use crate::room::{DungeonGraph, RoomId, TemplateCatalog};
use crate::stamper::TileStamper;

pub struct DungeonTilePlugin {
    pub cell_size: f32,
    pub corridor_width: Option<i32>,
    /// Catalogue to install; without one, stamp requests are ignored until
    /// the host inserts a [`DungeonTileSet`]
    pub tiles: Option<AutoTileConfig>,
    /// Installs [`LoggingPlugin`] with this config; `None` leaves the
    /// subscriber to the host
    pub logging: Option<TracingConfig>,
}

impl Default for DungeonTilePlugin {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            corridor_width: None,
            tiles: None,
            logging: None,
        }
    }
}

impl Plugin for DungeonTilePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DungeonGrid(TileGrid::new(self.cell_size)))
            .insert_resource(NavigationPolygons::default())
            .insert_resource(DungeonTemplates::default())
            .insert_resource(StampSettings {
                corridor_width: self.corridor_width,
            })
            .add_event::<StampDungeon>()
            .add_event::<NavigationReady>()
            .add_event::<NavigationFailed>()
            .add_systems(
                Update,
                (stamp_requested_dungeons, rebuild_navigation_polygons).chain(),
            );
        if let Some(config) = &self.logging {
            app.add_plugins(LoggingPlugin {
                config: config.clone(),
            });
        }
        if let Some(tiles) = &self.tiles {
            app.insert_resource(DungeonTileSet(tiles.clone()));
        }
    }
}

/// The stamped tile layers
#[derive(Resource, Debug)]
pub struct DungeonGrid(pub TileGrid);

#[derive(Resource, Debug, Clone)]
pub struct DungeonTileSet(pub AutoTileConfig);

#[derive(Resource, Debug, Default)]
pub struct DungeonTemplates(pub TemplateCatalog);

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct StampSettings {
    pub corridor_width: Option<i32>,
}

/// Polygons of the last successful tracing pass
#[derive(Resource, Debug, Default)]
pub struct NavigationPolygons {
    pub polygons: Vec<NavigationPolygonData>,
    pub report: NavigationReport,
}

impl NavigationPolygons {
    pub fn outer(&self) -> impl Iterator<Item = &NavigationPolygonData> {
        self.polygons.iter().filter(|p| p.is_outer())
    }

    pub fn inner(&self) -> impl Iterator<Item = &NavigationPolygonData> {
        self.polygons.iter().filter(|p| !p.is_outer())
    }
}

/// Event: replace the grid with a freshly stamped dungeon
#[derive(Event, Debug, Clone)]
pub struct StampDungeon {
    pub graph: DungeonGraph,
    pub root: RoomId,
}

/// Event: navigation polygons were rebuilt
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationReady {
    pub outer: usize,
    pub inner: usize,
}

/// Event: a stamp request was rejected (grid and polygons kept), or tracing
/// failed (tiles kept, polygons cleared)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct NavigationFailed {
    pub reason: String,
}

/// System: stamp every requested dungeon into a fresh grid, swap it in on success
pub fn stamp_requested_dungeons(
    mut requests: EventReader<StampDungeon>,
    tiles: Option<Res<DungeonTileSet>>,
    templates: Res<DungeonTemplates>,
    settings: Res<StampSettings>,
    mut grid: ResMut<DungeonGrid>,
    mut failed: EventWriter<NavigationFailed>,
) {
    for request in requests.read() {
        let Some(tiles) = tiles.as_ref() else {
            warn!(root = %request.root, "Stamp requested without a tile set");
            continue;
        };

        let mut stamper = TileStamper::new(&tiles.0);
        if let Some(width) = settings.corridor_width {
            stamper = stamper.with_corridor_width(width);
        }

        let mut fresh = TileGrid::new(grid.0.cell_size());
        match stamper.stamp(&mut fresh, &request.graph, &templates.0, request.root) {
            Ok(report) => {
                info!(rooms = report.rooms, root = %request.root, "Dungeon stamp applied");
                grid.0 = fresh;
            }
            Err(err) => {
                warn!(root = %request.root, error = %err, "Dungeon stamp rejected");
                failed.send(NavigationFailed {
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// System: retrace whenever the grid changed
pub fn rebuild_navigation_polygons(
    grid: Res<DungeonGrid>,
    mut navigation: ResMut<NavigationPolygons>,
    mut ready: EventWriter<NavigationReady>,
    mut failed: EventWriter<NavigationFailed>,
) {
    if !grid.is_changed() || grid.0.is_empty() {
        return;
    }

    match NavigationBuilder::new().build(&grid.0) {
        Ok((polygons, report)) => {
            ready.send(NavigationReady {
                outer: report.outer,
                inner: report.inner,
            });
            navigation.polygons = polygons;
            navigation.report = report;
        }
        Err(err) => {
            warn!(error = %err, "Navigation rebuild failed");
            navigation.polygons.clear();
            navigation.report = NavigationReport::default();
            failed.send(NavigationFailed {
                reason: err.to_string(),
            });
        }
    }
}
