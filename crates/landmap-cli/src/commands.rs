//! Subcommand implementations.
//!
//! Each command returns its output as a value so it can be tested without
//! capturing stdout; `main` only prints.

use std::path::PathBuf;

use clap::Subcommand;
use landmap_registry::{
    decode, encode, ClaimAttributes, ClaimRecord, EventStore, IdentityKey, MapCoord,
    MarkerStats, SnapshotFeed, TaggedRecord,
};
use landmap_topology::validate_coord;
use landmap_viewport::{Camera, DVec2, DrawCommand, RenderPass, ViewportEngine, ViewportSize};
use serde::Serialize;

use crate::config::ViewerConfig;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the map position of one or more identities
    Locate {
        /// Identity keys, as 64 hex characters or npub1...
        #[arg(required = true)]
        keys: Vec<IdentityKey>,
    },

    /// Check that a claimed position belongs to an identity
    Validate {
        /// Identity key, as 64 hex characters or npub1...
        key: String,
        x: i64,
        y: i64,
    },

    /// Encode a claim record and print it as JSON
    Claim {
        /// Owner identity key, hex or npub1...
        key: IdentityKey,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Display color, e.g. "#ff8800"
        #[arg(long)]
        color: Option<String>,

        /// `claimed_at` of the claim being updated
        #[arg(long)]
        claimed_at: Option<u64>,

        /// Record timestamp (defaults to the system clock)
        #[arg(long)]
        now: Option<u64>,
    },

    /// Decode claim records from a JSON file and print the valid ones
    Decode {
        /// JSON array of tagged records
        file: PathBuf,

        /// Only show the newest claim of this identity
        #[arg(long)]
        owner: Option<IdentityKey>,
    },

    /// Build markers from record files and print one frame of draw commands
    Render {
        /// JSON array of profile records
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// JSON array of claim records
        #[arg(long)]
        claims: Option<PathBuf>,

        /// Signed-in identity; the view centers on it
        #[arg(long)]
        current: Option<IdentityKey>,

        /// Viewport width (overrides config file)
        #[arg(long)]
        width: Option<f64>,

        /// Viewport height (overrides config file)
        #[arg(long)]
        height: Option<f64>,

        /// Initial zoom (overrides config file)
        #[arg(long)]
        zoom: Option<f64>,

        /// Pointer position "x,y" for hover highlighting
        #[arg(long, value_parser = parse_point)]
        pointer: Option<DVec2>,
    },
}

fn parse_point(s: &str) -> Result<DVec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("{v:?}: {e}"))
    };
    Ok(DVec2::new(parse(x)?, parse(y)?))
}

/// One line per key: full key and its position.
pub fn locate(keys: &[IdentityKey]) -> Vec<String> {
    keys.iter()
        .map(|key| format!("{key} {}", key.coord()))
        .collect()
}

pub fn validate(key: &str, x: i64, y: i64) -> anyhow::Result<()> {
    if !validate_coord(key, x, y) {
        anyhow::bail!("({x}, {y}) is not the position of {key}");
    }
    Ok(())
}

pub fn claim(
    owner: &IdentityKey,
    attrs: &ClaimAttributes,
    claimed_at: Option<u64>,
    now: u64,
) -> TaggedRecord {
    encode(owner, attrs, claimed_at, now)
}

/// Valid claims among `records`.
///
/// With `owner`, only that identity's newest claim is returned, mirroring a
/// single-record lookup against the store.
pub fn decode_claims(records: &[TaggedRecord], owner: Option<&IdentityKey>) -> Vec<ClaimRecord> {
    let mut valid: Vec<(u64, ClaimRecord)> = Vec::new();
    for record in records {
        match decode(record) {
            Ok(claim) => valid.push((record.created_at, claim)),
            Err(reason) => {
                tracing::warn!(author = %record.author, %reason, "skipping claim record")
            }
        }
    }

    match owner {
        Some(owner) => valid
            .into_iter()
            .filter(|(_, claim)| &claim.owner == owner)
            .max_by_key(|(created_at, _)| *created_at)
            .map(|(_, claim)| claim)
            .into_iter()
            .collect(),
        None => valid.into_iter().map(|(_, claim)| claim).collect(),
    }
}

/// Options for [`render`], already merged with the config file.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub config: ViewerConfig,
    pub current: Option<IdentityKey>,
    pub pointer: Option<DVec2>,
}

/// One rendered frame.
#[derive(Debug, Serialize)]
pub struct Frame {
    pub camera: Camera,
    pub size: ViewportSize,
    pub stats: MarkerStats,
    pub hovered: Option<IdentityKey>,
    pub visible: (MapCoord, MapCoord),
    pub commands: Vec<DrawCommand>,
}

pub async fn render<S: EventStore>(store: &S, options: &RenderOptions) -> anyhow::Result<Frame> {
    let config = &options.config;

    let feed = SnapshotFeed::new();
    feed.refresh(store, config.discovery_limit, options.current.as_ref())
        .await?;
    let snapshot = feed.current();
    let markers = &snapshot.markers;

    let mut engine = ViewportEngine::new(Camera::new(config.initial_zoom, DVec2::ZERO));
    engine.resize(ViewportSize::new(config.viewport.width, config.viewport.height));
    engine.sync_current_identity(options.current.as_ref(), markers);

    let hovered = options
        .pointer
        .and_then(|pointer| engine.pointer_move(pointer, markers).copied());

    let commands = RenderPass::new(config.style.clone()).draw(
        engine.camera(),
        engine.size(),
        markers,
        hovered.as_ref(),
        engine.current(),
    );

    let (min, max) = engine.camera().visible_world(engine.size());
    Ok(Frame {
        camera: *engine.camera(),
        size: engine.size(),
        stats: snapshot.stats,
        hovered,
        visible: (to_coord(min), to_coord(max)),
        commands,
    })
}

/// World point clamped onto the plane.
fn to_coord(world: DVec2) -> MapCoord {
    let clamp = |v: f64, extent: u32| v.clamp(0.0, f64::from(extent - 1)) as u32;
    MapCoord::new(
        clamp(world.x, landmap_topology::MAP_WIDTH),
        clamp(world.y, landmap_topology::MAP_HEIGHT),
    )
}
