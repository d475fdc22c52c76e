use std::collections::{HashMap, HashSet};

use osmpbf::{Element, ElementReader, Way as OsmWay};
use tracing::{info, warn};

use crate::{
    Error,
    structures::{LatLng, Way},
};

/// Reads routable ways from an `.osm.pbf` extract.
///
/// Ways referencing nodes missing from the extract are split around the
/// gaps, so every returned geometry is made of consecutive real nodes.
pub fn load_pbf_file(pbf_path: &str) -> Result<Vec<Way>, Error> {
    let reader = ElementReader::from_path(pbf_path)?;
    let mut valid_node_ids = HashSet::<i64>::new();
    let mut way_refs = Vec::<(i64, Vec<i64>)>::new();

    reader.for_each(|element| {
        if let Element::Way(w) = element {
            if !validate_way(&w) {
                return;
            }

            let refs: Vec<i64> = w.refs().collect();
            valid_node_ids.extend(refs.iter().copied());
            way_refs.push((w.id(), refs));
        }
    })?;

    let reader = ElementReader::from_path(pbf_path)?;
    let mut locations = HashMap::<i64, LatLng>::with_capacity(valid_node_ids.len());
    reader.for_each(|element| match element {
        Element::DenseNode(n) if valid_node_ids.contains(&n.id()) => {
            locations.insert(n.id(), LatLng::new(n.lat(), n.lon()));
        }
        Element::Node(n) if valid_node_ids.contains(&n.id()) => {
            locations.insert(n.id(), LatLng::new(n.lat(), n.lon()));
        }
        _ => {}
    })?;

    let mut ways = Vec::with_capacity(way_refs.len());
    let mut split = 0;
    for (id, refs) in way_refs {
        let pieces = contiguous_runs(&refs, &locations);
        if pieces.len() != 1 {
            split += 1;
        }
        ways.extend(pieces.into_iter().map(|geometry| Way {
            id: Some(id),
            geometry: Some(geometry),
        }));
    }

    if split > 0 {
        warn!("{} ways reference nodes outside the extract", split);
    }
    info!(
        "Read {} ways over {} nodes from {}",
        ways.len(),
        locations.len(),
        pbf_path
    );

    Ok(ways)
}

fn contiguous_runs(refs: &[i64], locations: &HashMap<i64, LatLng>) -> Vec<Vec<LatLng>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for node in refs {
        match locations.get(node) {
            Some(loc) => current.push(*loc),
            None => {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }

    runs
}

fn validate_way(way: &OsmWay) -> bool {
    let highway = way.tags().find(|tag| tag.0 == "highway").map(|tag| tag.1);
    if !matches!(
        highway,
        Some(
            "motorway"
                | "trunk"
                | "primary"
                | "secondary"
                | "tertiary"
                | "unclassified"
                | "residential"
                | "service"
                | "living_street"
                | "motorway_link"
                | "trunk_link"
                | "primary_link"
                | "secondary_link"
                | "tertiary_link"
                | "footway"
                | "cycleway"
                | "bridleway"
                | "path"
                | "track"
                | "pedestrian"
                | "steps"
        )
    ) {
        return false;
    }

    let access = way.tags().find(|tag| tag.0 == "access").map(|tag| tag.1);
    !matches!(access, Some("no" | "private" | "agricultural" | "forestry"))
}
