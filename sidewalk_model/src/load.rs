use anyhow::{anyhow, bail, Context, Result};
use geojson::GeoJson;

use geom::Ring;

use crate::{PedestrianBreakdown, Sidewalk, SidewalkID, SidewalkProps, TimeBucket};

/// Where the raw feature collection comes from. The store calls this at most once per process,
/// unless a fetch fails and has to be retried.
pub trait FeatureSource {
    fn fetch(&self) -> Result<String>;
}

/// Reads the feature collection from a local GeoJSON file, like data/sidewalks.json.
pub struct FileSource {
    path: String,
}

impl FileSource {
    pub fn new<S: Into<String>>(path: S) -> FileSource {
        FileSource { path: path.into() }
    }
}

impl FeatureSource for FileSource {
    fn fetch(&self) -> Result<String> {
        fs_err::read_to_string(&self.path).with_context(|| format!("reading {}", self.path))
    }
}

/// Parses a GeoJSON feature collection into sidewalks. Individual malformed features are
/// skipped with a warning; anything wrong with the collection itself fails the whole load.
pub fn parse_collection(raw: &str) -> Result<Vec<Sidewalk>> {
    let geojson = raw.parse::<GeoJson>()?;
    let collection = if let GeoJson::FeatureCollection(collection) = geojson {
        collection
    } else {
        bail!("Input isn't a FeatureCollection");
    };

    let mut results = Vec::new();
    for feature in collection.features {
        match parse_feature(&feature) {
            Ok(sidewalk) => results.push(sidewalk),
            Err(err) => {
                warn!("Skipping one feature: {}", err);
            }
        }
    }
    info!("Loaded {} sidewalks", results.len());
    Ok(results)
}

fn parse_feature(feature: &geojson::Feature) -> Result<Sidewalk> {
    let id = SidewalkID(id_prop(feature, "polygon_id")?);
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| anyhow!("{} is missing geometry", id))?;
    let ring = Ring::from_geojson(geometry).with_context(|| format!("{}", id))?;

    let est_width_ft = f64_prop(feature, "est_width_ft")?;
    let est_length_ft = opt_f64_prop(feature, "est_length_ft");
    let est_area_ft = opt_f64_prop(feature, "est_area_ft")
        .unwrap_or_else(|| est_width_ft * est_length_ft.unwrap_or(0.0));

    let mut props = SidewalkProps {
        est_width_ft,
        original_width_ft: None,
        est_length_ft,
        est_area_ft,
        pedestrian_total: Default::default(),
        area_per_person: Default::default(),
        breakdown: Default::default(),
    };

    // Per-bucket columns are flattened into property names, like p_total_9 for the 9 AM bucket.
    for (key, value) in feature.properties_iter() {
        let x = match value.as_f64() {
            Some(x) => x,
            None => {
                continue;
            }
        };
        if let Some(t) = key.strip_prefix("p_total_") {
            props.pedestrian_total.insert(TimeBucket::new(t), x);
        } else if let Some(t) = key.strip_prefix("est_area_p_") {
            props.area_per_person.insert(TimeBucket::new(t), x);
        } else if let Some((t, set)) = breakdown_prop(key) {
            set(props.breakdown.entry(TimeBucket::new(t)).or_default(), x);
        }
    }

    Ok(Sidewalk {
        id,
        ring,
        original_ring: None,
        props,
        selected: false,
    })
}

type SetBreakdown = fn(&mut PedestrianBreakdown, f64);

fn breakdown_prop(key: &str) -> Option<(&str, SetBreakdown)> {
    if let Some(t) = key.strip_prefix("p_queue_") {
        Some((t, |b, x| b.queue = x))
    } else if let Some(t) = key.strip_prefix("rest_") {
        Some((t, |b, x| b.restaurant = x))
    } else if let Some(t) = key.strip_prefix("supe_") {
        Some((t, |b, x| b.supermarket = x))
    } else if let Some(t) = key.strip_prefix("phar_") {
        Some((t, |b, x| b.pharmacy = x))
    } else if let Some(t) = key.strip_prefix("bank_") {
        Some((t, |b, x| b.bank = x))
    } else if let Some(t) = key.strip_prefix("offi_") {
        Some((t, |b, x| b.office = x))
    } else if let Some(t) = key.strip_prefix("subw_") {
        Some((t, |b, x| b.subway = x))
    } else {
        None
    }
}

fn f64_prop(feature: &geojson::Feature, key: &str) -> Result<f64> {
    if let Some(value) = feature.property(key) {
        if let Some(x) = value.as_f64() {
            return Ok(x);
        }
        bail!("{} isn't a number", key);
    }
    bail!("feature is missing {}", key);
}

fn opt_f64_prop(feature: &geojson::Feature, key: &str) -> Option<f64> {
    feature.property(key).and_then(|value| value.as_f64())
}

// Some GIS exports write integer IDs as floats
fn id_prop(feature: &geojson::Feature, key: &str) -> Result<i64> {
    if let Some(value) = feature.property(key) {
        if let Some(x) = value.as_i64() {
            return Ok(x);
        }
        if let Some(x) = value.as_f64() {
            return Ok(x as i64);
        }
        bail!("{} isn't a number", key);
    }
    bail!("feature is missing {}", key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_malformed_features() {
        let raw = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "polygon_id": 7,
                        "est_width_ft": 12.0,
                        "est_length_ft": 80.0,
                        "est_area_ft": 960.0,
                        "p_total_9": 40,
                        "p_total_19": 0,
                        "est_area_p_9": 24.0,
                        "rest_9": 25,
                        "subw_9": 15
                    },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0, 0], [10, 0], [10, 2], [0, 2], [0, 0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "est_width_ft": 5.0 },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
                    }
                }
            ]
        })
        .to_string();

        let sidewalks = parse_collection(&raw).unwrap();
        // The second feature has no polygon_id, so only the first survives
        assert_eq!(sidewalks.len(), 1);

        let sidewalk = &sidewalks[0];
        assert_eq!(sidewalk.id, SidewalkID(7));
        assert_eq!(sidewalk.props.est_width_ft, 12.0);
        assert_eq!(sidewalk.props.est_length_ft, Some(80.0));
        assert_eq!(sidewalk.props.est_area_ft, 960.0);
        assert_eq!(sidewalk.pedestrian_total(&TimeBucket::new("9")), 40.0);
        assert_eq!(sidewalk.pedestrian_total(&TimeBucket::new("19")), 0.0);
        assert_eq!(sidewalk.area_per_person(&TimeBucket::new("9")), Some(24.0));
        assert_eq!(sidewalk.area_per_person(&TimeBucket::new("12")), None);

        let breakdown = &sidewalk.props.breakdown[&TimeBucket::new("9")];
        assert_eq!(breakdown.restaurant, 25.0);
        assert_eq!(breakdown.subway, 15.0);
        assert_eq!(breakdown.bank, 0.0);

        assert!(!sidewalk.selected);
        assert!(sidewalk.original_ring.is_none());
    }

    #[test]
    fn parse_rejects_non_collections() {
        assert!(parse_collection("{ \"type\": \"Feature\" }").is_err());
        assert!(parse_collection("not json").is_err());
    }
}
