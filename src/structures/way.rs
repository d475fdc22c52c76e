use crate::structures::LatLng;

/// One raw record of the geodata feed: a road segment as an ordered polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    pub id: Option<i64>,
    pub geometry: Option<Vec<LatLng>>,
}

impl Way {
    pub fn new(geometry: Vec<LatLng>) -> Way {
        Way {
            id: None,
            geometry: Some(geometry),
        }
    }

    pub fn from_points(points: &[(f64, f64)]) -> Way {
        Way::new(
            points
                .iter()
                .map(|&(lat, lng)| LatLng::new(lat, lng))
                .collect(),
        )
    }

    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("way/{id}"),
            None => "way/?".to_string(),
        }
    }
}
