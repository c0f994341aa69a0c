//! JSON description of a drawn search area.

use anyhow::{Context, Result};
use sar_core::{AreaShape, GeoPoint, SearchArea, SearchAreaBuilder, StrategyKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `{"shape": "quadrilateral", "vertices": [{"lat": .., "lon": ..}, ...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaFile {
    pub shape: AreaShape,
    pub vertices: Vec<GeoPoint>,
}

impl AreaFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading area file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing area file {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replay the vertices as operator clicks and return the finished area.
    pub fn to_search_area(&self) -> Result<SearchArea> {
        let mut builder = SearchAreaBuilder::new(self.shape);
        for vertex in &self.vertices {
            vertex.validate()?;
            builder.add_vertex(*vertex)?;
        }
        Ok(builder.build()?)
    }

    /// Strategy that fits the shape when none is requested.
    pub fn default_strategy(&self) -> StrategyKind {
        match self.shape {
            AreaShape::Circle => StrategyKind::Spiral,
            AreaShape::Quadrilateral | AreaShape::Polygon => StrategyKind::Zigzag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quadrilateral() {
        let file = AreaFile::parse(
            r#"{"shape": "quadrilateral", "vertices": [
                {"lat": 0.0, "lon": 0.0}, {"lat": 1.0, "lon": 0.0},
                {"lat": 1.0, "lon": 1.0}, {"lat": 0.0, "lon": 1.0}]}"#,
        )
        .unwrap();
        assert_eq!(file.default_strategy(), StrategyKind::Zigzag);
        assert!(matches!(file.to_search_area().unwrap(), SearchArea::Quadrilateral(_)));
    }

    #[test]
    fn circle_defaults_to_spiral() {
        let file = AreaFile::parse(
            r#"{"shape": "circle", "vertices": [{"lat": 46.5, "lon": 6.6}, {"lat": 46.501, "lon": 6.6}]}"#,
        )
        .unwrap();
        assert_eq!(file.default_strategy(), StrategyKind::Spiral);
        assert!(file.to_search_area().is_ok());
    }

    #[test]
    fn rejects_incomplete_or_invalid_vertices() {
        let short = AreaFile::parse(r#"{"shape": "quadrilateral", "vertices": [{"lat": 0.0, "lon": 0.0}]}"#)
            .unwrap();
        assert!(short.to_search_area().is_err());

        let bad = AreaFile::parse(
            r#"{"shape": "circle", "vertices": [{"lat": 95.0, "lon": 0.0}, {"lat": 0.0, "lon": 0.0}]}"#,
        )
        .unwrap();
        assert!(bad.to_search_area().is_err());
    }
}
