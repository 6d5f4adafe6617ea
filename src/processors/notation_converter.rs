use crate::error::{ConversionError, Result};
use crate::formatters::Renderer;
use crate::models::{
    Axis, ConversionRequest, GeoPoint, Notation, RenderTarget, RenderedPoint,
};
use crate::parsers::{extract, extract_mgrs, extract_utm, normalise, validate};
use crate::projection::{mgrs, utm};
use serde::Serialize;
use std::fmt;

/// Where a conversion was when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversionStage {
    Validating,
    Extracting,
    Converting,
    Rendering,
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionStage::Validating => "validating",
            ConversionStage::Extracting => "extracting",
            ConversionStage::Converting => "converting",
            ConversionStage::Rendering => "rendering",
        };
        write!(f, "{}", name)
    }
}

/// A failed conversion with the stage it stopped in
#[derive(Debug)]
pub struct StageError {
    pub stage: ConversionStage,
    pub error: ConversionError,
}

impl StageError {
    fn at(stage: ConversionStage) -> impl FnOnce(ConversionError) -> StageError {
        move |error| StageError { stage, error }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

impl From<StageError> for ConversionError {
    fn from(error: StageError) -> Self {
        error.error
    }
}

/// Source notation to canonical point to destination notation
#[derive(Debug, Clone, Default)]
pub struct NotationConverter {
    renderer: Renderer,
}

impl NotationConverter {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn to_canonical(&self, request: &ConversionRequest) -> Result<GeoPoint> {
        self.to_canonical_staged(request).map_err(ConversionError::from)
    }

    pub fn from_canonical(&self, point: &GeoPoint, destination: Notation) -> Result<RenderedPoint> {
        self.renderer.render_notation(point, destination)
    }

    /// Full conversion of one request to its render target
    pub fn convert(&self, request: &ConversionRequest, target: &RenderTarget) -> Result<RenderedPoint> {
        self.convert_staged(request, target).map_err(ConversionError::from)
    }

    pub fn convert_staged(
        &self,
        request: &ConversionRequest,
        target: &RenderTarget,
    ) -> std::result::Result<RenderedPoint, StageError> {
        let point = self.to_canonical_staged(request)?;
        self.renderer
            .render_point(&point, target)
            .map_err(StageError::at(ConversionStage::Rendering))
    }

    fn to_canonical_staged(
        &self,
        request: &ConversionRequest,
    ) -> std::result::Result<GeoPoint, StageError> {
        match request.source {
            Notation::Mgrs | Notation::Utm => self.grid_to_canonical(request),
            notation => {
                let longitude = self.parse_axis(request, notation, Axis::Longitude)?;
                let latitude = self.parse_axis(request, notation, Axis::Latitude)?;
                GeoPoint::new(longitude, latitude)
                    .map_err(StageError::at(ConversionStage::Converting))
            }
        }
    }

    fn parse_axis(
        &self,
        request: &ConversionRequest,
        notation: Notation,
        axis: Axis,
    ) -> std::result::Result<f64, StageError> {
        let raw = request.raw(axis).ok_or_else(|| StageError {
            stage: ConversionStage::Validating,
            error: ConversionError::malformed(format!("Missing {} value", axis), Some(axis)),
        })?;

        let text = normalise(raw, notation);
        let result =
            validate(&text, notation, Some(axis)).map_err(StageError::at(ConversionStage::Validating))?;
        let angle =
            extract(&result, notation, axis).map_err(StageError::at(ConversionStage::Extracting))?;

        Ok(angle.to_decimal())
    }

    fn grid_to_canonical(
        &self,
        request: &ConversionRequest,
    ) -> std::result::Result<GeoPoint, StageError> {
        let notation = request.source;
        let raw = match (request.raw_x.as_deref(), request.raw_y.as_deref()) {
            (Some(_), Some(_)) => {
                return Err(StageError {
                    stage: ConversionStage::Validating,
                    error: ConversionError::malformed(
                        format!("{} values use one field, but both X and Y are populated", notation),
                        None,
                    ),
                });
            }
            (Some(raw), None) | (None, Some(raw)) => raw,
            (None, None) => {
                return Err(StageError {
                    stage: ConversionStage::Validating,
                    error: ConversionError::malformed(format!("Missing {} value", notation), None),
                });
            }
        };

        let text = normalise(raw, notation);
        let result = validate(&text, notation, None).map_err(StageError::at(ConversionStage::Validating))?;

        match notation {
            Notation::Mgrs => {
                let reference =
                    extract_mgrs(&result).map_err(StageError::at(ConversionStage::Extracting))?;
                mgrs::decode(&reference).map_err(StageError::at(ConversionStage::Converting))
            }
            _ => {
                let position =
                    extract_utm(&result).map_err(StageError::at(ConversionStage::Extracting))?;
                let point =
                    utm::unproject(&position).map_err(StageError::at(ConversionStage::Converting))?;
                utm::check_band(&position, &point)
                    .map_err(StageError::at(ConversionStage::Converting))?;
                Ok(point)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::RenderTemplate;
    use crate::models::FieldValue;
    use crate::utils::constants::CUSTOM_COORD_FORMAT;

    fn converter() -> NotationConverter {
        NotationConverter::default()
    }

    #[test]
    fn test_dms_pair_to_canonical() {
        let request =
            ConversionRequest::pair("122º25'9.840\"W", "45/30/15N", Notation::DegreesMinutesSeconds);
        let point = converter().to_canonical(&request).unwrap();
        assert!((point.longitude - -122.4194).abs() < 1e-9);
        assert!((point.latitude - 45.504_166_666_7).abs() < 1e-9);
    }

    #[test]
    fn test_missing_latitude_is_malformed() {
        let request = ConversionRequest::new(Some("12.5"), None, Notation::DecimalDegrees);
        let err = converter().to_canonical(&request).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::MalformedValue { axis: Some(Axis::Latitude), .. }
        ));
    }

    #[test]
    fn test_invalid_field_keeps_axis_and_stage() {
        let request = ConversionRequest::pair("12.5", "95.0", Notation::DecimalDegrees);
        let err = converter()
            .convert_staged(&request, &RenderTarget::Notation(Notation::DegreesMinutesSeconds))
            .unwrap_err();
        assert_eq!(err.stage, ConversionStage::Validating);
        assert_eq!(err.error.axis(), Some(Axis::Latitude));
    }

    #[test]
    fn test_grid_sources_reject_both_fields() {
        for notation in [Notation::Mgrs, Notation::Utm] {
            let request = ConversionRequest::pair("33UXP0000", "33UXP0000", notation);
            let err = converter().to_canonical(&request).unwrap_err();
            assert!(matches!(err, ConversionError::MalformedValue { .. }), "{}", err);
        }
    }

    #[test]
    fn test_grid_source_in_either_field() {
        let x_only = ConversionRequest::new(Some("18T 585628 4511322"), None, Notation::Utm);
        let y_only = ConversionRequest::new(None, Some("18T 585628 4511322"), Notation::Utm);

        let a = converter().to_canonical(&x_only).unwrap();
        let b = converter().to_canonical(&y_only).unwrap();
        assert_eq!(a, b);
        assert!((a.latitude - 40.748433).abs() < 1e-4);
        assert!((a.longitude - -73.985656).abs() < 1e-4);
    }

    #[test]
    fn test_impossible_utm_values_are_malformed() {
        for token in [
            "33N 500000 20000000",
            "33N 500000 99999999",
            "33N 9999999 4000000",
            "33X 500000 1000000",
        ] {
            let err = converter()
                .convert_staged(
                    &ConversionRequest::single(token, Notation::Utm),
                    &RenderTarget::Notation(Notation::DecimalDegrees),
                )
                .unwrap_err();
            assert_eq!(err.stage, ConversionStage::Converting, "{}", token);
            assert!(
                matches!(err.error, ConversionError::MalformedValue { .. }),
                "{}: {}",
                token,
                err
            );
        }
    }

    #[test]
    fn test_band_s_decodes_north_of_the_equator() {
        let request = ConversionRequest::single("11S 500000 4000000", Notation::Utm);
        let point = converter().to_canonical(&request).unwrap();
        assert!((point.latitude - 36.14).abs() < 0.01, "{:?}", point);
        assert!((point.longitude - -117.0).abs() < 1e-9, "{:?}", point);

        let rendered = converter().from_canonical(&point, Notation::Utm).unwrap();
        assert_eq!(rendered.x, FieldValue::Text("11S 500000".to_string()));
    }

    #[test]
    fn test_mgrs_example_converts_through_utm() {
        let request = ConversionRequest::single("33UXP0000", Notation::Mgrs);
        let point = converter().to_canonical(&request).unwrap();
        assert!((47.0..49.0).contains(&point.latitude));
        assert!((16.0..17.0).contains(&point.longitude));

        let utm = utm::project(&point).unwrap();
        assert_eq!(utm.zone, 33);
        assert!((utm.easting - 600_000.0).abs() < 1e-3);
        assert!((utm.northing - 5_300_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_round_trip_every_notation() {
        let converter = NotationConverter::new(Renderer::new());
        let points = [
            GeoPoint::new(-122.4194, 37.7749).unwrap(),
            GeoPoint::new(151.2153, -33.8568).unwrap(),
            GeoPoint::new(-0.1275, 51.5074).unwrap(),
            GeoPoint::new(18.4241, -33.9249).unwrap(),
        ];
        let tolerances = [
            (Notation::DecimalDegrees, 1e-12),
            (Notation::DegreesMinutesSeconds, 1.0 / 3600.0),
            (Notation::DecimalMinutes, 1.0 / 60.0 / 1000.0),
            (Notation::Mgrs, 2e-5),
            (Notation::Utm, 2e-5),
        ];

        for point in points {
            for (notation, tolerance) in tolerances {
                let rendered = converter.from_canonical(&point, notation).unwrap();
                let request = if notation.is_single_field() {
                    let token = format!("{} {}", rendered.x, rendered.y);
                    ConversionRequest::single(&token, notation)
                } else {
                    ConversionRequest::pair(
                        &rendered.x.to_string(),
                        &rendered.y.to_string(),
                        notation,
                    )
                };

                let back = converter.to_canonical(&request).unwrap();
                assert!(
                    (back.longitude - point.longitude).abs() <= tolerance,
                    "{} {:?} -> {:?}",
                    notation,
                    point,
                    back
                );
                assert!(
                    (back.latitude - point.latitude).abs() <= tolerance,
                    "{} {:?} -> {:?}",
                    notation,
                    point,
                    back
                );
            }
        }
    }

    #[test]
    fn test_convert_to_custom_template() {
        let request = ConversionRequest::pair("-122.4194", "37.7749", Notation::DecimalDegrees);
        let target = RenderTarget::Custom(RenderTemplate::parse(CUSTOM_COORD_FORMAT));
        let rendered = converter().convert(&request, &target).unwrap();

        assert_eq!(rendered.x, FieldValue::Text("122º25'9.840\"W".to_string()));
        assert_eq!(rendered.y, FieldValue::Text("37º46'29.640\"N".to_string()));
    }

    #[test]
    fn test_out_of_coverage_destination_fails_in_rendering() {
        let request = ConversionRequest::pair("10", "89.5", Notation::DecimalDegrees);
        let err = converter()
            .convert_staged(&request, &RenderTarget::Notation(Notation::Mgrs))
            .unwrap_err();
        assert_eq!(err.stage, ConversionStage::Rendering);
    }
}
