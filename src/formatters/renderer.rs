use crate::error::Result;
use crate::formatters::template::{Placeholder, RenderTemplate};
use crate::models::{Axis, FieldValue, GeoPoint, Notation, RenderTarget, RenderedPoint};
use crate::projection::{mgrs, utm};
use crate::utils::constants::{DECIMAL_PRECISION, FIELD_PRECISION, MGRS_PRECISION};
use crate::utils::coordinates::{decompose_ddm, decompose_dms, format_fixed};

/// Formats canonical points into any supported notation or template
#[derive(Debug, Clone)]
pub struct Renderer {
    precision: usize,
    decimal_precision: usize,
    mgrs_precision: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            precision: FIELD_PRECISION,
            decimal_precision: DECIMAL_PRECISION,
            mgrs_precision: MGRS_PRECISION,
        }
    }

    /// Decimals for minutes and seconds
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_decimal_precision(mut self, decimal_precision: usize) -> Self {
        self.decimal_precision = decimal_precision;
        self
    }

    pub fn with_mgrs_precision(mut self, mgrs_precision: usize) -> Self {
        self.mgrs_precision = mgrs_precision;
        self
    }

    pub fn decimal_precision(&self) -> usize {
        self.decimal_precision
    }

    /// Render both axes of a point for the given target
    pub fn render_point(&self, point: &GeoPoint, target: &RenderTarget) -> Result<RenderedPoint> {
        match target {
            RenderTarget::Notation(notation) => self.render_notation(point, *notation),
            RenderTarget::Custom(template) => Ok(RenderedPoint {
                x: FieldValue::Text(self.render_custom(point.longitude, Axis::Longitude, template)),
                y: FieldValue::Text(self.render_custom(point.latitude, Axis::Latitude, template)),
            }),
        }
    }

    pub fn render_notation(&self, point: &GeoPoint, notation: Notation) -> Result<RenderedPoint> {
        match notation {
            Notation::Mgrs => {
                let reference = mgrs::encode(point, self.mgrs_precision)?;
                Ok(RenderedPoint {
                    x: FieldValue::Text(reference.x_part()),
                    y: FieldValue::Text(reference.y_part()),
                })
            }
            Notation::Utm => {
                let position = utm::project(point)?;
                Ok(RenderedPoint {
                    x: FieldValue::Text(position.x_part()),
                    y: FieldValue::Text(position.y_part()),
                })
            }
            _ => Ok(RenderedPoint {
                x: self.render_axis(point.longitude, Axis::Longitude, notation),
                y: self.render_axis(point.latitude, Axis::Latitude, notation),
            }),
        }
    }

    /// Render one angular value; MGRS and UTM are handled by `render_notation`
    pub fn render_axis(&self, value: f64, axis: Axis, notation: Notation) -> FieldValue {
        let hemisphere = axis.hemisphere_for(value);

        match notation {
            Notation::DegreesMinutesSeconds => {
                let (degrees, minutes, seconds) = decompose_dms(value, self.precision);
                FieldValue::Text(format!(
                    "{}º{}'{}\"{}",
                    degrees,
                    minutes,
                    format_fixed(seconds, self.precision),
                    hemisphere
                ))
            }
            Notation::DecimalMinutes => {
                let (degrees, minutes) = decompose_ddm(value, self.precision);
                FieldValue::Text(format!(
                    "{}º{}'{}",
                    degrees,
                    format_fixed(minutes, self.precision),
                    hemisphere
                ))
            }
            _ => FieldValue::Number(value),
        }
    }

    /// Render one axis through a per-axis custom template
    ///
    /// Without `{seconds}` the minutes carry the remainder as decimals, and
    /// without `{minutes}` the degrees do. The hemisphere letter is appended
    /// unless the template places `{hemisphere}` itself.
    pub fn render_custom(&self, value: f64, axis: Axis, template: &RenderTemplate) -> String {
        let hemisphere = axis.hemisphere_for(value).to_string();

        let (degree, minutes, seconds) = if template.contains(Placeholder::Seconds) {
            let (d, m, s) = decompose_dms(value, self.precision);
            (d.to_string(), m.to_string(), format_fixed(s, self.precision))
        } else if template.contains(Placeholder::Minutes) {
            let (d, m) = decompose_ddm(value, self.precision);
            (d.to_string(), format_fixed(m, self.precision), String::new())
        } else {
            (
                format_fixed(value.abs(), self.decimal_precision),
                String::new(),
                String::new(),
            )
        };

        let mut text = template.expand(|placeholder| match placeholder {
            Placeholder::Degree => Some(degree.clone()),
            Placeholder::Minutes => Some(minutes.clone()),
            Placeholder::Seconds => Some(seconds.clone()),
            Placeholder::Hemisphere => Some(hemisphere.clone()),
            Placeholder::X | Placeholder::Y => None,
        });

        if !template.contains(Placeholder::Hemisphere) {
            text.push_str(&hemisphere);
        }
        text
    }

    /// Join rendered axes into one field through a `{X}`/`{Y}` layout
    pub fn render_combined(&self, rendered: &RenderedPoint, layout: &RenderTemplate) -> String {
        layout.expand(|placeholder| match placeholder {
            Placeholder::X => Some(rendered.x.to_text(self.decimal_precision)),
            Placeholder::Y => Some(rendered.y.to_text(self.decimal_precision)),
            _ => None,
        })
    }

    /// Render a point straight to text through a layout template
    pub fn render(
        &self,
        point: &GeoPoint,
        target: &RenderTarget,
        layout: &RenderTemplate,
    ) -> Result<String> {
        let rendered = self.render_point(point, target)?;
        Ok(self.render_combined(&rendered, layout))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::{CUSTOM_COORD_FORMAT, SINGLE_FIELD_COORD_FORMAT};
    use pretty_assertions::assert_eq;

    fn point(longitude: f64, latitude: f64) -> GeoPoint {
        GeoPoint::new(longitude, latitude).unwrap()
    }

    #[test]
    fn test_custom_template_uses_hemisphere_letter() {
        let renderer = Renderer::new();
        let template = RenderTemplate::parse(CUSTOM_COORD_FORMAT);

        assert_eq!(
            renderer.render_custom(-122.4194, Axis::Longitude, &template),
            "122º25'9.840\"W"
        );
        assert_eq!(
            renderer.render_custom(37.7749, Axis::Latitude, &template),
            "37º46'29.640\"N"
        );
    }

    #[test]
    fn test_custom_template_variants() {
        let renderer = Renderer::new();

        let ddm = RenderTemplate::parse("{hemisphere} {degree}° {minutes}'");
        assert_eq!(renderer.render_custom(-33.8568, Axis::Latitude, &ddm), "S 33° 51.408'");

        let dd = RenderTemplate::parse("{degree}");
        assert_eq!(
            Renderer::new()
                .with_decimal_precision(4)
                .render_custom(-122.4194, Axis::Longitude, &dd),
            "122.4194W"
        );

        let unknown = RenderTemplate::parse("{degree}d {X} {elevation}");
        assert_eq!(
            renderer.render_custom(10.5, Axis::Longitude, &unknown),
            "10.50000000d {X} {elevation}E"
        );
    }

    #[test]
    fn test_render_notations() {
        let renderer = Renderer::new();
        let p = point(-0.1275, 51.508333);

        let dd = renderer.render_notation(&p, Notation::DecimalDegrees).unwrap();
        assert_eq!(dd.x, FieldValue::Number(-0.1275));
        assert_eq!(dd.y, FieldValue::Number(51.508333));

        let dms = renderer.render_notation(&p, Notation::DegreesMinutesSeconds).unwrap();
        assert_eq!(dms.x, FieldValue::Text("0º7'39.000\"W".to_string()));
        assert_eq!(dms.y, FieldValue::Text("51º30'29.999\"N".to_string()));

        let ddm = renderer.render_notation(&p, Notation::DecimalMinutes).unwrap();
        assert_eq!(ddm.x, FieldValue::Text("0º7.650'W".to_string()));
        assert_eq!(ddm.y, FieldValue::Text("51º30.500'N".to_string()));
    }

    #[test]
    fn test_render_grid_notations() {
        let renderer = Renderer::new();
        let p = point(-73.985656, 40.748433);
        let layout = RenderTemplate::parse(SINGLE_FIELD_COORD_FORMAT);

        let utm = renderer
            .render(&p, &RenderTarget::Notation(Notation::Utm), &layout)
            .unwrap();
        assert!(utm.starts_with("18T 585628 "), "{}", utm);

        let mgrs = renderer
            .render(&p, &RenderTarget::Notation(Notation::Mgrs), &layout)
            .unwrap();
        assert!(mgrs.starts_with("18TWL"), "{}", mgrs);
        assert_eq!(mgrs.split_whitespace().collect::<String>().len(), 15);

        assert!(renderer.render_notation(&point(0.0, 89.0), Notation::Utm).is_err());
    }

    #[test]
    fn test_combined_layout() {
        let renderer = Renderer::new().with_decimal_precision(4);
        let rendered = RenderedPoint {
            x: FieldValue::Number(-122.4194),
            y: FieldValue::Number(37.7749),
        };
        let layout = RenderTemplate::parse("{X}, {Y} {seconds}");
        assert_eq!(
            renderer.render_combined(&rendered, &layout),
            "-122.4194, 37.7749 {seconds}"
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let renderer = Renderer::new();
        let template = RenderTemplate::parse(CUSTOM_COORD_FORMAT);
        let p = point(151.2153, -33.8568);
        let target = RenderTarget::Custom(template);
        let layout = RenderTemplate::parse(SINGLE_FIELD_COORD_FORMAT);

        let first = renderer.render(&p, &target, &layout).unwrap();
        let second = renderer.render(&p, &target, &layout).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "151º12'55.080\"E 33º51'24.480\"S");
    }

    #[test]
    fn test_boundaries_render_with_zero_parts() {
        let renderer = Renderer::new();
        let p = point(180.0, -90.0);
        let dms = renderer.render_notation(&p, Notation::DegreesMinutesSeconds).unwrap();
        assert_eq!(dms.x, FieldValue::Text("180º0'0.000\"E".to_string()));
        assert_eq!(dms.y, FieldValue::Text("90º0'0.000\"S".to_string()));
    }
}
