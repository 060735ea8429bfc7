//! SVG drawing source
//!
//! Reads Inkscape-style layered SVG: layers are `<g>` elements with
//! `inkscape:groupmode="layer"`, named by `inkscape:label`. Path data is
//! normalised to absolute lines and cubics by `svgtypes`, so relative
//! commands, H/V, smooth curves, quadratics and arcs are all accepted.

use crate::source::{label_contains, labels_match, DrawingSource};
use cutkit_core::constants::CLOSED_TOLERANCE_MM;
use cutkit_core::{pt, Affine, ConfigurationError, CurveSegment, Point2D, SourcePath, Subpath};
use roxmltree::{Document, Node};
use std::str::FromStr;
use svgtypes::{PointsParser, SimplePathSegment, SimplifyingPathParser};
use tracing::{debug, warn};

pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

const DEFAULT_STROKE: &str = "#000000";

/// Parsed SVG document
pub struct SvgDrawing<'input> {
    doc: Document<'input>,
}

impl<'input> SvgDrawing<'input> {
    /// Parse SVG text
    pub fn parse(text: &'input str) -> Result<Self, ConfigurationError> {
        let doc = Document::parse(text).map_err(|e| ConfigurationError::DocumentParse {
            reason: e.to_string(),
        })?;
        Ok(Self { doc })
    }

    fn layers(&self) -> impl Iterator<Item = Node<'_, 'input>> {
        self.doc.descendants().filter(|n| {
            n.has_tag_name("g") && n.attribute((INKSCAPE_NS, "groupmode")) == Some("layer")
        })
    }

    fn find_layer<F>(&self, layer: &str, matches: F) -> Result<Node<'_, 'input>, ConfigurationError>
    where
        F: Fn(&str, &str) -> bool,
    {
        self.layers()
            .find(|n| layer_label(n).is_some_and(|label| matches(label, layer)))
            .ok_or_else(|| ConfigurationError::MissingLayer {
                layer: layer.to_string(),
            })
    }
}

impl DrawingSource for SvgDrawing<'_> {
    fn layer_paths(&self, layer: &str) -> Result<Vec<SourcePath>, ConfigurationError> {
        let layer_node = self.find_layer(layer, labels_match)?;
        let mut paths = Vec::new();
        for node in layer_node.descendants().skip(1) {
            let Some(subpaths) = element_subpaths(&node)? else {
                continue;
            };
            let mut path = SourcePath::new(subpaths, stroke_color(&node, &layer_node));
            if let Some(id) = node.attribute("id") {
                path = path.with_id(id);
            }
            if let Some(transform) = accumulated_transform(&node)? {
                path = path.with_transform(transform);
            }
            paths.push(path);
        }
        debug!("Layer '{}': {} path element(s)", layer, paths.len());
        Ok(paths)
    }

    fn marker_points(&self, layer: &str) -> Result<Vec<Point2D>, ConfigurationError> {
        let layer_node = self.find_layer(layer, label_contains)?;
        let mut markers = Vec::new();
        for node in layer_node.descendants().skip(1) {
            let Some(subpaths) = element_subpaths(&node)? else {
                continue;
            };
            let Some(first) = subpaths.into_iter().find(|s| !s.is_empty()) else {
                continue;
            };
            let vertices = subpath_vertices(&first);
            if is_decorative(&node, &vertices) {
                debug!("Skipping decorative marker {:?}", node.attribute("id"));
                continue;
            }
            let Some(point) = marker_reference(&vertices) else {
                continue;
            };
            let point = match accumulated_transform(&node)? {
                Some(t) => t.transform_point(point),
                None => point,
            };
            markers.push(point);
        }
        debug!("Layer '{}': {} marker(s)", layer, markers.len());
        Ok(markers)
    }

    fn viewbox_size(&self) -> Option<(f64, f64)> {
        let raw = self.doc.root_element().attribute("viewBox")?;
        match svgtypes::ViewBox::from_str(raw) {
            Ok(vb) if vb.w > 0.0 && vb.h > 0.0 => Some((vb.w, vb.h)),
            _ => {
                warn!("Ignoring unusable viewBox '{}'", raw);
                None
            }
        }
    }
}

fn layer_label<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.attribute((INKSCAPE_NS, "label"))
        .or_else(|| node.attribute("id"))
}

/// Geometry of a drawable element, `None` for anything else
fn element_subpaths(node: &Node) -> Result<Option<Vec<Subpath>>, ConfigurationError> {
    if !node.is_element() {
        return Ok(None);
    }
    let subpaths = match node.tag_name().name() {
        "path" => parse_path_data(node.attribute("d").unwrap_or_default())?,
        "rect" => {
            let x = number_attr(node, "x")?;
            let y = number_attr(node, "y")?;
            let w = number_attr(node, "width")?;
            let h = number_attr(node, "height")?;
            if w <= 0.0 || h <= 0.0 {
                return Ok(None);
            }
            polygon_subpaths(&[pt(x, y), pt(x + w, y), pt(x + w, y + h), pt(x, y + h)], true)
        }
        "line" => {
            let from = pt(number_attr(node, "x1")?, number_attr(node, "y1")?);
            let to = pt(number_attr(node, "x2")?, number_attr(node, "y2")?);
            vec![Subpath::new(vec![CurveSegment::line(from, to)])]
        }
        "polyline" | "polygon" => {
            let points: Vec<Point2D> = PointsParser::from(node.attribute("points").unwrap_or_default())
                .map(|(x, y)| pt(x, y))
                .collect();
            polygon_subpaths(&points, node.has_tag_name("polygon"))
        }
        _ => return Ok(None),
    };
    Ok(Some(subpaths))
}

fn polygon_subpaths(points: &[Point2D], closed: bool) -> Vec<Subpath> {
    let mut segments: Vec<CurveSegment> = points
        .windows(2)
        .map(|w| CurveSegment::line(w[0], w[1]))
        .collect();
    if closed && points.len() > 2 {
        segments.push(CurveSegment::line(points[points.len() - 1], points[0]));
    }
    if segments.is_empty() {
        Vec::new()
    } else {
        vec![Subpath::new(segments)]
    }
}

fn number_attr(node: &Node, name: &str) -> Result<f64, ConfigurationError> {
    match node.attribute(name) {
        None => Ok(0.0),
        Some(raw) => svgtypes::Length::from_str(raw)
            .map(|l| l.number)
            .map_err(|e| ConfigurationError::DocumentParse {
                reason: format!("attribute {}=\"{}\": {}", name, raw, e),
            }),
    }
}

/// Split SVG path data into subpaths of absolute cubic segments
pub fn parse_path_data(data: &str) -> Result<Vec<Subpath>, ConfigurationError> {
    let mut subpaths = Vec::new();
    let mut current: Vec<CurveSegment> = Vec::new();
    let mut start = pt(0.0, 0.0);
    let mut cursor = start;

    for segment in SimplifyingPathParser::from(data) {
        let segment = segment.map_err(|e| ConfigurationError::DocumentParse {
            reason: format!("path data: {}", e),
        })?;
        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                if !current.is_empty() {
                    subpaths.push(Subpath::new(std::mem::take(&mut current)));
                }
                start = pt(x, y);
                cursor = start;
            }
            SimplePathSegment::LineTo { x, y } => {
                let to = pt(x, y);
                current.push(CurveSegment::line(cursor, to));
                cursor = to;
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let to = pt(x, y);
                current.push(CurveSegment::quadratic(cursor, pt(x1, y1), to));
                cursor = to;
            }
            SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let to = pt(x, y);
                current.push(CurveSegment::new(cursor, pt(x1, y1), pt(x2, y2), to));
                cursor = to;
            }
            SimplePathSegment::ClosePath => {
                if cursor != start {
                    current.push(CurveSegment::line(cursor, start));
                }
                cursor = start;
                if !current.is_empty() {
                    subpaths.push(Subpath::new(std::mem::take(&mut current)));
                }
            }
        }
    }
    if !current.is_empty() {
        subpaths.push(Subpath::new(current));
    }
    Ok(subpaths)
}

/// Element transform composed with every ancestor's, innermost first
fn accumulated_transform(node: &Node) -> Result<Option<Affine>, ConfigurationError> {
    let mut total: Option<Affine> = None;
    for ancestor in node.ancestors().filter(|n| n.is_element()) {
        let Some(raw) = ancestor.attribute("transform") else {
            continue;
        };
        let t = svgtypes::Transform::from_str(raw).map_err(|e| {
            ConfigurationError::DocumentParse {
                reason: format!("transform \"{}\": {}", raw, e),
            }
        })?;
        let t = Affine::new(t.a, t.b, t.c, t.d, t.e, t.f);
        total = Some(match total {
            Some(inner) => inner.then(&t),
            None => t,
        });
    }
    Ok(total)
}

/// Stroke from the element's style or attribute, inherited up to the layer
fn stroke_color(node: &Node, layer: &Node) -> String {
    for ancestor in node.ancestors().filter(|n| n.is_element()) {
        if let Some(stroke) = ancestor.attribute("style").and_then(style_stroke) {
            return stroke.to_string();
        }
        if let Some(stroke) = ancestor.attribute("stroke") {
            return stroke.trim().to_string();
        }
        if ancestor == *layer {
            break;
        }
    }
    DEFAULT_STROKE.to_string()
}

fn style_stroke(style: &str) -> Option<&str> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .find(|(key, _)| key.trim() == "stroke")
        .map(|(_, value)| value.trim())
}

/// Start point plus every segment end
fn subpath_vertices(subpath: &Subpath) -> Vec<Point2D> {
    let mut vertices = Vec::with_capacity(subpath.segments.len() + 1);
    if let Some(first) = subpath.segments.first() {
        vertices.push(first.start);
    }
    vertices.extend(subpath.segments.iter().map(|s| s.end));
    vertices
}

fn is_decorative(node: &Node, vertices: &[Point2D]) -> bool {
    if node.has_attribute("data-decorative") {
        return true;
    }
    let named_triangle = [node.attribute("id"), node.attribute((INKSCAPE_NS, "label"))]
        .into_iter()
        .flatten()
        .any(|name| name.to_lowercase().contains("triangle"));
    named_triangle || is_closed_triangle(vertices)
}

fn is_closed_triangle(vertices: &[Point2D]) -> bool {
    if vertices.len() != 4 {
        return false;
    }
    let (first, last) = (vertices[0], vertices[3]);
    (first.x - last.x).abs() < CLOSED_TOLERANCE_MM && (first.y - last.y).abs() < CLOSED_TOLERANCE_MM
}

/// Corner of an L-shaped marker, otherwise its first vertex
fn marker_reference(vertices: &[Point2D]) -> Option<Point2D> {
    if vertices.len() == 3 {
        Some(vertices[1])
    } else {
        vertices.first().copied()
    }
}
