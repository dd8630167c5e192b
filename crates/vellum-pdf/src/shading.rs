//! Gradient shadings.
//!
//! [PDF 32000-1:2008 § 8.7.4.5 Shading patterns]
//!
//! Linear gradients become Type 2 (axial) shadings, radial gradients
//! Type 3. Color interpolation uses Type 2 exponential functions; a
//! gradient with more than two stops stitches per-segment Type 2
//! functions with a Type 3 stitching function built from the normalized
//! stop list.

use std::collections::BTreeMap;

use vellum_style::{GradientStop, Rgba};

use crate::document::PdfDocument;
use crate::object::{ObjRef, Object};

/// A fully-resolved gradient stop: definite position, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedStop {
    /// Position in [0, 1].
    pub offset: f32,
    /// Stop color.
    pub color: Rgba,
}

/// Normalize a raw stop list into a sorted, monotonic, fully-resolved
/// list with endpoints at 0 and 1.
///
/// [CSS Images § 3.4.3](https://www.w3.org/TR/css-images-3/#color-stop-fixup)
///
/// "If a color stop ... has a position that is less than the specified
/// position of any color stop before it, set its position to be equal to
/// the largest specified position"; missing positions interpolate
/// linearly between their defined neighbors.
#[must_use]
pub fn normalize_stops(stops: &[GradientStop]) -> Vec<NormalizedStop> {
    if stops.is_empty() {
        return Vec::new();
    }

    // STEP 1: Clamp defined positions and enforce monotonicity.
    let mut offsets: Vec<Option<f32>> = stops.iter().map(|s| s.offset).collect();
    let mut running = 0.0_f32;
    for (index, slot) in offsets.iter_mut().enumerate() {
        if let Some(value) = slot {
            let clamped = value.clamp(0.0, 1.0).max(running);
            *slot = Some(clamped);
            running = clamped;
        } else if index == 0 {
            *slot = Some(0.0);
        }
    }
    // The last stop defaults to 1 when unspecified.
    if let Some(last) = offsets.last_mut()
        && last.is_none()
    {
        *last = Some(running.max(1.0));
    }

    // STEP 2: Interpolate interior runs of unspecified positions.
    let mut index = 0;
    while index < offsets.len() {
        if offsets[index].is_some() {
            index += 1;
            continue;
        }
        let run_start = index;
        let mut run_end = index;
        while run_end < offsets.len() && offsets[run_end].is_none() {
            run_end += 1;
        }
        let before = offsets[run_start - 1].unwrap_or(0.0);
        let after = offsets.get(run_end).copied().flatten().unwrap_or(1.0);
        let gaps = (run_end - run_start + 1) as f32;
        for (step, slot) in offsets[run_start..run_end].iter_mut().enumerate() {
            *slot = Some(before + (after - before) * (step as f32 + 1.0) / gaps);
        }
        index = run_end;
    }

    let mut resolved: Vec<NormalizedStop> = stops
        .iter()
        .zip(&offsets)
        .map(|(stop, offset)| NormalizedStop {
            offset: offset.unwrap_or(0.0),
            color: stop.color,
        })
        .collect();

    // STEP 3: Pin the endpoints at 0 and 1.
    if let Some(first) = resolved.first().copied()
        && first.offset > 0.0
    {
        resolved.insert(
            0,
            NormalizedStop {
                offset: 0.0,
                color: first.color,
            },
        );
    }
    if let Some(last) = resolved.last().copied()
        && last.offset < 1.0
    {
        resolved.push(NormalizedStop {
            offset: 1.0,
            color: last.color,
        });
    }
    if resolved.len() == 1 {
        let only = resolved[0];
        resolved = vec![
            NormalizedStop {
                offset: 0.0,
                color: only.color,
            },
            NormalizedStop {
                offset: 1.0,
                color: only.color,
            },
        ];
    }

    resolved
}

fn color_components(color: Rgba) -> Object {
    let (r, g, b) = color.to_unit_rgb();
    Object::Array(vec![Object::Real(r), Object::Real(g), Object::Real(b)])
}

/// A Type 2 exponential interpolation function between two colors.
fn type2_function(from: Rgba, to: Rgba) -> Object {
    Object::dict([
        ("FunctionType", Object::Integer(2)),
        (
            "Domain",
            Object::Array(vec![Object::Integer(0), Object::Integer(1)]),
        ),
        ("C0", color_components(from)),
        ("C1", color_components(to)),
        ("N", Object::Integer(1)),
    ])
}

/// Build the interpolation function for a normalized stop list: a single
/// Type 2 function for two stops, a Type 3 stitching function otherwise.
///
/// [§ 7.10.4 Type 3 (stitching) functions]
#[must_use]
pub fn stop_function(stops: &[NormalizedStop]) -> Object {
    if stops.len() == 2 {
        return type2_function(stops[0].color, stops[1].color);
    }

    let mut functions = Vec::new();
    let mut bounds = Vec::new();
    let mut encode = Vec::new();
    for pair in stops.windows(2) {
        functions.push(type2_function(pair[0].color, pair[1].color));
        encode.push(Object::Integer(0));
        encode.push(Object::Integer(1));
    }
    // Bounds are the interior stop positions.
    for stop in &stops[1..stops.len() - 1] {
        bounds.push(Object::Real(stop.offset));
    }

    Object::dict([
        ("FunctionType", Object::Integer(3)),
        (
            "Domain",
            Object::Array(vec![Object::Integer(0), Object::Integer(1)]),
        ),
        ("Functions", Object::Array(functions)),
        ("Bounds", Object::Array(bounds)),
        ("Encode", Object::Array(encode)),
    ])
}

/// Per-page shading resource allocator.
#[derive(Debug, Default)]
pub struct ShadingManager {
    /// Canonical shading key → resource name.
    cache: BTreeMap<String, String>,
    entries: BTreeMap<String, ObjRef>,
}

impl ShadingManager {
    /// A manager with no shadings yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no shading was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `/Shading` resource entries.
    #[must_use]
    pub fn resource_entries(&self) -> BTreeMap<String, ObjRef> {
        self.entries.clone()
    }

    /// Register an axial (linear) shading from `(x0, y0)` to `(x1, y1)`
    /// in page points, returning its resource name.
    pub fn ensure_axial(
        &mut self,
        doc: &mut PdfDocument,
        coords: (f32, f32, f32, f32),
        stops: &[NormalizedStop],
    ) -> String {
        let key = format!(
            "A:{:.2}:{:.2}:{:.2}:{:.2}:{}",
            coords.0,
            coords.1,
            coords.2,
            coords.3,
            stop_key(stops)
        );
        self.ensure(doc, key, || {
            Object::dict([
                ("ShadingType", Object::Integer(2)),
                ("ColorSpace", Object::Name("DeviceRGB".to_string())),
                (
                    "Coords",
                    Object::Array(vec![
                        Object::Real(coords.0),
                        Object::Real(coords.1),
                        Object::Real(coords.2),
                        Object::Real(coords.3),
                    ]),
                ),
                ("Function", stop_function(stops)),
                (
                    "Extend",
                    Object::Array(vec![Object::Boolean(true), Object::Boolean(true)]),
                ),
            ])
        })
    }

    /// Register a radial shading centered at `(cx, cy)` with radius `r`
    /// in page points, returning its resource name.
    pub fn ensure_radial(
        &mut self,
        doc: &mut PdfDocument,
        center: (f32, f32),
        radius: f32,
        stops: &[NormalizedStop],
    ) -> String {
        let key = format!(
            "R:{:.2}:{:.2}:{:.2}:{}",
            center.0,
            center.1,
            radius,
            stop_key(stops)
        );
        self.ensure(doc, key, || {
            Object::dict([
                ("ShadingType", Object::Integer(3)),
                ("ColorSpace", Object::Name("DeviceRGB".to_string())),
                (
                    "Coords",
                    Object::Array(vec![
                        Object::Real(center.0),
                        Object::Real(center.1),
                        Object::Integer(0),
                        Object::Real(center.0),
                        Object::Real(center.1),
                        Object::Real(radius),
                    ]),
                ),
                ("Function", stop_function(stops)),
                (
                    "Extend",
                    Object::Array(vec![Object::Boolean(true), Object::Boolean(true)]),
                ),
            ])
        })
    }

    fn ensure(
        &mut self,
        doc: &mut PdfDocument,
        key: String,
        build: impl FnOnce() -> Object,
    ) -> String {
        if let Some(name) = self.cache.get(&key) {
            return name.clone();
        }
        let name = format!("Sh{}", self.entries.len());
        let r = doc.register(build());
        let _ = self.entries.insert(name.clone(), r);
        let _ = self.cache.insert(key, name.clone());
        name
    }
}

fn stop_key(stops: &[NormalizedStop]) -> String {
    stops
        .iter()
        .map(|s| {
            format!(
                "{:.4},{:02x}{:02x}{:02x}{:02x}",
                s.offset, s.color.r, s.color.g, s.color.b, s.color.a
            )
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(offset: Option<f32>, gray: u8) -> GradientStop {
        GradientStop {
            offset,
            color: Rgba::rgb(gray, gray, gray),
        }
    }

    #[test]
    fn missing_positions_interpolate() {
        let stops = normalize_stops(&[
            stop(Some(0.0), 0),
            stop(None, 64),
            stop(None, 128),
            stop(Some(0.9), 255),
        ]);
        assert_eq!(stops.len(), 5); // + pinned endpoint at 1.0
        assert!((stops[1].offset - 0.3).abs() < 1e-5);
        assert!((stops[2].offset - 0.6).abs() < 1e-5);
        assert_eq!(stops[4].offset, 1.0);
    }

    #[test]
    fn non_monotonic_positions_are_fixed_up() {
        let stops = normalize_stops(&[stop(Some(0.5), 0), stop(Some(0.2), 255)]);
        assert_eq!(stops[1].offset, 0.5);
        assert!(stops.windows(2).all(|w| w[0].offset <= w[1].offset));
        // Endpoints pinned.
        assert_eq!(stops.first().unwrap().offset, 0.0);
        assert_eq!(stops.last().unwrap().offset, 1.0);
    }

    #[test]
    fn two_stop_function_is_exponential() {
        let stops = normalize_stops(&[stop(Some(0.0), 0), stop(Some(1.0), 255)]);
        let f = stop_function(&stops);
        let Object::Dictionary(dict) = f else {
            panic!("expected dictionary");
        };
        assert_eq!(dict.get("FunctionType"), Some(&Object::Integer(2)));
    }

    #[test]
    fn multi_stop_function_stitches() {
        let stops = normalize_stops(&[
            stop(Some(0.0), 0),
            stop(Some(0.5), 128),
            stop(Some(1.0), 255),
        ]);
        let f = stop_function(&stops);
        let Object::Dictionary(dict) = f else {
            panic!("expected dictionary");
        };
        assert_eq!(dict.get("FunctionType"), Some(&Object::Integer(3)));
        let Some(Object::Array(bounds)) = dict.get("Bounds") else {
            panic!("expected bounds");
        };
        assert_eq!(bounds.len(), 1);
    }
}
