//! Core types for rendering: attributes, styles and small enums shared by elements

use crate::types::Color;

use super::svg::fmt_num;

/// Ordered SVG attribute list. Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`, `other` winning on conflicts
    pub fn extend(&mut self, other: Attrs) {
        for (k, v) in other.0 {
            self.set(k, v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Presentation attributes. Unset fields are inherited from the enclosing
/// group, and ultimately from the document root (black stroke, no fill).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    pub dash: Option<String>,
    /// Raw attributes passed through verbatim
    pub extra: Vec<(String, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stroke(mut self, color: impl Into<Color>) -> Self {
        self.stroke = Some(color.into());
        self
    }

    pub fn with_fill(mut self, color: impl Into<Color>) -> Self {
        self.fill = Some(color.into());
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_dash(mut self, dash: impl Into<String>) -> Self {
        self.dash = Some(dash.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Fill in fields left unset from `fallback`
    pub fn or(&self, fallback: &Style) -> Style {
        Style {
            stroke: self.stroke.clone().or_else(|| fallback.stroke.clone()),
            fill: self.fill.clone().or_else(|| fallback.fill.clone()),
            stroke_width: self.stroke_width.or(fallback.stroke_width),
            opacity: self.opacity.or(fallback.opacity),
            dash: self.dash.clone().or_else(|| fallback.dash.clone()),
            extra: fallback.extra.iter().chain(&self.extra).cloned().collect(),
        }
    }

    pub fn to_attrs(&self, precision: usize) -> Attrs {
        let mut attrs = Attrs::new();
        if let Some(c) = &self.stroke {
            attrs.set("stroke", c.to_string());
        }
        if let Some(c) = &self.fill {
            attrs.set("fill", c.to_string());
        }
        if let Some(w) = self.stroke_width {
            attrs.set("stroke-width", fmt_num(w, precision));
        }
        if let Some(o) = self.opacity {
            attrs.set("opacity", fmt_num(o, precision));
        }
        if let Some(d) = &self.dash {
            attrs.set("stroke-dasharray", d.clone());
        }
        for (k, v) in &self.extra {
            attrs.set(k.clone(), v.clone());
        }
        attrs
    }
}

/// Outline drawn around a frame's padded content
#[derive(Debug, Clone, PartialEq)]
pub struct BorderStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Option<String>,
    /// Corner radius as a fraction of the border box's shorter side
    pub rounded: f64,
}

impl Default for BorderStyle {
    fn default() -> Self {
        BorderStyle {
            color: Color::from(super::defaults::STROKE),
            width: super::defaults::STROKE_WIDTH,
            dash: None,
            rounded: 0.0,
        }
    }
}

impl BorderStyle {
    pub fn with_rounded(mut self, rounded: f64) -> Self {
        self.rounded = rounded;
        self
    }

    pub fn to_style(&self) -> Style {
        Style {
            stroke: Some(self.color.clone()),
            stroke_width: Some(self.width),
            dash: self.dash.clone(),
            ..Style::default()
        }
    }
}

/// Arrow-head shape parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHeadStyle {
    /// Half of the angle at the tip, in degrees
    pub arc: f64,
    /// Close the head with a filled base
    pub base: bool,
    /// Head radius as a fraction of the arrow's length
    pub size: f64,
}

impl Default for ArrowHeadStyle {
    fn default() -> Self {
        ArrowHeadStyle {
            arc: super::defaults::ARROW_ARC,
            base: false,
            size: super::defaults::ARROW_HEAD,
        }
    }
}

/// Stacking direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// Per-corner radii, clockwise from top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Corners {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl Corners {
    pub const fn uniform(r: f64) -> Self {
        Corners {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    pub fn scale(self, k: f64) -> Self {
        Corners {
            top_left: self.top_left * k,
            top_right: self.top_right * k,
            bottom_right: self.bottom_right * k,
            bottom_left: self.bottom_left * k,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Corners::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrs_keep_insertion_order_and_replace() {
        let mut a = Attrs::new();
        a.set("x", "1");
        a.set("y", "2");
        a.set("x", "3");
        let pairs: Vec<_> = a.iter().collect();
        assert_eq!(pairs, vec![("x", "3"), ("y", "2")]);
    }

    #[test]
    fn style_attrs() {
        let style = Style::new().with_stroke("red").with_stroke_width(2.5).with_dash("4,2");
        let attrs = style.to_attrs(2);
        assert_eq!(attrs.get("stroke"), Some("red"));
        assert_eq!(attrs.get("stroke-width"), Some("2.5"));
        assert_eq!(attrs.get("stroke-dasharray"), Some("4,2"));
        assert_eq!(attrs.get("fill"), None);
    }

    #[test]
    fn style_fallback() {
        let base = Style::new().with_fill("black").with_stroke(Color::None);
        let style = Style::new().with_fill("blue").or(&base);
        assert_eq!(style.fill, Some(Color::from("blue")));
        assert_eq!(style.stroke, Some(Color::None));
    }
}
