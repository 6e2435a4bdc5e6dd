//! SVG serialization.
//!
//! ```text
//! <svg xmlns=".." width="64" height="64" style="background-color: rgba(..)">
//!   <g style="fill: rgba(..); stroke: rgba(..); stroke-width: 0.32;">
//!     <rect x="28" y="12" width="8" height="8"/>
//!     ...
//!   </g>
//! </svg>
//! ```

use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, Event},
};

use super::color::Color;
use super::error::IdenticonError;
use super::grid::Rect;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Stroke width relative to the canvas size.
pub const STROKE_RATIO: f64 = 0.005;

/// Everything needed to write one document.
pub struct Document<'a> {
    pub size: u32,
    pub background: Color,
    pub foreground: Color,
    pub rects: &'a [Rect],
}

impl Document<'_> {
    pub fn stroke_width(&self) -> f64 {
        f64::from(self.size) * STROKE_RATIO
    }

    /// Write the document, one `<rect>` per entry in `rects`.
    pub fn write(&self) -> Result<String, IdenticonError> {
        let mut writer = Writer::new(Vec::with_capacity(256 + self.rects.len() * 64));

        let size = self.size.to_string();
        let page_style = format!("background-color: {}", self.background.to_rgba_string());
        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", SVG_NAMESPACE));
        svg.push_attribute(("width", size.as_str()));
        svg.push_attribute(("height", size.as_str()));
        svg.push_attribute(("style", page_style.as_str()));
        writer.write_event(Event::Start(svg))?;

        let foreground = self.foreground.to_rgba_string();
        let group_style = format!(
            "fill: {foreground}; stroke: {foreground}; stroke-width: {};",
            format_number(self.stroke_width())
        );
        let mut group = BytesStart::new("g");
        group.push_attribute(("style", group_style.as_str()));
        writer.write_event(Event::Start(group))?;

        for rect in self.rects {
            let x = format_number(rect.x);
            let y = format_number(rect.y);
            let width = format_number(rect.width);
            let height = format_number(rect.height);

            let mut element = BytesStart::new("rect");
            element.push_attribute(("x", x.as_str()));
            element.push_attribute(("y", y.as_str()));
            element.push_attribute(("width", width.as_str()));
            element.push_attribute(("height", height.as_str()));
            writer.write_event(Event::Empty(element))?;
        }

        writer.write_event(Event::End(BytesEnd::new("g")))?;
        writer.write_event(Event::End(BytesEnd::new("svg")))?;

        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

/// Shortest round-trip form, no unit and no trailing `.0`.
fn format_number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(28.0), "28");
        assert_eq!(format_number(0.32), "0.32");
        assert_eq!(format_number(12.5), "12.5");
    }

    #[test]
    fn test_write_exact() {
        let fg = Color::rgb(38, 217, 38);
        let bg = Color::rgb(240, 240, 240);
        let rects = [Rect {
            x: 28.0,
            y: 12.0,
            width: 8.0,
            height: 8.0,
            color: fg,
        }];
        let doc = Document {
            size: 64,
            background: bg,
            foreground: fg,
            rects: &rects,
        };

        assert_eq!(
            doc.write().unwrap(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"64\" height=\"64\" \
             style=\"background-color: rgba(240, 240, 240, 1.0)\">\
             <g style=\"fill: rgba(38, 217, 38, 1.0); stroke: rgba(38, 217, 38, 1.0); stroke-width: 0.32;\">\
             <rect x=\"28\" y=\"12\" width=\"8\" height=\"8\"/>\
             </g></svg>"
        );
    }

    #[test]
    fn test_write_empty_grid() {
        let doc = Document {
            size: 32,
            background: Color::rgb(0, 0, 0),
            foreground: Color::rgb(255, 255, 255),
            rects: &[],
        };
        let svg = doc.write().unwrap();
        assert!(svg.contains("<g style=\"fill: rgba(255, 255, 255, 1.0);"));
        assert!(svg.ends_with("</g></svg>"));
        assert!(!svg.contains("<rect"));
    }
}
