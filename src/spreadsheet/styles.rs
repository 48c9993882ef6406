//! Fixed stylesheet of written workbooks: one header style and one body style.
use std::fmt::Write as FmtWrite;

/// Cell format index of the body style.
pub(crate) const BODY_STYLE: usize = 1;
/// Cell format index of the header style.
pub(crate) const HEADER_STYLE: usize = 2;

/// Font settings of a cell style.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Style {
    pub(crate) font_size: f64,
    pub(crate) bold: bool,
    /// Font color as RGB hex, if any
    pub(crate) rgb_color: Option<&'static str>,
}

impl Style {
    pub(crate) const fn header() -> Self {
        Self {
            font_size: 12f64,
            bold: true,
            rgb_color: Some("FFFFFF"),
        }
    }

    pub(crate) const fn body() -> Self {
        Self {
            font_size: 10f64,
            bold: false,
            rgb_color: None,
        }
    }

    fn write_font(&self, xml: &mut String) -> std::fmt::Result {
        xml.push_str("<font>");
        if self.bold {
            xml.push_str("<b val=\"1\"/>");
        }
        write!(xml, "<sz val=\"{}\"/>", self.font_size)?;
        if let Some(color) = self.rgb_color {
            write!(xml, "<color rgb=\"{}\"/>", color)?;
        }
        xml.push_str("</font>");
        Ok(())
    }
}

/// Generates `xl/styles.xml`.
///
/// Fonts: 0 body, 1 header. Fills: 0 none, 1 gray125, 2 solid header fill.
/// Borders: 0 none, 1 thin. Cell formats: 0 default, 1 body, 2 header.
pub(crate) fn generate_stylesheet() -> Result<String, std::fmt::Error> {
    let mut xml = String::with_capacity(2048);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    xml.push_str("<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">");

    xml.push_str("<fonts count=\"2\">");
    Style::body().write_font(&mut xml)?;
    Style::header().write_font(&mut xml)?;
    xml.push_str("</fonts>");

    xml.push_str("<fills count=\"3\">");
    xml.push_str("<fill><patternFill patternType=\"none\"/></fill>");
    xml.push_str("<fill><patternFill patternType=\"gray125\"/></fill>");
    xml.push_str("<fill><patternFill patternType=\"solid\"><fgColor rgb=\"66666666\"/></patternFill></fill>");
    xml.push_str("</fills>");

    xml.push_str("<borders count=\"2\">");
    xml.push_str("<border><left/><right/><top/><bottom/><diagonal/></border>");
    xml.push_str("<border>");
    for side in ["left", "right", "top", "bottom"] {
        write!(xml, "<{side} style=\"thin\"><color auto=\"1\"/></{side}>")?;
    }
    xml.push_str("<diagonal/></border>");
    xml.push_str("</borders>");

    xml.push_str("<cellXfs count=\"3\">");
    xml.push_str("<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/>");
    xml.push_str("<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"1\" applyBorder=\"1\"/>");
    xml.push_str("<xf numFmtId=\"0\" fontId=\"1\" fillId=\"2\" borderId=\"1\" applyFill=\"1\"/>");
    xml.push_str("</cellXfs>");

    xml.push_str("</styleSheet>");
    Ok(xml)
}
