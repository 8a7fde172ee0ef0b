//! Values-only XLSX writer
//!
//! Emits the minimal package Excel and LibreOffice accept: content types,
//! relationships, a workbook part, one default cell format and one part per
//! worksheet. Strings are written inline, so there is no shared-strings part.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{XlsxError, XlsxResult};
use grade_sheets_core::{CellAddress, CellValue, Workbook, Worksheet};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_DOC_RELS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_WORKBOOK: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

/// One font, the two mandatory fills, one border and a single cell format
const DEFAULT_STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
    <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
    <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
    <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
    <cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
    <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#;

type XmlOut<'z, W> = quick_xml::Writer<&'z mut ZipWriter<W>>;

/// Serializes a [`Workbook`] as an XLSX package
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        Self::write(workbook, File::create(path)?)
    }

    /// Fails with [`XlsxError::InvalidFormat`] for a workbook without sheets,
    /// which no spreadsheet application would open.
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        if workbook.is_empty() {
            return Err(XlsxError::InvalidFormat(
                "a workbook needs at least one worksheet".into(),
            ));
        }

        let sheets = workbook.sheet_count();
        let mut zip = ZipWriter::new(writer);

        Self::part(&mut zip, "[Content_Types].xml", |xml| {
            Self::content_types(xml, sheets)
        })?;
        Self::part(&mut zip, "_rels/.rels", |xml| {
            open(xml, "Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
            relationship(xml, 1, REL_OFFICE_DOCUMENT, "xl/workbook.xml")?;
            close(xml, "Relationships")
        })?;
        Self::part(&mut zip, "xl/workbook.xml", |xml| {
            Self::workbook_part(xml, workbook)
        })?;
        Self::part(&mut zip, "xl/_rels/workbook.xml.rels", |xml| {
            Self::workbook_rels(xml, sheets)
        })?;

        zip.start_file("xl/styles.xml", SimpleFileOptions::default())?;
        zip.write_all(DEFAULT_STYLES_XML.as_bytes())?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            let name = format!("xl/worksheets/sheet{}.xml", i + 1);
            Self::part(&mut zip, &name, |xml| Self::worksheet_part(xml, sheet))?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Start a package entry, write the XML declaration, then `body`
    fn part<W, F>(zip: &mut ZipWriter<W>, name: &str, body: F) -> XlsxResult<()>
    where
        W: Write + Seek,
        F: FnOnce(&mut XmlOut<'_, W>) -> XlsxResult<()>,
    {
        zip.start_file(name, SimpleFileOptions::default())?;
        let mut xml = quick_xml::Writer::new(zip);
        xml.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some("UTF-8"),
            Some("yes"),
        )))?;
        body(&mut xml)
    }

    fn content_types<O: Write>(xml: &mut quick_xml::Writer<O>, sheets: usize) -> XlsxResult<()> {
        open(xml, "Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        empty(xml, "Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])?;
        empty(
            xml,
            "Default",
            &[("Extension", "xml"), ("ContentType", "application/xml")],
        )?;
        empty(
            xml,
            "Override",
            &[("PartName", "/xl/workbook.xml"), ("ContentType", CT_WORKBOOK)],
        )?;
        empty(
            xml,
            "Override",
            &[("PartName", "/xl/styles.xml"), ("ContentType", CT_STYLES)],
        )?;
        for i in 1..=sheets {
            let part_name = format!("/xl/worksheets/sheet{}.xml", i);
            empty(
                xml,
                "Override",
                &[("PartName", part_name.as_str()), ("ContentType", CT_WORKSHEET)],
            )?;
        }
        close(xml, "Types")
    }

    fn workbook_part<O: Write>(
        xml: &mut quick_xml::Writer<O>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        open(
            xml,
            "workbook",
            &[("xmlns", NS_MAIN), ("xmlns:r", NS_DOC_RELS)],
        )?;
        open(xml, "sheets", &[])?;
        for (i, sheet) in workbook.worksheets().enumerate() {
            let id = (i + 1).to_string();
            let rid = format!("rId{}", id);
            empty(
                xml,
                "sheet",
                &[("name", sheet.name()), ("sheetId", id.as_str()), ("r:id", rid.as_str())],
            )?;
        }
        close(xml, "sheets")?;
        close(xml, "workbook")
    }

    /// Sheets take rId1..rIdN, styles come right after
    fn workbook_rels<O: Write>(xml: &mut quick_xml::Writer<O>, sheets: usize) -> XlsxResult<()> {
        open(xml, "Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
        for i in 1..=sheets {
            relationship(xml, i, REL_WORKSHEET, &format!("worksheets/sheet{}.xml", i))?;
        }
        relationship(xml, sheets + 1, REL_STYLES, "styles.xml")?;
        close(xml, "Relationships")
    }

    fn worksheet_part<O: Write>(xml: &mut quick_xml::Writer<O>, sheet: &Worksheet) -> XlsxResult<()> {
        open(xml, "worksheet", &[("xmlns", NS_MAIN)])?;
        open(xml, "sheetData", &[])?;

        let mut open_row: Option<u32> = None;
        for (row, col, value) in sheet.iter_cells() {
            if open_row != Some(row) {
                if open_row.is_some() {
                    close(xml, "row")?;
                }
                let r = (row + 1).to_string();
                open(xml, "row", &[("r", r.as_str())])?;
                open_row = Some(row);
            }
            Self::cell(xml, &CellAddress::new(row, col).to_a1_string(), value)?;
        }
        if open_row.is_some() {
            close(xml, "row")?;
        }

        close(xml, "sheetData")?;
        close(xml, "worksheet")
    }

    fn cell<O: Write>(
        xml: &mut quick_xml::Writer<O>,
        reference: &str,
        value: &CellValue,
    ) -> XlsxResult<()> {
        match value {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => {
                open(xml, "c", &[("r", reference), ("t", "inlineStr")])?;
                open(xml, "is", &[])?;
                text_element(xml, "t", &[("xml:space", "preserve")], s.as_str())?;
                close(xml, "is")?;
                close(xml, "c")
            }
            CellValue::Formula { text, cached_value } => {
                let cached = cached_value.as_deref().and_then(stored_value);
                let mut attrs = vec![("r", reference)];
                if let Some((Some(kind), _)) = &cached {
                    attrs.push(("t", *kind));
                }

                open(xml, "c", &attrs)?;
                text_element(xml, "f", &[], text.strip_prefix('=').unwrap_or(text))?;
                if let Some((_, raw)) = &cached {
                    text_element(xml, "v", &[], raw)?;
                }
                close(xml, "c")
            }
            value => match stored_value(value) {
                Some((kind, raw)) => {
                    let mut attrs = vec![("r", reference)];
                    if let Some(kind) = kind {
                        attrs.push(("t", kind));
                    }
                    open(xml, "c", &attrs)?;
                    text_element(xml, "v", &[], &raw)?;
                    close(xml, "c")
                }
                None => Ok(()),
            },
        }
    }
}

/// `(t attribute, <v> text)` for a plain value. Strings map to `str`, the
/// type a formula's cached text result carries.
fn stored_value(value: &CellValue) -> Option<(Option<&'static str>, String)> {
    match value {
        CellValue::Number(n) => Some((None, n.to_string())),
        CellValue::Boolean(b) => Some((Some("b"), if *b { "1" } else { "0" }.to_string())),
        CellValue::Error(e) => Some((Some("e"), e.as_str().to_string())),
        CellValue::String(s) => Some((Some("str"), s.as_str().to_string())),
        CellValue::Empty | CellValue::Formula { .. } => None,
    }
}

fn tag<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    start.extend_attributes(attrs.iter().copied());
    start
}

fn open<O: Write>(
    xml: &mut quick_xml::Writer<O>,
    name: &str,
    attrs: &[(&str, &str)],
) -> XlsxResult<()> {
    xml.write_event(Event::Start(tag(name, attrs)))?;
    Ok(())
}

fn empty<O: Write>(
    xml: &mut quick_xml::Writer<O>,
    name: &str,
    attrs: &[(&str, &str)],
) -> XlsxResult<()> {
    xml.write_event(Event::Empty(tag(name, attrs)))?;
    Ok(())
}

fn close<O: Write>(xml: &mut quick_xml::Writer<O>, name: &str) -> XlsxResult<()> {
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// `<name attrs>text</name>` with `text` escaped
fn text_element<O: Write>(
    xml: &mut quick_xml::Writer<O>,
    name: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> XlsxResult<()> {
    open(xml, name, attrs)?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    close(xml, name)
}

fn relationship<O: Write>(
    xml: &mut quick_xml::Writer<O>,
    id: usize,
    kind: &str,
    target: &str,
) -> XlsxResult<()> {
    let id = format!("rId{}", id);
    empty(
        xml,
        "Relationship",
        &[("Id", id.as_str()), ("Type", kind), ("Target", target)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XlsxReader;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Read};

    fn package(workbook: &Workbook) -> Cursor<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(workbook, &mut buf).unwrap();
        buf.set_position(0);
        buf
    }

    fn part_text(buf: Cursor<Vec<u8>>, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(buf).unwrap();
        let mut text = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn test_empty_workbook_rejected() {
        let mut buf = Cursor::new(Vec::new());
        let err = XlsxWriter::write(&Workbook::empty(), &mut buf).unwrap_err();
        assert!(matches!(err, XlsxError::InvalidFormat(_)));
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        let mut workbook = Workbook::new();
        workbook
            .worksheet_mut(0)
            .unwrap()
            .set_cell_value("A1", "a < b & \"c\"")
            .unwrap();

        let xml = part_text(package(&workbook), "xl/worksheets/sheet1.xml");
        assert!(xml.contains("a &lt; b &amp; &quot;c&quot;"), "{}", xml);
        assert!(xml.contains(r#"<c r="A1" t="inlineStr">"#), "{}", xml);
    }

    #[test]
    fn test_styles_relationship_follows_sheets() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet_with_name("Second").unwrap();

        let rels = part_text(package(&workbook), "xl/_rels/workbook.xml.rels");
        assert!(rels.contains(r#"Id="rId2""#));
        assert!(rels.contains(r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#));
    }

    #[test]
    fn test_write_then_read_values() {
        let mut workbook = Workbook::empty();
        let mut sheet = Worksheet::new("Summary & Totals");
        sheet.set_cell_value("A1", "filename").unwrap();
        sheet.set_cell_value("B1", " padded ").unwrap();
        sheet.set_cell_value("C2", 3).unwrap();
        sheet.set_cell_value("D2", false).unwrap();
        sheet
            .set_cell_formula("E2", "C2*2", Some(CellValue::from(6)))
            .unwrap();
        sheet
            .set_cell_formula("F2", "IF(C2>1,\"Y\",\"N\")", Some(CellValue::from("Y")))
            .unwrap();
        workbook.add_existing_worksheet(sheet).unwrap();

        let loaded = XlsxReader::read(package(&workbook)).unwrap();
        let sheet = loaded.worksheet_by_name("Summary & Totals").unwrap();

        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::from("filename"));
        assert_eq!(sheet.get_value("B1").unwrap(), CellValue::from(" padded "));
        assert_eq!(sheet.get_value("C2").unwrap(), CellValue::Number(3.0));
        assert_eq!(sheet.get_value("D2").unwrap(), CellValue::Boolean(false));

        let formula = sheet.get_value("E2").unwrap();
        assert_eq!(formula.formula_text(), Some("=C2*2"));
        assert_eq!(formula.resolved(), Some(&CellValue::Number(6.0)));

        let text_formula = sheet.get_value("F2").unwrap();
        assert_eq!(text_formula.formula_text(), Some("=IF(C2>1,\"Y\",\"N\")"));
        assert_eq!(text_formula.resolved(), Some(&CellValue::from("Y")));
    }

    #[test]
    fn test_empty_strings_survive_write_then_read() {
        let mut workbook = Workbook::empty();
        let mut sheet = Worksheet::new("blank");
        sheet.set_cell_value("E1", "").unwrap();
        sheet
            .set_cell_formula("F1", "IF(A1=1,\"Y\",\"\")", Some(CellValue::from("")))
            .unwrap();
        workbook.add_existing_worksheet(sheet).unwrap();

        let loaded = XlsxReader::read(package(&workbook)).unwrap();
        let sheet = loaded.worksheet(0).unwrap();

        assert_eq!(sheet.get_value("E1").unwrap(), CellValue::from(""));
        assert_eq!(
            sheet.get_value("F1").unwrap().resolved(),
            Some(&CellValue::from(""))
        );
    }

    #[test]
    fn test_write_file_creates_readable_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");

        let mut workbook = Workbook::new();
        workbook
            .worksheet_mut(0)
            .unwrap()
            .set_cell_value("A1", "ok")
            .unwrap();
        XlsxWriter::write_file(&workbook, &path).unwrap();

        let loaded = XlsxReader::read_file(&path).unwrap();
        assert_eq!(loaded.sheet_names(), vec!["Sheet1"]);
    }
}
