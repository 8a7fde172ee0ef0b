//! XLSX reader
//!
//! Loads every worksheet's cell values. Styles, comments and other
//! presentation parts are never opened.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use grade_sheets_core::{CellAddress, CellError, CellValue, SharedString, Workbook, Worksheet};

/// Undo Excel's `_xHHHH_` escapes: `_x000d_` is a carriage return and
/// `_x005f_` a literal underscore. Incomplete sequences are kept as written.
fn decode_excel_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let decoded = tail
            .get(2..7)
            .and_then(|seq| seq.strip_suffix('_'))
            .filter(|hex| hex.len() == 4 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[7..];
            }
            None => {
                out.push('_');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Whether an attribute value spells an XML boolean true
fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Read one attribute (by local name) as an owned string
fn attr_value(e: &BytesStart, local_name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local_name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Cell being assembled while its `<c>` element is open
#[derive(Debug, Default)]
struct PendingCell {
    address: Option<CellAddress>,
    cell_type: Option<String>,
    value: Option<String>,
    formula: Option<String>,
}

/// Parts reachable from `xl/_rels/workbook.xml.rels`
#[derive(Debug, Default)]
struct WorkbookRels {
    /// Relationship id to worksheet part path
    worksheets: HashMap<String, String>,
    shared_strings: Option<String>,
}

/// Where packages without a sharedStrings relationship keep the table
const DEFAULT_SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Loads XLSX and XLSM packages into a [`Workbook`]
pub struct XlsxReader;

impl XlsxReader {
    /// Open and read the package at `path`
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a package from any seekable source
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let rels = Self::read_workbook_rels(&mut archive)?;
        let shared_strings_part = rels
            .shared_strings
            .as_deref()
            .unwrap_or(DEFAULT_SHARED_STRINGS_PART);
        let shared_strings = Self::read_shared_strings(&mut archive, shared_strings_part)?;

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheet_info {
            let Some(path) = rels.worksheets.get(r_id) else {
                log::warn!("Sheet '{}' has no worksheet relationship ({}), skipping", name, r_id);
                continue;
            };

            let mut worksheet = Worksheet::new(name.as_str());
            Self::read_worksheet(&mut archive, path, &mut worksheet, &shared_strings)?;
            workbook.push_loaded_worksheet(worksheet);
        }

        Ok(workbook)
    }

    /// Read only the sheet names, in workbook order, without loading cells
    pub fn read_sheet_names<R: Read + Seek>(reader: R) -> XlsxResult<Vec<String>> {
        let mut archive = zip::ZipArchive::new(reader)?;
        Ok(Self::read_workbook_xml(&mut archive)?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    /// The shared string table at `path`, in index order; absent part means no strings
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
    ) -> XlsxResult<Vec<SharedString>> {
        let mut strings = Vec::new();

        let file = match archive.by_name(path) {
            Ok(f) => f,
            Err(_) => return Ok(strings),
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        // Whitespace inside <t> is significant
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs (<rPh>) repeat the text as a reading guide
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" if in_si => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(SharedString::new(""));
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(SharedString::new(decode_excel_escapes(&current_string)));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    let text = e.unescape()?;
                    current_string.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// `(name, relationship id)` per sheet, in tab order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"sheet" =>
                {
                    // r:id lives in the relationships namespace; match on local name
                    let name = attr_value(&e, b"name");
                    let r_id = attr_value(&e, b"id");

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Worksheet and shared string parts named by the workbook relationships
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<WorkbookRels> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = WorkbookRels::default();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            rels.worksheets.insert(id, Self::resolve_part_path(&target));
                        } else if rel_type.ends_with("/sharedStrings") {
                            rels.shared_strings = Some(Self::resolve_part_path(&target));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Resolve a relationship target (relative to `xl/`) to a zip entry name
    fn resolve_part_path(target: &str) -> String {
        if let Some(absolute) = target.strip_prefix('/') {
            absolute.to_string()
        } else if let Some(parent_relative) = target.strip_prefix("../") {
            parent_relative.to_string()
        } else {
            format!("xl/{}", target)
        }
    }

    /// Read a worksheet's cell values from the archive
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[SharedString],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(false);

        let mut buf = Vec::new();

        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_formula = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        // Position of the current row and the next implicit column, for
        // cells written without an `r` attribute
        let mut current_row: u32 = 0;
        let mut next_col: u16 = 0;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        current_row = Self::row_index(&e).unwrap_or(current_row);
                        next_col = 0;
                    }
                    b"c" => {
                        let pending = Self::start_cell(&e, current_row, next_col)?;
                        if let Some(addr) = pending.address {
                            next_col = addr.col.saturating_add(1);
                        }
                        cell = Some(pending);
                    }
                    b"v" => {
                        if let Some(pending) = cell.as_mut() {
                            // A formula whose cached result is "" has an empty <v>
                            if pending.cell_type.as_deref() == Some("str") {
                                pending.value.get_or_insert_with(String::new);
                            }
                            in_value = true;
                        }
                    }
                    b"f" if cell.is_some() => in_formula = true,
                    b"is" => {
                        if let Some(pending) = cell.as_mut() {
                            // `<is><t/></is>` is an empty string, not a blank cell
                            pending.value.get_or_insert_with(String::new);
                            pending.cell_type = Some("inlineStr".to_string());
                            in_inline_str = true;
                        }
                    }
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        current_row = Self::row_index(&e).unwrap_or(current_row) + 1;
                        next_col = 0;
                    }
                    b"c" => {
                        // A value-less cell (usually style only) still
                        // advances the implicit column counter
                        let pending = Self::start_cell(&e, current_row, next_col)?;
                        if let Some(addr) = pending.address {
                            next_col = addr.col.saturating_add(1);
                        }
                    }
                    b"f" => {
                        // Shared formula reference: <f t="shared" si="0"/>
                        if let Some(pending) = cell.as_mut() {
                            pending.formula.get_or_insert_with(String::new);
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            Self::process_cell(worksheet, pending, shared_strings)?;
                        }
                    }
                    b"row" => {
                        current_row = current_row.saturating_add(1);
                        next_col = 0;
                    }
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"is" => in_inline_str = false,
                    b"t" if in_inline_str => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if let Some(pending) = cell.as_mut() {
                        if in_value {
                            let text = e.unescape()?;
                            pending.value.get_or_insert_with(String::new).push_str(&text);
                        } else if in_formula {
                            let text = e.unescape()?;
                            pending
                                .formula
                                .get_or_insert_with(String::new)
                                .push_str(&text);
                        } else if in_inline_text {
                            let text = e.unescape()?;
                            pending.value.get_or_insert_with(String::new).push_str(&text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// 0-based row index from a `<row r="N">` element
    fn row_index(e: &BytesStart) -> Option<u32> {
        attr_value(e, b"r")
            .and_then(|r| r.parse::<u32>().ok())
            .map(|r| r.saturating_sub(1))
    }

    fn start_cell(e: &BytesStart, current_row: u32, next_col: u16) -> XlsxResult<PendingCell> {
        let address = match attr_value(e, b"r") {
            Some(cell_ref) => CellAddress::parse(&cell_ref).map_err(|err| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, err))
            })?,
            None => CellAddress::new(current_row, next_col),
        };

        Ok(PendingCell {
            address: Some(address),
            cell_type: attr_value(e, b"t"),
            value: None,
            formula: None,
        })
    }

    /// Convert a raw `<v>` payload according to the cell's `t` attribute
    fn typed_value(
        cell_type: Option<&str>,
        raw: &str,
        shared_strings: &[SharedString],
    ) -> XlsxResult<CellValue> {
        let value = match cell_type {
            Some("s") => {
                let idx: usize = raw.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", raw))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::String(s.clone())
            }
            Some("b") => CellValue::Boolean(is_truthy(raw.trim())),
            Some("e") => CellError::parse(raw.trim())
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(raw)),
            Some("inlineStr") | Some("str") => CellValue::string(decode_excel_escapes(raw)),
            None | Some("n") => match raw.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(raw),
            },
            // ISO 8601 dates (t="d") and unknown types stay textual
            Some(_) => CellValue::string(raw),
        };
        Ok(value)
    }

    fn process_cell(
        worksheet: &mut Worksheet,
        cell: PendingCell,
        shared_strings: &[SharedString],
    ) -> XlsxResult<()> {
        let Some(addr) = cell.address else {
            return Ok(());
        };
        let cell_type = cell.cell_type.as_deref();

        let value = match (cell.formula, cell.value) {
            (Some(formula), value) => {
                let cached = match value {
                    Some(raw) => Some(Box::new(Self::typed_value(cell_type, &raw, shared_strings)?)),
                    None => None,
                };
                let text = if formula.is_empty() || formula.starts_with('=') {
                    formula
                } else {
                    format!("={}", formula)
                };
                CellValue::Formula {
                    text,
                    cached_value: cached,
                }
            }
            (None, Some(raw)) => Self::typed_value(cell_type, &raw, shared_strings)?,
            (None, None) => return Ok(()),
        };

        worksheet.set_cell_value_at(addr.row, addr.col, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    /// Build a minimal package around the given parts
    fn build_xlsx(sheets: &[(&str, &str)], shared_strings: Option<&str>) -> Vec<u8> {
        build_package(sheets, shared_strings, None)
    }

    /// Like [`build_xlsx`], but when `shared_strings_target` is set the table
    /// is stored there and linked from the workbook relationships
    fn build_package(
        sheets: &[(&str, &str)],
        shared_strings: Option<&str>,
        shared_strings_target: Option<&str>,
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#).unwrap();

            let mut workbook = String::from(r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#);
            let mut rels = String::from(r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
            for (i, (name, _)) in sheets.iter().enumerate() {
                workbook.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    name,
                    i + 1,
                    i + 1
                ));
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    i + 1,
                    i + 1
                ));
            }
            if let Some(target) = shared_strings_target {
                rels.push_str(&format!(
                    r#"<Relationship Id="rIdSst" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="{}"/>"#,
                    target
                ));
            }
            workbook.push_str("</sheets></workbook>");
            rels.push_str("</Relationships>");

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(workbook.as_bytes()).unwrap();
            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(rels.as_bytes()).unwrap();

            if let Some(sst) = shared_strings {
                let part = shared_strings_target
                    .map(XlsxReader::resolve_part_path)
                    .unwrap_or_else(|| DEFAULT_SHARED_STRINGS_PART.to_string());
                zip.start_file(part, options).unwrap();
                zip.write_all(sst.as_bytes()).unwrap();
            }

            for (i, (_, data)) in sheets.iter().enumerate() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                    .unwrap();
                zip.write_all(
                    format!(
                        r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                        data
                    )
                    .as_bytes(),
                )
                .unwrap();
            }

            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
        assert_eq!(decode_excel_escapes("col1_x0009_col2"), "col1\tcol2");
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
        assert_eq!(decode_excel_escapes("_x000D__x000A_"), "\r\n");
        assert_eq!(decode_excel_escapes("plain text"), "plain text");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("snake_case"), "snake_case");
        assert_eq!(decode_excel_escapes("_x_x0041_"), "_xA");
    }

    #[test]
    fn test_read_empty_sheet() {
        let buf = build_xlsx(&[("Sheet1", "")], None);
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();

        assert_eq!(workbook.sheet_names(), vec!["Sheet1"]);
        assert!(workbook.worksheet(0).unwrap().is_empty());
    }

    #[test]
    fn test_read_typed_values() {
        let sst = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>Y</t></si><si><r><t>N</t></r><r><t>o</t></r></si><si><t xml:space="preserve">Y </t></si></sst>"#;
        let data = concat!(
            r#"<row r="1">"#,
            r#"<c r="A1" t="inlineStr"><is><t>Alice</t></is></c>"#,
            r#"<c r="E1" t="s"><v>0</v></c>"#,
            r#"<c r="F1" t="s"><v>1</v></c>"#,
            r#"<c r="G1" t="s"><v>2</v></c>"#,
            r#"<c r="H1"><v>1</v></c>"#,
            r#"<c r="I1" t="b"><v>1</v></c>"#,
            r#"<c r="J1" t="e"><v>#N/A</v></c>"#,
            r#"<c r="K1" s="3"/>"#,
            r#"</row>"#
        );
        let buf = build_xlsx(&[("blank", data)], Some(sst));
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let sheet = workbook.worksheet_by_name("blank").unwrap();

        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::from("Alice"));
        assert_eq!(sheet.get_value("E1").unwrap(), CellValue::from("Y"));
        assert_eq!(sheet.get_value("F1").unwrap(), CellValue::from("No"));
        assert_eq!(sheet.get_value("G1").unwrap(), CellValue::from("Y "));
        assert_eq!(sheet.get_value("H1").unwrap(), CellValue::Number(1.0));
        assert_eq!(sheet.get_value("I1").unwrap(), CellValue::Boolean(true));
        assert_eq!(
            sheet.get_value("J1").unwrap(),
            CellValue::Error(CellError::Na)
        );
        assert_eq!(sheet.get_value("K1").unwrap(), CellValue::Empty);
        assert_eq!(sheet.max_column(), 10);
    }

    #[test]
    fn test_read_formula_with_cached_value() {
        let data = concat!(
            r#"<row r="1">"#,
            r#"<c r="E1" t="str"><f>IF(A1=1,"Y","N")</f><v>Y</v></c>"#,
            r#"<c r="F1"><f>1+1</f></c>"#,
            r#"</row>"#
        );
        let buf = build_xlsx(&[("blank", data)], None);
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let sheet = workbook.worksheet(0).unwrap();

        let e1 = sheet.get_value("E1").unwrap();
        assert_eq!(e1.formula_text(), Some("=IF(A1=1,\"Y\",\"N\")"));
        assert_eq!(e1.resolved(), Some(&CellValue::from("Y")));

        let f1 = sheet.get_value("F1").unwrap();
        assert!(f1.is_formula());
        assert_eq!(f1.resolved(), None);
    }

    #[test]
    fn test_read_cells_without_references() {
        let data = r#"<row r="2"><c t="inlineStr"><is><t>a</t></is></c><c><v>7</v></c></row>"#;
        let buf = build_xlsx(&[("blank", data)], None);
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let sheet = workbook.worksheet(0).unwrap();

        assert_eq!(sheet.get_value("A2").unwrap(), CellValue::from("a"));
        assert_eq!(sheet.get_value("B2").unwrap(), CellValue::Number(7.0));
    }

    #[test]
    fn test_read_empty_inline_string() {
        let data = concat!(
            r#"<row r="1">"#,
            r#"<c r="A1" t="inlineStr"><is><t/></is></c>"#,
            r#"<c r="B1" t="inlineStr"><is><t xml:space="preserve"></t></is></c>"#,
            r#"<c r="C1" t="str"><f>""</f><v></v></c>"#,
            r#"</row>"#
        );
        let buf = build_xlsx(&[("blank", data)], None);
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let sheet = workbook.worksheet(0).unwrap();

        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::from(""));
        assert_eq!(sheet.get_value("B1").unwrap(), CellValue::from(""));
        assert_eq!(
            sheet.get_value("C1").unwrap().resolved(),
            Some(&CellValue::from(""))
        );
    }

    #[test]
    fn test_shared_strings_found_through_relationship() {
        let sst = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>Y</t></si></sst>"#;
        let data = r#"<row r="1"><c r="E1" t="s"><v>0</v></c></row>"#;
        let buf = build_package(&[("blank", data)], Some(sst), Some("strings/custom.xml"));
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let sheet = workbook.worksheet(0).unwrap();

        assert_eq!(sheet.get_value("E1").unwrap(), CellValue::from("Y"));
    }

    #[test]
    fn test_long_sheet_names_still_load() {
        let long_name = "Instructions for the learner - read me";
        let data = r#"<row r="1"><c r="E1" t="inlineStr"><is><t>Y</t></is></c></row>"#;
        let buf = build_xlsx(&[("blank", data), (long_name, "")], None);
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();

        assert_eq!(workbook.sheet_names(), vec!["blank", long_name]);
        let sheet = workbook.worksheet_by_name("blank").unwrap();
        assert_eq!(sheet.get_value("E1").unwrap(), CellValue::from("Y"));
    }

    #[test]
    fn test_sheet_order_and_names() {
        let buf = build_xlsx(&[("solution", ""), ("notes", "")], None);
        let names = XlsxReader::read_sheet_names(Cursor::new(buf)).unwrap();
        assert_eq!(names, vec!["solution".to_string(), "notes".to_string()]);
    }

    #[test]
    fn test_not_a_zip_is_rejected() {
        let err = XlsxReader::read(Cursor::new(b"PK? definitely not a workbook".to_vec()))
            .unwrap_err();
        assert!(matches!(err, XlsxError::Zip(_)));
    }

    #[test]
    fn test_missing_workbook_part() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(b"<Types/>").unwrap();
            zip.finish().unwrap();
        }

        let err = XlsxReader::read(Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, XlsxError::MissingPart(part) if part == "xl/workbook.xml"));
    }

    #[test]
    fn test_resolve_part_path() {
        assert_eq!(
            XlsxReader::resolve_part_path("worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            XlsxReader::resolve_part_path("/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
    }
}
