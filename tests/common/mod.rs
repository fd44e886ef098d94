//! Builds small `.xlsx` workbooks in memory.

#![allow(dead_code)]

use std::io::Cursor;
use std::io::Read;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipArchive;
use zip::ZipWriter;

#[derive(Clone, Debug)]
pub enum Cell {
    Text(&'static str),
    Number(f64),
    /// `#N/A` style error cell
    Error(&'static str),
    Empty,
}

pub use Cell::*;

pub struct Sheet {
    pub name: &'static str,
    pub rows: Vec<Vec<Cell>>,
}

pub fn sheet(name: &'static str, rows: Vec<Vec<Cell>>) -> Sheet {
    Sheet { name, rows }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn column_name(mut index: usize) -> String {
    let mut name = String::new();
    loop {
        name.insert(0, (b'A' + (index % 26) as u8) as char);
        if index < 26 {
            return name;
        }
        index = index / 26 - 1;
    }
}

fn worksheet_xml(sheet: &Sheet) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row_index, row) in sheet.rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, row_index + 1));
        for (col_index, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_name(col_index), row_index + 1);
            match cell {
                Text(text) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference,
                    escape(text)
                )),
                Number(number) => xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, number)),
                Error(code) => xml.push_str(&format!(r#"<c r="{}" t="e"><v>{}</v></c>"#, reference, escape(code))),
                Empty => (),
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Zips the sheets into a workbook, in the given order.
pub fn xlsx(sheets: &[Sheet]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut relationships = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (index, sheet) in sheets.iter().enumerate() {
        let number = index + 1;
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(sheet.name),
            number,
            number
        ));
        relationships.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            number, number
        ));
    }
    workbook.push_str("</sheets></workbook>");
    relationships.push_str("</Relationships>");

    writer.start_file("xl/workbook.xml", options).unwrap();
    writer.write_all(workbook.as_bytes()).unwrap();
    writer.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    writer.write_all(relationships.as_bytes()).unwrap();
    for (index, sheet) in sheets.iter().enumerate() {
        writer
            .start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)
            .unwrap();
        writer.write_all(worksheet_xml(sheet).as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn template() -> Sheet {
    sheet(
        "Output",
        vec![vec![
            Text("name_english"),
            Text("price"),
            Text("quantity"),
            Text("description"),
            Text("category"),
            Text("sub_category"),
            Text("image"),
            Text("external_id"),
        ]],
    )
}

pub fn catalog(rows: Vec<Vec<Cell>>) -> Sheet {
    let mut all = vec![vec![
        Text("external_id"),
        Text("name_english"),
        Text("category"),
        Text("sub_category"),
        Text("description"),
    ]];
    all.extend(rows);
    sheet("Catalog", all)
}

pub fn updates(rows: Vec<Vec<Cell>>) -> Sheet {
    let mut all = vec![vec![Text("product_id"), Text("store_id"), Text("price"), Text("quantity")]];
    all.extend(rows);
    sheet("MAJ", all)
}

pub fn images(rows: Vec<Vec<Cell>>) -> Sheet {
    let mut all = vec![vec![Text("external_id"), Text("image"), Text("PICTURE_ORDER")]];
    all.extend(rows);
    sheet("Images", all)
}

/// Reads every entry of a ZIP archive as (name, UTF-8 content).
pub fn unzip(bytes: &[u8]) -> Vec<(String, String)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut file = archive.by_index(index).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        entries.push((file.name().to_owned(), content));
    }
    entries
}
