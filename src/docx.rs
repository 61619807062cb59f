//! Text extraction from .docx reference documents.
//!
//! A .docx file is a zip archive; all visible text lives in
//! `word/document.xml`. We stream that XML and collect two kinds of blocks,
//! in document order: paragraph text outside any table first, then table cell
//! text (table, row, cell order). Blocks that are empty after trimming are
//! omitted. No other document format is supported.

use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use zip::ZipArchive;

/// Extract non-empty trimmed text blocks from a .docx file.
pub fn extract_blocks(path: &Path) -> Result<Vec<String>, String> {
    let file = fs::File::open(path)
        .map_err(|e| format!("failed to open document {}: {}", path.display(), e))?;
    blocks_from_archive(file)
}

/// Concatenate the blocks into the flat text used by the segmenter.
pub fn extract_text(path: &Path) -> Result<String, String> {
    Ok(extract_blocks(path)?.join("\n"))
}

fn blocks_from_archive<R: Read + Seek>(reader: R) -> Result<Vec<String>, String> {
    let mut archive =
        ZipArchive::new(reader).map_err(|e| format!("not a valid .docx archive: {}", e))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| format!("missing word/document.xml: {}", e))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("failed to read document XML: {}", e))?;

    let mut reader = XmlReader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();

    let mut paragraph_blocks: Vec<String> = Vec::new();
    let mut table_blocks: Vec<String> = Vec::new();

    let mut in_text_node = false;
    let mut table_depth = 0usize;
    // Current paragraph text, and the paragraphs of the table cell being read.
    let mut paragraph = String::new();
    let mut cell_paragraphs: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = true,
                b"w:tbl" => table_depth += 1,
                b"w:tc" if table_depth == 1 => cell_paragraphs.clear(),
                b"w:tab" => paragraph.push('\t'),
                b"w:br" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_node {
                    let value = e
                        .unescape()
                        .map_err(|err| format!("failed to parse document XML: {}", err))?;
                    paragraph.push_str(&value);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = false,
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" => {
                    let text = std::mem::take(&mut paragraph);
                    if table_depth == 1 {
                        cell_paragraphs.push(text);
                    } else if table_depth == 0 {
                        let trimmed = text.trim();
                        if !trimmed.is_empty() {
                            paragraph_blocks.push(trimmed.to_string());
                        }
                    }
                    // Paragraphs inside nested tables are dropped: cell text
                    // covers only the cell's direct paragraphs.
                }
                b"w:tc" if table_depth == 1 => {
                    let cell = cell_paragraphs.join("\n");
                    let trimmed = cell.trim();
                    if !trimmed.is_empty() {
                        table_blocks.push(trimmed.to_string());
                    }
                    cell_paragraphs.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(format!("failed to parse document XML: {}", err)),
            _ => {}
        }
        buf.clear();
    }

    paragraph_blocks.extend(table_blocks);
    Ok(paragraph_blocks)
}
