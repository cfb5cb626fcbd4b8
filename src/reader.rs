use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{Result, ShiireError};
use crate::models::{Cell, RawRow};
use crate::repair::RepairStrategy;

// ---------------------------------------------------------------------------
// Workbook loading
// ---------------------------------------------------------------------------

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        // Date cells surface as Excel serials; the normalizer interprets them.
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

/// Load every row of the first worksheet as untyped cells. Handles both the
/// legacy binary `.xls` export and the zipped `.xlsx` export.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let display = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|e| ShiireError::Spreadsheet {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ShiireError::Spreadsheet {
            path: display.clone(),
            reason: "workbook has no sheets".to_string(),
        })?
        .map_err(|e| ShiireError::Spreadsheet {
            path: display,
            reason: e.to_string(),
        })?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect())
}

// ---------------------------------------------------------------------------
// Purchasing-export column resolution
// ---------------------------------------------------------------------------

/// Accepted header spellings per field. The export writes half-width
/// katakana headers; re-exported files sometimes carry the full-width forms.
const CODE_HEADERS: &[&str] = &["分類ｺｰﾄﾞ", "分類コード"];
const NAME_HEADERS: &[&str] = &["分類名称"];
const SUPPLIER_CODE_HEADERS: &[&str] = &["仕入先ｺｰﾄﾞ", "仕入先コード"];
const SUPPLIER_NAME_HEADERS: &[&str] = &["仕入先略称", "仕入先"];
const FILE_NO_HEADERS: &[&str] = &["ﾌｧｲﾙNO", "ファイルNO", "ファイルNo."];
const UNIT_NO_HEADERS: &[&str] = &["ﾕﾆｯﾄNO", "ユニットNO", "UNIT"];
const LINE_NO_HEADERS: &[&str] = &["部品番号", "No."];
const PRODUCT_HEADERS: &[&str] = &["品目名称", "品名"];
const MAKER_HEADERS: &[&str] = &["ﾒｰｶｰ名", "メーカー名", "メーカー"];
const MATERIAL_HEADERS: &[&str] = &["材質・型式", "材質・型式/規格"];
const QUANTITY_HEADERS: &[&str] = &["受入数量", "数量"];
const DATE_HEADERS: &[&str] = &["納入日", "受入日"];
const PRICE_HEADERS: &[&str] = &["受入単価", "単価"];

#[derive(Debug, Default, Clone)]
pub struct Columns {
    pub code: Option<usize>,
    pub name: Option<usize>,
    pub supplier_code: Option<usize>,
    pub supplier_name: Option<usize>,
    pub file_no: Option<usize>,
    pub unit_no: Option<usize>,
    pub line_no: Option<usize>,
    pub product: Option<usize>,
    pub maker: Option<usize>,
    pub material: Option<usize>,
    pub quantity: Option<usize>,
    pub date: Option<usize>,
    pub price: Option<usize>,
}

fn header_matches(text: &str, candidates: &[&str]) -> bool {
    let t = text.trim();
    candidates.iter().any(|c| t == *c)
}

impl Columns {
    fn resolve(headers: &[String]) -> Columns {
        let mut cols = Columns::default();
        for (i, h) in headers.iter().enumerate() {
            if header_matches(h, CODE_HEADERS) {
                cols.code = cols.code.or(Some(i));
            } else if header_matches(h, NAME_HEADERS) {
                cols.name = cols.name.or(Some(i));
            } else if header_matches(h, SUPPLIER_CODE_HEADERS) {
                cols.supplier_code = cols.supplier_code.or(Some(i));
            } else if header_matches(h, SUPPLIER_NAME_HEADERS) {
                cols.supplier_name = cols.supplier_name.or(Some(i));
            } else if header_matches(h, FILE_NO_HEADERS) {
                cols.file_no = cols.file_no.or(Some(i));
            } else if header_matches(h, UNIT_NO_HEADERS) {
                cols.unit_no = cols.unit_no.or(Some(i));
            } else if header_matches(h, LINE_NO_HEADERS) {
                cols.line_no = cols.line_no.or(Some(i));
            } else if header_matches(h, PRODUCT_HEADERS) {
                cols.product = cols.product.or(Some(i));
            } else if header_matches(h, MAKER_HEADERS) {
                cols.maker = cols.maker.or(Some(i));
            } else if header_matches(h, MATERIAL_HEADERS) {
                cols.material = cols.material.or(Some(i));
            } else if header_matches(h, QUANTITY_HEADERS) {
                cols.quantity = cols.quantity.or(Some(i));
            } else if header_matches(h, DATE_HEADERS) {
                cols.date = cols.date.or(Some(i));
            } else if header_matches(h, PRICE_HEADERS) {
                cols.price = cols.price.or(Some(i));
            }
        }
        cols
    }

    fn matched_count(&self) -> usize {
        [
            self.code,
            self.name,
            self.supplier_code,
            self.supplier_name,
            self.file_no,
            self.unit_no,
            self.line_no,
            self.product,
            self.maker,
            self.material,
            self.quantity,
            self.date,
            self.price,
        ]
        .iter()
        .filter(|c| c.is_some())
        .count()
    }

    /// A row counts as the header once enough known columns line up;
    /// `require` then reports any essential column that is still missing.
    fn is_header_like(&self) -> bool {
        self.matched_count() >= 3
    }

    fn require(&self, path: &str) -> Result<()> {
        for (idx, label) in [
            (self.code, "分類ｺｰﾄﾞ"),
            (self.file_no, "ﾌｧｲﾙNO"),
            (self.quantity, "受入数量"),
            (self.price, "受入単価"),
        ] {
            if idx.is_none() {
                return Err(ShiireError::MissingColumn {
                    path: path.to_string(),
                    column: label.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Repair each cell of a candidate header row so garbled `.xls` headers
/// still match. Cell values themselves stay raw for the normalizer.
fn repaired_headers(row: &[Cell], strategy: RepairStrategy) -> Vec<String> {
    row.iter()
        .map(|c| match c {
            Cell::Text(s) => strategy.apply(s.trim()).text,
            other => other.as_text(),
        })
        .collect()
}

/// Scan the leading rows for the export's header line. The internal system
/// pads exports with title and date rows before the real header.
pub fn locate_header(
    rows: &[Vec<Cell>],
    strategy: RepairStrategy,
) -> Option<(usize, Columns)> {
    for (i, row) in rows.iter().enumerate().take(50) {
        let headers = repaired_headers(row, strategy);
        let cols = Columns::resolve(&headers);
        if cols.is_header_like() {
            return Some((i, cols));
        }
    }
    None
}

fn pick(row: &[Cell], idx: Option<usize>) -> Cell {
    idx.and_then(|i| row.get(i)).cloned().unwrap_or(Cell::Empty)
}

/// Map data rows (everything after the header) into RawRows, skipping rows
/// that are entirely blank.
pub fn map_rows(rows: &[Vec<Cell>], cols: &Columns) -> Vec<RawRow> {
    rows.iter()
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .map(|row| RawRow {
            classification_code: pick(row, cols.code),
            classification_name: pick(row, cols.name),
            supplier_code: pick(row, cols.supplier_code),
            supplier_name: pick(row, cols.supplier_name),
            file_no: pick(row, cols.file_no),
            unit_no: pick(row, cols.unit_no),
            line_no: pick(row, cols.line_no),
            product_name: pick(row, cols.product),
            manufacturer: pick(row, cols.maker),
            material_model: pick(row, cols.material),
            quantity: pick(row, cols.quantity),
            received_date: pick(row, cols.date),
            unit_price: pick(row, cols.price),
        })
        .collect()
}

/// Read the primary purchasing export into raw rows.
pub fn read_purchasing_export(path: &Path, strategy: RepairStrategy) -> Result<Vec<RawRow>> {
    let display = path.display().to_string();
    let rows = read_rows(path)?;
    let (header_idx, cols) = locate_header(&rows, strategy)
        .ok_or_else(|| ShiireError::HeaderNotFound(display.clone()))?;
    cols.require(&display)?;
    Ok(map_rows(&rows[header_idx + 1..], &cols))
}
