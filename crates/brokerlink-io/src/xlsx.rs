use crate::Result;
use brokerlink_core::Table;
use rust_xlsxwriter::{ColNum, ExcelDateTime, Format, RowNum, Url, Workbook, XlsxError};
use tracing::warn;

const WIDTH_PADDING: usize = 2;
const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Excel refuses worksheets with more hyperlinks than this.
pub const MAX_HYPERLINKS: usize = 65_530;
/// Longest hyperlink target Excel accepts.
pub const MAX_URL_LEN: usize = 2_079;

// Sequences rust_xlsxwriter takes as proof that a URL is already escaped.
const ESCAPE_MARKERS: [&str; 11] = [
    "%25", "%22", "%20", "%3c", "%3e", "%5b", "%5d", "%5e", "%60", "%7b", "%7d",
];

#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookOptions {
    pub sheet_name: String,
    pub link_column: String,
    pub link_label: String,
    pub link_column_width: f64,
    /// Column whose ISO date values are written as Excel dates.
    pub date_column: Option<String>,
}

/// Renders the table as a single-sheet workbook. Headers are bold and
/// upper-cased; every non-empty cell of the link column becomes a hyperlink
/// labelled with `link_label`, up to [`MAX_HYPERLINKS`]. Links past the cap,
/// or links Excel cannot store verbatim, are written as plain text.
pub fn render_workbook(table: &Table, options: &WorkbookOptions) -> Result<Vec<u8>> {
    render_with_link_limit(table, options, MAX_HYPERLINKS)
}

fn render_with_link_limit(
    table: &Table,
    options: &WorkbookOptions,
    link_limit: usize,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&options.sheet_name)?;

    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);
    let link_idx = table.column_index(&options.link_column);
    let date_idx = options
        .date_column
        .as_deref()
        .and_then(|name| table.column_index(name));

    for (idx, name) in table.columns().iter().enumerate() {
        let col = column_number(idx)?;
        worksheet.write_string_with_format(0, col, name.to_uppercase(), &header)?;

        let width = if Some(idx) == link_idx {
            options.link_column_width
        } else {
            column_width(name, table.rows().iter().map(|row| row[idx].as_str()))
        };
        worksheet.set_column_width(col, width)?;
    }

    let mut links = 0usize;
    let mut over_limit = 0usize;
    let mut unlinkable = 0usize;
    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = row_number(row_idx + 1)?;
        for (idx, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let col = column_number(idx)?;
            if Some(idx) == link_idx {
                match hyperlink_target(cell) {
                    Some(_) if links >= link_limit => {
                        over_limit += 1;
                        worksheet.write_string(row_num, col, cell.as_str())?;
                    }
                    Some(target) => {
                        links += 1;
                        let url = Url::new(target).set_text(&options.link_label);
                        worksheet.write_url(row_num, col, url)?;
                    }
                    None => {
                        unlinkable += 1;
                        worksheet.write_string(row_num, col, cell.as_str())?;
                    }
                }
            } else if Some(idx) == date_idx {
                match ExcelDateTime::parse_from_str(cell) {
                    Ok(value) => {
                        let format = if cell.contains(':') {
                            &datetime_format
                        } else {
                            &date_format
                        };
                        worksheet.write_datetime_with_format(row_num, col, &value, format)?;
                    }
                    Err(_) => {
                        worksheet.write_string(row_num, col, cell.as_str())?;
                    }
                }
            } else {
                worksheet.write_string(row_num, col, cell.as_str())?;
            }
        }
    }

    if over_limit > 0 {
        warn!(
            limit = link_limit,
            count = over_limit,
            "hyperlink limit reached, remaining links written as text"
        );
    }
    if unlinkable > 0 {
        warn!(
            count = unlinkable,
            "links Excel cannot store verbatim written as text"
        );
    }

    Ok(workbook.save_to_buffer()?)
}

/// Width in characters of the longest value or header, plus padding.
pub fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> f64 {
    let longest = values
        .map(|value| value.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0);
    (longest + WIDTH_PADDING) as f64
}

/// Rewrites an already percent-encoded link so the writer stores it as is.
///
/// rust_xlsxwriter escapes `%` again unless the URL carries one of
/// [`ESCAPE_MARKERS`], so raw spaces and the other characters it would escape
/// are encoded here and marker escapes are lower-cased. `None` means the link
/// cannot be stored verbatim: it is too long, or it has escapes but no marker.
fn hyperlink_target(link: &str) -> Option<String> {
    let mut target = String::with_capacity(link.len() + 16);
    let mut chars = link.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ' ' => target.push_str("%20"),
            '"' => target.push_str("%22"),
            '<' => target.push_str("%3c"),
            '>' => target.push_str("%3e"),
            '[' => target.push_str("%5b"),
            ']' => target.push_str("%5d"),
            '^' => target.push_str("%5e"),
            '`' => target.push_str("%60"),
            '{' => target.push_str("%7b"),
            '}' => target.push_str("%7d"),
            '%' => {
                let rest = chars.as_str();
                match rest.get(..2) {
                    Some(hex) if hex.chars().all(|c| c.is_ascii_hexdigit()) => {
                        let lower = format!("%{}", hex.to_ascii_lowercase());
                        if ESCAPE_MARKERS.contains(&lower.as_str()) {
                            target.push_str(&lower);
                        } else {
                            target.push('%');
                            target.push_str(hex);
                        }
                        chars.nth(1);
                    }
                    _ => target.push_str("%25"),
                }
            }
            other => target.push(other),
        }
    }

    if target.chars().count() > MAX_URL_LEN {
        return None;
    }
    let marked = ESCAPE_MARKERS
        .iter()
        .any(|marker| target.contains(marker));
    if target.contains('%') && !marked {
        return None;
    }
    Some(target)
}

fn column_number(idx: usize) -> Result<ColNum> {
    ColNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError.into())
}

fn row_number(idx: usize) -> Result<RowNum> {
    RowNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError.into())
}
