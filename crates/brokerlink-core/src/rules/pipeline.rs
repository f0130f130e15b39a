use crate::domain::{normalize_phone, CanonicalPhone, DeviceMode, Table};
use crate::error::CoreError;
use crate::link::EncodedMessage;
use crate::rules::columns::{
    DisplayColumnPolicy, NameLikeColumn, DATE_COLUMN, LINK_COLUMN, PHONE_COLUMN, PRUNED_COLUMNS,
};
use crate::time::{default_date_formats, format_license_date, parse_license_date};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Inclusive lower bound on the license start date.
    pub cutoff: NaiveDate,
    pub mode: DeviceMode,
    pub date_formats: Vec<String>,
}

impl PipelineOptions {
    pub fn new(cutoff: NaiveDate, mode: DeviceMode) -> Self {
        Self {
            cutoff,
            mode,
            date_formats: default_date_formats(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub read: usize,
    pub invalid_date: usize,
    pub before_cutoff: usize,
    pub invalid_phone: usize,
    pub written: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub table: Table,
    pub report: ProcessReport,
}

struct Kept {
    date: NaiveDateTime,
    phone: CanonicalPhone,
    row: Vec<String>,
}

pub fn process(
    table: Table,
    message: &str,
    options: &PipelineOptions,
) -> Result<Processed, CoreError> {
    process_with_policy(table, message, options, &NameLikeColumn::default())
}

pub fn process_with_policy(
    table: Table,
    message: &str,
    options: &PipelineOptions,
    display: &dyn DisplayColumnPolicy,
) -> Result<Processed, CoreError> {
    let date_idx = table.require_column(DATE_COLUMN)?;
    let phone_idx = table.require_column(PHONE_COLUMN)?;
    let (columns, rows) = table.into_parts();

    let mut report = ProcessReport {
        read: rows.len(),
        ..ProcessReport::default()
    };
    let cutoff = options.cutoff.and_time(NaiveTime::MIN);

    let dated: Vec<(NaiveDateTime, Vec<String>)> = rows
        .into_iter()
        .filter_map(
            |row| match parse_license_date(&row[date_idx], &options.date_formats) {
                None => {
                    report.invalid_date += 1;
                    None
                }
                Some(date) if date < cutoff => {
                    report.before_cutoff += 1;
                    None
                }
                Some(date) => Some((date, row)),
            },
        )
        .collect();

    let mut kept: Vec<Kept> = Vec::with_capacity(dated.len());
    for (date, mut row) in dated {
        let Some(phone) = normalize_phone(&row[phone_idx]) else {
            report.invalid_phone += 1;
            continue;
        };
        row[date_idx] = format_license_date(date);
        row[phone_idx] = phone.as_str().to_string();
        kept.push(Kept { date, phone, row });
    }

    // Stable: equal dates keep their input order.
    kept.sort_by(|a, b| b.date.cmp(&a.date));

    let mut phones = Vec::with_capacity(kept.len());
    let mut rows = Vec::with_capacity(kept.len());
    for Kept { phone, row, .. } in kept {
        phones.push(phone);
        rows.push(row);
    }

    let mut table = Table::from_parts(columns, rows);
    table.drop_columns(&PRUNED_COLUMNS);

    let message = EncodedMessage::new(message, options.mode);
    let links = phones.iter().map(|phone| message.link_for(phone)).collect();
    table.set_column(LINK_COLUMN, links);

    let table = match options.mode {
        DeviceMode::Mobile => {
            let candidates: Vec<String> = table
                .columns()
                .iter()
                .filter(|column| {
                    ![DATE_COLUMN, PHONE_COLUMN, LINK_COLUMN].contains(&column.as_str())
                })
                .cloned()
                .collect();
            let mut selected = Vec::with_capacity(4);
            if let Some(column) = display.display_column(&candidates) {
                selected.push(column);
            }
            selected.extend([DATE_COLUMN, PHONE_COLUMN, LINK_COLUMN]);
            table.select_columns(&selected)
        }
        DeviceMode::Desktop => {
            table.move_column_to_end(LINK_COLUMN);
            table
        }
    };

    report.written = table.len();
    Ok(Processed { table, report })
}
