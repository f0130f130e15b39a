use brokerlink_core::rules::{DATE_COLUMN, LINK_COLUMN};
use brokerlink_core::{process, DeviceMode, PipelineOptions};
use brokerlink_io::delimited::CsvOptions;
use brokerlink_io::output::export_xlsx;
use brokerlink_io::source::{CsvFile, TableSource};
use brokerlink_io::xlsx::WorkbookOptions;
use chrono::NaiveDate;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::TempDir;

const BROKERS_CSV: &str = "\
BROKER_NUMBER,BROKER_NAME_EN,GENDER_EN,LICENSE_START_DATE,LICENSE_END_DATE,PHONE,FAX,WEBPAGE
101,Ada Lovelace,Female,2024-05-01,2025-05-01,+971 50 123 4567,,
102,Bob Stone,Male,2024-06-01,2025-06-01,12,,
103,Cy Young,Male,2023-12-31,2024-12-31,0559876543,,
104,Dee Park,Female,not-a-date,2025-06-01,0551112222,,
";

fn workbook_options() -> WorkbookOptions {
    WorkbookOptions {
        sheet_name: "BROKERS".to_string(),
        link_column: LINK_COLUMN.to_string(),
        link_label: "Send WhatsApp".to_string(),
        link_column_width: 20.0,
        date_column: Some(DATE_COLUMN.to_string()),
    }
}

fn workbook_part(path: &Path, name: &str) -> String {
    let bytes = fs::read(path).expect("read xlsx");
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open xlsx");
    let mut part = archive.by_name(name).expect("workbook part");
    let mut out = String::new();
    part.read_to_string(&mut out).expect("read part");
    out
}

#[test]
fn csv_to_xlsx_keeps_only_valid_rows() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("brokers.csv");
    fs::write(&input, BROKERS_CSV).expect("write csv");

    let source = CsvFile::new(&input, CsvOptions::default());
    assert_eq!(source.source_name(), input.display().to_string());
    let table = source.read_table().expect("read csv");
    assert_eq!(table.len(), 4);

    let cutoff = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let processed = process(
        table,
        "Hello 😊",
        &PipelineOptions::new(cutoff, DeviceMode::Desktop),
    )
    .expect("process");

    assert_eq!(processed.report.written, 1);
    assert_eq!(processed.report.invalid_date, 1);
    assert_eq!(processed.report.before_cutoff, 1);
    assert_eq!(processed.report.invalid_phone, 1);
    assert_eq!(
        processed.table.columns(),
        [
            "BROKER_NUMBER",
            "BROKER_NAME_EN",
            "LICENSE_START_DATE",
            "PHONE",
            "WHATSAPP"
        ]
    );
    assert_eq!(processed.table.cell(0, "PHONE"), Some("971501234567"));
    assert_eq!(
        processed.table.cell(0, LINK_COLUMN),
        Some("https://web.whatsapp.com/send?phone=971501234567&text=Hello%20%F0%9F%98%8A")
    );

    let output = temp.path().join("brokers-cleaned_cine.xlsx");
    let written = export_xlsx(&processed.table, &output, &workbook_options()).expect("export");
    assert_eq!(written, 1);

    let strings = workbook_part(&output, "xl/sharedStrings.xml");
    for header in ["BROKER_NUMBER", "BROKER_NAME_EN", "LICENSE_START_DATE", "PHONE", "WHATSAPP"] {
        assert!(strings.contains(&format!("<t>{header}</t>")), "missing {header}");
    }
    assert!(strings.contains("<t>Send WhatsApp</t>"));

    let sheet = workbook_part(&output, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<col min="1" max="1" width="15.7109375" customWidth="1"/>"#));
    assert!(sheet.contains(r#"<col min="5" max="5" width="20.7109375" customWidth="1"/>"#));
    assert!(sheet.contains("<v>45413</v>"));
    assert!(sheet.contains(r#"<hyperlink ref="E2" r:id="rId1"/>"#));

    let rels = workbook_part(&output, "xl/worksheets/_rels/sheet1.xml.rels");
    assert!(rels.contains(
        r#"Target="https://web.whatsapp.com/send?phone=971501234567&amp;text=Hello%20%F0%9F%98%8A""#
    ));
}

#[test]
fn mobile_links_reach_the_workbook_unchanged() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("brokers.csv");
    fs::write(&input, BROKERS_CSV).expect("write csv");

    let table = CsvFile::new(&input, CsvOptions::default())
        .read_table()
        .expect("read csv");
    let cutoff = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let processed = process(
        table,
        "Hi, this 😊\nyou’re",
        &PipelineOptions::new(cutoff, DeviceMode::Mobile),
    )
    .expect("process");
    assert_eq!(
        processed.table.columns(),
        ["BROKER_NUMBER", "LICENSE_START_DATE", "PHONE", "WHATSAPP"]
    );
    assert_eq!(
        processed.table.cell(0, LINK_COLUMN),
        Some("https://wa.me/971501234567?text=Hi, this 😊%0Ayou%E2%80%99re")
    );

    let output = temp.path().join("brokers-cleaned_cine_mobile.xlsx");
    export_xlsx(&processed.table, &output, &workbook_options()).expect("export");

    let sheet = workbook_part(&output, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<col min="4" max="4" width="20.7109375" customWidth="1"/>"#));
    assert!(sheet.contains(r#"<hyperlink ref="D2" r:id="rId1"/>"#));

    let rels = workbook_part(&output, "xl/worksheets/_rels/sheet1.xml.rels");
    assert!(rels.contains(
        r#"Target="https://wa.me/971501234567?text=Hi,%20this%20😊%0Ayou%E2%80%99re""#
    ));
    assert!(!rels.contains("%25"));
}

#[test]
fn missing_phone_column_produces_no_output() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("brokers.csv");
    fs::write(&input, "BROKER_NAME_EN,LICENSE_START_DATE\nAda,2024-05-01\n").expect("write csv");

    let table = CsvFile::new(&input, CsvOptions::default())
        .read_table()
        .expect("read csv");
    let cutoff = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let err = process(
        table,
        "Hi",
        &PipelineOptions::new(cutoff, DeviceMode::Mobile),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "missing required column: PHONE");

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path() != input)
        .collect();
    assert!(leftovers.is_empty());
}
