use crate::commands::{print_json, Context};
use crate::util::{parse_since, today_local};
use anyhow::{Context as _, Result};
use brokerlink_config::parse_delimiter;
use brokerlink_core::rules::{NameLikeColumn, DATE_COLUMN, LINK_COLUMN};
use brokerlink_core::{process_with_policy, DeviceMode, PipelineOptions, ProcessReport};
use brokerlink_io::delimited::CsvOptions;
use brokerlink_io::output::{ensure_distinct_paths, export_xlsx, resolve_output_path};
use brokerlink_io::source::{CsvFile, TableSource};
use brokerlink_io::xlsx::WorkbookOptions;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Broker export to read (delimited text with a header row)
    pub input: PathBuf,
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Keep records licensed on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,
    #[arg(long)]
    pub template: Option<String>,
    #[arg(long, value_enum, conflicts_with = "mobile")]
    pub device: Option<DeviceArg>,
    /// Shorthand for --device mobile
    #[arg(long)]
    pub mobile: bool,
    #[arg(long)]
    pub delimiter: Option<String>,
    /// Run the pipeline and report counts without writing a file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DeviceArg {
    Desktop,
    Mobile,
}

impl From<DeviceArg> for DeviceMode {
    fn from(device: DeviceArg) -> Self {
        match device {
            DeviceArg::Desktop => DeviceMode::Desktop,
            DeviceArg::Mobile => DeviceMode::Mobile,
        }
    }
}

#[derive(Debug, Serialize)]
struct CleanReport {
    input: String,
    output: Option<String>,
    template: String,
    device_mode: DeviceMode,
    cutoff: String,
    #[serde(flatten)]
    counts: ProcessReport,
}

pub fn clean(ctx: &Context<'_>, args: CleanArgs) -> Result<()> {
    let config = ctx.config;

    let mode = if args.mobile {
        DeviceMode::Mobile
    } else {
        args.device.map(DeviceMode::from).unwrap_or(config.device_mode)
    };
    let cutoff = match args.since.as_deref() {
        Some(raw) => parse_since(raw)?,
        None => config.cutoff_date.unwrap_or_else(today_local),
    };
    let template_name = args
        .template
        .as_deref()
        .unwrap_or(config.default_template.as_str());
    let template = config.templates.get(template_name)?;
    let delimiter = match args.delimiter.as_deref() {
        Some(raw) => parse_delimiter(raw)?,
        None => config.delimiter,
    };

    let output = if args.dry_run {
        None
    } else {
        let path = resolve_output_path(args.out, &template.name, mode)?;
        ensure_distinct_paths(&args.input, &path)?;
        Some(path)
    };

    debug!(
        input = %args.input.display(),
        template = %template.name,
        mode = %mode,
        cutoff = %cutoff,
        "starting clean"
    );

    let source = CsvFile::new(&args.input, CsvOptions { delimiter });
    let table = source
        .read_table()
        .with_context(|| format!("read input {}", source.source_name()))?;
    debug!(
        rows = table.len(),
        columns = table.columns().len(),
        "input loaded"
    );

    let options = PipelineOptions {
        cutoff,
        mode,
        date_formats: config.date_formats.clone(),
    };
    let display = NameLikeColumn::new(&config.display_keywords);
    let processed = process_with_policy(table, &template.text, &options, &display)
        .with_context(|| format!("process {}", args.input.display()))?;
    let counts = processed.report;
    debug!(
        read = counts.read,
        invalid_date = counts.invalid_date,
        before_cutoff = counts.before_cutoff,
        invalid_phone = counts.invalid_phone,
        written = counts.written,
        "pipeline finished"
    );
    if counts.written == 0 {
        warn!("no records left after filtering");
    }

    if let Some(path) = &output {
        let workbook = WorkbookOptions {
            sheet_name: config.output.sheet_name.clone(),
            link_column: LINK_COLUMN.to_string(),
            link_label: config.output.link_label.clone(),
            link_column_width: config.output.link_column_width,
            date_column: Some(DATE_COLUMN.to_string()),
        };
        export_xlsx(&processed.table, path, &workbook)
            .with_context(|| format!("write workbook {}", path.display()))?;
        debug!(path = %path.display(), "workbook written");
    }

    if ctx.json {
        let report = CleanReport {
            input: args.input.display().to_string(),
            output: output.as_ref().map(|path| path.display().to_string()),
            template: template.name.to_string(),
            device_mode: mode,
            cutoff: cutoff.format("%Y-%m-%d").to_string(),
            counts,
        };
        return print_json(&report);
    }

    match &output {
        Some(path) => println!(
            "Wrote {} records to {}",
            counts.written,
            path.display()
        ),
        None => println!("Dry run: {} records would be written", counts.written),
    }
    println!(
        "Read {}, dropped {} with invalid dates, {} before {}, {} with invalid phones",
        counts.read,
        counts.invalid_date,
        counts.before_cutoff,
        cutoff.format("%Y-%m-%d"),
        counts.invalid_phone
    );
    Ok(())
}
