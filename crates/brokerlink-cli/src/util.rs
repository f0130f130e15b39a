use anyhow::Result;
use brokerlink_core::time::parse_cutoff_date;
use chrono::{Local, NaiveDate};

use crate::error::invalid_input;

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_since(raw: &str) -> Result<NaiveDate> {
    parse_cutoff_date(raw)
        .ok_or_else(|| invalid_input(format!("invalid date {raw:?}: expected YYYY-MM-DD")))
}
