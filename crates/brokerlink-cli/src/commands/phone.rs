use crate::commands::print_json;
use crate::error::invalid_input;
use anyhow::Result;
use brokerlink_core::normalize_phone;
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct PhoneArgs {
    /// Raw phone numbers as they appear in an export
    #[arg(required = true)]
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PhoneResult<'a> {
    input: &'a str,
    phone: Option<String>,
}

pub fn normalize(json: bool, args: PhoneArgs) -> Result<()> {
    let results: Vec<PhoneResult<'_>> = args
        .values
        .iter()
        .map(|value| PhoneResult {
            input: value,
            phone: normalize_phone(value).map(|phone| phone.into_string()),
        })
        .collect();
    let invalid = results.iter().filter(|result| result.phone.is_none()).count();

    if json {
        print_json(&results)?;
    } else {
        for result in &results {
            match &result.phone {
                Some(phone) => println!("{}\t{}", result.input, phone),
                None => println!("{}\tinvalid", result.input),
            }
        }
    }

    if invalid > 0 {
        return Err(invalid_input(format!(
            "{invalid} of {} phone numbers could not be normalized",
            results.len()
        )));
    }
    Ok(())
}
