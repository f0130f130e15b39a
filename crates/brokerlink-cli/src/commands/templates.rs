use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Print each template's message text
    #[arg(long)]
    pub show: bool,
}

#[derive(Debug, Serialize)]
struct TemplateEntry<'a> {
    name: &'a str,
    default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

pub fn list_templates(ctx: &Context<'_>, args: TemplatesArgs) -> Result<()> {
    let default = &ctx.config.default_template;
    let entries: Vec<TemplateEntry<'_>> = ctx
        .config
        .templates
        .iter()
        .map(|(name, text)| TemplateEntry {
            name: name.as_str(),
            default: name == default,
            text: args.show.then_some(text),
        })
        .collect();

    if ctx.json {
        return print_json(&entries);
    }

    for entry in entries {
        let marker = if entry.default { " (default)" } else { "" };
        println!("{}{}", entry.name, marker);
        if let Some(text) = entry.text {
            for line in text.lines() {
                println!("    {line}");
            }
        }
    }
    Ok(())
}
