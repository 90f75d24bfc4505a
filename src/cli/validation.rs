use crate::cli::args::CliArgs;
use crate::output::OutputFormat;
use crate::record::RecordKind;
use crate::source::EntityRef;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid page, expected positive integer".to_string());
        }
    }
    if let Some(page_size) = args.page_size {
        if page_size == 0 {
            return Err("invalid page-size, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.kind.as_deref() {
        raw.parse::<RecordKind>()
            .map_err(|e| format!("invalid --kind '{raw}': {e}"))?;
    }
    for raw in args.entity.iter() {
        raw.parse::<EntityRef>()
            .map_err(|e| format!("invalid --entity '{raw}': {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json, xml or html"
            ));
        }
    }
    for raw in args.url.iter() {
        if reqwest::Url::parse(raw.trim()).is_err() {
            return Err(format!("invalid --url '{raw}'"));
        }
    }
    Ok(())
}
