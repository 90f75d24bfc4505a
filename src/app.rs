use std::io::Write;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat, Report};
use crate::query::{QuerySpec, DEFAULT_PAGE_SIZE};
use crate::record::{CaseRecord, GazetteRecord, Record, RecordKind};
use crate::source::{self, EntityRef, RecordSource, SourceOptions, DEFAULT_ENDPOINT_TEMPLATE};
use crate::view;

fn format_kv_line(label: &str, value: &str) {
    eprintln!("{} {:<10}: {}", "::".bold().blue(), label, value);
}

fn format_opt_value<'a>(v: &'a str, default: &'a str) -> &'a str {
    if v.trim().is_empty() {
        default
    } else {
        v
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    kind: RecordKind,
    sources: Vec<RecordSource>,
    source_options: SourceOptions,
    search: String,
    sort: String,
    order: String,
    page: usize,
    page_size: usize,
    output: Option<String>,
    output_format: OutputFormat,
    show_stats: bool,
    no_color: bool,
    verbose: u8,
}

impl RunConfig {
    fn log(&self, level: u8, message: &str) {
        if self.verbose >= level {
            eprintln!("{} {}", "::".bold().blue(), message);
        }
    }
}

fn check_query<R: Record>(
    search: &str,
    sort: &str,
    order: &str,
    page: usize,
    page_size: usize,
) -> Result<(), String> {
    QuerySpec::<R>::parse(search, sort, order, page, page_size)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let kind_raw = args.kind.or(cfg.record_kind).unwrap_or_default();
    let kind = if kind_raw.trim().is_empty() {
        RecordKind::default()
    } else {
        kind_raw
            .parse::<RecordKind>()
            .map_err(|e| format!("invalid record kind '{kind_raw}': {e}"))?
    };

    let mut sources: Vec<RecordSource> = Vec::new();
    for path in args.file.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        sources.push(RecordSource::FilePath(path.to_string()));
    }
    for url in args.url.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        sources.push(RecordSource::Url(url.to_string()));
    }
    if !args.entity.is_empty() {
        let base = args
            .api_base
            .or(cfg.api_base)
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| "--entity requires --api-base (or api_base in config)".to_string())?;
        let template = args
            .endpoint_template
            .or(cfg.endpoint_template)
            .unwrap_or_else(|| DEFAULT_ENDPOINT_TEMPLATE.to_string());
        for raw in args.entity.iter() {
            let entity = raw
                .parse::<EntityRef>()
                .map_err(|e| format!("invalid --entity '{raw}': {e}"))?;
            let url = source::endpoint_url(&base, &template, &entity, kind)
                .map_err(|e| format!("invalid endpoint for '{raw}': {e}"))?;
            sources.push(RecordSource::Url(url));
        }
    }
    if sources.is_empty() {
        return Err(
            "at least one input must be specified (--file, --url, or --entity)".to_string(),
        );
    }

    let search = args.search.unwrap_or_default();
    let sort = args.sort.or(cfg.sort).unwrap_or_else(|| "date".to_string());
    let order = args.order.or(cfg.order).unwrap_or_else(|| "desc".to_string());
    let page = args.page.unwrap_or(1);
    let page_size = args
        .page_size
        .or(cfg.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    match kind {
        RecordKind::Case => check_query::<CaseRecord>(&search, &sort, &order, page, page_size)?,
        RecordKind::Gazette => {
            check_query::<GazetteRecord>(&search, &sort, &order, page, page_size)?
        }
    }

    let output = args
        .output
        .or(cfg.output)
        .filter(|o| !o.trim().is_empty())
        .map(|o| config::expand_tilde_string(&o));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}'"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    Ok(RunConfig {
        kind,
        sources,
        source_options: SourceOptions {
            timeout_seconds,
            proxy,
        },
        search,
        sort,
        order,
        page,
        page_size,
        output,
        output_format,
        show_stats: args.stats || cfg.show_stats.unwrap_or(false),
        no_color,
        verbose: args.verbose,
    })
}

fn print_settings(run: &RunConfig) {
    format_kv_line("Kind", run.kind.as_str());
    for s in run.sources.iter() {
        format_kv_line("Source", &s.to_string());
    }
    format_kv_line("Search", format_opt_value(&run.search, "(none)"));
    format_kv_line("Sort", &format!("{} {}", run.sort, run.order));
    format_kv_line("Page", &format!("{} (size {})", run.page, run.page_size));
    format_kv_line("Timeout", &format!("{}s", run.source_options.timeout_seconds));
    if let Some(proxy) = run.source_options.proxy.as_deref() {
        format_kv_line("Proxy", proxy);
    }
    format_kv_line("Output", run.output.as_deref().unwrap_or("stdout"));
}

fn loading_spinner(count: usize) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("loading records from {count} source(s)"));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn run_view<R>(run: &RunConfig) -> Result<(), String>
where
    R: Record + Serialize + DeserializeOwned,
{
    let pb = loading_spinner(run.sources.len());
    let loaded = source::load_all::<R>(&run.sources, &run.source_options).await;
    pb.finish_and_clear();
    let records = loaded.map_err(|e| e.to_string())?;
    run.log(1, &format!("loaded {} {} records", records.len(), R::KIND));

    let query = QuerySpec::<R>::parse(&run.search, &run.sort, &run.order, run.page, run.page_size)
        .map_err(|e| e.to_string())?;
    let result = view::compute_view(&records, &query);
    if result.page != query.page() {
        run.log(
            1,
            &format!(
                "page {} is out of range, showing page {}",
                query.page(),
                result.page
            ),
        );
    }
    run.log(
        2,
        &format!(
            "{} of {} records matched",
            result.total_matched,
            records.len()
        ),
    );

    let stats = if run.show_stats {
        let matched = view::filter(&records, query.search_term());
        Some(view::summarize(&matched))
    } else {
        None
    };

    let rendered = output::render(
        run.output_format,
        &Report::new(&query, &result, stats.as_ref()),
    );

    match run.output.as_deref() {
        Some(path) => {
            tokio::fs::write(path, &rendered)
                .await
                .map_err(|e| format!("failed to write output file '{path}': {e}"))?;
            run.log(1, &format!("wrote {} bytes to {path}", rendered.len()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&rendered)
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("failed to write output: {e}"))?;
        }
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    // rendered files never carry escape codes
    if run.no_color || run.output.is_some() {
        colored::control::set_override(false);
    }
    if run.verbose > 0 {
        print_settings(&run);
    }

    match run.kind {
        RecordKind::Case => run_view::<CaseRecord>(&run).await,
        RecordKind::Gazette => run_view::<GazetteRecord>(&run).await,
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let explicit_config = args.config.clone().map(|p| config::expand_tilde(&p));
    let config_path = explicit_config.clone().or_else(config::default_config_path);

    if args.init_config {
        let path = config_path.ok_or_else(|| "unable to locate home directory".to_string())?;
        if config::ensure_default_config_file(&path)? {
            eprintln!("{} wrote {}", "::".bold().green(), path.display());
        } else {
            eprintln!("{} {} already exists", "::".bold().yellow(), path.display());
        }
        return Ok(());
    }

    let cfg = match (explicit_config.as_ref(), config_path.as_ref()) {
        (Some(path), _) => config::load_config(path, false)?,
        (None, Some(path)) => config::load_config(path, true)?,
        (None, None) => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
