use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "caseview",
    version,
    about = "search, sort and page registry case and gazette records",
    long_about = "caseview loads court-case or gazette-notice records for a registry entity and prints one filtered, sorted page.\n\nExamples:\n  caseview -f cases.json -s acme\n  caseview -e bank:42 -b https://registry.example.com/api -S title -O asc -p 2\n  caseview -k gazette -u https://registry.example.com/api/persons/7/gazettes/ -o notices.html\n\nTip: Use --config to persist the API base and query defaults."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'f',
        long = "fl",
        visible_alias = "file",
        value_name = "FILE",
        action = ArgAction::Append,
        help_heading = "Input",
        help = "Load records from a JSON file (repeatable)."
    )]
    pub file: Vec<String>,

    #[arg(
        short = 'u',
        long = "u",
        visible_alias = "url",
        value_name = "URL",
        action = ArgAction::Append,
        help_heading = "Input",
        help = "Fetch records from a URL (repeatable)."
    )]
    pub url: Vec<String>,

    #[arg(
        short = 'e',
        long = "ent",
        visible_alias = "entity",
        value_name = "KIND:ID",
        action = ArgAction::Append,
        help_heading = "Input",
        help = "Fetch records for a registry entity (bank, company, insurance, person), e.g. bank:42 (repeatable)."
    )]
    pub entity: Vec<String>,

    #[arg(
        short = 'b',
        long = "api",
        visible_alias = "api-base",
        value_name = "URL",
        help_heading = "Input",
        help = "Registry API base URL used by --entity."
    )]
    pub api_base: Option<String>,

    #[arg(
        long = "tpl",
        visible_alias = "endpoint-template",
        value_name = "TEMPLATE",
        help_heading = "Input",
        help = "Entity endpoint template with {base}, {entity}, {id} and {records} placeholders."
    )]
    pub endpoint_template: Option<String>,

    #[arg(
        short = 'k',
        long = "knd",
        visible_alias = "kind",
        value_name = "KIND",
        help_heading = "Input",
        help = "Record kind: case or gazette."
    )]
    pub kind: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.caseview/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 's',
        long = "srch",
        visible_alias = "search",
        value_name = "TERM",
        help_heading = "Query",
        help = "Case-insensitive search across title, reference, court/type and category."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'S',
        long = "srt",
        visible_alias = "sort",
        value_name = "KEY",
        help_heading = "Query",
        help = "Sort key (cases: date, title, suit_number, court, area_of_law; gazettes: date, title, reference, type, category)."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'O',
        long = "ord",
        visible_alias = "order",
        value_name = "ORDER",
        help_heading = "Query",
        help = "Sort direction: asc or desc."
    )]
    pub order: Option<String>,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Query",
        help = "Page to show (1-based, clamped to the last page)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'l',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Query",
        help = "Records per page."
    )]
    pub page_size: Option<usize>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered page to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, xml, html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "sts",
        visible_alias = "stats",
        help_heading = "Output",
        help = "Include counts by court/type, outcome and date span of the matched records."
    )]
    pub stats: bool,
}
