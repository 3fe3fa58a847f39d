// Use jemalloc for better memory allocation performance on Unix-like systems
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

// Use mimalloc on Windows for better performance
#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use core::error::Error;
use std::path::{Path, PathBuf};

use docreflow_lib::config as docreflow_config;
use docreflow_lib::document::{DocumentError, parse_file, parse_text};
use docreflow_lib::exit_codes::exit;
use docreflow_lib::{
    FormatEngine, FormatMetadata, FormatOptions, FormatOverrides, FormatRulesOverrides, LanguageHint,
    RuleBasedFormatter, analyze_text_format, detect_language,
};

use docreflow_config::{Config, ConfigSource, SourcedConfig, normalize_key};
use file_processor::{Source, collect_sources, discovery_dir, print_header, process_sources, read_source, report_error};

mod file_processor;

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"], help = "Control colored output: auto, always, never")]
    color: String,

    /// Path to configuration file
    #[arg(long, global = true, help = "Path to configuration file")]
    config: Option<PathBuf>,

    /// Ignore all configuration files and use built-in defaults
    #[arg(
        long,
        global = true,
        visible_alias = "no-config",
        help = "Ignore all configuration files and use built-in defaults"
    )]
    isolated: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print errors, but nothing else
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize and reflow documents
    Format(FormatArgs),
    /// Run the rule-based quick formatter
    Quick(QuickArgs),
    /// Print statistics about formatted documents
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Output format
        #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// Parse documents and print the result as JSON
    Parse {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the detected language of each input
    Detect {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Initialize a new configuration file
    Init,
    /// Show configuration or query a specific key
    Config {
        #[command(subcommand)]
        subcmd: Option<ConfigSubcommand>,
        /// Show only the default configuration values
        #[arg(long, help = "Show only the default configuration values")]
        defaults: bool,
    },
    /// Print the JSON schema for docreflow.toml
    Schema,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommand {
    /// Query a specific config key (e.g. format.line-width or quick-format.trim-lines)
    Get { key: String },
    /// Show the paths of the configuration files that were loaded
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Files to read (use '-' for stdin)
    #[arg(required = false)]
    paths: Vec<PathBuf>,

    /// Read from stdin instead of files
    #[arg(long, help = "Read from stdin instead of files")]
    stdin: bool,
}

#[derive(Args, Debug)]
struct FormatArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Write the result back to each file instead of printing it
    #[arg(short, long)]
    in_place: bool,

    /// Maximum characters per line
    #[arg(long, short = 'w')]
    line_width: Option<usize>,

    /// Language used for line breaking: auto, vi or en
    #[arg(long, short = 'l')]
    language: Option<LanguageHint>,

    /// Treat the whole document as one paragraph
    #[arg(long)]
    no_preserve_paragraphs: bool,

    /// Keep repeated spaces and tabs
    #[arg(long)]
    no_remove_extra_spaces: bool,

    /// Keep line endings and blank-line runs as they are
    #[arg(long)]
    no_normalize_newlines: bool,

    /// Keep curly quotes
    #[arg(long)]
    no_smart_quotes: bool,

    /// Skip Unicode NFC composition
    #[arg(long)]
    no_normalize_unicode: bool,

    /// Do not indent wrapped lines
    #[arg(long)]
    no_preserve_indentation: bool,
}

impl FormatArgs {
    fn overrides(&self) -> FormatOverrides {
        let disabled = |flag: bool| flag.then_some(false);
        FormatOverrides {
            line_width: self.line_width,
            preserve_paragraphs: disabled(self.no_preserve_paragraphs),
            remove_extra_spaces: disabled(self.no_remove_extra_spaces),
            normalize_newlines: disabled(self.no_normalize_newlines),
            smart_quotes: disabled(self.no_smart_quotes),
            normalize_unicode: disabled(self.no_normalize_unicode),
            preserve_indentation: disabled(self.no_preserve_indentation),
            language_hint: self.language,
        }
    }
}

#[derive(Args, Debug)]
struct QuickArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Write the result back to each file instead of printing it
    #[arg(short, long)]
    in_place: bool,

    /// Enable every rule
    #[arg(short, long)]
    all: bool,

    /// Collapse every whitespace run into one space
    #[arg(long)]
    remove_extra_spaces: bool,

    /// Use LF line endings and collapse blank-line runs
    #[arg(long)]
    normalize_newlines: bool,

    /// Convert straight quotes to curly quotes
    #[arg(long)]
    smart_quotes: bool,

    /// Capitalize the first letter of each sentence
    #[arg(long)]
    capitalize_first_letter: bool,

    /// Fix spacing around punctuation
    #[arg(long)]
    fix_punctuation: bool,

    /// Remove blank lines
    #[arg(long)]
    remove_empty_lines: bool,

    /// Trim whitespace at both ends of each line
    #[arg(long)]
    trim_lines: bool,

    /// Wrap lines longer than this (0 disables wrapping)
    #[arg(long, short = 'w')]
    line_width: Option<usize>,
}

impl QuickArgs {
    fn overrides(&self) -> FormatRulesOverrides {
        let enabled = |flag: bool| (self.all || flag).then_some(true);
        FormatRulesOverrides {
            remove_extra_spaces: enabled(self.remove_extra_spaces),
            normalize_newlines: enabled(self.normalize_newlines),
            smart_quotes: enabled(self.smart_quotes),
            capitalize_first_letter: enabled(self.capitalize_first_letter),
            fix_punctuation: enabled(self.fix_punctuation),
            remove_empty_lines: enabled(self.remove_empty_lines),
            trim_lines: enabled(self.trim_lines),
            line_width: self.line_width,
        }
    }
}

/// Load configuration with standard CLI error handling
fn load_config_with_cli_error_handling(
    cli: &Cli,
    cli_overrides: Option<&Config>,
    discovery_dir: Option<&Path>,
) -> SourcedConfig {
    match SourcedConfig::load_with_discovery(cli.config.as_deref(), cli_overrides, cli.isolated, discovery_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "Config error".red().bold(), e);
            exit::tool_error();
        }
    }
}

/// Resolved format options, or a tool error when they cannot format anything
fn format_options_or_exit(sourced: &SourcedConfig) -> FormatOptions {
    let options = sourced.config.format_options();
    if let Err(e) = options.validate() {
        eprintln!("{}: {}", "Config error".red().bold(), e);
        exit::tool_error();
    }
    options
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env().filter_level(level).init();
}

/// Print a JSON value or exit with a tool error
fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("{}: Failed to serialize output: {}", "Error".red().bold(), e);
        exit::tool_error();
    });
    println!("{json}");
}

/// Exit with the processing-failure code if any result failed
fn finish(failed: usize, total: usize, quiet: bool) {
    if failed > 0 {
        if !quiet && total > 1 {
            eprintln!("{} of {total} input(s) failed", failed.to_string().red().bold());
        }
        exit::processing_failed();
    }
}

/// Print or write back the transformed text of every input
fn emit_results(
    sources: &[Source],
    results: Vec<Result<(String, String), DocumentError>>,
    in_place: bool,
    quiet: bool,
) {
    let mut failed = 0;
    let mut written = 0;

    for (source, result) in sources.iter().zip(results) {
        let outcome = result.and_then(|(original, formatted)| match source.path().filter(|_| in_place) {
            Some(path) => file_processor::write_in_place(path, &original, &formatted).map(|changed| {
                written += usize::from(changed);
            }),
            None => {
                print_header(source, sources.len(), quiet);
                println!("{formatted}");
                Ok(())
            }
        });
        if let Err(e) = outcome {
            report_error(source, &e);
            failed += 1;
        }
    }

    if in_place && !quiet {
        println!("{} {written} file(s)", "Formatted".green().bold());
    }
    finish(failed, sources.len(), quiet);
}

fn check_in_place(in_place: bool, sources: &[Source]) {
    if in_place && sources.contains(&Source::Stdin) {
        eprintln!("{}: --in-place cannot be used with stdin", "Error".red().bold());
        exit::tool_error();
    }
}

fn run_format(cli: &Cli, args: &FormatArgs) {
    let sources = collect_sources(&args.input.paths, args.input.stdin);
    check_in_place(args.in_place, &sources);

    let cli_config = Config {
        format: args.overrides(),
        ..Default::default()
    };
    let sourced = load_config_with_cli_error_handling(cli, Some(&cli_config), discovery_dir(&sources));
    let engine = FormatEngine::new(format_options_or_exit(&sourced));
    log::debug!("Formatting with {:?}", engine.options());

    let results = process_sources(&sources, |source| {
        let original = read_source(source)?;
        let formatted = engine.format(&original)?;
        Ok((original, formatted))
    });
    emit_results(&sources, results, args.in_place, cli.quiet);
}

fn run_quick(cli: &Cli, args: &QuickArgs) {
    let sources = collect_sources(&args.input.paths, args.input.stdin);
    check_in_place(args.in_place, &sources);

    let cli_config = Config {
        quick_format: args.overrides(),
        ..Default::default()
    };
    let sourced = load_config_with_cli_error_handling(cli, Some(&cli_config), discovery_dir(&sources));
    let formatter = RuleBasedFormatter::new(&sourced.config.format_rules());
    log::debug!("Quick-format rules: {:?}", formatter.rule_names());

    let results = process_sources(&sources, |source| {
        let original = read_source(source)?;
        let formatted = formatter.format(&original);
        Ok((original, formatted))
    });
    emit_results(&sources, results, args.in_place, cli.quiet);
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReport {
    source: String,
    #[serde(flatten)]
    metadata: FormatMetadata,
}

fn print_metadata_text(name: &str, metadata: &FormatMetadata) {
    println!("{}", name.bold());
    println!(
        "  Language:                 {} ({})",
        metadata.language_detected.name(),
        metadata.language_detected
    );
    println!("  Paragraphs:               {}", metadata.paragraph_count);
    println!("  Sentences:                {}", metadata.sentence_count);
    println!("  Words per sentence:       {:.2}", metadata.average_words_per_sentence);
    println!("  Characters per word:      {:.2}", metadata.average_chars_per_word);
}

fn run_analyze(cli: &Cli, input: &InputArgs, output: OutputFormat) {
    let sources = collect_sources(&input.paths, input.stdin);
    let sourced = load_config_with_cli_error_handling(cli, None, discovery_dir(&sources));
    let engine = FormatEngine::new(format_options_or_exit(&sourced));

    let results = process_sources(&sources, |source| {
        let formatted = engine.format(&read_source(source)?)?;
        Ok(analyze_text_format(&formatted))
    });

    let mut failed = 0;
    let mut reports = Vec::new();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(metadata) => reports.push(AnalyzeReport {
                source: source.display_name(),
                metadata,
            }),
            Err(e) => {
                report_error(source, &e);
                failed += 1;
            }
        }
    }

    match output {
        OutputFormat::Json => print_json(&reports),
        OutputFormat::Text => {
            for report in &reports {
                print_metadata_text(&report.source, &report.metadata);
            }
        }
    }
    finish(failed, sources.len(), cli.quiet);
}

fn run_parse(cli: &Cli, input: &InputArgs) {
    let sources = collect_sources(&input.paths, input.stdin);
    let sourced = load_config_with_cli_error_handling(cli, None, discovery_dir(&sources));
    let options = format_options_or_exit(&sourced);

    let results = process_sources(&sources, |source| match source {
        Source::File(path) => parse_file(path, &options),
        Source::Stdin => Ok(parse_text("<stdin>", &read_source(source)?, &options)?),
    });

    let mut failed = 0;
    let mut documents = Vec::new();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(document) => documents.push(document),
            Err(e) => {
                report_error(source, &e);
                failed += 1;
            }
        }
    }

    print_json(&documents);
    finish(failed, sources.len(), cli.quiet);
}

fn run_detect(cli: &Cli, input: &InputArgs) {
    let sources = collect_sources(&input.paths, input.stdin);
    let results = process_sources(&sources, |source| Ok(detect_language(&read_source(source)?)));

    let mut failed = 0;
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(language) if sources.len() > 1 => println!("{}: {language}", source.display_name()),
            Ok(language) => println!("{language}"),
            Err(e) => {
                report_error(source, &e);
                failed += 1;
            }
        }
    }
    finish(failed, sources.len(), cli.quiet);
}

fn run_init(cli: &Cli) {
    let path = Path::new(".docreflow.toml");
    match docreflow_config::create_default_config(path) {
        Ok(()) => {
            if !cli.quiet {
                println!("Created default configuration file: {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("{}: Failed to create config file: {}", "Error".red().bold(), e);
            exit::tool_error();
        }
    }
}

/// Effective values of one config section as `(key, value)` pairs
fn section_entries<T: serde::Serialize>(value: &T) -> Vec<(String, toml::Value)> {
    match toml::Value::try_from(value) {
        Ok(toml::Value::Table(table)) => table.into_iter().collect(),
        _ => Vec::new(),
    }
}

fn print_section<T: serde::Serialize>(name: &str, value: &T, source_of: impl Fn(&str) -> ConfigSource) {
    println!("[{name}]");
    for (key, value) in section_entries(value) {
        let source = source_of(&key);
        let annotation = format!("[from {source}]");
        let annotation = if source == ConfigSource::Default {
            annotation.dimmed()
        } else {
            annotation.cyan()
        };
        let value = value.to_string();
        println!("  {key} = {value:<10} {annotation}");
    }
    println!();
}

fn run_config(cli: &Cli, subcmd: Option<&ConfigSubcommand>, defaults: bool) {
    if defaults {
        print!("{}", docreflow_config::default_config_content());
        return;
    }

    let sourced = load_config_with_cli_error_handling(cli, None, None);
    let options = sourced.config.format_options();
    let rules = sourced.config.format_rules();

    match subcmd {
        None => {
            print_section("format", &options, |key| sourced.format_source(key));
            print_section("quick-format", &rules, |key| sourced.quick_format_source(key));
        }
        Some(ConfigSubcommand::File) => {
            let files = sourced.loaded_files();
            if files.is_empty() {
                println!("No configuration file loaded; using defaults");
            }
            for file in files {
                println!("{}", file.display());
            }
        }
        Some(ConfigSubcommand::Get { key }) => {
            let Some((section, field)) = key.split_once('.') else {
                eprintln!(
                    "{}: Key must be of the form section.key (e.g. format.line-width)",
                    "Error".red().bold()
                );
                exit::tool_error();
            };
            let field = normalize_key(field);
            let entry = match normalize_key(section).as_str() {
                "format" => section_entries(&options)
                    .into_iter()
                    .find(|(k, _)| *k == field)
                    .map(|(_, v)| (v, sourced.format_source(&field))),
                "quick-format" => section_entries(&rules)
                    .into_iter()
                    .find(|(k, _)| *k == field)
                    .map(|(_, v)| (v, sourced.quick_format_source(&field))),
                _ => None,
            };
            match entry {
                Some((value, source)) => println!("{key} = {value} [from {source}]"),
                None => {
                    eprintln!("{}: Unknown config key: {key}", "Error".red().bold());
                    exit::tool_error();
                }
            }
        }
    }
}

fn run_schema() {
    print_json(&docreflow_config::config_schema());
}

fn main() -> Result<(), Box<dyn Error>> {
    // Reset SIGPIPE so piping output to `head` and similar tools exits quietly
    #[cfg(unix)]
    {
        // SAFETY: restoring the default SIGPIPE disposition before any output is written
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    let cli = Cli::parse();

    // Set color override globally based on --color flag
    match cli.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::unset_override(),
    }

    init_logging(&cli);

    match &cli.command {
        Commands::Format(args) => run_format(&cli, args),
        Commands::Quick(args) => run_quick(&cli, args),
        Commands::Analyze { input, output } => run_analyze(&cli, input, *output),
        Commands::Parse { input } => run_parse(&cli, input),
        Commands::Detect { input } => run_detect(&cli, input),
        Commands::Init => run_init(&cli),
        Commands::Config { subcmd, defaults } => run_config(&cli, subcmd.as_ref(), *defaults),
        Commands::Schema => run_schema(),
    }

    Ok(())
}
