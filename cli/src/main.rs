mod pager;
mod render;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use dissector_core::autosave::format_time_since;
use dissector_core::catalog::{Catalog, TagKind};
use dissector_core::clock::{Clock, SystemClock};
use dissector_core::config::{Config, config_file_path};
use dissector_core::example_document::{EXAMPLE_DOCUMENT_TITLE, example_document};
use dissector_core::richtext::{AnnotatedEditor, AnnotationFilter, BlockKind, StyleMark};
use dissector_core::session::{EditorSession, SessionSettings};
use dissector_core::store::{DocumentStore, FileStore};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DISSECTOR_LOG";

#[derive(Parser, Debug)]
#[command(name = "dissector")]
#[command(about = "Mark logical fallacies and rhetorical techniques in debate transcripts", long_about = None)]
struct Args {
    /// Directory holding the document store (default: platform data dir)
    #[arg(short = 'd', long = "directory", value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// Config file (default: platform config dir)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// The document to work on; defaults to the last one opened
#[derive(ClapArgs, Debug)]
struct DocArg {
    #[arg(short = 'D', long = "doc", value_name = "ID")]
    doc: Option<String>,
}

/// Absolute character offsets, blocks separated by one character
#[derive(ClapArgs, Debug)]
struct RangeArgs {
    #[arg(long)]
    start: usize,
    #[arg(long)]
    end: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum KindArg {
    Fallacy,
    Rhetoric,
}

impl From<KindArg> for TagKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Fallacy => TagKind::Fallacy,
            KindArg::Rhetoric => TagKind::Rhetoric,
        }
    }
}

/// Taxonomies walked by `next`/`prev`
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum NavKindArg {
    #[default]
    Fallacy,
    Rhetoric,
    All,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl From<StyleArg> for StyleMark {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Bold => StyleMark::Bold,
            StyleArg::Italic => StyleMark::Italic,
            StyleArg::Underline => StyleMark::Underline,
            StyleArg::Strikethrough => StyleMark::Strikethrough,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BlockArg {
    Paragraph,
    HeadingOne,
    HeadingTwo,
    BlockQuote,
}

impl From<BlockArg> for BlockKind {
    fn from(block: BlockArg) -> Self {
        match block {
            BlockArg::Paragraph => BlockKind::Paragraph,
            BlockArg::HeadingOne => BlockKind::HeadingOne,
            BlockArg::HeadingTwo => BlockKind::HeadingTwo,
            BlockArg::BlockQuote => BlockKind::BlockQuote,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a document
    New {
        /// Title (default: "Untitled Debate")
        title: Option<String>,
        /// Start from the built-in example debate
        #[arg(long)]
        example: bool,
    },
    /// List documents, most recently updated first
    Ls,
    /// Find documents by title or opening text
    Search { query: String },
    /// Render a document with its annotations highlighted
    Show {
        #[command(flatten)]
        doc: DocArg,
    },
    /// Delete a document (its versions are kept)
    Rm { id: String },
    /// Change a document's title
    Rename {
        #[command(flatten)]
        doc: DocArg,
        title: String,
    },
    /// Insert text (newlines split paragraphs)
    Insert {
        #[command(flatten)]
        doc: DocArg,
        /// Absolute offset (default: end of document)
        #[arg(long)]
        at: Option<usize>,
        text: String,
    },
    /// Apply a fallacy or rhetoric tag to a range
    Tag {
        #[command(flatten)]
        doc: DocArg,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, value_enum, default_value = "fallacy")]
        kind: KindArg,
        tag: String,
    },
    /// Remove a tag from a range
    Untag {
        #[command(flatten)]
        doc: DocArg,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, value_enum, default_value = "fallacy")]
        kind: KindArg,
        tag: String,
    },
    /// Remove every annotation from a range
    Clear {
        #[command(flatten)]
        doc: DocArg,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Toggle a text style over a range
    Style {
        #[command(flatten)]
        doc: DocArg,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(value_enum)]
        style: StyleArg,
    },
    /// Toggle the block type of the blocks touched by a range
    Block {
        #[command(flatten)]
        doc: DocArg,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(value_enum)]
        block: BlockArg,
    },
    /// Word, character and tag counts
    Stats {
        #[command(flatten)]
        doc: DocArg,
    },
    /// List annotations with their ranges
    Annotations {
        #[command(flatten)]
        doc: DocArg,
        #[arg(long)]
        json: bool,
    },
    /// Find the next annotated run after an offset
    Next {
        #[command(flatten)]
        doc: DocArg,
        #[arg(long)]
        from: Option<usize>,
        #[arg(long)]
        tag: Option<String>,
        /// Taxonomy to navigate ("all" for both)
        #[arg(long, value_enum, default_value_t)]
        kind: NavKindArg,
    },
    /// Find the previous annotated run before an offset
    Prev {
        #[command(flatten)]
        doc: DocArg,
        #[arg(long)]
        from: Option<usize>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, value_enum, default_value_t)]
        kind: NavKindArg,
    },
    /// List the saved versions of a document
    Versions {
        #[command(flatten)]
        doc: DocArg,
    },
    /// Save the current state as a version
    Snapshot {
        #[command(flatten)]
        doc: DocArg,
        #[arg(long)]
        label: Option<String>,
    },
    /// Bring back a saved version
    Restore {
        #[command(flatten)]
        doc: DocArg,
        version: String,
    },
    /// Label a saved version
    Label { version: String, label: String },
    /// List the tags that can be applied
    Catalog {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
}

struct App {
    store_dir: PathBuf,
    config: Config,
    catalog: Catalog,
}

impl App {
    fn store(&self) -> DocumentStore<FileStore> {
        DocumentStore::new(FileStore::new(&self.store_dir))
            .with_max_versions(self.config.versions.max_per_document)
    }

    fn session(&self) -> EditorSession<FileStore> {
        EditorSession::new(self.store(), SessionSettings::from(&self.config))
    }

    /// Open `doc.doc`, or resume the last document
    fn open(&self, doc: &DocArg) -> Result<EditorSession<FileStore>> {
        let mut session = self.session();
        match &doc.doc {
            Some(id) => {
                if !session.open(id)? {
                    bail!("document not found: {id}");
                }
            }
            None => {
                if !session.resume()? {
                    bail!("no document given and no previous document to resume (use --doc ID)");
                }
            }
        }
        Ok(session)
    }

    fn tag_name(&self, kind: TagKind, id: &str) -> String {
        self.catalog
            .name_of(kind, id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }
}

/// Run `edit` against the open document and save when it reports a change
fn edit_document<F>(app: &App, doc: &DocArg, edit: F) -> Result<()>
where
    F: FnOnce(&mut AnnotatedEditor) -> Result<Option<String>>,
{
    let mut session = app.open(doc)?;
    match edit(session.editor_mut())? {
        Some(message) => {
            session.note_change();
            session.save_now(false)?;
            println!("{message}");
        }
        None => println!("Nothing changed."),
    }
    Ok(())
}

fn cmd_new(app: &App, title: Option<String>, example: bool) -> Result<()> {
    let mut session = app.session();
    let (title, content) = if example {
        let now = SystemClock.now_millis();
        (
            Some(title.unwrap_or_else(|| EXAMPLE_DOCUMENT_TITLE.to_string())),
            Some(example_document(now)),
        )
    } else {
        (title, None)
    };
    let id = session.new_document(title.as_deref(), content)?;
    println!("{id}");
    Ok(())
}

fn print_summaries(summaries: &[dissector_core::model::DocumentSummary]) {
    let now = SystemClock.now_millis();
    for summary in summaries {
        println!(
            "{}  {}  ({} annotations, {})",
            summary.id,
            summary.title,
            summary.annotation_count,
            format_time_since(summary.updated_at, now)
        );
    }
}

fn cmd_ls(app: &App) -> Result<()> {
    print_summaries(&app.store().list_summaries()?);
    Ok(())
}

fn cmd_search(app: &App, query: &str) -> Result<()> {
    let results = app.store().search(query)?;
    if results.is_empty() {
        println!("No matches.");
    }
    print_summaries(&results);
    Ok(())
}

fn cmd_show(app: &App, doc: &DocArg) -> Result<()> {
    use std::io::IsTerminal;

    let session = app.open(doc)?;
    let document = session.editor().document();
    let styled = render::render_document(document, &app.catalog, false);
    let plain = render::render_document(document, &app.catalog, !std::io::stdout().is_terminal());
    pager::page_lines(session.title(), &styled, &plain).context("pager failed")
}

fn cmd_rm(app: &App, id: &str) -> Result<()> {
    if !app.store().delete_document(id)? {
        bail!("document not found: {id}");
    }
    println!("Deleted {id}");
    Ok(())
}

fn cmd_rename(app: &App, doc: &DocArg, title: &str) -> Result<()> {
    let mut session = app.open(doc)?;
    session.rename(title);
    session.save_now(false)?;
    println!("Renamed to \"{title}\"");
    Ok(())
}

fn cmd_insert(app: &App, doc: &DocArg, at: Option<usize>, text: &str) -> Result<()> {
    edit_document(app, doc, |editor| {
        let position = match at {
            Some(offset) => editor.document().position_at(offset),
            None => editor.document().end_position(),
        };
        editor.set_cursor(position);
        editor.insert_text(text)?;
        Ok(Some(format!("Inserted {} characters", text.chars().count())))
    })
}

fn cmd_tag(app: &App, doc: &DocArg, range: &RangeArgs, kind: TagKind, tag_id: &str) -> Result<()> {
    let tag = app
        .catalog
        .find(kind, tag_id)
        .ok_or_else(|| anyhow!("unknown {kind} tag: {tag_id} (see `dissector catalog`)"))?;
    edit_document(app, doc, |editor| {
        editor.select_offsets(range.start, range.end);
        Ok(editor.apply_tag(kind, tag).map(|applied| {
            format!("Tagged {}..{} as {}", applied.start, applied.end, tag.name)
        }))
    })
}

fn cmd_untag(app: &App, doc: &DocArg, range: &RangeArgs, kind: TagKind, tag_id: &str) -> Result<()> {
    edit_document(app, doc, |editor| {
        editor.select_offsets(range.start, range.end);
        Ok(editor
            .remove_tag(kind, tag_id)
            .then(|| format!("Removed {tag_id} from {}..{}", range.start, range.end)))
    })
}

fn cmd_clear(app: &App, doc: &DocArg, range: &RangeArgs) -> Result<()> {
    edit_document(app, doc, |editor| {
        editor.select_offsets(range.start, range.end);
        Ok(editor
            .clear_all_annotations()
            .then(|| format!("Cleared annotations in {}..{}", range.start, range.end)))
    })
}

fn cmd_style(app: &App, doc: &DocArg, range: &RangeArgs, style: StyleMark) -> Result<()> {
    if range.start == range.end {
        bail!("--start and --end must differ");
    }
    edit_document(app, doc, |editor| {
        editor.select_offsets(range.start, range.end);
        let changed = editor.toggle_style_mark(style);
        let state = if editor.is_style_active(style) { "on" } else { "off" };
        Ok(changed.then(|| format!("{style:?} {state} for {}..{}", range.start, range.end)))
    })
}

fn cmd_block(app: &App, doc: &DocArg, range: &RangeArgs, kind: BlockKind) -> Result<()> {
    edit_document(app, doc, |editor| {
        editor.select_offsets(range.start, range.end);
        Ok(editor.toggle_block(kind).then(|| {
            let now = if editor.is_block_active(kind) { kind } else { BlockKind::Paragraph };
            format!("Blocks set to {}", now.as_str())
        }))
    })
}

fn cmd_stats(app: &App, doc: &DocArg) -> Result<()> {
    let session = app.open(doc)?;
    let editor = session.editor();
    let document = editor.document();
    println!("Title:       {}", session.title());
    println!("Words:       {}", editor.word_count());
    println!("Characters:  {}", editor.char_count());
    println!("Annotations: {}", document.annotation_index().len());
    println!("Marks:       {}", document.total_mark_count());
    for kind in TagKind::ALL {
        let counts = document.count_by_tag(kind);
        if counts.is_empty() {
            continue;
        }
        println!();
        println!("{}:", if kind == TagKind::Fallacy { "Fallacies" } else { "Rhetoric" });
        for (id, count) in counts {
            println!("  {:<28} {count}", app.tag_name(kind, &id));
        }
    }
    Ok(())
}

fn cmd_annotations(app: &App, doc: &DocArg, json: bool) -> Result<()> {
    let session = app.open(doc)?;
    let records = session.editor().document().annotation_index();
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No annotations.");
    }
    for record in records {
        println!(
            "{:>6}..{:<6} {:<8} {:<28} \"{}\"",
            record.start,
            record.end,
            record.kind.as_str(),
            app.tag_name(record.kind, &record.tag_id),
            record.text
        );
    }
    Ok(())
}

fn navigation_filter(kind: NavKindArg, tag: Option<&str>) -> AnnotationFilter {
    match kind {
        NavKindArg::Fallacy => AnnotationFilter::fallacies(tag),
        NavKindArg::Rhetoric => AnnotationFilter::rhetoric(tag),
        NavKindArg::All => AnnotationFilter {
            kind: None,
            tag_id: tag.map(str::to_string),
        },
    }
}

fn cmd_navigate(
    app: &App,
    doc: &DocArg,
    from: Option<usize>,
    tag: Option<&str>,
    kind: NavKindArg,
    forward: bool,
) -> Result<()> {
    let filter = navigation_filter(kind, tag);
    let mut session = app.open(doc)?;
    let editor = session.editor_mut();
    if let Some(offset) = from {
        let position = editor.document().position_at(offset);
        editor.set_cursor(position);
    }
    let found = if forward {
        editor.select_next_matching(&filter)
    } else {
        editor.select_previous_matching(&filter)
    };
    let Some((start, end)) = editor.selected_range().filter(|_| found) else {
        println!("No annotations.");
        return Ok(());
    };
    let document = editor.document();
    println!(
        "{}..{} \"{}\"",
        document.absolute_offset(start),
        document.absolute_offset(end),
        editor.selected_text()
    );
    for mark in document.marks_at(start).fallacy_marks {
        println!("  fallacy  {}", app.tag_name(TagKind::Fallacy, &mark.fallacy_id));
    }
    for mark in document.marks_at(start).rhetoric_marks {
        println!("  rhetoric {}", app.tag_name(TagKind::Rhetoric, &mark.rhetoric_id));
    }
    Ok(())
}

fn cmd_versions(app: &App, doc: &DocArg) -> Result<()> {
    let session = app.open(doc)?;
    let Some(id) = session.document_id() else {
        bail!("no document open");
    };
    let versions = session.store().list_versions(id)?;
    if versions.is_empty() {
        println!("No versions.");
    }
    let now = SystemClock.now_millis();
    for version in versions {
        println!(
            "{}  {}  {}{}",
            version.id,
            version.title,
            format_time_since(version.timestamp, now),
            version.label.map(|l| format!("  [{l}]")).unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_snapshot(app: &App, doc: &DocArg, label: Option<&str>) -> Result<()> {
    let mut session = app.open(doc)?;
    let document = session
        .document()
        .cloned()
        .ok_or_else(|| anyhow!("no document open"))?;
    let version = session.store_mut().create_snapshot(&document, label)?;
    println!("{}", version.id);
    Ok(())
}

fn cmd_restore(app: &App, doc: &DocArg, version: &str) -> Result<()> {
    let mut session = app.open(doc)?;
    if !session.restore_version(version)? {
        bail!("version not found for this document: {version}");
    }
    println!("Restored {version} (previous state kept as a version)");
    Ok(())
}

fn cmd_label(app: &App, version: &str, label: &str) -> Result<()> {
    if app.store().update_version_label(version, label)?.is_none() {
        bail!("version not found: {version}");
    }
    println!("Labelled {version} \"{label}\"");
    Ok(())
}

fn cmd_catalog(app: &App, kind: Option<TagKind>) -> Result<()> {
    let kinds: Vec<TagKind> = match kind {
        Some(kind) => vec![kind],
        None => TagKind::ALL.to_vec(),
    };
    for kind in kinds {
        for (category, tags) in app.catalog.by_category(kind) {
            println!("{} ({kind})", category.display_name());
            for tag in tags {
                println!("  {:<26} {:<28} {}", tag.id, tag.name, tag.color);
            }
        }
    }
    Ok(())
}

fn print_help_with_aliases(config: &Config) {
    println!("dissector - mark fallacies and rhetoric in debate transcripts");
    println!();
    println!("Usage: dissector [-d DIRECTORY] [-c CONFIG] COMMAND");
    println!();
    println!("Commands:");
    println!("  new [title] [--example]     - create a document");
    println!("  ls | search <query>         - list or find documents");
    println!("  show                        - render with highlights");
    println!("  rm <id> | rename <title>    - delete or retitle");
    println!("  insert [--at N] <text>      - add text");
    println!("  tag | untag <tag>           - apply or remove a tag over --start/--end");
    println!("  clear | style | block       - edit a range");
    println!("  stats | annotations         - summaries");
    println!("  next | prev                 - navigate annotations");
    println!("  versions | snapshot | restore <version> | label <version> <text>");
    println!("  catalog                     - list available tags");
    println!();
    println!("Document commands take --doc ID; without it the last document is used.");
    println!("Set {LOG_ENV}=debug for diagnostics.");

    if !config.aliases.is_empty() {
        println!();
        println!("Aliases:");
        for (alias, command) in &config.aliases {
            println!("  {} => {}", alias, command);
        }
    }
}

/// First argument that is not an option or an option's value
fn first_positional(raw_args: &[String]) -> Option<&str> {
    let mut skip_next = false;
    for arg in raw_args.iter().skip(1) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if matches!(arg.as_str(), "-d" | "--directory" | "-c" | "--config") {
            skip_next = true;
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return Some(arg.as_str());
    }
    None
}

fn run_alias(alias: &str, command: &str, dir: &Path) -> Result<i32> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to run alias '{alias}'"))?;
    Ok(status.code().unwrap_or(0))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Config {
    match path.map(Path::to_path_buf).or_else(config_file_path) {
        Some(path) => Config::load_or_default(&path),
        None => Config::default(),
    }
}

fn raw_config_path(raw_args: &[String]) -> Option<PathBuf> {
    let position = raw_args.iter().position(|a| a == "-c" || a == "--config")?;
    raw_args.get(position + 1).map(PathBuf::from)
}

fn run(raw_args: &[String]) -> Result<i32> {
    let config = load_config(raw_config_path(raw_args).as_deref());

    if let Some(first) = raw_args.get(1)
        && matches!(first.as_str(), "help" | "--help" | "-h")
    {
        print_help_with_aliases(&config);
        return Ok(0);
    }

    if let Some(name) = first_positional(raw_args)
        && let Some(command) = config.aliases.get(name)
    {
        let dir = config
            .data_dir()
            .ok_or_else(|| anyhow!("could not determine a data directory"))?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create store directory '{}'", dir.display()))?;
        return run_alias(name, command, &dir);
    }

    let args = Args::parse_from(raw_args);
    let store_dir = args
        .directory
        .clone()
        .or_else(|| config.data_dir())
        .ok_or_else(|| anyhow!("could not determine a data directory; pass -d"))?;
    debug!(dir = %store_dir.display(), config = ?args.config, "using document store");

    let app = App {
        store_dir,
        config,
        catalog: Catalog::builtin(),
    };

    match &args.command {
        Commands::New { title, example } => cmd_new(&app, title.clone(), *example),
        Commands::Ls => cmd_ls(&app),
        Commands::Search { query } => cmd_search(&app, query),
        Commands::Show { doc } => cmd_show(&app, doc),
        Commands::Rm { id } => cmd_rm(&app, id),
        Commands::Rename { doc, title } => cmd_rename(&app, doc, title),
        Commands::Insert { doc, at, text } => cmd_insert(&app, doc, *at, text),
        Commands::Tag { doc, range, kind, tag } => cmd_tag(&app, doc, range, (*kind).into(), tag),
        Commands::Untag { doc, range, kind, tag } => {
            cmd_untag(&app, doc, range, (*kind).into(), tag)
        }
        Commands::Clear { doc, range } => cmd_clear(&app, doc, range),
        Commands::Style { doc, range, style } => cmd_style(&app, doc, range, (*style).into()),
        Commands::Block { doc, range, block } => cmd_block(&app, doc, range, (*block).into()),
        Commands::Stats { doc } => cmd_stats(&app, doc),
        Commands::Annotations { doc, json } => cmd_annotations(&app, doc, *json),
        Commands::Next { doc, from, tag, kind } => {
            cmd_navigate(&app, doc, *from, tag.as_deref(), *kind, true)
        }
        Commands::Prev { doc, from, tag, kind } => {
            cmd_navigate(&app, doc, *from, tag.as_deref(), *kind, false)
        }
        Commands::Versions { doc } => cmd_versions(&app, doc),
        Commands::Snapshot { doc, label } => cmd_snapshot(&app, doc, label.as_deref()),
        Commands::Restore { doc, version } => cmd_restore(&app, doc, version),
        Commands::Label { version, label } => cmd_label(&app, version, label),
        Commands::Catalog { kind } => cmd_catalog(&app, kind.map(TagKind::from)),
    }?;
    Ok(0)
}

fn main() {
    init_logging();
    let raw_args: Vec<String> = env::args().collect();

    match run(&raw_args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
