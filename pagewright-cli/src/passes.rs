//! One function per subcommand.
//!
//! Each pass takes the current document text and returns the edited text, or
//! `None` when it only reports or when a missing marker was skipped.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use owo_colors::OwoColorize;
use pagewright_common::delta::group_thousands;
use pagewright_common::{MissingPolicy, console};
use pagewright_css::{
    ChunkKind, ComponentIdExtractor, DEFAULT_SECTION_BOUNDARY, DEFAULT_SECTION_MARKER,
    FontPolicy, IdExtractor, StyleError, drop_empty_rules, prune_font_faces,
    prune_style_sections, rewrite_style_elements,
};
use pagewright_html::{
    MarkupError, PAGE_BUILDER_EMPTY_ATTRIBUTES, TagPattern, find_region, insert_before_marker,
    relocate_before_marker, remove_elements, replace_elements, strip_class_token,
    strip_empty_attributes,
};
use pagewright_ids::{
    DerivedPrefix, IdentifierMap, MappingArtifact, SLUG_MAX_LEN, SLUG_MAX_WORDS, UniqueNames,
    rename, slugify, strip_tags,
};
use regex::Regex;

use crate::files;

/// Options shared by every pass.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// What to do when a marker is missing.
    pub policy: MissingPolicy,
    /// Report only; write nothing.
    pub dry_run: bool,
}

fn tag_pattern(tag: &str) -> Result<TagPattern> {
    TagPattern::element(tag).with_context(|| format!("invalid element name {tag:?}"))
}

/// Apply the missing-marker policy to a markup result.
fn tolerate<T>(
    pass: &str,
    policy: MissingPolicy,
    result: Result<T, MarkupError>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() && !policy.is_abort() => {
            console::warn(pass, &format!("{err}; skipped"));
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn build_extractor(prefixes: &[String], min_len: usize) -> Result<ComponentIdExtractor> {
    let extractor = if prefixes.is_empty() {
        ComponentIdExtractor::page_builder()?
    } else {
        ComponentIdExtractor::new(prefixes, min_len)?
    };
    Ok(extractor)
}

// ========== tokenize ==========

/// List the top-level chunks of a stylesheet.
#[derive(Args, Debug)]
pub struct TokenizeArgs {
    /// Stylesheet to tokenize
    pub file: PathBuf,

    /// Print the chunks as JSON
    #[arg(long)]
    pub json: bool,

    /// Annotate rules with the page-builder identifiers they reference
    #[arg(long)]
    pub ids: bool,
}

pub fn tokenize(document: &str, args: &TokenizeArgs) -> Result<Option<String>> {
    let mut chunks = pagewright_css::tokenize(document)?;

    if args.ids {
        let extractor = ComponentIdExtractor::page_builder()?;
        for chunk in &mut chunks {
            if matches!(chunk.kind, ChunkKind::Rule | ChunkKind::AtRule) {
                chunk.referenced_ids = extractor.extract(&chunk.text);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(None);
    }

    for (i, chunk) in chunks.iter().enumerate() {
        let preview: String = chunk
            .text
            .trim()
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(60)
            .collect();
        println!(
            "{i:>5} {} {:>8}  {}",
            format!("{:<8}", chunk.kind).cyan(),
            chunk.text.len(),
            preview.dimmed()
        );
        if !chunk.referenced_ids.is_empty() {
            let ids: Vec<&str> = chunk.referenced_ids.iter().map(String::as_str).collect();
            console::detail(&ids.join(" "));
        }
    }
    console::summary(
        "tokenize",
        &format!(
            "{} chunk(s) covering {} bytes",
            chunks.len(),
            group_thousands(document.len())
        ),
    );
    Ok(None)
}

// ========== remove ==========

/// Remove every element whose opening tag contains one of the markers.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Document to edit
    pub file: PathBuf,

    /// Marker text inside the element's opening tag (repeatable)
    #[arg(short, long = "marker", value_name = "TEXT", required = true)]
    pub markers: Vec<String>,

    /// Element kind whose tags are depth-counted
    #[arg(long, default_value = "div")]
    pub tag: String,
}

pub fn remove(document: &str, args: &RemoveArgs, opts: RunOptions) -> Result<Option<String>> {
    let pattern = tag_pattern(&args.tag)?;
    let (out, report) = remove_elements(document, &args.markers, &pattern, opts.policy)?;

    for removed in &report.removed {
        console::detail(&format!(
            "{} ({} bytes)",
            removed.marker,
            group_thousands(removed.bytes)
        ));
    }
    for missing in &report.missing {
        console::warn("remove", &format!("marker not found: {missing}"));
    }
    console::summary("remove", &report.to_string());
    Ok(Some(out))
}

// ========== strip-class ==========

/// Remove a class token from every class attribute.
#[derive(Args, Debug)]
pub struct StripClassArgs {
    /// Document to edit
    pub file: PathBuf,

    /// Class token to remove (repeatable)
    #[arg(short, long = "token", value_name = "CLASS", required = true)]
    pub tokens: Vec<String>,
}

pub fn strip_class(document: &str, args: &StripClassArgs) -> Result<Option<String>> {
    let mut current = document.to_string();
    for token in &args.tokens {
        let (out, removed) = strip_class_token(&current, token)?;
        if removed == 0 {
            console::warn("strip-class", &format!("class {token:?} not found"));
        } else {
            console::detail(&format!("{token}: {removed} occurrence(s)"));
        }
        current = out;
    }
    Ok(Some(current))
}

// ========== dedup ==========

/// Replace every element carrying a marker with one canonical copy.
#[derive(Args, Debug)]
pub struct DedupArgs {
    /// Document to edit
    pub file: PathBuf,

    /// Marker text inside each block's opening tag
    #[arg(short, long, value_name = "TEXT")]
    pub marker: String,

    /// File holding the canonical block
    #[arg(short, long, value_name = "FILE")]
    pub replacement: PathBuf,

    /// Minimum number of blocks that must be found
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub expect: usize,

    /// Element kind whose tags are depth-counted
    #[arg(long, default_value = "div")]
    pub tag: String,
}

pub fn dedup(document: &str, args: &DedupArgs, opts: RunOptions) -> Result<Option<String>> {
    let pattern = tag_pattern(&args.tag)?;
    let replacement = files::read_text(&args.replacement)?;
    let replacement = replacement.trim_end_matches('\n');

    let (out, report) = replace_elements(document, &args.marker, &pattern, replacement)?;
    if report.found() < args.expect {
        let message = format!(
            "found {} block(s) for {:?}, expected at least {}",
            report.found(),
            args.marker,
            args.expect
        );
        if opts.policy.is_abort() {
            bail!(message);
        }
        console::warn("dedup", &format!("{message}; skipped"));
        return Ok(None);
    }
    console::summary("dedup", &report.to_string());
    Ok(Some(out))
}

// ========== relocate ==========

/// Move an element to just before an anchor.
#[derive(Args, Debug)]
pub struct RelocateArgs {
    /// Document to edit
    pub file: PathBuf,

    /// Marker text inside the opening tag of the element to move
    #[arg(short, long, value_name = "TEXT")]
    pub marker: String,

    /// Anchor text the element is moved in front of
    #[arg(short, long, value_name = "TEXT")]
    pub before: String,

    /// Element kind whose tags are depth-counted
    #[arg(long, default_value = "div")]
    pub tag: String,
}

pub fn relocate(
    document: &str,
    args: &RelocateArgs,
    opts: RunOptions,
) -> Result<Option<String>> {
    let pattern = tag_pattern(&args.tag)?;
    let found = find_region(document, &args.marker, &pattern);
    let Some(span) = tolerate("relocate", opts.policy, found)? else {
        return Ok(None);
    };
    let moved = tolerate(
        "relocate",
        opts.policy,
        relocate_before_marker(document, span, &args.before),
    )?;
    if moved.is_some() {
        console::summary(
            "relocate",
            &format!(
                "moved {} bytes at {}..{} before {:?}",
                group_thousands(span.len()),
                span.start,
                span.end,
                args.before
            ),
        );
    }
    Ok(moved)
}

// ========== inject ==========

/// Insert the contents of a file before a marker.
#[derive(Args, Debug)]
pub struct InjectArgs {
    /// Document to edit
    pub file: PathBuf,

    /// File whose contents are inserted
    #[arg(short, long, value_name = "FILE")]
    pub content: PathBuf,

    /// Text the contents are inserted in front of
    #[arg(short, long, value_name = "TEXT", default_value = DEFAULT_SECTION_BOUNDARY)]
    pub before: String,
}

pub fn inject(document: &str, args: &InjectArgs, opts: RunOptions) -> Result<Option<String>> {
    let content = files::read_text(&args.content)?;
    if !content.trim().is_empty() && document.contains(content.trim()) {
        console::warn("inject", "content is already present; skipped");
        return Ok(None);
    }
    let out = tolerate(
        "inject",
        opts.policy,
        insert_before_marker(document, &args.before, &content),
    )?;
    if out.is_some() {
        console::summary(
            "inject",
            &format!(
                "inserted {} bytes before {:?}",
                group_thousands(content.len()),
                args.before
            ),
        );
    }
    Ok(out)
}

// ========== cleanup ==========

/// Strip export leftovers: empty attributes, empty rules, unused font faces.
#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Page or stylesheet to edit
    pub file: PathBuf,

    /// Treat the whole file as a stylesheet instead of a page with `<style>` elements
    #[arg(long)]
    pub stylesheet: bool,

    /// Attribute removed when its value is empty (repeatable; default: page-builder set)
    #[arg(short, long = "attribute", value_name = "NAME")]
    pub attributes: Vec<String>,

    /// Font family whose `@font-face` blocks are kept (repeatable; default: all)
    #[arg(long = "keep-font", value_name = "FAMILY")]
    pub keep_fonts: Vec<String>,

    /// Drop `@font-face` blocks whose unicode range has no Latin subset
    #[arg(long)]
    pub latin_only: bool,
}

#[derive(Default)]
struct StyleTotals {
    empty_rules: usize,
    empty_bytes: usize,
    font_blocks: usize,
    font_bytes: usize,
    families: Vec<String>,
}

fn clean_stylesheet(
    css: &str,
    policy: &FontPolicy,
    totals: &mut StyleTotals,
) -> Result<String, StyleError> {
    let mut chunks = pagewright_css::tokenize(css)?;
    if !policy.is_permissive() {
        let fonts = prune_font_faces(chunks, policy)?;
        totals.font_blocks += fonts.family_blocks + fonts.range_blocks;
        totals.font_bytes += fonts.removed_bytes;
        totals.families.extend(fonts.removed_families.iter().cloned());
        chunks = fonts.kept;
    }
    let emptied = drop_empty_rules(chunks)?;
    totals.empty_rules += emptied.removed_chunks;
    totals.empty_bytes += emptied.removed_bytes;
    Ok(emptied.render())
}

pub fn cleanup(document: &str, args: &CleanupArgs) -> Result<Option<String>> {
    let mut policy = FontPolicy::default();
    if !args.keep_fonts.is_empty() {
        policy = policy.keep_families(args.keep_fonts.iter().cloned());
    }
    if args.latin_only {
        policy = policy.latin_only();
    }

    let mut totals = StyleTotals::default();
    let out = if args.stylesheet {
        clean_stylesheet(document, &policy, &mut totals)?
    } else {
        let (page, attributes) = if args.attributes.is_empty() {
            strip_empty_attributes(document, PAGE_BUILDER_EMPTY_ATTRIBUTES)?
        } else {
            strip_empty_attributes(document, &args.attributes)?
        };
        console::detail(&attributes.to_string());

        let (page, visited) =
            rewrite_style_elements(&page, |css| clean_stylesheet(css, &policy, &mut totals))?;
        if visited == 0 {
            console::warn("cleanup", "no <style> elements found");
        }
        page
    };

    console::detail(&format!(
        "removed {} empty rule(s) ({} bytes)",
        totals.empty_rules,
        group_thousands(totals.empty_bytes)
    ));
    if !policy.is_permissive() {
        totals.families.sort();
        totals.families.dedup();
        console::detail(&format!(
            "removed {} @font-face block(s) ({} bytes)",
            totals.font_blocks,
            group_thousands(totals.font_bytes)
        ));
        if !totals.families.is_empty() {
            console::detail(&format!("unused families: {}", totals.families.join(", ")));
        }
    }
    Ok(Some(out))
}

// ========== prune-css ==========

/// Drop style sections and rules that only reference removed identifiers.
#[derive(Args, Debug)]
pub struct PruneCssArgs {
    /// Document to edit
    pub file: PathBuf,

    /// JSON array of identifiers that no longer exist in the markup
    #[arg(short, long, value_name = "FILE")]
    pub dead_ids: PathBuf,

    /// Regex matching the comment that opens each style section
    #[arg(long, value_name = "REGEX", default_value = DEFAULT_SECTION_MARKER)]
    pub marker: String,

    /// Text that ends the section region
    #[arg(long, value_name = "TEXT", default_value = DEFAULT_SECTION_BOUNDARY)]
    pub boundary: String,

    /// Treat the whole file as the section region (plain stylesheets)
    #[arg(long, conflicts_with = "boundary")]
    pub no_boundary: bool,

    /// Component prefix recognised in selectors (repeatable; default: page-builder set)
    #[arg(short, long = "prefix", value_name = "PREFIX")]
    pub prefixes: Vec<String>,

    /// Minimum identifier length after a prefix
    #[arg(long, default_value_t = ComponentIdExtractor::PAGE_BUILDER_MIN_LEN)]
    pub min_len: usize,
}

pub fn prune_css(
    document: &str,
    args: &PruneCssArgs,
    opts: RunOptions,
) -> Result<Option<String>> {
    let dead = files::read_identifier_set(&args.dead_ids)?;
    let marker = Regex::new(&args.marker)
        .with_context(|| format!("invalid section marker {:?}", args.marker))?;
    let extractor = build_extractor(&args.prefixes, args.min_len)?;
    let boundary = (!args.no_boundary).then_some(args.boundary.as_str());

    let result = prune_style_sections(document, &marker, boundary, &dead, &extractor);
    let (out, report) = match result {
        Ok(done) => done,
        Err(err) if err.is_not_found() && !opts.policy.is_abort() => {
            console::warn("prune-css", &format!("{err}; skipped"));
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    if report.sections_scanned == 0 {
        console::warn("prune-css", "no style section markers found");
    }
    console::summary("prune-css", &report.to_string());
    Ok(Some(out))
}

// ========== rename ==========

/// Rename identifiers, with their derived forms, across the document.
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Document to edit
    pub file: PathBuf,

    /// JSON object of old identifier to new identifier
    #[arg(short, long, value_name = "FILE")]
    pub map: PathBuf,

    /// Derived form rule as BASE=DERIVED (repeatable)
    #[arg(short, long, value_name = "BASE=DERIVED")]
    pub derived: Vec<DerivedPrefix>,

    /// Add the page builder's component-class rules
    #[arg(long)]
    pub page_builder: bool,

    /// Where to write the applied map and totals as JSON
    #[arg(long, value_name = "FILE")]
    pub artifact: Option<PathBuf>,
}

pub fn rename_ids(
    document: &str,
    args: &RenameArgs,
    opts: RunOptions,
) -> Result<Option<String>> {
    let map = files::read_identifier_map(&args.map)?;
    let mut derived = args.derived.clone();
    if args.page_builder {
        derived.extend(DerivedPrefix::page_builder());
    }

    let (out, report) = rename(document, &map, &derived)?;
    for renamed in &report.renamed {
        if renamed.count > 0 {
            console::detail(&format!(
                "{} -> {} ({})",
                renamed.old, renamed.new, renamed.count
            ));
        }
    }
    for missing in &report.missing {
        console::warn("rename", &format!("{missing} not found"));
    }
    for present in &report.already_present {
        console::warn("rename", &format!("{present} already occurs in the input"));
    }
    if report.missing.len() == map.len() && opts.policy.is_abort() && !map.is_empty() {
        bail!("none of the {} identifier(s) occur in the document", map.len());
    }
    console::summary("rename", &report.to_string());

    if let Some(path) = &args.artifact {
        if opts.dry_run {
            console::detail(&format!("dry run, {} not written", path.display()));
        } else {
            files::write_text(path, &MappingArtifact::new(&map, &report).to_json()?)?;
            console::detail(&format!("mapping written to {}", path.display()));
        }
    }
    Ok(Some(out))
}

// ========== suggest-names ==========

/// Propose readable identifiers from each element's text.
#[derive(Args, Debug)]
pub struct SuggestNamesArgs {
    /// Document to read
    pub file: PathBuf,

    /// Identifier prefix to collect, e.g. `heading` for `id="heading-..."`
    #[arg(short, long, value_name = "PREFIX")]
    pub prefix: String,

    /// Minimum identifier length after the prefix
    #[arg(long, default_value_t = ComponentIdExtractor::PAGE_BUILDER_MIN_LEN)]
    pub min_len: usize,

    /// Element kind whose tags are depth-counted
    #[arg(long, default_value = "div")]
    pub tag: String,

    /// Write the proposed map here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn suggest_names(
    document: &str,
    args: &SuggestNamesArgs,
    opts: RunOptions,
) -> Result<Option<String>> {
    let pattern = tag_pattern(&args.tag)?;
    let id_pattern = Regex::new(&format!(
        r#"id="({}-[A-Za-z0-9_-]{{{},}})""#,
        regex::escape(&args.prefix),
        args.min_len.max(1)
    ))?;

    let mut seen = Vec::new();
    for caps in id_pattern.captures_iter(document) {
        let id = caps[1].to_string();
        if !seen.contains(&id) {
            seen.push(id);
        }
    }

    let mut names = UniqueNames::new();
    let mut map = IdentifierMap::new();
    for (index, id) in seen.iter().enumerate() {
        let marker = format!(r#"id="{id}""#);
        let text = match find_region(document, &marker, &pattern) {
            Ok(span) => strip_tags(span.text(document)?),
            Err(err) if err.is_not_found() => String::new(),
            Err(err) => return Err(err.into()),
        };
        let slug = slugify(&text, SLUG_MAX_WORDS, SLUG_MAX_LEN);
        let name = if slug.len() > 3 {
            names.claim(&slug)
        } else {
            names.claim(&format!("item-{}", index + 1))
        };
        let _ = map.insert(id.as_str(), format!("{}-{name}", args.prefix))?;
    }

    let json = serde_json::to_string_pretty(&map)?;
    match &args.output {
        Some(path) if !opts.dry_run => {
            files::write_text(path, &json)?;
            console::detail(&format!("map written to {}", path.display()));
        }
        _ => println!("{json}"),
    }
    console::summary(
        "suggest-names",
        &format!("{} of {} identifier(s) named", map.len(), seen.len()),
    );
    Ok(None)
}
