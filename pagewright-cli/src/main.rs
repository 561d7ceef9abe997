//! pagewright: structural editing passes for exported HTML/CSS pages.
//!
//! Every subcommand reads one file, runs one pass over its text, prints a
//! summary per unit of work, and writes the result back after copying the
//! original to `<FILE>.pre-<PASS>`.

mod files;
mod passes;

use std::path::Path;

use clap::{Parser, Subcommand};
use pagewright_common::{MissingPolicy, SizeDelta, console};

use passes::{
    CleanupArgs, DedupArgs, InjectArgs, PruneCssArgs, RelocateArgs, RemoveArgs, RenameArgs,
    RunOptions, StripClassArgs, SuggestNamesArgs, TokenizeArgs,
};

/// pagewright: edit exported pages by structure, without a full parser
#[derive(Parser, Debug)]
#[command(name = "pagewright")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Remove the mobile copies of two sections
    pagewright remove index.html -m 'id="section-mob1"' -m 'id="section-mob2"'

    # Drop stylesheet sections that only styled removed components
    pagewright prune-css index.html --dead-ids removed.json

    # Rename component ids and their class forms, keeping a record
    pagewright rename index.html --map ids.json --page-builder --artifact id_map.json

    # Move the sticky call-to-action in front of an anchor
    pagewright relocate index.html -m 'class="sticky-cta"' -b '<div id="stickyLength"'

    # Strip page-builder leftovers and keep only the Latin subsets of two fonts
    pagewright cleanup index.html --keep-font Roboto --keep-font Kalam --latin-only

    # Preview without writing
    pagewright --dry-run dedup index.html -m 'class="cta-box"' -r cta.html --expect 15
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// What to do when a marker or anchor is missing
    #[arg(long, global = true, value_name = "POLICY", default_value_t = MissingPolicy::Skip)]
    on_missing: MissingPolicy,

    /// Print summaries without writing any file
    #[arg(long, global = true)]
    dry_run: bool,

    /// Do not copy FILE to FILE.pre-PASS before writing
    #[arg(long, global = true)]
    no_backup: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the top-level chunks of a stylesheet
    Tokenize(TokenizeArgs),
    /// Remove elements by a marker in their opening tag
    Remove(RemoveArgs),
    /// Remove a class token from every class attribute
    StripClass(StripClassArgs),
    /// Replace repeated blocks with one canonical copy
    Dedup(DedupArgs),
    /// Move an element in front of an anchor
    Relocate(RelocateArgs),
    /// Insert a file's contents in front of a marker
    Inject(InjectArgs),
    /// Strip empty attributes, empty rules, and unused font faces
    Cleanup(CleanupArgs),
    /// Drop stylesheet sections and rules for removed identifiers
    PruneCss(PruneCssArgs),
    /// Rename identifiers and their derived forms
    Rename(RenameArgs),
    /// Propose readable identifiers from element text
    SuggestNames(SuggestNamesArgs),
}

impl Command {
    /// Pass name used in output tags and backup suffixes.
    const fn pass(&self) -> &'static str {
        match self {
            Self::Tokenize(_) => "tokenize",
            Self::Remove(_) => "remove",
            Self::StripClass(_) => "strip-class",
            Self::Dedup(_) => "dedup",
            Self::Relocate(_) => "relocate",
            Self::Inject(_) => "inject",
            Self::Cleanup(_) => "cleanup",
            Self::PruneCss(_) => "prune-css",
            Self::Rename(_) => "rename",
            Self::SuggestNames(_) => "suggest-names",
        }
    }

    fn file(&self) -> &Path {
        match self {
            Self::Tokenize(args) => args.file.as_path(),
            Self::Remove(args) => args.file.as_path(),
            Self::StripClass(args) => args.file.as_path(),
            Self::Dedup(args) => args.file.as_path(),
            Self::Relocate(args) => args.file.as_path(),
            Self::Inject(args) => args.file.as_path(),
            Self::Cleanup(args) => args.file.as_path(),
            Self::PruneCss(args) => args.file.as_path(),
            Self::Rename(args) => args.file.as_path(),
            Self::SuggestNames(args) => args.file.as_path(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let opts = RunOptions {
        policy: cli.on_missing,
        dry_run: cli.dry_run,
    };
    let pass = cli.command.pass();
    let path = cli.command.file();
    let document = files::read_text(path)?;

    let edited = match &cli.command {
        Command::Tokenize(args) => passes::tokenize(&document, args),
        Command::Remove(args) => passes::remove(&document, args, opts),
        Command::StripClass(args) => passes::strip_class(&document, args),
        Command::Dedup(args) => passes::dedup(&document, args, opts),
        Command::Relocate(args) => passes::relocate(&document, args, opts),
        Command::Inject(args) => passes::inject(&document, args, opts),
        Command::Cleanup(args) => passes::cleanup(&document, args),
        Command::PruneCss(args) => passes::prune_css(&document, args, opts),
        Command::Rename(args) => passes::rename_ids(&document, args, opts),
        Command::SuggestNames(args) => passes::suggest_names(&document, args, opts),
    };
    let edited = match edited {
        Ok(edited) => edited,
        Err(err) => {
            console::error(pass, "pass failed; nothing written");
            return Err(err);
        }
    };

    let Some(edited) = edited else {
        return Ok(());
    };
    if edited == document {
        console::summary(pass, "no changes");
        return Ok(());
    }

    let size = SizeDelta::between(&document, &edited);
    if cli.dry_run {
        console::summary(pass, &format!("dry run, not written; {size}"));
        return Ok(());
    }
    if !cli.no_backup {
        files::backup(path, pass)?;
    }
    files::write_text(path, &edited)?;
    let mut message = format!("wrote {}; {size}", path.display());
    if size.change() < 0 {
        message.push_str(&format!(" ({:.1}% smaller)", size.reduction_percent()));
    }
    console::summary(pass, &message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rename_with_derived_prefixes() {
        let cli = Cli::try_parse_from([
            "pagewright",
            "--on-missing",
            "abort",
            "rename",
            "index.html",
            "--map",
            "ids.json",
            "-d",
            "=component-",
            "-d",
            "heading-=cheading-",
        ])
        .unwrap();

        assert!(cli.on_missing.is_abort());
        assert_eq!(cli.command.pass(), "rename");
        let Command::Rename(args) = cli.command else {
            panic!("expected rename");
        };
        assert_eq!(args.derived.len(), 2);
        assert_eq!(args.derived[1].derived, "cheading-");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pagewright",
            "remove",
            "index.html",
            "-m",
            r#"id="a""#,
            "--dry-run",
            "--no-backup",
        ])
        .unwrap();
        assert!(cli.dry_run && cli.no_backup);
        assert_eq!(cli.on_missing, MissingPolicy::Skip);
        assert_eq!(cli.command.file(), Path::new("index.html"));
    }

    #[test]
    fn test_parse_cleanup_font_options() {
        let cli = Cli::try_parse_from([
            "pagewright",
            "cleanup",
            "fonts.css",
            "--stylesheet",
            "--keep-font",
            "Roboto",
            "--keep-font",
            "Kalam",
            "--latin-only",
        ])
        .unwrap();
        assert_eq!(cli.command.pass(), "cleanup");
        let Command::Cleanup(args) = cli.command else {
            panic!("expected cleanup");
        };
        assert!(args.stylesheet && args.latin_only);
        assert_eq!(args.keep_fonts, ["Roboto", "Kalam"]);
        assert!(args.attributes.is_empty());
    }

    #[test]
    fn test_bad_derived_prefix_rejected() {
        let parsed = Cli::try_parse_from([
            "pagewright",
            "rename",
            "x.html",
            "-m",
            "m.json",
            "-d",
            "nope",
        ]);
        assert!(parsed.is_err());
    }
}
