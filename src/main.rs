use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use relver::derive::{
    build_version, hash_version, next_release_version, patch_version, release_version,
    VersionPolicy,
};
use relver::edit::EditResult;
use relver::project::{self, ProjectDescriptor};
use relver::{config, git};
use semver::Version;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "relver")]
#[command(about = "Semantic version derivation and descriptor rewriting", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory (descriptor and git state are resolved here)
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Descriptor file (probes pom.xml, then package.json, if not specified)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PolicyArgs {
    /// Commit hash display width
    #[arg(long)]
    hash_length: Option<usize>,

    /// Zero-pad width for the build number
    #[arg(long)]
    build_number_length: Option<usize>,

    /// Literal prefix in front of the build number
    #[arg(long)]
    build_number_prefix: Option<String>,
}

impl PolicyArgs {
    /// CLI flags win over `.relver.toml` values.
    fn apply(&self, mut policy: VersionPolicy) -> VersionPolicy {
        if let Some(hash_length) = self.hash_length {
            policy.hash_length = hash_length;
        }
        if let Some(build_number_length) = self.build_number_length {
            policy.build_number_length = build_number_length;
        }
        if let Some(prefix) = &self.build_number_prefix {
            policy.build_number_prefix = prefix.clone();
        }
        policy
    }
}

#[derive(Args)]
struct WriteArgs {
    /// Show what would change without modifying the descriptor
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show a unified diff of the descriptor change
    #[arg(short, long)]
    diff: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the project's name and current version
    Show {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the release version (prerelease and metadata stripped)
    Release,

    /// Print the build version (commit count and hash as prerelease)
    Build {
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Print the hash version (bare commit hash as prerelease)
    Hash {
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Compute the next development version, optionally writing it back
    Next {
        /// Bump the major component (only valid from an x.y.0 state)
        #[arg(long, conflicts_with = "patch")]
        major: bool,

        /// Bump the patch component
        #[arg(long)]
        patch: bool,

        /// Write the computed version into the descriptor
        #[arg(long)]
        set: bool,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Write an explicit version into the descriptor
    Set {
        /// The new version (must be semver 2.0)
        version: String,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Compute the starting version for a patch branch cut from a release tag
    Patch {
        /// The release tag the branch is cut from (must be a clean x.y.0)
        tag: String,

        /// Write the computed version into the descriptor
        #[arg(long)]
        set: bool,

        #[command(flatten)]
        write: WriteArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let descriptor = load_descriptor(&cli.dir, cli.file.as_deref())?;
    let policy = config::load_policy(&cli.dir)?;

    // Git state is read from the directory owning the descriptor unless the
    // project directory was given explicitly.
    let repo_dir = if cli.file.is_some() {
        descriptor
            .file()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cli.dir.clone())
    } else {
        cli.dir.clone()
    };

    match cli.command {
        Commands::Show { json } => cmd_show(&descriptor, json),

        Commands::Release => {
            let current = descriptor.version()?;
            println!("{}", release_version(&current));
            Ok(())
        }

        Commands::Build { policy: flags } => {
            let policy = flags.apply(policy);
            let current = descriptor.version()?;
            let repo = git::describe(&repo_dir, policy.hash_length)?;
            println!("{}", build_version(&current, &repo, &policy)?);
            Ok(())
        }

        Commands::Hash { policy: flags } => {
            let policy = flags.apply(policy);
            let current = descriptor.version()?;
            let repo = git::describe(&repo_dir, policy.hash_length)?;
            println!("{}", hash_version(&current, &repo)?);
            Ok(())
        }

        Commands::Next {
            major,
            patch,
            set,
            write,
        } => {
            let policy = VersionPolicy {
                release_major: major,
                release_patch: patch,
                ..policy
            };
            let current = descriptor.version()?;
            let next = next_release_version(&current, &policy);
            if set {
                write_version(descriptor, &next, &write)
            } else {
                println!("{next}");
                Ok(())
            }
        }

        Commands::Set { version, write } => {
            let new_version = relver::parse_version(&version)?;
            write_version(descriptor, &new_version, &write)
        }

        Commands::Patch { tag, set, write } => {
            let current = descriptor.version()?;
            let branch_version = patch_version(&tag, &current)?;
            if set {
                write_version(descriptor, &branch_version, &write)
            } else {
                println!("{branch_version}");
                Ok(())
            }
        }
    }
}

fn load_descriptor(dir: &Path, file: Option<&Path>) -> Result<ProjectDescriptor> {
    match file {
        Some(file) => project::load(file)
            .with_context(|| format!("failed to load descriptor {}", file.display())),
        None => project::probe(dir)
            .with_context(|| format!("failed to find a descriptor in {}", dir.display())),
    }
}

fn cmd_show(descriptor: &ProjectDescriptor, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "file": descriptor.file(),
            "kind": descriptor.kind().to_string(),
            "name": descriptor.name(),
            "groupId": descriptor.group_id(),
            "version": descriptor.version_text(),
            "parent": descriptor.parent().map(|p| p.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("File:    {}", descriptor.file().display());
    println!("Kind:    {}", descriptor.kind());
    println!("Name:    {}", descriptor.name());
    if let Some(group_id) = descriptor.group_id() {
        println!("Group:   {group_id}");
    }
    println!("Version: {}", descriptor.version_text().bold());
    if let Some(parent) = descriptor.parent() {
        println!("Parent:  {parent}");
    }
    Ok(())
}

fn write_version(
    descriptor: ProjectDescriptor,
    new_version: &Version,
    write: &WriteArgs,
) -> Result<()> {
    let file = descriptor.file().to_path_buf();
    let edit = descriptor.version_edit(new_version);

    if write.diff || write.dry_run {
        let before = fs::read_to_string(&file)?;
        let after = edit.preview()?;
        if write.diff && before != after {
            display_diff(&file, &before, &after);
        }
    }

    if write.dry_run {
        println!(
            "{} {}: would set version {} -> {}",
            "⊙".yellow(),
            file.display(),
            descriptor.version_text(),
            new_version.to_string().bold()
        );
        return Ok(());
    }

    match descriptor.set_version(new_version)? {
        EditResult::Applied { .. } => {
            println!(
                "{} {}: version set to {}",
                "✓".green(),
                file.display(),
                new_version.to_string().bold()
            );
        }
        EditResult::AlreadyApplied { .. } => {
            println!(
                "{} {}: version is already {}",
                "⊙".yellow(),
                file.display(),
                new_version
            );
        }
    }
    Ok(())
}

/// Unified diff between the original and rewritten descriptor.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (rewritten)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}
