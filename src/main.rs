#![allow(dead_code)]

use crate::artifacts::core::error::VcsError;
use crate::artifacts::core::pager::{PagerWriter, page_all};
use crate::commands::porcelain::log::LogOptions;
use anyhow::Result;
use areas::repository::Repository;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;

mod areas;
mod artifacts;
mod commands;

#[derive(Parser)]
#[command(
    name = "vit",
    version = "0.1.0",
    about = "A minimal version control system",
    long_about = "This is a minimal version control system built around a \
    content-addressed object database, a staging index, and branch references. \
    It is not meant to be a full replacement for git, but covers the core \
    snapshot, branch, and merge workflows.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database"
    )]
    HashObject {
        #[arg(
            short,
            long,
            required = false,
            help = "Write the object to the object database"
        )]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Pretty-print a stored object",
        long_about = "This command pretty-prints any stored object. \
        It requires the full or abbreviated object id."
    )]
    CatFile {
        #[arg(index = 1, help = "The object id to print")]
        object: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command lists the contents of a tree object in the repository. \
        It requires the id of a tree to be specified."
    )]
    LsTree {
        #[arg(index = 1, help = "The tree id to list")]
        sha: String,
    },
    #[command(
        name = "add",
        about = "Add files or directories to the index",
        long_about = "This command adds the specified files or directories to the index. \
        It requires the paths of the files or directories to be specified."
    )]
    Add {
        #[arg(index = 1, help = "The files or directories to add to the index")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message"
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command shows the status of the working tree, \
        including staged and untracked files."
    )]
    Status,
    #[command(name = "log", about = "Show commit logs")]
    Log {
        #[arg(
            short = 'n',
            long = "max-count",
            help = "Limit the number of commits to output"
        )]
        max_count: Option<usize>,
    },
    #[command(
        name = "branch",
        about = "Create, list, or delete branches",
        long_about = "Without arguments this command lists branches; with a name it creates \
        a branch at the current HEAD; with -d it deletes the named branch."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: Option<String>,
        #[arg(
            short = 'd',
            long = "delete",
            value_name = "NAME",
            conflicts_with = "name",
            help = "Delete the named branch"
        )]
        delete: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or detach HEAD at a commit",
        long_about = "This command moves HEAD to the specified branch or object id. \
        Working-tree files are left untouched."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch or object id to checkout")]
        target: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
    #[command(
        name = "diff",
        about = "Show staged changes against a commit",
        long_about = "This command lists the paths whose staged content differs from the \
        given commit (HEAD by default), in name-status form."
    )]
    Diff {
        #[arg(index = 1, help = "The commit to compare against (defaults to HEAD)")]
        revision: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    colog::init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(exit_code(&err));
    }
}

/// 1 for user/precondition errors, 2 for internal/IO errors
fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<VcsError>().is_some() {
        1
    } else if err
        .chain()
        .any(|cause| cause.downcast_ref::<std::io::Error>().is_some())
    {
        2
    } else {
        1
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => {
                    Repository::new(std::path::PathBuf::from(path), Box::new(std::io::stdout()))?
                }
                None => {
                    let pwd = std::env::current_dir()?;
                    Repository::new(pwd, Box::new(std::io::stdout()))?
                }
            };

            repository.init().await?
        }
        Commands::HashObject { write, file } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            repository.hash_object(file, *write)?
        }
        Commands::CatFile { object } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            repository.cat_file(object)?
        }
        Commands::LsTree { sha } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            repository.ls_tree(sha)?
        }
        Commands::Add { paths } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            repository.add(paths).await?
        }
        Commands::Commit { message } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            repository.commit(message.as_str()).await?
        }
        Commands::Status => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            repository.status().await?
        }
        Commands::Log { max_count } => {
            let pwd = std::env::current_dir()?;
            let opts = LogOptions { limit: *max_count };

            // page the output on a terminal, write straight through otherwise
            if std::io::stdout().is_terminal() {
                let pager = minus::Pager::new();
                let repository =
                    Repository::discover(pwd, Box::new(PagerWriter::new(pager.clone())))?;

                repository.log(&opts)?;
                page_all(pager)?
            } else {
                let repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

                repository.log(&opts)?
            }
        }
        Commands::Branch { name, delete } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            match (name, delete) {
                (_, Some(delete)) => repository.delete_branch(delete)?,
                (Some(name), None) => repository.create_branch(name)?,
                (None, None) => repository.list_branches()?,
            }
        }
        Commands::Checkout { target } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            repository.checkout(target.as_str()).await?
        }
        Commands::Merge { branch } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            repository.merge(branch.as_str()).await?
        }
        Commands::Diff { revision } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::discover(pwd, Box::new(std::io::stdout()))?;

            repository.diff(revision.as_deref()).await?
        }
    }

    Ok(())
}
