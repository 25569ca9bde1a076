//! todo CLI - git-friendly todo tracking.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use todos::{Item, Partition, STORE_DIR, Status, Store, git, merge_files};

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todos")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("todos.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Repository root: `--dir`, else the enclosing git work tree, else the
/// current directory.
fn get_repo_root(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.dir {
        return dir.clone();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    git::toplevel(&cwd).unwrap_or(cwd)
}

fn format_status(status: &Status) -> ColoredString {
    match status {
        Status::Open => "open".green(),
        Status::Closed => "closed".blue(),
    }
}

fn print_json_lines(items: &[Item]) -> Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item).context("Failed to serialize item")?);
    }
    Ok(())
}

fn init(repo_root: &Path, store_root: &Path) -> Result<()> {
    let store = Store::init(store_root).context("Failed to initialize todo store")?;

    if git::toplevel(repo_root).is_some() {
        let files = [store.path(Partition::Open), store.path(Partition::Closed)];
        git::ensure_gitattributes(repo_root, &files).context("Failed to update .gitattributes")?;
        if let Err(e) = git::register_merge_driver(repo_root) {
            warn!("Failed to register merge driver: {:#}", e);
        }
    } else {
        info!("{} is not a git work tree, skipping merge driver setup", repo_root.display());
    }

    println!("initialized todo");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let repo_root = get_repo_root(&cli);
    let store_root = repo_root.join(STORE_DIR);

    match cli.command {
        Command::Init => init(&repo_root, &store_root)?,

        Command::New { title } => {
            let mut store = Store::open(&store_root)?;
            let item = store.create(&title).context("Failed to create item")?;
            println!("{}", item.id);
        }

        Command::Close { id } => {
            let mut store = Store::open(&store_root)?;
            store.close(&id)?;
        }

        Command::Dep { child, parent } => {
            let mut store = Store::open(&store_root)?;
            store.add_dependency(&child, &parent)?;
        }

        Command::Summary { id, text } => {
            let mut store = Store::open(&store_root)?;
            store.set_summary(&id, &text)?;
        }

        Command::Show { id, json } => {
            let store = Store::open(&store_root)?;
            let item = store.get(&id)?;

            if json {
                print_json_lines(std::slice::from_ref(&item))?;
            } else {
                println!("{}: {}", "ID".bold(), item.id.cyan());
                println!("{}: {}", "Title".bold(), item.title);
                println!("{}: {}", "Status".bold(), format_status(&item.status));
                if !item.summary.is_empty() {
                    println!("{}: {}", "Summary".bold(), item.summary);
                }
                if !item.deps.is_empty() {
                    let deps: Vec<&str> = item.deps.iter().map(String::as_str).collect();
                    println!("{}: {}", "Depends on".bold(), deps.join(", "));
                }
                println!("{}: {}", "Updated".bold(), item.updated_at.format("%Y-%m-%dT%H:%M:%SZ"));
            }
        }

        Command::List { closed, json } => {
            let store = Store::open(&store_root)?;
            let partition = if closed { Partition::Closed } else { Partition::Open };
            let items = store.list(partition).context("Failed to list items")?;

            if json {
                print_json_lines(&items)?;
            } else {
                for item in items {
                    let summary = if item.summary.is_empty() {
                        String::new()
                    } else {
                        format!(": {}", item.summary)
                    };
                    let deps = if item.deps.is_empty() {
                        String::new()
                    } else {
                        let deps: Vec<&str> = item.deps.iter().map(String::as_str).collect();
                        format!(" <- {}", deps.join(","))
                    };
                    println!(
                        "{} [{}] {}{}{}",
                        item.id.cyan(),
                        format_status(&item.status),
                        item.title,
                        summary,
                        deps.dimmed()
                    );
                }
            }
        }

        Command::Ready { json } => {
            let store = Store::open(&store_root)?;
            let items = store.ready().context("Failed to get ready items")?;

            if json {
                print_json_lines(&items)?;
            } else {
                for item in items {
                    println!("{} {}", item.id.cyan(), item.title);
                }
            }
        }

        Command::Blocked { json } => {
            let store = Store::open(&store_root)?;
            let blocked = store.blocked().context("Failed to get blocked items")?;

            if json {
                let items: Vec<Item> = blocked.into_iter().map(|(item, _)| item).collect();
                print_json_lines(&items)?;
            } else {
                for (item, waiting) in blocked {
                    println!("{} {} {}", item.id.cyan(), item.title, format!("<- {}", waiting.join(",")).red());
                }
            }
        }

        Command::Merge { base, ours, theirs } => {
            merge_files(&base, &ours, &theirs).context("Merge driver failed")?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "todo:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
