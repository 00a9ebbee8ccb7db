mod init;
pub use init::cmd_init;

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::io::kv_store::FileStore;
use crate::io::lock::FileLock;
use crate::io::persist::{Persist, hydrate};
use crate::model::config::Config;
use crate::model::task::Task;
use crate::ops::import::{CONFIRM_PROMPT, ImportSession};
use crate::ops::store::TaskStore;
use crate::ops::task_ops::{Command, display_order};
use crate::ops::validate::{TitleInput, validate_title};
use crate::parse::list_serializer::EXPORT_MIME;
use crate::parse::serialize_numbered_list;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let data_dir = resolve_data_dir(cli.dir)?;

    let command = cli.command.unwrap_or(Commands::List);
    // Init must work before a config exists
    if let Commands::Init(args) = command {
        return cmd_init(&data_dir, args);
    }

    let ws = Workspace::load(data_dir)?;
    match command {
        Commands::Init(_) => unreachable!("init is handled before the workspace loads"),

        // Read commands
        Commands::List => cmd_list(&ws, json),
        Commands::Export(args) => cmd_export(&ws, args),

        // Write commands
        Commands::Add(args) => cmd_add(&ws, args),
        Commands::Toggle(args) => cmd_toggle(&ws, args),
        Commands::Delete(args) => cmd_delete(&ws, args),
        Commands::Edit(args) => cmd_edit(&ws, args),
        Commands::Import(args) => cmd_import(&ws, args, json),
        Commands::Apply(args) => cmd_apply(&ws, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `--dir` / `JOT_DIR`, else `<platform data dir>/jot`.
fn resolve_data_dir(dir: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|d| d.join("jot"))
            .ok_or_else(|| "could not find a data directory; pass --dir or set JOT_DIR".into()),
    }
}

type FileTaskStore = TaskStore<Persist<FileStore>>;

/// A data directory and its config.
struct Workspace {
    data_dir: PathBuf,
    config: Config,
}

impl Workspace {
    fn load(data_dir: PathBuf) -> Result<Self, ConfigError> {
        let config = config_io::read_config(&data_dir)?;
        Ok(Workspace { data_dir, config })
    }

    fn file_store(&self) -> FileStore {
        FileStore::new(self.data_dir.join(&self.config.store.file))
    }

    /// Current tasks, for commands that don't write. Bad stored data reads
    /// as an empty list and is left alone on disk.
    fn read_tasks(&self) -> Vec<Task> {
        hydrate(&self.file_store(), &self.config.store.key, None)
    }

    /// Lock the data directory and load a store that persists every change.
    /// Hold the returned lock until the command is done.
    fn open_store(&self) -> Result<(FileLock, FileTaskStore), Box<dyn std::error::Error>> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| format!("could not create {}: {}", self.data_dir.display(), e))?;
        let lock = FileLock::acquire_default(&self.data_dir)?;

        let hook = Persist::new(self.file_store(), self.config.store.key.clone())
            .with_recovery_dir(&self.data_dir);
        let tasks = hook.hydrate();
        Ok((lock, TaskStore::with_hook(tasks, self.config.ids.prefix.clone(), hook)))
    }
}

/// Ask a yes/no question. Anything but `y`/`yes` (including EOF) is no.
fn ask_confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> io::Result<bool> {
    write!(out, "{} [y/N] ", prompt)?;
    out.flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Parse one JSON command per non-blank line. Fails on the first bad line.
fn parse_command_lines(text: &str) -> Result<Vec<Command>, String> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| Command::from_json(line).map_err(|e| format!("line {}: {}", i + 1, e)))
        .collect()
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ws: &Workspace, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = ws.read_tasks();
    let view = display_order(&tasks);

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks_to_json(&view))?);
        return Ok(());
    }
    if view.is_empty() {
        println!("no tasks");
    }
    for line in format_task_list(&view) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_export(ws: &Workspace, args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = ws.read_tasks();
    let text = serialize_numbered_list(&tasks);

    if args.path.as_deref() == Some("-") {
        print!("{}", text);
        return Ok(());
    }

    let path = args
        .path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&ws.config.export.filename));
    write_export(&path, &text)?;
    println!("exported {} tasks to {}", tasks.len(), path.display());
    Ok(())
}

fn write_export(path: &Path, text: &str) -> Result<(), String> {
    tracing::debug!(path = %path.display(), mime = EXPORT_MIME, "writing export");
    fs::write(path, text.as_bytes()).map_err(|e| format!("could not write {}: {}", path.display(), e))
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ws: &Workspace, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_lock, mut store) = ws.open_store()?;
    let mut input = TitleInput::new(args.title);
    let id = input.submit(&mut store)?;
    println!("{}", id);
    Ok(())
}

fn cmd_toggle(ws: &Workspace, args: IdArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_lock, mut store) = ws.open_store()?;
    store.dispatch(Command::Toggle { id: args.id });
    Ok(())
}

fn cmd_delete(ws: &Workspace, args: IdArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_lock, mut store) = ws.open_store()?;
    store.dispatch(Command::Delete { id: args.id });
    Ok(())
}

fn cmd_edit(ws: &Workspace, args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate_title(&args.title)?;
    let (_lock, mut store) = ws.open_store()?;
    store.dispatch(Command::Edit {
        id: args.id,
        title: args.title,
    });
    Ok(())
}

fn cmd_import(ws: &Workspace, args: ImportArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(&args.file)
        .map_err(|e| format!("could not read {}: {}", args.file.display(), e))?;
    let text = String::from_utf8_lossy(&bytes);

    let mut session = ImportSession::new();
    session.stage(&text);
    let candidates = session
        .pending()
        .map(|batch| batch.titles.clone())
        .unwrap_or_default();

    if !json {
        println!("{} tasks in {}:", candidates.len(), args.file.display());
        for title in &candidates {
            println!("  {}", title);
        }
    }

    let confirmed = args.yes || ask_confirm(&mut io::stdin().lock(), &mut io::stderr(), CONFIRM_PROMPT)?;
    if !confirmed {
        session.cancel();
        if json {
            let out = ImportJson {
                candidates,
                imported: false,
                ids: Vec::new(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("import cancelled");
        }
        return Ok(());
    }

    // Lock only once the user has answered
    let (_lock, mut store) = ws.open_store()?;
    let ids = session.confirm(&mut store)?;

    if json {
        let out = ImportJson {
            candidates,
            imported: true,
            ids,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("imported {} tasks", ids.len());
    }
    Ok(())
}

fn cmd_apply(ws: &Workspace, args: ApplyArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = match &args.file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("could not read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let commands = parse_command_lines(&text)?;

    let (_lock, mut store) = ws.open_store()?;
    let applied = commands.len();
    let changed = commands
        .into_iter()
        .map(|cmd| store.dispatch(cmd))
        .filter(|&changed| changed)
        .count();

    if json {
        println!("{}", serde_json::to_string_pretty(&ApplyJson { applied, changed })?);
    } else {
        println!("applied {} commands ({} changed the list)", applied, changed);
    }
    Ok(())
}
