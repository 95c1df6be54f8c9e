//! Terminal host for the SpaceTodo core.
//!
//! # Responsibility
//! - Play the role of the UI: read intents from stdin, render snapshots.
//! - Drive animation-gated actions on a single-threaded executor.

mod command;
mod render;

use clap::Parser;
use command::{Command, HELP};
use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use log::{info, warn};
use spacetodo_core::db::open_db;
use spacetodo_core::{
    core_version, init_logging, AppConfig, DispatchOutcome, Dispatcher, ImmediateSequencer,
    InputFocus, Key, KeyValueStore, KvPersistence, MemoryKvStore, SqliteKvStore,
};
use std::error::Error;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

type Store = Box<dyn KeyValueStore>;
type HostDispatcher = Dispatcher<KvPersistence<Store>, ImmediateSequencer>;

#[derive(Debug, Parser)]
#[command(name = "spacetodo", version, about = "Spaces of todos in the terminal")]
struct Args {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// SQLite file used as local storage; in-memory when omitted.
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[arg(long)]
    reduced_motion: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("spacetodo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(args)?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }
    info!("event=cli_start module=cli status=ok version={}", core_version());

    let store: Store = match &config.data_path {
        Some(path) => Box::new(SqliteKvStore::new(open_db(path)?)),
        None => Box::new(MemoryKvStore::new()),
    };
    let dispatcher = Dispatcher::bootstrap(
        KvPersistence::new(store),
        ImmediateSequencer,
        config.dispatcher_options(),
    );
    dispatcher.start();

    repl(&dispatcher)?;
    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn resolve_config(args: Args) -> Result<AppConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(data) = args.data {
        config.data_path = Some(data);
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(log_dir) = args.log_dir {
        config.log_dir = Some(log_dir);
    }
    config.reduced_motion |= args.reduced_motion;
    Ok(config)
}

fn repl(dispatcher: &HostDispatcher) -> io::Result<()> {
    let mut pool = LocalPool::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("{}", render::render(&dispatcher.state(), dispatcher.persistence_enabled()));
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == Command::Quit {
            return Ok(());
        }

        let before = (dispatcher.revision(), dispatcher.persistence_enabled());
        if let Err(message) = execute(dispatcher, &pool, command) {
            println!("{message}");
        }
        pool.run_until_stalled();
        if (dispatcher.revision(), dispatcher.persistence_enabled()) != before {
            print!("{}", render::render(&dispatcher.state(), dispatcher.persistence_enabled()));
        }
    }
}

fn execute(dispatcher: &HostDispatcher, pool: &LocalPool, command: Command) -> Result<(), String> {
    let spawner = pool.spawner();
    let state = dispatcher.state();
    let space_id = |index: usize| {
        state
            .spaces()
            .get(index - 1)
            .map(|space| space.id)
            .ok_or_else(|| format!("no space #{index}"))
    };
    let todo_ids = |space: usize, todo: usize| {
        let space_id = space_id(space)?;
        state
            .space(space_id)
            .and_then(|space| space.todos.get(todo - 1))
            .map(|item| (space_id, item.id))
            .ok_or_else(|| format!("no todo #{todo} in space #{space}"))
    };

    match command {
        Command::AddSpace(name) => {
            dispatcher.set_space_name_input(&name);
            dispatcher.handle_key(InputFocus::SpaceName, Key::Enter);
        }
        Command::AddTodo { space, text } => {
            let space_id = space_id(space)?;
            dispatcher.set_todo_input(space_id, &text);
            dispatcher.handle_key(InputFocus::TodoText(space_id), Key::Enter);
        }
        Command::Toggle { space, todo } => {
            let (space_id, todo_id) = todo_ids(space, todo)?;
            dispatcher.toggle_todo(space_id, todo_id);
        }
        Command::Edit { space, todo, text } => {
            let (space_id, todo_id) = todo_ids(space, todo)?;
            dispatcher.edit_todo(space_id, todo_id, &text);
        }
        Command::DeleteTodo { space, todo } => {
            let (space_id, todo_id) = todo_ids(space, todo)?;
            spawn(&spawner, dispatcher.delete_todo(space_id, todo_id));
        }
        Command::DeleteSpace(space) => {
            spawn(&spawner, dispatcher.delete_space(space_id(space)?));
        }
        Command::ClearTodos(space) => {
            spawn(&spawner, dispatcher.clear_todos(space_id(space)?));
        }
        Command::ClearAll => spawn(&spawner, dispatcher.clear_all_spaces()),
        Command::Persist(Some(enabled)) => dispatcher.set_persistence_enabled(enabled),
        Command::Persist(None) => {
            dispatcher.toggle_persistence();
        }
        Command::List => print!("{}", render::render(&state, dispatcher.persistence_enabled())),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn spawn<F>(spawner: &LocalSpawner, action: F)
where
    F: Future<Output = DispatchOutcome> + 'static,
{
    if let Err(err) = spawner.spawn_local(async move {
        action.await;
    }) {
        warn!("event=cli_spawn module=cli status=error error={err}");
    }
}
