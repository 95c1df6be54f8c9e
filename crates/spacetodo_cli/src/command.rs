//! Line command grammar.
//!
//! Indices are 1-based positions in the rendered listing.

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddSpace(String),
    AddTodo { space: usize, text: String },
    Toggle { space: usize, todo: usize },
    Edit { space: usize, todo: usize, text: String },
    DeleteTodo { space: usize, todo: usize },
    DeleteSpace(usize),
    ClearTodos(usize),
    ClearAll,
    Persist(Option<bool>),
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  space <name>                 add a space
  todo <space> <text>          add a todo to a space
  toggle <space> <todo>        flip a todo's completed flag
  edit <space> <todo> <text>   replace a todo's text
  rm <space> <todo>            delete a todo
  rmspace <space>              delete a space
  clear <space>                delete every todo in a space
  clearall                     delete every space
  persist [on|off]             toggle or set local persistence
  list                         show all spaces
  help                         show this help
  quit                         exit";

/// Parses one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = split_word(line);

    let command = match verb {
        "space" => Command::AddSpace(rest.to_string()),
        "todo" => {
            let (space, text) = split_index(rest)?;
            Command::AddTodo {
                space,
                text: text.to_string(),
            }
        }
        "toggle" => {
            let (space, todo) = two_indices(rest)?;
            Command::Toggle { space, todo }
        }
        "edit" => {
            let (space, rest) = split_index(rest)?;
            let (todo, text) = split_index(rest)?;
            Command::Edit {
                space,
                todo,
                text: text.to_string(),
            }
        }
        "rm" => {
            let (space, todo) = two_indices(rest)?;
            Command::DeleteTodo { space, todo }
        }
        "rmspace" => Command::DeleteSpace(single_index(rest)?),
        "clear" => Command::ClearTodos(single_index(rest)?),
        "clearall" => Command::ClearAll,
        "persist" => match rest {
            "" => Command::Persist(None),
            "on" => Command::Persist(Some(true)),
            "off" => Command::Persist(Some(false)),
            other => return Err(format!("expected `on` or `off`, got `{other}`")),
        },
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(Some(command))
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

fn split_index(input: &str) -> Result<(usize, &str), String> {
    let (word, rest) = split_word(input);
    Ok((parse_index(word)?, rest))
}

fn single_index(input: &str) -> Result<usize, String> {
    let (index, rest) = split_index(input)?;
    if !rest.is_empty() {
        return Err(format!("unexpected trailing input `{rest}`"));
    }
    Ok(index)
}

fn two_indices(input: &str) -> Result<(usize, usize), String> {
    let (first, rest) = split_index(input)?;
    Ok((first, single_index(rest)?))
}

fn parse_index(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(format!("expected a positive index, got `{word}`")),
    }
}
