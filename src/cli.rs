use std::path::PathBuf;

use crate::app::{RunOptions, DEFAULT_COLUMN};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run {
        options: RunOptions,
        output_dir: Option<PathBuf>,
    },
    Board {
        board_id: Option<String>,
    },
    Lists {
        board_id: Option<String>,
    },
    Cards {
        list_id: Option<String>,
    },
    Validate,
    Show {
        path: PathBuf,
    },
    Help,
}

/// Parse everything after the program name.
///
/// Supported forms:
///   storyboard
///   storyboard run -b 8LzvPIxy -c "In Progress" -o out
///   storyboard board --board 8LzvPIxy
///   storyboard lists
///   storyboard cards <list-id>
///   storyboard validate
///   storyboard show temp/user_stories_20240301_120000.json
pub fn parse_args(args: &[String]) -> Result<Command> {
    let (sub, rest) = match args.first().map(String::as_str) {
        None => ("run", &args[..]),
        Some(first) if first.starts_with('-') && !is_help(first) => ("run", &args[..]),
        Some(first) => (first, &args[1..]),
    };

    match sub {
        "run" => parse_run(rest),
        "board" => Ok(Command::Board {
            board_id: parse_board_only(rest)?,
        }),
        "lists" => Ok(Command::Lists {
            board_id: parse_board_only(rest)?,
        }),
        "cards" => match rest {
            [] => Ok(Command::Cards { list_id: None }),
            [id] => Ok(Command::Cards {
                list_id: Some(id.clone()),
            }),
            _ => Err(usage(format!("Unexpected arguments: {}", rest[1..].join(" ")))),
        },
        "validate" => {
            no_extra(rest)?;
            Ok(Command::Validate)
        }
        "show" => match rest {
            [path] => Ok(Command::Show {
                path: PathBuf::from(path),
            }),
            [] => Err(usage("Missing path to a saved user_stories file".into())),
            _ => Err(usage(format!("Unexpected arguments: {}", rest[1..].join(" ")))),
        },
        s if is_help(s) => Ok(Command::Help),
        other => Err(usage(format!("Unknown command: {other}"))),
    }
}

fn is_help(arg: &str) -> bool {
    matches!(arg, "help" | "-h" | "--help")
}

fn usage(msg: String) -> Error {
    Error::config(format!("{msg}\n\nRun `storyboard help` for usage."))
}

fn no_extra(rest: &[String]) -> Result<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(usage(format!("Unexpected arguments: {}", rest.join(" "))))
    }
}

const FLAGS: &[&str] = &["-b", "--board", "-c", "--column", "-o", "--out", "-h", "--help"];

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a String> {
    args.get(i)
        .filter(|v| !FLAGS.contains(&v.as_str()))
        .ok_or_else(|| usage(format!("Missing value for {flag}")))
}

fn parse_run(args: &[String]) -> Result<Command> {
    let mut options = RunOptions::default();
    let mut output_dir = None;
    let mut i = 0;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-b" | "--board" => {
                i += 1;
                options.board_id = Some(flag_value(args, i, flag)?.clone());
            }
            "-c" | "--column" => {
                i += 1;
                let column = flag_value(args, i, flag)?;
                if column.trim().is_empty() {
                    return Err(usage("Column name cannot be empty".into()));
                }
                options.column = column.clone();
            }
            "-o" | "--out" => {
                i += 1;
                output_dir = Some(PathBuf::from(flag_value(args, i, flag)?));
            }
            other => return Err(usage(format!("Unexpected argument: {other}"))),
        }
        i += 1;
    }

    Ok(Command::Run {
        options,
        output_dir,
    })
}

fn parse_board_only(args: &[String]) -> Result<Option<String>> {
    match args {
        [] => Ok(None),
        [flag, rest @ ..] if flag == "-b" || flag == "--board" => {
            let id = flag_value(args, 1, flag)?.clone();
            no_extra(&rest[1..])?;
            Ok(Some(id))
        }
        _ => Err(usage(format!("Unexpected arguments: {}", args.join(" ")))),
    }
}

pub fn print_help() {
    println!("storyboard — turn the card you're working on into user stories\n");
    println!("USAGE:");
    println!("  storyboard [run] [OPTIONS]   Generate user stories for the first card in a column");
    println!("  storyboard board [-b ID]     Print the board grouped by list, as JSON");
    println!("  storyboard lists [-b ID]     Print the board's open lists");
    println!("  storyboard cards <LIST_ID>   Print the open cards of one list");
    println!("  storyboard validate          Check the Trello credentials");
    println!("  storyboard show <FILE>       Print a saved user_stories_*.json file");
    println!();
    println!("RUN OPTIONS:");
    println!("  -b, --board <ID>     Board to read (default: TRELLO_BOARD_ID)");
    println!("  -c, --column <NAME>  Column to take the card from (default: {DEFAULT_COLUMN})");
    println!("  -o, --out <DIR>      Where to write user_stories_*.json (default: temp)");
    println!();
    println!("ENVIRONMENT:");
    println!("  TRELLO_API_KEY, TRELLO_TOKEN, TRELLO_BOARD_ID");
    println!("  OPENAI_API_KEY, OPENAI_MODEL, OPENAI_MAX_TOKENS, STORYBOARD_OUTPUT_DIR");
    println!("  Also read from .env and ~/.storyboard/config.toml");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_runs_with_defaults() {
        let cmd = parse_args(&args(&[])).unwrap();
        assert_eq!(
            cmd,
            Command::Run {
                options: RunOptions::default(),
                output_dir: None,
            }
        );
    }

    #[test]
    fn run_flags_without_subcommand() {
        let cmd = parse_args(&args(&["-b", "8LzvPIxy", "--column", "In Progress"])).unwrap();
        match cmd {
            Command::Run {
                options,
                output_dir,
            } => {
                assert_eq!(options.board_id.as_deref(), Some("8LzvPIxy"));
                assert_eq!(options.column, "In Progress");
                assert_eq!(output_dir, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn run_with_output_dir() {
        let cmd = parse_args(&args(&["run", "-o", "stories"])).unwrap();
        match cmd {
            Command::Run { output_dir, options } => {
                assert_eq!(output_dir, Some(PathBuf::from("stories")));
                assert_eq!(options.column, "Doing");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_flag_value_fails() {
        let err = parse_args(&args(&["run", "-b"])).unwrap_err();
        assert!(err.to_string().contains("Missing value for -b"));

        let err = parse_args(&args(&["run", "-c", "-o", "x"])).unwrap_err();
        assert!(err.to_string().contains("Missing value for -c"));
    }

    #[test]
    fn dash_prefixed_column_is_a_value() {
        let cmd = parse_args(&args(&["run", "-c", "-WIP", "-b", "-x1"])).unwrap();
        match cmd {
            Command::Run { options, .. } => {
                assert_eq!(options.column, "-WIP");
                assert_eq!(options.board_id.as_deref(), Some("-x1"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_column_fails() {
        let err = parse_args(&args(&["run", "--column", " "])).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn board_and_lists() {
        assert_eq!(
            parse_args(&args(&["board"])).unwrap(),
            Command::Board { board_id: None }
        );
        assert_eq!(
            parse_args(&args(&["lists", "--board", "abc"])).unwrap(),
            Command::Lists {
                board_id: Some("abc".into())
            }
        );
        assert!(parse_args(&args(&["board", "abc"])).is_err());
        assert!(parse_args(&args(&["board", "-b", "abc", "extra"])).is_err());
    }

    #[test]
    fn cards_takes_optional_list_id() {
        assert_eq!(
            parse_args(&args(&["cards", "list1"])).unwrap(),
            Command::Cards {
                list_id: Some("list1".into())
            }
        );
        assert_eq!(
            parse_args(&args(&["cards"])).unwrap(),
            Command::Cards { list_id: None }
        );
        assert!(parse_args(&args(&["cards", "a", "b"])).is_err());
    }

    #[test]
    fn validate_and_help() {
        assert_eq!(parse_args(&args(&["validate"])).unwrap(), Command::Validate);
        for h in ["help", "-h", "--help"] {
            assert_eq!(parse_args(&args(&[h])).unwrap(), Command::Help);
        }
    }

    #[test]
    fn show_requires_a_path() {
        assert_eq!(
            parse_args(&args(&["show", "temp/a.json"])).unwrap(),
            Command::Show {
                path: PathBuf::from("temp/a.json")
            }
        );
        assert!(parse_args(&args(&["show"])).is_err());
    }

    #[test]
    fn unknown_command_is_config_error() {
        let err = parse_args(&args(&["deploy"])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("Unknown command: deploy"));
    }

    #[test]
    fn unicode_column() {
        let cmd = parse_args(&args(&["-c", "En cours 🚧"])).unwrap();
        match cmd {
            Command::Run { options, .. } => assert_eq!(options.column, "En cours 🚧"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
