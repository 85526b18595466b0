use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    time::Duration,
};

use thiserror::Error;

use crate::{
    data::CharacterClass,
    session::{Direction, Session, Snapshot},
};

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("could not read script '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: unknown command '{word}'")]
    UnknownCommand { line: usize, word: String },

    #[error("line {line}: {message}")]
    BadArgument { line: usize, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SelectClass(CharacterClass),
    Move { direction: Direction, times: u32 },
    Attack,
    Flee,
    Use(usize),
    /// Let time pass; `None` waits exactly one counter-attack delay.
    Wait(Option<Duration>),
    Restart,
    Dump,
}

pub struct ScriptedInput {
    script_commands: Vec<Command>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let io_error = |source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let mut script_commands = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(io_error)?;
            if let Some(command) = parse_line(idx + 1, &line)? {
                script_commands.push(command);
            }
        }
        Ok(Self::new(script_commands))
    }

    pub fn parse(script: &str) -> Result<Self, ScriptError> {
        let mut script_commands = Vec::new();
        for (idx, line) in script.lines().enumerate() {
            if let Some(command) = parse_line(idx + 1, line)? {
                script_commands.push(command);
            }
        }
        Ok(Self::new(script_commands))
    }

    fn new(script_commands: Vec<Command>) -> Self {
        Self {
            script_commands,
            current_command_index: 0,
        }
    }

    pub fn next_command(&mut self) -> Option<Command> {
        let command = self.script_commands.get(self.current_command_index)?.clone();
        self.current_command_index += 1;
        Some(command)
    }

    pub fn len(&self) -> usize {
        self.script_commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script_commands.is_empty()
    }

    /// Feeds every remaining command to `session`, collecting one snapshot per `dump`.
    pub fn run(&mut self, session: &mut Session) -> Vec<Snapshot> {
        let mut dumps = Vec::new();
        while let Some(command) = self.next_command() {
            if let Some(snapshot) = apply(session, &command) {
                dumps.push(snapshot);
            }
        }
        dumps
    }
}

fn parse_line(line_no: usize, raw: &str) -> Result<Option<Command>, ScriptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut words = trimmed.split_whitespace();
    let word = words.next().unwrap_or_default().to_ascii_lowercase();
    let arg = words.next();
    let bad = |message: String| ScriptError::BadArgument {
        line: line_no,
        message,
    };

    let command = match word.as_str() {
        "class" => {
            let raw_class = arg.ok_or_else(|| bad("class needs a name".to_string()))?;
            let class = CharacterClass::parse(raw_class)
                .ok_or_else(|| bad(format!("unknown class '{raw_class}'")))?;
            Command::SelectClass(class)
        }
        "move" => {
            let raw_dir = arg.ok_or_else(|| bad("move needs a direction".to_string()))?;
            let direction = Direction::parse(raw_dir)
                .ok_or_else(|| bad(format!("unknown direction '{raw_dir}'")))?;
            let times = match words.next() {
                Some(count) => count
                    .parse::<u32>()
                    .map_err(|_| bad(format!("bad repeat count '{count}'")))?,
                None => 1,
            };
            Command::Move { direction, times }
        }
        "attack" => Command::Attack,
        "flee" => Command::Flee,
        "use" => {
            let raw_idx = arg.ok_or_else(|| bad("use needs an inventory index".to_string()))?;
            let index = raw_idx
                .parse::<usize>()
                .map_err(|_| bad(format!("bad inventory index '{raw_idx}'")))?;
            Command::Use(index)
        }
        "wait" => match arg {
            Some(ms) => {
                let ms = ms
                    .parse::<u64>()
                    .map_err(|_| bad(format!("bad wait duration '{ms}'")))?;
                Command::Wait(Some(Duration::from_millis(ms)))
            }
            None => Command::Wait(None),
        },
        "restart" => Command::Restart,
        "dump" => Command::Dump,
        other => {
            return Err(ScriptError::UnknownCommand {
                line: line_no,
                word: other.to_string(),
            });
        }
    };
    Ok(Some(command))
}

pub fn apply(session: &mut Session, command: &Command) -> Option<Snapshot> {
    match command {
        Command::SelectClass(class) => session.select_class(*class),
        Command::Move { direction, times } => {
            for _ in 0..*times {
                session.step(*direction);
            }
        }
        Command::Attack => {
            session.attack();
        }
        Command::Flee => {
            session.flee();
        }
        Command::Use(index) => {
            session.use_item(*index);
        }
        Command::Wait(duration) => {
            let elapsed = duration.unwrap_or_else(|| session.config().counter_delay());
            session.tick(elapsed);
        }
        Command::Restart => session.restart(),
        Command::Dump => return Some(session.snapshot()),
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GameConfig, session::Phase};

    #[test]
    fn parses_commands_and_skips_comments() {
        let script = "\
# pick a class
class mage

move up 3
move left
attack
wait
wait 250
use 0
flee
dump
restart
";
        let mut input = ScriptedInput::parse(script).expect("valid script");
        assert_eq!(input.len(), 10);
        assert_eq!(
            input.next_command(),
            Some(Command::SelectClass(CharacterClass::Mage))
        );
        assert_eq!(
            input.next_command(),
            Some(Command::Move {
                direction: Direction::Up,
                times: 3
            })
        );
        assert_eq!(
            input.next_command(),
            Some(Command::Move {
                direction: Direction::Left,
                times: 1
            })
        );
        assert_eq!(input.next_command(), Some(Command::Attack));
        assert_eq!(input.next_command(), Some(Command::Wait(None)));
        assert_eq!(
            input.next_command(),
            Some(Command::Wait(Some(Duration::from_millis(250))))
        );
        assert_eq!(input.next_command(), Some(Command::Use(0)));
        assert_eq!(input.next_command(), Some(Command::Flee));
        assert_eq!(input.next_command(), Some(Command::Dump));
        assert_eq!(input.next_command(), Some(Command::Restart));
        assert_eq!(input.next_command(), None);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = ScriptedInput::parse("class thief\n\ndance")
            .err()
            .expect("error");
        assert_eq!(err.to_string(), "line 3: unknown command 'dance'");

        let err = ScriptedInput::parse("move sideways").err().expect("error");
        assert!(matches!(err, ScriptError::BadArgument { line: 1, .. }));

        let err = ScriptedInput::parse("class bard").err().expect("error");
        assert!(err.to_string().contains("bard"));

        let err = ScriptedInput::parse("use first").err().expect("error");
        assert!(matches!(err, ScriptError::BadArgument { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ScriptedInput::from_file("/no/such/script.txt")
            .err()
            .expect("error");
        assert!(matches!(err, ScriptError::Io { .. }));
    }

    #[test]
    fn run_collects_dumps() {
        let mut session = Session::new(GameConfig::default(), 77);
        let mut input =
            ScriptedInput::parse("dump\nclass warrior\nmove down 2\ndump\nrestart\ndump")
                .expect("valid script");
        let dumps = input.run(&mut session);
        assert_eq!(dumps.len(), 3);
        assert_eq!(dumps[0].phase, Phase::ChoosingClass);
        assert_eq!(dumps[1].class, Some(CharacterClass::Warrior));
        assert_eq!(dumps[2].phase, Phase::ChoosingClass);
        assert!(dumps[2].obstacles.is_empty());
    }
}
