use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Admins,
    Host,
    Players,
    Activate,
    Deactivate,
    CreateGame,
    EndGame,
    StartGame,
    Join,
    Unjoin,
    Confirm,
    Vote,
    NoLynch,
    Unvote,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub admin_only: bool,
    pub activated_only: bool,
    /// Runs when the prefix is present but no alias matches.
    pub is_default: bool,
}

static HELP: CommandSpec = CommandSpec {
    kind: CommandKind::Help,
    aliases: &["commands", "help", "wut"],
    description: "Show list of commands",
    admin_only: false,
    activated_only: false,
    is_default: false,
};

static ADMINS: CommandSpec = CommandSpec {
    kind: CommandKind::Admins,
    aliases: &["admin", "admins"],
    description: "Show list of admins for MafiaBot",
    admin_only: false,
    activated_only: false,
    is_default: false,
};

static HOST: CommandSpec = CommandSpec {
    kind: CommandKind::Host,
    aliases: &["host", "hosts"],
    description: "Show host of current game in channel",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

static PLAYERS: CommandSpec = CommandSpec {
    kind: CommandKind::Players,
    aliases: &["player", "players"],
    description: "Show current list of players of game in channel",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

static ACTIVATE: CommandSpec = CommandSpec {
    kind: CommandKind::Activate,
    aliases: &["activatemafia"],
    description: "Activate MafiaBot on this channel",
    admin_only: true,
    activated_only: false,
    is_default: false,
};

static DEACTIVATE: CommandSpec = CommandSpec {
    kind: CommandKind::Deactivate,
    aliases: &["deactivatemafia"],
    description: "Deactivate MafiaBot on this channel",
    admin_only: true,
    activated_only: false,
    is_default: false,
};

static CREATE_GAME: CommandSpec = CommandSpec {
    kind: CommandKind::CreateGame,
    aliases: &["creategame"],
    description: "Create a game in this channel and become the host",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

static END_GAME: CommandSpec = CommandSpec {
    kind: CommandKind::EndGame,
    aliases: &["endgame"],
    description: "Current host, admin, or majority of players can end the game in this channel",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

static START_GAME: CommandSpec = CommandSpec {
    kind: CommandKind::StartGame,
    aliases: &["startgame"],
    description: "Current host can start game with current list of players",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

static JOIN: CommandSpec = CommandSpec {
    kind: CommandKind::Join,
    aliases: &["join", "in"],
    description: "Join the game in this channel as a player",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

static UNJOIN: CommandSpec = CommandSpec {
    kind: CommandKind::Unjoin,
    aliases: &["unjoin", "out", "leave"],
    description: "Leave the game in this channel, if you were joined",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

static CONFIRM: CommandSpec = CommandSpec {
    kind: CommandKind::Confirm,
    aliases: &["confirm"],
    description: "Confirm your role and your participation in the game",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

static VOTE: CommandSpec = CommandSpec {
    kind: CommandKind::Vote,
    aliases: &["vote", "lynch"],
    description: "Vote to lynch a player",
    admin_only: false,
    activated_only: true,
    is_default: true,
};

static NO_LYNCH: CommandSpec = CommandSpec {
    kind: CommandKind::NoLynch,
    aliases: &["nl", "nolynch"],
    description: "Vote for no lynch today",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

static UNVOTE: CommandSpec = CommandSpec {
    kind: CommandKind::Unvote,
    aliases: &["unvote", "unlynch", "un"],
    description: "Remove your vote to lynch a player",
    admin_only: false,
    activated_only: true,
    is_default: false,
};

/// Every command the bot understands, in help/declaration order.
pub static COMMANDS: &[&CommandSpec] = &[
    &HELP,
    &ADMINS,
    &HOST,
    &PLAYERS,
    &ACTIVATE,
    &DEACTIVATE,
    &CREATE_GAME,
    &END_GAME,
    &START_GAME,
    &JOIN,
    &UNJOIN,
    &CONFIRM,
    &VOTE,
    &NO_LYNCH,
    &UNVOTE,
];

// Lowercased alias -> command. On a duplicate alias the earlier declaration wins.
static ALIASES: Lazy<HashMap<String, CommandKind>> = Lazy::new(|| {
    let mut aliases = HashMap::new();
    for spec in COMMANDS {
        for alias in spec.aliases {
            aliases.entry(alias.to_lowercase()).or_insert(spec.kind);
        }
    }
    aliases
});

impl CommandKind {
    pub fn spec(&self) -> &'static CommandSpec {
        match self {
            CommandKind::Help => &HELP,
            CommandKind::Admins => &ADMINS,
            CommandKind::Host => &HOST,
            CommandKind::Players => &PLAYERS,
            CommandKind::Activate => &ACTIVATE,
            CommandKind::Deactivate => &DEACTIVATE,
            CommandKind::CreateGame => &CREATE_GAME,
            CommandKind::EndGame => &END_GAME,
            CommandKind::StartGame => &START_GAME,
            CommandKind::Join => &JOIN,
            CommandKind::Unjoin => &UNJOIN,
            CommandKind::Confirm => &CONFIRM,
            CommandKind::Vote => &VOTE,
            CommandKind::NoLynch => &NO_LYNCH,
            CommandKind::Unvote => &UNVOTE,
        }
    }

    pub fn from_alias(alias: &str) -> Option<CommandKind> {
        ALIASES.get(&alias.to_lowercase()).copied()
    }
}

pub fn default_command() -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.is_default).copied()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    /// `args[0]` is the command name without prefix, `args[1..]` its arguments.
    pub args: Vec<String>,
}

impl ParsedCommand {
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

fn tokenize(content: &str) -> Vec<String> {
    content
        .split(|c| c == ' ' || c == ':')
        .map(str::to_string)
        .collect()
}

fn strip_prefix(token: &mut String, prefix: &str) {
    *token = token.get(prefix.len()..).unwrap_or_default().to_string();
}

/// Parses a chat message into a command. Returns `None` when the message does not
/// start with `prefix`.
pub fn parse(content: &str, prefix: &str) -> Option<ParsedCommand> {
    if !content.to_lowercase().starts_with(&prefix.to_lowercase()) {
        return None;
    }

    let mut args = tokenize(content);
    strip_prefix(&mut args[0], prefix);
    if let Some(kind) = CommandKind::from_alias(&args[0]) {
        return Some(ParsedCommand { kind, args });
    }

    // "##bob" is handed to the default command as ["", "bob"].
    let spec = default_command()?;
    let mut args = vec![String::new()];
    args.extend(tokenize(content));
    strip_prefix(&mut args[1], prefix);
    Some(ParsedCommand {
        kind: spec.kind,
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_case_insensitive_exact_matches() {
        let parsed = parse("##IN", "##").unwrap();
        assert_eq!(parsed.kind, CommandKind::Join);
        assert_eq!(CommandKind::from_alias("unlynch"), Some(CommandKind::Unvote));
        assert_eq!(CommandKind::from_alias("un"), Some(CommandKind::Unvote));
        // "inn" is not "in"
        assert_eq!(CommandKind::from_alias("inn"), None);
    }

    #[test]
    fn arguments_split_on_space_and_colon() {
        let parsed = parse("##vote bob:now", "##").unwrap();
        assert_eq!(parsed.kind, CommandKind::Vote);
        assert_eq!(parsed.args, vec!["vote", "bob", "now"]);
        assert_eq!(parsed.arg(1), Some("bob"));
    }

    #[test]
    fn unknown_command_falls_back_to_vote() {
        let parsed = parse("##bob", "##").unwrap();
        assert_eq!(parsed.kind, CommandKind::Vote);
        assert_eq!(parsed.args, vec!["", "bob"]);
        assert_eq!(parsed.arg(1), Some("bob"));
    }

    #[test]
    fn messages_without_prefix_are_ignored() {
        assert!(parse("vote bob", "##").is_none());
        assert!(parse("#vote bob", "##").is_none());
    }

    #[test]
    fn exactly_one_default_command() {
        assert_eq!(COMMANDS.iter().filter(|c| c.is_default).count(), 1);
        assert_eq!(default_command().unwrap().kind, CommandKind::Vote);
    }

    #[test]
    fn aliases_are_unique_and_every_kind_has_a_spec() {
        let total: usize = COMMANDS.iter().map(|c| c.aliases.len()).sum();
        assert_eq!(ALIASES.len(), total);
        for spec in COMMANDS {
            assert_eq!(spec.kind.spec().kind, spec.kind);
        }
    }

    #[test]
    fn spec_lookup_matches_declared_flags() {
        assert!(CommandKind::Vote.spec().is_default);
        assert!(CommandKind::Activate.spec().admin_only);
        assert!(!CommandKind::Help.spec().activated_only);
        assert_eq!(CommandKind::NoLynch.spec().aliases, &["nl", "nolynch"]);
    }
}
