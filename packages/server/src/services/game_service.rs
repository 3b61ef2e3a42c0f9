use chrono::Utc;
use log::{debug, info, warn};

use super::announcements;
use super::message_queue::OutboundMessageQueue;
use super::session_registry::SessionRegistry;
use crate::models::{
    channel::ChannelDirectory,
    command::{self, CommandKind, ParsedCommand},
    config::BotConfig,
    error::GameError,
    game::{EndVoteOutcome, Game, LynchOutcome, StartOutcome},
    message::{InboundMessage, OutboundMessage},
    phase::GamePhase,
    vote::VoteTarget,
};
use crate::state::{save_or_log, snapshot_of, AppState};

/// Handles one inbound chat message and persists the result.
///
/// Returns the messages to send right away (direct replies, channel sends and role
/// PMs). Notifications that must respect the platform's rate limit are pushed onto
/// the outbound queue instead.
pub async fn handle_message(state: &AppState, message: InboundMessage) -> Vec<OutboundMessage> {
    let mut channels = state.channels.lock().await;
    let mut sessions = state.sessions.lock().await;
    let mut outbound = state.outbound.lock().await;

    let direct = CommandContext {
        config: &*state.config,
        channels: &mut *channels,
        sessions: &mut *sessions,
        message: &message,
        out: Output {
            message: &message,
            direct: Vec::new(),
            outbound: &mut *outbound,
        },
    }
    .process();

    let data = snapshot_of(&channels, &sessions, &outbound);
    save_or_log(state.store.as_ref(), &data);
    direct
}

/// Collects what a command says back.
struct Output<'a> {
    message: &'a InboundMessage,
    direct: Vec<OutboundMessage>,
    outbound: &'a mut OutboundMessageQueue,
}

impl Output<'_> {
    /// Immediate reply mentioning the author.
    fn reply(&mut self, content: impl AsRef<str>) {
        self.direct
            .push(OutboundMessage::reply_to(self.message, content));
    }

    /// Immediate message to the command's channel.
    fn send(&mut self, content: impl Into<String>) {
        self.direct
            .push(OutboundMessage::new(self.message.channel_id.clone(), content));
    }

    fn send_to(&mut self, channel_id: &str, content: impl Into<String>) {
        self.direct.push(OutboundMessage::new(channel_id, content));
    }

    /// Rate-limited message to the command's channel.
    fn queue(&mut self, content: impl Into<String>) {
        self.outbound.push(&self.message.channel_id, content);
    }

    fn queue_reply(&mut self, content: impl AsRef<str>) {
        self.outbound
            .enqueue(OutboundMessage::reply_to(self.message, content));
    }

    fn no_game(&mut self) {
        let content = format!(
            "There's no game currently running in <#{}>!",
            self.message.channel_id
        );
        self.reply(content);
    }
}

struct CommandContext<'a> {
    config: &'a BotConfig,
    channels: &'a mut ChannelDirectory,
    sessions: &'a mut SessionRegistry,
    message: &'a InboundMessage,
    out: Output<'a>,
}

impl CommandContext<'_> {
    fn process(mut self) -> Vec<OutboundMessage> {
        if let Some(command) = command::parse(&self.message.content, &self.config.command_prefix) {
            self.dispatch(command);
        }

        if self.message.is_private
            && self
                .channels
                .link_pm(&self.message.author_id, &self.message.channel_id)
        {
            info!("Linked private channel for {}", self.message.author_id);
            self.out.reply(
                "Thanks for the one-time private message to open a direct channel of communication between us! You can join and play mafia games on this server.",
            );
        }

        self.out.direct
    }

    fn prefix(&self) -> &str {
        &self.config.command_prefix
    }

    fn dispatch(&mut self, command: ParsedCommand) {
        let spec = command.kind.spec();
        if spec.admin_only && !self.config.is_admin(&self.message.author_id) {
            let content = format!(
                "You must be an admin to perform command *{}*!",
                self.message.content
            );
            self.out.reply(content);
            return;
        }
        if spec.activated_only && !self.channels.is_activated(&self.message.channel_id) {
            debug!(
                "Ignoring {:?} in inactive channel {}",
                command.kind, self.message.channel_id
            );
            return;
        }

        debug!(
            "{:?} from {} in {}",
            command.kind, self.message.author_id, self.message.channel_id
        );
        match command.kind {
            CommandKind::Help => {
                let content = announcements::help(self.prefix());
                self.out.reply(content);
            }
            CommandKind::Admins => {
                let content = format!(
                    "Admins of MafiaBot:{}",
                    announcements::list_users(self.config.admins.iter().map(String::as_str))
                );
                self.out.send(content);
            }
            CommandKind::Host => self.show_host(),
            CommandKind::Players => self.show_players(),
            CommandKind::Activate => self.activate(),
            CommandKind::Deactivate => self.deactivate(),
            CommandKind::CreateGame => self.create_game(),
            CommandKind::EndGame => self.end_game(),
            CommandKind::StartGame => self.start_game(),
            CommandKind::Join => self.join(),
            CommandKind::Unjoin => self.unjoin(),
            CommandKind::Confirm => self.confirm(),
            CommandKind::Vote => self.vote(command.arg(1).unwrap_or_default()),
            CommandKind::NoLynch => self.no_lynch(),
            CommandKind::Unvote => self.unvote(),
        }
    }

    fn show_host(&mut self) {
        match self.sessions.find(&self.message.channel_id) {
            Some(game) => {
                let content = format!("Host of current game in channel:\n{}", game.host_mention());
                self.out.send(content);
            }
            None => self.out.no_game(),
        }
    }

    fn show_players(&mut self) {
        match self.sessions.find(&self.message.channel_id) {
            Some(game) => self.out.queue(announcements::current_players(game)),
            None => self.out.no_game(),
        }
    }

    fn activate(&mut self) {
        let channel_id = &self.message.channel_id;
        if self.channels.activate(channel_id) {
            info!("Activated {}", channel_id);
            self.out.reply(format!(
                "MafiaBot has been activated in *<#{}>*! Use *{}creategame* to start playing some mafia!",
                channel_id, self.config.command_prefix
            ));
        } else {
            self.out.reply(format!(
                "MafiaBot is already activated in *<#{}>*! Use *{}deactivatemafia* to deactivate MafiaBot on this channel.",
                channel_id, self.config.command_prefix
            ));
        }
    }

    fn deactivate(&mut self) {
        let channel_id = &self.message.channel_id;
        if self.channels.deactivate(channel_id) {
            info!("Deactivated {}", channel_id);
            self.out.reply(format!(
                "MafiaBot has been deactivated in *<#{}>*!",
                channel_id
            ));
        } else {
            self.out.reply(format!(
                "MafiaBot is not activate in *<#{}>*! Use *{}activatemafia* to activate MafiaBot on this channel.",
                channel_id, self.config.command_prefix
            ));
        }
    }

    fn create_game(&mut self) {
        let channel_id = &self.message.channel_id;
        match self.sessions.create(channel_id, &self.message.author_id) {
            Ok(game) => {
                let content = format!(
                    "Starting a game of mafia in <#{}> hosted by {}!",
                    channel_id,
                    game.host_mention()
                );
                self.out.send(content);
            }
            Err(_) => {
                let host = self
                    .sessions
                    .find(channel_id)
                    .map(Game::host_mention)
                    .unwrap_or_default();
                self.out.reply(format!(
                    "A game is already running in <#{}> hosted by {}!",
                    channel_id, host
                ));
            }
        }
    }

    fn end_game(&mut self) {
        let author_id = &self.message.author_id;
        let Some(game) = self.sessions.find_mut(&self.message.channel_id) else {
            return self.out.no_game();
        };
        let host = game.host_mention();

        let ended_by = if game.is_host(author_id) {
            format!("Host <@{}>", author_id)
        } else if self.config.is_admin(author_id) {
            format!("Admin <@{}>", author_id)
        } else {
            match game.vote_to_end(author_id) {
                Ok(EndVoteOutcome::Pending { votes, remaining }) => {
                    self.out.reply(format!(
                        "You voted to end the current game hosted by {}!",
                        host
                    ));
                    self.out.send(format!(
                        "There are currently {} to end the current game hosted by {}. {} remaining!",
                        announcements::plural(votes, "vote"),
                        host,
                        announcements::plural(remaining, "vote")
                    ));
                    return;
                }
                Ok(EndVoteOutcome::Passed { .. }) => {
                    self.out.reply(format!(
                        "You voted to end the current game hosted by {}!",
                        host
                    ));
                    "A majority vote of the players".to_string()
                }
                Err(GameError::AlreadyVoted) => {
                    return self.out.reply(format!(
                        "We already know you want to end the current game hosted by {}!",
                        host
                    ));
                }
                Err(_) => {
                    return self
                        .out
                        .reply("Only admins, hosts, and joined players can end a game!");
                }
            }
        };

        self.sessions.destroy(&self.message.channel_id);
        self.out.send(format!(
            "{} ended game of mafia in <#{}> hosted by {}! 😥",
            ended_by, self.message.channel_id, host
        ));
    }

    fn start_game(&mut self) {
        let channel_id = &self.message.channel_id;
        let prefix = &self.config.command_prefix;
        let Some(game) = self.sessions.find_mut(channel_id) else {
            return self.out.no_game();
        };

        match game.start(&self.message.author_id) {
            Ok(StartOutcome::RolesSent) => {
                let host = game.host_mention();
                self.out.queue(format!(
                    "Sending out roles for game of mafia hosted by {}! Check your PMs for info and type **{}confirm** in this channel to confirm your role.",
                    host, prefix
                ));
                self.out.queue(announcements::current_players(game));
                for player in game.players.iter() {
                    let Some(pm_channel) = self.channels.pm_channel(&player.id) else {
                        warn!("No private channel for {}, role not sent", player.id);
                        continue;
                    };
                    self.out.send_to(
                        pm_channel,
                        format!(
                            "Your role is ______. Type **{}confirm** in <#{}> to confirm your participation in the game of mafia hosted by {}.",
                            prefix, channel_id, host
                        ),
                    );
                }
            }
            Ok(StartOutcome::DayStarted) => {
                self.out.queue(format!(
                    "All players have confirmed and host {} is now starting the game of mafia!",
                    game.host_mention()
                ));
                self.out.queue(announcements::current_players(game));
                if let Some(banner) = announcements::day_state(game, prefix) {
                    self.out.queue(banner);
                }
            }
            Err(GameError::NotHost) => self.out.reply("Only hosts can start the game!"),
            Err(GameError::EmptyRoster) => self
                .out
                .reply("You need at least one player to start the game!"),
            Err(e) => debug!("startgame ignored in {}: {}", channel_id, e),
        }
    }

    fn join(&mut self) {
        let author_id = &self.message.author_id;
        let Some(game) = self.sessions.find_mut(&self.message.channel_id) else {
            return self.out.no_game();
        };
        if !game.phase.accepts_roster_changes() {
            return self
                .out
                .reply("The current game is already going, so the player list is locked!");
        }
        if self.channels.pm_channel(author_id).is_none() {
            return self.out.reply(
                "You need to send me a private message to open up a direct channel of communication between us before you can join a game!",
            );
        }

        match game.join(author_id, &self.message.author_name) {
            Ok(()) => {
                self.out.queue(format!(
                    "<@{}> joined the current game hosted by {}!",
                    author_id,
                    game.host_mention()
                ));
                self.out.queue(announcements::current_players(game));
            }
            Err(_) => self.out.reply(format!(
                "You are already in the current game hosted by {}!",
                game.host_mention()
            )),
        }
    }

    fn unjoin(&mut self) {
        let author_id = &self.message.author_id;
        let Some(game) = self.sessions.find_mut(&self.message.channel_id) else {
            return self.out.no_game();
        };
        if !game.phase.accepts_roster_changes() {
            return self
                .out
                .reply("The current game is already starting, so the player list is locked!");
        }

        match game.leave(author_id) {
            Ok(()) => {
                self.out.queue(format!(
                    "<@{}> left the current game hosted by {}!",
                    author_id,
                    game.host_mention()
                ));
                self.out.queue(announcements::current_players(game));
            }
            Err(_) => self.out.reply(format!(
                "You are not currently in the current game hosted by {}!",
                game.host_mention()
            )),
        }
    }

    fn confirm(&mut self) {
        let Some(game) = self.sessions.find_mut(&self.message.channel_id) else {
            return;
        };
        match game.confirm(&self.message.author_id) {
            Ok(_) => {
                self.out.queue_reply(format!(
                    "Thanks for confirming for the current game hosted by {}!",
                    game.host_mention()
                ));
                self.out.queue(announcements::unconfirmed_players(
                    game,
                    &self.config.command_prefix,
                ));
            }
            Err(e) => debug!("confirm ignored: {}", e),
        }
    }

    fn vote(&mut self, reference: &str) {
        let prefix = self.config.command_prefix.clone();
        let author_id = self.message.author_id.clone();
        let Some(game) = voting_game(self.sessions, self.message) else {
            return;
        };

        let target_id = game.players.find_by_reference(reference).map(|p| p.id.clone());
        match target_id {
            None => self
                .out
                .reply(format!("'{}' is not a valid vote target!", reference)),
            Some(target_id) => {
                match game.cast_vote(&author_id, VoteTarget::Player(target_id.clone()), Utc::now()) {
                    Ok(cast) => {
                        self.out
                            .queue(format!("<@{}> voted to lynch <@{}>!", author_id, target_id));
                        if let Some(lynch) = cast.lynch {
                            announce_lynch(&mut self.out, game, &lynch, &prefix);
                        }
                    }
                    Err(GameError::DeadTarget) => self.out.reply(format!(
                        "You can't vote for the dead player {}!",
                        reference
                    )),
                    Err(GameError::SelfVote) => self.out.reply("You can't vote for yourself!"),
                    Err(e) => self.out.reply(format!("{}!", e)),
                }
            }
        }

        if let Some(votes) = announcements::current_votes(game, &prefix) {
            self.out.queue(votes);
        }
    }

    fn no_lynch(&mut self) {
        let prefix = self.config.command_prefix.clone();
        let author_id = self.message.author_id.clone();
        let Some(game) = voting_game(self.sessions, self.message) else {
            return;
        };

        match game.cast_vote(&author_id, VoteTarget::NoLynch, Utc::now()) {
            Ok(cast) => {
                self.out
                    .queue(format!("<@{}> voted to No Lynch!", author_id));
                if let Some(lynch) = cast.lynch {
                    announce_lynch(&mut self.out, game, &lynch, &prefix);
                }
            }
            Err(e) => debug!("nolynch ignored: {}", e),
        }
    }

    fn unvote(&mut self) {
        let prefix = self.config.command_prefix.clone();
        let author_id = self.message.author_id.clone();
        let Some(game) = voting_game(self.sessions, self.message) else {
            return;
        };

        let removed = match game.unvote(&author_id) {
            Ok(removed) => removed,
            Err(e) => {
                debug!("unvote ignored: {}", e);
                return;
            }
        };
        let target = removed
            .map(|vote| format!(" {}", vote.target))
            .unwrap_or_else(|| "... nothing".to_string());
        self.out
            .queue(format!("<@{}> unvoted{}!", author_id, target));
        if let Some(votes) = announcements::current_votes(game, &prefix) {
            self.out.queue(votes);
        }
    }
}

/// The game in the message's channel if it is DAY and the author may vote in it.
fn voting_game<'s>(
    sessions: &'s mut SessionRegistry,
    message: &InboundMessage,
) -> Option<&'s mut Game> {
    let game = sessions.find_mut(&message.channel_id)?;
    if game.phase != GamePhase::Day || !game.players.is_alive(&message.author_id) {
        return None;
    }
    Some(game)
}

fn announce_lynch(out: &mut Output<'_>, game: &Game, lynch: &LynchOutcome, prefix: &str) {
    for line in announcements::lynch_result(lynch) {
        out.queue(line);
    }
    out.queue(announcements::alive_players(game));
    if let Some(banner) = announcements::day_state(game, prefix) {
        out.queue(banner);
    }
}
