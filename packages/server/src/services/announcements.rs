//! Plain-text notifications posted into game channels.

use crate::models::{
    command::COMMANDS,
    game::{Game, LynchOutcome},
    phase::GamePhase,
    vote::VoteTarget,
};

pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Numbered list of mentions, one per line.
pub fn list_users<'a>(user_ids: impl IntoIterator<Item = &'a str>) -> String {
    user_ids
        .into_iter()
        .enumerate()
        .map(|(i, id)| format!("\n{}. <@{}>", i + 1, id))
        .collect()
}

pub fn current_players(game: &Game) -> String {
    format!(
        "Currently {} in game hosted by {}:{}",
        plural(game.players.len(), "player"),
        game.host_mention(),
        list_users(game.players.iter().map(|p| p.id.as_str()))
    )
}

pub fn unconfirmed_players(game: &Game, prefix: &str) -> String {
    let unconfirmed: Vec<&str> = game.players.unconfirmed().map(|p| p.id.as_str()).collect();
    if unconfirmed.is_empty() {
        return format!("All players confirmed for game hosted by {}!", game.host_mention());
    }
    format!(
        "{} still must {}confirm for game hosted by {}:{}",
        plural(unconfirmed.len(), "player"),
        prefix,
        game.host_mention(),
        list_users(unconfirmed)
    )
}

pub fn alive_players(game: &Game) -> String {
    format!(
        "Currently {} alive in game hosted by {}:{}",
        plural(game.players.count_alive(), "player"),
        game.host_mention(),
        list_users(game.players.alive().map(|p| p.id.as_str()))
    )
}

fn vote_header(game: &Game, prefix: &str) -> String {
    format!(
        "**{} alive, {} to lynch!**\nUse {p}vote, {p}NL, and {p}unvote commands to vote.",
        game.players.count_alive(),
        game.majority_to_lynch(),
        p = prefix
    )
}

/// "DAY n" banner. Nothing before the first day.
pub fn day_state(game: &Game, prefix: &str) -> Option<String> {
    if game.day == 0 {
        return None;
    }
    let period = if game.phase == GamePhase::Day {
        "DAY"
    } else {
        "NIGHT"
    };
    Some(format!(
        "It is currently **{} {}** in game hosted by {}!\n{}",
        period,
        game.day,
        game.host_mention(),
        vote_header(game, prefix)
    ))
}

/// Vote counts per target, largest first; voters listed oldest vote first.
pub fn current_votes(game: &Game, prefix: &str) -> Option<String> {
    if game.day == 0 {
        return None;
    }
    let mut groups = game.votes.groups();
    groups.sort_by(|a, b| b.votes.len().cmp(&a.votes.len()));

    let mut output = vote_header(game, prefix);
    for mut group in groups {
        group.votes.sort_by_key(|vote| vote.time);
        let voters: Vec<String> = group
            .votes
            .iter()
            .map(|vote| format!("<@{}>", vote.voter_id))
            .collect();
        output.push_str(&format!(
            "\n({}) {}: {}",
            group.votes.len(),
            group.target,
            voters.join(", ")
        ));
    }
    Some(output)
}

pub fn lynch_result(outcome: &LynchOutcome) -> Vec<String> {
    let mut lines = vec![
        "**STOP! STOP! STOP! STOP! STOP! STOP! STOP! STOP!**".to_string(),
        "**STOP! STOP! STOP! STOP! STOP! STOP! STOP! STOP!**".to_string(),
        "**!! *NO TALKING AT NIGHT* !!**".to_string(),
    ];
    match &outcome.target {
        VoteTarget::NoLynch => lines.push("No one was lynched.".to_string()),
        VoteTarget::Player(id) => lines.push(format!("<@{}> was lynched.", id)),
    }
    lines.push("**It is now night.**".to_string());
    lines
}

pub fn help(prefix: &str) -> String {
    let mut output = "\nType one of the following commands to interact with MafiaBot:".to_string();
    for spec in COMMANDS {
        output.push_str(&format!(
            "\n**{}{}** - {}{}{}",
            prefix,
            spec.aliases.join("/"),
            spec.description,
            if spec.admin_only { " - *Admin Only*" } else { "" },
            if spec.activated_only {
                " - *Activated Channel Only*"
            } else {
                ""
            }
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn game_in_day() -> Game {
        let mut game = Game::new("chan".to_string(), "host".to_string());
        for id in ["1", "2", "3", "4", "5"] {
            game.join(id, id).unwrap();
        }
        game.start("host").unwrap();
        for id in ["1", "2", "3", "4", "5"] {
            game.confirm(id).unwrap();
        }
        game.start("host").unwrap();
        game
    }

    #[test]
    fn plural_and_lists() {
        assert_eq!(plural(1, "player"), "1 player");
        assert_eq!(plural(0, "vote"), "0 votes");
        assert_eq!(list_users(["a", "b"]), "\n1. <@a>\n2. <@b>");
    }

    #[test]
    fn day_state_is_hidden_before_the_game_starts() {
        let game = Game::new("chan".to_string(), "host".to_string());
        assert!(day_state(&game, "##").is_none());
        assert!(current_votes(&game, "##").is_none());

        let game = game_in_day();
        let banner = day_state(&game, "##").unwrap();
        assert!(banner.starts_with("It is currently **DAY 1** in game hosted by <@host>!"));
        assert!(banner.contains("**5 alive, 3 to lynch!**"));
    }

    #[test]
    fn votes_are_listed_by_count_then_time() {
        let mut game = game_in_day();
        let t0 = Utc::now();
        game.cast_vote("1", VoteTarget::NoLynch, t0).unwrap();
        game.cast_vote("3", VoteTarget::Player("4".to_string()), t0 + Duration::seconds(2))
            .unwrap();
        game.cast_vote("2", VoteTarget::Player("4".to_string()), t0 + Duration::seconds(1))
            .unwrap();

        let output = current_votes(&game, "##").unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[2], "(2) <@4>: <@2>, <@3>");
        assert_eq!(lines[3], "(1) No Lynch: <@1>");
    }

    #[test]
    fn unconfirmed_list_names_outstanding_players() {
        let mut game = Game::new("chan".to_string(), "host".to_string());
        game.join("1", "one").unwrap();
        game.join("2", "two").unwrap();
        game.start("host").unwrap();
        game.confirm("1").unwrap();
        assert_eq!(
            unconfirmed_players(&game, "##"),
            "1 player still must ##confirm for game hosted by <@host>:\n1. <@2>"
        );
        game.confirm("2").unwrap();
        assert_eq!(
            unconfirmed_players(&game, "##"),
            "All players confirmed for game hosted by <@host>!"
        );
    }

    #[test]
    fn help_marks_restricted_commands() {
        let text = help("##");
        assert!(text.contains("**##activatemafia** - Activate MafiaBot on this channel - *Admin Only*"));
        assert!(text.contains("**##join/in** - Join the game in this channel as a player - *Activated Channel Only*"));
    }
}
