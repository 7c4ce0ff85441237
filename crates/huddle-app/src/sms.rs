//! Invite SMS body construction.

use huddle_core::Teamname;

/// Build the SMS body for a phone invite.
///
/// The token is 18 characters; the message without the team name is 118
/// characters. Names up to 33 characters are used whole; longer names are
/// pre-ellipsized to their last 30 characters so the body stays within one
/// message segment.
pub fn generate_sms_body(teamname: &Teamname, seitan: &str) -> String {
    let name = teamname.as_str();
    let team_or_subteam = if teamname.is_subteam() { "subteam" } else { "team" };
    let team = if name.chars().count() <= 33 {
        format!("{name} {team_or_subteam}")
    } else {
        let tail: String = {
            let chars: Vec<char> = name.chars().collect();
            chars[chars.len() - 30..].iter().collect()
        };
        format!("..{tail} subteam")
    };
    format!(
        "Join the {team} on Keybase. Copy this message into the \"Teams\" tab.\n\ntoken: {}\n\ninstall: keybase.io/_/go",
        seitan.to_lowercase()
    )
}
