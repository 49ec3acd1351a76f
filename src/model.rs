use serde::Deserialize;

/// Body of the archives endpoint: `{"archives": ["…/games/2021/03", …]}`.
#[derive(Debug, Deserialize)]
pub struct ArchivesResponse {
    pub archives: Vec<String>,
}

/// Body of a monthly archive: `{"games": [ … ]}`.
#[derive(Debug, Deserialize)]
pub struct GamesResponse {
    pub games: Vec<Game>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Player {
    pub username: String,
    /// Rating after the game finished.
    pub rating: i32,
    #[serde(default)]
    pub result: String,
    #[serde(rename = "@id", default)]
    pub profile: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Game {
    pub white: Player,
    pub black: Player,
    pub end_time: i64,
    #[serde(default)]
    pub start_time: Option<i64>,
    pub time_class: String,
    #[serde(default)]
    pub time_control: Option<String>,
    #[serde(default)]
    pub rules: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub fen: Option<String>,
    #[serde(default)]
    pub pgn: Option<String>,
}

impl Game {
    /// Rating of `user` after this game, or `None` if they did not play in it.
    /// Usernames compare case-insensitively.
    pub fn rating_for(&self, user: &str) -> Option<i32> {
        if self.white.username.eq_ignore_ascii_case(user) {
            Some(self.white.rating)
        } else if self.black.username.eq_ignore_ascii_case(user) {
            Some(self.black.rating)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_JSON: &str = r#"{
        "url": "https://www.chess.com/game/live/1",
        "pgn": "[Event \"Live Chess\"]",
        "time_control": "180",
        "end_time": 1660000000,
        "rated": true,
        "fen": "8/8/8/8/8/8/8/8 w - -",
        "time_class": "blitz",
        "rules": "chess",
        "white": {"rating": 1500, "result": "win", "@id": "https://api.chess.com/pub/player/alice", "username": "Alice"},
        "black": {"rating": 1480, "result": "resigned", "@id": "https://api.chess.com/pub/player/bob", "username": "bob"}
    }"#;

    #[test]
    fn decodes_game_and_ignores_unknown_fields() {
        let game: Game = serde_json::from_str(GAME_JSON).unwrap();
        assert_eq!(game.end_time, 1_660_000_000);
        assert_eq!(game.start_time, None);
        assert_eq!(game.time_class, "blitz");
        assert_eq!(game.white.profile.as_deref(), Some("https://api.chess.com/pub/player/alice"));
    }

    #[test]
    fn rating_lookup_is_case_insensitive() {
        let game: Game = serde_json::from_str(GAME_JSON).unwrap();
        assert_eq!(game.rating_for("alice"), Some(1500));
        assert_eq!(game.rating_for("BOB"), Some(1480));
        assert_eq!(game.rating_for("carol"), None);
    }

    #[test]
    fn decodes_archive_list() {
        let body = r#"{"archives": ["https://api.chess.com/pub/player/alice/games/2022/07"]}"#;
        let list: ArchivesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(list.archives.len(), 1);
    }
}
