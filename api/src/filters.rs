//! Caller-supplied query filters, validated before any request is built.

use crate::client::{ApiError, ApiResult};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// A Stats API game type code: a single uppercase letter.
/// "R" regular season, "S" spring training, "F"/"D"/"L"/"W" postseason rounds, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameType(char);

impl GameType {
    pub const REGULAR_SEASON: GameType = GameType('R');
    pub const SPRING_TRAINING: GameType = GameType('S');

    pub fn code(self) -> char {
        self.0
    }
}

impl FromStr for GameType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => Ok(GameType(c)),
            _ => Err(ApiError::InvalidInput {
                param: "game_type",
                message: format!("{s:?} is not a single uppercase game type code"),
            }),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a list of game type codes, failing on the first malformed entry.
pub fn parse_game_types<S: AsRef<str>>(codes: &[S]) -> ApiResult<Vec<GameType>> {
    let types = codes
        .iter()
        .map(|c| c.as_ref().parse::<GameType>())
        .collect::<ApiResult<Vec<_>>>()?;
    require_non_empty("game_type", &types)?;
    Ok(types)
}

pub fn validate_years(years: &[i32]) -> ApiResult<()> {
    require_non_empty("year", years)?;
    if let Some(bad) = years.iter().find(|y| !(1..=9999).contains(*y)) {
        return Err(ApiError::InvalidInput {
            param: "year",
            message: format!("{bad} is not a four-digit season"),
        });
    }
    Ok(())
}

pub fn validate_sport_ids(sport_ids: &[u32]) -> ApiResult<()> {
    require_non_empty("sport_id", sport_ids)?;
    if sport_ids.contains(&0) {
        return Err(ApiError::InvalidInput {
            param: "sport_id",
            message: "sport ids start at 1".into(),
        });
    }
    Ok(())
}

pub fn validate_game_types(game_types: &[GameType]) -> ApiResult<()> {
    require_non_empty("game_type", game_types)
}

fn require_non_empty<T>(param: &'static str, values: &[T]) -> ApiResult<()> {
    if values.is_empty() {
        return Err(ApiError::InvalidInput { param, message: "must contain at least one value".into() });
    }
    Ok(())
}

/// Strict `YYYY-MM-DD`. chrono alone accepts single-digit months and days.
pub fn parse_iso_date(param: &'static str, value: &str) -> ApiResult<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(ApiError::InvalidInput {
            param,
            message: format!("{value} is not in YYYY-MM-DD format"),
        });
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| ApiError::InvalidInput {
        param,
        message: format!("{value} is not a valid date: {e}"),
    })
}

/// Resolve an optional date window, defaulting to the whole calendar season.
pub fn season_window(
    season: i32,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> ApiResult<(NaiveDate, NaiveDate)> {
    validate_years(&[season])?;
    let start = match start_date {
        Some(s) => parse_iso_date("start_date", s)?,
        None => parse_iso_date("start_date", &format!("{season:04}-01-01"))?,
    };
    let end = match end_date {
        Some(s) => parse_iso_date("end_date", s)?,
        None => parse_iso_date("end_date", &format!("{season:04}-12-31"))?,
    };
    if start > end {
        return Err(ApiError::InvalidInput {
            param: "start_date",
            message: format!("{start} is after end_date {end}"),
        });
    }
    Ok((start, end))
}

/// Filters for a player's game log.
#[derive(Debug, Clone)]
pub struct PlayerGamesQuery<'a> {
    pub player_id: i64,
    pub season: i32,
    /// `YYYY-MM-DD`; defaults to January 1st of `season`.
    pub start_date: Option<&'a str>,
    /// `YYYY-MM-DD`; defaults to December 31st of `season`.
    pub end_date: Option<&'a str>,
    pub sport_id: u32,
    pub game_types: Vec<GameType>,
    /// Pitching game log when true, hitting otherwise.
    pub pitching: bool,
}

impl PlayerGamesQuery<'_> {
    pub fn new(player_id: i64, season: i32) -> Self {
        Self {
            player_id,
            season,
            start_date: None,
            end_date: None,
            sport_id: 1,
            game_types: vec![GameType::REGULAR_SEASON],
            pitching: true,
        }
    }

    pub fn group(&self) -> &'static str {
        if self.pitching { "pitching" } else { "hitting" }
    }
}

/// Comma-join query values the way the Stats API expects them.
pub fn join<T: fmt::Display>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}
