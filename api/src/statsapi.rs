//! Serde shapes for statsapi.mlb.com responses.
//! Mapped to flat rows in client.rs and flatten.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Schedule  (/api/v1/schedule)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleDate {
    #[serde(default)]
    pub games: Vec<ScheduleGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    pub game_pk: Option<i64>,
    pub game_date: Option<String>, // ISO 8601, UTC
    pub official_date: Option<String>,
    pub teams: Option<ScheduleTeams>,
    pub status: Option<ScheduleStatus>,
    pub venue: Option<NamedRef>,
    pub gameday_type: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleTeams {
    pub away: Option<ScheduleSide>,
    pub home: Option<ScheduleSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleSide {
    pub team: Option<NamedRef>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatus {
    pub coded_game_state: Option<String>,
}

/// `{ "id": 1, "name": "..." }`, the reference shape used all over the API.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct NamedRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Reference data  (/api/v1/teams, /leagues, /sports, /gameTypes)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<StatsTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsTeam {
    pub id: Option<i64>,
    pub name: Option<String>,          // "Arizona Diamondbacks"
    pub team_name: Option<String>,     // "D-backs"
    pub franchise_name: Option<String>, // "Arizona"
    pub abbreviation: Option<String>,
    pub parent_org_id: Option<i64>,
    pub parent_org_name: Option<String>,
    pub league: Option<NamedRef>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LeaguesResponse {
    #[serde(default)]
    pub leagues: Vec<StatsLeague>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StatsLeague {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub sport: Option<NamedRef>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SportsResponse {
    #[serde(default)]
    pub sports: Vec<StatsSport>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsSport {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub sort_order: Option<i64>,
    pub active_status: Option<bool>,
}

/// `/gameTypes` is a bare array, unlike every other reference endpoint.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(transparent)]
pub struct GameTypesResponse(pub Vec<StatsGameType>);

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StatsGameType {
    pub id: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// People  (/api/v1/sports/{id}/players, /api/v1/people/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PeopleResponse {
    #[serde(default)]
    pub people: Vec<StatsPerson>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsPerson {
    pub id: Option<i64>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub use_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_position: Option<Position>,
    pub current_team: Option<NamedRef>,
    pub weight: Option<i64>,
    pub height: Option<String>, // "6' 2\""
    pub current_age: Option<i64>,
    pub birth_date: Option<String>,
    /// Only present when the request hydrates `stats(...)`.
    pub stats: Option<Vec<StatGroup>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Position {
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StatGroup {
    #[serde(default)]
    pub splits: Vec<StatSplit>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StatSplit {
    pub game: Option<SplitGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SplitGame {
    pub game_pk: Option<i64>,
}

// ---------------------------------------------------------------------------
// Live game feed  (/api/v1.1/game/{gamePk}/feed/live)
//
// Only `gamePk`, `gameData.datetime.officialDate`, `liveData.plays.allPlays`
// and each at-bat's `about.isTopInning` are required; a feed missing any of
// them does not decode and is skipped by the flattener.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameFeed {
    pub game_pk: i64,
    pub game_data: GameData,
    pub live_data: LiveData,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GameData {
    pub datetime: GameDateTime,
    #[serde(default)]
    pub teams: GameTeams,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameDateTime {
    pub official_date: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameTeams {
    pub away: Option<FeedTeam>,
    pub home: Option<FeedTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FeedTeam {
    pub id: Option<i64>,
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LiveData {
    pub plays: Plays,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Plays {
    pub all_plays: Vec<AtBat>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AtBat {
    pub at_bat_index: Option<i64>,
    pub about: About,
    pub matchup: Option<Matchup>,
    pub result: Option<AtBatResult>,
    #[serde(default)]
    pub play_events: Vec<PlayEvent>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub is_top_inning: bool,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub batter: Option<FeedPerson>,
    pub bat_side: Option<CodeRef>,
    pub pitcher: Option<FeedPerson>,
    pub pitch_hand: Option<CodeRef>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeedPerson {
    pub id: Option<i64>,
    pub full_name: Option<String>,
}

/// `{ "code": "R", "description": "Right" }`
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CodeRef {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AtBatResult {
    #[serde(rename = "type")]
    pub result_type: Option<String>,
    pub event: Option<String>,
    pub event_type: Option<String>,
    pub rbi: Option<i64>,
    pub away_score: Option<i64>,
    pub home_score: Option<i64>,
    pub is_out: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    pub is_pitch: Option<bool>,
    pub details: Option<EventDetails>,
    pub count: Option<Count>,
    pub pitch_number: Option<i64>,
    pub pitch_data: Option<PitchData>,
    pub hit_data: Option<HitData>,
    pub index: Option<i64>,
    pub play_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>, // "pitch", "action", "pickoff", ...
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub description: Option<String>,
    pub code: Option<String>,
    pub call: Option<CodeRef>,
    pub is_in_play: Option<bool>,
    pub is_strike: Option<bool>,
    pub is_ball: Option<bool>,
    pub is_out: Option<bool>,
    pub has_review: Option<bool>,
    #[serde(rename = "type")]
    pub pitch_type: Option<CodeRef>,
}

/// Balls/strikes/outs *after* the event.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct Count {
    pub balls: Option<i64>,
    pub strikes: Option<i64>,
    pub outs: Option<i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PitchData {
    pub start_speed: Option<f64>,
    pub end_speed: Option<f64>,
    pub strike_zone_top: Option<f64>,
    pub strike_zone_bottom: Option<f64>,
    pub coordinates: Option<PitchCoordinates>,
    pub breaks: Option<PitchBreaks>,
    pub zone: Option<i64>,
    pub type_confidence: Option<f64>,
    pub plate_time: Option<f64>,
    pub extension: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PitchCoordinates {
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(rename = "aX")]
    pub ax: Option<f64>,
    #[serde(rename = "aY")]
    pub ay: Option<f64>,
    #[serde(rename = "aZ")]
    pub az: Option<f64>,
    #[serde(rename = "pfxX")]
    pub pfx_x: Option<f64>,
    #[serde(rename = "pfxZ")]
    pub pfx_z: Option<f64>,
    #[serde(rename = "pX")]
    pub px: Option<f64>,
    #[serde(rename = "pZ")]
    pub pz: Option<f64>,
    #[serde(rename = "vX0")]
    pub vx0: Option<f64>,
    #[serde(rename = "vY0")]
    pub vy0: Option<f64>,
    #[serde(rename = "vZ0")]
    pub vz0: Option<f64>,
    pub x0: Option<f64>,
    pub y0: Option<f64>,
    pub z0: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PitchBreaks {
    pub spin_rate: Option<f64>,
    pub spin_direction: Option<f64>,
    pub break_vertical: Option<f64>,
    pub break_vertical_induced: Option<f64>,
    pub break_horizontal: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HitData {
    pub launch_speed: Option<f64>,
    pub launch_angle: Option<f64>,
    pub total_distance: Option<f64>,
    pub location: Option<String>, // fielder position number, sent as a string
    pub trajectory: Option<String>,
    pub hardness: Option<String>,
    pub coordinates: Option<HitCoordinates>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HitCoordinates {
    pub coord_x: Option<f64>,
    pub coord_y: Option<f64>,
}
