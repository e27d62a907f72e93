use crate::bdfed::{BdfedPlayer, BdfedStatsResponse};
use crate::filters::{self, GameType, PlayerGamesQuery};
use crate::flatten::flatten;
use crate::statsapi::{
    GameTypesResponse, LeaguesResponse, PeopleResponse, ScheduleResponse, SportsResponse,
    StatsPerson, StatsTeam, TeamsResponse,
};
use crate::table::Table;
use crate::{GameTypeRow, LeagueRow, PlayerRow, ScheduleRow, SportRow, TeamRow};
use chrono::{DateTime, NaiveDate};
use chrono_tz::US::Eastern;
use futures_util::stream::{self, StreamExt};
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const STATS_API: &str = "https://statsapi.mlb.com";
pub const BDFED_API: &str = "https://bdfed.stitch.mlbinfra.com";
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// MLB Stats API client.
#[derive(Debug, Clone)]
pub struct MlbApi {
    client: Client,
    timeout: Duration,
    stats_url: String,
    bdfed_url: String,
    concurrency: usize,
}

impl Default for MlbApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("mlbscrape/0.1 (stats scraper)")
                .build()
                .unwrap_or_default(),
            timeout: DEFAULT_TIMEOUT,
            stats_url: STATS_API.to_owned(),
            bdfed_url: BDFED_API.to_owned(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// Caller-supplied filter rejected before any request was made.
    InvalidInput { param: &'static str, message: String },
    /// The query was accepted but matched nothing.
    NoData(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::InvalidInput { param, message } => write!(f, "Invalid {param}: {message}"),
            ApiError::NoData(msg) => write!(f, "No data: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            _ => None,
        }
    }
}

impl ApiError {
    pub fn is_no_data(&self) -> bool {
        matches!(self, ApiError::NoData(_))
    }
}

impl MlbApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at different hosts (mirrors, test servers).
    pub fn with_base_urls(mut self, stats_url: &str, bdfed_url: &str) -> Self {
        self.stats_url = stats_url.trim_end_matches('/').to_owned();
        self.bdfed_url = bdfed_url.trim_end_matches('/').to_owned();
        self
    }

    /// Maximum number of game feeds fetched at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch the schedule for the given seasons, sports and game types.
    ///
    /// Returns [`ApiError::NoData`] when the query matches no games, so callers
    /// can tell an empty schedule apart from a failed request.
    pub async fn schedule(
        &self,
        years: &[i32],
        sport_ids: &[u32],
        game_types: &[GameType],
    ) -> ApiResult<Table> {
        filters::validate_years(years)?;
        filters::validate_sport_ids(sport_ids)?;
        filters::validate_game_types(game_types)?;

        let url = format!(
            "{}/api/v1/schedule/?sportId={}&gameTypes={}&season={}&hydrate=lineup,players",
            self.stats_url,
            filters::join(sport_ids),
            filters::join(game_types),
            filters::join(years),
        );
        let raw: ScheduleResponse = self.get(&url).await?;
        let rows = map_schedule(raw);
        if rows.is_empty() {
            return Err(ApiError::NoData(format!(
                "schedule length of 0 for season {} / sport {} / game type {}, please select different parameters",
                filters::join(years),
                filters::join(sport_ids),
                filters::join(game_types),
            )));
        }
        Ok(Table::from_rows(&rows))
    }

    /// Fetch one raw live game feed.
    pub async fn fetch_feed(&self, game_id: i64) -> ApiResult<Value> {
        let url = format!("{}/api/v1.1/game/{game_id}/feed/live", self.stats_url);
        self.fetch(&url).await
    }

    /// Fetch live feeds for many games, at most `concurrency` at a time.
    ///
    /// Completion order is arbitrary. A game whose fetch fails is logged and left out.
    pub async fn fetch_feeds(&self, game_ids: &[i64]) -> Vec<Value> {
        let total = game_ids.len();
        info!("fetching {total} game feeds, {} at a time", self.concurrency);

        let mut fetches = stream::iter(game_ids.iter().copied())
            .map(|game_id| async move { (game_id, self.fetch_feed(game_id).await) })
            .buffer_unordered(self.concurrency);

        let mut feeds = Vec::with_capacity(total);
        let mut completed = 0;
        while let Some((game_id, result)) = fetches.next().await {
            completed += 1;
            match result {
                Ok(feed) => feeds.push(feed),
                Err(e) => warn!("game {game_id} unavailable: {e}"),
            }
            debug!("feeds fetched: {completed}/{total}");
        }
        info!("fetched {}/{total} game feeds", feeds.len());
        feeds
    }

    /// Fetch and flatten the given games into the pitch-level event table.
    pub async fn game_events(&self, game_ids: &[i64]) -> Table {
        let feeds = self.fetch_feeds(game_ids).await;
        flatten(&feeds)
    }

    pub async fn teams(&self) -> ApiResult<Table> {
        let url = format!("{}/api/v1/teams/", self.stats_url);
        let raw: TeamsResponse = self.get(&url).await?;
        let rows = map_teams(raw.teams);
        if rows.is_empty() {
            return Err(ApiError::NoData("no teams returned".into()));
        }
        Ok(Table::from_rows(&rows))
    }

    pub async fn leagues(&self) -> ApiResult<Table> {
        let url = format!("{}/api/v1/leagues/", self.stats_url);
        let raw: LeaguesResponse = self.get(&url).await?;
        let rows: Vec<LeagueRow> = raw
            .leagues
            .into_iter()
            .map(|l| LeagueRow {
                league_id: l.id,
                league_name: l.name,
                league_abbreviation: l.abbreviation,
                sport_id: l.sport.and_then(|s| s.id),
            })
            .collect();
        if rows.is_empty() {
            return Err(ApiError::NoData("no leagues returned".into()));
        }
        Ok(Table::from_rows(&rows))
    }

    pub async fn sports(&self) -> ApiResult<Table> {
        let rows = self.sport_rows().await?;
        Ok(Table::from_rows(&rows))
    }

    /// Whether `sport_id` is one the API knows about. Logs the valid ids when it is not.
    pub async fn sport_id_check(&self, sport_id: u32) -> ApiResult<bool> {
        let rows = self.sport_rows().await?;
        let known = rows.iter().any(|s| s.sport_id == Some(i64::from(sport_id)));
        if !known {
            let ids: Vec<String> = rows
                .iter()
                .filter_map(|s| Some(format!("{} ({})", s.sport_id?, s.name.as_deref().unwrap_or("?"))))
                .collect();
            warn!("unknown sport id {sport_id}; select one of: {}", ids.join(", "));
        }
        Ok(known)
    }

    async fn sport_rows(&self) -> ApiResult<Vec<SportRow>> {
        let url = format!("{}/api/v1/sports", self.stats_url);
        let raw: SportsResponse = self.get(&url).await?;
        let rows: Vec<SportRow> = raw
            .sports
            .into_iter()
            .map(|s| SportRow {
                sport_id: s.id,
                code: s.code,
                name: s.name,
                abbreviation: s.abbreviation,
                sort_order: s.sort_order,
                active: s.active_status,
            })
            .collect();
        if rows.is_empty() {
            return Err(ApiError::NoData("no sports returned".into()));
        }
        Ok(rows)
    }

    pub async fn game_types(&self) -> ApiResult<Table> {
        let url = format!("{}/api/v1/gameTypes", self.stats_url);
        let raw: GameTypesResponse = self.get(&url).await?;
        let rows: Vec<GameTypeRow> = raw
            .0
            .into_iter()
            .map(|t| GameTypeRow { id: t.id, description: t.description })
            .collect();
        if rows.is_empty() {
            return Err(ApiError::NoData("no game types returned".into()));
        }
        Ok(Table::from_rows(&rows))
    }

    /// Players for a sport and season.
    ///
    /// Spring training (`[S]` alone) is not served by the people endpoint; those
    /// rosters come from the season stats feed, pitchers and hitters merged.
    pub async fn players(&self, sport_id: u32, season: i32, game_types: &[GameType]) -> ApiResult<Table> {
        filters::validate_sport_ids(&[sport_id])?;
        filters::validate_years(&[season])?;
        filters::validate_game_types(game_types)?;

        let rows = if game_types == [GameType::SPRING_TRAINING] {
            let mut players = Vec::new();
            for (group, sort) in [("pitching", "&sortStat=inningsPitched&order=asc"), ("hitting", "")] {
                let url = format!(
                    "{}/bdfed/stats/player?&env=prod&season={season}&sportId={sport_id}&stats=season&group={group}&gameType=S&limit=1000000&offset=0{sort}",
                    self.bdfed_url
                );
                let raw: BdfedStatsResponse = self.get(&url).await?;
                players.extend(raw.stats);
            }
            map_spring_players(players)
        } else {
            let url = format!(
                "{}/api/v1/sports/{sport_id}/players?season={season}&gameType=[{}]",
                self.stats_url,
                filters::join(game_types)
            );
            let raw: PeopleResponse = self.get(&url).await?;
            raw.people.into_iter().map(map_person).collect()
        };

        if rows.is_empty() {
            return Err(ApiError::NoData(format!(
                "no players for sport {sport_id} in season {season} ({})",
                filters::join(game_types)
            )));
        }
        Ok(Table::from_rows(&rows))
    }

    /// Game ids from a player's pitching or hitting game log.
    pub async fn player_game_ids(&self, query: &PlayerGamesQuery<'_>) -> ApiResult<Vec<i64>> {
        let (start, end) = filters::season_window(query.season, query.start_date, query.end_date)?;
        filters::validate_sport_ids(&[query.sport_id])?;
        filters::validate_game_types(&query.game_types)?;

        let group = query.group();
        let url = format!(
            "{}/api/v1/people/{}?hydrate=stats(group={group},type=gameLog,season={},startDate={start},endDate={end},sportId={},gameType=[{}]),hydrations",
            self.stats_url,
            query.player_id,
            query.season,
            query.sport_id,
            filters::join(&query.game_types),
        );
        let raw: PeopleResponse = self.get(&url).await?;

        let splits = raw
            .people
            .into_iter()
            .next()
            .and_then(|p| p.stats)
            .and_then(|groups| groups.into_iter().next())
            .map(|g| g.splits)
            .unwrap_or_default();
        let game_ids: Vec<i64> = splits.iter().filter_map(|s| s.game.as_ref()?.game_pk).collect();

        if game_ids.is_empty() {
            return Err(ApiError::NoData(format!(
                "no {group} games found for player {} in season {}",
                query.player_id, query.season
            )));
        }
        Ok(game_ids)
    }

    /// GET a URL and decode the body as untyped JSON.
    pub async fn fetch(&self, url: &str) -> ApiResult<Value> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                // The API answers malformed filters with 4xx; treat that as an empty result.
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: Stats API wire types → flat rows
// ---------------------------------------------------------------------------

fn map_schedule(raw: ScheduleResponse) -> Vec<ScheduleRow> {
    let mut seen = HashSet::new();
    let mut rows: Vec<ScheduleRow> = raw
        .dates
        .into_iter()
        .flat_map(|d| d.games)
        .filter(|g| seen.insert(g.game_pk))
        .map(|g| {
            let teams = g.teams.unwrap_or_default();
            let away = teams.away.and_then(|s| s.team).unwrap_or_default();
            let home = teams.home.and_then(|s| s.team).unwrap_or_default();
            let venue = g.venue.unwrap_or_default();
            ScheduleRow {
                game_id: g.game_pk,
                time: g.game_date.as_deref().and_then(eastern_clock),
                date: g
                    .official_date
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
                away: away.name,
                away_id: away.id,
                home: home.name,
                home_id: home.id,
                state: g.status.and_then(|s| s.coded_game_state),
                venue_id: venue.id,
                venue_name: venue.name,
                gameday_type: g.gameday_type,
            }
        })
        .collect();
    rows.sort_by_key(|r| r.date);
    rows
}

/// "2024-03-28T17:05:00Z" → "01:05 PM" (US/Eastern).
fn eastern_clock(game_date: &str) -> Option<String> {
    let utc = DateTime::parse_from_rfc3339(game_date).ok()?;
    Some(utc.with_timezone(&Eastern).format("%I:%M %p").to_string())
}

fn map_teams(raw: Vec<StatsTeam>) -> Vec<TeamRow> {
    let mut seen = HashSet::new();
    let mut rows: Vec<TeamRow> = raw
        .into_iter()
        // Entries without a franchise name are not real clubs (all-star squads etc.).
        .filter(|t| t.franchise_name.is_some() && t.id.is_some())
        .filter(|t| seen.insert(t.id))
        .map(|t| {
            let league = t.league.unwrap_or_default();
            TeamRow {
                team_id: t.id,
                city: t.franchise_name,
                name: t.team_name,
                parent_org_id: t.parent_org_id.or(t.id),
                parent_org: t.parent_org_name.or_else(|| t.name.clone()),
                franchise: t.name,
                abbreviation: t.abbreviation,
                league_id: league.id,
                league_name: league.name,
                parent_org_abbreviation: None,
            }
        })
        .collect();
    rows.sort_by_key(|r| r.team_id);

    let abbreviations: HashMap<i64, String> = rows
        .iter()
        .filter_map(|r| Some((r.team_id?, r.abbreviation.clone()?)))
        .collect();
    for row in &mut rows {
        row.parent_org_abbreviation = row.parent_org_id.and_then(|id| abbreviations.get(&id).cloned());
    }
    rows
}

fn map_person(p: StatsPerson) -> PlayerRow {
    PlayerRow {
        player_id: p.id,
        first_name: p.first_name,
        use_name: p.use_name,
        last_name: p.last_name,
        name: p.full_name,
        position: p.primary_position.and_then(|pos| pos.abbreviation),
        team: p.current_team.and_then(|t| t.id),
        weight: p.weight,
        height: p.height,
        age: p.current_age,
        birth_date: p.birth_date,
    }
}

fn map_spring_players(players: Vec<BdfedPlayer>) -> Vec<PlayerRow> {
    let mut seen = HashSet::new();
    let mut rows: Vec<PlayerRow> = players
        .into_iter()
        .filter(|p| p.player_id.is_some() && seen.insert(p.player_id))
        .map(|p| PlayerRow {
            player_id: p.player_id,
            first_name: p.player_first_name,
            last_name: p.player_last_name,
            name: p.player_full_name,
            position: p.primary_position_abbrev,
            team: p.team_id,
            ..Default::default()
        })
        .collect();
    rows.sort_by_key(|r| r.player_id);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statsapi::{NamedRef, ScheduleDate, ScheduleGame, ScheduleSide, ScheduleTeams};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn api_for(server: &Server) -> MlbApi {
        MlbApi::new().with_base_urls(&server.url(), &server.url()).with_concurrency(2)
    }

    fn team(id: i64, name: &str, franchise: Option<&str>, abbrev: &str, parent: Option<i64>) -> StatsTeam {
        StatsTeam {
            id: Some(id),
            name: Some(name.into()),
            team_name: Some(name.split(' ').next_back().unwrap_or(name).into()),
            franchise_name: franchise.map(Into::into),
            abbreviation: Some(abbrev.into()),
            parent_org_id: parent,
            parent_org_name: parent.map(|_| "Parent Club".into()),
            league: Some(NamedRef { id: Some(103), name: Some("American League".into()) }),
        }
    }

    fn scheduled(game_pk: i64, official_date: &str, game_date: &str) -> ScheduleGame {
        ScheduleGame {
            game_pk: Some(game_pk),
            game_date: Some(game_date.into()),
            official_date: Some(official_date.into()),
            teams: Some(ScheduleTeams {
                away: Some(ScheduleSide { team: Some(NamedRef { id: Some(147), name: Some("New York Yankees".into()) }) }),
                home: Some(ScheduleSide { team: Some(NamedRef { id: Some(111), name: Some("Boston Red Sox".into()) }) }),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn eastern_clock_converts_from_utc() {
        assert_eq!(eastern_clock("2024-03-28T17:05:00Z").as_deref(), Some("01:05 PM"));
        // Standard time: UTC-5.
        assert_eq!(eastern_clock("2024-11-01T23:08:00Z").as_deref(), Some("07:08 PM"));
        assert_eq!(eastern_clock("not a date"), None);
    }

    #[test]
    fn schedule_is_deduplicated_and_sorted_by_date() {
        let raw = ScheduleResponse {
            dates: vec![
                ScheduleDate { games: vec![scheduled(3, "2024-04-02", "2024-04-02T23:05:00Z")] },
                ScheduleDate {
                    games: vec![
                        scheduled(1, "2024-03-28", "2024-03-28T17:05:00Z"),
                        scheduled(3, "2024-04-02", "2024-04-02T23:05:00Z"),
                    ],
                },
            ],
        };
        let rows = map_schedule(raw);
        assert_eq!(rows.iter().map(|r| r.game_id).collect::<Vec<_>>(), vec![Some(1), Some(3)]);
        assert_eq!(rows[0].away.as_deref(), Some("New York Yankees"));
        assert_eq!(rows[0].home_id, Some(111));
        assert_eq!(rows[0].time.as_deref(), Some("01:05 PM"));
        assert!(rows[0].venue_id.is_none());
    }

    #[test]
    fn teams_fill_parent_org_and_join_abbreviation() {
        let rows = map_teams(vec![
            team(4124, "Scranton/Wilkes-Barre RailRiders", Some("Scranton/Wilkes-Barre"), "SWB", Some(147)),
            team(147, "New York Yankees", Some("New York"), "NYY", None),
            team(159, "American League All-Stars", None, "AL", None),
            team(147, "New York Yankees", Some("New York"), "NYY", None),
        ]);
        assert_eq!(rows.len(), 2, "duplicates and franchise-less entries are dropped");
        assert_eq!(rows[0].team_id, Some(147));
        assert_eq!(rows[0].parent_org_id, Some(147));
        assert_eq!(rows[0].parent_org.as_deref(), Some("New York Yankees"));
        assert_eq!(rows[0].parent_org_abbreviation.as_deref(), Some("NYY"));
        assert_eq!(rows[0].city.as_deref(), Some("New York"));
        assert_eq!(rows[0].franchise.as_deref(), Some("New York Yankees"));
        assert_eq!(rows[1].team_id, Some(4124));
        assert_eq!(rows[1].parent_org.as_deref(), Some("Parent Club"));
        assert_eq!(rows[1].parent_org_abbreviation.as_deref(), Some("NYY"));
        assert_eq!(rows[1].league_name.as_deref(), Some("American League"));
    }

    #[test]
    fn spring_players_are_merged_by_id() {
        let player = |id: i64, pos: &str| BdfedPlayer {
            player_id: Some(id),
            player_full_name: Some(format!("Player {id}")),
            primary_position_abbrev: Some(pos.into()),
            team_id: Some(147),
            ..Default::default()
        };
        let rows = map_spring_players(vec![player(9, "P"), player(3, "SS"), player(9, "P"), BdfedPlayer::default()]);
        assert_eq!(rows.iter().map(|r| r.player_id).collect::<Vec<_>>(), vec![Some(3), Some(9)]);
        assert!(rows[0].use_name.is_none() && rows[0].weight.is_none());
    }

    #[tokio::test]
    async fn schedule_with_no_games_is_no_data() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/schedule/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("season".into(), "9999".into()),
                Matcher::UrlEncoded("sportId".into(), "1".into()),
                Matcher::UrlEncoded("gameTypes".into(), "R".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(json!({ "totalGames": 0, "dates": [] }).to_string())
            .create_async()
            .await;

        let err = api_for(&server)
            .schedule(&[9999], &[1], &[GameType::REGULAR_SEASON])
            .await
            .unwrap_err();
        assert!(err.is_no_data(), "got {err}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn schedule_client_error_is_no_data_not_transport_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/schedule/")
            .match_query(Matcher::Any)
            .with_status(400)
            .create_async()
            .await;

        let err = api_for(&server)
            .schedule(&[2024], &[1], &[GameType::REGULAR_SEASON])
            .await
            .unwrap_err();
        assert!(err.is_no_data(), "got {err}");
    }

    #[tokio::test]
    async fn schedule_returns_table() {
        let mut server = Server::new_async().await;
        let body = json!({
            "dates": [{ "games": [{
                "gamePk": 745444,
                "gameDate": "2024-03-28T17:05:00Z",
                "officialDate": "2024-03-28",
                "teams": { "away": { "team": { "id": 147, "name": "New York Yankees" } },
                           "home": { "team": { "id": 146, "name": "Miami Marlins" } } },
                "status": { "codedGameState": "F" },
                "venue": { "id": 4169, "name": "loanDepot park" },
                "gamedayType": "P"
            }]}]
        });
        server
            .mock("GET", "/api/v1/schedule/")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let table = api_for(&server)
            .schedule(&[2024], &[1], &[GameType::REGULAR_SEASON])
            .await
            .unwrap();
        assert_eq!(table.height(), 1);
        assert_eq!(table.column("game_id").and_then(|c| c.as_ints()), Some(&[Some(745444)][..]));
        assert_eq!(table.column("state").and_then(|c| c.as_strs()), Some(&[Some("F".to_owned())][..]));
        assert_eq!(table.column("venue_name").and_then(|c| c.as_strs()), Some(&[Some("loanDepot park".to_owned())][..]));
    }

    #[tokio::test]
    async fn invalid_filters_fail_before_any_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let api = api_for(&server);

        let err = api.schedule(&[2024], &[1], &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput { param: "game_type", .. }), "got {err}");

        let mut query = PlayerGamesQuery::new(592450, 2024);
        query.start_date = Some("2024/04/01");
        let err = api.player_game_ids(&query).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput { param: "start_date", .. }), "got {err}");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_feeds_drops_failed_games_and_keeps_the_rest() {
        let mut server = Server::new_async().await;
        for game_pk in [1, 3] {
            server
                .mock("GET", format!("/api/v1.1/game/{game_pk}/feed/live").as_str())
                .with_header("content-type", "application/json")
                .with_body(json!({ "gamePk": game_pk }).to_string())
                .create_async()
                .await;
        }
        server
            .mock("GET", "/api/v1.1/game/2/feed/live")
            .with_status(500)
            .create_async()
            .await;

        let mut feeds = api_for(&server).fetch_feeds(&[1, 2, 3]).await;
        feeds.sort_by_key(|f| f["gamePk"].as_i64());
        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0]["gamePk"], 1);
        assert_eq!(feeds[1]["gamePk"], 3);
    }

    #[tokio::test]
    async fn fetch_distinguishes_status_and_decode_errors() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/broken").with_body("<html>oops</html>").create_async().await;
        server.mock("GET", "/missing").with_status(404).create_async().await;
        let api = api_for(&server);

        let err = api.fetch(&format!("{}/broken", server.url())).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)), "got {err}");
        let err = api.fetch(&format!("{}/missing", server.url())).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(..)), "got {err}");
    }

    #[tokio::test]
    async fn player_game_ids_reads_game_log() {
        let mut server = Server::new_async().await;
        let body = json!({ "people": [{ "id": 592450, "stats": [{ "splits": [
            { "game": { "gamePk": 745444 } },
            { "game": { "gamePk": 745461 } }
        ]}]}]});
        let mock = server
            .mock("GET", "/api/v1/people/592450")
            .match_query(Matcher::Regex("group=hitting".into()))
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let mut query = PlayerGamesQuery::new(592450, 2024);
        query.pitching = false;
        let ids = api_for(&server).player_game_ids(&query).await.unwrap();
        assert_eq!(ids, vec![745444, 745461]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn player_without_stats_is_no_data() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/people/1")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(json!({ "people": [{ "id": 1, "fullName": "Nobody" }] }).to_string())
            .create_async()
            .await;

        let err = api_for(&server).player_game_ids(&PlayerGamesQuery::new(1, 2024)).await.unwrap_err();
        assert!(err.is_no_data(), "got {err}");
    }

    #[tokio::test]
    async fn spring_training_players_come_from_stats_feed() {
        let mut server = Server::new_async().await;
        let pitchers = json!({ "stats": [
            { "playerId": 5, "playerFullName": "Ace Pitcher", "playerFirstName": "Ace",
              "playerLastName": "Pitcher", "primaryPositionAbbrev": "P", "teamId": 147 }
        ]});
        let hitters = json!({ "stats": [
            { "playerId": 2, "playerFullName": "Big Bat", "playerFirstName": "Big",
              "playerLastName": "Bat", "primaryPositionAbbrev": "1B", "teamId": 111 },
            { "playerId": 5, "playerFullName": "Ace Pitcher", "playerFirstName": "Ace",
              "playerLastName": "Pitcher", "primaryPositionAbbrev": "P", "teamId": 147 }
        ]});
        for (group, body) in [("pitching", pitchers), ("hitting", hitters)] {
            server
                .mock("GET", "/bdfed/stats/player")
                .match_query(Matcher::UrlEncoded("group".into(), group.into()))
                .with_header("content-type", "application/json")
                .with_body(body.to_string())
                .create_async()
                .await;
        }

        let table = api_for(&server)
            .players(1, 2024, &[GameType::SPRING_TRAINING])
            .await
            .unwrap();
        assert_eq!(table.column("player_id").and_then(|c| c.as_ints()), Some(&[Some(2), Some(5)][..]));
        assert_eq!(table.column("weight").map(|c| c.null_count()), Some(2));
    }

    #[tokio::test]
    async fn regular_season_players_map_people() {
        let mut server = Server::new_async().await;
        let body = json!({ "people": [{
            "id": 660271, "fullName": "Shohei Ohtani", "firstName": "Shohei", "useName": "Shohei",
            "lastName": "Ohtani", "primaryPosition": { "abbreviation": "TWP" },
            "currentTeam": { "id": 119 }, "weight": 210, "height": "6' 4\"", "currentAge": 29,
            "birthDate": "1994-07-05"
        }]});
        server
            .mock("GET", "/api/v1/sports/1/players")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let table = api_for(&server).players(1, 2024, &[GameType::REGULAR_SEASON]).await.unwrap();
        assert_eq!(table.height(), 1);
        assert_eq!(table.column("position").and_then(|c| c.as_strs()), Some(&[Some("TWP".to_owned())][..]));
        assert_eq!(table.column("team").and_then(|c| c.as_ints()), Some(&[Some(119)][..]));
        assert_eq!(table.column("age").and_then(|c| c.as_ints()), Some(&[Some(29)][..]));
    }

    #[tokio::test]
    async fn sport_id_check_and_leagues() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/sports")
            .with_header("content-type", "application/json")
            .with_body(json!({ "sports": [
                { "id": 1, "code": "mlb", "name": "Major League Baseball", "abbreviation": "MLB",
                  "sortOrder": 11, "activeStatus": true },
                { "id": 11, "code": "aaa", "name": "Triple-A", "abbreviation": "AAA",
                  "sortOrder": 101, "activeStatus": true }
            ]}).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/leagues/")
            .with_header("content-type", "application/json")
            .with_body(json!({ "leagues": [
                { "id": 103, "name": "American League", "abbreviation": "AL", "sport": { "id": 1 } }
            ]}).to_string())
            .create_async()
            .await;
        let api = api_for(&server);

        assert!(api.sport_id_check(11).await.unwrap());
        assert!(!api.sport_id_check(42).await.unwrap());

        let leagues = api.leagues().await.unwrap();
        assert_eq!(leagues.column_names(), vec!["league_id", "league_name", "league_abbreviation", "sport_id"]);
        assert_eq!(leagues.column("sport_id").and_then(|c| c.as_ints()), Some(&[Some(1)][..]));
    }

    #[tokio::test]
    async fn game_events_flattens_fetched_feeds() {
        let mut server = Server::new_async().await;
        let feed = json!({
            "gamePk": 7,
            "gameData": { "datetime": { "officialDate": "2024-04-01" },
                          "teams": { "away": { "id": 1, "abbreviation": "AAA" }, "home": { "id": 2, "abbreviation": "HHH" } } },
            "liveData": { "plays": { "allPlays": [{
                "about": { "isTopInning": true },
                "result": { "event": "Single", "eventType": "single" },
                "playEvents": [{ "isPitch": true, "details": { "code": "X" }, "pitchNumber": 1,
                                 "count": { "balls": 0, "strikes": 0, "outs": 0 } }]
            }]}}
        });
        server
            .mock("GET", "/api/v1.1/game/7/feed/live")
            .with_header("content-type", "application/json")
            .with_body(feed.to_string())
            .create_async()
            .await;

        let table = api_for(&server).game_events(&[7, 8]).await;
        assert_eq!(table.height(), 1);
        assert_eq!(table.column("event").and_then(|c| c.as_strs()), Some(&[Some("Single".to_owned())][..]));
    }
}
