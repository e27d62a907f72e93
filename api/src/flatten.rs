//! Game feed flattening: nested live feeds → one row per pitch.
//!
//! Walks `liveData.plays.allPlays` → `playEvents` and emits a [`FlatEventRow`]
//! for every pitch (or coded non-pitch event), plus a reduced row for walks the
//! feed records as an uncoded administrative event. Counts before each event are
//! carried over from the previous raw event; at-bat outcome fields land only on
//! the at-bat's last event.

use crate::statsapi::{AtBat, Count, FeedTeam, GameFeed, PlayEvent};
use crate::table::Table;
use crate::FlatEventRow;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

/// Outcome codes counted as a swing.
pub const SWING_CODES: [&str; 7] = ["X", "F", "S", "D", "E", "T", "W"];
/// Outcome codes counted as a swing and miss.
pub const WHIFF_CODES: [&str; 3] = ["S", "T", "W"];

/// Flatten raw live feeds into the pitch-level event table.
///
/// Feeds that do not decode are skipped with a warning; the rest still contribute.
pub fn flatten(feeds: &[Value]) -> Table {
    Table::from_rows(&flatten_rows(feeds))
}

/// Same as [`flatten`], but returns the row values before transposition.
pub fn flatten_rows(feeds: &[Value]) -> Vec<FlatEventRow> {
    let mut rows = Vec::new();
    for raw in feeds {
        match GameFeed::deserialize(raw) {
            Ok(feed) => {
                let before = rows.len();
                flatten_feed(&feed, &mut rows);
                debug!("game {}: {} rows", feed.game_pk, rows.len() - before);
            }
            Err(e) => {
                let game = raw.get("gamePk").map(Value::to_string).unwrap_or_else(|| "?".into());
                warn!("No data for game {game}: feed skipped ({e})");
            }
        }
    }
    rows
}

fn flatten_feed(feed: &GameFeed, rows: &mut Vec<FlatEventRow>) {
    let game_date = NaiveDate::parse_from_str(&feed.game_data.datetime.official_date, "%Y-%m-%d").ok();
    let teams = &feed.game_data.teams;

    for at_bat in &feed.live_data.plays.all_plays {
        // Top of the inning: away team bats.
        let (batting, pitching) = if at_bat.about.is_top_inning {
            (teams.away.as_ref(), teams.home.as_ref())
        } else {
            (teams.home.as_ref(), teams.away.as_ref())
        };
        let ctx = AtBatContext { game_id: feed.game_pk, game_date, at_bat, batting, pitching };

        let events = &at_bat.play_events;
        for (n, event) in events.iter().enumerate() {
            let prev = n.checked_sub(1).map(|i| &events[i]);
            let is_last = n + 1 == events.len();

            if event.is_pitch == Some(true) || event_code(event).is_some() {
                rows.push(full_detail_row(&ctx, event, prev, is_last));
            } else if event.count.and_then(|c| c.balls) == Some(4) {
                rows.push(walk_completion_row(&ctx, event));
            }
        }
    }
}

/// Per-at-bat values shared by every row the at-bat produces.
struct AtBatContext<'a> {
    game_id: i64,
    game_date: Option<NaiveDate>,
    at_bat: &'a AtBat,
    batting: Option<&'a FeedTeam>,
    pitching: Option<&'a FeedTeam>,
}

impl AtBatContext<'_> {
    /// Game, matchup and team columns; everything else left null.
    fn base_row(&self, event: &PlayEvent) -> FlatEventRow {
        let matchup = self.at_bat.matchup.as_ref();
        let batter = matchup.and_then(|m| m.batter.as_ref());
        let pitcher = matchup.and_then(|m| m.pitcher.as_ref());

        FlatEventRow {
            game_id: Some(self.game_id),
            game_date: self.game_date,
            batter_id: batter.and_then(|p| p.id),
            batter_name: batter.and_then(|p| p.full_name.clone()),
            batter_hand: matchup.and_then(|m| m.bat_side.as_ref()).and_then(|s| s.code.clone()),
            batter_team: self.batting.and_then(|t| t.abbreviation.clone()),
            batter_team_id: self.batting.and_then(|t| t.id),
            pitcher_id: pitcher.and_then(|p| p.id),
            pitcher_name: pitcher.and_then(|p| p.full_name.clone()),
            pitcher_hand: matchup.and_then(|m| m.pitch_hand.as_ref()).and_then(|s| s.code.clone()),
            pitcher_team: self.pitching.and_then(|t| t.abbreviation.clone()),
            pitcher_team_id: self.pitching.and_then(|t| t.id),
            index_play: event.index,
            play_id: event.play_id.clone(),
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            is_pitch: event.is_pitch,
            type_type: event.event_type.clone(),
            ..Default::default()
        }
    }
}

fn event_code(event: &PlayEvent) -> Option<&str> {
    event.details.as_ref().and_then(|d| d.code.as_deref())
}

/// Counts before the event: 0-0 on a first pitch (outs from the event itself),
/// otherwise whatever the previous raw event left behind.
fn counts_before(event: &PlayEvent, prev: Option<&PlayEvent>) -> Count {
    let after = event.count.unwrap_or_default();
    match prev {
        Some(prev) if event.pitch_number != Some(1) => prev.count.unwrap_or_default(),
        _ => Count { balls: Some(0), strikes: Some(0), outs: after.outs },
    }
}

fn full_detail_row(
    ctx: &AtBatContext<'_>,
    event: &PlayEvent,
    prev: Option<&PlayEvent>,
    is_last: bool,
) -> FlatEventRow {
    let mut row = ctx.base_row(event);
    row.ab_number = ctx.at_bat.at_bat_index;

    if let Some(details) = &event.details {
        row.play_description = details.description.clone();
        row.play_code = details.code.clone();
        row.in_play = details.is_in_play;
        row.is_strike = details.is_strike;
        row.is_ball = details.is_out;
        row.is_review = details.has_review;
        row.pitch_type = details.pitch_type.as_ref().and_then(|t| t.code.clone());
        row.pitch_description = details.pitch_type.as_ref().and_then(|t| t.description.clone());
    }

    if let Some(code) = event_code(event) {
        row.is_swing = Some(SWING_CODES.contains(&code));
        row.is_whiff = Some(WHIFF_CODES.contains(&code));
    }

    let before = counts_before(event, prev);
    let after = event.count.unwrap_or_default();
    row.strikes = before.strikes;
    row.balls = before.balls;
    row.outs = before.outs;
    row.strikes_after = after.strikes;
    row.balls_after = after.balls;
    row.outs_after = after.outs;

    if let Some(pitch) = &event.pitch_data {
        row.start_speed = pitch.start_speed;
        row.end_speed = pitch.end_speed;
        row.sz_top = pitch.strike_zone_top;
        row.sz_bot = pitch.strike_zone_bottom;
        row.zone = pitch.zone;
        row.type_confidence = pitch.type_confidence;
        row.plate_time = pitch.plate_time;
        row.extension = pitch.extension;

        if let Some(c) = &pitch.coordinates {
            row.x = c.x;
            row.y = c.y;
            row.ax = c.ax;
            row.ay = c.ay;
            row.az = c.az;
            row.pfxx = c.pfx_x;
            row.pfxz = c.pfx_z;
            row.px = c.px;
            row.pz = c.pz;
            row.vx0 = c.vx0;
            row.vy0 = c.vy0;
            row.vz0 = c.vz0;
            row.x0 = c.x0;
            row.y0 = c.y0;
            row.z0 = c.z0;
        }

        if let Some(b) = &pitch.breaks {
            row.spin_rate = b.spin_rate;
            row.spin_direction = b.spin_direction;
            row.vb = b.break_vertical;
            row.ivb = b.break_vertical_induced;
            row.hb = b.break_horizontal;
        }
    }

    if let Some(hit) = &event.hit_data {
        row.launch_speed = hit.launch_speed;
        row.launch_angle = hit.launch_angle;
        row.launch_distance = hit.total_distance;
        row.launch_location = hit.location.clone();
        row.trajectory = hit.trajectory.clone();
        row.hardness = hit.hardness.clone();
        row.hit_x = hit.coordinates.as_ref().and_then(|c| c.coord_x);
        row.hit_y = hit.coordinates.as_ref().and_then(|c| c.coord_y);
    }

    // The at-bat outcome is only known once its last event has happened.
    if is_last && let Some(result) = &ctx.at_bat.result {
        row.type_ab = result.result_type.clone();
        row.event = result.event.clone();
        row.event_type = result.event_type.clone();
        row.rbi = result.rbi;
        row.away_score = result.away_score;
        row.home_score = result.home_score;
        row.is_out = result.is_out;
    }

    row
}

/// Ball four recorded without a pitch or code. The feed's count on this event
/// shape has balls and strikes transposed; the swap is kept as received.
fn walk_completion_row(ctx: &AtBatContext<'_>, event: &PlayEvent) -> FlatEventRow {
    let count = event.count.unwrap_or_default();
    let result = ctx.at_bat.result.as_ref();

    FlatEventRow {
        strikes: count.balls,
        balls: count.strikes,
        outs: count.outs,
        strikes_after: count.balls,
        balls_after: count.strikes,
        outs_after: count.outs,
        event: result.and_then(|r| r.event.clone()),
        event_type: result.and_then(|r| r.event_type.clone()),
        ..ctx.base_row(event)
    }
}
