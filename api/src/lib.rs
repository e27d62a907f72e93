pub mod bdfed;
pub mod client;
pub mod filters;
pub mod flatten;
pub mod statsapi;
pub mod table;

use crate::table::tabular_row;

pub use client::{ApiError, ApiResult, MlbApi};
pub use filters::GameType;
pub use flatten::{flatten, flatten_rows};
pub use table::{Cell, Column, ColumnType, ColumnValues, Table, Tabular};

// ---------------------------------------------------------------------------
// Flat rows, independent of the Stats API wire format
// ---------------------------------------------------------------------------

tabular_row! {
    /// One pitch (or walk-completing administrative event) from a live game feed.
    pub struct FlatEventRow {
        game_id: Int,
        game_date: Date,
        batter_id: Int,
        batter_name: Str,
        batter_hand: Str,
        batter_team: Str,
        batter_team_id: Int,
        pitcher_id: Int,
        pitcher_name: Str,
        pitcher_hand: Str,
        pitcher_team: Str,
        pitcher_team_id: Int,
        ab_number: Int,
        play_description: Str,
        play_code: Str,
        in_play: Bool,
        is_strike: Bool,
        is_swing: Bool,
        is_whiff: Bool,
        is_out: Bool,
        is_ball: Bool,
        is_review: Bool,
        pitch_type: Str,
        pitch_description: Str,
        strikes: Int,
        balls: Int,
        outs: Int,
        strikes_after: Int,
        balls_after: Int,
        outs_after: Int,
        start_speed: Float,
        end_speed: Float,
        sz_top: Float,
        sz_bot: Float,
        x: Float,
        y: Float,
        ax: Float,
        ay: Float,
        az: Float,
        pfxx: Float,
        pfxz: Float,
        px: Float,
        pz: Float,
        vx0: Float,
        vy0: Float,
        vz0: Float,
        x0: Float,
        y0: Float,
        z0: Float,
        zone: Int,
        type_confidence: Float,
        plate_time: Float,
        extension: Float,
        spin_rate: Float,
        spin_direction: Float,
        vb: Float,
        ivb: Float,
        hb: Float,
        launch_speed: Float,
        launch_angle: Float,
        launch_distance: Float,
        launch_location: Str,
        trajectory: Str,
        hardness: Str,
        hit_x: Float,
        hit_y: Float,
        index_play: Int,
        play_id: Str,
        start_time: Str,
        end_time: Str,
        is_pitch: Bool,
        type_type: Str,
        type_ab: Str,
        event: Str,
        event_type: Str,
        rbi: Int,
        away_score: Int,
        home_score: Int,
    }
}

tabular_row! {
    pub struct ScheduleRow {
        game_id: Int,
        /// Start time in US/Eastern, e.g. "07:05 PM".
        time: Str,
        date: Date,
        away: Str,
        away_id: Int,
        home: Str,
        home_id: Int,
        state: Str,
        venue_id: Int,
        venue_name: Str,
        gameday_type: Str,
    }
}

tabular_row! {
    pub struct TeamRow {
        team_id: Int,
        city: Str,
        name: Str,
        franchise: Str,
        abbreviation: Str,
        parent_org_id: Int,
        parent_org: Str,
        league_id: Int,
        league_name: Str,
        parent_org_abbreviation: Str,
    }
}

tabular_row! {
    pub struct LeagueRow {
        league_id: Int,
        league_name: Str,
        league_abbreviation: Str,
        sport_id: Int,
    }
}

tabular_row! {
    /// Spring training rosters only fill the identity, position and team columns.
    pub struct PlayerRow {
        player_id: Int,
        first_name: Str,
        use_name: Str,
        last_name: Str,
        name: Str,
        position: Str,
        team: Int,
        weight: Int,
        height: Str,
        age: Int,
        birth_date: Str,
    }
}

tabular_row! {
    pub struct SportRow {
        sport_id: Int,
        code: Str,
        name: Str,
        abbreviation: Str,
        sort_order: Int,
        active: Bool,
    }
}

tabular_row! {
    pub struct GameTypeRow {
        id: Str,
        description: Str,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_event_row_declares_the_full_column_set() {
        assert_eq!(FlatEventRow::COLUMNS.len(), 78);
        assert_eq!(FlatEventRow::default().cells().len(), FlatEventRow::COLUMNS.len());
        assert_eq!(FlatEventRow::COLUMNS[0], ("game_id", ColumnType::Int));
        assert_eq!(FlatEventRow::COLUMNS[77], ("home_score", ColumnType::Int));
    }

    #[test]
    fn cells_follow_declared_types() {
        let row = FlatEventRow { start_speed: Some(95.1), is_pitch: Some(true), ..Default::default() };
        for (cell, (name, kind)) in row.cells().iter().zip(FlatEventRow::COLUMNS) {
            assert_eq!(cell.column_type(), *kind, "column {name}");
        }
    }
}
