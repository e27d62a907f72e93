//! Wire types for the bdfed stats endpoint, used for spring training rosters.
//! Endpoint: https://bdfed.stitch.mlbinfra.com/bdfed/stats/player?...&gameType=S

use serde::Deserialize;

#[derive(Deserialize, Default, Debug)]
pub struct BdfedStatsResponse {
    #[serde(default)]
    pub stats: Vec<BdfedPlayer>,
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BdfedPlayer {
    pub player_id: Option<i64>,
    pub player_full_name: Option<String>,
    pub player_first_name: Option<String>,
    pub player_last_name: Option<String>,
    pub primary_position_abbrev: Option<String>,
    pub team_id: Option<i64>,
}
