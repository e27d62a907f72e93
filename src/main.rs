mod output;
mod settings;

use crate::output::Format;
use crate::settings::Settings;
use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, info};
use mlb_stats_api::filters::{self, PlayerGamesQuery};
use mlb_stats_api::{GameType, MlbApi, Table};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mlbscrape", version)]
#[command(about = "Pull schedules, rosters and pitch-by-pitch game data from the MLB Stats API")]
#[command(after_help = "Environment:
  MLBSCRAPE_STATS_URL      Stats API base URL (default https://statsapi.mlb.com)
  MLBSCRAPE_BDFED_URL      Spring training stats base URL
  MLBSCRAPE_CONCURRENCY    Game feeds fetched at once (default 8)
  MLBSCRAPE_TIMEOUT_SECS   Per-request timeout (default 30)
  RUST_LOG                 Log filter, e.g. mlb_stats_api=debug")]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Csv, global = true)]
    format: Format,

    /// Write to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Game feeds fetched at once
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ScheduleArgs {
    /// Season(s), comma separated
    #[arg(short, long = "year", required = true, value_delimiter = ',')]
    years: Vec<i32>,

    /// Sport id(s): 1 = MLB, 11 = Triple-A, ...
    #[arg(long = "sport-id", default_value = "1", value_delimiter = ',')]
    sport_ids: Vec<u32>,

    /// Game type code(s): R regular season, S spring training, ...
    #[arg(long = "game-type", default_value = "R", value_delimiter = ',')]
    game_types: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// List scheduled games
    Schedule(ScheduleArgs),
    /// Flatten the live feeds of specific games into one row per pitch
    Feed {
        #[arg(required = true, value_delimiter = ',')]
        game_ids: Vec<i64>,
    },
    /// Flatten every game on a schedule into one row per pitch
    SeasonFeed {
        #[command(flatten)]
        schedule: ScheduleArgs,

        /// Only games whose coded state is final ("F")
        #[arg(long)]
        final_only: bool,
    },
    /// Game ids from a player's game log
    PlayerGames {
        player_id: i64,

        #[arg(short, long)]
        season: i32,

        /// YYYY-MM-DD, defaults to the start of the season year
        #[arg(long)]
        start_date: Option<String>,

        /// YYYY-MM-DD, defaults to the end of the season year
        #[arg(long)]
        end_date: Option<String>,

        #[arg(long, default_value_t = 1)]
        sport_id: u32,

        #[arg(long = "game-type", default_value = "R", value_delimiter = ',')]
        game_types: Vec<String>,

        /// Hitting game log instead of pitching
        #[arg(long)]
        hitting: bool,

        /// Fetch and flatten the games instead of listing their ids
        #[arg(long)]
        feed: bool,
    },
    /// All teams with their parent organisations
    Teams,
    /// All leagues
    Leagues,
    /// Players for a sport and season
    Players {
        #[arg(short, long)]
        season: i32,

        #[arg(long, default_value_t = 1)]
        sport_id: u32,

        #[arg(long = "game-type", default_value = "R", value_delimiter = ',')]
        game_types: Vec<String>,
    },
    /// Sports (levels) known to the API
    Sports,
    /// Game type codes known to the API
    GameTypes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    better_panic::install();

    let cli = Cli::parse();
    init_logger(cli.verbose);

    let settings = Settings::load().with_overrides(cli.concurrency, cli.timeout);
    let api = settings.client();

    let mut out = output::sink(cli.output.as_deref())?;
    match run(&api, cli.command).await? {
        Output::Table(table) => {
            info!("{} rows x {} columns", table.height(), table.width());
            output::write_table(&table, cli.format, &mut out)?
        }
        Output::GameIds(ids) => output::write_game_ids(&ids, cli.format, &mut out)?,
    }
    Ok(())
}

enum Output {
    Table(Table),
    GameIds(Vec<i64>),
}

async fn run(api: &MlbApi, command: Command) -> anyhow::Result<Output> {
    let table = match command {
        Command::Schedule(args) => schedule(api, &args).await?,
        Command::Feed { game_ids } => api.game_events(&game_ids).await,
        Command::SeasonFeed { schedule: args, final_only } => {
            let games = schedule(api, &args).await?;
            let game_ids = scheduled_game_ids(&games, final_only);
            info!("{} games on the schedule", game_ids.len());
            api.game_events(&game_ids).await
        }
        Command::PlayerGames {
            player_id,
            season,
            start_date,
            end_date,
            sport_id,
            game_types,
            hitting,
            feed,
        } => {
            let query = PlayerGamesQuery {
                start_date: start_date.as_deref(),
                end_date: end_date.as_deref(),
                sport_id,
                game_types: filters::parse_game_types(&game_types)?,
                pitching: !hitting,
                ..PlayerGamesQuery::new(player_id, season)
            };
            let game_ids = api
                .player_game_ids(&query)
                .await
                .with_context(|| format!("player {player_id}"))?;
            if !feed {
                return Ok(Output::GameIds(game_ids));
            }
            api.game_events(&game_ids).await
        }
        Command::Teams => api.teams().await?,
        Command::Leagues => api.leagues().await?,
        Command::Players { season, sport_id, game_types } => {
            let game_types = filters::parse_game_types(&game_types)?;
            if !api.sport_id_check(sport_id).await? {
                anyhow::bail!("unknown sport id {sport_id}; see `mlbscrape sports`");
            }
            api.players(sport_id, season, &game_types).await?
        }
        Command::Sports => api.sports().await?,
        Command::GameTypes => api.game_types().await?,
    };
    Ok(Output::Table(table))
}

async fn schedule(api: &MlbApi, args: &ScheduleArgs) -> anyhow::Result<Table> {
    let game_types: Vec<GameType> = filters::parse_game_types(&args.game_types)?;
    Ok(api.schedule(&args.years, &args.sport_ids, &game_types).await?)
}

fn scheduled_game_ids(schedule: &Table, final_only: bool) -> Vec<i64> {
    let ids = schedule.column("game_id").and_then(|c| c.as_ints()).unwrap_or_default();
    let states = schedule.column("state").and_then(|c| c.as_strs()).unwrap_or_default();
    ids.iter()
        .enumerate()
        .filter(|(i, _)| !final_only || states.get(*i).and_then(|s| s.as_deref()) == Some("F"))
        .filter_map(|(_, id)| *id)
        .collect()
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, refines the level picked by -v.
    env_logger::Builder::new().filter_level(level).parse_default_env().init();
}
