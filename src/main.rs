use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect_n::ai::{MonteCarloAgent, MoveAdvisor, RandomAgent};
use connect_n::compute::AdvisorRequest;
use connect_n::config::AppConfig;
use connect_n::game::GameOutcome;
use connect_n::play::{GameRecord, MatchStats, Seat, Session, Turn};

/// Play Connect-N against Monte Carlo opponents.
#[derive(Parser)]
#[command(name = "connect-n", about = "Connect-N with a Monte Carlo move advisor")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of columns
    #[arg(long, global = true)]
    cols: Option<usize>,

    /// Override number of rows
    #[arg(long, global = true)]
    rows: Option<usize>,

    /// Override number of players
    #[arg(long, global = true)]
    players: Option<u8>,

    /// Override tokens in a row needed to win
    #[arg(long, global = true)]
    connect: Option<usize>,

    /// Override random games played per candidate column
    #[arg(long, global = true)]
    rollouts: Option<u32>,

    /// Override advisor worker threads
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Seed the advisor for reproducible play
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log advisor internals
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a game in the terminal
    Play {
        /// Player ids controlled by people, e.g. 1,2
        #[arg(long, value_delimiter = ',')]
        humans: Option<Vec<u8>>,
    },
    /// Let computer players play a series against each other
    Selfplay {
        /// Number of games
        #[arg(long, default_value_t = 10)]
        games: usize,

        /// Player id that moves at random instead of using the advisor
        #[arg(long)]
        random_seat: Option<u8>,
    },
    /// Rank the columns for one position read as JSON
    Advise {
        /// Request file (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the default configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Command::Config = cli.command {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    apply_overrides(&mut config, &cli);

    match cli.command {
        Command::Play { humans } => {
            if let Some(humans) = humans {
                config.session.human_players = humans;
            }
            config.validate().context("invalid configuration")?;
            play(&config)
        }
        Command::Selfplay { games, random_seat } => {
            config.validate().context("invalid configuration")?;
            selfplay(&config, games, random_seat)
        }
        Command::Advise { input } => {
            config.validate().context("invalid configuration")?;
            advise(&config, input)
        }
        Command::Config => Ok(()),
    }
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(cols) = cli.cols {
        config.board.cols = cols;
    }
    if let Some(rows) = cli.rows {
        config.board.rows = rows;
    }
    if let Some(players) = cli.players {
        config.board.players = players;
    }
    if let Some(connect) = cli.connect {
        config.board.connect_n = connect;
    }
    if let Some(rollouts) = cli.rollouts {
        config.advisor.rollouts_per_column = rollouts;
    }
    if let Some(threads) = cli.threads {
        config.advisor.threads = threads;
    }
    if cli.seed.is_some() {
        config.advisor.seed = cli.seed;
    }
}

fn play(config: &AppConfig) -> Result<()> {
    let mut session = Session::from_config(config).context("building board")?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{}", session.state().board());
        match session.advance() {
            Turn::Finished(outcome) => {
                match outcome {
                    GameOutcome::Winner(player) => {
                        let line = session.state().winning_line();
                        println!(
                            "{} ({}) wins: {:?}",
                            player.name(),
                            session.seat_name(player),
                            line.coords()
                        );
                    }
                    GameOutcome::Draw => println!("Draw."),
                }
                return Ok(());
            }
            Turn::Computing(player) => {
                println!("{} is thinking...", player.name());
                let placement = session.play_computer_turn()?;
                println!("{} plays column {}", player.name(), placement.column);
            }
            Turn::AwaitingInput(player) => {
                print!("{} column> ", player.name());
                io::stdout().flush()?;
                let Some(line) = lines.next() else {
                    bail!("input closed before the game ended");
                };
                let line = line?;
                let column = match line.trim().parse::<usize>() {
                    Ok(column) => column,
                    Err(_) => {
                        println!("enter a column number");
                        continue;
                    }
                };
                if let Err(err) = session.submit(column) {
                    println!("{err}");
                }
            }
        }
    }
}

fn selfplay(config: &AppConfig, games: usize, random_seat: Option<u8>) -> Result<()> {
    if let Some(id) = random_seat {
        if id == 0 || id > config.board.players {
            bail!("--random-seat {} is not in 1..={}", id, config.board.players);
        }
    }

    let mut stats = MatchStats::new(config.board.players);
    for game in 0..games {
        let board = config.board.build().context("building board")?;
        let mut session = Session::new(board, |player| {
            if Some(player.id()) == random_seat {
                Seat::Computer(Box::new(RandomAgent::new()))
            } else {
                let mut advisor = config.advisor.clone();
                // Distinct streams per game and seat when seeded.
                advisor.seed = advisor
                    .seed
                    .map(|s| s.wrapping_add(((game as u64) << 8) | player.id() as u64));
                Seat::Computer(Box::new(MonteCarloAgent::new(advisor)))
            }
        });
        let outcome = session.play_out()?;
        info!(game = game + 1, ?outcome, "game finished");
        stats.record(GameRecord {
            outcome,
            length: session.state().moves_played(),
        });
    }

    println!("{stats}");
    Ok(())
}

fn advise(config: &AppConfig, input: Option<PathBuf>) -> Result<()> {
    let text = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading request from {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading request from stdin")?;
            text
        }
    };

    let request = AdvisorRequest::from_json(&text).context("parsing advisor request")?;
    let (board, current) = request.decode().context("invalid advisor request")?;
    let mut advisor = MoveAdvisor::new(config.advisor.clone());
    let columns = advisor.recommend(&board, current);
    println!("{}", serde_json::to_string(&columns)?);
    Ok(())
}
