mod config;
mod logging;

use chrono::Utc;
use config::Config;
use log::{debug, error, info};
use memory_game::client::{ClientError, RankingClient, RankingEntry};
use memory_game::render;
use memory_game::session::{Effect, Event, GameId, Phase, Session, CLOCK_INTERVAL};
use std::future::pending;
use std::pin::Pin;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};

const HELP: &str = "Digite o número de uma carta para virá-la. \
    Comandos: n = novo jogo, r = ranking, q = sair";
const PLAY_AGAIN: &str = "Enter para jogar novamente, r = ranking, q = sair";

/// Timers owned by the front end on behalf of the session
#[derive(Default)]
struct Timers {
    clock: Option<(GameId, Interval)>,
    unflip: Option<(GameId, Pin<Box<Sleep>>)>,
}

async fn next_tick(clock: &mut Option<(GameId, Interval)>) -> GameId {
    match clock {
        Some((game, interval)) => {
            interval.tick().await;
            *game
        }
        None => pending().await,
    }
}

async fn next_unflip(unflip: &mut Option<(GameId, Pin<Box<Sleep>>)>) -> GameId {
    match unflip {
        Some((game, delay)) => {
            delay.as_mut().await;
            *game
        }
        None => pending().await,
    }
}

/// Outcome of a ranking server request, delivered back to the event loop
enum Reply {
    Ranking(Result<Vec<RankingEntry>, ClientError>),
    Saved(Result<String, ClientError>),
}

/// Runs ranking server requests on their own tasks so the event loop keeps
/// serving input and timers while they are in flight
struct Api {
    client: RankingClient,
    replies: mpsc::UnboundedSender<Reply>,
}

impl Api {
    fn fetch_ranking(&self) {
        println!("\n--- Ranking ---");
        println!("{}", render::LOADING_RANKING);

        let client = self.client.clone();
        let replies = self.replies.clone();
        tokio::spawn(async move {
            let _ = replies.send(Reply::Ranking(client.fetch_ranking().await));
        });
    }

    fn save_time(&self, name: String, seconds: f64) {
        println!("{}", render::SAVING_TIME);

        let client = self.client.clone();
        let replies = self.replies.clone();
        tokio::spawn(async move {
            let _ = replies.send(Reply::Saved(client.save_time(&name, seconds).await));
        });
    }

    fn show_reply(&self, reply: Reply) {
        match reply {
            Reply::Ranking(Ok(entries)) => {
                for line in render::ranking_lines(&entries) {
                    println!("{}", line);
                }
            }
            Reply::Ranking(Err(_)) => println!("{}", render::RANKING_FAILED),
            Reply::Saved(Ok(message)) => {
                println!("{}", message);
                println!("\n{}", PLAY_AGAIN);
                self.fetch_ranking();
            }
            Reply::Saved(Err(_)) => {
                println!("{}", render::SAVE_FAILED);
                println!("\n{}", PLAY_AGAIN);
            }
        }
    }
}

enum Command {
    Flip(usize),
    NewGame,
    Ranking,
    Quit,
    Other,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "n" => Command::NewGame,
        "r" => Command::Ranking,
        "q" => Command::Quit,
        _ => match line.parse::<usize>() {
            Ok(number) if number > 0 => Command::Flip(number - 1),
            _ => Command::Other,
        },
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    logging::setup(config.logging_level);
    info!("Using ranking API at {}", config.api_url);

    let client = match RankingClient::new(config.api_url) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to create ranking client: {}", err);
            return;
        }
    };
    let (replies_tx, mut replies) = mpsc::unbounded_channel();
    let api = Api {
        client,
        replies: replies_tx,
    };
    let mut session = Session::new();
    let mut timers = Timers::default();

    let (lines_tx, mut lines) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    api.fetch_ranking();
    println!("\nDigite seu nome para começar:");

    loop {
        let effects = tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                match input_event(&session, &line) {
                    Input::Event(event) => session.handle(event),
                    Input::Ranking => {
                        api.fetch_ranking();
                        Vec::new()
                    }
                    Input::Help => {
                        println!("{}", HELP);
                        Vec::new()
                    }
                    Input::Quit => break,
                }
            }
            Some(reply) = replies.recv() => {
                api.show_reply(reply);
                Vec::new()
            }
            timer = next_tick(&mut timers.clock) => {
                session.handle(Event::Tick { timer, now: Utc::now() })
            }
            game = next_unflip(&mut timers.unflip) => {
                timers.unflip = None;
                session.handle(Event::Unflip { game })
            }
        };

        for effect in effects {
            apply(effect, &session, &mut timers, &api);
        }
    }
}

enum Input {
    Event(Event),
    Ranking,
    Help,
    Quit,
}

/// Maps a line typed by the player to what it means in the current phase
fn input_event(session: &Session, line: &str) -> Input {
    let now = Utc::now();
    let restart = || {
        Input::Event(Event::Start {
            name: session.player().to_string(),
            now,
        })
    };

    match session.phase() {
        Phase::Setup => Input::Event(Event::Start {
            name: line.to_string(),
            now,
        }),
        Phase::Won { .. } => match parse_command(line) {
            Command::Ranking => Input::Ranking,
            Command::Quit => Input::Quit,
            _ => restart(),
        },
        Phase::Playing | Phase::Checking { .. } => match parse_command(line) {
            Command::Flip(index) => Input::Event(Event::Flip { index, now }),
            Command::NewGame => restart(),
            Command::Ranking => Input::Ranking,
            Command::Quit => Input::Quit,
            Command::Other => Input::Help,
        },
    }
}

/// Clock interval whose first tick lands one interval from now. Ticks missed
/// while the loop was busy are dropped rather than replayed.
fn clock_interval() -> Interval {
    let mut interval = interval_at(Instant::now() + CLOCK_INTERVAL, CLOCK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

fn apply(effect: Effect, session: &Session, timers: &mut Timers, api: &Api) {
    debug!("Applying {:?}", effect);
    match effect {
        Effect::Alert(message) => println!("{}", message),
        Effect::CancelTimer(game) => {
            if timers.clock.as_ref().is_some_and(|(running, _)| *running == game) {
                timers.clock = None;
            }
        }
        Effect::StartTimer(game) => {
            // Replacing the slot drops any interval still in it
            timers.clock = Some((game, clock_interval()));
        }
        Effect::ShowClock(seconds) => println!("{}", render::clock(seconds)),
        Effect::ShowBoard => println!("\n{}\n", render::board_grid(session.board())),
        Effect::ScheduleUnflip { game, delay } => {
            timers.unflip = Some((game, Box::pin(sleep(delay))));
        }
        Effect::ShowResult { name, seconds } => {
            println!(
                "Parabéns, {}! Você terminou em {} segundos.",
                name,
                render::final_time(seconds)
            );
        }
        Effect::SubmitTime { name, seconds } => api.save_time(name, seconds),
    }
}
