use std::io::Write;

use clap::Subcommand;
use pomodoro_core::storage::SqliteStore;
use pomodoro_core::error::Result;
use pomodoro_core::{
    Clock, Config, Event, Notification, PersistenceStore, Phase, RandomSource, Session,
    SessionController, SystemClock, ThreadRandom,
};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

use crate::notifier::TerminalNotifier;

type Controller = SessionController<SqliteStore, TerminalNotifier, ThreadRandom, SystemClock>;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Resume the persisted session, or start a new one, and keep ticking
    Run {
        /// Only resume a persisted session; stay idle otherwise
        #[arg(long)]
        no_start: bool,
    },
    /// Print current session state as JSON
    Status,
    /// Drop the current session
    Reset,
}

fn open_controller(config: &Config) -> Result<Controller> {
    let store = SqliteStore::open()?;
    let notifier = TerminalNotifier::new(config.notifications.enabled);
    Ok(SessionController::new(
        config.timer,
        store,
        notifier,
        ThreadRandom,
        SystemClock,
    ))
}

pub fn run(action: TimerAction) -> Result<()> {
    let config = Config::load()?;
    let mut controller = open_controller(&config)?;
    let mut session = controller.idle_session();

    match action {
        TimerAction::Run { no_start } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_loop(&config, &mut controller, &mut session, no_start))?;
        }
        TimerAction::Status => {
            if let Some(event) = controller.on_launch(&mut session) {
                info!(?event, "launch");
            }
            controller.on_foreground_resume(&mut session);
            controller.on_background(&session);
            let snapshot = controller.snapshot(&session);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        TimerAction::Reset => {
            if let Some(event) = controller.reset(&mut session) {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
    }
    Ok(())
}

async fn run_loop(
    config: &Config,
    controller: &mut Controller,
    session: &mut Session,
    no_start: bool,
) -> Result<()> {
    if let Some(event) = controller.on_launch(session) {
        announce(&event);
    }
    if !session.is_started() {
        if no_start {
            println!("no session to resume");
            return Ok(());
        }
        if let Some(event) = controller.on_start(session) {
            announce(&event);
        }
    }

    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let (event, alert) = tick(controller, session);
                if let Some(alert) = alert {
                    let bell = if config.notifications.bell { "\x07" } else { "" };
                    println!("\r{bell}{}: {}", alert.title, alert.body);
                }
                if let Some(event) = event {
                    announce(&event);
                }
                render(session)?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                controller.on_background(session);
                println!();
                info!("session saved, exiting");
                return Ok(());
            }
        }
    }
}

/// One run-loop step.
///
/// The due alert is collected before the tick: a phase change cancels and
/// replaces the pending alert, which would otherwise swallow it.
fn tick<S, R, C>(
    controller: &mut SessionController<S, TerminalNotifier<C>, R, C>,
    session: &mut Session,
) -> (Option<Event>, Option<Notification>)
where
    S: PersistenceStore,
    R: RandomSource,
    C: Clock,
{
    let alert = controller.scheduler_mut().take_due();
    let event = controller.on_tick(session);
    (event, alert)
}

fn render(session: &Session) -> std::io::Result<()> {
    let label = match session.phase() {
        Phase::Work => "work ",
        Phase::Break => "break",
    };
    let message = session.display_message().unwrap_or_default();
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\r\x1b[2K{label} {}  {message}", session.display())?;
    stdout.flush()
}

fn announce(event: &Event) {
    match event {
        Event::SessionStarted { duration_secs, .. } => {
            println!("\rStarting {} work session...", pomodoro_core::format_time(*duration_secs));
        }
        Event::PhaseChanged { to: Phase::Break, .. } => println!("\r\x1b[2KWork finished. Break time."),
        Event::PhaseChanged { to: Phase::Work, .. } => println!("\r\x1b[2KBreak over. Back to work."),
        Event::SessionRestored { phase, remaining_secs, .. } => {
            println!(
                "Resuming {:?} phase, {} left",
                phase,
                pomodoro_core::format_time(*remaining_secs)
            );
        }
        Event::SessionDiscarded { reason, .. } => info!(?reason, "previous session discarded"),
        other => info!(event = ?other, "session event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomodoro_core::{ManualClock, MemoryStore, SeededRandom, TimerConfig};

    fn short_controller(
        clock: &ManualClock,
    ) -> SessionController<MemoryStore, TerminalNotifier<ManualClock>, SeededRandom, ManualClock>
    {
        SessionController::new(
            TimerConfig {
                work_duration_secs: 2,
                break_duration_secs: 1,
            },
            MemoryStore::new(),
            TerminalNotifier::with_clock(true, clock.clone()),
            SeededRandom::new(3),
            clock.clone(),
        )
    }

    #[test]
    fn alert_fires_on_the_tick_that_changes_phase() {
        let clock = ManualClock::default();
        let mut controller = short_controller(&clock);
        let mut session = controller.idle_session();
        controller.on_start(&mut session);

        clock.advance_secs(1);
        let (event, alert) = tick(&mut controller, &mut session);
        assert!(event.is_none());
        assert!(alert.is_none());

        clock.advance_secs(1);
        let (event, alert) = tick(&mut controller, &mut session);
        assert!(matches!(event, Some(Event::PhaseChanged { to: Phase::Break, .. })));
        assert_eq!(alert.unwrap().title, "Work finished");

        clock.advance_secs(1);
        let (event, alert) = tick(&mut controller, &mut session);
        assert!(matches!(event, Some(Event::PhaseChanged { to: Phase::Work, .. })));
        assert_eq!(alert.unwrap().title, "Break finished");
    }

    #[test]
    fn each_alert_fires_once() {
        let clock = ManualClock::default();
        let mut controller = short_controller(&clock);
        let mut session = controller.idle_session();
        controller.on_start(&mut session);

        clock.advance_secs(2);
        let (_, alert) = tick(&mut controller, &mut session);
        assert!(alert.is_some());

        // Same instant again: the replacement break alert is not due yet.
        let (event, alert) = tick(&mut controller, &mut session);
        assert!(event.is_none());
        assert!(alert.is_none());
    }

    #[test]
    fn reset_leaves_nothing_to_fire() {
        let clock = ManualClock::default();
        let mut controller = short_controller(&clock);
        let mut session = controller.idle_session();
        controller.on_start(&mut session);
        controller.reset(&mut session);

        clock.advance_secs(5);
        let (event, alert) = tick(&mut controller, &mut session);
        assert!(event.is_none());
        assert!(alert.is_none());
    }
}
