//! Game page.
//!
//! The page owns one [`MazeSession`] and one [`SubmissionGuard`] for the
//! lifetime of the view. Browser timers drive the clock and replay steps; the
//! session's event outbox is drained after every mutation and mapped onto
//! collision feedback, the clock and score submission.
use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Interval;
use gloo::timers::future::TimeoutFuture;
use maze_game::{
    EditorGesture, EngineConfig, EventMode, MazeSession, Participant, ReplayTick, ReplayTicket,
    SessionEvent, SessionState, SubmissionGuard, SubmissionStatus, resolve_mode,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::completion_overlay::CompletionOverlay;
use crate::components::maze_board::MazeBoard;
use crate::components::status_bar::StatusBar;
use crate::components::terminal::Terminal;
use crate::dom::{load_participant, now_utc};
use crate::pages::register::Register;

#[function_component(GamePage)]
pub fn game_page() -> Html {
    let participant = use_state(load_participant);

    let on_registered = {
        let participant = participant.clone();
        Callback::from(move |registered: Participant| participant.set(Some(registered)))
    };

    match (*participant).clone() {
        Some(participant) => html! { <MazeConsole {participant} /> },
        None => html! { <Register {on_registered} /> },
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ConsoleProps {
    pub participant: Participant,
}

/// Handles shared by the console's callbacks and scheduled tasks.
#[derive(Clone)]
struct Controller {
    participant: Participant,
    config: Rc<EngineConfig>,
    session: Rc<RefCell<MazeSession>>,
    guard: Rc<RefCell<SubmissionGuard>>,
    shake_seq: Rc<RefCell<u64>>,
    buffer: UseStateHandle<String>,
    clock: UseStateHandle<u64>,
    shaking: UseStateHandle<bool>,
    submission: UseStateHandle<SubmissionStatus>,
    redraw: UseForceUpdateHandle,
}

impl Controller {
    /// Drain the session outbox and repaint.
    fn publish(&self) {
        let events = self.session.borrow_mut().drain_events();
        for event in events {
            match event {
                SessionEvent::Blocked { .. } => self.flash_collision(),
                SessionEvent::Completed { mode, elapsed_secs } => {
                    self.clock.set(elapsed_secs);
                    if mode == EventMode::Live {
                        self.submit();
                    }
                }
                SessionEvent::Reset { .. } | SessionEvent::Moved { .. } => {}
            }
        }
        self.redraw.force_update();
    }

    fn flash_collision(&self) {
        let seq = {
            let mut current = self.shake_seq.borrow_mut();
            *current = current.wrapping_add(1);
            *current
        };
        self.shaking.set(true);

        let shaking = self.shaking.clone();
        let shake_seq = self.shake_seq.clone();
        let flash_ms = self.config.collision_flash_ms;
        spawn_local(async move {
            TimeoutFuture::new(flash_ms).await;
            // a later collision owns the flag now
            if *shake_seq.borrow() == seq {
                shaking.set(false);
            }
        });
    }

    fn gesture(&self, gesture: EditorGesture) {
        match gesture {
            EditorGesture::StepCommit => {
                let text = (*self.buffer).clone();
                let result = self.session.borrow_mut().commit_line(&text, now_utc());
                if result.is_none() {
                    log::debug!("last line is not a command, nothing applied");
                }
                self.buffer.set(format!("{text}\n"));
                self.publish();
            }
            EditorGesture::BatchReplay => {
                let ticket = self.session.borrow_mut().start_replay(&self.buffer);
                self.publish();
                if let Some(ticket) = ticket {
                    self.schedule_replay(ticket);
                }
            }
        }
    }

    fn schedule_replay(&self, ticket: ReplayTicket) {
        let controller = self.clone();
        let delay = self.config.replay_step_delay_ms;
        spawn_local(async move {
            loop {
                TimeoutFuture::new(delay).await;
                let tick = controller
                    .session
                    .borrow_mut()
                    .replay_tick(ticket.generation, now_utc());
                match tick {
                    ReplayTick::Step(_) => controller.publish(),
                    ReplayTick::Finished => break,
                    ReplayTick::Superseded => {
                        log::debug!("replay {} dropped", ticket.generation);
                        break;
                    }
                }
            }
        });
    }

    fn submit(&self) {
        let request = match SubmissionGuard::request_for(&self.session.borrow(), &self.participant)
        {
            Ok(request) => request,
            Err(err) => {
                log::debug!("no score to submit: {err}");
                return;
            }
        };
        let ticket = match self.guard.borrow_mut().begin() {
            Ok(ticket) => ticket,
            Err(err) => {
                log::warn!("score submission refused: {err}");
                return;
            }
        };
        self.submission.set(SubmissionStatus::Pending);

        let guard = self.guard.clone();
        let submission = self.submission.clone();
        spawn_local(async move {
            let response = api::submit_finish(&request).await;
            let status = guard.borrow_mut().settle(ticket, &response);
            submission.set(status);
        });
    }

    fn resolve(&self) {
        let controller = self.clone();
        spawn_local(async move {
            let lookup = api::fetch_event_state(&controller.participant.name).await;
            let state = controller
                .session
                .borrow_mut()
                .apply_resolution(resolve_mode(lookup));
            log::info!("session ready in {state:?}");
            let secs = controller.session.borrow().elapsed_secs(now_utc());
            controller.clock.set(secs);
            controller.publish();
        });
    }
}

#[function_component(MazeConsole)]
pub fn maze_console(props: &ConsoleProps) -> Html {
    let config = use_memo((), |_| crate::settings::engine_config());
    let session = use_mut_ref(MazeSession::new);
    let guard = use_mut_ref(SubmissionGuard::new);
    let shake_seq = use_mut_ref(|| 0_u64);
    let buffer = use_state(String::new);
    let clock = use_state(|| 0_u64);
    let shaking = use_state(|| false);
    let submission = use_state(|| SubmissionStatus::NotSubmitted);
    let redraw = use_force_update();

    let controller = Controller {
        participant: props.participant.clone(),
        config: config.clone(),
        session: session.clone(),
        guard,
        shake_seq,
        buffer: buffer.clone(),
        clock: clock.clone(),
        shaking: shaking.clone(),
        submission: submission.clone(),
        redraw,
    };

    {
        let controller = controller.clone();
        use_effect_with(props.participant.name.clone(), move |_| {
            controller.resolve();
            || ()
        });
    }

    {
        let session = session.clone();
        let clock = clock.clone();
        let tick_ms = config.timer_tick_ms;
        use_effect_with((), move |_| {
            let interval = Interval::new(tick_ms, move || {
                let secs = session.borrow_mut().tick(now_utc());
                clock.set(secs);
            });
            move || drop(interval)
        });
    }

    let on_input = {
        let buffer = buffer.clone();
        Callback::from(move |text: String| buffer.set(text))
    };
    let on_gesture = {
        let controller = controller.clone();
        Callback::from(move |gesture: EditorGesture| controller.gesture(gesture))
    };
    let on_retry = Callback::from(move |()| controller.submit());

    let (state, mode, lock, grid, walker, finish_secs) = {
        let snapshot = session.borrow();
        (
            snapshot.state(),
            snapshot.mode(),
            snapshot.input_lock(),
            snapshot.grid().cloned(),
            snapshot.position(),
            snapshot.finish_secs(),
        )
    };

    html! {
        <main class="game">
            <div class="game__board">
                if let Some(grid) = grid {
                    <MazeBoard {grid} {walker} shaking={*shaking} />
                } else if state == SessionState::Initializing {
                    <p class="game__loading">{ "Connecting to the event server..." }</p>
                }
            </div>
            <div class="game__console">
                <StatusBar
                    elapsed_secs={*clock}
                    {mode}
                    player={AttrValue::from(props.participant.name.to_string())}
                />
                <Terminal
                    value={AttrValue::from((*buffer).clone())}
                    enabled={lock.editor_enabled}
                    clipboard_blocked={lock.clipboard_blocked}
                    {on_input}
                    {on_gesture}
                />
            </div>
            if state == SessionState::Completed {
                <CompletionOverlay
                    mode={mode.unwrap_or(EventMode::Live)}
                    {finish_secs}
                    submission={(*submission).clone()}
                    {on_retry}
                />
            }
        </main>
    }
}
