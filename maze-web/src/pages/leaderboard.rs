//! Leaderboard page, refreshed on a fixed poll interval.
use gloo::timers::callback::Interval;
use maze_game::LeaderboardEntry;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::leaderboard_table::LeaderboardTable;

fn refresh(entries: UseStateHandle<Vec<LeaderboardEntry>>, error: UseStateHandle<Option<String>>) {
    spawn_local(async move {
        match api::fetch_leaderboard().await {
            Ok(rows) => {
                entries.set(rows);
                error.set(None);
            }
            Err(err) => {
                log::warn!("leaderboard refresh failed: {err}");
                error.set(Some(err.to_string()));
            }
        }
    });
}

#[function_component(LeaderboardPage)]
pub fn leaderboard_page() -> Html {
    let entries = use_state(Vec::<LeaderboardEntry>::new);
    let error = use_state(|| None::<String>);
    let config = use_memo((), |_| crate::settings::engine_config());

    {
        let entries = entries.clone();
        let error = error.clone();
        let poll_ms = config.leaderboard_poll_ms;
        use_effect_with((), move |_| {
            refresh(entries.clone(), error.clone());
            let interval = Interval::new(poll_ms, move || refresh(entries.clone(), error.clone()));
            move || drop(interval)
        });
    }

    html! {
        <section class="panel leaderboard-page">
            <h1 class="leaderboard-page__title">{ "LEADERBOARD" }</h1>
            if let Some(message) = (*error).clone() {
                <p class="leaderboard-page__error" role="alert">{ message }</p>
            }
            <LeaderboardTable entries={(*entries).clone()} />
        </section>
    }
}
