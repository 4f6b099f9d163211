use maze_game::{EventMode, format_clock};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub elapsed_secs: u64,
    #[prop_or_default]
    pub mode: Option<EventMode>,
    #[prop_or_default]
    pub player: Option<AttrValue>,
}

const fn mode_badge(mode: Option<EventMode>) -> (&'static str, &'static str) {
    match mode {
        Some(EventMode::Live) => ("LIVE", "badge badge--live"),
        Some(EventMode::Practice) => ("PRACTICE", "badge badge--practice"),
        None => ("CONNECTING", "badge"),
    }
}

#[function_component(StatusBar)]
pub fn status_bar(props: &Props) -> Html {
    let (label, badge_class) = mode_badge(props.mode);
    html! {
        <div class="status-bar">
            <h2 class="status-bar__title">{ "TIMER" }</h2>
            <span class={badge_class}>{ label }</span>
            if let Some(player) = props.player.clone() {
                <span class="status-bar__player">{ player }</span>
            }
            <span class="status-bar__clock" aria-live="off">{ format_clock(props.elapsed_secs) }</span>
        </div>
    }
}
