//! Terminal-style command editor.
//!
//! `Enter` and `Shift+Enter` are swallowed and reported as gestures; every
//! other key edits the buffer normally. While the clipboard is blocked, copy,
//! cut, paste and the context menu are suppressed.
use maze_game::EditorGesture;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub value: AttrValue,
    pub enabled: bool,
    #[prop_or_default]
    pub clipboard_blocked: bool,
    pub on_input: Callback<String>,
    pub on_gesture: Callback<EditorGesture>,
}

pub const PROMPT_HINT: &str = "// type up(), down(), left() or right()\n// Enter runs the last line, Shift+Enter replays everything";

#[function_component(Terminal)]
pub fn terminal(props: &Props) -> Html {
    let oninput = {
        let cb = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            cb.emit(area.value());
        })
    };

    let onkeydown = {
        let cb = props.on_gesture.clone();
        Callback::from(move |e: KeyboardEvent| {
            if let Some(gesture) = EditorGesture::from_key(&e.key(), e.shift_key()) {
                e.prevent_default();
                cb.emit(gesture);
            }
        })
    };

    let blocked = props.clipboard_blocked;
    let guard = Callback::from(move |e: Event| {
        if blocked {
            e.prevent_default();
        }
    });
    let guard_menu = Callback::from(move |e: MouseEvent| {
        if blocked {
            e.prevent_default();
        }
    });

    let class = classes!("terminal", blocked.then_some("terminal--locked"));

    html! {
        <div class={class}>
            <textarea
                class="terminal__input"
                spellcheck="false"
                autocomplete="off"
                placeholder={PROMPT_HINT}
                value={props.value.clone()}
                disabled={!props.enabled}
                {oninput}
                {onkeydown}
                oncopy={guard.clone()}
                oncut={guard.clone()}
                onpaste={guard}
                oncontextmenu={guard_menu}
            />
        </div>
    }
}
