//! Completion overlay with the final time and score submission state.
use maze_game::{EventMode, SubmissionStatus, format_clock};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub mode: EventMode,
    #[prop_or_default]
    pub finish_secs: Option<u64>,
    #[prop_or(SubmissionStatus::NotSubmitted)]
    pub submission: SubmissionStatus,
    #[prop_or_default]
    pub on_retry: Callback<()>,
}

#[must_use]
pub const fn headline(mode: EventMode) -> &'static str {
    match mode {
        EventMode::Live => "ACCESS GRANTED",
        EventMode::Practice => "PRACTICE COMPLETE",
    }
}

fn submission_line(status: &SubmissionStatus, on_retry: &Callback<()>) -> Html {
    match status {
        SubmissionStatus::NotSubmitted => Html::default(),
        SubmissionStatus::Pending => html! {
            <p class="overlay__submission">{ "Transmitting score..." }</p>
        },
        SubmissionStatus::Recorded => html! {
            <p class="overlay__submission overlay__submission--ok">{ "Score recorded." }</p>
        },
        SubmissionStatus::AlreadyRecorded => html! {
            <p class="overlay__submission overlay__submission--ok">{ "Score already on file." }</p>
        },
        SubmissionStatus::Failed {
            reason,
            retry_available,
        } => {
            let retry = {
                let cb = on_retry.clone();
                Callback::from(move |_| cb.emit(()))
            };
            html! {
                <div class="overlay__submission overlay__submission--error" role="alert">
                    <p>{ format!("Score not saved: {reason}") }</p>
                    if *retry_available {
                        <button type="button" class="retry-submit" onclick={retry}>
                            { "Retry submission" }
                        </button>
                    }
                </div>
            }
        }
    }
}

#[function_component(CompletionOverlay)]
pub fn completion_overlay(props: &Props) -> Html {
    html! {
        <div class="completion-overlay" role="dialog" aria-modal="true">
            <h1 class="completion-overlay__title">{ headline(props.mode) }</h1>
            if let Some(secs) = props.finish_secs {
                <p class="completion-overlay__time">{ format!("Final Time: {}", format_clock(secs)) }</p>
            }
            { submission_line(&props.submission, &props.on_retry) }
        </div>
    }
}
