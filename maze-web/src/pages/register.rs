//! Participant registration form.
use maze_game::{Participant, ParticipantError, ParticipantId};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Build a participant from the form fields; the contact is optional.
///
/// # Errors
///
/// Returns [`ParticipantError::EmptyName`] for a blank name.
pub fn registration(name: &str, contact: &str) -> Result<Participant, ParticipantError> {
    let name = ParticipantId::new(name)?;
    Ok(Participant::new(name, Some(contact.to_string())))
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_registered: Callback<Participant>,
}

#[function_component(Register)]
pub fn register(props: &Props) -> Html {
    let name = use_state(String::new);
    let contact = use_state(String::new);
    let error = use_state(|| None::<String>);

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };
    let on_contact = {
        let contact = contact.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            contact.set(input.value());
        })
    };

    let on_submit = {
        let name = name.clone();
        let contact = contact.clone();
        let error = error.clone();
        let cb = props.on_registered.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match registration(&name, &contact) {
                Ok(participant) => {
                    if let Err(err) = crate::dom::save_participant(&participant) {
                        log::warn!("participant not persisted: {err}");
                    }
                    cb.emit(participant);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
        })
    };

    html! {
        <section class="panel register">
            <h2 class="register__title">{ "KEYBOARD WARRIORS" }</h2>
            <p class="register__hint">{ "Enter your details to begin the challenge" }</p>
            <form onsubmit={on_submit}>
                <input id="player-name" type="text" required=true placeholder="Your Name"
                       value={(*name).clone()} oninput={on_name} />
                <input id="contact-number" type="text" placeholder="Contact Number (Optional)"
                       value={(*contact).clone()} oninput={on_contact} />
                if let Some(message) = (*error).clone() {
                    <p class="register__error" role="alert">{ message }</p>
                }
                <button type="submit">{ "Start Challenge" }</button>
            </form>
        </section>
    }
}
