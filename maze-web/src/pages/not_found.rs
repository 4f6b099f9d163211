use yew::prelude::*;

/// Shown when the path matches no known view.
#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_go_home: Callback<()>,
}

#[function_component(NotFound)]
pub fn not_found(props: &Props) -> Html {
    let go_home = {
        let cb = props.on_go_home.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <section class="panel not-found" aria-live="assertive">
            <h1>{ "404: SECTOR NOT FOUND" }</h1>
            <button type="button" onclick={go_home}>{ "Back to the maze" }</button>
        </section>
    }
}
