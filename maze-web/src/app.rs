use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::game::GamePage;
use crate::pages::leaderboard::LeaderboardPage;
use crate::pages::not_found::NotFound;
use crate::router::Route;

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::paths::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <NavBar />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

#[must_use]
pub fn switch(route: Route) -> Html {
    match route {
        Route::Game => html! { <GamePage /> },
        Route::Leaderboard => html! { <LeaderboardPage /> },
        Route::NotFound => html! { <Lost /> },
    }
}

#[function_component(NavBar)]
pub fn nav_bar() -> Html {
    html! {
        <nav class="nav">
            <Link<Route> to={Route::Game} classes="nav__link">{ "Maze" }</Link<Route>>
            <Link<Route> to={Route::Leaderboard} classes="nav__link">{ "Leaderboard" }</Link<Route>>
        </nav>
    }
}

#[function_component(Lost)]
fn lost() -> Html {
    let navigator = use_navigator();
    let on_go_home = Callback::from(move |()| {
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(&Route::Game);
        }
    });
    html! { <NotFound {on_go_home} /> }
}
