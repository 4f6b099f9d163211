use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Game,
    #[at("/leaderboard")]
    Leaderboard,
    #[at("/404")]
    #[not_found]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::Route;
    use yew_router::Routable;

    #[test]
    fn paths_resolve_to_routes() {
        assert_eq!(Route::recognize("/"), Some(Route::Game));
        assert_eq!(Route::recognize("/leaderboard"), Some(Route::Leaderboard));
        assert_eq!(Route::not_found_route(), Some(Route::NotFound));
        assert_eq!(Route::Leaderboard.to_path(), "/leaderboard");
    }
}
