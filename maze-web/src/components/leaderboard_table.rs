use maze_game::{LeaderboardEntry, format_clock};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub entries: Vec<LeaderboardEntry>,
}

#[function_component(LeaderboardTable)]
pub fn leaderboard_table(props: &Props) -> Html {
    html! {
        <table class="leaderboard">
            <thead>
                <tr>
                    <th>{ "RANK" }</th>
                    <th>{ "WARRIOR" }</th>
                    <th class="leaderboard__time">{ "TIME" }</th>
                </tr>
            </thead>
            <tbody>
                if props.entries.is_empty() {
                    <tr>
                        <td colspan="3" class="leaderboard__empty">{ "No scores submitted yet..." }</td>
                    </tr>
                } else {
                    { for props.entries.iter().enumerate().map(|(idx, entry)| html! {
                        <tr key={format!("{}-{idx}", entry.player_name)}>
                            <td class="leaderboard__rank">{ idx + 1 }</td>
                            <td>{ entry.player_name.clone() }</td>
                            <td class="leaderboard__time">{ format_clock(entry.finish_time_seconds) }</td>
                        </tr>
                    }) }
                }
            </tbody>
        </table>
    }
}
