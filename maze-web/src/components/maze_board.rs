use maze_game::{CellKind, Grid, Position};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub grid: Grid,
    #[prop_or_default]
    pub walker: Option<Position>,
    /// Collision feedback; the board shakes while set.
    #[prop_or_default]
    pub shaking: bool,
}

const fn cell_class(kind: CellKind) -> &'static str {
    match kind {
        CellKind::Wall => "maze-cell maze-cell--wall",
        CellKind::Start => "maze-cell maze-cell--start",
        CellKind::Goal => "maze-cell maze-cell--goal",
        CellKind::Open | CellKind::OutOfBounds => "maze-cell",
    }
}

#[function_component(MazeBoard)]
pub fn maze_board(props: &Props) -> Html {
    let style = format!(
        "grid-template-columns: repeat({}, minmax(0, 1fr));",
        props.grid.cols()
    );
    let board_class = classes!("maze-board", props.shaking.then_some("maze-board--shake"));

    html! {
        <div class={board_class} style={style} role="grid" aria-label="maze">
            { for props.grid.iter_rows().enumerate().flat_map(|(row, cells)| {
                let walker = props.walker;
                cells.iter().enumerate().map(move |(col, kind)| {
                    let here = walker == Some(Position::new(row, col));
                    html! {
                        <div class={classes!(cell_class(*kind), here.then_some("maze-cell--walker"))}
                             data-row={row.to_string()} data-col={col.to_string()}>
                            if here {
                                <span class="walker" aria-label="you are here">{ "@" }</span>
                            }
                        </div>
                    }
                })
            }) }
        </div>
    }
}
