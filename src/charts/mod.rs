//! Charts module - interactive plots and static export

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use plotter::{
    HOST_TITLE, KNOCKOUT_TITLE, RUNS_OVER_YEARS_TITLE, TEAM_WINS_TITLE, TOP_PLAYERS_TITLE,
};
pub use renderer::{ChartRenderer, RenderError};
